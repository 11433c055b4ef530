use super::dialogs::centered_rect;
use super::widgets::{spinner, styling};
use super::Frame;
use crate::state::{AuthField, AuthMode, State};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the sign-in / sign-up form shown on Home while signed out.
///
pub fn auth(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let form = state.get_auth_form();

    let title = match form.mode() {
        AuthMode::SignIn => "Sign In",
        AuthMode::SignUp => "Sign Up",
    };
    let area = centered_rect(60, 70, size);
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(theme))
        .title(Span::styled(title, styling::active_block_title_style()));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(1),
        ])
        .split(inner);

    let masked = "*".repeat(form.password().chars().count());
    for (row, field, label, value) in [
        (rows[0], AuthField::Email, "Email", form.email()),
        (rows[1], AuthField::Password, "Password", masked.as_str()),
    ] {
        let border_style = if form.field() == field {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        };
        let input = Paragraph::new(value.to_string())
            .style(styling::normal_text_style(theme))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(label),
            );
        frame.render_widget(input, row);
    }

    let message = if form.is_submitting() {
        spinner::line(state, "Submitting...")
    } else if let Some(error) = form.error() {
        Line::from(Span::styled(error.to_string(), styling::error_text_style(theme)))
    } else if let Some(notice) = form.notice() {
        Line::from(Span::styled(
            notice.to_string(),
            styling::secondary_text_style(theme),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(message).alignment(Alignment::Center), rows[2]);

    let switch_hint = match form.mode() {
        AuthMode::SignIn => "Ctrl-T: create an account instead",
        AuthMode::SignUp => "Ctrl-T: sign in to an existing account",
    };
    let hints = vec![
        Line::from(Span::styled(
            "Enter: submit, Tab: switch field",
            styling::muted_text_style(theme),
        )),
        Line::from(Span::styled(switch_hint, styling::muted_text_style(theme))),
        Line::from(Span::styled(
            "Ctrl-B: browse the menu",
            styling::muted_text_style(theme),
        )),
    ];
    frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), rows[3]);
}
