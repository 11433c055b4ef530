use super::Frame;
use crate::state::{ModalField, Screen, State};
use crate::ui::theme::ColorSpec;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Return the mode label, its color, and the controls for whatever currently
/// owns input.
///
fn mode_and_controls(state: &State) -> (&'static str, ColorSpec, &'static str) {
    let theme = state.get_theme();
    if state.get_alert().is_some() {
        return ("ALERT:", theme.footer_delete, " Enter: dismiss");
    }
    if state.get_tasks().pending_delete().is_some() {
        return ("DELETE:", theme.footer_delete, " Enter/y: delete, Esc/n: cancel");
    }
    if state.get_tasks().modal_target().is_some() {
        let controls = match state.get_tasks().modal_ref().field() {
            ModalField::Title => " Tab: description, Enter/Ctrl-S: save, Esc: cancel",
            ModalField::Description => " Tab: title, Ctrl-S: save, Esc: cancel",
        };
        return ("EDIT:", theme.footer_edit, controls);
    }
    match state.current_screen() {
        Screen::Home if !state.sessions().is_resolved() => {
            ("NORMAL:", theme.footer_normal, " q: quit")
        }
        Screen::Home if state.sessions().current().is_none() => (
            "AUTH:",
            theme.footer_auth,
            " Enter: submit, Tab: field, Ctrl-T: sign in/up, Ctrl-B: menu, Ctrl-C: quit",
        ),
        Screen::Home => (
            "TASKS:",
            theme.footer_tasks,
            " j/k: navigate, n: new, e: edit, d: delete, r: refresh, m: menu, o: sign out, q: quit",
        ),
        Screen::Menu => (
            "MENU:",
            theme.footer_menu,
            " j/k: navigate, h/l: category, Enter: view, r: refresh, Esc: back, q: quit",
        ),
        Screen::MenuDetail { .. } => (
            "MEAL:",
            theme.footer_menu,
            " s: share, r: retry, Esc: back, q: quit",
        ),
    }
}

/// Render footer widget according to state.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();
    let (mode, mode_color, controls) = mode_and_controls(state);

    let controls_content = Line::from(vec![
        Span::styled(
            mode,
            Style::default()
                .fg(theme.text.to_color())
                .bg(mode_color.to_color())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(controls, Style::default().fg(theme.warning.to_color())),
    ]);
    let controls_widget = Paragraph::new(controls_content).alignment(Alignment::Left);

    let right_content = Line::from(vec![
        Span::styled(
            if state.is_log_visible() { "F2: hide log " } else { "F2: log " },
            Style::default().fg(theme.text_muted.to_color()),
        ),
        Span::styled(
            format!(" {}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(theme.secondary.to_color()),
        ),
    ]);
    let right_content_width = right_content.width();
    let right_widget = Paragraph::new(right_content).alignment(Alignment::Right);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(right_content_width.try_into().unwrap_or(0)),
        ])
        .split(size);

    frame.render_widget(controls_widget, columns[0]);
    frame.render_widget(right_widget, columns[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Alert;

    #[test]
    fn alert_takes_over_footer() {
        let mut state = State::default();
        state.show_alert(Alert::error("Failed to fetch tasks"));
        assert_eq!(mode_and_controls(&state).0, "ALERT:");
    }

    #[test]
    fn signed_out_home_shows_auth_controls() {
        let state = State::default();
        state.sessions().resolve(None);
        assert_eq!(mode_and_controls(&state).0, "AUTH:");
    }

    #[test]
    fn menu_screen_shows_menu_controls() {
        let mut state = State::default();
        state.push_screen(Screen::Menu);
        assert_eq!(mode_and_controls(&state).0, "MENU:");
    }
}
