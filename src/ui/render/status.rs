use super::widgets::styling;
use super::Frame;
use crate::state::State;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

const BANNER: &str = " meals-tui ";

/// Render the top status bar: banner, screen title, and signed-in user.
///
pub fn status(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme();

    let left = Line::from(vec![
        Span::styled(BANNER, styling::banner_style(theme)),
        Span::styled(
            format!("│ {}", state.current_screen().title()),
            styling::secondary_text_style(theme),
        ),
    ]);

    let user = match state.sessions().user() {
        Some(user) => user.email.unwrap_or(user.id),
        None if state.sessions().is_resolved() => "signed out".to_string(),
        None => String::new(),
    };
    let right = Line::from(Span::styled(
        format!("{} ", user),
        styling::muted_text_style(theme),
    ));

    let right_width = right.width();
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(right_width.try_into().unwrap_or(0)),
        ])
        .split(size);

    frame.render_widget(Paragraph::new(left), columns[0]);
    frame.render_widget(
        Paragraph::new(right).alignment(Alignment::Right),
        columns[1],
    );
}
