use super::widgets::styling;
use super::Frame;
use crate::state::State;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render the blocking delete confirmation dialog.
///
pub fn delete_confirmation(frame: &mut Frame, size: Rect, state: &State) {
    let popup_area = centered_rect(60, 30, size);
    frame.render_widget(Clear, popup_area);

    let theme = state.get_theme();
    let task_title = state
        .get_tasks()
        .pending_delete()
        .and_then(|id| state.get_tasks().tasks().iter().find(|t| t.id == id))
        .map(|t| t.title.clone())
        .unwrap_or_default();

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Are you sure you want to delete this task?",
            styling::normal_text_style(theme).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(task_title, styling::muted_text_style(theme))),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Cancel (Esc) ", styling::secondary_text_style(theme)),
            Span::raw("    "),
            Span::styled(
                " Delete (Enter) ",
                Style::default()
                    .fg(theme.highlight_fg.to_color())
                    .bg(theme.error.to_color())
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled("Delete Task", styling::error_text_style(theme)))
                .border_style(styling::error_text_style(theme)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, popup_area);
}

/// Render the current alert on top of everything else.
///
pub fn alert(frame: &mut Frame, size: Rect, state: &State) {
    let alert = match state.get_alert() {
        Some(alert) => alert,
        None => return,
    };
    let popup_area = centered_rect(50, 25, size);
    frame.render_widget(Clear, popup_area);

    let theme = state.get_theme();
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            alert.message.clone(),
            styling::normal_text_style(theme),
        )),
        Line::from(""),
        Line::from(Span::styled("Enter: OK", styling::muted_text_style(theme))),
    ];
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    alert.title.clone(),
                    styling::error_text_style(theme),
                ))
                .border_style(styling::error_text_style(theme)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Return a rect of the given percentages centered inside `r`.
///
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
