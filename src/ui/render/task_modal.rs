use super::dialogs::centered_rect;
use super::widgets::styling;
use super::Frame;
use crate::state::{ModalField, ModalTarget, State};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Render the task edit modal over the task list.
///
pub fn task_modal(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let heading = match state.get_tasks().modal_target() {
        Some(ModalTarget::Edit(_)) => "Edit Task",
        _ => "New Task",
    };

    let popup_area = centered_rect(70, 60, size);
    frame.render_widget(Clear, popup_area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(&theme))
        .title(Span::styled(heading, styling::active_block_title_style()));
    let inner = outer.inner(popup_area);
    frame.render_widget(outer, popup_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(inner);

    let field = state.get_tasks().modal_ref().field();
    let border_for = |target: ModalField| {
        if field == target {
            styling::active_block_border_style(&theme)
        } else {
            styling::normal_block_border_style(&theme)
        }
    };

    let title = Paragraph::new(state.get_tasks().modal_ref().title().to_string())
        .style(styling::normal_text_style(&theme))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_for(ModalField::Title))
                .title("Title"),
        );
    frame.render_widget(title, rows[0]);

    let description_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_for(ModalField::Description))
        .title("Description");
    let textarea = state.tasks().modal().description_textarea();
    textarea.set_block(description_block);
    textarea.set_style(styling::normal_text_style(&theme));
    frame.render_widget(textarea.widget(), rows[1]);

    let hint = Paragraph::new(Span::styled(
        "Tab: switch field, Ctrl-S: save, Esc: cancel",
        styling::muted_text_style(&theme),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(hint, rows[2]);
}
