use super::widgets::{spinner, styling};
use super::Frame;
use crate::state::State;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Block, Borders, List, ListItem, Paragraph,
    },
};

const BLOCK_TITLE: &str = "My Tasks";

/// Render the signed-in user's task list.
///
pub fn tasks(frame: &mut Frame, size: Rect, state: &mut State) {
    let theme = state.get_theme().clone();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::active_block_border_style(&theme))
        .title(Span::styled(
            format!("{} ({})", BLOCK_TITLE, state.get_tasks().tasks().len()),
            styling::active_block_title_style(),
        ));

    let task_list = state.get_tasks();
    if task_list.tasks().is_empty() {
        if task_list.is_loading() {
            frame.render_widget(
                spinner::widget(state, "Loading tasks...", size.height).block(block),
                size,
            );
        } else {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No tasks found",
                styling::muted_text_style(&theme),
            )))
            .alignment(Alignment::Center)
            .block(block);
            frame.render_widget(empty, size);
        }
        return;
    }

    let items: Vec<ListItem> = task_list
        .tasks()
        .iter()
        .map(|task| {
            let mut lines = vec![Line::from(vec![
                Span::styled(task.title.clone(), styling::normal_text_style(&theme)),
                Span::raw("  "),
                Span::styled(
                    format!("[{}]", task.status),
                    styling::secondary_text_style(&theme),
                ),
            ])];
            if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
                lines.push(Line::from(Span::styled(
                    format!("  {}", description.lines().next().unwrap_or_default()),
                    styling::muted_text_style(&theme),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let title = if task_list.is_loading() {
        spinner::line(state, "Refreshing...")
    } else {
        Line::from("")
    };
    let block = block.title(Title::from(title).position(Position::Bottom));

    let list = List::new(items)
        .block(block)
        .highlight_style(styling::current_list_item_style(&theme))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, size, state.tasks().list_state());
}
