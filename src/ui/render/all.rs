use super::widgets::{spinner, styling};
use super::{auth, dialogs, footer, log, menu, menu_detail, status, task_modal, tasks, Frame};
use crate::state::{Screen, State};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders},
};

const LOG_PANEL_HEIGHT: u16 = 10;

/// Render all widgets according to state, overlays last.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let size = frame.size();

    let mut constraints = vec![Constraint::Length(1), Constraint::Min(5)];
    if state.is_log_visible() {
        constraints.push(Constraint::Length(LOG_PANEL_HEIGHT));
    }
    constraints.push(Constraint::Length(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(size);

    status(frame, chunks[0], state);
    screen(frame, chunks[1], state);
    if state.is_log_visible() {
        log(frame, chunks[2], state);
    }
    footer(frame, chunks[chunks.len() - 1], state);

    if state.get_tasks().modal_target().is_some() {
        task_modal::task_modal(frame, size, state);
    }
    if state.get_tasks().pending_delete().is_some() {
        dialogs::delete_confirmation(frame, size, state);
    }
    if state.get_alert().is_some() {
        dialogs::alert(frame, size, state);
    }
}

fn screen(frame: &mut Frame, size: Rect, state: &mut State) {
    match state.current_screen().clone() {
        Screen::Home => {
            if !state.sessions().is_resolved() {
                let block = Block::default()
                    .borders(Borders::ALL)
                    .border_style(styling::normal_block_border_style(state.get_theme()));
                frame.render_widget(
                    spinner::widget(state, "Restoring session...", size.height).block(block),
                    size,
                );
            } else if state.sessions().current().is_none() {
                auth::auth(frame, size, state);
            } else {
                tasks::tasks(frame, size, state);
            }
        }
        Screen::Menu => menu::menu(frame, size, state),
        Screen::MenuDetail { .. } => menu_detail::menu_detail(frame, size, state),
    }
}
