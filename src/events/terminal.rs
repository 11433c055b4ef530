use crate::state::{ModalField, Screen, State};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            loop {
                match event::poll(tick_rate) {
                    Ok(true) => match event::read() {
                        Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                            if tx_clone.send(Event::Input(key)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => (),
                        Err(e) => warn!("Failed to read terminal event: {}", e),
                    },
                    Ok(false) => (),
                    Err(e) => warn!("Failed to poll terminal events: {}", e),
                }
                if tx_clone.send(Event::Tick).is_err() {
                    break;
                }
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(key) => Ok(handle_key(state, key)),
            Event::Tick => {
                state.advance_spinner_index();
                state.sync_session();
                Ok(true)
            }
        }
    }
}

/// Route a key press to whatever currently owns input: an alert, the delete
/// confirmation, the task modal, or the current screen. Returns false if exit
/// was requested.
///
pub fn handle_key(state: &mut State, key: KeyEvent) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            debug!("Processing exit terminal event '{:?}'...", key);
            return false;
        }
        (KeyCode::F(2), _) => {
            state.toggle_log();
            return true;
        }
        _ => (),
    }

    if state.get_alert().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            state.dismiss_alert();
        }
        return true;
    }

    if state.get_tasks().pending_delete().is_some() {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => {
                debug!("Processing confirm delete event '{:?}'...", key);
                state.confirm_delete_task();
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                debug!("Processing cancel delete event '{:?}'...", key);
                state.tasks().cancel_delete();
            }
            _ => (),
        }
        return true;
    }

    if state.get_tasks().modal_target().is_some() {
        handle_modal_key(state, key);
        return true;
    }

    match state.current_screen().clone() {
        Screen::Home => {
            if !state.sessions().is_resolved() {
                !matches!(key.code, KeyCode::Char('q'))
            } else if state.sessions().current().is_none() {
                handle_auth_key(state, key);
                true
            } else {
                handle_tasks_key(state, key)
            }
        }
        Screen::Menu => handle_menu_key(state, key),
        Screen::MenuDetail { .. } => handle_detail_key(state, key),
    }
}

fn handle_modal_key(state: &mut State, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            debug!("Processing close modal event '{:?}'...", key);
            state.tasks().close_modal();
        }
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => {
            state.save_task_modal();
        }
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
            state.tasks().modal().next_field();
        }
        _ => match state.get_tasks().modal_ref().field() {
            ModalField::Title => match (key.code, key.modifiers) {
                (KeyCode::Enter, _) => {
                    state.save_task_modal();
                }
                (KeyCode::Backspace, _) => {
                    state.tasks().modal().remove_title_char();
                }
                (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                    state.tasks().modal().add_title_char(c);
                }
                _ => (),
            },
            ModalField::Description => {
                state.tasks().modal().input_description(key);
            }
        },
    }
}

fn handle_auth_key(state: &mut State, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => {
            state.submit_auth();
        }
        (KeyCode::Tab, _) | (KeyCode::BackTab, _) | (KeyCode::Up, _) | (KeyCode::Down, _) => {
            state.auth_form().next_field();
        }
        (KeyCode::Backspace, _) => {
            state.auth_form().backspace();
        }
        (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
            state.auth_form().toggle_mode();
        }
        (KeyCode::Char('b'), KeyModifiers::CONTROL) => {
            state.open_menu();
        }
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            state.auth_form().add_char(c);
        }
        _ => debug!("Skipping processing of terminal event '{:?}'...", key),
    }
}

fn handle_tasks_key(state: &mut State, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => {
            debug!("Processing exit terminal event '{:?}'...", key);
            return false;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.tasks().next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.tasks().previous();
        }
        KeyCode::Char('n') => {
            debug!("Processing create task event '{:?}'...", key);
            state.tasks().open_create();
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            debug!("Processing edit task event '{:?}'...", key);
            state.tasks().open_edit();
        }
        KeyCode::Char('d') => {
            state.tasks().request_delete();
        }
        KeyCode::Char('r') => {
            state.load_tasks();
        }
        KeyCode::Char('m') => {
            state.open_menu();
        }
        KeyCode::Char('o') => {
            state.sign_out();
        }
        _ => debug!("Skipping processing of terminal event '{:?}'...", key),
    }
    true
}

fn handle_menu_key(state: &mut State, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Esc | KeyCode::Backspace => {
            state.pop_screen();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.menu().next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.menu().previous();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.next_category();
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.previous_category();
        }
        KeyCode::Char('r') => {
            state.fetch_menu();
        }
        KeyCode::Enter => {
            state.open_selected_meal();
        }
        _ => debug!("Skipping processing of terminal event '{:?}'...", key),
    }
    true
}

fn handle_detail_key(state: &mut State, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') => return false,
        KeyCode::Esc | KeyCode::Backspace => {
            state.pop_screen();
        }
        KeyCode::Char('s') => {
            state.share_meal();
        }
        KeyCode::Char('r') => {
            state.retry_meal();
        }
        _ => debug!("Skipping processing of terminal event '{:?}'...", key),
    }
    true
}
