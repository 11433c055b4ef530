//! Task list view state.
//!
//! The list only changes in response to a successful round trip, and every
//! reconciliation matches rows by id rather than by position.

use super::form::TaskEditModal;
use super::request::RequestTokens;
use crate::backend::Task;
use log::*;
use ratatui::widgets::ListState;

/// Specifies what the task edit modal is currently open for.
///
#[derive(Debug, Clone, PartialEq)]
pub enum ModalTarget {
    Create,
    Edit(Task),
}

/// Holds the signed-in user's tasks and the overlays acting on them.
///
#[derive(Default)]
pub struct TaskList {
    tasks: Vec<Task>,
    loading: bool,
    tokens: RequestTokens,
    list_state: ListState,
    pending_delete: Option<String>,
    modal_target: Option<ModalTarget>,
    modal: TaskEditModal,
}

impl TaskList {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn list_state(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    /// Enter the loading state and return the token the response must carry.
    ///
    pub fn begin_load(&mut self) -> u64 {
        self.loading = true;
        self.tokens.issue()
    }

    /// Replace the list with a load result if it answers the latest request.
    ///
    pub fn apply_loaded(&mut self, token: u64, tasks: Vec<Task>) -> bool {
        if !self.tokens.is_current(token) {
            debug!("Discarding stale task list response (token {}).", token);
            return false;
        }
        self.loading = false;
        self.tasks = tasks;
        self.clamp_selection();
        true
    }

    /// Leave the loading state after a failed load without touching the list.
    /// Returns false when the failure answered a superseded request.
    ///
    pub fn fail_load(&mut self, token: u64) -> bool {
        if !self.tokens.is_current(token) {
            return false;
        }
        self.loading = false;
        true
    }

    /// Prepend a newly created task.
    ///
    pub fn apply_created(&mut self, task: Task) -> &mut Self {
        self.tasks.insert(0, task);
        self.list_state.select(Some(0));
        self
    }

    /// Replace the task with the same id in place.
    ///
    pub fn apply_updated(&mut self, task: Task) -> &mut Self {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => warn!("Updated task {} is not in the list.", task.id),
        }
        self
    }

    /// Remove the task with the id.
    ///
    pub fn apply_deleted(&mut self, id: &str) -> &mut Self {
        self.tasks.retain(|t| t.id != id);
        self.clamp_selection();
        self
    }

    /// Drop everything held for the previous user.
    ///
    pub fn reset(&mut self) -> &mut Self {
        self.tasks.clear();
        self.loading = false;
        self.tokens.issue();
        self.list_state.select(None);
        self.pending_delete = None;
        self.close_modal();
        self
    }

    pub fn selected(&self) -> Option<&Task> {
        self.list_state.selected().and_then(|i| self.tasks.get(i))
    }

    pub fn next(&mut self) -> &mut Self {
        if !self.tasks.is_empty() {
            let next = match self.list_state.selected() {
                Some(i) => (i + 1) % self.tasks.len(),
                None => 0,
            };
            self.list_state.select(Some(next));
        }
        self
    }

    pub fn previous(&mut self) -> &mut Self {
        if !self.tasks.is_empty() {
            let previous = match self.list_state.selected() {
                Some(0) | None => self.tasks.len() - 1,
                Some(i) => i - 1,
            };
            self.list_state.select(Some(previous));
        }
        self
    }

    fn clamp_selection(&mut self) {
        if self.tasks.is_empty() {
            self.list_state.select(None);
        } else {
            let index = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(index.min(self.tasks.len() - 1)));
        }
    }

    /// Ask for confirmation before deleting the selected task.
    ///
    pub fn request_delete(&mut self) -> &mut Self {
        self.pending_delete = self.selected().map(|t| t.id.clone());
        self
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn cancel_delete(&mut self) -> &mut Self {
        self.pending_delete = None;
        self
    }

    /// Take the confirmed task id, closing the confirmation.
    ///
    pub fn confirm_delete(&mut self) -> Option<String> {
        self.pending_delete.take()
    }

    pub fn modal_target(&self) -> Option<&ModalTarget> {
        self.modal_target.as_ref()
    }

    pub fn modal(&mut self) -> &mut TaskEditModal {
        &mut self.modal
    }

    pub fn modal_ref(&self) -> &TaskEditModal {
        &self.modal
    }

    pub fn open_create(&mut self) -> &mut Self {
        self.modal.set_initial("", "");
        self.modal_target = Some(ModalTarget::Create);
        self
    }

    /// Open the modal for the selected task.
    ///
    pub fn open_edit(&mut self) -> &mut Self {
        if let Some(task) = self.selected().cloned() {
            self.modal
                .set_initial(&task.title, task.description.as_deref().unwrap_or(""));
            self.modal_target = Some(ModalTarget::Edit(task));
        }
        self
    }

    /// Hide the modal and forget the edit target's initial values.
    ///
    pub fn close_modal(&mut self) -> &mut Self {
        self.modal_target = None;
        self.modal.set_initial("", "");
        self
    }

    /// Close the modal if it is open for the given target.
    ///
    pub fn close_modal_for(&mut self, target_id: Option<&str>) -> &mut Self {
        let open_for_target = match (&self.modal_target, target_id) {
            (Some(ModalTarget::Create), None) => true,
            (Some(ModalTarget::Edit(task)), Some(id)) => task.id == id,
            _ => false,
        };
        if open_for_target {
            self.close_modal();
        }
        self
    }
}
