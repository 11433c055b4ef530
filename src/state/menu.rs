//! Menu listing view state.

use super::request::{LoadStatus, RequestTokens};
use crate::backend::{Category, MenuItem};
use log::*;
use ratatui::widgets::ListState;

/// Holds the menu items for the selected category and the state of the fetch
/// that produced them.
///
#[derive(Debug, Default)]
pub struct MenuListing {
    category: Category,
    items: Vec<MenuItem>,
    status: LoadStatus,
    tokens: RequestTokens,
    list_state: ListState,
}

impl MenuListing {
    pub fn category(&self) -> Category {
        self.category
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn list_state(&mut self) -> &mut ListState {
        &mut self.list_state
    }

    /// Enter the loading state for the current category and return the token
    /// the response must carry.
    ///
    pub fn begin_fetch(&mut self) -> u64 {
        self.status = LoadStatus::Loading;
        self.tokens.issue()
    }

    /// Change the category filter and begin a fetch for it.
    ///
    pub fn select_category(&mut self, category: Category) -> u64 {
        self.category = category;
        self.begin_fetch()
    }

    /// Apply a fetch result if it answers the latest request. Returns false
    /// when the result was stale and discarded.
    ///
    pub fn apply(&mut self, token: u64, result: Result<Vec<MenuItem>, String>) -> bool {
        if !self.tokens.is_current(token) {
            debug!("Discarding stale menu response (token {}).", token);
            return false;
        }
        match result {
            Ok(items) => {
                self.list_state
                    .select(if items.is_empty() { None } else { Some(0) });
                self.items = items;
                self.status = LoadStatus::Loaded;
            }
            Err(message) => {
                self.items.clear();
                self.list_state.select(None);
                self.status = LoadStatus::Failed(message);
            }
        }
        true
    }

    pub fn selected(&self) -> Option<&MenuItem> {
        self.list_state.selected().and_then(|i| self.items.get(i))
    }

    pub fn next(&mut self) -> &mut Self {
        if !self.items.is_empty() {
            let next = match self.list_state.selected() {
                Some(i) => (i + 1) % self.items.len(),
                None => 0,
            };
            self.list_state.select(Some(next));
        }
        self
    }

    pub fn previous(&mut self) -> &mut Self {
        if !self.items.is_empty() {
            let previous = match self.list_state.selected() {
                Some(0) | None => self.items.len() - 1,
                Some(i) => i - 1,
            };
            self.list_state.select(Some(previous));
        }
        self
    }
}
