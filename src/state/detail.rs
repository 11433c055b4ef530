//! Menu detail view state.

use super::request::{LoadStatus, RequestTokens};
use crate::backend::MenuItem;
use crate::share::{share_or_log, Share};
use log::*;

/// Holds the single menu item shown by the detail screen.
///
#[derive(Debug, Default)]
pub struct MenuDetail {
    id: Option<String>,
    item: Option<MenuItem>,
    status: LoadStatus,
    tokens: RequestTokens,
}

impl MenuDetail {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn item(&self) -> Option<&MenuItem> {
        self.item.as_ref()
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Show the item with the id, dropping whatever was shown before, and
    /// return the token the response must carry.
    ///
    pub fn begin(&mut self, id: &str) -> u64 {
        self.id = Some(id.to_string());
        self.item = None;
        self.status = LoadStatus::Loading;
        self.tokens.issue()
    }

    /// Re-fetch the current item. Returns the new token and the id, or None
    /// if no item was requested yet.
    ///
    pub fn retry(&mut self) -> Option<(u64, String)> {
        let id = self.id.clone()?;
        Some((self.begin(&id), id))
    }

    /// Apply a fetch result if it answers the latest request.
    ///
    pub fn apply(&mut self, token: u64, result: Result<MenuItem, String>) -> bool {
        if !self.tokens.is_current(token) {
            debug!("Discarding stale menu item response (token {}).", token);
            return false;
        }
        match result {
            Ok(item) => {
                self.item = Some(item);
                self.status = LoadStatus::Loaded;
            }
            Err(message) => {
                self.item = None;
                self.status = LoadStatus::Failed(message);
            }
        }
        true
    }

    /// Hand the shown item to the share interface. Failures are only logged.
    ///
    pub fn share(&self, sharer: &dyn Share) {
        match &self.item {
            Some(item) => share_or_log(sharer, &item.share_message(), &item.name),
            None => debug!("Nothing to share."),
        }
    }
}
