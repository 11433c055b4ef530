//! Request bookkeeping shared by the fetching views.

/// Issues monotonically increasing tokens for a view's fetches so that only
/// the response to the latest request is applied.
///
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequestTokens {
    latest: u64,
}

impl RequestTokens {
    /// Issue a new token, superseding every earlier one.
    ///
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub fn is_current(&self, token: u64) -> bool {
        token == self.latest
    }
}

/// Specifies the lifecycle of a fetch-backed view.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl Default for LoadStatus {
    fn default() -> Self {
        LoadStatus::Idle
    }
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}
