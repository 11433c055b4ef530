//! Shared session store.
//!
//! A single `SessionStore` is created when the application starts and handed
//! to the network handler, the backend client, and the UI state. It holds the
//! current session (or none), whether the first retrieval has completed, and
//! broadcasts every replacement to subscribers.

use crate::backend::{Session, User};
use log::*;
use std::sync::{Arc, RwLock};
use tokio::sync::broadcast;

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Notification sent to subscribers whenever the held session is replaced.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionChange {
    /// The first retrieval completed.
    Resolved(Option<Session>),
    SignedIn(Session),
    Refreshed(Session),
    SignedOut,
}

impl SessionChange {
    /// Returns the session held after this change.
    ///
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionChange::Resolved(session) => session.as_ref(),
            SessionChange::SignedIn(session) | SessionChange::Refreshed(session) => Some(session),
            SessionChange::SignedOut => None,
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    session: Option<Session>,
    resolved: bool,
}

/// Holds the current session and notifies observers of changes.
///
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Inner>>,
    changes: broadcast::Sender<SessionChange>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        SessionStore {
            inner: Arc::new(RwLock::new(Inner::default())),
            changes,
        }
    }

    /// Returns a receiver for subsequent session changes.
    ///
    pub fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }

    /// Returns a copy of the current session, if any.
    ///
    pub fn current(&self) -> Option<Session> {
        self.inner
            .read()
            .map(|inner| inner.session.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().session.clone())
    }

    /// Returns the current user, if signed in.
    ///
    pub fn user(&self) -> Option<User> {
        self.current().map(|session| session.user)
    }

    pub fn user_id(&self) -> Option<String> {
        self.user().map(|user| user.id)
    }

    /// Returns true once the first session retrieval has completed.
    ///
    pub fn is_resolved(&self) -> bool {
        self.inner
            .read()
            .map(|inner| inner.resolved)
            .unwrap_or_else(|poisoned| poisoned.into_inner().resolved)
    }

    /// Record the result of the first session retrieval.
    ///
    pub fn resolve(&self, session: Option<Session>) {
        self.apply(session.clone(), SessionChange::Resolved(session));
    }

    pub fn sign_in(&self, session: Session) {
        self.apply(Some(session.clone()), SessionChange::SignedIn(session));
    }

    pub fn refresh(&self, session: Session) {
        self.apply(Some(session.clone()), SessionChange::Refreshed(session));
    }

    pub fn sign_out(&self) {
        self.apply(None, SessionChange::SignedOut);
    }

    /// Replace the held session synchronously, then notify subscribers.
    ///
    fn apply(&self, session: Option<Session>, change: SessionChange) {
        {
            let mut inner = match self.inner.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            inner.session = session;
            inner.resolved = true;
        }
        debug!(
            "Session changed: {}",
            match &change {
                SessionChange::Resolved(Some(_)) => "resolved (signed in)",
                SessionChange::Resolved(None) => "resolved (signed out)",
                SessionChange::SignedIn(_) => "signed in",
                SessionChange::Refreshed(_) => "refreshed",
                SessionChange::SignedOut => "signed out",
            }
        );
        // No receivers is fine; the held value is authoritative.
        let _ = self.changes.send(change);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new()
    }
}
