//! Backend service integration.
//!
//! This module contains everything that talks to the hosted backend:
//! - REST client and query builder for table access
//! - Auth client for sessions
//! - Row and session types
//! - Backend error types

mod auth;
mod client;
mod error;
mod resource;

pub use auth::{AuthClient, SignUp};
pub use client::{Client, Query, SortOrder};
pub use error::{ApiErrorDetails, BackendError, BackendResult};
pub use resource::*;

use crate::session::SessionStore;
use chrono::Utc;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const MEALS_TABLE: &str = "meals";
pub const TASKS_TABLE: &str = "tasks";

/// Seconds before expiry at which an access token is refreshed.
///
const REFRESH_LEEWAY_SECS: i64 = 60;

/// Returns the query listing menu items for the category.
///
pub fn meals_query(category: Category) -> Query {
    let query = Query::from(MEALS_TABLE).select("*");
    match category.filter_value() {
        Some(value) => query.eq("category", value),
        None => query,
    }
}

/// Returns the query selecting one menu item by id.
///
pub fn meal_query(id: &str) -> Query {
    Query::from(MEALS_TABLE).select("*").eq("id", id)
}

/// Returns the query listing a user's tasks, newest first.
///
pub fn tasks_query(user_id: &str) -> Query {
    Query::from(TASKS_TABLE)
        .select("*")
        .eq("user_id", user_id)
        .order("created_at", SortOrder::Descending)
}

/// Returns the query targeting one task by id.
///
pub fn task_query(id: &str) -> Query {
    Query::from(TASKS_TABLE).eq("id", id)
}

/// Responsible for asynchronous interaction with the backend including
/// transformation of response data into explicitly-defined types. Requests
/// carry the current session's access token, refreshing it first when it is
/// about to expire. Clones share one refresh lock so a refresh token is
/// redeemed at most once.
///
#[derive(Clone)]
pub struct Backend {
    client: Client,
    auth: AuthClient,
    sessions: SessionStore,
    refresh_lock: Arc<Mutex<()>>,
}

impl Backend {
    /// Returns a new instance for the backend URL and public API key.
    ///
    pub fn new(base_url: &str, api_key: &str, sessions: SessionStore) -> Backend {
        debug!("Initializing backend client for {}...", base_url);
        let http_client = reqwest::Client::new();
        Backend {
            client: Client::new(base_url, api_key, http_client.clone()),
            auth: AuthClient::new(base_url, api_key, http_client),
            sessions,
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn auth(&self) -> &AuthClient {
        &self.auth
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Returns a fresh access token for the held session. Concurrent callers
    /// wait on the lock and reuse the token the first caller obtained.
    ///
    async fn refresh(&self) -> BackendResult<String> {
        let _guard = self.refresh_lock.lock().await;
        let session = self.sessions.current().ok_or(BackendError::MissingSession)?;
        if !session.expires_within(Utc::now(), REFRESH_LEEWAY_SECS) {
            return Ok(session.access_token);
        }
        info!("Access token expiring, refreshing session...");
        let refreshed = self.auth.refresh_session(&session.refresh_token).await?;
        let token = refreshed.access_token.clone();
        self.sessions.refresh(refreshed);
        Ok(token)
    }

    /// Returns the bearer for the current session, refreshing it if it is
    /// about to expire. Returns None when signed out. A failed refresh ends
    /// the session.
    ///
    async fn bearer(&self) -> BackendResult<Option<String>> {
        let session = match self.sessions.current() {
            Some(session) => session,
            None => return Ok(None),
        };
        if !session.expires_within(Utc::now(), REFRESH_LEEWAY_SECS) {
            return Ok(Some(session.access_token));
        }
        match self.refresh().await {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!("Failed to refresh session: {}", e);
                self.sessions.sign_out();
                Err(BackendError::MissingSession)
            }
        }
    }

    /// Returns the bearer for public reads. When the refresh fails the request
    /// goes out with the API key and the session is left alone.
    ///
    async fn read_bearer(&self) -> Option<String> {
        let session = self.sessions.current()?;
        if !session.expires_within(Utc::now(), REFRESH_LEEWAY_SECS) {
            return Some(session.access_token);
        }
        match self.refresh().await {
            Ok(token) => Some(token),
            Err(e) => {
                warn!("Failed to refresh session, reading with the API key: {}", e);
                None
            }
        }
    }

    /// Returns the menu items in the category.
    ///
    pub async fn meals(&self, category: Category) -> BackendResult<Vec<MenuItem>> {
        debug!("Requesting menu items for category '{}'...", category.label());
        let bearer = self.read_bearer().await;
        let items: Vec<MenuItem> = self
            .client
            .fetch(&meals_query(category), bearer.as_deref())
            .await?;
        debug!("Retrieved {} menu items", items.len());
        Ok(items)
    }

    /// Returns the menu item with the id.
    ///
    pub async fn meal(&self, id: &str) -> BackendResult<MenuItem> {
        debug!("Requesting menu item {}...", id);
        let bearer = self.read_bearer().await;
        self.client
            .fetch_one(&meal_query(id), bearer.as_deref(), "Meal")
            .await
    }

    /// Returns the tasks owned by the user, newest first.
    ///
    pub async fn tasks(&self, user_id: &str) -> BackendResult<Vec<Task>> {
        debug!("Requesting tasks for user {}...", user_id);
        let bearer = self.bearer().await?.ok_or(BackendError::MissingSession)?;
        let tasks: Vec<Task> = self
            .client
            .fetch(&tasks_query(user_id), Some(&bearer))
            .await?;
        debug!("Retrieved {} tasks for user {}", tasks.len(), user_id);
        Ok(tasks)
    }

    /// Create a pending task owned by the user and return the stored row.
    ///
    pub async fn create_task(
        &self,
        user_id: &str,
        title: &str,
        description: &str,
    ) -> BackendResult<Task> {
        debug!("Creating task for user {}...", user_id);
        let bearer = self.bearer().await?.ok_or(BackendError::MissingSession)?;
        let body = [NewTask {
            title,
            description,
            status: DEFAULT_TASK_STATUS,
            user_id,
        }];
        let mut rows: Vec<Task> = self
            .client
            .insert(&Query::from(TASKS_TABLE), &body, Some(&bearer))
            .await?;
        if rows.is_empty() {
            return Err(BackendError::Other("Insert returned no rows".into()));
        }
        Ok(rows.swap_remove(0))
    }

    /// Update the task's title and description and return the stored row.
    ///
    pub async fn update_task(&self, id: &str, title: &str, description: &str) -> BackendResult<Task> {
        debug!("Updating task {}...", id);
        let bearer = self.bearer().await?.ok_or(BackendError::MissingSession)?;
        let body = TaskChanges { title, description };
        let mut rows: Vec<Task> = self
            .client
            .update(&task_query(id), &body, Some(&bearer))
            .await?;
        if rows.is_empty() {
            return Err(BackendError::NotFound("Task"));
        }
        Ok(rows.swap_remove(0))
    }

    /// Delete the task.
    ///
    pub async fn delete_task(&self, id: &str) -> BackendResult<()> {
        debug!("Deleting task {}...", id);
        let bearer = self.bearer().await?.ok_or(BackendError::MissingSession)?;
        self.client.delete(&task_query(id), Some(&bearer)).await
    }
}
