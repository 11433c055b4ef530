use crate::backend::{Backend, BackendError, Category, Session, SignUp};
use crate::state::State;
use anyhow::Result;
use log::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Specify different network event types.
///
#[derive(Debug, Clone)]
pub enum Event {
    RestoreSession {
        stored: Option<Session>,
    },
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
    },
    SignOut,
    FetchMenu {
        token: u64,
        category: Category,
    },
    FetchMenuItem {
        token: u64,
        id: String,
    },
    LoadTasks {
        token: u64,
        user_id: String,
    },
    CreateTask {
        user_id: String,
        title: String,
        description: String,
    },
    UpdateTask {
        id: String,
        title: String,
        description: String,
    },
    DeleteTask {
        id: String,
    },
}

/// Resolves network events against the backend and applies the results to
/// state. Cheap to clone so each event can run on its own task.
///
#[derive(Clone)]
pub struct Handler {
    state: Arc<Mutex<State>>,
    backend: Backend,
}

impl Handler {
    /// Return new instance with reference to state.
    ///
    pub fn new(state: &Arc<Mutex<State>>, backend: Backend) -> Self {
        Handler {
            state: Arc::clone(state),
            backend,
        }
    }

    /// Handle network events by type.
    ///
    pub async fn handle(&self, event: Event) -> Result<()> {
        match &event {
            Event::SignIn { email, .. } | Event::SignUp { email, .. } => {
                debug!("Processing auth event for {}...", email)
            }
            Event::RestoreSession { .. } => debug!("Processing session restore event..."),
            _ => debug!("Processing network event '{:?}'...", event),
        }
        match event {
            Event::RestoreSession { stored } => self.restore_session(stored).await,
            Event::SignIn { email, password } => self.sign_in(email, password).await,
            Event::SignUp { email, password } => self.sign_up(email, password).await,
            Event::SignOut => self.sign_out().await,
            Event::FetchMenu { token, category } => self.fetch_menu(token, category).await,
            Event::FetchMenuItem { token, id } => self.fetch_menu_item(token, id).await,
            Event::LoadTasks { token, user_id } => self.load_tasks(token, user_id).await,
            Event::CreateTask {
                user_id,
                title,
                description,
            } => self.create_task(user_id, title, description).await,
            Event::UpdateTask {
                id,
                title,
                description,
            } => self.update_task(id, title, description).await,
            Event::DeleteTask { id } => self.delete_task(id).await,
        }
        Ok(())
    }

    /// Resolve the first session from the stored one. Every failure resolves
    /// to signed out without surfacing an error.
    ///
    async fn restore_session(&self, stored: Option<Session>) {
        let sessions = self.backend.sessions();
        let stored = match stored {
            Some(stored) => stored,
            None => {
                info!("No stored session.");
                sessions.resolve(None);
                return;
            }
        };
        info!("Restoring stored session...");
        match self.backend.auth().get_user(&stored.access_token).await {
            Ok(user) => {
                sessions.resolve(Some(Session { user, ..stored }));
                return;
            }
            Err(e) => debug!("Stored access token rejected: {}", e),
        }
        match self.backend.auth().refresh_session(&stored.refresh_token).await {
            Ok(session) => sessions.resolve(Some(session)),
            Err(e) => {
                warn!("Failed to restore session: {}", e);
                sessions.resolve(None);
            }
        }
    }

    async fn sign_in(&self, email: String, password: String) {
        info!("Signing in as {}...", email);
        match self
            .backend
            .auth()
            .sign_in_with_password(&email, &password)
            .await
        {
            Ok(session) => self.backend.sessions().sign_in(session),
            Err(e) => {
                warn!("Sign in failed: {}", e);
                let mut state = self.state.lock().await;
                state.auth_form().fail(auth_message(&e));
            }
        }
    }

    async fn sign_up(&self, email: String, password: String) {
        info!("Signing up as {}...", email);
        match self.backend.auth().sign_up(&email, &password).await {
            Ok(SignUp::SignedIn(session)) => self.backend.sessions().sign_in(session),
            Ok(SignUp::ConfirmationRequired(_)) => {
                info!("Sign up for {} awaits email confirmation.", email);
                let mut state = self.state.lock().await;
                state
                    .auth_form()
                    .notify(format!("Check {} for a confirmation link.", email));
            }
            Err(e) => {
                warn!("Sign up failed: {}", e);
                let mut state = self.state.lock().await;
                state.auth_form().fail(auth_message(&e));
            }
        }
    }

    /// Revoke the session remotely when possible; locally it always ends.
    ///
    async fn sign_out(&self) {
        if let Some(session) = self.backend.sessions().current() {
            if let Err(e) = self.backend.auth().sign_out(&session.access_token).await {
                warn!("Failed to revoke session: {}", e);
            }
        }
        self.backend.sessions().sign_out();
    }

    async fn fetch_menu(&self, token: u64, category: Category) {
        info!("Fetching menu ({})...", category.label());
        let result = self.backend.meals(category).await;
        if let Ok(items) = &result {
            info!("Received {} menu items.", items.len());
        }
        let mut state = self.state.lock().await;
        state.apply_menu(token, result);
    }

    async fn fetch_menu_item(&self, token: u64, id: String) {
        info!("Fetching meal {}...", id);
        let result = self.backend.meal(&id).await;
        let mut state = self.state.lock().await;
        state.apply_meal(token, result);
    }

    async fn load_tasks(&self, token: u64, user_id: String) {
        info!("Fetching tasks...");
        let result = self.backend.tasks(&user_id).await;
        if let Ok(tasks) = &result {
            info!("Received {} tasks.", tasks.len());
        }
        let mut state = self.state.lock().await;
        state.apply_tasks_loaded(token, result);
    }

    async fn create_task(&self, user_id: String, title: String, description: String) {
        info!("Creating task...");
        let result = self
            .backend
            .create_task(&user_id, &title, &description)
            .await;
        let mut state = self.state.lock().await;
        state.apply_task_created(result);
    }

    async fn update_task(&self, id: String, title: String, description: String) {
        info!("Updating task {}...", id);
        let result = self.backend.update_task(&id, &title, &description).await;
        let mut state = self.state.lock().await;
        state.apply_task_updated(&id, result);
    }

    async fn delete_task(&self, id: String) {
        info!("Deleting task {}...", id);
        let result = self.backend.delete_task(&id).await;
        let mut state = self.state.lock().await;
        state.apply_task_deleted(&id, result);
    }
}

/// Returns the message shown on the auth form for a failed request.
///
fn auth_message(error: &BackendError) -> String {
    match error {
        BackendError::ApiError { details, .. } => details
            .message
            .clone()
            .unwrap_or_else(|| error.to_string()),
        _ => error.to_string(),
    }
}
