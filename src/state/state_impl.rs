use crate::app::NetworkEventSender;
use crate::backend::{BackendResult, MenuItem, Session, Task};
use crate::events::network::Event as NetworkEvent;
use crate::session::{SessionChange, SessionStore};
use crate::share::{ClipboardShare, Share};
use crate::ui::{Theme, SPINNER_FRAME_COUNT};
use log::*;
use ratatui::layout::Rect;
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::detail::MenuDetail;
use super::form::{AuthForm, AuthMode};
use super::menu::MenuListing;
use super::navigation::{Alert, Screen};
use super::tasks::{ModalTarget, TaskList};

const MAX_LOG_ENTRIES: usize = 1000;

static HOME: Screen = Screen::Home;

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    sessions: SessionStore,
    session_changes: Option<broadcast::Receiver<SessionChange>>,
    task_owner: Option<String>,
    view_stack: Vec<Screen>,
    auth_form: AuthForm,
    menu: MenuListing,
    detail: MenuDetail,
    tasks: TaskList,
    alert: Option<Alert>,
    debug_entries: Vec<String>,
    show_log: bool,
    sharer: Box<dyn Share>,
    theme: Theme,
    spinner_index: usize,
    terminal_size: Rect,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            net_sender: None,
            sessions: SessionStore::new(),
            session_changes: None,
            task_owner: None,
            view_stack: vec![Screen::Home],
            auth_form: AuthForm::default(),
            menu: MenuListing::default(),
            detail: MenuDetail::default(),
            tasks: TaskList::default(),
            alert: None,
            debug_entries: vec![],
            show_log: false,
            sharer: Box::new(ClipboardShare),
            theme: Theme::default(),
            spinner_index: 0,
            terminal_size: Rect::default(),
        }
    }
}

impl State {
    pub fn new(net_sender: NetworkEventSender, sessions: SessionStore, theme: Theme) -> Self {
        State {
            net_sender: Some(net_sender),
            session_changes: Some(sessions.subscribe()),
            sessions,
            theme,
            ..State::default()
        }
    }

    /// Get the current theme.
    ///
    pub fn get_theme(&self) -> &Theme {
        &self.theme
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Sets the terminal size.
    ///
    pub fn set_terminal_size(&mut self, size: Rect) -> &mut Self {
        self.terminal_size = size;
        self
    }

    /// Advance the spinner index.
    ///
    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index += 1;
        if self.spinner_index >= SPINNER_FRAME_COUNT {
            self.spinner_index = 0;
        }
        self
    }

    /// Return the current spinner index.
    ///
    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }

    /// Return the current screen.
    ///
    pub fn current_screen(&self) -> &Screen {
        self.view_stack.last().unwrap_or(&HOME)
    }

    /// Push a screen onto the view stack.
    ///
    pub fn push_screen(&mut self, screen: Screen) -> &mut Self {
        self.view_stack.push(screen);
        self
    }

    /// Pop a screen from the view stack, never removing the home screen.
    ///
    pub fn pop_screen(&mut self) -> Option<Screen> {
        if self.view_stack.len() > 1 {
            self.view_stack.pop()
        } else {
            None
        }
    }

    pub fn view_stack_len(&self) -> usize {
        self.view_stack.len()
    }

    pub fn get_alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn show_alert(&mut self, alert: Alert) -> &mut Self {
        self.alert = Some(alert);
        self
    }

    pub fn dismiss_alert(&mut self) -> &mut Self {
        self.alert = None;
        self
    }

    /// Drain pending session change notifications and react to them.
    ///
    pub fn sync_session(&mut self) -> &mut Self {
        let mut latest: Option<Option<Session>> = None;
        if let Some(changes) = self.session_changes.as_mut() {
            loop {
                match changes.try_recv() {
                    Ok(change) => latest = Some(change.session().cloned()),
                    Err(TryRecvError::Lagged(skipped)) => {
                        warn!("Missed {} session notifications.", skipped);
                        latest = Some(self.sessions.current());
                    }
                    Err(_) => break,
                }
            }
        }
        if let Some(session) = latest {
            self.on_session(session.as_ref());
        }
        self
    }

    /// Mount the task list for a newly signed-in user, or unmount it after
    /// sign-out.
    ///
    fn on_session(&mut self, session: Option<&Session>) {
        let user_id = session.map(|s| s.user.id.clone());
        if user_id == self.task_owner {
            return;
        }
        self.tasks.reset();
        self.task_owner = user_id;
        match &self.task_owner {
            Some(id) => {
                info!("Signed in as user {}.", id);
                self.auth_form.clear();
                self.load_tasks();
            }
            None => info!("Signed out."),
        }
    }

    pub fn get_auth_form(&self) -> &AuthForm {
        &self.auth_form
    }

    pub fn auth_form(&mut self) -> &mut AuthForm {
        &mut self.auth_form
    }

    /// Validate the auth form and dispatch a sign-in or sign-up request.
    ///
    pub fn submit_auth(&mut self) -> &mut Self {
        if self.auth_form.is_submitting() {
            return self;
        }
        if let Ok((email, password)) = self.auth_form.submit() {
            let event = match self.auth_form.mode() {
                AuthMode::SignIn => NetworkEvent::SignIn { email, password },
                AuthMode::SignUp => NetworkEvent::SignUp { email, password },
            };
            self.dispatch(event);
        }
        self
    }

    pub fn sign_out(&mut self) -> &mut Self {
        self.dispatch(NetworkEvent::SignOut);
        self
    }

    pub fn get_tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn tasks(&mut self) -> &mut TaskList {
        &mut self.tasks
    }

    /// Fetch the signed-in user's tasks. Without a session this does nothing.
    ///
    pub fn load_tasks(&mut self) -> &mut Self {
        let user_id = match self.sessions.user_id() {
            Some(user_id) => user_id,
            None => {
                debug!("Skipping task load without a session.");
                return self;
            }
        };
        let token = self.tasks.begin_load();
        self.dispatch(NetworkEvent::LoadTasks { token, user_id });
        self
    }

    pub fn apply_tasks_loaded(&mut self, token: u64, result: BackendResult<Vec<Task>>) -> &mut Self {
        match result {
            Ok(tasks) => {
                self.tasks.apply_loaded(token, tasks);
            }
            Err(e) => {
                error!("Failed to fetch tasks: {}", e);
                if self.tasks.fail_load(token) {
                    self.show_alert(Alert::error("Failed to fetch tasks"));
                }
            }
        }
        self
    }

    /// Validate the modal and dispatch the create or update it was opened for.
    ///
    pub fn save_task_modal(&mut self) -> &mut Self {
        let target = match self.tasks.modal_target().cloned() {
            Some(target) => target,
            None => return self,
        };
        let user_id = self.sessions.user_id();
        let mut event = None;
        let result = self.tasks.modal().save(|title, description| {
            event = match target {
                ModalTarget::Create => user_id.map(|user_id| NetworkEvent::CreateTask {
                    user_id,
                    title,
                    description,
                }),
                ModalTarget::Edit(task) => Some(NetworkEvent::UpdateTask {
                    id: task.id,
                    title,
                    description,
                }),
            };
        });
        match (result, event) {
            (Err(e), _) => {
                self.show_alert(Alert::error(&e.to_string()));
            }
            (Ok(()), Some(event)) => self.dispatch(event),
            (Ok(()), None) => warn!("Cannot save a task without a session."),
        }
        self
    }

    pub fn apply_task_created(&mut self, result: BackendResult<Task>) -> &mut Self {
        match result {
            Ok(task) if Some(&task.user_id) == self.task_owner.as_ref() => {
                info!("Created task {}.", task.id);
                self.tasks.apply_created(task);
                self.tasks.close_modal_for(None);
            }
            Ok(task) => debug!("Ignoring task {} created for a previous session.", task.id),
            Err(e) => {
                error!("Failed to create task: {}", e);
                self.show_alert(Alert::error("Failed to create task"));
            }
        }
        self
    }

    pub fn apply_task_updated(&mut self, id: &str, result: BackendResult<Task>) -> &mut Self {
        match result {
            Ok(task) => {
                info!("Updated task {}.", id);
                self.tasks.apply_updated(task);
                self.tasks.close_modal_for(Some(id));
            }
            Err(e) => {
                error!("Failed to update task {}: {}", id, e);
                self.show_alert(Alert::error("Failed to update task"));
            }
        }
        self
    }

    /// Dispatch the delete awaiting confirmation, if any.
    ///
    pub fn confirm_delete_task(&mut self) -> &mut Self {
        if let Some(id) = self.tasks.confirm_delete() {
            self.dispatch(NetworkEvent::DeleteTask { id });
        }
        self
    }

    pub fn apply_task_deleted(&mut self, id: &str, result: BackendResult<()>) -> &mut Self {
        match result {
            Ok(()) => {
                info!("Deleted task {}.", id);
                self.tasks.apply_deleted(id);
            }
            Err(e) => {
                error!("Failed to delete task {}: {}", id, e);
                self.show_alert(Alert::error("Failed to delete task"));
            }
        }
        self
    }

    pub fn get_menu(&self) -> &MenuListing {
        &self.menu
    }

    pub fn menu(&mut self) -> &mut MenuListing {
        &mut self.menu
    }

    /// Show the menu screen and fetch its items.
    ///
    pub fn open_menu(&mut self) -> &mut Self {
        if *self.current_screen() != Screen::Menu {
            self.push_screen(Screen::Menu);
        }
        self.fetch_menu()
    }

    /// Fetch the menu for the selected category. Also used for refresh and
    /// retry.
    ///
    pub fn fetch_menu(&mut self) -> &mut Self {
        let token = self.menu.begin_fetch();
        let category = self.menu.category();
        self.dispatch(NetworkEvent::FetchMenu { token, category });
        self
    }

    pub fn next_category(&mut self) -> &mut Self {
        let category = self.menu.category().next();
        let token = self.menu.select_category(category);
        self.dispatch(NetworkEvent::FetchMenu { token, category });
        self
    }

    pub fn previous_category(&mut self) -> &mut Self {
        let category = self.menu.category().previous();
        let token = self.menu.select_category(category);
        self.dispatch(NetworkEvent::FetchMenu { token, category });
        self
    }

    pub fn apply_menu(&mut self, token: u64, result: BackendResult<Vec<MenuItem>>) -> &mut Self {
        if let Err(e) = &result {
            error!("Failed to fetch menu: {}", e);
        }
        self.menu.apply(token, result.map_err(|e| e.to_string()));
        self
    }

    pub fn get_detail(&self) -> &MenuDetail {
        &self.detail
    }

    /// Navigate to the detail screen for the selected menu item.
    ///
    pub fn open_selected_meal(&mut self) -> &mut Self {
        let id = match self.menu.selected() {
            Some(item) => item.id.clone(),
            None => return self,
        };
        self.push_screen(Screen::MenuDetail { id: id.clone() });
        let token = self.detail.begin(&id);
        self.dispatch(NetworkEvent::FetchMenuItem { token, id });
        self
    }

    pub fn retry_meal(&mut self) -> &mut Self {
        if let Some((token, id)) = self.detail.retry() {
            self.dispatch(NetworkEvent::FetchMenuItem { token, id });
        }
        self
    }

    pub fn apply_meal(&mut self, token: u64, result: BackendResult<MenuItem>) -> &mut Self {
        if let Err(e) = &result {
            error!("Failed to fetch meal: {}", e);
        }
        self.detail.apply(token, result.map_err(|e| e.to_string()));
        self
    }

    pub fn share_meal(&self) {
        self.detail.share(self.sharer.as_ref());
    }

    pub fn toggle_log(&mut self) -> &mut Self {
        self.show_log = !self.show_log;
        self
    }

    pub fn is_log_visible(&self) -> bool {
        self.show_log
    }

    /// Add a log entry to the debug buffer.
    ///
    pub fn add_log_entry(&mut self, entry: String) {
        self.debug_entries.push(entry);
        if self.debug_entries.len() > MAX_LOG_ENTRIES {
            self.debug_entries.remove(0);
        }
    }

    /// Get debug entries for rendering.
    ///
    pub fn get_debug_entries(&self) -> &[String] {
        &self.debug_entries
    }

    /// Dispatches an asynchronous network event.
    ///
    pub fn dispatch(&self, event: NetworkEvent) {
        if let Some(net_sender) = &self.net_sender {
            if let Err(err) = net_sender.send(event) {
                error!("Received error from network dispatch: {}", err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, Category};
    use fake::{Fake, Faker};
    use std::sync::mpsc::{channel, Receiver};
    use uuid::Uuid;

    fn state_with_channel() -> (State, Receiver<NetworkEvent>) {
        let (tx, rx) = channel();
        let state = State::new(tx, SessionStore::new(), Theme::default());
        (state, rx)
    }

    fn session_for(user_id: &str) -> Session {
        let mut session: Session = Faker.fake();
        session.user.id = user_id.to_string();
        session
    }

    fn task_for(user_id: &str) -> Task {
        let mut task: Task = Faker.fake();
        task.id = Uuid::new_v4().to_string();
        task.user_id = user_id.to_string();
        task
    }

    fn signed_in(user_id: &str) -> (State, Receiver<NetworkEvent>) {
        let (mut state, rx) = state_with_channel();
        state.sessions.sign_in(session_for(user_id));
        state.sync_session();
        (state, rx)
    }

    #[test]
    fn load_tasks_without_session_issues_nothing() {
        let (mut state, rx) = state_with_channel();
        state.load_tasks();
        assert!(rx.try_recv().is_err());
        assert!(state.get_tasks().tasks().is_empty());
        assert!(!state.get_tasks().is_loading());
    }

    #[test]
    fn sign_in_mounts_task_list() {
        let (_state, rx) = signed_in("user-1");
        match rx.try_recv() {
            Ok(NetworkEvent::LoadTasks { user_id, .. }) => assert_eq!(user_id, "user-1"),
            other => panic!("expected task load, got {:?}", other),
        }
    }

    #[test]
    fn refresh_for_same_user_does_not_reload() {
        let (mut state, rx) = signed_in("user-1");
        let _ = rx.try_recv();
        state.sessions.refresh(session_for("user-1"));
        state.sync_session();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn sign_out_unmounts_task_list() {
        let (mut state, rx) = signed_in("user-1");
        let token = match rx.try_recv() {
            Ok(NetworkEvent::LoadTasks { token, .. }) => token,
            other => panic!("expected task load, got {:?}", other),
        };
        state.apply_tasks_loaded(token, Ok(vec![task_for("user-1")]));
        assert_eq!(state.get_tasks().tasks().len(), 1);

        state.sessions.sign_out();
        state.sync_session();
        assert!(state.get_tasks().tasks().is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn failed_load_alerts() {
        let (mut state, rx) = signed_in("user-1");
        let token = match rx.try_recv() {
            Ok(NetworkEvent::LoadTasks { token, .. }) => token,
            other => panic!("expected task load, got {:?}", other),
        };
        state.apply_tasks_loaded(token, Err(BackendError::Other("offline".into())));
        assert_eq!(state.get_alert(), Some(&Alert::error("Failed to fetch tasks")));
        assert!(state.get_tasks().tasks().is_empty());
    }

    #[test]
    fn whitespace_title_raises_validation_alert() {
        let (mut state, rx) = signed_in("user-1");
        let _ = rx.try_recv();
        state.tasks().open_create();
        state.tasks().modal().add_title_char(' ');
        state.save_task_modal();
        assert_eq!(state.get_alert(), Some(&Alert::error("Title is required")));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn create_dispatches_raw_values() {
        let (mut state, rx) = signed_in("user-1");
        let _ = rx.try_recv();
        state.tasks().open_create();
        for c in "Buy milk".chars() {
            state.tasks().modal().add_title_char(c);
        }
        state.save_task_modal();
        match rx.try_recv() {
            Ok(NetworkEvent::CreateTask {
                user_id,
                title,
                description,
            }) => {
                assert_eq!(user_id, "user-1");
                assert_eq!(title, "Buy milk");
                assert_eq!(description, "");
            }
            other => panic!("expected create, got {:?}", other),
        }
        assert!(state.get_tasks().modal_target().is_some());
    }

    #[test]
    fn created_task_prepended_and_modal_closed() {
        let (mut state, _rx) = signed_in("user-1");
        state.tasks().open_create();
        let mut task = task_for("user-1");
        task.status = "pending".to_string();
        state.apply_task_created(Ok(task.clone()));
        assert_eq!(state.get_tasks().tasks()[0], task);
        assert!(state.get_tasks().modal_target().is_none());
    }

    #[test]
    fn failed_create_keeps_modal_and_list() {
        let (mut state, _rx) = signed_in("user-1");
        state.tasks().open_create();
        state.apply_task_created(Err(BackendError::Other("denied".into())));
        assert_eq!(state.get_alert(), Some(&Alert::error("Failed to create task")));
        assert!(state.get_tasks().tasks().is_empty());
        assert_eq!(state.get_tasks().modal_target(), Some(&ModalTarget::Create));
    }

    #[test]
    fn task_from_previous_session_is_ignored() {
        let (mut state, _rx) = signed_in("user-1");
        state.apply_task_created(Ok(task_for("user-2")));
        assert!(state.get_tasks().tasks().is_empty());
    }

    #[test]
    fn edit_dispatches_update_for_target() {
        let (mut state, rx) = signed_in("user-1");
        let token = match rx.try_recv() {
            Ok(NetworkEvent::LoadTasks { token, .. }) => token,
            other => panic!("expected task load, got {:?}", other),
        };
        let task = task_for("user-1");
        state.apply_tasks_loaded(token, Ok(vec![task.clone()]));
        state.tasks().open_edit();
        state.tasks().modal().add_title_char('!');
        state.save_task_modal();
        match rx.try_recv() {
            Ok(NetworkEvent::UpdateTask { id, title, .. }) => {
                assert_eq!(id, task.id);
                assert_eq!(title, format!("{}!", task.title));
            }
            other => panic!("expected update, got {:?}", other),
        }

        let mut updated = task.clone();
        updated.title = "Done".into();
        state.apply_task_updated(&task.id, Ok(updated.clone()));
        assert_eq!(state.get_tasks().tasks(), &[updated][..]);
        assert!(state.get_tasks().modal_target().is_none());
    }

    #[test]
    fn delete_waits_for_confirmation_and_success() {
        let (mut state, rx) = signed_in("user-1");
        let token = match rx.try_recv() {
            Ok(NetworkEvent::LoadTasks { token, .. }) => token,
            other => panic!("expected task load, got {:?}", other),
        };
        let tasks = vec![task_for("user-1"), task_for("user-1")];
        state.apply_tasks_loaded(token, Ok(tasks.clone()));

        state.tasks().request_delete();
        assert!(rx.try_recv().is_err());
        state.confirm_delete_task();
        let id = match rx.try_recv() {
            Ok(NetworkEvent::DeleteTask { id }) => id,
            other => panic!("expected delete, got {:?}", other),
        };
        assert_eq!(id, tasks[0].id);
        assert_eq!(state.get_tasks().tasks().len(), 2);

        state.apply_task_deleted(&id, Err(BackendError::Other("denied".into())));
        assert_eq!(state.get_tasks().tasks().len(), 2);
        assert_eq!(state.get_alert(), Some(&Alert::error("Failed to delete task")));

        state.apply_task_deleted(&id, Ok(()));
        assert_eq!(state.get_tasks().tasks(), &tasks[1..]);
    }

    #[test]
    fn category_change_refetches_with_filter() {
        let (mut state, rx) = state_with_channel();
        state.open_menu();
        assert!(matches!(
            rx.try_recv(),
            Ok(NetworkEvent::FetchMenu {
                category: Category::All,
                ..
            })
        ));
        state.next_category();
        assert!(matches!(
            rx.try_recv(),
            Ok(NetworkEvent::FetchMenu {
                category: Category::Breakfast,
                ..
            })
        ));
        assert_eq!(*state.current_screen(), Screen::Menu);
        assert_eq!(state.view_stack_len(), 2);
    }

    #[test]
    fn selecting_meal_navigates_by_id() {
        let (mut state, rx) = state_with_channel();
        state.open_menu();
        let token = match rx.try_recv() {
            Ok(NetworkEvent::FetchMenu { token, .. }) => token,
            other => panic!("expected menu fetch, got {:?}", other),
        };
        let item: MenuItem = Faker.fake();
        state.apply_menu(token, Ok(vec![item.clone()]));
        state.open_selected_meal();
        assert_eq!(
            *state.current_screen(),
            Screen::MenuDetail {
                id: item.id.clone()
            }
        );
        match rx.try_recv() {
            Ok(NetworkEvent::FetchMenuItem { token, id }) => {
                assert_eq!(id, item.id);
                state.apply_meal(token, Err(BackendError::NotFound("Meal")));
            }
            other => panic!("expected menu item fetch, got {:?}", other),
        }
        assert_eq!(state.get_detail().status().error(), Some("Meal not found"));
    }

    #[test]
    fn home_is_never_popped() {
        let mut state = State::default();
        assert_eq!(state.pop_screen(), None);
        state.push_screen(Screen::Menu);
        assert_eq!(state.pop_screen(), Some(Screen::Menu));
        assert_eq!(*state.current_screen(), Screen::Home);
    }

    #[test]
    fn submit_auth_dispatches_once() {
        let (mut state, rx) = state_with_channel();
        for c in "a@b.c".chars() {
            state.auth_form().add_char(c);
        }
        state.auth_form().next_field().add_char('x');
        state.submit_auth();
        state.submit_auth();
        assert!(matches!(rx.try_recv(), Ok(NetworkEvent::SignIn { .. })));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn advance_spinner_index() {
        let mut state = State::default();
        state.advance_spinner_index();
        assert_eq!(state.spinner_index, 1);
        for _ in 0..SPINNER_FRAME_COUNT {
            state.advance_spinner_index();
        }
        assert_eq!(state.spinner_index, 1);
    }

    #[test]
    fn log_buffer_is_capped() {
        let mut state = State::default();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            state.add_log_entry(format!("entry {}", i));
        }
        assert_eq!(state.get_debug_entries().len(), MAX_LOG_ENTRIES);
        assert_eq!(state.get_debug_entries()[0], "entry 5");
    }
}
