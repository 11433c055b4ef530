//! Form editing state types.
//!
//! This module contains the sign-in/sign-up form shown by the auth gate and
//! the reusable task edit modal used for both creating and editing tasks.

use super::error::StateError;
use crossterm::event::KeyEvent;
use tui_textarea::TextArea;

/// Specifying auth form fields.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AuthField {
    Email,
    Password,
}

/// Specifying whether the auth form signs in or registers.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AuthMode {
    SignIn,
    SignUp,
}

/// Email/password form state for the auth gate.
///
#[derive(Debug, Clone)]
pub struct AuthForm {
    email: String,
    password: String,
    field: AuthField,
    mode: AuthMode,
    error: Option<String>,
    notice: Option<String>,
    submitting: bool,
}

impl Default for AuthForm {
    fn default() -> Self {
        AuthForm {
            email: String::new(),
            password: String::new(),
            field: AuthField::Email,
            mode: AuthMode::SignIn,
            error: None,
            notice: None,
            submitting: false,
        }
    }
}

impl AuthForm {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn field(&self) -> AuthField {
        self.field
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Append a character to the focused field, clearing any prior error.
    ///
    pub fn add_char(&mut self, c: char) -> &mut Self {
        self.error = None;
        match self.field {
            AuthField::Email => self.email.push(c),
            AuthField::Password => self.password.push(c),
        }
        self
    }

    pub fn backspace(&mut self) -> &mut Self {
        self.error = None;
        match self.field {
            AuthField::Email => self.email.pop(),
            AuthField::Password => self.password.pop(),
        };
        self
    }

    pub fn next_field(&mut self) -> &mut Self {
        self.field = match self.field {
            AuthField::Email => AuthField::Password,
            AuthField::Password => AuthField::Email,
        };
        self
    }

    pub fn toggle_mode(&mut self) -> &mut Self {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.error = None;
        self.notice = None;
        self
    }

    /// Validate and mark the form as submitting. Returns the trimmed email
    /// and the password.
    ///
    pub fn submit(&mut self) -> Result<(String, String), StateError> {
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            self.error = Some(StateError::CredentialsRequired.to_string());
            return Err(StateError::CredentialsRequired);
        }
        self.error = None;
        self.notice = None;
        self.submitting = true;
        Ok((email.to_string(), self.password.clone()))
    }

    /// Record a failed submission.
    ///
    pub fn fail(&mut self, message: String) -> &mut Self {
        self.submitting = false;
        self.error = Some(message);
        self
    }

    /// Record a submission that needs the user to act elsewhere first.
    ///
    pub fn notify(&mut self, message: String) -> &mut Self {
        self.submitting = false;
        self.password.clear();
        self.notice = Some(message);
        self
    }

    /// Reset everything but the mode.
    ///
    pub fn clear(&mut self) -> &mut Self {
        let mode = self.mode;
        *self = AuthForm {
            mode,
            ..AuthForm::default()
        };
        self
    }
}

/// Specifying task edit modal fields.
///
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ModalField {
    Title,
    Description,
}

/// Reusable overlay form for creating and editing tasks.
///
/// The modal never closes itself. Its owner decides visibility and feeds the
/// initial values of the current target through `set_initial`.
///
pub struct TaskEditModal {
    title: String,
    description: TextArea<'static>,
    field: ModalField,
    initial: (String, String),
}

impl Default for TaskEditModal {
    fn default() -> Self {
        TaskEditModal {
            title: String::new(),
            description: TextArea::default(),
            field: ModalField::Title,
            initial: (String::new(), String::new()),
        }
    }
}

impl TaskEditModal {
    /// Re-initialize the fields when the initial values differ from the last
    /// ones seen.
    ///
    pub fn set_initial(&mut self, title: &str, description: &str) -> &mut Self {
        if self.initial.0 != title || self.initial.1 != description {
            self.initial = (title.to_string(), description.to_string());
            self.title = title.to_string();
            self.description = TextArea::from(description.lines());
            self.field = ModalField::Title;
        }
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description with lines joined by newlines.
    ///
    pub fn description(&self) -> String {
        self.description.lines().join("\n")
    }

    pub fn description_textarea(&mut self) -> &mut TextArea<'static> {
        &mut self.description
    }

    pub fn field(&self) -> ModalField {
        self.field
    }

    pub fn next_field(&mut self) -> &mut Self {
        self.field = match self.field {
            ModalField::Title => ModalField::Description,
            ModalField::Description => ModalField::Title,
        };
        self
    }

    pub fn add_title_char(&mut self, c: char) -> &mut Self {
        self.title.push(c);
        self
    }

    pub fn remove_title_char(&mut self) -> &mut Self {
        self.title.pop();
        self
    }

    /// Forward a key press to the description text area.
    ///
    pub fn input_description(&mut self, key: KeyEvent) -> bool {
        self.description.input(key)
    }

    /// Validate the title and hand the raw values to `on_save`, then clear the
    /// fields. Whitespace-only titles are rejected without invoking the
    /// callback.
    ///
    pub fn save<F: FnOnce(String, String)>(&mut self, on_save: F) -> Result<(), StateError> {
        if self.title.trim().is_empty() {
            return Err(StateError::TitleRequired);
        }
        on_save(self.title.clone(), self.description());
        self.title.clear();
        self.description = TextArea::default();
        self.field = ModalField::Title;
        Ok(())
    }
}
