//! Navigation-related state types.

/// Specifying the different screens of the view stack.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Screen {
    /// Auth gate when signed out, task list when signed in.
    Home,
    Menu,
    MenuDetail { id: String },
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Menu => "Menu",
            Screen::MenuDetail { .. } => "Meal Details",
        }
    }
}

/// Blocking message shown over the current screen until dismissed.
///
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn error(message: &str) -> Self {
        Alert {
            title: "Error".to_string(),
            message: message.to_string(),
        }
    }
}
