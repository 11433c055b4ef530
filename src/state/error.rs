//! State management-specific error types.

/// Errors raised by client-side validation before any request is made.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// Task title missing or whitespace only
    #[error("Title is required")]
    TitleRequired,

    /// Email or password missing on the auth form
    #[error("Email and password are required")]
    CredentialsRequired,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        assert_eq!(StateError::TitleRequired.to_string(), "Title is required");
        assert!(StateError::CredentialsRequired
            .to_string()
            .contains("Email and password"));
    }
}
