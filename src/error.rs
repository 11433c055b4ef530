//! Application-wide error types.
//!
//! `AppError` covers the failures that reach startup: configuration and
//! logger installation. Backend and state errors are reported through the
//! log and alerts where they happen.

pub use crate::config::ConfigError;

/// Main application error type.
///
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
