//! Backend-specific error types.

use serde::Deserialize;
use std::fmt;

/// Error body returned by the REST and auth services.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ApiErrorDetails {
    #[serde(default)]
    pub code: Option<serde_json::Value>,
    #[serde(default, alias = "msg", alias = "error_description")]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl fmt::Display for ApiErrorDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(message) = &self.message {
            parts.push(message.clone());
        }
        if let Some(details) = &self.details {
            parts.push(details.clone());
        }
        if let Some(hint) = &self.hint {
            parts.push(format!("hint: {}", hint));
        }
        match &self.code {
            Some(serde_json::Value::String(code)) => parts.push(format!("code {}", code)),
            Some(serde_json::Value::Null) | None => {}
            Some(code) => parts.push(format!("code {}", code)),
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Errors that can occur during backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Backend returned an error response
    #[error("API error (status {status}): {details}")]
    ApiError {
        status: u16,
        details: ApiErrorDetails,
    },

    /// Failed to deserialize backend response
    #[error("Failed to deserialize response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Query matched no rows
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Operation requires an authenticated session
    #[error("Not signed in")]
    MissingSession,

    /// Generic backend error
    #[error("Backend error: {0}")]
    Other(String),
}

impl BackendError {
    /// Build an API error from a status code and raw response body.
    ///
    pub fn from_response(status: u16, body: &str) -> Self {
        let details = serde_json::from_str::<ApiErrorDetails>(body)
            .ok()
            .filter(|d| d.message.is_some() || d.code.is_some())
            .unwrap_or_else(|| ApiErrorDetails {
                message: Some(body.trim().to_string()).filter(|m| !m.is_empty()),
                ..ApiErrorDetails::default()
            });
        BackendError::ApiError { status, details }
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = BackendError::NotFound("Meal");
        assert_eq!(error.to_string(), "Meal not found");
    }

    #[test]
    fn test_api_error_from_structured_body() {
        let body = r#"{"code":"42501","message":"permission denied for table tasks","details":null,"hint":null}"#;
        let error = BackendError::from_response(403, body);
        let error_str = error.to_string();
        assert!(error_str.contains("403"));
        assert!(error_str.contains("permission denied for table tasks"));
        assert!(error_str.contains("42501"));
    }

    #[test]
    fn test_api_error_from_auth_body() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        let error = BackendError::from_response(400, body);
        assert!(error.to_string().contains("Invalid login credentials"));
    }

    #[test]
    fn test_api_error_from_plain_body() {
        let error = BackendError::from_response(502, "Bad Gateway");
        assert!(error.to_string().contains("Bad Gateway"));
    }

    #[test]
    fn test_missing_session_display() {
        assert_eq!(BackendError::MissingSession.to_string(), "Not signed in");
    }
}
