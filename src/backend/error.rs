//! Typed errors for backend calls and form validation

use thiserror::Error;

/// Everything that can go wrong between a screen and the backend.
///
/// Callers branch on the kind, not on message text. Only `Http { status: 401 }`
/// gets special treatment (token eviction + redirect to login); every other
/// kind surfaces as a flash message and leaves the screen state alone.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure: DNS, refused connection, timeout.
    #[error("backend unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response; `message` is the backend's JSON `message` field when
    /// present, otherwise the HTTP status text.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// 2xx response whose body failed to decode.
    #[error("unexpected response from backend: {0}")]
    Parse(String),

    /// Console-side form validation failure, raised before any network call.
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
}

impl ClientError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for HTTP 401, the one status that evicts the session.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Http { status: 401, .. })
    }

    /// Best available message for the flash toast, with a generic fallback
    /// when there is nothing better to show.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Could not reach the K360 backend".to_string(),
            Self::Http { message, .. } if !message.is_empty() => message.clone(),
            Self::Http { status, .. } => format!("Request failed with status {}", status),
            Self::Parse(_) => "The backend returned an unexpected response".to_string(),
            Self::Validation { field, message } => format!("{}: {}", field, message),
        }
    }
}
