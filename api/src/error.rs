//! Error types for the StudyDesk API client

use studydesk_core::Rejection;
use thiserror::Error;

/// Errors that can occur when talking to the StudyDesk backend
///
/// Every variant carries a human-readable message, so a rejected operation
/// never needs the slice's fallback unless the server sent a blank one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response reached the client (connection refused, DNS, TLS, timeout)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The server answered with a failure
    ///
    /// Either a non-2xx status or an envelope whose `code` is not the success
    /// code. `message` is the envelope message, or `HTTP <status>` when the
    /// body carried none.
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the server
        message: String,
    },

    /// The response body did not have the expected shape
    #[error("Response parsing failed: {0}")]
    Decode(String),

    /// A field could not be projected into a domain record
    #[error("Unexpected value: {0}")]
    Mapping(String),

    /// The call needs a live session and the client has none
    #[error("Not signed in: {0}")]
    Unauthenticated(String),
}

impl ApiError {
    /// Build the error for a non-2xx response from its raw body
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_owned)
            })
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));

        Self::Api { status, message }
    }

    /// HTTP status of a server-side failure
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Transport(_) | Self::Decode(_) | Self::Mapping(_) | Self::Unauthenticated(_) => {
                None
            },
        }
    }
}

impl Rejection for ApiError {
    fn response_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => Some(message),
            Self::Transport(_) | Self::Decode(_) | Self::Mapping(_) | Self::Unauthenticated(_) => {
                None
            },
        }
    }

    fn message(&self) -> Option<&str> {
        match self {
            Self::Transport(message)
            | Self::Decode(message)
            | Self::Mapping(message)
            | Self::Unauthenticated(message) => Some(message),
            Self::Api { message, .. } => Some(message),
        }
    }
}
