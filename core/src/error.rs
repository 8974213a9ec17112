//! Rejection normalization.
//!
//! Every failed operation ends up as a single human-readable string in
//! [`AsyncState::error`](crate::AsyncState::error). The string is chosen with
//! a fixed precedence:
//!
//! 1. the server-supplied message nested in the response body
//! 2. the rejection's own message
//! 3. the fallback literal supplied by the operation
//!
//! Empty or whitespace-only messages count as absent, so the result is never
//! empty as long as the fallback is not.

use serde_json::Value;

/// A value an operation can reject with
///
/// Implemented by the API client's error type and by raw JSON payloads
/// (`{"response": {"data": {"message": ...}}, "message": ...}`).
pub trait Rejection {
    /// Message the server put in the response body, if a response arrived
    fn response_message(&self) -> Option<&str>;

    /// Message describing the failure itself
    fn message(&self) -> Option<&str>;
}

/// Extract the message to store for a rejected operation
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use studydesk_core::error_message;
///
/// let nested = json!({ "response": { "data": { "message": "X" } }, "message": "Y" });
/// assert_eq!(error_message(&nested, "fallback"), "X");
///
/// let plain = json!({ "message": "Y" });
/// assert_eq!(error_message(&plain, "fallback"), "Y");
///
/// assert_eq!(error_message(&json!({}), "fallback"), "fallback");
/// ```
#[must_use]
pub fn error_message<R>(rejection: &R, fallback: &str) -> String
where
    R: Rejection + ?Sized,
{
    rejection
        .response_message()
        .filter(|message| !message.trim().is_empty())
        .or_else(|| {
            rejection
                .message()
                .filter(|message| !message.trim().is_empty())
        })
        .unwrap_or(fallback)
        .to_string()
}

impl Rejection for Value {
    fn response_message(&self) -> Option<&str> {
        self.pointer("/response/data/message").and_then(Value::as_str)
    }

    fn message(&self) -> Option<&str> {
        self.get("message").and_then(Value::as_str)
    }
}

impl<R: Rejection + ?Sized> Rejection for Box<R> {
    fn response_message(&self) -> Option<&str> {
        (**self).response_message()
    }

    fn message(&self) -> Option<&str> {
        (**self).message()
    }
}
