//! The `{ code, message, result }` response envelope.

use crate::error::ApiError;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// `code` of a successful envelope
pub const SUCCESS_CODE: i32 = 1000;

/// Message used when a failed envelope carries none
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Every backend response body
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// Application status code; [`SUCCESS_CODE`] on success
    pub code: i32,
    /// Human-readable status message
    #[serde(default)]
    pub message: String,
    /// Payload, absent for operations without one
    pub result: Option<T>,
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Parse an envelope out of a response body
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body is not an envelope of `T`.
    pub fn decode(body: serde_json::Value) -> Result<Self, ApiError> {
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl<T> Envelope<T> {
    /// Whether the envelope reports success
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Fail with the envelope message unless `code` is the success code
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] for a logical failure.
    pub fn check(&self) -> Result<(), ApiError> {
        if self.is_success() {
            return Ok(());
        }

        let message = if self.message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            self.message.clone()
        };
        tracing::debug!(code = self.code, %message, "Envelope reported failure");

        Err(ApiError::Api {
            status: 200,
            message,
        })
    }

    /// Unwrap the payload of a successful envelope
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] for a logical failure and
    /// [`ApiError::Decode`] when a successful envelope has no `result`.
    pub fn into_result(self) -> Result<T, ApiError> {
        self.check()?;
        self.result
            .ok_or_else(|| ApiError::Decode("envelope has no result".to_string()))
    }
}

/// Decode a body and unwrap its payload in one step
///
/// # Errors
///
/// See [`Envelope::decode`] and [`Envelope::into_result`].
pub fn unwrap_result<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    Envelope::<T>::decode(body)?.into_result()
}

/// Decode a body that carries no payload and check its code
///
/// # Errors
///
/// See [`Envelope::decode`] and [`Envelope::check`].
pub fn unwrap_unit(body: serde_json::Value) -> Result<(), ApiError> {
    Envelope::<serde_json::Value>::decode(body)?.check()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_yields_result() {
        let value: u32 = unwrap_result(json!({ "code": 1000, "message": "", "result": 4 }))
            .unwrap_or_default();
        assert_eq!(value, 4);
    }

    #[test]
    fn logical_failure_carries_message() {
        let error = unwrap_result::<u32>(json!({ "code": 1002, "message": "User not found" }));
        assert_eq!(
            error,
            Err(ApiError::Api {
                status: 200,
                message: "User not found".to_string()
            })
        );
    }

    #[test]
    fn logical_failure_without_message_is_generic() {
        let error = unwrap_result::<u32>(json!({ "code": 9999, "message": "" }));
        assert_eq!(
            error,
            Err(ApiError::Api {
                status: 200,
                message: DEFAULT_FAILURE_MESSAGE.to_string()
            })
        );
    }

    #[test]
    fn unit_envelope_accepts_null_result() {
        assert_eq!(unwrap_unit(json!({ "code": 1000, "result": null })), Ok(()));
        assert_eq!(unwrap_unit(json!({ "code": 1000 })), Ok(()));
    }

    #[test]
    fn missing_result_is_a_decode_error() {
        assert!(matches!(
            unwrap_result::<u32>(json!({ "code": 1000 })),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn non_envelope_body_is_a_decode_error() {
        assert!(matches!(
            unwrap_result::<u32>(json!("maintenance")),
            Err(ApiError::Decode(_))
        ));
    }
}
