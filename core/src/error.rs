//! Error types for the game-backend client.
//!
//! # Design
//! Failures are split by where they originate. `Configuration` and
//! `Serialization` are raised locally before any I/O. `Transport` covers
//! the network round trip itself. `Remote` carries a structured error the
//! backend chose to return, and is the only kind handed to the client's
//! error handler. `Decode` means a response arrived but matched neither the
//! success nor the error shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shorthand for the result of every backend operation.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by `Invoker` and every `ServerClient` operation.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// A required setting (secret key, title id) is missing. Raised before
    /// any network request is attempted.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The HTTP round trip did not complete.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The backend answered with an error envelope.
    #[error(transparent)]
    Remote(RemoteError),

    /// The response body matched neither the success nor the error envelope.
    #[error("could not decode response (HTTP {status}): {reason}")]
    Decode { status: u16, reason: String },

    /// The blocking worker behind an async call could not run or finish.
    #[error("worker failed: {0}")]
    Worker(String),
}

impl ApiError {
    /// The remote error, if the backend declared one.
    pub fn as_remote(&self) -> Option<&RemoteError> {
        match self {
            ApiError::Remote(err) => Some(err),
            _ => None,
        }
    }
}

/// Network-level failure: connection refused, DNS, timeout, truncated body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Structured error returned by the backend.
///
/// Field names follow the backend's error envelope. `code` is the HTTP code
/// the server reports; when the envelope omits it the invoker fills in the
/// response status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{error} ({error_code}): {error_message}")]
pub struct RemoteError {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: String,
    pub error_code: u32,
    #[serde(default)]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_details: Option<BTreeMap<String, Vec<String>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_decodes_full_envelope() {
        let body = r#"{
            "code": 400,
            "status": "BadRequest",
            "error": "InvalidParams",
            "errorCode": 1000,
            "errorMessage": "Invalid input parameters",
            "errorDetails": {"PlayerId": ["The PlayerId field is required."]}
        }"#;
        let err: RemoteError = serde_json::from_str(body).unwrap();
        assert_eq!(err.code, 400);
        assert_eq!(err.error, "InvalidParams");
        assert_eq!(err.error_code, 1000);
        let details = err.error_details.unwrap();
        assert_eq!(details["PlayerId"], vec!["The PlayerId field is required."]);
    }

    #[test]
    fn remote_error_requires_error_code() {
        let result: Result<RemoteError, _> =
            serde_json::from_str(r#"{"status":"error","errorMessage":"boom"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn display_includes_label_and_code() {
        let err = ApiError::Remote(RemoteError {
            code: 400,
            status: "BadRequest".to_string(),
            error: "AccountNotFound".to_string(),
            error_code: 1001,
            error_message: "User not found".to_string(),
            error_details: None,
        });
        assert_eq!(err.to_string(), "AccountNotFound (1001): User not found");
        assert_eq!(err.as_remote().map(|e| e.error_code), Some(1001));
    }

    #[test]
    fn transport_error_converts_into_api_error() {
        let err: ApiError = TransportError::new("connection refused").into();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.as_remote().is_none());
        assert_eq!(err.to_string(), "transport failed: connection refused");
    }
}
