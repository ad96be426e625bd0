//! Decoding of the backend's response envelope.
//!
//! Success: `{ "code", "status", "data" }`.
//! Failure: `{ "code", "status", "error", "errorCode", "errorMessage",
//! "errorDetails" }`.
//!
//! The body shape decides the outcome, not the HTTP status: a 200 carrying an
//! error envelope is a failure, and a 4xx whose body is not an envelope is a
//! decode error.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{ApiError, RemoteError};
use crate::http::HttpResponse;

/// Outcome of decoding one response body.
#[derive(Debug)]
pub enum Envelope<T> {
    Success(T),
    Failure(RemoteError),
}

/// Decode `response` into the success payload `T` or the backend's error.
///
/// # Errors
/// `ApiError::Decode` when the body is not JSON, not an object, or does not
/// fit either envelope.
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    let decode_error = |reason: String| ApiError::Decode {
        status: response.status,
        reason,
    };

    let value: Value = serde_json::from_str(&response.body)
        .map_err(|e| decode_error(format!("body is not JSON: {e}")))?;
    let Value::Object(mut fields) = value else {
        return Err(decode_error("body is not a JSON object".to_string()));
    };

    if is_error_shape(&fields) {
        let mut remote: RemoteError = serde_json::from_value(Value::Object(fields))
            .map_err(|e| decode_error(format!("malformed error envelope: {e}")))?;
        if remote.code == 0 {
            remote.code = response.status;
        }
        return Ok(Envelope::Failure(remote));
    }

    let data = fields
        .remove("data")
        .ok_or_else(|| decode_error("envelope has neither `data` nor `errorCode`".to_string()))?;
    serde_json::from_value(data)
        .map(Envelope::Success)
        .map_err(|e| decode_error(format!("unexpected `data` shape: {e}")))
}

// Serializers that emit every field send `"error": null` on success.
fn is_error_shape(fields: &Map<String, Value>) -> bool {
    ["errorCode", "error"]
        .iter()
        .any(|key| fields.get(*key).is_some_and(|value| !value.is_null()))
}
