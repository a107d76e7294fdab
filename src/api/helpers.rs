//! Response builders for the `{statusCode, body}` envelope.
//!
//! `body` is always a JSON document encoded as a string.

use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::errors::OptOutError;

/// Returns a 200 OK response with `payload` as the JSON body.
#[must_use]
pub fn ok_json<T: Serialize>(payload: &T) -> Value {
    match serde_json::to_string(payload) {
        Ok(body) => json!({ "statusCode": 200, "body": body }),
        Err(e) => {
            error!("Failed to serialize response body: {}", e);
            err_response(500, &format!("Failed to serialize response: {e}"))
        }
    }
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "body": json!({ "error": message }).to_string()
    })
}

/// Maps an operation failure to its response. Client errors keep their
/// message as-is; everything else is prefixed with `context`.
#[must_use]
pub fn error_for(context: &str, err: &OptOutError) -> Value {
    let status = err.status_code();
    if status < 500 {
        err_response(status, &err.to_string())
    } else {
        err_response(status, &format!("{context}: {err}"))
    }
}
