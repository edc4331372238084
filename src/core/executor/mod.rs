//! Resilient request execution
//!
//! An executor turns one logical call into up to `max_retries + 1` strictly
//! sequential attempts over a transport:
//!
//! 1. send the request
//! 2. classify the outcome ([`handle_response`] for responses,
//!    [`BlindfoldError::network`] for transport failures)
//! 3. on failure, ask the call's [`RetryState`](crate::core::retry::RetryState)
//!    whether to wait and retry or to give up
//!
//! [`RequestExecutor`] blocks the calling thread; [`AsyncRequestExecutor`]
//! yields to the tokio runtime. Both share the classification and retry logic
//! in this module, so their semantics are identical.

pub mod blocking;
pub mod nonblocking;

pub use blocking::{RequestExecutor, Sleeper, ThreadSleeper};
pub use nonblocking::{AsyncRequestExecutor, AsyncSleeper, TokioSleeper};

use crate::adapters::http::RawResponse;
use crate::domain::{BlindfoldError, Result};
use serde_json::Value;

/// Classifies a response and parses its JSON body
///
/// - 401/403 become [`BlindfoldError::Authentication`]
/// - other non-2xx statuses become [`BlindfoldError::Api`], with the message taken
///   from the body's `detail` (preferred) or `message` field
/// - a 2xx body that is not JSON is an API error carrying the raw text
pub fn handle_response(response: RawResponse) -> Result<Value> {
    let status = response.status;

    if matches!(status, 401 | 403) {
        return Err(BlindfoldError::Authentication(
            "Authentication failed. Please check your API key.".to_string(),
        ));
    }

    if !response.is_success() {
        let default_message = format!("API request failed with status {status}");
        let (message, response_body) = match response.json() {
            Ok(body) => {
                let message = error_message(&body).unwrap_or(default_message);
                (message, Some(body))
            }
            Err(_) => (format!("{default_message}: {}", response.body), None),
        };

        return Err(BlindfoldError::Api {
            message,
            status_code: status,
            response_body,
        });
    }

    response.json().map_err(|e| BlindfoldError::Api {
        message: format!("Failed to parse response: {e}"),
        status_code: status,
        response_body: Some(Value::String(response.body)),
    })
}

fn error_message(body: &Value) -> Option<String> {
    ["detail", "message"]
        .iter()
        .filter_map(|field| body.get(*field).and_then(Value::as_str))
        .find(|message| !message.is_empty())
        .map(str::to_string)
}
