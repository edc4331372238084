//! Domain error types
//!
//! Every public operation fails with a [`BlindfoldError`]. Remote calls only ever
//! surface the three call-time kinds (`Authentication`, `Api`, `Network`); the
//! `Configuration` kind is raised while building a client or loading settings,
//! before any request is attempted.
//!
//! Failures of the HTTP library are captured as [`TransportError`] so that no
//! `reqwest` type crosses the public boundary.

use crate::core::retry::RETRYABLE_STATUS_CODES;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Main Blindfold error type
#[derive(Debug, Error)]
pub enum BlindfoldError {
    /// Credentials were rejected by the service (HTTP 401 or 403)
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The service answered with a non-success status, or with a body that does
    /// not match the expected shape
    #[error("API error ({status_code}): {message}")]
    Api {
        /// Human-readable message extracted from the response
        message: String,
        /// HTTP status code of the response
        status_code: u16,
        /// Parsed JSON body (or the raw text as a JSON string) when available
        response_body: Option<Value>,
    },

    /// The service could not be reached, timed out, or the call failed unexpectedly
    #[error("Network error: {message}")]
    Network {
        /// Human-readable message
        message: String,
        /// Underlying transport failure
        #[source]
        source: TransportError,
    },

    /// Invalid client configuration or request options
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Transport-level failure reported by an HTTP transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request did not complete within the configured timeout
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other failure raised while performing the call
    #[error("{0}")]
    Unexpected(String),
}

impl TransportError {
    /// Whether the failure is transient and the call may be attempted again
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Connect(_) | TransportError::Timeout(_))
    }
}

impl BlindfoldError {
    /// Builds a network error from a transport failure
    ///
    /// Connection failures and timeouts keep the retryable message; anything
    /// else is reported as an unexpected error.
    pub fn network(source: TransportError) -> Self {
        let message = if source.is_transient() {
            format!(
                "Network request failed. Please check your connection and the API URL: {source}"
            )
        } else {
            format!("Unexpected error: {source}")
        };
        BlindfoldError::Network { message, source }
    }

    /// HTTP status code, if the error carries one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BlindfoldError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Response body attached to an API error
    pub fn response_body(&self) -> Option<&Value> {
        match self {
            BlindfoldError::Api { response_body, .. } => response_body.as_ref(),
            _ => None,
        }
    }

    /// Whether the executor may attempt the call again after this error
    pub fn is_retryable(&self) -> bool {
        match self {
            BlindfoldError::Api { status_code, .. } => {
                RETRYABLE_STATUS_CODES.contains(status_code)
            }
            BlindfoldError::Network { source, .. } => source.is_transient(),
            BlindfoldError::Authentication(_) | BlindfoldError::Configuration(_) => false,
        }
    }

    /// Server-provided wait for a rate-limited (429) response
    ///
    /// Returns the numeric `retry_after` field of the body, in seconds. Missing,
    /// non-numeric or negative values yield `None`.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            BlindfoldError::Api {
                status_code: 429,
                response_body: Some(body),
                ..
            } => body
                .get("retry_after")
                .and_then(Value::as_f64)
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
            _ => None,
        }
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BlindfoldError {
    fn from(err: toml::de::Error) -> Self {
        BlindfoldError::Configuration(format!("TOML parse error: {err}"))
    }
}
