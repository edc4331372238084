//! HTTP transport layer
//!
//! The request executor talks to the service through the [`Transport`] and
//! [`AsyncTransport`] traits. Each transport owns an immutable connection
//! handle (base URL, timeout, authentication headers) built once from the
//! client configuration; pooled connections are released when it is dropped.
//!
//! Two `reqwest` implementations are provided:
//! - [`BlockingHttpTransport`] for the blocking client
//! - [`AsyncHttpTransport`] for the async client

pub mod async_transport;
pub mod blocking;

pub use async_transport::AsyncHttpTransport;
pub use blocking::BlockingHttpTransport;

use crate::config::ClientConfig;
use crate::domain::{BlindfoldError, Result, TransportError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use secrecy::ExposeSecret;
use serde_json::Value;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Header carrying the optional user id used for audit correlation
pub const USER_ID_HEADER: &str = "X-Blindfold-User-Id";

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("blindfold-rust/", env!("CARGO_PKG_VERSION"));

/// HTTP method of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// POST
    Post,
}

impl HttpMethod {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// A single request, relative to the transport's base URL
#[derive(Debug, Clone, Copy)]
pub struct HttpRequest<'a> {
    /// HTTP method
    pub method: HttpMethod,
    /// Endpoint path, e.g. `/tokenize`
    pub endpoint: &'a str,
    /// Optional JSON body
    pub body: Option<&'a Value>,
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Create a raw response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parses the body as JSON
    pub fn json(&self) -> serde_json::Result<Value> {
        serde_json::from_str(&self.body)
    }
}

/// Blocking transport: the calling thread waits for the response
pub trait Transport: Send + Sync {
    /// Performs one attempt of the request
    fn send(&self, request: &HttpRequest<'_>) -> std::result::Result<RawResponse, TransportError>;
}

/// Async transport: waiting yields to the runtime
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Performs one attempt of the request
    async fn send(
        &self,
        request: &HttpRequest<'_>,
    ) -> std::result::Result<RawResponse, TransportError>;
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Unexpected(err.to_string())
        }
    }
}

/// Headers attached to every request of a client
fn default_headers(config: &ClientConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();

    let mut api_key = HeaderValue::from_str(config.api_key().expose_secret().as_ref())
        .map_err(|_| {
            BlindfoldError::Configuration("api_key contains invalid header characters".to_string())
        })?;
    api_key.set_sensitive(true);
    headers.insert(API_KEY_HEADER, api_key);

    if let Some(user_id) = config.user_id() {
        let value = HeaderValue::from_str(user_id).map_err(|_| {
            BlindfoldError::Configuration("user_id contains invalid header characters".to_string())
        })?;
        headers.insert(USER_ID_HEADER, value);
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}

fn endpoint_url(base_url: &str, endpoint: &str) -> String {
    format!("{}/{}", base_url, endpoint.trim_start_matches('/'))
}
