//! Blocking `reqwest` transport

use super::{default_headers, endpoint_url, HttpRequest, RawResponse, Transport, USER_AGENT};
use crate::config::ClientConfig;
use crate::domain::{BlindfoldError, Result, TransportError};
use reqwest::blocking::{Client, ClientBuilder};

/// Transport backed by `reqwest::blocking::Client`
///
/// The connection pool is released when the transport is dropped. The blocking
/// client must not be created or dropped from within an async runtime; use
/// [`AsyncHttpTransport`](super::AsyncHttpTransport) there.
#[derive(Debug)]
pub struct BlockingHttpTransport {
    base_url: String,
    client: Client,
}

impl BlockingHttpTransport {
    /// Create a transport from client configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the headers are invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(config.timeout())
            .default_headers(default_headers(config)?)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BlindfoldError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            client,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for BlockingHttpTransport {
    fn send(&self, request: &HttpRequest<'_>) -> std::result::Result<RawResponse, TransportError> {
        let url = endpoint_url(&self.base_url, request.endpoint);

        let mut builder = self.client.request(request.method.as_reqwest(), &url);
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let body = response.text()?;

        Ok(RawResponse { status, body })
    }
}
