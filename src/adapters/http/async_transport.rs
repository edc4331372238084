//! Async `reqwest` transport

use super::{
    default_headers, endpoint_url, AsyncTransport, HttpRequest, RawResponse, USER_AGENT,
};
use crate::config::ClientConfig;
use crate::domain::{BlindfoldError, Result, TransportError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};

/// Transport backed by `reqwest::Client`
///
/// Network waits yield to the tokio runtime. Cloning the underlying client is
/// cheap; the pool is released once the last clone is dropped.
#[derive(Debug, Clone)]
pub struct AsyncHttpTransport {
    base_url: String,
    client: Client,
}

impl AsyncHttpTransport {
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

#[async_trait]
impl AsyncTransport for AsyncHttpTransport {
    async fn send(
        &self,
        request: &HttpRequest<'_>,
    ) -> std::result::Result<RawResponse, TransportError> {
        let url = endpoint_url(&self.base_url, request.endpoint);

        let mut builder = self.client.request(request.method.as_reqwest(), &url);
        if let Some(body) = request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
