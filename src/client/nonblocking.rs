//! Async client

use super::options::{
    CommonOptions, EncryptOptions, HashOptions, MaskOptions, OperationOptions, RedactOptions,
    SynthesizeOptions,
};
use super::request::{build_payload, parse_model, Input, Operation};
use crate::adapters::http::{AsyncHttpTransport, HttpMethod};
use crate::config::ClientConfig;
use crate::core::executor::AsyncRequestExecutor;
use crate::domain::{
    BatchResponse, DetectResponse, DetokenizeResult, EncryptResponse, HashResponse, MaskResponse,
    RedactResponse, Result, SynthesizeResponse, TokenizeResponse,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Async client for the Blindfold API
///
/// Cloning is cheap and clones share one connection pool, so independent
/// calls can run concurrently. Each call owns its retry state; dropping a
/// call's future cancels it without retrying.
///
/// # Example
///
/// ```no_run
/// use blindfold::client::{AsyncBlindfold, CommonOptions, MaskOptions};
///
/// # async fn example() -> blindfold::Result<()> {
/// let client = AsyncBlindfold::new("my-api-key")?;
///
/// let detect_opts = CommonOptions::default();
/// let mask_opts = MaskOptions::default();
/// let (detected, masked) = tokio::join!(
///     client.detect("Call 555-1234", &detect_opts),
///     client.mask("Card 4111 1111 1111 1111", &mask_opts),
/// );
/// println!("{} entities", detected?.entities_count);
/// println!("{}", masked?.text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AsyncBlindfold {
    config: Arc<ClientConfig>,
    executor: AsyncRequestExecutor,
}

impl AsyncBlindfold {
    /// Create a client with default settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the API key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::builder(api_key).build()?)
    }

    /// Create a client from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP transport cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = AsyncHttpTransport::new(&config)?;
        let executor = AsyncRequestExecutor::new(transport, config.retry_policy());

        tracing::debug!(
            base_url = config.base_url(),
            max_retries = config.max_retries(),
            "Created async client"
        );

        Ok(Self::from_parts(config, executor))
    }

    /// Create a client around a prepared executor
    pub fn from_parts(config: ClientConfig, executor: AsyncRequestExecutor) -> Self {
        Self {
            config: Arc::new(config),
            executor,
        }
    }

    /// Configuration the client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolved base URL
    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Tokenize text, replacing sensitive data with reversible tokens
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub async fn tokenize(&self, text: &str, options: &CommonOptions) -> Result<TokenizeResponse> {
        self.call(Operation::Tokenize, text, options).await
    }

    /// Detect sensitive entities without modifying the text
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub async fn detect(&self, text: &str, options: &CommonOptions) -> Result<DetectResponse> {
        self.call(Operation::Detect, text, options).await
    }

    /// Redact (permanently remove) sensitive data
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub async fn redact(&self, text: &str, options: &RedactOptions) -> Result<RedactResponse> {
        self.call(Operation::Redact, text, options).await
    }

    /// Mask sensitive data, keeping a few characters visible
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub async fn mask(&self, text: &str, options: &MaskOptions) -> Result<MaskResponse> {
        self.call(Operation::Mask, text, options).await
    }

    /// Replace sensitive data with synthetic values
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub async fn synthesize(
        &self,
        text: &str,
        options: &SynthesizeOptions,
    ) -> Result<SynthesizeResponse> {
        self.call(Operation::Synthesize, text, options).await
    }

    /// Replace sensitive data with deterministic hashes
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub async fn hash(&self, text: &str, options: &HashOptions) -> Result<HashResponse> {
        self.call(Operation::Hash, text, options).await
    }

    /// Encrypt sensitive data
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub async fn encrypt(&self, text: &str, options: &EncryptOptions) -> Result<EncryptResponse> {
        self.call(Operation::Encrypt, text, options).await
    }

    /// Tokenize several texts in one request
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the request fails.
    /// Per-item failures are reported inside the [`BatchResponse`].
    pub async fn tokenize_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &CommonOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Tokenize, texts, options).await
    }

    /// Detect entities in several texts in one request
    ///
    /// # Errors
    ///
    /// See [`AsyncBlindfold::tokenize_batch`].
    pub async fn detect_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &CommonOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Detect, texts, options).await
    }

    /// Redact several texts in one request
    ///
    /// # Errors
    ///
    /// See [`AsyncBlindfold::tokenize_batch`].
    pub async fn redact_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &RedactOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Redact, texts, options).await
    }

    /// Mask several texts in one request
    ///
    /// # Errors
    ///
    /// See [`AsyncBlindfold::tokenize_batch`].
    pub async fn mask_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &MaskOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Mask, texts, options).await
    }

    /// Synthesize several texts in one request
    ///
    /// # Errors
    ///
    /// See [`AsyncBlindfold::tokenize_batch`].
    pub async fn synthesize_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &SynthesizeOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Synthesize, texts, options).await
    }

    /// Hash several texts in one request
    ///
    /// # Errors
    ///
    /// See [`AsyncBlindfold::tokenize_batch`].
    pub async fn hash_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &HashOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Hash, texts, options).await
    }

    /// Encrypt several texts in one request
    ///
    /// # Errors
    ///
    /// See [`AsyncBlindfold::tokenize_batch`].
    pub async fn encrypt_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &EncryptOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Encrypt, texts, options).await
    }

    /// Restore original values from a token mapping, locally
    ///
    /// Synchronous: no request is made and nothing is awaited.
    pub fn detokenize<'a, M, K, V>(&self, text: &str, mapping: M) -> DetokenizeResult
    where
        M: IntoIterator<Item = (&'a K, &'a V)>,
        K: AsRef<str> + ?Sized + 'a,
        V: AsRef<str> + ?Sized + 'a,
    {
        crate::core::detokenize(text, mapping)
    }

    /// Close this handle
    ///
    /// The connection pool is released once the last clone is closed or dropped.
    pub fn close(self) {
        tracing::debug!(base_url = self.config.base_url(), "Closing async client");
    }

    async fn call<T, O>(&self, operation: Operation, text: &str, options: &O) -> Result<T>
    where
        T: DeserializeOwned,
        O: OperationOptions + Sync,
    {
        let body = build_payload(Input::Single(text), options)?;
        let value = self
            .executor
            .execute(HttpMethod::Post, operation.endpoint(), Some(&body))
            .await?;
        parse_model(value)
    }

    async fn call_batch<S, O>(
        &self,
        operation: Operation,
        texts: &[S],
        options: &O,
    ) -> Result<BatchResponse>
    where
        S: AsRef<str>,
        O: OperationOptions + Sync,
    {
        let body = {
            let texts: Vec<&str> = texts.iter().map(AsRef::as_ref).collect();
            build_payload(Input::Batch(&texts), options)?
        };
        let endpoint = operation.batch_endpoint();
        let value = self
            .executor
            .execute(HttpMethod::Post, endpoint, Some(&body))
            .await?;

        let response: BatchResponse = parse_model(value)?;
        crate::log_batch_summary!(endpoint, response.total, response.succeeded, response.failed);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::testing::{ok, refused, status, RecordingSleeper, ScriptedTransport};
    use crate::core::retry::backoff::FixedJitter;
    use crate::domain::BlindfoldError;
    use serde_json::json;
    use std::time::Duration;

    const DETECT_BODY: &str = r#"{"detected_entities": [], "entities_count": 0}"#;

    fn client_with(transport: ScriptedTransport, max_retries: u32) -> (AsyncBlindfold, RecordingSleeper) {
        let config = ClientConfig::builder("test-key")
            .max_retries(max_retries)
            .retry_delay(Duration::from_secs(1))
            .build()
            .unwrap();
        let sleeper = RecordingSleeper::default();
        let executor = AsyncRequestExecutor::new(transport, config.retry_policy())
            .with_sleeper(sleeper.clone())
            .with_jitter(FixedJitter(0.0));
        (AsyncBlindfold::from_parts(config, executor), sleeper)
    }

    #[tokio::test]
    async fn test_detect() {
        let transport = ScriptedTransport::always(ok(
            r#"{"detected_entities": [{"entity_type": "email address", "text": "a@b.io", "start": 5, "end": 11, "score": 0.9}], "entities_count": 1}"#,
        ));
        let (client, _) = client_with(transport.clone(), 2);

        let response = client
            .detect("Mail a@b.io", &CommonOptions::default().with_score_threshold(0.5))
            .await
            .unwrap();
        assert_eq!(response.entities_count, 1);
        assert_eq!(response.detected_entities[0].end, 11);

        let (endpoint, body) = transport.requests().remove(0);
        assert_eq!(endpoint, "/detect");
        assert_eq!(
            body,
            Some(json!({"text": "Mail a@b.io", "score_threshold": 0.5}))
        );
    }

    #[tokio::test]
    async fn test_network_failure_exhausts_retries() {
        let transport = ScriptedTransport::always(refused());
        let (client, sleeper) = client_with(transport.clone(), 2);

        let err = client
            .detect("x", &CommonOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BlindfoldError::Network { .. }));
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            sleeper.waits(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_rate_limit_waits_retry_after() {
        let transport = ScriptedTransport::new([
            status(429, r#"{"detail": "Too many requests", "retry_after": 5}"#),
            ok(DETECT_BODY),
        ]);
        let (client, sleeper) = client_with(transport.clone(), 2);

        client.detect("x", &CommonOptions::default()).await.unwrap();
        assert_eq!(sleeper.waits(), vec![Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn test_clones_share_transport() {
        let transport = ScriptedTransport::always(ok(DETECT_BODY));
        let (client, _) = client_with(transport.clone(), 0);
        let other = client.clone();

        let opts = CommonOptions::default();
        let (a, b) = tokio::join!(
            client.detect("a", &opts),
            other.detect("b", &opts),
        );
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(transport.calls(), 2);
        other.close();
    }

    #[tokio::test]
    async fn test_encrypt_batch_payload() {
        let transport = ScriptedTransport::always(ok(
            r#"{"results": [], "total": 0, "succeeded": 0, "failed": 0}"#,
        ));
        let (client, _) = client_with(transport.clone(), 0);

        let texts = vec!["one".to_string(), "two".to_string()];
        client
            .encrypt_batch(&texts, &EncryptOptions::with_key("k"))
            .await
            .unwrap();

        let (endpoint, body) = transport.requests().remove(0);
        assert_eq!(endpoint, "/encrypt/batch");
        assert_eq!(
            body,
            Some(json!({"texts": ["one", "two"], "encryption_key": "k"}))
        );
    }

    #[tokio::test]
    async fn test_detokenize_without_await() {
        let (client, _) = client_with(ScriptedTransport::always(refused()), 0);
        let mut mapping = std::collections::HashMap::new();
        mapping.insert("<Person_1>", "Bob");
        mapping.insert("<Person_10>", "Charlie");

        let result = client.detokenize("<Person_1> and <Person_10> are friends", &mapping);
        assert_eq!(result.text, "Bob and Charlie are friends");
        assert_eq!(result.replacements_made, 2);
    }
}
