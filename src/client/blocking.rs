//! Blocking client

use super::options::{
    CommonOptions, EncryptOptions, HashOptions, MaskOptions, OperationOptions, RedactOptions,
    SynthesizeOptions,
};
use super::request::{build_payload, parse_model, Input, Operation};
use crate::adapters::http::{BlockingHttpTransport, HttpMethod};
use crate::config::ClientConfig;
use crate::core::executor::RequestExecutor;
use crate::domain::{
    BatchResponse, DetectResponse, DetokenizeResult, EncryptResponse, HashResponse, MaskResponse,
    RedactResponse, Result, SynthesizeResponse, TokenizeResponse,
};
use serde::de::DeserializeOwned;

/// Blocking client for the Blindfold API
///
/// Each call blocks the calling thread, including while waiting between
/// retries. Do not use it from inside an async runtime; use
/// [`AsyncBlindfold`](super::AsyncBlindfold) there.
///
/// # Example
///
/// ```no_run
/// use blindfold::client::{Blindfold, CommonOptions};
///
/// # fn example() -> blindfold::Result<()> {
/// let client = Blindfold::new("my-api-key")?;
///
/// let response = client.tokenize("John Doe called from 555-1234", &CommonOptions::default())?;
/// println!("{}", response.text);
///
/// let original = client.detokenize(&response.text, &response.mapping);
/// println!("{} ({} replacements)", original.text, original.replacements_made);
///
/// client.close();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Blindfold {
    config: ClientConfig,
    executor: RequestExecutor,
}

impl Blindfold {
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
        let transport = BlockingHttpTransport::new(&config)?;
        let executor = RequestExecutor::new(transport, config.retry_policy());

        tracing::debug!(
            base_url = config.base_url(),
            max_retries = config.max_retries(),
            "Created blocking client"
        );

        Ok(Self { config, executor })
    }

    /// Create a client around a prepared executor
    pub fn from_parts(config: ClientConfig, executor: RequestExecutor) -> Self {
        Self { config, executor }
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
    pub fn tokenize(&self, text: &str, options: &CommonOptions) -> Result<TokenizeResponse> {
        self.call(Operation::Tokenize, text, options)
    }

    /// Detect sensitive entities without modifying the text
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub fn detect(&self, text: &str, options: &CommonOptions) -> Result<DetectResponse> {
        self.call(Operation::Detect, text, options)
    }

    /// Redact (permanently remove) sensitive data
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub fn redact(&self, text: &str, options: &RedactOptions) -> Result<RedactResponse> {
        self.call(Operation::Redact, text, options)
    }

    /// Mask sensitive data, keeping a few characters visible
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub fn mask(&self, text: &str, options: &MaskOptions) -> Result<MaskResponse> {
        self.call(Operation::Mask, text, options)
    }

    /// Replace sensitive data with synthetic values
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub fn synthesize(&self, text: &str, options: &SynthesizeOptions) -> Result<SynthesizeResponse> {
        self.call(Operation::Synthesize, text, options)
    }

    /// Replace sensitive data with deterministic hashes
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub fn hash(&self, text: &str, options: &HashOptions) -> Result<HashResponse> {
        self.call(Operation::Hash, text, options)
    }

    /// Encrypt sensitive data
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the call fails.
    pub fn encrypt(&self, text: &str, options: &EncryptOptions) -> Result<EncryptResponse> {
        self.call(Operation::Encrypt, text, options)
    }

    /// Tokenize several texts in one request
    ///
    /// # Errors
    ///
    /// Returns an authentication, API or network error when the request fails.
    /// Per-item failures are reported inside the [`BatchResponse`].
    pub fn tokenize_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &CommonOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Tokenize, texts, options)
    }

    /// Detect entities in several texts in one request
    ///
    /// # Errors
    ///
    /// See [`Blindfold::tokenize_batch`].
    pub fn detect_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &CommonOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Detect, texts, options)
    }

    /// Redact several texts in one request
    ///
    /// # Errors
    ///
    /// See [`Blindfold::tokenize_batch`].
    pub fn redact_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &RedactOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Redact, texts, options)
    }

    /// Mask several texts in one request
    ///
    /// # Errors
    ///
    /// See [`Blindfold::tokenize_batch`].
    pub fn mask_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &MaskOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Mask, texts, options)
    }

    /// Synthesize several texts in one request
    ///
    /// # Errors
    ///
    /// See [`Blindfold::tokenize_batch`].
    pub fn synthesize_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &SynthesizeOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Synthesize, texts, options)
    }

    /// Hash several texts in one request
    ///
    /// # Errors
    ///
    /// See [`Blindfold::tokenize_batch`].
    pub fn hash_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &HashOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Hash, texts, options)
    }

    /// Encrypt several texts in one request
    ///
    /// # Errors
    ///
    /// See [`Blindfold::tokenize_batch`].
    pub fn encrypt_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: &EncryptOptions,
    ) -> Result<BatchResponse> {
        self.call_batch(Operation::Encrypt, texts, options)
    }

    /// Restore original values from a token mapping, locally
    ///
    /// No request is made.
    pub fn detokenize<'a, M, K, V>(&self, text: &str, mapping: M) -> DetokenizeResult
    where
        M: IntoIterator<Item = (&'a K, &'a V)>,
        K: AsRef<str> + ?Sized + 'a,
        V: AsRef<str> + ?Sized + 'a,
    {
        crate::core::detokenize(text, mapping)
    }

    /// Close the client and release its connection pool
    pub fn close(self) {
        tracing::debug!(base_url = self.config.base_url(), "Closing blocking client");
    }

    fn call<T, O>(&self, operation: Operation, text: &str, options: &O) -> Result<T>
    where
        T: DeserializeOwned,
        O: OperationOptions,
    {
        let body = build_payload(Input::Single(text), options)?;
        let value = self
            .executor
            .execute(HttpMethod::Post, operation.endpoint(), Some(&body))?;
        parse_model(value)
    }

    fn call_batch<S, O>(&self, operation: Operation, texts: &[S], options: &O) -> Result<BatchResponse>
    where
        S: AsRef<str>,
        O: OperationOptions,
    {
        let texts: Vec<&str> = texts.iter().map(AsRef::as_ref).collect();
        let body = build_payload(Input::Batch(&texts), options)?;
        let endpoint = operation.batch_endpoint();
        let value = self
            .executor
            .execute(HttpMethod::Post, endpoint, Some(&body))?;

        let response: BatchResponse = parse_model(value)?;
        crate::log_batch_summary!(endpoint, response.total, response.succeeded, response.failed);
        Ok(response)
    }
}
