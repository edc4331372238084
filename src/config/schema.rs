//! Configuration schema types
//!
//! [`ClientConfig`] is the validated, immutable configuration a client is built
//! from. [`BlindfoldConfig`] maps to the TOML file used by the command-line
//! tool and converts into a `ClientConfig`.

use super::region::{resolve_with_region, Region, DEFAULT_BASE_URL};
use super::secret::{secret_string, SecretString};
use crate::core::retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use crate::domain::{BlindfoldError, Result};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Validated client configuration
///
/// Built with [`ClientConfig::builder`]; the base URL is already resolved
/// against the region, and an unknown region fails the build.
///
/// # Example
///
/// ```
/// use blindfold::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::builder("my-api-key")
///     .region("eu")
///     .timeout(Duration::from_secs(60))
///     .user_id("user-123")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.base_url(), "https://eu-api.blindfold.dev/api/public/v1");
/// assert_eq!(config.max_retries(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: SecretString,
    base_url: String,
    region: Option<Region>,
    timeout: Duration,
    user_id: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl ClientConfig {
    /// Start building a configuration for `api_key`
    pub fn builder(api_key: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder::new(api_key)
    }

    /// API key sent in the `X-API-Key` header
    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Resolved base URL, without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Region the client was configured with
    pub fn region(&self) -> Option<Region> {
        self.region
    }

    /// Per-attempt timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// User id sent for audit correlation
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Retries after the first attempt
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Base delay of the exponential backoff
    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    /// Retry policy derived from this configuration
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, self.retry_delay)
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    api_key: SecretString,
    base_url: String,
    region: Option<String>,
    timeout: Duration,
    user_id: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl ClientConfigBuilder {
    /// Builder with default settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: secret_string(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            region: None,
            timeout: DEFAULT_TIMEOUT,
            user_id: None,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Explicit base URL; overrides the region when it differs from the default
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Region code (`eu` or `us`, case-insensitive)
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// User id for audit correlation; empty values are ignored
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Retries after the first attempt
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Base delay of the exponential backoff
    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Validates the settings and resolves the base URL
    ///
    /// # Errors
    ///
    /// Returns [`BlindfoldError::Configuration`] if the API key is empty, the
    /// timeout is zero, the region is unknown or the base URL is not an
    /// http(s) URL.
    pub fn build(self) -> Result<ClientConfig> {
        if self.api_key.expose_secret().is_blank() {
            return Err(BlindfoldError::Configuration(
                "api_key cannot be empty".to_string(),
            ));
        }

        if self.timeout.is_zero() {
            return Err(BlindfoldError::Configuration(
                "timeout must be greater than zero".to_string(),
            ));
        }

        let region = self
            .region
            .as_deref()
            .map(str::parse::<Region>)
            .transpose()?;
        let base_url = resolve_with_region(&self.base_url, region);
        validate_base_url(&base_url)?;

        Ok(ClientConfig {
            api_key: self.api_key,
            base_url,
            region,
            timeout: self.timeout,
            user_id: self.user_id.filter(|id| !id.is_empty()),
            max_retries: self.max_retries,
            retry_delay: self.retry_delay,
        })
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = url::Url::parse(base_url).map_err(|e| {
        BlindfoldError::Configuration(format!("Invalid base_url '{base_url}': {e}"))
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(BlindfoldError::Configuration(format!(
            "base_url must use http or https, got '{scheme}'"
        ))),
    }
}

/// Root of the TOML configuration file
///
/// ```toml
/// [client]
/// api_key = "${BLINDFOLD_API_KEY}"
/// region = "eu"
/// timeout_seconds = 30.0
/// max_retries = 2
/// retry_delay_seconds = 0.5
///
/// [logging]
/// level = "info"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlindfoldConfig {
    /// Client settings
    #[serde(default)]
    pub client: ClientSettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BlindfoldConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> std::result::Result<(), String> {
        self.client.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// `[client]` section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    /// API key; may be left out when only detokenizing
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Base URL of the API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Region code (eu, us)
    #[serde(default)]
    pub region: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: f64,

    /// User id sent for audit correlation
    #[serde(default)]
    pub user_id: Option<String>,

    /// Retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay of the exponential backoff in seconds
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: f64,
}

impl ClientSettings {
    fn validate(&self) -> std::result::Result<(), String> {
        if !(self.timeout_seconds.is_finite() && self.timeout_seconds > 0.0) {
            return Err(format!(
                "client.timeout_seconds must be > 0, got {}",
                self.timeout_seconds
            ));
        }

        if !(self.retry_delay_seconds.is_finite() && self.retry_delay_seconds >= 0.0) {
            return Err(format!(
                "client.retry_delay_seconds must be >= 0, got {}",
                self.retry_delay_seconds
            ));
        }

        if let Some(ref region) = self.region {
            region.parse::<Region>().map_err(|e| e.to_string())?;
        }

        Ok(())
    }

    /// Builds a [`ClientConfig`] from these settings
    ///
    /// # Errors
    ///
    /// Returns a configuration error if no API key is set or any value is invalid.
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        self.validate().map_err(BlindfoldError::Configuration)?;

        let api_key = self.api_key.as_ref().ok_or_else(|| {
            BlindfoldError::Configuration(
                "client.api_key is required (set it in the config file or BLINDFOLD_API_KEY)"
                    .to_string(),
            )
        })?;

        let timeout = seconds_to_duration("client.timeout_seconds", self.timeout_seconds)?;
        let retry_delay =
            seconds_to_duration("client.retry_delay_seconds", self.retry_delay_seconds)?;

        let api_key: &str = api_key.expose_secret().as_ref();
        let mut builder = ClientConfig::builder(api_key)
            .base_url(self.base_url.clone())
            .timeout(timeout)
            .max_retries(self.max_retries)
            .retry_delay(retry_delay);

        if let Some(ref region) = self.region {
            builder = builder.region(region.clone());
        }
        if let Some(ref user_id) = self.user_id {
            builder = builder.user_id(user_id.clone());
        }

        builder.build()
    }
}

fn seconds_to_duration(field: &str, seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds).map_err(|e| {
        BlindfoldError::Configuration(format!("{field} is out of range ({seconds}): {e}"))
    })
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            region: None,
            timeout_seconds: default_timeout_seconds(),
            user_id: None,
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay_seconds(),
        }
    }
}

/// `[logging]` section of the configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit console logs as JSON
    #[serde(default)]
    pub json: bool,

    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> std::result::Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.to_lowercase().as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_seconds() -> f64 {
    DEFAULT_TIMEOUT.as_secs_f64()
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_delay_seconds() -> f64 {
    DEFAULT_RETRY_DELAY.as_secs_f64()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
