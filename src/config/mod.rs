//! Client configuration
//!
//! A [`ClientConfig`] holds everything a client needs to talk to the API: the
//! API key, the resolved base URL, the per-attempt timeout, the optional user
//! id and the retry settings.
//!
//! # Quick Start
//!
//! ```rust
//! use blindfold::config::ClientConfig;
//! use std::time::Duration;
//!
//! # fn example() -> blindfold::Result<()> {
//! let config = ClientConfig::builder("my-api-key")
//!     .region("us")
//!     .max_retries(3)
//!     .retry_delay(Duration::from_millis(250))
//!     .build()?;
//!
//! println!("Using {}", config.base_url());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File
//!
//! The command-line tool reads `blindfold.toml`:
//!
//! ```toml
//! [client]
//! api_key = "${BLINDFOLD_API_KEY}"
//! region = "eu"
//! timeout_seconds = 30.0
//! user_id = "auditor-7"
//! max_retries = 2
//! retry_delay_seconds = 0.5
//!
//! [logging]
//! level = "info"
//! json = false
//! ```
//!
//! `${VAR_NAME}` placeholders are replaced from the environment, then
//! `BLINDFOLD_*` variables override individual settings.

pub mod loader;
pub mod region;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use region::{resolve_base_url, Region, DEFAULT_BASE_URL, EU_BASE_URL, US_BASE_URL};
pub use schema::{
    BlindfoldConfig, ClientConfig, ClientConfigBuilder, ClientSettings, LoggingConfig,
    DEFAULT_TIMEOUT,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
