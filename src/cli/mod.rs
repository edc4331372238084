//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Blindfold using clap.

pub mod commands;

use crate::config::{load_config, ClientConfig};
use crate::domain::{BlindfoldError, Result};
use clap::{Parser, Subcommand};
use std::path::Path;

/// Exit code for configuration and input errors
pub const EXIT_CONFIGURATION: i32 = 2;
/// Exit code for authentication failures
pub const EXIT_AUTHENTICATION: i32 = 3;
/// Exit code for API errors
pub const EXIT_API: i32 = 4;
/// Exit code for network and other fatal errors
pub const EXIT_FATAL: i32 = 5;

/// Blindfold - PII detection and anonymization from the command line
#[derive(Parser, Debug)]
#[command(name = "blindfold")]
#[command(version, about, long_about = None)]
#[command(author = "Blindfold Contributors")]
pub struct Cli {
    /// Path to configuration file; BLINDFOLD_* variables are used when it does not exist
    #[arg(short, long, default_value = "blindfold.toml", env = "BLINDFOLD_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "BLINDFOLD_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace sensitive data with reversible tokens
    Tokenize(commands::anonymize::TextArgs),

    /// Detect sensitive entities
    Detect(commands::anonymize::TextArgs),

    /// Permanently remove sensitive data
    Redact(commands::anonymize::RedactArgs),

    /// Partially hide sensitive data
    Mask(commands::anonymize::MaskArgs),

    /// Replace sensitive data with synthetic values
    Synthesize(commands::anonymize::SynthesizeArgs),

    /// Replace sensitive data with deterministic hashes
    Hash(commands::anonymize::HashArgs),

    /// Encrypt sensitive data
    Encrypt(commands::anonymize::EncryptArgs),

    /// Restore original values from a token mapping (offline)
    Detokenize(commands::detokenize::DetokenizeArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}

/// Maps an error to the process exit code
pub fn exit_code(error: &BlindfoldError) -> i32 {
    match error {
        BlindfoldError::Configuration(_) => EXIT_CONFIGURATION,
        BlindfoldError::Authentication(_) => EXIT_AUTHENTICATION,
        BlindfoldError::Api { .. } => EXIT_API,
        BlindfoldError::Network { .. } => EXIT_FATAL,
    }
}

/// Client configuration from the config file, or from `BLINDFOLD_*`
/// variables when the file does not exist
pub fn resolve_client_config(config_path: &str) -> Result<ClientConfig> {
    if Path::new(config_path).exists() {
        load_config(config_path)?.client.to_client_config()
    } else {
        tracing::debug!(
            config_path = %config_path,
            "Configuration file not found, using environment"
        );
        ClientConfig::from_env()
    }
}
