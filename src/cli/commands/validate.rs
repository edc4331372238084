//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Blindfold configuration file.

use crate::cli::{exit_code, EXIT_CONFIGURATION};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIGURATION);
            }
        };

        match config.client.to_client_config() {
            Ok(client) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                println!("  Base URL: {}", client.base_url());
                println!(
                    "  Region: {}",
                    client.region().map_or("default", |r| r.as_str())
                );
                println!("  Timeout: {:.1}s", client.timeout().as_secs_f64());
                println!("  User ID: {}", client.user_id().unwrap_or("(none)"));
                println!("  Max Retries: {}", client.max_retries());
                println!("  Retry Delay: {:.2}s", client.retry_delay().as_secs_f64());
                println!("  Log Level: {}", config.logging.level);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(exit_code(&e))
            }
        }
    }
}
