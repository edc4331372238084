// Blindfold - PII Detection and Anonymization Client
// Copyright (c) 2025 Blindfold Contributors
// Licensed under the MIT License

//! # Blindfold - PII Detection and Anonymization Client
//!
//! Client library for the Blindfold API, which detects and anonymizes
//! personal data in free text.
//!
//! ## Overview
//!
//! This library provides:
//! - **Remote operations**: tokenize, detect, redact, mask, synthesize, hash and
//!   encrypt, each with a batch form
//! - **Local detokenization**: restoring original values from a token mapping
//!   without contacting the service
//! - **Resilient requests**: retries with exponential backoff and jitter,
//!   honoring the service's rate-limit hints
//! - **Regional endpoints**: EU and US data residency
//!
//! ## Architecture
//!
//! - [`client`] - blocking and async clients, one method per operation
//! - [`core`] - detokenization, retry state machine and request executors
//! - [`adapters`] - HTTP transports built on `reqwest`
//! - [`domain`] - error taxonomy and response models
//! - [`config`] - client configuration, regions and config files
//! - [`logging`] - structured logging setup
//! - [`cli`] - command-line interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blindfold::client::{AsyncBlindfold, CommonOptions};
//! use blindfold::config::ClientConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::builder("my-api-key").region("eu").build()?;
//!     let client = AsyncBlindfold::with_config(config)?;
//!
//!     let options = CommonOptions::default().with_policy("gdpr_eu");
//!     let response = client.tokenize("Hi, I'm John Doe", &options).await?;
//!     println!("{}", response.text);
//!
//!     // Send response.text to a third party, then restore the answer locally
//!     let restored = client.detokenize(&response.text, &response.mapping);
//!     println!("{}", restored.text);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible call returns [`Result`], with [`BlindfoldError`] distinguishing
//! authentication failures, API errors (with status code and body) and network
//! failures:
//!
//! ```rust,no_run
//! use blindfold::client::{Blindfold, CommonOptions};
//! use blindfold::BlindfoldError;
//!
//! # fn example(client: &Blindfold) {
//! match client.detect("Call me at 555-1234", &CommonOptions::default()) {
//!     Ok(response) => println!("{} entities", response.entities_count),
//!     Err(BlindfoldError::Authentication(msg)) => eprintln!("{msg}"),
//!     Err(e) => eprintln!("Request failed: {e}"),
//! }
//! # }
//! ```
//!
//! ## Logging
//!
//! The library emits `tracing` events; retries are logged at `warn`, final
//! failures at `error`. API keys and texts are never logged.

pub mod adapters;
pub mod cli;
pub mod client;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

pub use client::{AsyncBlindfold, Blindfold};
pub use config::ClientConfig;
pub use crate::core::detokenize;
pub use domain::{BlindfoldError, Result};
