//! Logging and observability
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the application. The command-line tool uses [`init_logging`], which supports:
//! - human-readable or JSON console output
//! - configurable log levels
//! - local file logging with rotation
//!
//! API keys and request texts are never logged.
//!
//! # Example
//!
//! ```no_run
//! use blindfold::logging::init_logging;
//! use blindfold::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use blindfold::log_retry_attempt;
/// use std::time::Duration;
///
/// log_retry_attempt!(1, 2, Duration::from_millis(500), "API request failed with status 503");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_retries:expr, $delay:expr, $error:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_retries = $max_retries,
            delay_ms = $delay.as_millis() as u64,
            error = %$error,
            "Retrying request"
        );
    };
}

/// Log a request that failed for good
///
/// # Example
///
/// ```no_run
/// use blindfold::log_request_failure;
///
/// log_request_failure!("/tokenize", 3, "Authentication failed. Please check your API key.");
/// ```
#[macro_export]
macro_rules! log_request_failure {
    ($endpoint:expr, $attempts:expr, $error:expr) => {
        tracing::error!(
            endpoint = $endpoint,
            attempts = $attempts,
            error = %$error,
            "Request failed"
        );
    };
}

/// Log a batch summary
///
/// # Example
///
/// ```no_run
/// use blindfold::log_batch_summary;
///
/// log_batch_summary!("/tokenize/batch", 10, 9, 1);
/// ```
#[macro_export]
macro_rules! log_batch_summary {
    ($endpoint:expr, $total:expr, $succeeded:expr, $failed:expr) => {
        tracing::info!(
            endpoint = $endpoint,
            total = $total,
            succeeded = $succeeded,
            failed = $failed,
            "Batch completed"
        );
    };
}
