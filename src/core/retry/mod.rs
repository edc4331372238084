//! Retry policy and per-call retry state
//!
//! A logical call moves through `Attempting(0) .. Attempting(max_retries)` and
//! ends in either success or a terminal failure. [`RetryState`] owns the
//! attempt counter for one call and decides, after each failed attempt, whether
//! to wait and try again or to give up. It never performs I/O itself, so the
//! transition logic can be exercised without a transport.

pub mod backoff;

use crate::domain::BlindfoldError;
use backoff::{compute_delay, JitterSource};
use std::time::Duration;

/// HTTP statuses treated as transient
pub const RETRYABLE_STATUS_CODES: [u16; 5] = [429, 500, 502, 503, 504];

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default base delay for exponential backoff
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Retry settings shared by every call of a client
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt (total attempts = `max_retries + 1`)
    pub max_retries: u32,

    /// Base delay of the exponential backoff
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Create a retry policy
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Policy that never retries
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY)
    }
}

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Wait for `delay`, then run the next attempt
    Retry {
        /// Wait before the next attempt
        delay: Duration,
    },
    /// Stop and surface the error
    Fail,
}

/// Attempt counter for one logical call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_retries: u32,
}

impl RetryState {
    /// Fresh state in `Attempting(0)`
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempt: 0,
            max_retries,
        }
    }

    /// Index of the current attempt (0-based)
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Retries allowed for this call
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Whether the retry budget is used up
    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_retries
    }

    /// Decides the transition after the current attempt failed with `error`
    ///
    /// Non-retryable errors and an exhausted budget are terminal. Otherwise the
    /// state advances to the next attempt and the backoff wait is returned.
    pub fn on_failure(
        &mut self,
        error: &BlindfoldError,
        retry_delay: Duration,
        jitter: &dyn JitterSource,
    ) -> Transition {
        if !error.is_retryable() || self.is_exhausted() {
            return Transition::Fail;
        }

        let delay = compute_delay(error, retry_delay, self.attempt, jitter);
        self.attempt += 1;
        Transition::Retry { delay }
    }
}
