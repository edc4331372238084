//! Core client logic
//!
//! - [`detokenize`] - offline token-to-value substitution
//! - [`retry`] - retry policy, per-call retry state and backoff
//! - [`executor`] - resilient request execution (blocking and async)

pub mod detokenize;
pub mod executor;
pub mod retry;

pub use detokenize::detokenize;
pub use executor::{AsyncRequestExecutor, RequestExecutor};
pub use retry::{RetryPolicy, RetryState, Transition};
