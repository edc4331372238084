//! Backoff computation
//!
//! The wait before re-attempting a call is `retry_delay * 2^attempt` plus up to
//! 10% jitter. A rate-limited response that names its own `retry_after` wait
//! overrides the computed value, without jitter.

use crate::domain::BlindfoldError;
use rand::Rng;
use std::fmt::Debug;
use std::time::Duration;

/// Fraction of the exponential wait added as jitter at most
pub const JITTER_FACTOR: f64 = 0.1;

/// Source of jitter samples in `[0, 1)`
pub trait JitterSource: Debug + Send + Sync {
    /// Draws the next sample
    fn sample(&self) -> f64;
}

/// Uniform jitter from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJitter;

impl JitterSource for RandomJitter {
    fn sample(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// Constant jitter, mainly for deterministic waits in tests
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&self) -> f64 {
        self.0
    }
}

/// Exponential wait for a 0-based attempt index with the given jitter sample
///
/// Samples outside `[0, 1]` are clamped. A zero base delay always waits zero.
/// Waits too large to represent saturate at [`Duration::MAX`].
///
/// ```
/// use blindfold::core::retry::backoff::exponential_backoff;
/// use std::time::Duration;
///
/// let base = Duration::from_secs(1);
/// assert_eq!(exponential_backoff(base, 0, 0.0), Duration::from_secs(1));
/// assert_eq!(exponential_backoff(base, 1, 0.0), Duration::from_secs(2));
/// ```
pub fn exponential_backoff(retry_delay: Duration, attempt: u32, jitter: f64) -> Duration {
    if retry_delay.is_zero() {
        return Duration::ZERO;
    }

    let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
    let wait = retry_delay.as_secs_f64() * 2f64.powi(exponent);
    let jitter = if jitter.is_finite() {
        jitter.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let total = wait + wait * JITTER_FACTOR * jitter;

    Duration::try_from_secs_f64(total).unwrap_or(Duration::MAX)
}

/// Wait before the next attempt after `error` failed attempt `attempt`
pub fn compute_delay(
    error: &BlindfoldError,
    retry_delay: Duration,
    attempt: u32,
    jitter: &dyn JitterSource,
) -> Duration {
    match error.retry_after() {
        Some(wait) => wait,
        None => exponential_backoff(retry_delay, attempt, jitter.sample()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rate_limited(body: serde_json::Value) -> BlindfoldError {
        BlindfoldError::Api {
            message: "Rate limited".to_string(),
            status_code: 429,
            response_body: Some(body),
        }
    }

    #[test]
    fn test_backoff_doubles_per_attempt() {
        let base = Duration::from_secs_f64(1.0);
        assert_eq!(exponential_backoff(base, 0, 0.0), Duration::from_secs_f64(1.0));
        assert_eq!(exponential_backoff(base, 1, 0.0), Duration::from_secs_f64(2.0));
        assert_eq!(exponential_backoff(base, 2, 0.0), Duration::from_secs_f64(4.0));
    }

    #[test]
    fn test_jitter_adds_at_most_ten_percent() {
        let base = Duration::from_millis(500);
        let max = exponential_backoff(base, 1, 1.0);
        assert_eq!(max, Duration::from_millis(1100));

        let half = exponential_backoff(base, 1, 0.5);
        assert_eq!(half, Duration::from_millis(1050));
    }

    #[test]
    fn test_jitter_is_clamped() {
        let base = Duration::from_secs(1);
        assert_eq!(exponential_backoff(base, 0, -3.0), Duration::from_secs(1));
        assert_eq!(
            exponential_backoff(base, 0, f64::NAN),
            Duration::from_secs(1)
        );
        assert_eq!(
            exponential_backoff(base, 0, 7.0),
            Duration::from_millis(1100)
        );
    }

    #[test]
    fn test_huge_attempt_saturates() {
        let wait = exponential_backoff(Duration::from_secs(1), u32::MAX, 0.0);
        assert_eq!(wait, Duration::MAX);
    }

    #[test]
    fn test_zero_delay_never_waits() {
        assert_eq!(exponential_backoff(Duration::ZERO, 0, 1.0), Duration::ZERO);
        assert_eq!(exponential_backoff(Duration::ZERO, 1100, 0.0), Duration::ZERO);
        assert_eq!(exponential_backoff(Duration::ZERO, u32::MAX, 1.0), Duration::ZERO);
    }

    #[test]
    fn test_random_jitter_in_range() {
        let jitter = RandomJitter;
        for _ in 0..100 {
            let sample = jitter.sample();
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let error = rate_limited(json!({"retry_after": 5}));
        let delay = compute_delay(&error, Duration::from_secs(1), 3, &FixedJitter(0.9));
        assert_eq!(delay, Duration::from_secs(5));
    }

    #[test]
    fn test_rate_limit_without_retry_after_uses_backoff() {
        let error = rate_limited(json!({"detail": "Rate limited"}));
        let delay = compute_delay(&error, Duration::from_secs(1), 1, &FixedJitter(0.0));
        assert_eq!(delay, Duration::from_secs(2));
    }
}
