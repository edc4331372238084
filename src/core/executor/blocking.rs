//! Blocking request executor

use super::handle_response;
use crate::adapters::http::{HttpMethod, HttpRequest, Transport};
use crate::core::retry::backoff::{JitterSource, RandomJitter};
use crate::core::retry::{RetryPolicy, RetryState, Transition};
use crate::domain::{BlindfoldError, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Wait primitive of the blocking executor
pub trait Sleeper: Send + Sync {
    /// Blocks the calling thread for `duration`
    fn sleep(&self, duration: Duration);
}

/// Sleeps with `std::thread::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Executes logical calls with retry and backoff, blocking the calling thread
///
/// # Example
///
/// ```no_run
/// use blindfold::adapters::http::{BlockingHttpTransport, HttpMethod};
/// use blindfold::config::ClientConfig;
/// use blindfold::core::executor::RequestExecutor;
/// use serde_json::json;
///
/// # fn example() -> blindfold::domain::Result<()> {
/// let config = ClientConfig::builder("my-api-key").build()?;
/// let transport = BlockingHttpTransport::new(&config)?;
/// let executor = RequestExecutor::new(transport, config.retry_policy());
///
/// let body = json!({"text": "John Doe called"});
/// let response = executor.execute(HttpMethod::Post, "/detect", Some(&body))?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    jitter: Arc<dyn JitterSource>,
}

impl RequestExecutor {
    /// Create an executor sleeping on the current thread with random jitter
    pub fn new(transport: impl Transport + 'static, policy: RetryPolicy) -> Self {
        Self {
            transport: Arc::new(transport),
            policy,
            sleeper: Arc::new(ThreadSleeper),
            jitter: Arc::new(RandomJitter),
        }
    }

    /// Replace the wait primitive
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Arc::new(sleeper);
        self
    }

    /// Replace the jitter source
    pub fn with_jitter(mut self, jitter: impl JitterSource + 'static) -> Self {
        self.jitter = Arc::new(jitter);
        self
    }

    /// Retry policy in use
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Performs one logical call and returns the parsed JSON body
    ///
    /// # Errors
    ///
    /// - [`BlindfoldError::Authentication`] on 401/403, never retried
    /// - [`BlindfoldError::Api`] on other failing statuses, retried for 429/5xx
    /// - [`BlindfoldError::Network`] on transport failures, retried for
    ///   connection errors and timeouts
    pub fn execute(&self, method: HttpMethod, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        let request = HttpRequest {
            method,
            endpoint,
            body,
        };
        let mut state = RetryState::new(self.policy.max_retries);

        loop {
            tracing::debug!(
                method = %method,
                endpoint = endpoint,
                attempt = state.attempt(),
                "Sending request"
            );

            let error = match self.attempt(&request) {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match state.on_failure(&error, self.policy.retry_delay, self.jitter.as_ref()) {
                Transition::Retry { delay } => {
                    crate::log_retry_attempt!(state.attempt(), state.max_retries(), delay, &error);
                    self.sleeper.sleep(delay);
                }
                Transition::Fail => {
                    crate::log_request_failure!(endpoint, state.attempt(), &error);
                    return Err(error);
                }
            }
        }
    }

    fn attempt(&self, request: &HttpRequest<'_>) -> Result<Value> {
        let response = self
            .transport
            .send(request)
            .map_err(BlindfoldError::network)?;
        handle_response(response)
    }
}

impl std::fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("policy", &self.policy)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::executor::testing::{
        ok, refused, status, timed_out, RecordingSleeper, ScriptedTransport,
    };
    use crate::core::retry::backoff::FixedJitter;
    use crate::domain::TransportError;
    use serde_json::json;

    fn executor(
        transport: &ScriptedTransport,
        max_retries: u32,
        retry_delay: Duration,
    ) -> (RequestExecutor, RecordingSleeper) {
        let sleeper = RecordingSleeper::default();
        let executor = RequestExecutor::new(
            transport.clone(),
            RetryPolicy::new(max_retries, retry_delay),
        )
        .with_sleeper(sleeper.clone())
        .with_jitter(FixedJitter(0.0));
        (executor, sleeper)
    }

    fn post(executor: &RequestExecutor) -> Result<Value> {
        executor.execute(HttpMethod::Post, "/tokenize", Some(&json!({"text": "test"})))
    }

    #[test]
    fn test_success_first_attempt() {
        let transport = ScriptedTransport::always(ok(r#"{"text":"ok"}"#));
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        let value = post(&executor).unwrap();
        assert_eq!(value["text"], "ok");
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.waits().is_empty());
        assert_eq!(
            transport.requests()[0],
            ("/tokenize".to_string(), Some(json!({"text": "test"})))
        );
    }

    #[test]
    fn test_network_error_then_success() {
        let transport = ScriptedTransport::new([refused(), ok(r#"{"text":"ok"}"#)]);
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        assert_eq!(post(&executor).unwrap()["text"], "ok");
        assert_eq!(transport.calls(), 2);
        assert_eq!(sleeper.waits().len(), 1);
    }

    #[test]
    fn test_rate_limit_then_success() {
        let transport = ScriptedTransport::new([
            status(429, r#"{"detail":"Rate limited"}"#),
            ok(r#"{"text":"ok"}"#),
        ]);
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        assert_eq!(post(&executor).unwrap()["text"], "ok");
        assert_eq!(transport.calls(), 2);
        assert_eq!(sleeper.waits(), vec![Duration::from_millis(10)]);
    }

    #[test]
    fn test_server_errors_retried() {
        for code in [500, 502, 503, 504] {
            let transport = ScriptedTransport::new([
                status(code, r#"{"detail":"Error"}"#),
                ok(r#"{"text":"ok"}"#),
            ]);
            let (executor, _) = executor(&transport, 1, Duration::from_millis(10));

            assert!(post(&executor).is_ok(), "status {code}");
            assert_eq!(transport.calls(), 2, "status {code}");
        }
    }

    #[test]
    fn test_exhausted_network_retries() {
        let transport = ScriptedTransport::always(refused());
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        let err = post(&executor).unwrap_err();
        assert!(matches!(
            err,
            BlindfoldError::Network {
                source: TransportError::Connect(_),
                ..
            }
        ));
        assert_eq!(transport.calls(), 3);
        assert_eq!(sleeper.waits().len(), 2);
    }

    #[test]
    fn test_timeouts_retried_until_exhausted() {
        let transport = ScriptedTransport::always(timed_out());
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        let err = post(&executor).unwrap_err();
        assert!(matches!(
            err,
            BlindfoldError::Network {
                source: TransportError::Timeout(_),
                ..
            }
        ));
        assert!(err.is_retryable());
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            sleeper.waits(),
            vec![Duration::from_millis(10), Duration::from_millis(20)]
        );
    }

    #[test]
    fn test_timeout_then_success() {
        let transport = ScriptedTransport::new([timed_out(), ok(r#"{"text":"ok"}"#)]);
        let (executor, _) = executor(&transport, 1, Duration::from_millis(10));

        assert_eq!(post(&executor).unwrap()["text"], "ok");
        assert_eq!(transport.calls(), 2);
    }

    #[test]
    fn test_no_retry_on_authentication_error() {
        let transport = ScriptedTransport::always(status(401, r#"{"detail":"Unauthorized"}"#));
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        let err = post(&executor).unwrap_err();
        assert!(matches!(err, BlindfoldError::Authentication(_)));
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[test]
    fn test_no_retry_on_bad_request() {
        let transport = ScriptedTransport::always(status(400, r#"{"detail":"Bad request"}"#));
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        let err = post(&executor).unwrap_err();
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[test]
    fn test_no_retry_on_unexpected_failure() {
        let transport = ScriptedTransport::always(Err(TransportError::Unexpected(
            "Something weird".to_string(),
        )));
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        let err = post(&executor).unwrap_err();
        assert!(err.to_string().contains("Unexpected error"));
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[test]
    fn test_retries_disabled() {
        let transport = ScriptedTransport::always(refused());
        let (executor, sleeper) = executor(&transport, 0, Duration::from_millis(10));

        assert!(post(&executor).is_err());
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[test]
    fn test_exponential_backoff_waits() {
        let transport = ScriptedTransport::always(refused());
        let (executor, sleeper) = executor(&transport, 2, Duration::from_secs(1));

        assert!(post(&executor).is_err());
        assert_eq!(
            sleeper.waits(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let transport = ScriptedTransport::new([
            status(429, r#"{"detail":"Rate limited","retry_after":5}"#),
            ok(r#"{"text":"ok"}"#),
        ]);
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        assert!(post(&executor).is_ok());
        assert_eq!(sleeper.waits(), vec![Duration::from_secs(5)]);
    }

    #[test]
    fn test_exhausted_rate_limit_keeps_body() {
        let transport = ScriptedTransport::always(status(
            429,
            r#"{"detail":"Rate limited","retry_after":60}"#,
        ));
        let (executor, _) = executor(&transport, 0, Duration::from_millis(10));

        let err = post(&executor).unwrap_err();
        assert_eq!(
            err.response_body(),
            Some(&json!({"detail": "Rate limited", "retry_after": 60}))
        );
    }

    #[test]
    fn test_unparseable_success_not_retried() {
        let transport = ScriptedTransport::always(ok("not json"));
        let (executor, _) = executor(&transport, 2, Duration::from_millis(10));

        let err = post(&executor).unwrap_err();
        assert_eq!(err.status_code(), Some(200));
        assert_eq!(transport.calls(), 1);
    }
}
