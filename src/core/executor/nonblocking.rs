//! Async request executor

use super::handle_response;
use crate::adapters::http::{AsyncTransport, HttpMethod, HttpRequest};
use crate::core::retry::backoff::{JitterSource, RandomJitter};
use crate::core::retry::{RetryPolicy, RetryState, Transition};
use crate::domain::{BlindfoldError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Wait primitive of the async executor
#[async_trait]
pub trait AsyncSleeper: Send + Sync {
    /// Suspends the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeps with `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl AsyncSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Executes logical calls with retry and backoff on the tokio runtime
///
/// Retry semantics match [`RequestExecutor`](super::RequestExecutor). Each call
/// keeps its own retry state on the future's stack, so dropping the future
/// (e.g. via `tokio::time::timeout` or task abort) stops the call cleanly
/// without affecting other calls on the same executor.
///
/// The executor is cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct AsyncRequestExecutor {
    transport: Arc<dyn AsyncTransport>,
    policy: RetryPolicy,
    sleeper: Arc<dyn AsyncSleeper>,
    jitter: Arc<dyn JitterSource>,
}

impl AsyncRequestExecutor {
    /// Create an executor sleeping with tokio timers and random jitter
    pub fn new(transport: impl AsyncTransport + 'static, policy: RetryPolicy) -> Self {
        Self {
            transport: Arc::new(transport),
            policy,
            sleeper: Arc::new(TokioSleeper),
            jitter: Arc::new(RandomJitter),
        }
    }

    /// Replace the wait primitive
    pub fn with_sleeper(mut self, sleeper: impl AsyncSleeper + 'static) -> Self {
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
    /// Same classification as [`RequestExecutor::execute`](super::RequestExecutor::execute).
    pub async fn execute(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<Value> {
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

            let error = match self.attempt(&request).await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            match state.on_failure(&error, self.policy.retry_delay, self.jitter.as_ref()) {
                Transition::Retry { delay } => {
                    crate::log_retry_attempt!(state.attempt(), state.max_retries(), delay, &error);
                    self.sleeper.sleep(delay).await;
                }
                Transition::Fail => {
                    crate::log_request_failure!(endpoint, state.attempt(), &error);
                    return Err(error);
                }
            }
        }
    }

    async fn attempt(&self, request: &HttpRequest<'_>) -> Result<Value> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(BlindfoldError::network)?;
        handle_response(response)
    }
}

impl std::fmt::Debug for AsyncRequestExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRequestExecutor")
            .field("policy", &self.policy)
            .field("jitter", &self.jitter)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::RawResponse;
    use crate::core::executor::testing::{ok, refused, status, RecordingSleeper, ScriptedTransport};
    use crate::core::retry::backoff::FixedJitter;
    use crate::domain::TransportError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn executor(
        transport: &ScriptedTransport,
        max_retries: u32,
        retry_delay: Duration,
    ) -> (AsyncRequestExecutor, RecordingSleeper) {
        let sleeper = RecordingSleeper::default();
        let executor = AsyncRequestExecutor::new(
            transport.clone(),
            RetryPolicy::new(max_retries, retry_delay),
        )
        .with_sleeper(sleeper.clone())
        .with_jitter(FixedJitter(0.0));
        (executor, sleeper)
    }

    async fn post(executor: &AsyncRequestExecutor) -> Result<Value> {
        executor
            .execute(HttpMethod::Post, "/detect", Some(&json!({"text": "test"})))
            .await
    }

    #[tokio::test]
    async fn test_retry_then_success() {
        let transport = ScriptedTransport::new([
            status(503, r#"{"detail":"Unavailable"}"#),
            ok(r#"{"detected_entities":[],"entities_count":0}"#),
        ]);
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        let value = post(&executor).await.unwrap();
        assert_eq!(value["entities_count"], 0);
        assert_eq!(transport.calls(), 2);
        assert_eq!(sleeper.waits(), vec![Duration::from_millis(10)]);
    }

    #[tokio::test]
    async fn test_exhausted_retries() {
        let transport = ScriptedTransport::always(refused());
        let (executor, sleeper) = executor(&transport, 2, Duration::from_secs(1));

        let err = post(&executor).await.unwrap_err();
        assert!(matches!(err, BlindfoldError::Network { .. }));
        assert_eq!(transport.calls(), 3);
        assert_eq!(
            sleeper.waits(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_no_retry_on_forbidden() {
        let transport = ScriptedTransport::always(status(403, ""));
        let (executor, sleeper) = executor(&transport, 5, Duration::from_millis(10));

        let err = post(&executor).await.unwrap_err();
        assert!(matches!(err, BlindfoldError::Authentication(_)));
        assert_eq!(transport.calls(), 1);
        assert!(sleeper.waits().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_is_retried() {
        let transport = ScriptedTransport::new([
            Err(TransportError::Timeout("deadline".to_string())),
            ok("{}"),
        ]);
        let (executor, _) = executor(&transport, 1, Duration::from_millis(10));

        assert!(post(&executor).await.is_ok());
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_after_overrides_backoff() {
        let transport = ScriptedTransport::new([
            status(429, r#"{"retry_after":5}"#),
            ok("{}"),
        ]);
        let (executor, sleeper) = executor(&transport, 2, Duration::from_millis(10));

        assert!(post(&executor).await.is_ok());
        assert_eq!(sleeper.waits(), vec![Duration::from_secs(5)]);
    }

    /// Never answers; counts how many attempts were started
    struct HangingTransport(Arc<AtomicUsize>);

    #[async_trait]
    impl AsyncTransport for HangingTransport {
        async fn send(
            &self,
            _request: &HttpRequest<'_>,
        ) -> std::result::Result<RawResponse, TransportError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_cancellation_stops_the_call() {
        let started = Arc::new(AtomicUsize::new(0));
        let executor = AsyncRequestExecutor::new(
            HangingTransport(started.clone()),
            RetryPolicy::new(2, Duration::from_millis(1)),
        );

        let result = tokio::time::timeout(Duration::from_millis(50), post(&executor)).await;
        assert!(result.is_err());
        assert_eq!(started.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_calls_are_independent() {
        let transport = ScriptedTransport::always(ok(r#"{"text":"ok"}"#));
        let (executor, _) = executor(&transport, 2, Duration::from_millis(10));

        let (a, b, c) = tokio::join!(post(&executor), post(&executor), post(&executor));
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(transport.calls(), 3);
    }
}
