//! Bounded retry with exponential backoff.
//!
//! Drives the attempt loop for fallible operations: classify the failure,
//! bail out on caller errors, otherwise wait (without blocking the runtime)
//! and try again until the retry budget runs out.

use crate::classify::{classify, ClassifiedError, Failure};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Upper bound on the random jitter added to each backoff delay, in
/// milliseconds. Jitter spreads out simultaneous retries from many tasks.
pub const MAX_JITTER_MS: u64 = 200;

/// Parameters governing the retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt; a value of 3 means up to 4
    /// attempts total.
    pub max_retries: u32,

    /// Delay before the first retry. Doubles on each subsequent retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry budget and base delay.
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before the retry following attempt number `attempt` (0-based):
    /// `base_delay * 2^attempt` plus up to [`MAX_JITTER_MS`] of jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        let backoff = self.base_delay.saturating_mul(factor);
        let jitter = rand::rng().random_range(0..=MAX_JITTER_MS);
        backoff.saturating_add(Duration::from_millis(jitter))
    }
}

/// Run `operation` until it succeeds, the failure is non-retryable, or the
/// retry budget is exhausted.
///
/// On each failure the error is classified; statuses in
/// [`crate::NO_RETRY_STATUSES`] surface immediately with no further
/// attempts. Otherwise the task suspends for the backoff delay and tries
/// again. After `policy.max_retries` retries, the last attempt's classified
/// error is surfaced.
///
/// The delay is an awaited timer, so no thread is parked while waiting.
pub async fn retry_with_backoff<F, Fut, T>(
    operation: F,
    policy: RetryPolicy,
) -> Result<T, ClassifiedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    retry_with_backoff_cancellable(operation, policy, &CancellationToken::new()).await
}

/// [`retry_with_backoff`] with an abort signal.
///
/// Cancellation is observed between attempts: a cancel that fires during the
/// backoff delay stops the loop and surfaces the last classified error. An
/// attempt already in flight is not interrupted.
pub async fn retry_with_backoff_cancellable<F, Fut, T>(
    mut operation: F,
    policy: RetryPolicy,
    cancel: &CancellationToken,
) -> Result<T, ClassifiedError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Failure>>,
{
    let mut attempt: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(failure) => {
                let classified = classify(failure);

                if !classified.is_retryable() || attempt >= policy.max_retries {
                    return Err(classified);
                }

                tracing::debug!(
                    status = classified.status,
                    attempt,
                    max_retries = policy.max_retries,
                    "operation failed, backing off before retry"
                );

                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::debug!(attempt, "retry loop cancelled during backoff");
                        return Err(classified);
                    }
                    _ = tokio::time::sleep(policy.delay_for(attempt)) => {}
                }

                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_error() -> Failure {
        Failure::Response {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            body: None,
        }
    }

    fn bad_request() -> Failure {
        Failure::Response {
            status: 400,
            status_text: "Bad Request".to_string(),
            body: Some(json!({"message": "missing field"})),
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(10))
    }

    #[tokio::test]
    async fn test_persistent_server_error_attempted_four_times() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(
            || {
                let attempts = &attempts;
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(server_error())
                }
            },
            fast_policy(),
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 4);
        let err = result.unwrap_err();
        assert_eq!(err.status, 500);
    }

    #[tokio::test]
    async fn test_client_error_attempted_once() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(
            || {
                let attempts = &attempts;
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(bad_request())
                }
            },
            fast_policy(),
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        let err = result.unwrap_err();
        assert_eq!(err.status, 400);
        assert_eq!(err.message, "missing field");
    }

    #[tokio::test]
    async fn test_success_after_transient_failures() {
        let attempts = AtomicU32::new(0);
        let result = retry_with_backoff(
            || {
                let attempts = &attempts;
                async move {
                    if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(server_error())
                    } else {
                        Ok("recovered")
                    }
                }
            },
            fast_policy(),
        )
        .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_network_errors_are_retried() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(
            || {
                let attempts = &attempts;
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(Failure::Network)
                }
            },
            RetryPolicy::new(2, Duration::from_millis(5)),
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 3);
        assert!(result.unwrap_err().is_network_error());
    }

    #[tokio::test]
    async fn test_zero_retries_means_single_attempt() {
        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff(
            || {
                let attempts = &attempts;
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(server_error())
                }
            },
            RetryPolicy::new(0, Duration::from_millis(5)),
        )
        .await;

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancellation_stops_retry_loop() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let attempts = AtomicU32::new(0);
        let result: Result<(), _> = retry_with_backoff_cancellable(
            || {
                let attempts = &attempts;
                async move {
                    attempts.fetch_add(1, Ordering::SeqCst);
                    Err(server_error())
                }
            },
            RetryPolicy::new(5, Duration::from_secs(60)),
            &cancel,
        )
        .await;

        // One attempt runs, then the pre-cancelled token aborts the backoff
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(result.unwrap_err().status, 500);
    }

    #[test]
    fn test_delay_grows_exponentially() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        let jitter = Duration::from_millis(MAX_JITTER_MS);

        let d0 = policy.delay_for(0);
        assert!(d0 >= Duration::from_millis(100) && d0 <= Duration::from_millis(100) + jitter);

        let d2 = policy.delay_for(2);
        assert!(d2 >= Duration::from_millis(400) && d2 <= Duration::from_millis(400) + jitter);
    }

    #[test]
    fn test_delay_saturates_on_huge_attempt_numbers() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        // Must not panic or overflow
        let _ = policy.delay_for(64);
    }

    #[test]
    fn test_default_policy_matches_documented_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
    }
}
