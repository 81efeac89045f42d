//! Retry executor with linear backoff.
//!
//! Every remote call in the pipelines (embedding inference, vector-store I/O,
//! Git API calls) is expected to be wrapped by [`with_retry`]. The policy is
//! applied per call: up to `max_attempts` invocations, sleeping
//! `base_delay * attempt_number` between failures, and the last recorded
//! error re-raised once attempts are exhausted.
//!
//! [`with_retry_if`] takes a retryability predicate for operations whose
//! error type mixes transient failures with ones a retry cannot change
//! (malformed payloads, rejected input).

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// Per-call retry policy: bounded attempts with a linearly growing delay.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Maximum number of invocations (>= 1).
    pub max_attempts: u32,
    /// Delay before the second attempt; attempt `n` waits `base_delay * n`.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Backoff to apply after a failed attempt number `attempt` (1-based).
    fn backoff_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    /// Mirrors the pipeline defaults: 3 attempts, 2 s base delay.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// Runs `op` until it succeeds or the policy is exhausted.
///
/// On success at any attempt the result is returned immediately. On failure
/// the error is logged; if attempts remain, the executor suspends for the
/// linear backoff and retries. After the final attempt the last error is
/// returned unchanged — no averaging, no partial result.
pub async fn with_retry<T, E, F, Fut>(policy: RetryPolicy, op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    with_retry_if(policy, op, |_| true).await
}

/// Like [`with_retry`], but only errors for which `retryable` returns true
/// are retried. Anything else is returned immediately, whatever the attempt
/// count — a structurally malformed response stays malformed.
pub async fn with_retry_if<T, E, F, Fut, P>(
    policy: RetryPolicy,
    mut op: F,
    retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
    E: Display,
{
    let mut attempt = 1u32;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !retryable(&err) {
                    warn!(error = %err, "non-retryable failure");
                    return Err(err);
                }
                warn!(attempt, max = policy.max_attempts, error = %err, "attempt failed");
                if attempt >= policy.max_attempts {
                    return Err(err);
                }
                sleep(policy.backoff_after(attempt)).await;
                attempt += 1;
            }
        }
    }
}
