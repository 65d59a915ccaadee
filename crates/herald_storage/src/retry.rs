//! Exponential backoff for transient failures.

use herald_error::RetryableError;
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

/// Backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct RetryPolicy {
    /// Delay before the first retry
    base_delay: Duration,
    /// Retries after the first attempt
    retries: usize,
    /// Upper bound on any single delay
    max_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; each delay doubles from `base_delay`.
    pub fn new(base_delay: Duration, retries: usize, max_delay: Duration) -> Self {
        Self {
            base_delay,
            retries,
            max_delay,
        }
    }
}

impl Default for RetryPolicy {
    /// 1 s, 2 s, 4 s.
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 3, Duration::from_secs(8))
    }
}

/// Run `operation`, retrying errors that report themselves retryable.
///
/// Permanent errors are returned immediately.
pub async fn retry_with_backoff<F, Fut, R, E>(
    policy: RetryPolicy,
    label: &str,
    operation: F,
) -> Result<R, E>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<R, E>>,
    E: RetryableError + std::fmt::Display,
{
    let base_ms = policy.base_delay.as_millis().max(1) as u64;
    // Delays are factor * 2^n: base, 2*base, 4*base ...
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(base_ms / 2)
        .max_delay(policy.max_delay)
        .map(jitter)
        .take(policy.retries);

    Retry::spawn(strategy, || async {
        match operation().await {
            Ok(value) => Ok(value),
            Err(e) => {
                if e.is_retryable() {
                    warn!(operation = label, error = %e, "Transient error, will retry");
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                } else {
                    warn!(operation = label, error = %e, "Permanent error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        }
    })
    .await
}
