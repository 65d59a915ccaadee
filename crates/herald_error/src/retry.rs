//! Retry classification shared by fallible remote operations.

/// Trait for errors that can indicate whether they should be retried.
///
/// # Examples
///
/// ```
/// use herald_error::{RetryableError, StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::Upload {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// let (_backoff, retries, _max_delay) = err.retry_strategy_params();
/// assert_eq!(retries, 3);
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503 (service unavailable), 429 (rate limit),
    /// or network timeouts should return true. Permanent errors like 401
    /// (unauthorized) or 400 (bad request) should return false.
    fn is_retryable(&self) -> bool;

    /// Get retry strategy parameters for this error.
    ///
    /// Returns `(initial_backoff_ms, max_retries, max_delay_secs)`.
    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        (1000, 3, 8)
    }
}
