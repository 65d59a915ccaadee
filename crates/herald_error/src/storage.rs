//! Object storage error types.

use crate::RetryableError;

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create storage directory
    #[display("Failed to create storage directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Object not found at the specified location
    #[display("Object not found: {}", _0)]
    NotFound(String),
    /// Invalid object key or path
    #[display("Invalid storage path: {}", _0)]
    InvalidPath(String),
    /// Invalid storage configuration
    #[display("Invalid configuration: {}", _0)]
    InvalidConfig(String),
    /// Remote upload rejected with an HTTP status
    #[display("Upload rejected with HTTP {}: {}", status_code, message)]
    Upload {
        /// HTTP status code
        status_code: u16,
        /// Response body or reason
        message: String,
    },
    /// Network-level failure that may succeed on retry
    #[display("Transient storage failure: {}", _0)]
    Transient(String),
    /// Upload response missing the public URL
    #[display("Upload response missing secure_url: {}", _0)]
    MissingUrl(String),
}

impl StorageErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageErrorKind::Upload { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            StorageErrorKind::Transient(_) => true,
            _ => false,
        }
    }
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("frames/a.png".to_string()));
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for StorageError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_strategy_params(&self) -> (u64, usize, u64) {
        // Three attempts after the first, doubling from one second.
        (1000, 3, 8)
    }
}
