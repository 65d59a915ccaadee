//! Platform publishing error types.

use crate::RetryableError;

/// Publishing error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PublishErrorKind {
    /// No linked account for the platform
    #[display("No linked {} account for user {}", platform, user_id)]
    MissingCredential {
        /// Platform name
        platform: String,
        /// Owning user
        user_id: i32,
    },
    /// Stored access token could not be decrypted
    #[display("Token decryption failed: {}", _0)]
    Decrypt(String),
    /// Linked account lacks a required identifier
    #[display("Linked account missing {}", _0)]
    MissingAccountField(String),
    /// Content item has no media for a media post
    #[display("Content item {} has no {} to publish", id, field)]
    MissingMedia {
        /// Content item id
        id: i32,
        /// Authoritative media field
        field: String,
    },
    /// Platform cannot publish this content type
    #[display("{} does not support {} posts", platform, content_type)]
    Unsupported {
        /// Platform name
        platform: String,
        /// Content type name
        content_type: String,
    },
    /// Platform rejected the request
    #[display("Platform rejected request with HTTP {}: {}", status_code, message)]
    Rejected {
        /// HTTP status code
        status_code: u16,
        /// Response body
        message: String,
    },
    /// Request could not be sent or the response could not be read
    #[display("Platform request failed: {}", _0)]
    Http(String),
    /// Platform response lacked an expected field
    #[display("Unexpected platform response: {}", _0)]
    UnexpectedResponse(String),
    /// Media container processing reported an error
    #[display("Media processing failed for container {}", _0)]
    ProcessingFailed(String),
    /// Media container did not finish in time
    #[display("Media container {} not ready after {}s", container, seconds)]
    ProcessingTimeout {
        /// Container id
        container: String,
        /// Elapsed bound in seconds
        seconds: u64,
    },
}

impl PublishErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishErrorKind::Rejected { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            PublishErrorKind::Http(_) => true,
            _ => false,
        }
    }
}

/// Publishing error with source location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{PublishError, PublishErrorKind};
///
/// let err = PublishError::new(PublishErrorKind::Unsupported {
///     platform: "Instagram".to_string(),
///     content_type: "TextPost".to_string(),
/// });
/// assert!(format!("{}", err).contains("does not support"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    /// The kind of error that occurred
    pub kind: PublishErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PublishError {
    /// Create a new PublishError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for PublishError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
