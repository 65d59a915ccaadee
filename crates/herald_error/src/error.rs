//! Top-level error wrapper types.

use crate::{
    BuilderError, ConfigError, ContentError, DatabaseError, GenerationError, HttpError,
    MediaError, PublishError, RetryableError, ScheduleError, StorageError,
};

/// Every error a Herald crate can surface.
///
/// # Examples
///
/// ```
/// use herald_error::{HeraldError, HttpError};
///
/// let http_err = HttpError::new("replicate", "connection reset");
/// let err: HeraldError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum HeraldErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Content domain error
    #[from(ContentError)]
    Content(ContentError),
    /// Object storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Database error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Image or video generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Media processing error
    #[from(MediaError)]
    Media(MediaError),
    /// Platform publishing error
    #[from(PublishError)]
    Publish(PublishError),
    /// Malformed schedule string
    #[from(ScheduleError)]
    Schedule(ScheduleError),
}

/// Herald error with kind discrimination.
///
/// # Examples
///
/// ```
/// use herald_error::{HeraldError, HeraldResult, ConfigError};
///
/// fn might_fail() -> HeraldResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Herald Error: {}", _0)]
pub struct HeraldError(Box<HeraldErrorKind>);

impl HeraldError {
    /// Create a new error from a kind.
    pub fn new(kind: HeraldErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &HeraldErrorKind {
        &self.0
    }
}

impl RetryableError for HeraldError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            HeraldErrorKind::Storage(e) => e.is_retryable(),
            HeraldErrorKind::Database(e) => e.is_retryable(),
            HeraldErrorKind::Generation(e) => e.is_retryable(),
            HeraldErrorKind::Publish(e) => e.is_retryable(),
            _ => false,
        }
    }
}

// Generic From implementation for any type that converts to HeraldErrorKind
impl<T> From<T> for HeraldError
where
    T: Into<HeraldErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Herald operations.
///
/// # Examples
///
/// ```
/// use herald_error::{HeraldResult, HttpError};
///
/// fn fetch_data() -> HeraldResult<String> {
///     Err(HttpError::new("graph", "connection refused"))?
/// }
/// ```
pub type HeraldResult<T> = std::result::Result<T, HeraldError>;
