//! Content domain error types.

/// Specific error conditions for content items, strategies and their fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ContentErrorKind {
    /// Platform name not recognised
    #[display("Unknown platform: '{}'", _0)]
    UnknownPlatform(String),
    /// Content type string not recognised
    #[display("Unknown content type: '{}'", _0)]
    UnknownContentType(String),
    /// Status string not recognised
    #[display("Unknown content status: '{}'", _0)]
    UnknownStatus(String),
    /// Strategy status string not recognised
    #[display("Unknown strategy status: '{}'", _0)]
    UnknownStrategyStatus(String),
    /// Status change not permitted by the lifecycle
    #[display("Invalid status transition from {} to {}", from, to)]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// Row status changed between read and conditional write
    #[display("Content item {} is no longer {}", id, expected)]
    StatusChanged {
        /// Content item id
        id: i32,
        /// Status the write expected
        expected: String,
    },
    /// A required field was empty
    #[display("Content item {} is missing {}", id, field)]
    MissingField {
        /// Content item id
        id: i32,
        /// Field name
        field: String,
    },
}

/// Content error with source location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{ContentError, ContentErrorKind};
///
/// let err = ContentError::new(ContentErrorKind::UnknownContentType("Carousel".to_string()));
/// assert!(format!("{}", err).contains("Carousel"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Content Error: {} at line {} in {}", kind, line, file)]
pub struct ContentError {
    /// The kind of error that occurred
    pub kind: ContentErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ContentError {
    /// Create a new ContentError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ContentErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
