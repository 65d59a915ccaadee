//! Media processing error types.

/// Media processing error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum MediaErrorKind {
    /// Image bytes could not be decoded
    #[display("Image decode failed: {}", _0)]
    Decode(String),
    /// Image could not be encoded
    #[display("Image encode failed: {}", _0)]
    Encode(String),
    /// Media download failed
    #[display("Download of {} failed: {}", url, reason)]
    Download {
        /// Source URL
        url: String,
        /// Failure reason
        reason: String,
    },
    /// Local file operation failed
    #[display("Media I/O error: {}", _0)]
    Io(String),
    /// External ffmpeg/ffprobe process failed
    #[display("{} failed: {}", tool, reason)]
    Process {
        /// Executable name
        tool: String,
        /// Failure reason
        reason: String,
    },
    /// Video metadata could not be determined
    #[display("Could not read video info: {}", _0)]
    VideoInfo(String),
    /// Background task panicked or was cancelled
    #[display("Blocking task failed: {}", _0)]
    Join(String),
    /// Content item has no prompt for the requested media
    #[display("Content item {} has no {} prompt", id, kind)]
    MissingPrompt {
        /// Content item id
        id: i32,
        /// "image" or "video"
        kind: String,
    },
}

/// Media error with source location tracking.
///
/// # Examples
///
/// ```
/// use herald_error::{MediaError, MediaErrorKind};
///
/// let err = MediaError::new(MediaErrorKind::Decode("truncated PNG".to_string()));
/// assert!(format!("{}", err).contains("truncated PNG"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Media Error: {} at line {} in {}", kind, line, file)]
pub struct MediaError {
    /// The kind of error that occurred
    pub kind: MediaErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl MediaError {
    /// Create a new MediaError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: MediaErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
