//! Schedule string error types.

/// A best-time string that could not be parsed.
///
/// # Examples
///
/// ```
/// use herald_error::ScheduleError;
///
/// let err = ScheduleError::new("Someday 9AM", "unknown weekday");
/// assert!(format!("{}", err).contains("Someday 9AM"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Schedule Error: malformed best time '{}' ({}) at line {} in {}", input, reason, line, file)]
pub struct ScheduleError {
    /// The offending input
    pub input: String,
    /// Why it was rejected
    pub reason: String,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ScheduleError {
    /// Create a new ScheduleError with automatic location tracking.
    #[track_caller]
    pub fn new(input: impl Into<String>, reason: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            input: input.into(),
            reason: reason.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
