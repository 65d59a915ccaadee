//! HTTP error types.

/// Transport-level failure talking to a remote service.
///
/// Provider and platform rejections have their own kinds
/// (`GenerationErrorKind`, `PublishErrorKind`); this covers what happens
/// before a response exists, such as building the client.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("HTTP Error ({}): {} at line {} in {}", service, message, line, file)]
pub struct HttpError {
    /// Remote service, e.g. "graph" or "linkedin"
    pub service: String,
    /// What went wrong
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl HttpError {
    /// Create an error about `service` at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use herald_error::HttpError;
    ///
    /// let err = HttpError::new("graph", "connection refused");
    /// assert_eq!(err.service, "graph");
    /// assert!(err.to_string().starts_with("HTTP Error (graph): connection refused"));
    /// ```
    #[track_caller]
    pub fn new(service: impl Into<String>, message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            service: service.into(),
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// The HTTP client for `service` could not be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use herald_error::HttpError;
    ///
    /// let err = HttpError::client_build("linkedin", "invalid TLS backend");
    /// assert_eq!(err.message, "failed to build client: invalid TLS backend");
    /// ```
    #[track_caller]
    pub fn client_build(service: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::new(service, format!("failed to build client: {}", reason))
    }
}
