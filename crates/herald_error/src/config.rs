//! Configuration error types.

/// Invalid or missing configuration, including secrets read from the
/// environment.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Setting or environment variable at fault, when there is one
    pub key: Option<String>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a ConfigError not tied to a single setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use herald_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to parse configuration: unknown backend 's3'");
    /// assert!(err.key.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::located(message.into(), None)
    }

    /// A required environment variable is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use herald_error::ConfigError;
    ///
    /// let err = ConfigError::missing_env("ENCRYPTION_KEY");
    /// assert_eq!(err.key.as_deref(), Some("ENCRYPTION_KEY"));
    /// assert_eq!(err.message, "ENCRYPTION_KEY not set");
    /// ```
    #[track_caller]
    pub fn missing_env(var: &str) -> Self {
        Self::located(format!("{} not set", var), Some(var.to_string()))
    }

    /// An environment variable is present but unusable.
    #[track_caller]
    pub fn invalid_env(var: &str, reason: impl std::fmt::Display) -> Self {
        Self::located(format!("{} {}", var, reason), Some(var.to_string()))
    }

    #[track_caller]
    fn located(message: String, key: Option<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message,
            key,
            line: location.line(),
            file: location.file(),
        }
    }
}
