use thiserror::Error;

/// Core error types for SymbioMed terminology operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown terminology system: {0}")]
    UnknownSystem(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("All {attempted} terminology systems failed")]
    AllSystemsFailed { attempted: usize },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl CoreError {
    /// Create a new UnknownSystem error
    pub fn unknown_system(system: impl Into<String>) -> Self {
        Self::UnknownSystem(system.into())
    }

    /// Create a new InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a new InvalidDate error
    pub fn invalid_date(date: impl Into<String>) -> Self {
        Self::InvalidDate(date.into())
    }

    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Check if this error was caused by what the user typed
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownSystem(_)
                | Self::InvalidInput(_)
                | Self::InvalidDate(_)
                | Self::TimeError(_)
        )
    }

    /// Get error category for logging and display
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownSystem(_) | Self::InvalidInput(_) | Self::InvalidDate(_) => {
                ErrorCategory::InvalidInput
            }
            Self::TimeError(_) => ErrorCategory::InvalidInput,
            Self::JsonError(_) => ErrorCategory::Serialization,
            Self::AllSystemsFailed { .. } => ErrorCategory::Aggregate,
            Self::Configuration(_) => ErrorCategory::Configuration,
        }
    }
}

/// Error categories shared by every crate in the workspace.
///
/// `Transport` and `HttpStatus` are only produced by the HTTP client; they
/// live here so screens can classify any failure the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    HttpStatus,
    InvalidInput,
    Serialization,
    Aggregate,
    Configuration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::HttpStatus => write!(f, "http_status"),
            Self::InvalidInput => write!(f, "invalid_input"),
            Self::Serialization => write!(f, "serialization"),
            Self::Aggregate => write!(f, "aggregate"),
            Self::Configuration => write!(f, "configuration"),
        }
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::unknown_system("homeopathy");
        assert_eq!(err.to_string(), "Unknown terminology system: homeopathy");
        assert!(err.is_user_error());
        assert_eq!(err.category(), ErrorCategory::InvalidInput);
    }

    #[test]
    fn test_all_systems_failed_message() {
        let err = CoreError::AllSystemsFailed { attempted: 3 };
        assert_eq!(err.to_string(), "All 3 terminology systems failed");
        assert!(!err.is_user_error());
        assert_eq!(err.category(), ErrorCategory::Aggregate);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let core_err: CoreError = json_err.into();

        assert!(matches!(core_err, CoreError::JsonError(_)));
        assert_eq!(core_err.category(), ErrorCategory::Serialization);
    }

    #[test]
    fn test_time_error_conversion() {
        let format = time::macros::format_description!("[year]-[month]-[day]");
        let err = time::Date::parse("2024-13-45", format).unwrap_err();
        let core_err: CoreError = err.into();
        assert!(matches!(core_err, CoreError::TimeError(_)));
        assert!(core_err.is_user_error());
    }

    #[test]
    fn test_error_categories_display() {
        assert_eq!(ErrorCategory::Transport.to_string(), "transport");
        assert_eq!(ErrorCategory::HttpStatus.to_string(), "http_status");
        assert_eq!(ErrorCategory::InvalidInput.to_string(), "invalid_input");
        assert_eq!(ErrorCategory::Serialization.to_string(), "serialization");
        assert_eq!(ErrorCategory::Aggregate.to_string(), "aggregate");
        assert_eq!(ErrorCategory::Configuration.to_string(), "configuration");
    }

    #[test]
    fn test_configuration_error() {
        let err = CoreError::configuration("bad timeout");
        assert_eq!(err.to_string(), "Configuration error: bad timeout");
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }
}
