//! Error types for siftpage
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Retrieval, filter and tracking delegates return the same type, and the
//! paginators hand their errors back to the caller untouched.

use thiserror::Error;

/// The main error type for siftpage
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Call Argument Errors
    // ============================================================================
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    // ============================================================================
    // Delegate Errors
    // ============================================================================
    #[error("Retrieval failed: {message}")]
    Retrieval { message: String },

    #[error("Filter failed: {message}")]
    Filter { message: String },

    #[error("Tracking context rejected item: {message}")]
    Tracking { message: String },

    #[error("Source returned {returned} items for a window of {requested}")]
    OversizedBatch { requested: usize, returned: usize },

    // ============================================================================
    // Run Limit Errors
    // ============================================================================
    #[error("Pagination cancelled")]
    Cancelled,

    #[error("Pagination deadline of {timeout_ms}ms exceeded")]
    DeadlineExceeded { timeout_ms: u64 },

    #[error("Retrieval round limit ({max_rounds}) exceeded")]
    RoundLimitExceeded { max_rounds: usize },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid call argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval {
            message: message.into(),
        }
    }

    /// Create a filter error
    pub fn filter(message: impl Into<String>) -> Self {
        Self::Filter {
            message: message.into(),
        }
    }

    /// Create a tracking error
    pub fn tracking(message: impl Into<String>) -> Self {
        Self::Tracking {
            message: message.into(),
        }
    }

    /// Check if this error was caused by the caller's configuration or arguments
    /// rather than by a failure while paginating
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Error::Config { .. } | Error::InvalidConfigValue { .. } | Error::InvalidArgument { .. }
        )
    }

    /// Check if this error came from a run limit (deadline, cancellation, round cap)
    pub fn is_run_limit(&self) -> bool {
        matches!(
            self,
            Error::Cancelled | Error::DeadlineExceeded { .. } | Error::RoundLimitExceeded { .. }
        )
    }
}

/// Result type alias for siftpage
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_config("initial_limit_multiple", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'initial_limit_multiple': must be at least 1"
        );

        let err = Error::invalid_argument("offset", "must be a multiple of limit");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'offset': must be a multiple of limit"
        );

        let err = Error::OversizedBatch {
            requested: 5,
            returned: 7,
        };
        assert_eq!(
            err.to_string(),
            "Source returned 7 items for a window of 5"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::config("x").is_argument_error());
        assert!(Error::invalid_config("page_size", "x").is_argument_error());
        assert!(Error::invalid_argument("offset", "x").is_argument_error());
        assert!(!Error::retrieval("x").is_argument_error());
        assert!(!Error::filter("x").is_argument_error());

        assert!(Error::Cancelled.is_run_limit());
        assert!(Error::DeadlineExceeded { timeout_ms: 10 }.is_run_limit());
        assert!(Error::RoundLimitExceeded { max_rounds: 3 }.is_run_limit());
        assert!(!Error::tracking("x").is_run_limit());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: Error = anyhow::anyhow!("backend unavailable").into();
        assert_eq!(err.to_string(), "backend unavailable");
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
