//! Result and error types for sauce-probe.

use thiserror::Error;

/// Result type for sauce-probe operations
pub type E2eResult<T> = Result<T, E2eError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum E2eError {
    /// One or more required environment variables are missing or empty
    #[error("Missing required environment variables: {}. Set them in the environment or a .env file", keys.join(", "))]
    MissingEnvironment {
        /// Names of the missing keys, in declaration order
        keys: Vec<String>,
    },

    /// An env file could not be read or parsed
    #[error("Failed to read env file {path}: {message}")]
    EnvFile {
        /// Path of the env file
        path: String,
        /// Error message
        message: String,
    },

    /// An element or page never reached the required state in time
    #[error("Timed out after {timeout_ms}ms waiting for {waited_for}")]
    Timeout {
        /// Description of what was waited for
        waited_for: String,
        /// Timeout in milliseconds
        timeout_ms: u64,
    },

    /// Observed UI state differs from the expected value
    #[error("{what}: expected {expected}, got {actual}")]
    AssertionMismatch {
        /// What was asserted on
        what: String,
        /// Expected value
        expected: String,
        /// Last observed value
        actual: String,
    },

    /// An action needed exactly one element but the locator resolved to another count
    #[error("Expected exactly one element for {target}, found {count}")]
    AmbiguousTarget {
        /// Locator description
        target: String,
        /// Number of matched elements
        count: usize,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Error reported by the automation driver
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Text scraped from the page could not be parsed
    #[error("Could not parse {value:?}: {message}")]
    Parse {
        /// Offending text
        value: String,
        /// Error message
        message: String,
    },

    /// Selector syntax the mock driver cannot evaluate
    #[error("Unsupported selector for the mock driver: {selector}")]
    UnsupportedSelector {
        /// The selector text
        selector: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl E2eError {
    /// Create a driver error
    #[must_use]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }

    /// Create an assertion mismatch
    #[must_use]
    pub fn mismatch(
        what: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::AssertionMismatch {
            what: what.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Whether the error may clear up on its own while polling
    ///
    /// Driver errors cover transient CDP failures such as an execution
    /// context torn down by an in-flight navigation.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Driver { .. })
    }

    /// Whether this is a wait timeout
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_environment_lists_every_key() {
        let err = E2eError::MissingEnvironment {
            keys: vec!["PASSWORD".to_string(), "INVALID_PASSWORD".to_string()],
        };
        let message = err.to_string();
        assert!(message.contains("PASSWORD, INVALID_PASSWORD"));
    }

    #[test]
    fn test_mismatch_reports_both_values() {
        let err = E2eError::mismatch("cart badge", "\"3\"", "\"2\"");
        assert_eq!(err.to_string(), "cart badge: expected \"3\", got \"2\"");
    }

    #[test]
    fn test_transient_classification() {
        assert!(E2eError::driver("context destroyed").is_transient());
        assert!(!E2eError::mismatch("a", "b", "c").is_transient());
        assert!(E2eError::Timeout {
            waited_for: "x".into(),
            timeout_ms: 1
        }
        .is_timeout());
    }
}
