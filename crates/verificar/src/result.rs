//! Result and error types for Verificar.

use thiserror::Error;

/// Result type for Verificar operations
pub type VerifyResult<T> = Result<T, VerifyError>;

/// Errors that can occur while driving a verification run.
///
/// Only `StateTimeout` and unexpected driver errors are fatal to a run;
/// locator misses and precondition violations are absorbed as skipped
/// interactions before an error is ever constructed.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    Evaluate {
        /// Error message
        message: String,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// A state marker failed to appear within its timeout tier
    #[error("State marker '{marker}' not reached within {ms}ms")]
    StateTimeout {
        /// Marker text that never appeared
        marker: String,
        /// Timeout that elapsed, in milliseconds
        ms: u64,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VerifyError {
    /// Whether this error is the state-timeout condition (as opposed to an
    /// unexpected driver failure).
    #[must_use]
    pub const fn is_state_timeout(&self) -> bool {
        matches!(self, Self::StateTimeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_timeout_display() {
        let err = VerifyError::StateTimeout {
            marker: "Map Columns".to_string(),
            ms: 10_000,
        };
        assert_eq!(
            err.to_string(),
            "State marker 'Map Columns' not reached within 10000ms"
        );
        assert!(err.is_state_timeout());
    }

    #[test]
    fn test_navigation_is_not_timeout() {
        let err = VerifyError::Navigation {
            url: "http://localhost:5173".to_string(),
            message: "refused".to_string(),
        };
        assert!(!err.is_state_timeout());
    }
}
