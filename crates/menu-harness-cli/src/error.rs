//! Error types for the CLI

use menu_harness::HarnessError;
use thiserror::Error;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// Exit code for a menu that did not match its expectations
pub const EXIT_MISMATCH: u8 = 1;

/// Exit code for every other failure
pub const EXIT_ERROR: u8 = 2;

/// Errors that can occur in the CLI
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Error message
        message: String,
    },

    /// The menu did not match
    #[error("Menu did not match: {count} failed expectation(s)")]
    Mismatch {
        /// Number of failure messages
        count: usize,
    },

    /// Harness library error
    #[error("Harness error: {0}")]
    Harness(#[from] HarnessError),

    /// JSON rendering error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid argument error
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a mismatch error
    #[must_use]
    pub const fn mismatch(count: usize) -> Self {
        Self::Mismatch { count }
    }

    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Mismatch { .. } => EXIT_MISMATCH,
            _ => EXIT_ERROR,
        }
    }
}
