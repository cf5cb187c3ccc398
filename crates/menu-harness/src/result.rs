//! Result and error types for the harness.
//!
//! Menu mismatches are never errors; they are collected in a
//! [`MatchResult`](crate::MatchResult). These types cover the ambient
//! operations around a match: loading snapshots, expectation suites and
//! options, and writing reports.

use thiserror::Error;

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors that can occur outside of the matching itself
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Menu snapshot could not be turned into a mock provider
    #[error("Fixture error: {message}")]
    Fixture {
        /// Error message
        message: String,
    },

    /// Invalid match options
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Expectation suite is malformed
    #[error("Invalid expectation: {message}")]
    Expectation {
        /// Error message
        message: String,
    },

    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HarnessError {
    /// Create a fixture error
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an expectation error
    #[must_use]
    pub fn expectation(message: impl Into<String>) -> Self {
        Self::Expectation {
            message: message.into(),
        }
    }
}
