//! Error types for the harness
//!
//! Only conditions that stop the whole run live here. Anything that goes
//! wrong with a single test case is folded into its pass/fail outcome
//! instead (see `harness::report::Outcome`).

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === Discovery Errors ===
    #[error("Invalid descriptor pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to scan '{path}' for descriptors: {reason}")]
    Discovery { path: String, reason: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a discovery error for a directory walk failure
    pub fn discovery(path: &std::path::Path, reason: impl ToString) -> Self {
        Self::Discovery {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
