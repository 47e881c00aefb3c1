//! Error types for the validator

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for validator operations
pub type Result<T> = std::result::Result<T, ValidatorError>;

/// Errors that stop a validation run.
///
/// Undefined or unused feature switches are findings, not errors; they are
/// collected in a [`crate::ValidationReport`].
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// A file pattern is not a valid glob
    #[error("Invalid file pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Directory traversal failed
    #[error("Failed to walk {}: {source}", .root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: ignore::Error,
    },

    /// A matched file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ValidatorError {
    /// Create a ReadFile error
    pub fn read_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }
}
