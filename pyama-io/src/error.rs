//! I/O error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A selected dataset or output path that does not exist or has the
    /// wrong kind.
    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },

    /// A track file missing required columns or carrying unparsable values.
    #[error("malformed track file {path}: {reason}")]
    MalformedTracks { path: PathBuf, reason: String },

    /// Failure probing the dataset file's metadata.
    #[error("metadata probe failed for {path}: {reason}")]
    Metadata { path: PathBuf, reason: String },
}

impl Error {
    /// Convenience constructor for path validation failures.
    pub fn invalid_path(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for track file failures.
    pub fn malformed_tracks(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedTracks {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Convenience constructor for metadata probe failures.
    pub fn metadata(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
