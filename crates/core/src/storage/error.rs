//! Storage error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by a [`KeyValueStore`](super::KeyValueStore).
///
/// These never cross the repository or session boundary; callers log them and
/// carry on with in-memory state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error while reading or writing a value.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage directory could not be created.
    #[error("failed to create storage directory: {path}")]
    DirectoryCreation {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Creates a DirectoryCreation error.
    pub fn directory_creation(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreation {
            path: path.into(),
            source,
        }
    }

    /// Creates an Unavailable error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable(reason.into())
    }
}
