//! Storage error types.
//!
//! Used by the runtime info store, the wa repository and callers of storage APIs.

use thiserror::Error;

/// Errors that can occur when using storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("IO error on {path}: {message}")]
    Io { path: String, message: String },
    #[error("Invalid runtime info: {0}")]
    Serialization(String),
    #[error("Lock error: {0}")]
    Lock(String),
}

impl StorageError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}
