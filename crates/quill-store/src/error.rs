// File: src/error.rs
// Purpose: Error types for the backend, auth, stores and local storage

use thiserror::Error;

/// Failure reported by the backend or auth service for one call
///
/// Displays as the bare message so stores can stringify it into their error slot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Store operation errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Synthesized locally when an id lookup misses the cached collection
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("invalid row: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Auth(String),

    #[error("Access denied: admin role required")]
    Forbidden,
}

/// Local key-value storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;
