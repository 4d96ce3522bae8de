//! Storage error types.

use thiserror::Error;

/// Errors surfaced by the policy store.
///
/// The store is in-memory, so there are no connectivity or IO failures:
/// writes fail only on validation, reads and decisions never fail beyond
/// argument checks.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The caller passed an argument the API contract rejects.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl StorageError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
