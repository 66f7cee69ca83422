//! Receipt error types.

use hogar_shared::types::ReceiptId;
use thiserror::Error;

use crate::storage::StorageError;

/// Receipt errors.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// No receipt with this id in the family.
    #[error("receipt not found: {0}")]
    NotFound(ReceiptId),

    /// The expense or business transaction does not exist.
    #[error("{0} not found")]
    TargetNotFound(String),

    /// Nothing was uploaded under the expected key.
    #[error("upload not found in storage")]
    UploadNotVerified,

    /// Uploaded object size differs from the declared size.
    #[error("file size mismatch: expected {expected}, got {actual}")]
    FileSizeMismatch {
        /// Declared size.
        expected: u64,
        /// Stored size.
        actual: u64,
    },

    /// Storage backend error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Persistence error from the repository implementation.
    #[error("repository error: {0}")]
    Repository(String),
}
