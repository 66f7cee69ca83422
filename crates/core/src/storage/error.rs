//! Storage error types.

use thiserror::Error;

/// Receipt storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Receipt larger than the configured limit.
    #[error("file is {size} bytes, the limit is {max} bytes")]
    FileTooLarge {
        /// Declared size.
        size: u64,
        /// Configured limit.
        max: u64,
    },

    /// Not an image or PDF.
    #[error("receipts must be an image or PDF, got '{0}'")]
    InvalidMimeType(String),

    /// Empty upload.
    #[error("file is empty")]
    EmptyFile,

    /// No object under the key.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The backend cannot issue presigned URLs (local filesystem).
    #[error("storage provider does not support presigned URLs")]
    PresignNotSupported,

    /// Bad or incomplete settings.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Any other backend failure.
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Configuration error with a message.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            opendal::ErrorKind::Unsupported => Self::PresignNotSupported,
            _ => Self::Operation(err.to_string()),
        }
    }
}
