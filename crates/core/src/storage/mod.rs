//! Receipt blob storage on Apache OpenDAL.
//!
//! Clients upload and download directly against the backend using
//! presigned URLs; the API only hands out URLs and checks that an upload
//! landed. Supported backends: S3-compatible services, Azure Blob Storage
//! and a local directory for development.

mod config;
mod error;
mod service;

pub use config::{ALLOWED_MIME_TYPES, StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::{PresignedUrl, StorageService, StoredObject, UploadRequest, sanitize_filename};
