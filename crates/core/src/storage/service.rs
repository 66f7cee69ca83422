//! OpenDAL-backed receipt storage.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use hogar_shared::types::{FamilyId, ReceiptId, UserId};
use opendal::{Operator, services};
use serde::Serialize;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// A presigned URL handed to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PresignedUrl {
    /// Target URL.
    pub url: String,
    /// `PUT` for uploads, `GET` for downloads.
    pub method: String,
    /// Expiry.
    pub expires_at: DateTime<Utc>,
    /// Headers the client must send.
    pub headers: HashMap<String, String>,
}

/// A receipt the client wants to upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Family that owns the receipt.
    pub family_id: FamilyId,
    /// Member uploading it.
    pub owner_id: UserId,
    /// Id reserved for the receipt row.
    pub receipt_id: ReceiptId,
    /// Name on the client's device.
    pub filename: String,
    /// Declared MIME type.
    pub content_type: String,
    /// Declared size in bytes.
    pub file_size: u64,
}

impl UploadRequest {
    /// Object key: `{family_id}/{owner_id}/{receipt_id}/{sanitized_filename}`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.family_id,
            self.owner_id,
            self.receipt_id,
            sanitize_filename(&self.filename)
        )
    }
}

/// What the backend reports about a stored object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Object key.
    pub storage_key: String,
    /// Size in bytes.
    pub file_size: u64,
    /// MIME type, when the backend records one.
    pub content_type: Option<String>,
}

/// Receipt storage.
#[derive(Debug, Clone)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Builds the OpenDAL operator for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` if the backend rejects the settings.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = build_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Checks size and type of an upload before any URL is issued.
    ///
    /// # Errors
    ///
    /// Returns `EmptyFile`, `FileTooLarge` or `InvalidMimeType`.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size == 0 {
            return Err(StorageError::EmptyFile);
        }
        if size > self.config.max_file_size {
            return Err(StorageError::FileTooLarge {
                size,
                max: self.config.max_file_size,
            });
        }
        if !StorageConfig::is_mime_type_allowed(content_type) {
            return Err(StorageError::InvalidMimeType(content_type.to_string()));
        }
        Ok(())
    }

    /// Validates the request and presigns a `PUT` for its key.
    ///
    /// # Errors
    ///
    /// Returns a validation error, or `PresignNotSupported` on the local backend.
    pub async fn presign_upload(&self, req: &UploadRequest) -> Result<PresignedUrl, StorageError> {
        self.validate_upload(&req.content_type, req.file_size)?;

        let ttl = self.config.upload_ttl_secs;
        let presigned = self
            .operator
            .presign_write(&req.storage_key(), Duration::from_secs(ttl))
            .await?;

        let headers = HashMap::from([("Content-Type".to_string(), req.content_type.clone())]);
        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at: expiry(ttl),
            headers,
        })
    }

    /// Presigns a `GET` for an existing object.
    ///
    /// # Errors
    ///
    /// Returns `PresignNotSupported` on the local backend or an operation error.
    pub async fn presign_download(&self, key: &str) -> Result<PresignedUrl, StorageError> {
        let ttl = self.config.download_ttl_secs;
        let presigned = self
            .operator
            .presign_read(key, Duration::from_secs(ttl))
            .await?;

        Ok(PresignedUrl {
            url: presigned.uri().to_string(),
            method: presigned.method().to_string(),
            expires_at: expiry(ttl),
            headers: HashMap::new(),
        })
    }

    /// Looks the object up to confirm the client's upload finished.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when nothing was uploaded.
    pub async fn stat(&self, key: &str) -> Result<StoredObject, StorageError> {
        let meta = self.operator.stat(key).await?;
        Ok(StoredObject {
            storage_key: key.to_string(),
            file_size: meta.content_length(),
            content_type: meta.content_type().map(String::from),
        })
    }

    /// Deletes an object. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an operation error from the backend.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.operator.delete(key).await?;
        Ok(())
    }

    /// Backend name recorded on receipt rows.
    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Bucket or container recorded on receipt rows.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.config.provider.bucket()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &StorageConfig {
        &self.config
    }
}

fn build_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
    let config_err = |e: opendal::Error| StorageError::configuration(e.to_string());

    let operator = match provider {
        StorageProvider::S3 {
            endpoint,
            bucket,
            access_key_id,
            secret_access_key,
            region,
        } => Operator::new(
            services::S3::default()
                .endpoint(endpoint)
                .bucket(bucket)
                .access_key_id(access_key_id)
                .secret_access_key(secret_access_key)
                .region(region),
        )
        .map_err(config_err)?
        .finish(),
        StorageProvider::AzureBlob {
            account,
            access_key,
            container,
        } => Operator::new(
            services::Azblob::default()
                .account_name(account)
                .account_key(access_key)
                .container(container),
        )
        .map_err(config_err)?
        .finish(),
        StorageProvider::LocalFs { root } => {
            let root = root
                .to_str()
                .ok_or_else(|| StorageError::configuration("storage root is not valid UTF-8"))?;
            Operator::new(services::Fs::default().root(root))
                .map_err(config_err)?
                .finish()
        }
    };
    Ok(operator)
}

fn expiry(ttl_secs: u64) -> DateTime<Utc> {
    i64::try_from(ttl_secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|ttl| Utc::now().checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Replaces anything but ASCII letters, digits, `.`, `-` and `_` with `_`.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    // Keys must not end in a path component like `..`.
    if cleaned.chars().all(|c| c == '.') {
        format!("receipt{cleaned}").replace('.', "_")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn local_service(max_file_size: u64) -> StorageService {
        let mut config = StorageConfig::new(StorageProvider::LocalFs {
            root: "./target/test-storage".into(),
        });
        config.max_file_size = max_file_size;
        StorageService::from_config(config).unwrap()
    }

    fn parse_id(s: &str) -> Uuid {
        Uuid::parse_str(s).unwrap()
    }

    fn request(filename: &str) -> UploadRequest {
        UploadRequest {
            family_id: FamilyId::from_uuid(parse_id("550e8400-e29b-41d4-a716-446655440000")),
            owner_id: UserId::from_uuid(parse_id("6ba7b810-9dad-11d1-80b4-00c04fd430c8")),
            receipt_id: ReceiptId::from_uuid(parse_id("6ba7b811-9dad-11d1-80b4-00c04fd430c8")),
            filename: filename.to_string(),
            content_type: "image/jpeg".to_string(),
            file_size: 2048,
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("ticket-super.jpg"), "ticket-super.jpg");
        assert_eq!(sanitize_filename("recibo luz (marzo).pdf"), "recibo_luz__marzo_.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename(".."), "receipt__");
        assert_eq!(sanitize_filename("año.png"), "a_o.png");
    }

    #[test]
    fn test_storage_key_layout() {
        assert_eq!(
            request("ticket super.jpg").storage_key(),
            "550e8400-e29b-41d4-a716-446655440000/6ba7b810-9dad-11d1-80b4-00c04fd430c8/\
             6ba7b811-9dad-11d1-80b4-00c04fd430c8/ticket_super.jpg"
        );
    }

    #[test]
    fn test_validate_upload() {
        let service = local_service(1024);

        assert!(service.validate_upload("application/pdf", 512).is_ok());
        assert!(service.validate_upload("image/png", 1024).is_ok());
        assert!(matches!(
            service.validate_upload("image/png", 1025),
            Err(StorageError::FileTooLarge {
                size: 1025,
                max: 1024,
            })
        ));
        assert!(matches!(
            service.validate_upload("application/zip", 10),
            Err(StorageError::InvalidMimeType(_))
        ));
        assert!(matches!(
            service.validate_upload("image/png", 0),
            Err(StorageError::EmptyFile)
        ));
    }

    #[test]
    fn test_provider_metadata() {
        let service = local_service(1024);
        assert_eq!(service.provider_name(), "local");
        assert_eq!(service.bucket(), "./target/test-storage");
    }

    proptest! {
        #[test]
        fn prop_sanitized_filename_is_one_safe_segment(filename in ".*") {
            let sanitized = sanitize_filename(&filename);
            prop_assert!(!sanitized.contains('/'));
            prop_assert!(sanitized != "." && sanitized != "..");
            prop_assert!(sanitized
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_')));
        }

        #[test]
        fn prop_storage_key_has_four_segments(filename in "[a-zA-Z0-9 _-]{1,40}\\.(jpg|png|pdf)") {
            let req = request(&filename);
            let key = req.storage_key();
            let parts: Vec<&str> = key.split('/').collect();
            prop_assert_eq!(parts.len(), 4);
            prop_assert_eq!(parts[0], req.family_id.to_string());
            prop_assert_eq!(parts[1], req.owner_id.to_string());
            prop_assert_eq!(parts[2], req.receipt_id.to_string());
        }

        #[test]
        fn prop_size_limit(max in 1u64..10_000_000, size in 1u64..20_000_000) {
            let result = local_service(max).validate_upload("application/pdf", size);
            prop_assert_eq!(result.is_ok(), size <= max);
        }
    }
}
