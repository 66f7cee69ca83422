//! Receipt storage configuration.

use std::path::PathBuf;

use hogar_shared::config::StorageSettings;

use super::error::StorageError;

/// Where receipt blobs live.
#[derive(Debug, Clone)]
pub enum StorageProvider {
    /// Any S3-compatible service (AWS S3, Cloudflare R2, MinIO).
    S3 {
        /// Endpoint URL.
        endpoint: String,
        /// Bucket name.
        bucket: String,
        /// Access key id.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region, `auto` for R2.
        region: String,
    },
    /// Azure Blob Storage.
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Account access key.
        access_key: String,
        /// Container name.
        container: String,
    },
    /// Local directory. Cannot presign, so only useful in development.
    LocalFs {
        /// Root directory.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Name stored alongside each receipt row.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }

    /// Bucket or container; the root path for local storage.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
        }
    }
}

/// Storage settings resolved from configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Backend.
    pub provider: StorageProvider,
    /// Largest accepted receipt in bytes.
    pub max_file_size: u64,
    /// Upload URL lifetime in seconds.
    pub upload_ttl_secs: u64,
    /// Download URL lifetime in seconds.
    pub download_ttl_secs: u64,
}

/// Receipts are photos or PDFs.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
];

impl StorageConfig {
    /// 10 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
    /// 15 minutes.
    pub const DEFAULT_UPLOAD_TTL: u64 = 900;
    /// 1 hour.
    pub const DEFAULT_DOWNLOAD_TTL: u64 = 3600;

    /// Config with default limits.
    #[must_use]
    pub const fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            upload_ttl_secs: Self::DEFAULT_UPLOAD_TTL,
            download_ttl_secs: Self::DEFAULT_DOWNLOAD_TTL,
        }
    }

    /// Builds a config from the `storage` section of the app config.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Configuration` for an unknown provider or a
    /// provider missing one of its required settings.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StorageError> {
        fn required(value: Option<&String>, key: &str) -> Result<String, StorageError> {
            value
                .cloned()
                .ok_or_else(|| StorageError::configuration(format!("storage.{key} is required")))
        }

        let provider = match settings.provider.as_str() {
            "s3" => StorageProvider::S3 {
                endpoint: required(settings.endpoint.as_ref(), "endpoint")?,
                bucket: required(settings.bucket.as_ref(), "bucket")?,
                access_key_id: required(settings.access_key_id.as_ref(), "access_key_id")?,
                secret_access_key: required(
                    settings.secret_access_key.as_ref(),
                    "secret_access_key",
                )?,
                region: settings.region.clone().unwrap_or_else(|| "auto".to_string()),
            },
            "azure_blob" => StorageProvider::AzureBlob {
                account: required(settings.account.as_ref(), "account")?,
                access_key: required(settings.access_key.as_ref(), "access_key")?,
                container: required(settings.container.as_ref(), "container")?,
            },
            "local" => StorageProvider::LocalFs {
                root: PathBuf::from(settings.root.as_deref().unwrap_or("./storage")),
            },
            other => {
                return Err(StorageError::configuration(format!(
                    "unknown storage provider '{other}'"
                )));
            }
        };

        Ok(Self {
            provider,
            max_file_size: settings.max_file_size.unwrap_or(Self::DEFAULT_MAX_FILE_SIZE),
            upload_ttl_secs: settings.upload_ttl_secs.unwrap_or(Self::DEFAULT_UPLOAD_TTL),
            download_ttl_secs: settings.download_ttl_secs.unwrap_or(Self::DEFAULT_DOWNLOAD_TTL),
        })
    }

    /// Whether receipts of this type are accepted.
    #[must_use]
    pub fn is_mime_type_allowed(mime_type: &str) -> bool {
        ALLOWED_MIME_TYPES.contains(&mime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(provider: &str) -> StorageSettings {
        StorageSettings {
            provider: provider.to_string(),
            root: None,
            endpoint: None,
            bucket: None,
            access_key_id: None,
            secret_access_key: None,
            region: None,
            account: None,
            access_key: None,
            container: None,
            max_file_size: None,
            upload_ttl_secs: None,
            download_ttl_secs: None,
        }
    }

    #[test]
    fn test_local_defaults() {
        let config = StorageConfig::from_settings(&settings("local")).unwrap();
        assert_eq!(config.provider.name(), "local");
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.upload_ttl_secs, 900);
        assert_eq!(config.download_ttl_secs, 3600);
    }

    #[test]
    fn test_s3_requires_bucket() {
        let mut s3 = settings("s3");
        s3.endpoint = Some("https://acct.r2.cloudflarestorage.com".into());
        s3.access_key_id = Some("key".into());
        s3.secret_access_key = Some("secret".into());

        let err = StorageConfig::from_settings(&s3).unwrap_err();
        assert!(err.to_string().contains("storage.bucket"));

        s3.bucket = Some("receipts".into());
        let config = StorageConfig::from_settings(&s3).unwrap();
        assert_eq!(config.provider.bucket(), "receipts");
        assert!(matches!(
            config.provider,
            StorageProvider::S3 { ref region, .. } if region == "auto"
        ));
    }

    #[test]
    fn test_azure_and_overrides() {
        let mut azure = settings("azure_blob");
        azure.account = Some("hogardev".into());
        azure.access_key = Some("key".into());
        azure.container = Some("receipts".into());
        azure.max_file_size = Some(1024);

        let config = StorageConfig::from_settings(&azure).unwrap();
        assert_eq!(config.provider.name(), "azure_blob");
        assert_eq!(config.max_file_size, 1024);
    }

    #[test]
    fn test_unknown_provider() {
        assert!(matches!(
            StorageConfig::from_settings(&settings("ftp")),
            Err(StorageError::Configuration(_))
        ));
    }

    #[test]
    fn test_receipt_mime_types() {
        assert!(StorageConfig::is_mime_type_allowed("application/pdf"));
        assert!(StorageConfig::is_mime_type_allowed("image/jpeg"));
        assert!(!StorageConfig::is_mime_type_allowed("application/msword"));
        assert!(!StorageConfig::is_mime_type_allowed("text/html"));
    }
}
