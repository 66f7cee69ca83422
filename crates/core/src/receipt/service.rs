//! Receipt upload, download and deletion.

use std::future::Future;
use std::sync::Arc;

use hogar_shared::types::{FamilyId, ReceiptId};

use super::error::ReceiptError;
use super::types::{
    ConfirmUploadInput, NewReceipt, Receipt, ReceiptTarget, RequestUploadInput, RequestUploadResult,
};
use crate::storage::{PresignedUrl, StorageError, StorageService, UploadRequest};

/// Persistence for receipt rows, implemented by the db crate.
pub trait ReceiptRepository: Send + Sync {
    /// Inserts a receipt row.
    fn create(
        &self,
        input: NewReceipt,
    ) -> impl Future<Output = Result<Receipt, ReceiptError>> + Send;

    /// Finds a receipt within a family.
    fn find_by_id(
        &self,
        id: ReceiptId,
        family_id: FamilyId,
    ) -> impl Future<Output = Result<Option<Receipt>, ReceiptError>> + Send;

    /// Receipts attached to a row.
    fn list_by_target(
        &self,
        target: ReceiptTarget,
        family_id: FamilyId,
    ) -> impl Future<Output = Result<Vec<Receipt>, ReceiptError>> + Send;

    /// Deletes a receipt row; `false` when it did not exist.
    fn delete(
        &self,
        id: ReceiptId,
        family_id: FamilyId,
    ) -> impl Future<Output = Result<bool, ReceiptError>> + Send;

    /// Whether the target row exists in the family.
    fn target_exists(
        &self,
        target: ReceiptTarget,
        family_id: FamilyId,
    ) -> impl Future<Output = Result<bool, ReceiptError>> + Send;
}

/// Receipt service over a storage backend and a repository.
pub struct ReceiptService<R: ReceiptRepository> {
    storage: Arc<StorageService>,
    repo: Arc<R>,
}

impl<R: ReceiptRepository> ReceiptService<R> {
    /// Creates the service.
    #[must_use]
    pub const fn new(storage: Arc<StorageService>, repo: Arc<R>) -> Self {
        Self { storage, repo }
    }

    async fn ensure_target(
        &self,
        target: ReceiptTarget,
        family_id: FamilyId,
    ) -> Result<(), ReceiptError> {
        if self.repo.target_exists(target, family_id).await? {
            Ok(())
        } else {
            Err(ReceiptError::TargetNotFound(target.to_string()))
        }
    }

    /// Reserves a receipt id and presigns an upload URL for it.
    ///
    /// # Errors
    ///
    /// Returns `TargetNotFound`, a storage validation error, or
    /// `PresignNotSupported` on the local backend.
    pub async fn request_upload(
        &self,
        input: RequestUploadInput,
    ) -> Result<RequestUploadResult, ReceiptError> {
        self.ensure_target(input.target, input.family_id).await?;

        let request = UploadRequest {
            family_id: input.family_id,
            owner_id: input.owner_id,
            receipt_id: ReceiptId::new(),
            filename: input.filename,
            content_type: input.content_type,
            file_size: input.file_size,
        };
        let upload = self.storage.presign_upload(&request).await?;

        Ok(RequestUploadResult {
            receipt_id: request.receipt_id,
            upload,
            storage_key: request.storage_key(),
        })
    }

    /// Checks the uploaded object and records the receipt.
    ///
    /// # Errors
    ///
    /// Returns `UploadNotVerified` when the object is missing and
    /// `FileSizeMismatch` when it differs from the declared size.
    pub async fn confirm_upload(&self, input: ConfirmUploadInput) -> Result<Receipt, ReceiptError> {
        self.ensure_target(input.target, input.family_id).await?;

        let request = input.upload_request();
        self.storage
            .validate_upload(&request.content_type, request.file_size)?;

        let key = request.storage_key();
        let stored = match self.storage.stat(&key).await {
            Ok(stored) => stored,
            Err(StorageError::NotFound(_)) => return Err(ReceiptError::UploadNotVerified),
            Err(e) => return Err(e.into()),
        };
        if stored.file_size != input.file_size {
            return Err(ReceiptError::FileSizeMismatch {
                expected: input.file_size,
                actual: stored.file_size,
            });
        }

        self.repo
            .create(NewReceipt {
                id: input.receipt_id,
                family_id: input.family_id,
                target: input.target,
                filename: input.filename,
                file_size: i64::try_from(stored.file_size).unwrap_or(i64::MAX),
                mime_type: input.content_type,
                storage_provider: self.storage.provider_name().to_string(),
                storage_bucket: self.storage.bucket().to_string(),
                storage_key: key,
                uploaded_by: input.owner_id,
            })
            .await
    }

    /// Finds a receipt.
    ///
    /// # Errors
    ///
    /// Returns `ReceiptError::NotFound` when it does not exist in the family.
    pub async fn get(&self, id: ReceiptId, family_id: FamilyId) -> Result<Receipt, ReceiptError> {
        self.repo
            .find_by_id(id, family_id)
            .await?
            .ok_or(ReceiptError::NotFound(id))
    }

    /// Receipts attached to an expense or business transaction.
    ///
    /// # Errors
    ///
    /// Returns a repository error.
    pub async fn list_for(
        &self,
        target: ReceiptTarget,
        family_id: FamilyId,
    ) -> Result<Vec<Receipt>, ReceiptError> {
        self.repo.list_by_target(target, family_id).await
    }

    /// Presigns a download URL for a receipt.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a storage error.
    pub async fn download_url(
        &self,
        id: ReceiptId,
        family_id: FamilyId,
    ) -> Result<PresignedUrl, ReceiptError> {
        let receipt = self.get(id, family_id).await?;
        Ok(self.storage.presign_download(&receipt.storage_key).await?)
    }

    /// Deletes the blob, then the row.
    ///
    /// A failed blob delete is logged and does not stop the row delete.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or a repository error.
    pub async fn delete(&self, id: ReceiptId, family_id: FamilyId) -> Result<(), ReceiptError> {
        let receipt = self.get(id, family_id).await?;

        if let Err(e) = self.storage.delete(&receipt.storage_key).await {
            tracing::warn!(
                receipt_id = %id,
                storage_key = %receipt.storage_key,
                error = %e,
                "Failed to delete receipt blob"
            );
        }

        if self.repo.delete(id, family_id).await? {
            Ok(())
        } else {
            Err(ReceiptError::NotFound(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::path::PathBuf;
    use std::sync::Mutex;

    use hogar_shared::types::{ExpenseId, UserId};

    use crate::storage::{StorageConfig, StorageProvider};

    #[derive(Default)]
    struct MockReceiptRepository {
        receipts: Mutex<HashMap<ReceiptId, Receipt>>,
        targets: Mutex<HashSet<ReceiptTarget>>,
    }

    impl MockReceiptRepository {
        fn with_target(target: ReceiptTarget) -> Self {
            let repo = Self::default();
            repo.targets.lock().unwrap().insert(target);
            repo
        }
    }

    impl ReceiptRepository for MockReceiptRepository {
        async fn create(&self, input: NewReceipt) -> Result<Receipt, ReceiptError> {
            let receipt = Receipt {
                id: input.id,
                family_id: input.family_id,
                target_kind: input.target.kind(),
                target_id: input.target.id(),
                filename: input.filename,
                file_size: input.file_size,
                mime_type: input.mime_type,
                storage_provider: input.storage_provider,
                storage_bucket: input.storage_bucket,
                storage_key: input.storage_key,
                uploaded_by: input.uploaded_by,
                created_at: chrono::Utc::now(),
            };
            self.receipts.lock().unwrap().insert(receipt.id, receipt.clone());
            Ok(receipt)
        }

        async fn find_by_id(
            &self,
            id: ReceiptId,
            family_id: FamilyId,
        ) -> Result<Option<Receipt>, ReceiptError> {
            Ok(self
                .receipts
                .lock()
                .unwrap()
                .get(&id)
                .filter(|r| r.family_id == family_id)
                .cloned())
        }

        async fn list_by_target(
            &self,
            target: ReceiptTarget,
            family_id: FamilyId,
        ) -> Result<Vec<Receipt>, ReceiptError> {
            Ok(self
                .receipts
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.family_id == family_id && r.target_id == target.id())
                .cloned()
                .collect())
        }

        async fn delete(&self, id: ReceiptId, _family_id: FamilyId) -> Result<bool, ReceiptError> {
            Ok(self.receipts.lock().unwrap().remove(&id).is_some())
        }

        async fn target_exists(
            &self,
            target: ReceiptTarget,
            _family_id: FamilyId,
        ) -> Result<bool, ReceiptError> {
            Ok(self.targets.lock().unwrap().contains(&target))
        }
    }

    struct Fixture {
        root: PathBuf,
        service: ReceiptService<MockReceiptRepository>,
        target: ReceiptTarget,
        family_id: FamilyId,
        owner_id: UserId,
    }

    impl Fixture {
        fn new() -> Self {
            let root =
                std::env::temp_dir().join(format!("hogar-receipts-{}", uuid::Uuid::new_v4()));
            std::fs::create_dir_all(&root).unwrap();
            let storage = StorageService::from_config(StorageConfig::new(StorageProvider::LocalFs {
                root: root.clone(),
            }))
            .unwrap();
            let target = ReceiptTarget::Expense(ExpenseId::new());
            Self {
                root,
                service: ReceiptService::new(
                    Arc::new(storage),
                    Arc::new(MockReceiptRepository::with_target(target)),
                ),
                target,
                family_id: FamilyId::new(),
                owner_id: UserId::new(),
            }
        }

        fn confirm_input(&self, receipt_id: ReceiptId, file_size: u64) -> ConfirmUploadInput {
            ConfirmUploadInput {
                receipt_id,
                family_id: self.family_id,
                owner_id: self.owner_id,
                target: self.target,
                filename: "ticket super.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                file_size,
            }
        }

        /// Stands in for the client's direct upload.
        fn put_object(&self, input: &ConfirmUploadInput, bytes: &[u8]) {
            let path = self.root.join(input.upload_request().storage_key());
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, bytes).unwrap();
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    #[tokio::test]
    async fn test_request_upload_unknown_target() {
        let fx = Fixture::new();
        let result = fx
            .service
            .request_upload(RequestUploadInput {
                family_id: fx.family_id,
                owner_id: fx.owner_id,
                target: ReceiptTarget::Expense(ExpenseId::new()),
                filename: "ticket.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                file_size: 10,
            })
            .await;
        assert!(matches!(result, Err(ReceiptError::TargetNotFound(_))));
    }

    #[tokio::test]
    async fn test_request_upload_rejects_wrong_type() {
        let fx = Fixture::new();
        let result = fx
            .service
            .request_upload(RequestUploadInput {
                family_id: fx.family_id,
                owner_id: fx.owner_id,
                target: fx.target,
                filename: "notes.txt".to_string(),
                content_type: "text/plain".to_string(),
                file_size: 10,
            })
            .await;
        assert!(matches!(
            result,
            Err(ReceiptError::Storage(StorageError::InvalidMimeType(_)))
        ));
    }

    #[tokio::test]
    async fn test_confirm_without_upload() {
        let fx = Fixture::new();
        let result = fx.service.confirm_upload(fx.confirm_input(ReceiptId::new(), 4)).await;
        assert!(matches!(result, Err(ReceiptError::UploadNotVerified)));
    }

    #[tokio::test]
    async fn test_confirm_size_mismatch() {
        let fx = Fixture::new();
        let input = fx.confirm_input(ReceiptId::new(), 10);
        fx.put_object(&input, b"abcd");

        let result = fx.service.confirm_upload(input).await;
        assert!(matches!(
            result,
            Err(ReceiptError::FileSizeMismatch {
                expected: 10,
                actual: 4,
            })
        ));
    }

    #[tokio::test]
    async fn test_confirm_then_delete() {
        let fx = Fixture::new();
        let receipt_id = ReceiptId::new();
        let input = fx.confirm_input(receipt_id, 4);
        fx.put_object(&input, b"abcd");
        let key = input.upload_request().storage_key();

        let receipt = fx.service.confirm_upload(input).await.unwrap();
        assert_eq!(receipt.id, receipt_id);
        assert_eq!(receipt.file_size, 4);
        assert_eq!(receipt.storage_provider, "local");
        assert!(receipt.storage_key.ends_with("ticket_super.jpg"));
        assert_eq!(fx.service.list_for(fx.target, fx.family_id).await.unwrap().len(), 1);

        fx.service.delete(receipt_id, fx.family_id).await.unwrap();
        assert!(!fx.root.join(key).exists());
        assert!(matches!(
            fx.service.get(receipt_id, fx.family_id).await,
            Err(ReceiptError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_other_family_cannot_see_receipt() {
        let fx = Fixture::new();
        let receipt_id = ReceiptId::new();
        let input = fx.confirm_input(receipt_id, 2);
        fx.put_object(&input, b"ok");
        fx.service.confirm_upload(input).await.unwrap();

        assert!(matches!(
            fx.service.download_url(receipt_id, FamilyId::new()).await,
            Err(ReceiptError::NotFound(_))
        ));
    }
}
