//! Receipt data types.

use std::fmt;

use chrono::{DateTime, Utc};
use hogar_shared::types::{BusinessTransactionId, ExpenseId, FamilyId, ReceiptId, UserId};
use serde::Serialize;
use uuid::Uuid;

use crate::storage::{PresignedUrl, UploadRequest};

/// What a receipt belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReceiptTarget {
    /// A household expense.
    Expense(ExpenseId),
    /// A business sale or purchase.
    BusinessTransaction(BusinessTransactionId),
}

impl ReceiptTarget {
    /// Persisted kind column.
    #[must_use]
    pub const fn kind(self) -> &'static str {
        match self {
            Self::Expense(_) => "expense",
            Self::BusinessTransaction(_) => "business_transaction",
        }
    }

    /// Id of the target row.
    #[must_use]
    pub const fn id(self) -> Uuid {
        match self {
            Self::Expense(id) => id.into_inner(),
            Self::BusinessTransaction(id) => id.into_inner(),
        }
    }

    /// Rebuilds a target from its kind column and id.
    #[must_use]
    pub fn from_parts(kind: &str, id: Uuid) -> Option<Self> {
        match kind {
            "expense" => Some(Self::Expense(ExpenseId::from_uuid(id))),
            "business_transaction" => Some(Self::BusinessTransaction(
                BusinessTransactionId::from_uuid(id),
            )),
            _ => None,
        }
    }
}

impl fmt::Display for ReceiptTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind().replace('_', " "), self.id())
    }
}

/// Request for an upload URL.
#[derive(Debug, Clone)]
pub struct RequestUploadInput {
    /// Family.
    pub family_id: FamilyId,
    /// Uploading member.
    pub owner_id: UserId,
    /// Row the receipt will be attached to.
    pub target: ReceiptTarget,
    /// Client filename.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Size in bytes.
    pub file_size: u64,
}

/// Upload URL and the id reserved for the receipt.
#[derive(Debug, Clone, Serialize)]
pub struct RequestUploadResult {
    /// Id to pass back when confirming.
    pub receipt_id: ReceiptId,
    /// Where to `PUT` the file.
    pub upload: PresignedUrl,
    /// Object key the file will live under.
    pub storage_key: String,
}

/// Confirmation of a finished upload.
///
/// Carries the same file details as the request so the key can be
/// recomputed; a client cannot point a receipt at someone else's object.
#[derive(Debug, Clone)]
pub struct ConfirmUploadInput {
    /// Id from [`RequestUploadResult`].
    pub receipt_id: ReceiptId,
    /// Family.
    pub family_id: FamilyId,
    /// Uploading member.
    pub owner_id: UserId,
    /// Target row.
    pub target: ReceiptTarget,
    /// Client filename.
    pub filename: String,
    /// MIME type.
    pub content_type: String,
    /// Declared size.
    pub file_size: u64,
}

impl ConfirmUploadInput {
    pub(crate) fn upload_request(&self) -> UploadRequest {
        UploadRequest {
            family_id: self.family_id,
            owner_id: self.owner_id,
            receipt_id: self.receipt_id,
            filename: self.filename.clone(),
            content_type: self.content_type.clone(),
            file_size: self.file_size,
        }
    }
}

/// Receipt row to insert.
#[derive(Debug, Clone)]
pub struct NewReceipt {
    /// Id reserved at request time.
    pub id: ReceiptId,
    /// Family.
    pub family_id: FamilyId,
    /// Target row.
    pub target: ReceiptTarget,
    /// Client filename.
    pub filename: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Backend name.
    pub storage_provider: String,
    /// Bucket or container.
    pub storage_bucket: String,
    /// Object key.
    pub storage_key: String,
    /// Uploading member.
    pub uploaded_by: UserId,
}

/// A stored receipt.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    /// Id.
    pub id: ReceiptId,
    /// Family.
    pub family_id: FamilyId,
    /// `expense` or `business_transaction`.
    pub target_kind: &'static str,
    /// Target row id.
    pub target_id: Uuid,
    /// Client filename.
    pub filename: String,
    /// Size in bytes.
    pub file_size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Backend name.
    pub storage_provider: String,
    /// Bucket or container.
    pub storage_bucket: String,
    /// Object key.
    #[serde(skip)]
    pub storage_key: String,
    /// Uploading member.
    pub uploaded_by: UserId,
    /// Upload confirmation time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_parts_roundtrip() {
        let expense = ReceiptTarget::Expense(ExpenseId::new());
        let sale = ReceiptTarget::BusinessTransaction(BusinessTransactionId::new());

        for target in [expense, sale] {
            assert_eq!(ReceiptTarget::from_parts(target.kind(), target.id()), Some(target));
        }
        assert_eq!(ReceiptTarget::from_parts("income", Uuid::nil()), None);
    }

    #[test]
    fn test_target_display() {
        let target =
            ReceiptTarget::BusinessTransaction(BusinessTransactionId::from_uuid(Uuid::nil()));
        assert_eq!(
            target.to_string(),
            "business transaction 00000000-0000-0000-0000-000000000000"
        );
    }
}
