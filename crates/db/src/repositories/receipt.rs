//! Receipt repository backing the receipt service.

use hogar_core::receipt::{
    NewReceipt, Receipt, ReceiptError, ReceiptRepository as ReceiptRepoTrait, ReceiptTarget,
};
use hogar_shared::types::{FamilyId, ReceiptId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::{
    business_transactions, expenses, receipts, sea_orm_active_enums::ReceiptTargetKind,
};

/// Receipt repository implementation.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    db: DatabaseConnection,
}

impl ReceiptRepository {
    /// Creates a new receipt repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ReceiptRepoTrait for ReceiptRepository {
    async fn create(&self, input: NewReceipt) -> Result<Receipt, ReceiptError> {
        let model = receipts::ActiveModel {
            id: Set(input.id.into_inner()),
            family_id: Set(input.family_id.into_inner()),
            target_kind: Set(ReceiptTargetKind::from(input.target)),
            target_id: Set(input.target.id()),
            filename: Set(input.filename),
            file_size: Set(input.file_size),
            mime_type: Set(input.mime_type),
            storage_provider: Set(input.storage_provider),
            storage_bucket: Set(input.storage_bucket),
            storage_key: Set(input.storage_key),
            uploaded_by: Set(input.uploaded_by.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(to_domain(model))
    }

    async fn find_by_id(
        &self,
        id: ReceiptId,
        family_id: FamilyId,
    ) -> Result<Option<Receipt>, ReceiptError> {
        let model = receipts::Entity::find_by_id(id.into_inner())
            .filter(receipts::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.map(to_domain))
    }

    async fn list_by_target(
        &self,
        target: ReceiptTarget,
        family_id: FamilyId,
    ) -> Result<Vec<Receipt>, ReceiptError> {
        let models = receipts::Entity::find()
            .filter(receipts::Column::FamilyId.eq(family_id.into_inner()))
            .filter(receipts::Column::TargetKind.eq(ReceiptTargetKind::from(target)))
            .filter(receipts::Column::TargetId.eq(target.id()))
            .order_by_asc(receipts::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, id: ReceiptId, family_id: FamilyId) -> Result<bool, ReceiptError> {
        let result = receipts::Entity::delete_many()
            .filter(receipts::Column::Id.eq(id.into_inner()))
            .filter(receipts::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn target_exists(
        &self,
        target: ReceiptTarget,
        family_id: FamilyId,
    ) -> Result<bool, ReceiptError> {
        let count = match target {
            ReceiptTarget::Expense(id) => {
                expenses::Entity::find_by_id(id.into_inner())
                    .filter(expenses::Column::FamilyId.eq(family_id.into_inner()))
                    .count(&self.db)
                    .await
            }
            ReceiptTarget::BusinessTransaction(id) => {
                business_transactions::Entity::find_by_id(id.into_inner())
                    .filter(business_transactions::Column::FamilyId.eq(family_id.into_inner()))
                    .count(&self.db)
                    .await
            }
        }
        .map_err(repo_err)?;
        Ok(count > 0)
    }
}

#[allow(clippy::needless_pass_by_value)]
fn repo_err(e: DbErr) -> ReceiptError {
    ReceiptError::Repository(e.to_string())
}

fn to_domain(model: receipts::Model) -> Receipt {
    Receipt {
        id: ReceiptId::from_uuid(model.id),
        family_id: FamilyId::from_uuid(model.family_id),
        target_kind: model.target_kind.as_str(),
        target_id: model.target_id,
        filename: model.filename,
        file_size: model.file_size,
        mime_type: model.mime_type,
        storage_provider: model.storage_provider,
        storage_bucket: model.storage_bucket,
        storage_key: model.storage_key,
        uploaded_by: UserId::from_uuid(model.uploaded_by),
        created_at: model.created_at.into(),
    }
}
