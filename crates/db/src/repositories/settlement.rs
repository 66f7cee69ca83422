//! Settlement repository.

use chrono::NaiveDate;
use hogar_core::balance::SettlementLine;
use hogar_core::month::MonthKey;
use hogar_shared::types::{FamilyId, SettlementId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::entities::settlements;

/// Error types for settlement operations.
#[derive(Debug, thiserror::Error)]
pub enum SettlementRepoError {
    /// Settlement not found in the family.
    #[error("Settlement not found: {0}")]
    NotFound(SettlementId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// A validated settlement to record.
#[derive(Debug, Clone)]
pub struct NewSettlement {
    /// Member paying back.
    pub from_user: UserId,
    /// Member being paid.
    pub to_user: UserId,
    /// Amount, greater than zero.
    pub amount: Decimal,
    /// Date.
    pub date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
}

/// Settlement repository.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    db: DatabaseConnection,
}

impl SettlementRepository {
    /// Creates a new settlement repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Settlements dated within `month`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_month(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<Vec<settlements::Model>, DbErr> {
        let (start, end) = month.range();
        settlements::Entity::find()
            .filter(settlements::Column::FamilyId.eq(family_id.into_inner()))
            .filter(settlements::Column::Date.gte(start))
            .filter(settlements::Column::Date.lt(end))
            .order_by_desc(settlements::Column::Date)
            .all(&self.db)
            .await
    }

    /// Finds a settlement in the family.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn find(
        &self,
        family_id: FamilyId,
        id: SettlementId,
    ) -> Result<settlements::Model, SettlementRepoError> {
        settlements::Entity::find_by_id(id.into_inner())
            .filter(settlements::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(SettlementRepoError::NotFound(id))
    }

    /// Records a settlement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        family_id: FamilyId,
        created_by: UserId,
        input: NewSettlement,
    ) -> Result<settlements::Model, DbErr> {
        let settlement = settlements::ActiveModel {
            id: Set(SettlementId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            from_user: Set(input.from_user.into_inner()),
            to_user: Set(input.to_user.into_inner()),
            amount: Set(input.amount),
            date: Set(input.date),
            note: Set(input.note),
            created_by: Set(created_by.into_inner()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(
            family_id = %family_id,
            from_user = %settlement.from_user,
            to_user = %settlement.to_user,
            amount = %settlement.amount,
            "settlement recorded"
        );
        Ok(settlement)
    }

    /// Deletes a settlement.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn delete(
        &self,
        family_id: FamilyId,
        id: SettlementId,
    ) -> Result<(), SettlementRepoError> {
        let result = settlements::Entity::delete_many()
            .filter(settlements::Column::Id.eq(id.into_inner()))
            .filter(settlements::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(SettlementRepoError::NotFound(id));
        }
        Ok(())
    }
}

/// Reduces a stored settlement to what the balance computation needs.
pub fn settlement_line(settlement: &settlements::Model) -> SettlementLine {
    SettlementLine {
        from_user: UserId::from_uuid(settlement.from_user),
        to_user: UserId::from_uuid(settlement.to_user),
        amount: settlement.amount,
    }
}
