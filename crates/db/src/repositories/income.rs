//! Income repository.

use chrono::NaiveDate;
use hogar_core::month::MonthKey;
use hogar_core::snapshot::IncomeEntry;
use hogar_core::split::{SplitError, SplitMode};
use hogar_shared::types::{FamilyId, IncomeId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};

use crate::entities::{incomes, sea_orm_active_enums::SplitKind};

/// Error types for income operations.
#[derive(Debug, thiserror::Error)]
pub enum IncomeRepoError {
    /// Income not found in the family.
    #[error("Income not found: {0}")]
    NotFound(IncomeId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Editable fields of an income, already validated.
#[derive(Debug, Clone)]
pub struct IncomeFields {
    /// Amount, greater than zero.
    pub amount: Decimal,
    /// Date received.
    pub date: NaiveDate,
    /// Source or category.
    pub source: String,
    /// Free text.
    pub description: Option<String>,
    /// Member who received it.
    pub received_by: UserId,
    /// How it is shared.
    pub split: SplitMode,
}

/// Income repository.
#[derive(Debug, Clone)]
pub struct IncomeRepository {
    db: DatabaseConnection,
}

impl IncomeRepository {
    /// Creates a new income repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Incomes dated within `month`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_month(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<Vec<incomes::Model>, DbErr> {
        incomes_in_month(&self.db, family_id, month).await
    }

    /// Finds an income in the family.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn find(
        &self,
        family_id: FamilyId,
        id: IncomeId,
    ) -> Result<incomes::Model, IncomeRepoError> {
        incomes::Entity::find_by_id(id.into_inner())
            .filter(incomes::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(IncomeRepoError::NotFound(id))
    }

    /// Records an income.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        family_id: FamilyId,
        created_by: UserId,
        fields: IncomeFields,
    ) -> Result<incomes::Model, DbErr> {
        let now = chrono::Utc::now().into();
        incomes::ActiveModel {
            id: Set(IncomeId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            amount: Set(fields.amount),
            date: Set(fields.date),
            source: Set(fields.source),
            description: Set(fields.description),
            received_by: Set(fields.received_by.into_inner()),
            split: Set(SplitKind::from(fields.split)),
            for_member: Set(fields.split.for_member().map(UserId::into_inner)),
            created_by: Set(created_by.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
    }

    /// Replaces the editable fields of an income.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn update(
        &self,
        family_id: FamilyId,
        id: IncomeId,
        fields: IncomeFields,
    ) -> Result<incomes::Model, IncomeRepoError> {
        let mut active = self.find(family_id, id).await?.into_active_model();
        active.amount = Set(fields.amount);
        active.date = Set(fields.date);
        active.source = Set(fields.source);
        active.description = Set(fields.description);
        active.received_by = Set(fields.received_by.into_inner());
        active.split = Set(SplitKind::from(fields.split));
        active.for_member = Set(fields.split.for_member().map(UserId::into_inner));
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an income.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn delete(&self, family_id: FamilyId, id: IncomeId) -> Result<(), IncomeRepoError> {
        let result = incomes::Entity::delete_many()
            .filter(incomes::Column::Id.eq(id.into_inner()))
            .filter(incomes::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(IncomeRepoError::NotFound(id));
        }
        Ok(())
    }
}

pub(crate) async fn incomes_in_month<C: ConnectionTrait>(
    conn: &C,
    family_id: FamilyId,
    month: MonthKey,
) -> Result<Vec<incomes::Model>, DbErr> {
    let (start, end) = month.range();
    incomes::Entity::find()
        .filter(incomes::Column::FamilyId.eq(family_id.into_inner()))
        .filter(incomes::Column::Date.gte(start))
        .filter(incomes::Column::Date.lt(end))
        .order_by_desc(incomes::Column::Date)
        .all(conn)
        .await
}

/// Domain split of a stored income.
///
/// # Errors
///
/// Returns an error when the row's split columns disagree.
pub fn income_split(income: &incomes::Model) -> Result<SplitMode, SplitError> {
    income.split.with_member(income.for_member)
}

/// Reduces a stored income to what the monthly summary needs.
pub fn income_entry(income: &incomes::Model) -> IncomeEntry {
    IncomeEntry {
        date: income.date,
        amount: income.amount,
        received_by: UserId::from_uuid(income.received_by),
    }
}
