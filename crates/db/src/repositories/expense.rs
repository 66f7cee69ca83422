//! Expense repository, including the per-expense note thread.

use chrono::NaiveDate;
use hogar_core::balance::ExpenseLine;
use hogar_core::month::MonthKey;
use hogar_core::snapshot::ExpenseEntry;
use hogar_core::split::{SplitError, SplitMode};
use hogar_shared::types::{ExpenseId, ExpenseNoteId, FamilyId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::entities::{
    expense_notes, expenses, receipts,
    sea_orm_active_enums::{ReceiptTargetKind, SplitKind},
};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseRepoError {
    /// Expense not found in the family.
    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),

    /// A stored row has an inconsistent split.
    #[error("Invalid split on stored expense: {0}")]
    InvalidSplit(#[from] SplitError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Editable fields of an expense, already validated.
#[derive(Debug, Clone)]
pub struct ExpenseFields {
    /// Amount, greater than zero.
    pub amount: Decimal,
    /// Date spent.
    pub date: NaiveDate,
    /// Trimmed category.
    pub category: String,
    /// Free text.
    pub description: Option<String>,
    /// Member who paid.
    pub paid_by: UserId,
    /// How it is shared.
    pub split: SplitMode,
}

/// Storage keys of receipts removed along with a deleted row.
pub type RemovedReceiptKeys = Vec<String>;

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Expenses dated within `month`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_month(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<Vec<expenses::Model>, DbErr> {
        expenses_in_month(&self.db, family_id, month).await
    }

    /// Finds an expense in the family.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn find(
        &self,
        family_id: FamilyId,
        id: ExpenseId,
    ) -> Result<expenses::Model, ExpenseRepoError> {
        expenses::Entity::find_by_id(id.into_inner())
            .filter(expenses::Column::FamilyId.eq(family_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or(ExpenseRepoError::NotFound(id))
    }

    /// Records an expense.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        family_id: FamilyId,
        created_by: UserId,
        fields: ExpenseFields,
    ) -> Result<expenses::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let expense = expenses::ActiveModel {
            id: Set(ExpenseId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            amount: Set(fields.amount),
            date: Set(fields.date),
            category: Set(fields.category),
            description: Set(fields.description),
            paid_by: Set(fields.paid_by.into_inner()),
            split: Set(SplitKind::from(fields.split)),
            for_member: Set(fields.split.for_member().map(UserId::into_inner)),
            created_by: Set(created_by.into_inner()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let expense = expense.insert(&self.db).await?;
        tracing::debug!(
            family_id = %family_id,
            expense_id = %expense.id,
            amount = %expense.amount,
            "expense created"
        );
        Ok(expense)
    }

    /// Replaces the editable fields of an expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn update(
        &self,
        family_id: FamilyId,
        id: ExpenseId,
        fields: ExpenseFields,
    ) -> Result<expenses::Model, ExpenseRepoError> {
        let mut active = self.find(family_id, id).await?.into_active_model();
        active.amount = Set(fields.amount);
        active.date = Set(fields.date);
        active.category = Set(fields.category);
        active.description = Set(fields.description);
        active.paid_by = Set(fields.paid_by.into_inner());
        active.split = Set(SplitKind::from(fields.split));
        active.for_member = Set(fields.split.for_member().map(UserId::into_inner));
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an expense with its notes and receipt rows.
    ///
    /// Returns the storage keys of the removed receipts so the caller can
    /// delete the blobs.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not exist in this family.
    pub async fn delete(
        &self,
        family_id: FamilyId,
        id: ExpenseId,
    ) -> Result<RemovedReceiptKeys, ExpenseRepoError> {
        let txn = self.db.begin().await?;

        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(id.into_inner()))
            .filter(expenses::Column::FamilyId.eq(family_id.into_inner()))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(ExpenseRepoError::NotFound(id));
        }

        let receipt_rows = receipts::Entity::find()
            .filter(receipts::Column::FamilyId.eq(family_id.into_inner()))
            .filter(receipts::Column::TargetKind.eq(ReceiptTargetKind::Expense))
            .filter(receipts::Column::TargetId.eq(id.into_inner()))
            .all(&txn)
            .await?;
        receipts::Entity::delete_many()
            .filter(receipts::Column::FamilyId.eq(family_id.into_inner()))
            .filter(receipts::Column::TargetKind.eq(ReceiptTargetKind::Expense))
            .filter(receipts::Column::TargetId.eq(id.into_inner()))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::debug!(family_id = %family_id, expense_id = %id, "expense deleted");
        Ok(receipt_rows.into_iter().map(|r| r.storage_key).collect())
    }

    /// Notes on an expense, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the expense does not exist in this family.
    pub async fn list_notes(
        &self,
        family_id: FamilyId,
        expense_id: ExpenseId,
    ) -> Result<Vec<expense_notes::Model>, ExpenseRepoError> {
        self.find(family_id, expense_id).await?;
        Ok(expense_notes::Entity::find()
            .filter(expense_notes::Column::FamilyId.eq(family_id.into_inner()))
            .filter(expense_notes::Column::ExpenseId.eq(expense_id.into_inner()))
            .order_by_asc(expense_notes::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Adds a note to an expense.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the expense does not exist in this family.
    pub async fn add_note(
        &self,
        family_id: FamilyId,
        expense_id: ExpenseId,
        author_id: UserId,
        body: &str,
    ) -> Result<expense_notes::Model, ExpenseRepoError> {
        self.find(family_id, expense_id).await?;
        let note = expense_notes::ActiveModel {
            id: Set(ExpenseNoteId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            expense_id: Set(expense_id.into_inner()),
            author_id: Set(author_id.into_inner()),
            body: Set(body.to_string()),
            created_at: Set(chrono::Utc::now().into()),
        };
        Ok(note.insert(&self.db).await?)
    }
}

pub(crate) async fn expenses_in_month<C: ConnectionTrait>(
    conn: &C,
    family_id: FamilyId,
    month: MonthKey,
) -> Result<Vec<expenses::Model>, DbErr> {
    let (start, end) = month.range();
    expenses::Entity::find()
        .filter(expenses::Column::FamilyId.eq(family_id.into_inner()))
        .filter(expenses::Column::Date.gte(start))
        .filter(expenses::Column::Date.lt(end))
        .order_by_desc(expenses::Column::Date)
        .order_by_desc(expenses::Column::CreatedAt)
        .all(conn)
        .await
}

/// Domain split of a stored expense.
///
/// # Errors
///
/// Returns an error when the row's split columns disagree.
pub fn split_of(expense: &expenses::Model) -> Result<SplitMode, SplitError> {
    expense.split.with_member(expense.for_member)
}

/// Reduces a stored expense to what the balance computation needs.
///
/// # Errors
///
/// Returns an error when the row's split columns disagree.
pub fn expense_line(expense: &expenses::Model) -> Result<ExpenseLine, SplitError> {
    Ok(ExpenseLine {
        amount: expense.amount,
        paid_by: UserId::from_uuid(expense.paid_by),
        split: split_of(expense)?,
    })
}

/// Reduces a stored expense to what the monthly summary needs.
pub fn expense_entry(expense: &expenses::Model) -> ExpenseEntry {
    ExpenseEntry {
        date: expense.date,
        category: expense.category.clone(),
        amount: expense.amount,
        paid_by: UserId::from_uuid(expense.paid_by),
    }
}
