//! Monthly snapshot repository.
//!
//! A snapshot freezes a month's summary when the family closes it. Open
//! months are always summarized live from the expense and income rows.

use hogar_core::month::MonthKey;
use hogar_core::snapshot::{MonthlySummary, SnapshotError, SnapshotService};
use hogar_shared::types::{FamilyId, PageRequest, SnapshotId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use super::expense::{expense_entry, expenses_in_month};
use super::income::{income_entry, incomes_in_month};
use super::is_unique_violation;
use crate::entities::monthly_snapshots;
use crate::rls::RlsConnection;

/// Error types for snapshot operations.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotRepoError {
    /// The month cannot be closed.
    #[error(transparent)]
    Rejected(#[from] SnapshotError),

    /// Stored summary could not be read or written.
    #[error("Invalid snapshot summary: {0}")]
    Summary(#[from] serde_json::Error),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Snapshot repository.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    db: DatabaseConnection,
}

impl SnapshotRepository {
    /// Creates a new snapshot repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// One page of closed months, newest first, with the total count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_page(
        &self,
        family_id: FamilyId,
        page: &PageRequest,
    ) -> Result<(Vec<monthly_snapshots::Model>, u64), DbErr> {
        let query = monthly_snapshots::Entity::find()
            .filter(monthly_snapshots::Column::FamilyId.eq(family_id.into_inner()));
        let total = query.clone().count(&self.db).await?;
        let rows = query
            .order_by_desc(monthly_snapshots::Column::Month)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;
        Ok((rows, total))
    }

    /// The snapshot of `month`, if it was closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<Option<monthly_snapshots::Model>, DbErr> {
        find_month(&self.db, family_id, month).await
    }

    /// Live summary of `month`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn summarize(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<MonthlySummary, DbErr> {
        summarize_on(&self.db, family_id, month).await
    }

    /// Summary of `month`: the frozen one when closed, live otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored summary is unreadable.
    pub async fn summary_for(
        &self,
        family_id: FamilyId,
        month: MonthKey,
    ) -> Result<MonthlySummary, SnapshotRepoError> {
        match self.find(family_id, month).await? {
            Some(snapshot) => Ok(stored_summary(&snapshot)?),
            None => Ok(self.summarize(family_id, month).await?),
        }
    }

    /// Freezes the summary of `month`.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` when the month is already closed or still ahead
    /// of `current`.
    pub async fn close(
        &self,
        family_id: FamilyId,
        month: MonthKey,
        current: MonthKey,
        closed_by: UserId,
    ) -> Result<monthly_snapshots::Model, SnapshotRepoError> {
        let rls = RlsConnection::new(&self.db, family_id).await?;
        let txn = rls.transaction();

        let existing = find_month(txn, family_id, month).await?;
        SnapshotService::ensure_can_close(month, existing.is_some(), current)?;

        let summary = summarize_on(txn, family_id, month).await?;
        let snapshot = monthly_snapshots::ActiveModel {
            id: Set(SnapshotId::new().into_inner()),
            family_id: Set(family_id.into_inner()),
            month: Set(month.to_string()),
            summary: Set(serde_json::to_value(&summary)?),
            total_expenses: Set(summary.total_expenses),
            total_income: Set(summary.total_income),
            closed_by: Set(closed_by.into_inner()),
            closed_at: Set(chrono::Utc::now().into()),
        }
        .insert(txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                SnapshotRepoError::Rejected(SnapshotError::AlreadyClosed(month))
            } else {
                SnapshotRepoError::Database(e)
            }
        })?;

        rls.commit().await?;

        tracing::info!(
            family_id = %family_id,
            month = %month,
            total_expenses = %summary.total_expenses,
            "month closed"
        );
        Ok(snapshot)
    }
}

/// Reads the frozen summary of a snapshot row.
///
/// # Errors
///
/// Returns an error if the stored JSON does not match [`MonthlySummary`].
pub fn stored_summary(
    snapshot: &monthly_snapshots::Model,
) -> Result<MonthlySummary, serde_json::Error> {
    serde_json::from_value(snapshot.summary.clone())
}

async fn find_month<C: ConnectionTrait>(
    conn: &C,
    family_id: FamilyId,
    month: MonthKey,
) -> Result<Option<monthly_snapshots::Model>, DbErr> {
    monthly_snapshots::Entity::find()
        .filter(monthly_snapshots::Column::FamilyId.eq(family_id.into_inner()))
        .filter(monthly_snapshots::Column::Month.eq(month.to_string()))
        .one(conn)
        .await
}

async fn summarize_on<C: ConnectionTrait>(
    conn: &C,
    family_id: FamilyId,
    month: MonthKey,
) -> Result<MonthlySummary, DbErr> {
    let expenses = expenses_in_month(conn, family_id, month).await?;
    let incomes = incomes_in_month(conn, family_id, month).await?;

    let expense_entries: Vec<_> = expenses.iter().map(expense_entry).collect();
    let income_entries: Vec<_> = incomes.iter().map(income_entry).collect();
    Ok(SnapshotService::summarize(month, &expense_entries, &income_entries))
}
