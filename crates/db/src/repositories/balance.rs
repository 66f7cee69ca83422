//! Loads a month's rows and computes the family balance sheet.

use hogar_core::balance::{BalanceService, BalanceSheet, SharePolicy};
use hogar_core::month::MonthKey;
use hogar_core::split::SplitError;
use hogar_shared::types::FamilyId;
use sea_orm::{DatabaseConnection, DbErr};

use super::expense::{ExpenseRepository, expense_line};
use super::family::FamilyRepository;
use super::settlement::{SettlementRepository, settlement_line};

/// Error types for balance loading.
#[derive(Debug, thiserror::Error)]
pub enum BalanceRepoError {
    /// A stored expense has an inconsistent split.
    #[error("Invalid split on stored expense: {0}")]
    InvalidSplit(#[from] SplitError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Balance repository.
#[derive(Debug, Clone)]
pub struct BalanceRepository {
    families: FamilyRepository,
    expenses: ExpenseRepository,
    settlements: SettlementRepository,
}

impl BalanceRepository {
    /// Creates a new balance repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            families: FamilyRepository::new(db.clone()),
            expenses: ExpenseRepository::new(db.clone()),
            settlements: SettlementRepository::new(db),
        }
    }

    /// Balance sheet for the expenses and settlements dated in `month`.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored split is inconsistent.
    pub async fn sheet(
        &self,
        family_id: FamilyId,
        month: MonthKey,
        policy: SharePolicy,
    ) -> Result<BalanceSheet, BalanceRepoError> {
        let (members, expenses, settlements) = tokio::try_join!(
            self.families.balance_members(family_id),
            self.expenses.list_by_month(family_id, month),
            self.settlements.list_by_month(family_id, month),
        )?;

        let lines = expenses.iter().map(expense_line).collect::<Result<Vec<_>, _>>()?;
        let settlement_lines: Vec<_> = settlements.iter().map(settlement_line).collect();

        Ok(BalanceService::compute(&lines, &members, &settlement_lines, policy))
    }
}
