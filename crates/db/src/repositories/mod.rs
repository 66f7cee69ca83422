//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every query is scoped to a family.

pub mod balance;
pub mod budget;
pub mod card;
pub mod dashboard;
pub mod event;
pub mod expense;
pub mod family;
pub mod fixed_expense;
pub mod income;
pub mod inventory;
pub mod receipt;
pub mod savings;
pub mod settlement;
pub mod shopping;
pub mod snapshot;
pub mod user;

pub use balance::{BalanceRepoError, BalanceRepository};
pub use budget::{BudgetRepoError, BudgetRepository};
pub use card::{CardFields, CardRepoError, CardRepository, NewCardMovement};
pub use dashboard::{DashboardRepoError, DashboardRepository};
pub use event::{EventFields, EventRepoError, EventRepository};
pub use expense::{ExpenseFields, ExpenseRepoError, ExpenseRepository, RemovedReceiptKeys};
pub use family::{FamilyRepoError, FamilyRepository};
pub use fixed_expense::{FixedExpenseFields, FixedExpenseRepoError, FixedExpenseRepository};
pub use income::{IncomeFields, IncomeRepoError, IncomeRepository};
pub use inventory::{InventoryRepoError, InventoryRepository, NewBusinessTransaction, ProductFields};
pub use receipt::ReceiptRepository;
pub use savings::{NewSavingsMovement, SavingsAccountFields, SavingsRepoError, SavingsRepository};
pub use settlement::{NewSettlement, SettlementRepoError, SettlementRepository};
pub use shopping::{ShoppingRepoError, ShoppingRepository};
pub use snapshot::{SnapshotRepoError, SnapshotRepository};
pub use user::UserRepository;

use sea_orm::{DbErr, SqlErr};

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
