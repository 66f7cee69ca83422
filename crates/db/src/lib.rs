//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for every household table
//! - Family-scoped repositories that feed rows to `hogar-core`
//! - The schema migration, including row-level security policies

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod rls;

pub use repositories::{
    BalanceRepository, BudgetRepository, CardRepository, DashboardRepository, EventRepository,
    ExpenseRepository, FamilyRepository, FixedExpenseRepository, IncomeRepository,
    InventoryRepository, ReceiptRepository, SavingsRepository, SettlementRepository,
    ShoppingRepository, SnapshotRepository, UserRepository,
};
pub use rls::RlsConnection;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection with explicit pool bounds.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with_pool(
    database_url: &str,
    max_connections: u32,
    min_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .max_connections(max_connections)
        .min_connections(min_connections)
        .sqlx_logging(false);
    Database::connect(options).await
}
