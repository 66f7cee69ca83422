//! Category budgets and spend tracking.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use service::BudgetService;
pub use types::{BudgetReport, BudgetStatus, BudgetUsage, CategoryBudget, CategorySpend};
