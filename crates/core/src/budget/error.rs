//! Budget error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Budget-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// Category name is blank.
    #[error("Budget category must not be empty")]
    EmptyCategory,

    /// Amount cannot be negative.
    #[error("Budget amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    /// A budget for this category already exists in the family.
    #[error("A budget for category '{0}' already exists")]
    DuplicateCategory(String),
}
