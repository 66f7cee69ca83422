//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monthly budget declared for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    /// Category name, matched exactly against expense categories.
    pub category: String,
    /// Monthly amount, never negative.
    pub amount: Decimal,
}

/// An expense reduced to what budget tracking needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpend {
    /// Expense category.
    pub category: String,
    /// Expense amount.
    pub amount: Decimal,
}

/// Spend classification against a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// At most 80% spent.
    Normal,
    /// More than 80% spent.
    Warning,
    /// More than 100% spent.
    Over,
}

/// Usage of one budget (or of the family total).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetUsage {
    /// Category name, or `None` for the aggregate line.
    pub category: Option<String>,
    /// Budgeted amount.
    pub budget: Decimal,
    /// Amount spent.
    pub spent: Decimal,
    /// `budget - spent`, negative when over.
    pub remaining: Decimal,
    /// `spent / budget * 100`, two decimals; 0 when the budget is 0.
    pub percent_spent: Decimal,
    /// Status derived from the percentage.
    pub status: BudgetStatus,
}

/// Budget usage for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetReport {
    /// One line per declared budget, in category order.
    pub categories: Vec<BudgetUsage>,
    /// Sum of all budgets vs everything spent in the month.
    pub total: BudgetUsage,
    /// Spend in categories that have no budget.
    pub unbudgeted_spent: Decimal,
}
