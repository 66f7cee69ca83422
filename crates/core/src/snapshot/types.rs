//! Snapshot data types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use hogar_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::month::MonthKey;

/// An expense row reduced to what the monthly summary needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseEntry {
    /// Expense date.
    pub date: NaiveDate,
    /// Category name.
    pub category: String,
    /// Amount.
    pub amount: Decimal,
    /// Member who paid.
    pub paid_by: UserId,
}

/// An income row reduced to what the monthly summary needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomeEntry {
    /// Income date.
    pub date: NaiveDate,
    /// Amount.
    pub amount: Decimal,
    /// Member who received it.
    pub received_by: UserId,
}

/// Totals for one month.
///
/// This is also the body persisted when a month is closed, so it carries
/// serde both ways.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month covered.
    pub month: MonthKey,
    /// Expenses per category.
    pub by_category: BTreeMap<String, Decimal>,
    /// Expenses paid per member.
    pub by_member: BTreeMap<UserId, Decimal>,
    /// Income received per member.
    pub income_by_member: BTreeMap<UserId, Decimal>,
    /// Sum of expenses.
    pub total_expenses: Decimal,
    /// Sum of income.
    pub total_income: Decimal,
    /// `total_income - total_expenses`.
    pub net: Decimal,
    /// Number of expenses counted.
    pub expense_count: usize,
}
