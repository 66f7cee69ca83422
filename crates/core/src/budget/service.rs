//! Budget service for usage calculation and validation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{BudgetReport, BudgetStatus, BudgetUsage, CategoryBudget, CategorySpend};

const WARNING_PERCENT: Decimal = Decimal::from_parts(80, 0, 0, false, 0);

/// Budget service for business logic.
pub struct BudgetService;

impl BudgetService {
    /// Calculates usage of `budget` given `spent`.
    ///
    /// The status is classified on the unrounded percentage: `Over` above
    /// 100, `Warning` above 80, `Normal` otherwise.
    #[must_use]
    pub fn calculate_usage(
        category: Option<String>,
        budget: Decimal,
        spent: Decimal,
    ) -> BudgetUsage {
        let percent = if budget.is_zero() {
            Decimal::ZERO
        } else {
            spent / budget * Decimal::ONE_HUNDRED
        };

        let status = if percent > Decimal::ONE_HUNDRED {
            BudgetStatus::Over
        } else if percent > WARNING_PERCENT {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Normal
        };

        BudgetUsage {
            category,
            budget,
            spent,
            remaining: budget - spent,
            percent_spent: percent.round_dp(2),
            status,
        }
    }

    /// Sums spend per category.
    #[must_use]
    pub fn spent_by_category(expenses: &[CategorySpend]) -> BTreeMap<String, Decimal> {
        let mut totals = BTreeMap::new();
        for expense in expenses {
            *totals
                .entry(expense.category.clone())
                .or_insert(Decimal::ZERO) += expense.amount;
        }
        totals
    }

    /// Builds the month's report from declared budgets and that month's expenses.
    #[must_use]
    pub fn report(budgets: &[CategoryBudget], expenses: &[CategorySpend]) -> BudgetReport {
        let mut spent = Self::spent_by_category(expenses);

        let mut ordered: Vec<&CategoryBudget> = budgets.iter().collect();
        ordered.sort_by(|a, b| a.category.cmp(&b.category));

        let categories: Vec<BudgetUsage> = ordered
            .into_iter()
            .map(|b| {
                let used = spent.remove(&b.category).unwrap_or_default();
                Self::calculate_usage(Some(b.category.clone()), b.amount, used)
            })
            .collect();

        let unbudgeted_spent: Decimal = spent.values().copied().sum();
        let total_budget: Decimal = budgets.iter().map(|b| b.amount).sum();
        let total_spent: Decimal = expenses.iter().map(|e| e.amount).sum();

        BudgetReport {
            categories,
            total: Self::calculate_usage(None, total_budget, total_spent),
            unbudgeted_spent,
        }
    }

    /// Validates a budget before it is stored.
    ///
    /// Returns the trimmed category name.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::EmptyCategory` for a blank category and
    /// `BudgetError::NegativeAmount` for a negative amount.
    pub fn validate(category: &str, amount: Decimal) -> Result<String, BudgetError> {
        let category = category.trim();
        if category.is_empty() {
            return Err(BudgetError::EmptyCategory);
        }

        if amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount(amount));
        }

        Ok(category.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_usage_normal() {
        let usage = BudgetService::calculate_usage(Some("Food".into()), dec!(500), dec!(200));

        assert_eq!(usage.remaining, dec!(300));
        assert_eq!(usage.percent_spent, dec!(40.00));
        assert_eq!(usage.status, BudgetStatus::Normal);
    }

    #[test]
    fn test_usage_warning_above_eighty() {
        let usage = BudgetService::calculate_usage(None, dec!(100), dec!(80.01));
        assert_eq!(usage.status, BudgetStatus::Warning);

        let usage = BudgetService::calculate_usage(None, dec!(100), dec!(80));
        assert_eq!(usage.status, BudgetStatus::Normal);
    }

    #[test]
    fn test_usage_over_above_hundred() {
        let usage = BudgetService::calculate_usage(None, dec!(100), dec!(100));
        assert_eq!(usage.status, BudgetStatus::Warning);

        let usage = BudgetService::calculate_usage(None, dec!(100), dec!(120));
        assert_eq!(usage.status, BudgetStatus::Over);
        assert_eq!(usage.remaining, dec!(-20));
        assert_eq!(usage.percent_spent, dec!(120.00));
    }

    #[test]
    fn test_zero_budget_is_zero_percent() {
        let usage = BudgetService::calculate_usage(None, dec!(0), dec!(500));

        assert_eq!(usage.percent_spent, dec!(0));
        assert_eq!(usage.status, BudgetStatus::Normal);
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            BudgetService::validate("  Food ", dec!(0)),
            Ok("Food".to_string())
        );
        assert_eq!(
            BudgetService::validate("   ", dec!(10)),
            Err(BudgetError::EmptyCategory)
        );
        assert_eq!(
            BudgetService::validate("Food", dec!(-1)),
            Err(BudgetError::NegativeAmount(dec!(-1)))
        );
    }
}
