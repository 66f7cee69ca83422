//! Property-based tests for budget module.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::BudgetService;
use super::types::{BudgetStatus, CategoryBudget, CategorySpend};

proptest! {
    /// A zero budget reports 0% whatever was spent.
    #[test]
    fn test_zero_budget_percent(spent in 0i64..1_000_000_000) {
        let usage = BudgetService::calculate_usage(None, Decimal::ZERO, Decimal::new(spent, 2));
        prop_assert_eq!(usage.percent_spent, Decimal::ZERO);
        prop_assert_eq!(usage.status, BudgetStatus::Normal);
    }

    /// percent = spent / budget * 100 for a positive budget.
    #[test]
    fn test_percent_nonzero_budget(
        budget in 1i64..1_000_000_000,
        spent in 0i64..1_000_000_000,
    ) {
        let budget = Decimal::new(budget, 2);
        let spent = Decimal::new(spent, 2);
        let usage = BudgetService::calculate_usage(None, budget, spent);

        prop_assert_eq!(usage.percent_spent, (spent / budget * dec!(100)).round_dp(2));
        prop_assert_eq!(usage.remaining, budget - spent);
    }

    /// Status thresholds follow spent vs 80% and 100% of the budget.
    #[test]
    fn test_status_thresholds(
        budget in 1i64..1_000_000,
        spent in 0i64..3_000_000,
    ) {
        let budget = Decimal::from(budget);
        let spent = Decimal::from(spent);
        let usage = BudgetService::calculate_usage(None, budget, spent);

        let expected = if spent > budget {
            BudgetStatus::Over
        } else if spent * dec!(100) > budget * dec!(80) {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Normal
        };
        prop_assert_eq!(usage.status, expected);
    }

    /// Every expense lands either in a budgeted line or in the unbudgeted total.
    #[test]
    fn test_report_accounts_for_all_spend(
        amounts in prop::collection::vec((0usize..4, 1i64..100_000), 0..30),
    ) {
        let names = ["Food", "Rent", "Fun", "Health"];
        let budgets = vec![
            CategoryBudget {
                category: "Food".into(),
                amount: dec!(500),
            },
            CategoryBudget {
                category: "Rent".into(),
                amount: dec!(1200),
            },
        ];
        let expenses: Vec<CategorySpend> = amounts
            .into_iter()
            .map(|(i, cents)| CategorySpend {
                category: names[i].to_string(),
                amount: Decimal::new(cents, 2),
            })
            .collect();

        let report = BudgetService::report(&budgets, &expenses);
        let budgeted: Decimal = report.categories.iter().map(|c| c.spent).sum();
        let all: Decimal = expenses.iter().map(|e| e.amount).sum();

        prop_assert_eq!(budgeted + report.unbudgeted_spent, all);
        prop_assert_eq!(report.total.spent, all);
        prop_assert_eq!(report.total.budget, dec!(1700));
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_report_orders_by_category() {
        let budgets = vec![
            CategoryBudget {
                category: "Rent".into(),
                amount: dec!(1000),
            },
            CategoryBudget {
                category: "Food".into(),
                amount: dec!(400),
            },
        ];
        let expenses = vec![
            CategorySpend {
                category: "Food".into(),
                amount: dec!(350),
            },
            CategorySpend {
                category: "Taxi".into(),
                amount: dec!(20),
            },
        ];

        let report = BudgetService::report(&budgets, &expenses);

        let food = &report.categories[0];
        assert_eq!(food.category.as_deref(), Some("Food"));
        assert_eq!(food.status, BudgetStatus::Warning);
        assert_eq!(food.percent_spent, dec!(87.50));

        let rent = &report.categories[1];
        assert_eq!(rent.spent, dec!(0));
        assert_eq!(rent.status, BudgetStatus::Normal);

        assert_eq!(report.unbudgeted_spent, dec!(20));
        assert_eq!(report.total.spent, dec!(370));
        assert!(report.total.category.is_none());
    }
}
