//! Monthly summary computation.

use rust_decimal::Decimal;

use super::error::SnapshotError;
use super::types::{ExpenseEntry, IncomeEntry, MonthlySummary};
use crate::month::MonthKey;

/// Snapshot service for business logic.
pub struct SnapshotService;

impl SnapshotService {
    /// Summarizes the rows that fall in `month`. Rows outside it are skipped.
    #[must_use]
    pub fn summarize(
        month: MonthKey,
        expenses: &[ExpenseEntry],
        incomes: &[IncomeEntry],
    ) -> MonthlySummary {
        let mut summary = MonthlySummary {
            month,
            by_category: Default::default(),
            by_member: Default::default(),
            income_by_member: Default::default(),
            total_expenses: Decimal::ZERO,
            total_income: Decimal::ZERO,
            net: Decimal::ZERO,
            expense_count: 0,
        };

        for expense in expenses.iter().filter(|e| month.contains(e.date)) {
            *summary
                .by_category
                .entry(expense.category.clone())
                .or_insert(Decimal::ZERO) += expense.amount;
            *summary
                .by_member
                .entry(expense.paid_by)
                .or_insert(Decimal::ZERO) += expense.amount;
            summary.total_expenses += expense.amount;
            summary.expense_count += 1;
        }

        for income in incomes.iter().filter(|i| month.contains(i.date)) {
            *summary
                .income_by_member
                .entry(income.received_by)
                .or_insert(Decimal::ZERO) += income.amount;
            summary.total_income += income.amount;
        }

        summary.net = summary.total_income - summary.total_expenses;
        summary
    }

    /// Checks that `month` may be closed.
    ///
    /// `closed` is whether a snapshot already exists; `current` is the
    /// month containing today.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::AlreadyClosed` or `SnapshotError::FutureMonth`.
    pub fn ensure_can_close(
        month: MonthKey,
        closed: bool,
        current: MonthKey,
    ) -> Result<(), SnapshotError> {
        if closed {
            return Err(SnapshotError::AlreadyClosed(month));
        }
        if month > current {
            return Err(SnapshotError::FutureMonth(month));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hogar_shared::types::UserId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(date: NaiveDate, category: &str, amount: Decimal, paid_by: UserId) -> ExpenseEntry {
        ExpenseEntry {
            date,
            category: category.to_string(),
            amount,
            paid_by,
        }
    }

    #[test]
    fn test_summarize_month() {
        let ana = UserId::new();
        let luis = UserId::new();
        let march = MonthKey::new(2026, 3).unwrap();

        let expenses = vec![
            expense(date(2026, 3, 1), "super", dec!(80), ana),
            expense(date(2026, 3, 12), "super", dec!(20), luis),
            expense(date(2026, 3, 31), "luz", dec!(45.50), ana),
            expense(date(2026, 4, 1), "super", dec!(999), ana),
        ];
        let incomes = vec![
            IncomeEntry {
                date: date(2026, 3, 5),
                amount: dec!(1500),
                received_by: ana,
            },
            IncomeEntry {
                date: date(2026, 2, 28),
                amount: dec!(700),
                received_by: luis,
            },
        ];

        let summary = SnapshotService::summarize(march, &expenses, &incomes);

        assert_eq!(summary.total_expenses, dec!(145.50));
        assert_eq!(summary.total_income, dec!(1500));
        assert_eq!(summary.net, dec!(1354.50));
        assert_eq!(summary.expense_count, 3);
        assert_eq!(summary.by_category["super"], dec!(100));
        assert_eq!(summary.by_category["luz"], dec!(45.50));
        assert_eq!(summary.by_member[&ana], dec!(125.50));
        assert_eq!(summary.by_member[&luis], dec!(20));
        assert!(!summary.income_by_member.contains_key(&luis));
    }

    #[test]
    fn test_empty_month() {
        let summary = SnapshotService::summarize(MonthKey::new(2026, 1).unwrap(), &[], &[]);
        assert_eq!(summary.net, Decimal::ZERO);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn test_summary_roundtrips_through_json() {
        let ana = UserId::new();
        let march = MonthKey::new(2026, 3).unwrap();
        let summary = SnapshotService::summarize(
            march,
            &[expense(date(2026, 3, 2), "super", dec!(10), ana)],
            &[],
        );

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["month"], "2026-03");
        let back: MonthlySummary = serde_json::from_value(json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn test_ensure_can_close() {
        let march = MonthKey::new(2026, 3).unwrap();
        let april = march.next();

        assert!(SnapshotService::ensure_can_close(march, false, april).is_ok());
        assert!(SnapshotService::ensure_can_close(march, false, march).is_ok());
        assert_eq!(
            SnapshotService::ensure_can_close(march, true, april),
            Err(SnapshotError::AlreadyClosed(march))
        );
        assert_eq!(
            SnapshotService::ensure_can_close(april, false, march),
            Err(SnapshotError::FutureMonth(april))
        );
    }
}
