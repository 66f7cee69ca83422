//! Due-date arithmetic for fixed expenses.

use chrono::NaiveDate;

use super::error::ScheduleError;
use super::types::{FixedExpenseLine, PaidStatus, Reminder, ReminderBadge};
use crate::month::MonthKey;

/// Schedule service for business logic.
pub struct ScheduleService;

impl ScheduleService {
    /// Checks that a due day is within 1..=31.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidDueDay` otherwise.
    pub fn validate_due_day(due_day: u32) -> Result<(), ScheduleError> {
        if (1..=31).contains(&due_day) {
            Ok(())
        } else {
            Err(ScheduleError::InvalidDueDay(due_day))
        }
    }

    /// The date a bill falls due in `month`.
    ///
    /// Due days past the end of a short month fall on its last day, so a
    /// bill due on the 31st is due on Feb 28 (or 29).
    #[must_use]
    pub fn due_date(due_day: u32, month: MonthKey) -> NaiveDate {
        let day = due_day.clamp(1, month.days());
        NaiveDate::from_ymd_opt(month.year(), month.month(), day)
            .unwrap_or_else(|| month.last_day())
    }

    /// Month and date of the next occurrence on or after `today`.
    #[must_use]
    pub fn next_due(due_day: u32, today: NaiveDate) -> (MonthKey, NaiveDate) {
        let this_month = MonthKey::of(today);
        let due = Self::due_date(due_day, this_month);
        if due >= today {
            (this_month, due)
        } else {
            let next = this_month.next();
            (next, Self::due_date(due_day, next))
        }
    }

    /// Days from `today` until the bill next falls due.
    ///
    /// When the day has already passed this month the count wraps into
    /// next month: due day 5 seen on Jan 28 is 8 days away.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleError::InvalidDueDay` for a day outside 1..=31.
    pub fn days_until_due(due_day: u32, today: NaiveDate) -> Result<u32, ScheduleError> {
        Self::validate_due_day(due_day)?;
        let (_, due) = Self::next_due(due_day, today);
        Ok(u32::try_from((due - today).num_days()).unwrap_or(0))
    }

    /// True when a payment covers `month`.
    ///
    /// One-off bills count as paid once any payment exists.
    #[must_use]
    pub fn is_paid(line: &FixedExpenseLine, month: MonthKey) -> bool {
        if line.recurring {
            line.paid_months.contains(&month)
        } else {
            !line.paid_months.is_empty()
        }
    }

    /// Paid status of a bill for `month`, judged on `today`.
    #[must_use]
    pub fn paid_status(line: &FixedExpenseLine, month: MonthKey, today: NaiveDate) -> PaidStatus {
        if Self::is_paid(line, month) {
            PaidStatus::Paid
        } else if Self::due_date(line.due_day, month) < today {
            PaidStatus::Overdue
        } else {
            PaidStatus::Pending
        }
    }

    /// Unpaid active bills due within `within_days`, soonest first.
    ///
    /// A bill is listed when the month of its next due date has no payment.
    #[must_use]
    pub fn upcoming(
        lines: &[FixedExpenseLine],
        today: NaiveDate,
        within_days: u32,
    ) -> Vec<Reminder> {
        let mut reminders: Vec<Reminder> = lines
            .iter()
            .filter(|line| line.active && Self::validate_due_day(line.due_day).is_ok())
            .filter_map(|line| {
                let (month, due) = Self::next_due(line.due_day, today);
                if Self::is_paid(line, month) {
                    return None;
                }
                let days = u32::try_from((due - today).num_days()).unwrap_or(0);
                (days <= within_days).then(|| Reminder {
                    fixed_expense_id: line.id,
                    name: line.name.clone(),
                    amount: line.amount,
                    days_until_due: days,
                    badge: ReminderBadge::for_days(days),
                })
            })
            .collect();

        reminders.sort_by(|a, b| {
            a.days_until_due
                .cmp(&b.days_until_due)
                .then_with(|| a.name.cmp(&b.name))
        });
        reminders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hogar_shared::types::FixedExpenseId;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    fn bill(name: &str, due_day: u32, paid_months: Vec<MonthKey>) -> FixedExpenseLine {
        FixedExpenseLine {
            id: FixedExpenseId::new(),
            name: name.to_string(),
            amount: dec!(100),
            due_day,
            recurring: true,
            active: true,
            paid_months,
        }
    }

    #[rstest]
    #[case::wraps_into_february(5, date(2026, 1, 28), 8)]
    #[case::due_today(15, date(2026, 3, 15), 0)]
    #[case::due_tomorrow(16, date(2026, 3, 15), 1)]
    #[case::later_this_month(25, date(2026, 3, 15), 10)]
    #[case::yesterday_wraps(14, date(2026, 3, 15), 30)]
    #[case::day_31_in_february(31, date(2026, 2, 10), 18)]
    #[case::day_31_leap_february(31, date(2024, 2, 29), 0)]
    #[case::day_31_in_april(31, date(2026, 4, 30), 0)]
    #[case::wrap_into_short_month(30, date(2026, 1, 31), 28)]
    #[case::wrap_year(3, date(2026, 12, 30), 4)]
    fn test_days_until_due(#[case] due_day: u32, #[case] today: NaiveDate, #[case] days: u32) {
        assert_eq!(ScheduleService::days_until_due(due_day, today), Ok(days));
    }

    #[rstest]
    #[case(0)]
    #[case(32)]
    fn test_invalid_due_day(#[case] due_day: u32) {
        assert_eq!(
            ScheduleService::days_until_due(due_day, date(2026, 1, 1)),
            Err(ScheduleError::InvalidDueDay(due_day))
        );
    }

    #[rstest]
    #[case(0, "Hoy")]
    #[case(1, "Mañana")]
    #[case(3, "3d")]
    #[case(27, "27d")]
    fn test_badge_text(#[case] days: u32, #[case] text: &str) {
        assert_eq!(ReminderBadge::for_days(days).to_string(), text);
    }

    #[test]
    fn test_paid_status() {
        let jan = month(2026, 1);
        let paid = bill("Rent", 5, vec![jan]);
        let unpaid = bill("Internet", 20, vec![]);

        assert_eq!(
            ScheduleService::paid_status(&paid, jan, date(2026, 1, 28)),
            PaidStatus::Paid
        );
        assert_eq!(
            ScheduleService::paid_status(&unpaid, jan, date(2026, 1, 10)),
            PaidStatus::Pending
        );
        assert_eq!(
            ScheduleService::paid_status(&unpaid, jan, date(2026, 1, 21)),
            PaidStatus::Overdue
        );
    }

    #[test]
    fn test_one_off_bill_stays_paid() {
        let mut once = bill("Car tax", 10, vec![month(2025, 11)]);
        once.recurring = false;
        assert!(ScheduleService::is_paid(&once, month(2026, 3)));
    }

    #[test]
    fn test_upcoming_sorted_and_filtered() {
        let today = date(2026, 1, 28);
        let mut inactive = bill("Gym", 29, vec![]);
        inactive.active = false;
        let lines = vec![
            bill("Rent", 5, vec![]),
            bill("Water", 28, vec![]),
            bill("Power", 29, vec![]),
            bill("Phone", 30, vec![month(2026, 1)]),
            inactive,
        ];

        let reminders = ScheduleService::upcoming(&lines, today, 7);
        let names: Vec<&str> = reminders.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Water", "Power"]);
        assert_eq!(reminders[0].badge, ReminderBadge::Today);
        assert_eq!(reminders[1].badge, ReminderBadge::Tomorrow);

        let reminders = ScheduleService::upcoming(&lines, today, 31);
        assert_eq!(reminders.len(), 3);
        assert_eq!(reminders[2].name, "Rent");
        assert_eq!(reminders[2].days_until_due, 8);
    }

    #[test]
    fn test_paid_this_month_reminds_for_next_month() {
        // Rent due on the 5th, paid for January, seen on Jan 28:
        // the next occurrence is February, which is unpaid.
        let lines = vec![bill("Rent", 5, vec![month(2026, 1)])];
        let reminders = ScheduleService::upcoming(&lines, date(2026, 1, 28), 10);
        assert_eq!(reminders.len(), 1);
        assert_eq!(reminders[0].badge.to_string(), "8d");
    }
}
