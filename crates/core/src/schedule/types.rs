//! Schedule data types.

use std::fmt;

use hogar_shared::types::FixedExpenseId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::month::MonthKey;

/// Reminder badge shown next to an upcoming bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReminderBadge {
    /// Due today.
    Today,
    /// Due tomorrow.
    Tomorrow,
    /// Due in `n` days, `n >= 2`.
    InDays(u32),
}

impl ReminderBadge {
    /// Badge for a number of days until due.
    #[must_use]
    pub const fn for_days(days: u32) -> Self {
        match days {
            0 => Self::Today,
            1 => Self::Tomorrow,
            n => Self::InDays(n),
        }
    }
}

impl fmt::Display for ReminderBadge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => f.write_str("Hoy"),
            Self::Tomorrow => f.write_str("Mañana"),
            Self::InDays(n) => write!(f, "{n}d"),
        }
    }
}

impl Serialize for ReminderBadge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A fixed expense as seen by the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedExpenseLine {
    /// Fixed expense ID.
    pub id: FixedExpenseId,
    /// Bill name.
    pub name: String,
    /// Expected amount.
    pub amount: Decimal,
    /// Day of month the bill is due, 1..=31.
    pub due_day: u32,
    /// Recurring bills are due every month; one-off bills once.
    pub recurring: bool,
    /// Inactive bills never produce reminders.
    pub active: bool,
    /// Months in which a payment was recorded.
    pub paid_months: Vec<MonthKey>,
}

/// Paid status of a fixed expense for a given month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaidStatus {
    /// A payment covers the month.
    Paid,
    /// Not paid yet and the due date has not passed.
    Pending,
    /// Not paid and the due date has passed.
    Overdue,
}

/// An unpaid bill coming due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    /// Fixed expense ID.
    pub fixed_expense_id: FixedExpenseId,
    /// Bill name.
    pub name: String,
    /// Expected amount.
    pub amount: Decimal,
    /// Days until the next due date.
    pub days_until_due: u32,
    /// Badge text (`Hoy`, `Mañana`, `3d`).
    pub badge: ReminderBadge,
}
