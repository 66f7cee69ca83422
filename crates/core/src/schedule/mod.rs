//! Fixed-expense due dates, paid status and reminders.

pub mod error;
pub mod service;
pub mod types;

pub use error::ScheduleError;
pub use service::ScheduleService;
pub use types::{FixedExpenseLine, PaidStatus, Reminder, ReminderBadge};
