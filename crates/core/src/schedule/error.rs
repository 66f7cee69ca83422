//! Schedule error types.

use thiserror::Error;

/// Schedule-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    /// Due day outside 1..=31.
    #[error("due day must be between 1 and 31, got {0}")]
    InvalidDueDay(u32),
}
