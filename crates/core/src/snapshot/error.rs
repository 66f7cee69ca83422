//! Snapshot error types.

use thiserror::Error;

use crate::month::MonthKey;

/// Snapshot errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    /// The month already has a snapshot.
    #[error("month {0} is already closed")]
    AlreadyClosed(MonthKey),

    /// Months can only be closed once they have started.
    #[error("month {0} has not started yet")]
    FutureMonth(MonthKey),
}
