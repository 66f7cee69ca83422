//! Balance error types.

use thiserror::Error;

/// Balance-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BalanceError {
    /// Unknown share policy name.
    #[error("unknown share policy '{0}', expected all_expenses or by_split_mode")]
    UnknownPolicy(String),
}
