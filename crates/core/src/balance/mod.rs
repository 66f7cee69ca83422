//! Shared-expense balances and "who owes whom".
//!
//! Everything here is a pure recomputation over rows loaded for one family
//! and period. Nothing is cached; callers re-run it whenever rows change.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BalanceError;
pub use service::BalanceService;
pub use types::{
    BalanceSheet, Debt, ExpenseLine, Member, MemberBalance, SettlementLine, SharePolicy,
};
