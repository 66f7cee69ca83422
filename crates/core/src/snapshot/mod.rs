//! Monthly aggregation and month closing.

pub mod error;
pub mod service;
pub mod types;

pub use error::SnapshotError;
pub use service::SnapshotService;
pub use types::{ExpenseEntry, IncomeEntry, MonthlySummary};
