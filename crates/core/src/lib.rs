//! Core household finance logic for Hogar.
//!
//! Pure functions over explicit inputs: no web or database dependencies.
//! The db crate loads rows scoped to a family and hands them to these
//! services; every aggregate is recomputed on each request.
//!
//! # Modules
//!
//! - `split` - How an expense is shared (`50/50`, `personal`, `para_otro`)
//! - `balance` - Who paid what and who owes whom
//! - `budget` - Category budgets and usage status
//! - `schedule` - Fixed-expense due dates and reminders
//! - `card` - Credit card rollups
//! - `savings` - Savings accounts and goal progress
//! - `inventory` - Business stock, sales and purchases
//! - `snapshot` - Monthly summaries and month closing
//! - `family` - Invite codes, roles and delete permissions
//! - `receipt` / `storage` - Receipt uploads on object storage

pub mod auth;
pub mod balance;
pub mod budget;
pub mod card;
pub mod dashboard;
pub mod family;
pub mod inventory;
pub mod month;
pub mod receipt;
pub mod savings;
pub mod schedule;
pub mod snapshot;
pub mod split;
pub mod storage;
pub mod validation;
