//! Small-business inventory: products, sales and purchases.
//!
//! A sale takes units out of stock and a purchase puts them back. The
//! db crate applies the ledger insert and the stock change in one
//! transaction using the numbers computed here.

pub mod error;
pub mod service;
pub mod types;

pub use error::InventoryError;
pub use service::InventoryService;
pub use types::{BusinessSummary, BusinessTransactionKind, BusinessTransactionLine, StockChange};
