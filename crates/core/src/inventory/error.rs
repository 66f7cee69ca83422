//! Inventory error types.

use thiserror::Error;

/// Inventory-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InventoryError {
    /// Quantity must be at least one unit.
    #[error("quantity must be positive, got {0}")]
    NonPositiveQuantity(i32),

    /// Unit price below zero.
    #[error("unit price cannot be negative")]
    NegativePrice,

    /// Stock arithmetic left the representable range.
    #[error("stock overflow")]
    StockOverflow,

    /// Kind is neither `sale` nor `purchase`.
    #[error("unknown transaction kind '{0}', expected sale or purchase")]
    UnknownKind(String),
}
