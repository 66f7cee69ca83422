//! Inventory data types.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::InventoryError;

/// Sale or purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessTransactionKind {
    /// Units leave stock.
    Sale,
    /// Units enter stock.
    Purchase,
}

impl BusinessTransactionKind {
    /// Persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Purchase => "purchase",
        }
    }
}

impl FromStr for BusinessTransactionKind {
    type Err = InventoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(Self::Sale),
            "purchase" => Ok(Self::Purchase),
            other => Err(InventoryError::UnknownKind(other.to_string())),
        }
    }
}

/// Result of applying a line to a product's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StockChange {
    /// Stock before.
    pub before: i32,
    /// Signed change.
    pub delta: i32,
    /// Stock after. May be negative when more was sold than recorded.
    pub after: i32,
    /// `unit_price * quantity`.
    pub total: Decimal,
}

/// A recorded sale or purchase reduced to what the summary needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessTransactionLine {
    /// Sale or purchase.
    pub kind: BusinessTransactionKind,
    /// Units.
    pub quantity: i32,
    /// Line total.
    pub total: Decimal,
}

/// Business results for a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSummary {
    /// Sum of sale totals.
    pub revenue: Decimal,
    /// Sum of purchase totals.
    pub cost: Decimal,
    /// `revenue - cost`.
    pub gross_profit: Decimal,
    /// Units sold.
    pub units_sold: i64,
    /// Units bought.
    pub units_purchased: i64,
    /// Number of sales.
    pub sales_count: usize,
    /// Number of purchases.
    pub purchases_count: usize,
}
