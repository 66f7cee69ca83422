//! Stock arithmetic and business summaries.

use rust_decimal::Decimal;

use super::error::InventoryError;
use super::types::{BusinessSummary, BusinessTransactionKind, BusinessTransactionLine, StockChange};

/// Inventory service for business logic.
pub struct InventoryService;

impl InventoryService {
    /// Signed stock change for a line.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::NonPositiveQuantity` for zero or negative units.
    pub fn stock_delta(
        kind: BusinessTransactionKind,
        quantity: i32,
    ) -> Result<i32, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::NonPositiveQuantity(quantity));
        }
        Ok(match kind {
            BusinessTransactionKind::Sale => -quantity,
            BusinessTransactionKind::Purchase => quantity,
        })
    }

    /// Applies a sale or purchase to `stock`.
    ///
    /// Stock is allowed to go negative; a sale is never refused for lack
    /// of recorded units.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive quantity, a negative price, or
    /// stock overflow.
    pub fn apply(
        stock: i32,
        kind: BusinessTransactionKind,
        quantity: i32,
        unit_price: Decimal,
    ) -> Result<StockChange, InventoryError> {
        if unit_price < Decimal::ZERO {
            return Err(InventoryError::NegativePrice);
        }
        let delta = Self::stock_delta(kind, quantity)?;
        let after = stock
            .checked_add(delta)
            .ok_or(InventoryError::StockOverflow)?;

        Ok(StockChange {
            before: stock,
            delta,
            after,
            total: unit_price * Decimal::from(quantity),
        })
    }

    /// Reverses a recorded line, used when a transaction is deleted.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::StockOverflow` if the result does not fit.
    pub fn revert(
        stock: i32,
        kind: BusinessTransactionKind,
        quantity: i32,
    ) -> Result<i32, InventoryError> {
        let delta = Self::stock_delta(kind, quantity)?;
        stock.checked_sub(delta).ok_or(InventoryError::StockOverflow)
    }

    /// Revenue, cost and gross profit for a set of lines.
    #[must_use]
    pub fn summarize(lines: &[BusinessTransactionLine]) -> BusinessSummary {
        let mut summary = BusinessSummary {
            revenue: Decimal::ZERO,
            cost: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            units_sold: 0,
            units_purchased: 0,
            sales_count: 0,
            purchases_count: 0,
        };

        for line in lines {
            match line.kind {
                BusinessTransactionKind::Sale => {
                    summary.revenue += line.total;
                    summary.units_sold += i64::from(line.quantity);
                    summary.sales_count += 1;
                }
                BusinessTransactionKind::Purchase => {
                    summary.cost += line.total;
                    summary.units_purchased += i64::from(line.quantity);
                    summary.purchases_count += 1;
                }
            }
        }
        summary.gross_profit = summary.revenue - summary.cost;
        summary
    }

    /// Value of stock on hand at unit cost. Negative stock counts as zero.
    #[must_use]
    pub fn stock_value(products: &[(i32, Decimal)]) -> Decimal {
        products
            .iter()
            .map(|&(stock, unit_cost)| Decimal::from(stock.max(0)) * unit_cost)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    use BusinessTransactionKind::{Purchase, Sale};

    #[test]
    fn test_sale_takes_from_stock() {
        let change = InventoryService::apply(10, Sale, 3, dec!(2.50)).unwrap();
        assert_eq!(change.after, 7);
        assert_eq!(change.delta, -3);
        assert_eq!(change.total, dec!(7.50));
    }

    #[test]
    fn test_purchase_adds_to_stock() {
        let change = InventoryService::apply(0, Purchase, 12, dec!(1)).unwrap();
        assert_eq!(change.after, 12);
    }

    #[test]
    fn test_sale_may_go_negative() {
        let change = InventoryService::apply(1, Sale, 3, dec!(5)).unwrap();
        assert_eq!(change.after, -2);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(
            InventoryService::apply(5, Sale, 0, dec!(1)),
            Err(InventoryError::NonPositiveQuantity(0))
        );
        assert_eq!(
            InventoryService::apply(5, Sale, 1, dec!(-1)),
            Err(InventoryError::NegativePrice)
        );
        assert_eq!(
            InventoryService::apply(i32::MAX, Purchase, 1, dec!(1)),
            Err(InventoryError::StockOverflow)
        );
    }

    #[test]
    fn test_summary() {
        let lines = [
            BusinessTransactionLine {
                kind: Sale,
                quantity: 2,
                total: dec!(40),
            },
            BusinessTransactionLine {
                kind: Sale,
                quantity: 1,
                total: dec!(25),
            },
            BusinessTransactionLine {
                kind: Purchase,
                quantity: 5,
                total: dec!(50),
            },
        ];
        let summary = InventoryService::summarize(&lines);
        assert_eq!(summary.revenue, dec!(65));
        assert_eq!(summary.cost, dec!(50));
        assert_eq!(summary.gross_profit, dec!(15));
        assert_eq!(summary.units_sold, 3);
        assert_eq!(summary.purchases_count, 1);
    }

    #[test]
    fn test_stock_value_ignores_negative_stock() {
        let value = InventoryService::stock_value(&[(4, dec!(2.5)), (-3, dec!(10))]);
        assert_eq!(value, dec!(10));
    }

    proptest! {
        /// Applying then reverting a line restores the original stock.
        #[test]
        fn prop_apply_then_revert(
            stock in -10_000i32..10_000,
            quantity in 1i32..1_000,
            is_sale in any::<bool>(),
        ) {
            let kind = if is_sale { Sale } else { Purchase };
            let change = InventoryService::apply(stock, kind, quantity, dec!(1)).unwrap();
            prop_assert_eq!(InventoryService::revert(change.after, kind, quantity), Ok(stock));
        }

        /// A sale followed by a purchase of the same quantity is a no-op on stock.
        #[test]
        fn prop_sale_and_purchase_cancel(
            stock in -10_000i32..10_000,
            quantity in 1i32..1_000,
        ) {
            let sold = InventoryService::apply(stock, Sale, quantity, dec!(3)).unwrap();
            let bought = InventoryService::apply(sold.after, Purchase, quantity, dec!(2)).unwrap();
            prop_assert_eq!(bought.after, stock);
        }
    }
}
