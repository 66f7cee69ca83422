//! Credit card balance rollup.
//!
//! No interest or amortization: a card is its opening balance plus charges
//! (`cargo`) minus payments (`pago`).

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Credit card errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CardError {
    /// Movement kind is neither `cargo` nor `pago`.
    #[error("unknown card movement kind '{0}', expected cargo or pago")]
    UnknownKind(String),

    /// Credit limit below zero.
    #[error("credit limit cannot be negative")]
    NegativeLimit,

    /// Movement amount must be positive.
    #[error("movement amount must be positive")]
    NonPositiveAmount,
}

/// Direction of a card movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardMovementKind {
    /// Charge, raises the balance.
    Cargo,
    /// Payment, lowers the balance.
    Pago,
}

impl CardMovementKind {
    /// Persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Pago => "pago",
        }
    }
}

impl FromStr for CardMovementKind {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cargo" => Ok(Self::Cargo),
            "pago" => Ok(Self::Pago),
            other => Err(CardError::UnknownKind(other.to_string())),
        }
    }
}

/// A card movement reduced to what the rollup needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardMovementLine {
    /// Charge or payment.
    pub kind: CardMovementKind,
    /// Amount, always positive.
    pub amount: Decimal,
}

/// Rolled-up state of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSummary {
    /// Credit limit.
    pub credit_limit: Decimal,
    /// `initial + charges - payments`.
    pub balance: Decimal,
    /// `max(0, limit - balance)`.
    pub available: Decimal,
    /// `balance / limit` as a fraction in `[0, 1]`; 0 when the limit is 0.
    pub used_pct: Decimal,
    /// Sum of charges.
    pub total_charges: Decimal,
    /// Sum of payments.
    pub total_payments: Decimal,
}

impl CardSummary {
    /// Rolls movements up into a summary.
    #[must_use]
    pub fn rollup(
        initial_balance: Decimal,
        credit_limit: Decimal,
        movements: &[CardMovementLine],
    ) -> Self {
        let (total_charges, total_payments) =
            movements
                .iter()
                .fold((Decimal::ZERO, Decimal::ZERO), |(charges, payments), m| match m.kind {
                    CardMovementKind::Cargo => (charges + m.amount, payments),
                    CardMovementKind::Pago => (charges, payments + m.amount),
                });

        let balance = initial_balance + total_charges - total_payments;
        let available = (credit_limit - balance).max(Decimal::ZERO);
        let used_pct = if credit_limit <= Decimal::ZERO {
            Decimal::ZERO
        } else {
            (balance / credit_limit).clamp(Decimal::ZERO, Decimal::ONE)
        };

        Self {
            credit_limit,
            balance,
            available,
            used_pct,
            total_charges,
            total_payments,
        }
    }
}

/// Validates a card's limit.
///
/// # Errors
///
/// Returns `CardError::NegativeLimit` for a limit below zero.
pub fn validate_limit(credit_limit: Decimal) -> Result<(), CardError> {
    if credit_limit < Decimal::ZERO {
        return Err(CardError::NegativeLimit);
    }
    Ok(())
}

/// Validates a movement amount.
///
/// # Errors
///
/// Returns `CardError::NonPositiveAmount` unless the amount is above zero.
pub fn validate_movement(amount: Decimal) -> Result<(), CardError> {
    if amount <= Decimal::ZERO {
        return Err(CardError::NonPositiveAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn cargo(amount: Decimal) -> CardMovementLine {
        CardMovementLine {
            kind: CardMovementKind::Cargo,
            amount,
        }
    }

    fn pago(amount: Decimal) -> CardMovementLine {
        CardMovementLine {
            kind: CardMovementKind::Pago,
            amount,
        }
    }

    #[test]
    fn test_rollup_example() {
        let summary = CardSummary::rollup(dec!(0), dec!(1000), &[cargo(dec!(200)), pago(dec!(50))]);

        assert_eq!(summary.balance, dec!(150));
        assert_eq!(summary.available, dec!(850));
        assert_eq!(summary.used_pct, dec!(0.15));
    }

    #[test]
    fn test_over_limit_caps_usage() {
        let summary = CardSummary::rollup(dec!(900), dec!(1000), &[cargo(dec!(300))]);

        assert_eq!(summary.balance, dec!(1200));
        assert_eq!(summary.available, dec!(0));
        assert_eq!(summary.used_pct, dec!(1));
    }

    #[test]
    fn test_zero_limit() {
        let summary = CardSummary::rollup(dec!(0), dec!(0), &[cargo(dec!(10))]);
        assert_eq!(summary.used_pct, dec!(0));
        assert_eq!(summary.available, dec!(0));
    }

    #[test]
    fn test_overpaid_card_has_no_negative_usage() {
        let summary = CardSummary::rollup(dec!(0), dec!(500), &[pago(dec!(20))]);
        assert_eq!(summary.balance, dec!(-20));
        assert_eq!(summary.used_pct, dec!(0));
        assert_eq!(summary.available, dec!(520));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("cargo".parse::<CardMovementKind>(), Ok(CardMovementKind::Cargo));
        assert_eq!("pago".parse::<CardMovementKind>(), Ok(CardMovementKind::Pago));
        assert!("refund".parse::<CardMovementKind>().is_err());
    }

    #[test]
    fn test_validation() {
        assert!(validate_limit(dec!(0)).is_ok());
        assert_eq!(validate_limit(dec!(-1)), Err(CardError::NegativeLimit));
        assert_eq!(validate_movement(dec!(0)), Err(CardError::NonPositiveAmount));
    }

    proptest! {
        /// balance = initial + charges - payments, available and usage stay in range.
        #[test]
        fn prop_rollup(
            initial in 0i64..1_000_000,
            limit in 0i64..10_000_000,
            movements in prop::collection::vec((any::<bool>(), 1i64..1_000_000), 0..30),
        ) {
            let lines: Vec<CardMovementLine> = movements
                .iter()
                .map(|&(is_charge, cents)| if is_charge {
                    cargo(Decimal::new(cents, 2))
                } else {
                    pago(Decimal::new(cents, 2))
                })
                .collect();
            let initial = Decimal::new(initial, 2);
            let limit = Decimal::new(limit, 2);

            let summary = CardSummary::rollup(initial, limit, &lines);

            prop_assert_eq!(
                summary.balance,
                initial + summary.total_charges - summary.total_payments
            );
            prop_assert!(summary.available >= Decimal::ZERO);
            prop_assert!(summary.used_pct >= Decimal::ZERO && summary.used_pct <= Decimal::ONE);
        }
    }
}
