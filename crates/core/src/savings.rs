//! Personal savings accounts.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Savings errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SavingsError {
    /// Movement kind is neither `deposit` nor `withdrawal`.
    #[error("unknown savings movement kind '{0}', expected deposit or withdrawal")]
    UnknownKind(String),

    /// Movement amount must be positive.
    #[error("movement amount must be positive")]
    NonPositiveAmount,

    /// Withdrawal larger than the balance.
    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// Current balance.
        balance: Decimal,
        /// Requested withdrawal.
        requested: Decimal,
    },

    /// Goal below zero.
    #[error("savings goal cannot be negative")]
    NegativeGoal,
}

/// Direction of a savings movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SavingsMovementKind {
    /// Money put in.
    Deposit,
    /// Money taken out.
    Withdrawal,
}

impl SavingsMovementKind {
    /// Persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl FromStr for SavingsMovementKind {
    type Err = SavingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            other => Err(SavingsError::UnknownKind(other.to_string())),
        }
    }
}

/// Balance and goal progress of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsSummary {
    /// `deposits - withdrawals`.
    pub balance: Decimal,
    /// Sum of deposits.
    pub total_deposits: Decimal,
    /// Sum of withdrawals.
    pub total_withdrawals: Decimal,
    /// Target amount, if any.
    pub goal: Option<Decimal>,
    /// `balance / goal * 100` in `[0, 100]`, two decimals; 0 without a goal.
    pub progress_percent: Decimal,
}

impl SavingsSummary {
    /// Rolls movements up into a summary.
    #[must_use]
    pub fn rollup(goal: Option<Decimal>, movements: &[(SavingsMovementKind, Decimal)]) -> Self {
        let mut total_deposits = Decimal::ZERO;
        let mut total_withdrawals = Decimal::ZERO;
        for &(kind, amount) in movements {
            match kind {
                SavingsMovementKind::Deposit => total_deposits += amount,
                SavingsMovementKind::Withdrawal => total_withdrawals += amount,
            }
        }
        let balance = total_deposits - total_withdrawals;

        let progress_percent = match goal {
            Some(goal) if goal > Decimal::ZERO => (balance / goal * Decimal::ONE_HUNDRED)
                .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
                .round_dp(2),
            _ => Decimal::ZERO,
        };

        Self {
            balance,
            total_deposits,
            total_withdrawals,
            goal,
            progress_percent,
        }
    }
}

/// Validates a new movement against the current balance.
///
/// # Errors
///
/// Returns `SavingsError::NonPositiveAmount` for a zero or negative amount
/// and `SavingsError::InsufficientFunds` when a withdrawal exceeds `balance`.
pub fn validate_movement(
    balance: Decimal,
    kind: SavingsMovementKind,
    amount: Decimal,
) -> Result<(), SavingsError> {
    if amount <= Decimal::ZERO {
        return Err(SavingsError::NonPositiveAmount);
    }
    if kind == SavingsMovementKind::Withdrawal && amount > balance {
        return Err(SavingsError::InsufficientFunds {
            balance,
            requested: amount,
        });
    }
    Ok(())
}

/// Validates deleting a recorded movement.
///
/// Dropping a withdrawal only raises the balance. Dropping a deposit must
/// not leave the remaining withdrawals above what was deposited.
///
/// # Errors
///
/// Returns `SavingsError::InsufficientFunds` when removing a deposit of
/// `amount` would take `balance` below zero.
pub fn validate_removal(
    balance: Decimal,
    kind: SavingsMovementKind,
    amount: Decimal,
) -> Result<(), SavingsError> {
    if kind == SavingsMovementKind::Deposit && amount > balance {
        return Err(SavingsError::InsufficientFunds {
            balance,
            requested: amount,
        });
    }
    Ok(())
}

/// Validates an account goal.
///
/// # Errors
///
/// Returns `SavingsError::NegativeGoal` for a goal below zero.
pub fn validate_goal(goal: Option<Decimal>) -> Result<(), SavingsError> {
    match goal {
        Some(goal) if goal < Decimal::ZERO => Err(SavingsError::NegativeGoal),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use super::SavingsMovementKind::{Deposit, Withdrawal};

    #[test]
    fn test_rollup_with_goal() {
        let summary = SavingsSummary::rollup(
            Some(dec!(1000)),
            &[(Deposit, dec!(400)), (Deposit, dec!(200)), (Withdrawal, dec!(100))],
        );
        assert_eq!(summary.balance, dec!(500));
        assert_eq!(summary.progress_percent, dec!(50));
    }

    #[test]
    fn test_progress_caps_at_hundred() {
        let summary = SavingsSummary::rollup(Some(dec!(100)), &[(Deposit, dec!(250))]);
        assert_eq!(summary.progress_percent, dec!(100));
    }

    #[test]
    fn test_no_goal_or_zero_goal() {
        let movements = [(Deposit, dec!(10))];
        assert_eq!(SavingsSummary::rollup(None, &movements).progress_percent, dec!(0));
        assert_eq!(
            SavingsSummary::rollup(Some(dec!(0)), &movements).progress_percent,
            dec!(0)
        );
    }

    #[test]
    fn test_withdrawal_cannot_exceed_balance() {
        assert!(validate_movement(dec!(50), Withdrawal, dec!(50)).is_ok());
        assert_eq!(
            validate_movement(dec!(50), Withdrawal, dec!(50.01)),
            Err(SavingsError::InsufficientFunds {
                balance: dec!(50),
                requested: dec!(50.01)
            })
        );
        assert!(validate_movement(dec!(0), Deposit, dec!(5)).is_ok());
        assert_eq!(
            validate_movement(dec!(0), Deposit, dec!(0)),
            Err(SavingsError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_removing_deposit_cannot_overdraw() {
        let movements = [(Deposit, dec!(100)), (Withdrawal, dec!(80))];
        let balance = SavingsSummary::rollup(None, &movements).balance;

        assert_eq!(
            validate_removal(balance, Deposit, dec!(100)),
            Err(SavingsError::InsufficientFunds {
                balance: dec!(20),
                requested: dec!(100)
            })
        );
        assert!(validate_removal(balance, Deposit, dec!(20)).is_ok());
        assert!(validate_removal(balance, Withdrawal, dec!(80)).is_ok());
    }

    #[test]
    fn test_validate_goal() {
        assert!(validate_goal(None).is_ok());
        assert!(validate_goal(Some(dec!(0))).is_ok());
        assert_eq!(validate_goal(Some(dec!(-5))), Err(SavingsError::NegativeGoal));
    }
}
