//! Balance data types.

use std::str::FromStr;

use hogar_shared::types::UserId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::BalanceError;
use crate::split::SplitMode;

/// A family member as seen by the balance computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// User ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
}

impl Member {
    /// Creates a member.
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }
}

/// The parts of an expense that matter for balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseLine {
    /// Amount, always positive.
    pub amount: Decimal,
    /// Member who paid.
    pub paid_by: UserId,
    /// How the cost is allocated.
    pub split: SplitMode,
}

/// A recorded reimbursement between two members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementLine {
    /// Member who paid the reimbursement.
    pub from_user: UserId,
    /// Member who received it.
    pub to_user: UserId,
    /// Amount, always positive.
    pub amount: Decimal,
}

/// Which expenses enter the equal-share pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharePolicy {
    /// Every expense is shared equally, whatever its split mode.
    #[default]
    AllExpenses,
    /// Only `50/50` expenses are pooled. `personal` expenses are left out
    /// and `para_otro` expenses are charged in full to the beneficiary.
    BySplitMode,
}

impl FromStr for SharePolicy {
    type Err = BalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all_expenses" => Ok(Self::AllExpenses),
            "by_split_mode" => Ok(Self::BySplitMode),
            other => Err(BalanceError::UnknownPolicy(other.to_string())),
        }
    }
}

/// One member's line on the balance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    /// User ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Total paid into the pool by this member.
    pub paid: Decimal,
    /// Positive: the family owes this member. Negative: this member owes.
    pub balance: Decimal,
}

/// Result of a balance computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheet {
    /// Policy the sheet was computed with.
    pub policy: SharePolicy,
    /// Sum of pooled expenses.
    pub total: Decimal,
    /// `total / member_count`, zero without members.
    pub equal_share: Decimal,
    /// One entry per member, in input order.
    pub members: Vec<MemberBalance>,
}

impl BalanceSheet {
    /// Looks up a member's line.
    #[must_use]
    pub fn member(&self, user_id: UserId) -> Option<&MemberBalance> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Sum of all member balances.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.members.iter().map(|m| m.balance).sum()
    }
}

/// The single transfer that would settle the most indebted member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    /// Member with the lowest balance.
    pub debtor: Member,
    /// Member with the highest balance.
    pub creditor: Member,
    /// `|debtor.balance|`, rounded to cents.
    pub amount: Decimal,
}
