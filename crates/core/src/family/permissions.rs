//! Ownership rules for deleting and managing family data.
//!
//! Any member may create and edit shared rows. Deletion is reserved for
//! the member the row belongs to, and invite codes for the family owner.

use std::fmt;
use std::str::FromStr;

use hogar_shared::types::UserId;
use serde::{Deserialize, Serialize};

use super::FamilyError;

/// Role of a member within a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyRole {
    /// Created the family.
    Owner,
    /// Joined with the invite code.
    Member,
}

impl FamilyRole {
    /// Persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FamilyRole {
    type Err = FamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            other => Err(FamilyError::UnknownRole(other.to_string())),
        }
    }
}

/// The member performing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Acting user.
    pub user_id: UserId,
    /// Their role in the family.
    pub role: FamilyRole,
}

impl Actor {
    /// Creates an actor.
    #[must_use]
    pub const fn new(user_id: UserId, role: FamilyRole) -> Self {
        Self { user_id, role }
    }

    fn require(self, allowed: bool, message: &'static str) -> Result<(), FamilyError> {
        if allowed {
            Ok(())
        } else {
            Err(FamilyError::Forbidden(message))
        }
    }

    /// Only the payer may delete an expense.
    ///
    /// # Errors
    ///
    /// Returns `FamilyError::Forbidden` for anyone else.
    pub fn can_delete_expense(self, paid_by: UserId) -> Result<(), FamilyError> {
        self.require(
            self.user_id == paid_by,
            "only the member who paid can delete this expense",
        )
    }

    /// Only the receiver may delete an income.
    ///
    /// # Errors
    ///
    /// Returns `FamilyError::Forbidden` for anyone else.
    pub fn can_delete_income(self, received_by: UserId) -> Result<(), FamilyError> {
        self.require(
            self.user_id == received_by,
            "only the member who received this income can delete it",
        )
    }

    /// Only the creator may delete a settlement.
    ///
    /// # Errors
    ///
    /// Returns `FamilyError::Forbidden` for anyone else.
    pub fn can_delete_settlement(self, created_by: UserId) -> Result<(), FamilyError> {
        self.require(
            self.user_id == created_by,
            "only the member who recorded this settlement can delete it",
        )
    }

    /// Personal cards and savings accounts belong to one member.
    ///
    /// # Errors
    ///
    /// Returns `FamilyError::Forbidden` for anyone but the owner.
    pub fn can_manage_personal(self, owner: UserId) -> Result<(), FamilyError> {
        self.require(self.user_id == owner, "this account belongs to another member")
    }

    /// Only the family owner may rotate the invite code.
    ///
    /// # Errors
    ///
    /// Returns `FamilyError::Forbidden` for plain members.
    pub fn can_regenerate_invite(self) -> Result<(), FamilyError> {
        self.require(
            self.role == FamilyRole::Owner,
            "only the family owner can change the invite code",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_rules() {
        let ana = UserId::new();
        let luis = UserId::new();
        let actor = Actor::new(ana, FamilyRole::Member);

        assert!(actor.can_delete_expense(ana).is_ok());
        assert!(actor.can_delete_expense(luis).is_err());
        assert!(actor.can_delete_income(ana).is_ok());
        assert!(actor.can_delete_income(luis).is_err());
        assert!(actor.can_delete_settlement(ana).is_ok());
        assert!(actor.can_delete_settlement(luis).is_err());
        assert!(actor.can_manage_personal(luis).is_err());
    }

    #[test]
    fn test_owner_has_no_extra_delete_rights() {
        let owner = Actor::new(UserId::new(), FamilyRole::Owner);
        assert!(owner.can_delete_expense(UserId::new()).is_err());
        assert!(owner.can_regenerate_invite().is_ok());
        assert!(
            Actor::new(UserId::new(), FamilyRole::Member)
                .can_regenerate_invite()
                .is_err()
        );
    }

    #[test]
    fn test_role_roundtrip() {
        assert_eq!("owner".parse::<FamilyRole>(), Ok(FamilyRole::Owner));
        assert_eq!(FamilyRole::Member.to_string(), "member");
        assert!("admin".parse::<FamilyRole>().is_err());
    }
}
