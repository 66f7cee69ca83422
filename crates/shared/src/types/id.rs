//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs keeps a `UserId` from being passed where a `FamilyId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(FamilyId, "Unique identifier for a family.");
typed_id!(ExpenseId, "Unique identifier for an expense.");
typed_id!(ExpenseNoteId, "Unique identifier for a note on an expense.");
typed_id!(IncomeId, "Unique identifier for an income entry.");
typed_id!(SettlementId, "Unique identifier for a settlement.");
typed_id!(BudgetId, "Unique identifier for a category budget.");
typed_id!(FixedExpenseId, "Unique identifier for a fixed expense.");
typed_id!(CardId, "Unique identifier for a credit card.");
typed_id!(SavingsAccountId, "Unique identifier for a savings account.");
typed_id!(ProductId, "Unique identifier for a business product.");
typed_id!(BusinessTransactionId, "Unique identifier for a sale or purchase.");
typed_id!(ShoppingItemId, "Unique identifier for a shopping list item.");
typed_id!(EventId, "Unique identifier for a family event.");
typed_id!(ReceiptId, "Unique identifier for a stored receipt.");
typed_id!(SnapshotId, "Unique identifier for a monthly snapshot.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_are_time_ordered() {
        let first = ExpenseId::new();
        let second = ExpenseId::new();
        assert_ne!(first, second);
        assert_eq!(first.into_inner().get_version_num(), 7);
    }

    #[test]
    fn test_parse_and_display() {
        let raw = "0190a6b2-7c1e-7d4a-9a55-3f1b2c3d4e5f";
        let id = FamilyId::from_str(raw).unwrap();
        assert_eq!(id.to_string(), raw);
        assert!(UserId::from_str("not-a-uuid").is_err());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = UserId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
    }
}
