//! `SeaORM` active enums for the PostgreSQL enum types, and their
//! conversions to the domain enums in `hogar-core`.

use hogar_core::card::CardMovementKind as DomainCardMovementKind;
use hogar_core::family::FamilyRole as DomainFamilyRole;
use hogar_core::inventory::BusinessTransactionKind as DomainBusinessTransactionKind;
use hogar_core::receipt::ReceiptTarget;
use hogar_core::savings::SavingsMovementKind as DomainSavingsMovementKind;
use hogar_core::split::{SplitError, SplitMode};
use hogar_shared::types::UserId;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "family_role")]
pub enum FamilyRole {
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "member")]
    Member,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "split_kind")]
pub enum SplitKind {
    #[sea_orm(string_value = "50/50")]
    EqualSplit,
    #[sea_orm(string_value = "personal")]
    Personal,
    #[sea_orm(string_value = "para_otro")]
    ParaOtro,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "card_movement_kind")]
pub enum CardMovementKind {
    #[sea_orm(string_value = "cargo")]
    Cargo,
    #[sea_orm(string_value = "pago")]
    Pago,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "savings_movement_kind")]
pub enum SavingsMovementKind {
    #[sea_orm(string_value = "deposit")]
    Deposit,
    #[sea_orm(string_value = "withdrawal")]
    Withdrawal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "business_transaction_kind")]
pub enum BusinessTransactionKind {
    #[sea_orm(string_value = "sale")]
    Sale,
    #[sea_orm(string_value = "purchase")]
    Purchase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "receipt_target")]
pub enum ReceiptTargetKind {
    #[sea_orm(string_value = "expense")]
    Expense,
    #[sea_orm(string_value = "business_transaction")]
    BusinessTransaction,
}

/// Two-way `From` impls between a column enum and its domain twin.
macro_rules! mirror_enum {
    ($db:ident <=> $domain:ident { $($variant:ident),+ $(,)? }) => {
        impl From<$db> for $domain {
            fn from(value: $db) -> Self {
                match value {
                    $($db::$variant => Self::$variant,)+
                }
            }
        }

        impl From<$domain> for $db {
            fn from(value: $domain) -> Self {
                match value {
                    $($domain::$variant => Self::$variant,)+
                }
            }
        }
    };
}

mirror_enum!(FamilyRole <=> DomainFamilyRole { Owner, Member });
mirror_enum!(CardMovementKind <=> DomainCardMovementKind { Cargo, Pago });
mirror_enum!(SavingsMovementKind <=> DomainSavingsMovementKind { Deposit, Withdrawal });
mirror_enum!(BusinessTransactionKind <=> DomainBusinessTransactionKind { Sale, Purchase });

impl From<SplitMode> for SplitKind {
    fn from(mode: SplitMode) -> Self {
        match mode {
            SplitMode::EqualSplit => Self::EqualSplit,
            SplitMode::Personal => Self::Personal,
            SplitMode::ForMember(_) => Self::ParaOtro,
        }
    }
}

impl SplitKind {
    /// Rebuilds the domain split from the `split` and `for_member` columns.
    pub fn with_member(self, for_member: Option<Uuid>) -> Result<SplitMode, SplitError> {
        let tag = match self {
            Self::EqualSplit => hogar_core::split::TAG_EQUAL_SPLIT,
            Self::Personal => hogar_core::split::TAG_PERSONAL,
            Self::ParaOtro => hogar_core::split::TAG_FOR_MEMBER,
        };
        SplitMode::from_parts(tag, for_member.map(UserId::from_uuid))
    }
}

impl ReceiptTargetKind {
    /// Same name as [`ReceiptTarget::kind`].
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::BusinessTransaction => "business_transaction",
        }
    }
}

impl From<ReceiptTarget> for ReceiptTargetKind {
    fn from(target: ReceiptTarget) -> Self {
        match target {
            ReceiptTarget::Expense(_) => Self::Expense,
            ReceiptTarget::BusinessTransaction(_) => Self::BusinessTransaction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_kind_roundtrip() {
        let member = UserId::new();
        for mode in [SplitMode::EqualSplit, SplitMode::Personal, SplitMode::ForMember(member)] {
            let kind = SplitKind::from(mode);
            let back = kind.with_member(mode.for_member().map(UserId::into_inner));
            assert_eq!(back, Ok(mode));
        }
    }

    #[test]
    fn test_split_kind_rejects_inconsistent_member() {
        assert_eq!(SplitKind::ParaOtro.with_member(None), Err(SplitError::MissingMember));
        assert_eq!(
            SplitKind::Personal.with_member(Some(Uuid::nil())),
            Err(SplitError::UnexpectedMember)
        );
    }

    #[test]
    fn test_role_mirror() {
        assert_eq!(DomainFamilyRole::from(FamilyRole::Owner), DomainFamilyRole::Owner);
        assert_eq!(FamilyRole::from(DomainFamilyRole::Member), FamilyRole::Member);
    }
}
