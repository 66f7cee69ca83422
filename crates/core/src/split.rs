//! How the cost of an expense (or the benefit of an income) is allocated.
//!
//! Rows persist the mode as a tag column (`"50/50"`, `"personal"`,
//! `"para_otro"`) plus a nullable member column that is only set for
//! `para_otro`. [`SplitMode`] is the closed form the rest of the crate
//! matches on.

use std::fmt;

use hogar_shared::types::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tag stored for [`SplitMode::EqualSplit`].
pub const TAG_EQUAL_SPLIT: &str = "50/50";
/// Tag stored for [`SplitMode::Personal`].
pub const TAG_PERSONAL: &str = "personal";
/// Tag stored for [`SplitMode::ForMember`].
pub const TAG_FOR_MEMBER: &str = "para_otro";

/// Split mode errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    /// Unknown tag.
    #[error("unknown split mode '{0}'")]
    UnknownTag(String),

    /// `para_otro` without the member it is for.
    #[error("split mode para_otro requires for_member")]
    MissingMember,

    /// A member id was given with a mode that does not take one.
    #[error("for_member is only allowed with split mode para_otro")]
    UnexpectedMember,
}

/// Allocation of an expense or income between family members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", content = "member", rename_all = "snake_case")]
pub enum SplitMode {
    /// Shared equally by every member.
    #[default]
    EqualSplit,
    /// Borne by the payer alone.
    Personal,
    /// Paid by one member on behalf of another.
    ForMember(UserId),
}

impl SplitMode {
    /// Rebuilds the mode from its persisted columns.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown tags, a `para_otro` row without a
    /// member, or a member on any other mode.
    pub fn from_parts(tag: &str, for_member: Option<UserId>) -> Result<Self, SplitError> {
        match (tag, for_member) {
            (TAG_EQUAL_SPLIT, None) => Ok(Self::EqualSplit),
            (TAG_PERSONAL, None) => Ok(Self::Personal),
            (TAG_FOR_MEMBER, Some(member)) => Ok(Self::ForMember(member)),
            (TAG_FOR_MEMBER, None) => Err(SplitError::MissingMember),
            (TAG_EQUAL_SPLIT | TAG_PERSONAL, Some(_)) => Err(SplitError::UnexpectedMember),
            (other, _) => Err(SplitError::UnknownTag(other.to_string())),
        }
    }

    /// Persisted tag.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::EqualSplit => TAG_EQUAL_SPLIT,
            Self::Personal => TAG_PERSONAL,
            Self::ForMember(_) => TAG_FOR_MEMBER,
        }
    }

    /// Persisted member column.
    #[must_use]
    pub const fn for_member(self) -> Option<UserId> {
        match self {
            Self::ForMember(member) => Some(member),
            Self::EqualSplit | Self::Personal => None,
        }
    }

    /// True for [`SplitMode::EqualSplit`].
    #[must_use]
    pub const fn is_shared(self) -> bool {
        matches!(self, Self::EqualSplit)
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_round_trips_each_mode() {
        let member = UserId::new();
        for mode in [
            SplitMode::EqualSplit,
            SplitMode::Personal,
            SplitMode::ForMember(member),
        ] {
            assert_eq!(SplitMode::from_parts(mode.tag(), mode.for_member()), Ok(mode));
        }
    }

    #[test]
    fn test_para_otro_requires_member() {
        assert_eq!(
            SplitMode::from_parts("para_otro", None),
            Err(SplitError::MissingMember)
        );
    }

    #[test]
    fn test_member_rejected_on_shared_modes() {
        assert_eq!(
            SplitMode::from_parts("50/50", Some(UserId::new())),
            Err(SplitError::UnexpectedMember)
        );
        assert_eq!(
            SplitMode::from_parts("personal", Some(UserId::new())),
            Err(SplitError::UnexpectedMember)
        );
    }

    #[test]
    fn test_unknown_tag() {
        assert_eq!(
            SplitMode::from_parts("60/40", None),
            Err(SplitError::UnknownTag("60/40".into()))
        );
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(SplitMode::EqualSplit).unwrap();
        assert_eq!(json, serde_json::json!({"mode": "equal_split"}));

        let member = UserId::new();
        let json = serde_json::to_value(SplitMode::ForMember(member)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"mode": "for_member", "member": member.to_string()})
        );
    }

    #[test]
    fn test_default_is_equal_split() {
        assert!(SplitMode::default().is_shared());
        assert_eq!(SplitMode::default().to_string(), "50/50");
    }
}
