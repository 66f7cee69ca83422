//! Families, invite codes and who may change what.
//!
//! A user belongs to at most one family. Members join with the family's
//! invite code; the owner may rotate it.

mod error;
pub mod invite;
pub mod permissions;

pub use error::FamilyError;
pub use invite::{INVITE_ALPHABET, INVITE_CODE_LEN, generate_invite_code, normalize_invite_code};
pub use permissions::{Actor, FamilyRole};

use hogar_shared::types::FamilyId;

/// Rejects a join when the user already has a family.
///
/// # Errors
///
/// Returns `FamilyError::AlreadyInFamily`.
pub fn ensure_can_join(current_family: Option<FamilyId>) -> Result<(), FamilyError> {
    if current_family.is_some() {
        return Err(FamilyError::AlreadyInFamily);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hogar_shared::types::FamilyId;

    #[test]
    fn test_ensure_can_join() {
        assert!(ensure_can_join(None).is_ok());
        assert_eq!(
            ensure_can_join(Some(FamilyId::new())),
            Err(FamilyError::AlreadyInFamily)
        );
    }
}
