//! Input checks shared by expenses, incomes and settlements.
//!
//! These run before a row is written. They only look at the values and
//! the family's member list; ownership checks live in
//! [`crate::family::permissions`].

use hogar_shared::types::UserId;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::split::SplitMode;

/// Longest category name accepted.
pub const MAX_CATEGORY_LEN: usize = 50;

/// Validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Amount is zero or negative.
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    /// More than two decimal places.
    #[error("amount cannot have more than two decimal places")]
    TooPrecise,

    /// Referenced user is not in the family.
    #[error("user {0} is not a member of this family")]
    NotAMember(UserId),

    /// `para_otro` pointing at the payer.
    #[error("an expense paid for another member cannot name the payer")]
    ForMemberIsPayer,

    /// Settlement from a member to themselves.
    #[error("a settlement needs two different members")]
    SelfSettlement,

    /// Blank category.
    #[error("category is required")]
    EmptyCategory,

    /// Category longer than [`MAX_CATEGORY_LEN`].
    #[error("category cannot exceed {MAX_CATEGORY_LEN} characters")]
    CategoryTooLong,
}

/// Checks a money amount: positive, at most cents.
///
/// # Errors
///
/// Returns `NonPositiveAmount` or `TooPrecise`.
pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if amount.normalize().scale() > 2 {
        return Err(ValidationError::TooPrecise);
    }
    Ok(())
}

/// Trims a category and checks it is usable.
///
/// # Errors
///
/// Returns `EmptyCategory` or `CategoryTooLong`.
pub fn validate_category(category: &str) -> Result<String, ValidationError> {
    let category = category.trim();
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(ValidationError::CategoryTooLong);
    }
    Ok(category.to_string())
}

fn ensure_member(user: UserId, members: &[UserId]) -> Result<(), ValidationError> {
    if members.contains(&user) {
        Ok(())
    } else {
        Err(ValidationError::NotAMember(user))
    }
}

/// Checks who paid and how an expense or income is split.
///
/// # Errors
///
/// Returns `NotAMember` when the payer or beneficiary is outside the
/// family, or `ForMemberIsPayer` for `para_otro` naming the payer.
pub fn validate_split(
    split: SplitMode,
    paid_by: UserId,
    members: &[UserId],
) -> Result<(), ValidationError> {
    ensure_member(paid_by, members)?;
    if let SplitMode::ForMember(beneficiary) = split {
        ensure_member(beneficiary, members)?;
        if beneficiary == paid_by {
            return Err(ValidationError::ForMemberIsPayer);
        }
    }
    Ok(())
}

/// Checks a settlement between two members.
///
/// # Errors
///
/// Returns `SelfSettlement`, `NotAMember` or an amount error.
pub fn validate_settlement(
    from: UserId,
    to: UserId,
    amount: Decimal,
    members: &[UserId],
) -> Result<(), ValidationError> {
    if from == to {
        return Err(ValidationError::SelfSettlement);
    }
    ensure_member(from, members)?;
    ensure_member(to, members)?;
    validate_amount(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.01), Ok(()))]
    #[case(dec!(100), Ok(()))]
    #[case(dec!(12.50), Ok(()))]
    #[case(dec!(12.500), Ok(()))]
    #[case(dec!(0), Err(ValidationError::NonPositiveAmount))]
    #[case(dec!(-5), Err(ValidationError::NonPositiveAmount))]
    #[case(dec!(1.005), Err(ValidationError::TooPrecise))]
    fn test_validate_amount(
        #[case] amount: Decimal,
        #[case] expected: Result<(), ValidationError>,
    ) {
        assert_eq!(validate_amount(amount), expected);
    }

    #[test]
    fn test_validate_category() {
        assert_eq!(validate_category("  Super ").unwrap(), "Super");
        assert_eq!(validate_category("   "), Err(ValidationError::EmptyCategory));
        assert_eq!(
            validate_category(&"x".repeat(51)),
            Err(ValidationError::CategoryTooLong)
        );
    }

    #[test]
    fn test_validate_split() {
        let ana = UserId::new();
        let luis = UserId::new();
        let stranger = UserId::new();
        let members = [ana, luis];

        assert!(validate_split(SplitMode::EqualSplit, ana, &members).is_ok());
        assert!(validate_split(SplitMode::Personal, luis, &members).is_ok());
        assert!(validate_split(SplitMode::ForMember(luis), ana, &members).is_ok());
        assert_eq!(
            validate_split(SplitMode::ForMember(ana), ana, &members),
            Err(ValidationError::ForMemberIsPayer)
        );
        assert_eq!(
            validate_split(SplitMode::ForMember(stranger), ana, &members),
            Err(ValidationError::NotAMember(stranger))
        );
        assert_eq!(
            validate_split(SplitMode::EqualSplit, stranger, &members),
            Err(ValidationError::NotAMember(stranger))
        );
    }

    #[test]
    fn test_validate_settlement() {
        let ana = UserId::new();
        let luis = UserId::new();
        let members = [ana, luis];

        assert!(validate_settlement(luis, ana, dec!(50), &members).is_ok());
        assert_eq!(
            validate_settlement(ana, ana, dec!(50), &members),
            Err(ValidationError::SelfSettlement)
        );
        assert_eq!(
            validate_settlement(luis, ana, dec!(0), &members),
            Err(ValidationError::NonPositiveAmount)
        );
    }
}
