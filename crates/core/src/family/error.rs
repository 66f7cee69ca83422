use thiserror::Error;

/// Family and permission errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FamilyError {
    /// Code has the wrong length or characters outside the alphabet.
    #[error("invalid invite code")]
    InvalidInviteCode,

    /// The user is already a member of a family.
    #[error("user already belongs to a family")]
    AlreadyInFamily,

    /// Role string is neither `owner` nor `member`.
    #[error("unknown family role '{0}'")]
    UnknownRole(String),

    /// The acting member may not perform the action.
    #[error("{0}")]
    Forbidden(&'static str),
}
