//! Credentials: password hashing and email normalization.

mod password;

pub use password::{MIN_PASSWORD_LEN, PasswordError, check_strength, hash_password, verify_password};

/// Canonical form of an email address used for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
        assert_eq!(normalize_email("luis@hogar.app"), "luis@hogar.app");
    }
}
