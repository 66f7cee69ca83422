//! Authentication types for JWT and auth payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Which of the two tokens a set of claims belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token sent on every request.
    Access,
    /// Long-lived token exchanged for a new pair.
    Refresh,
}

/// JWT claims.
///
/// A freshly registered user has no family yet, so `fam` and `role` are
/// optional. Creating or joining a family issues a new pair with both set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Family the user belongs to, if any.
    pub fam: Option<Uuid>,
    /// Role inside the family (`owner` or `member`).
    pub role: Option<String>,
    /// Token kind.
    pub kind: TokenKind,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        family: Option<(Uuid, &str)>,
        kind: TokenKind,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            sub: user_id,
            fam: family.map(|(id, _)| id),
            role: family.map(|(_, role)| role.to_string()),
            kind,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the family ID from claims.
    #[must_use]
    pub const fn family_id(&self) -> Option<Uuid> {
        self.fam
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    /// User email.
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    /// User email.
    #[validate(email(message = "must be a valid email"))]
    pub email: String,
    /// User password.
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    /// Name shown to the rest of the family.
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub display_name: String,
}

/// Response for register, login, refresh and family create/join.
#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: Uuid,
    /// User email.
    pub email: String,
    /// Display name.
    pub display_name: String,
    /// The user's family, if they belong to one.
    pub family: Option<UserFamily>,
}

/// Family info for a user.
#[derive(Debug, Clone, Serialize)]
pub struct UserFamily {
    /// Family ID.
    pub id: Uuid,
    /// Family name.
    pub name: String,
    /// User's role in this family.
    pub role: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}

/// Create family request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFamilyRequest {
    /// Family name.
    #[validate(length(min = 1, max = 100, message = "must be 1 to 100 characters"))]
    pub name: String,
    /// ISO 4217 currency code used for display.
    #[serde(default = "default_currency")]
    #[validate(length(equal = 3, message = "must be a 3-letter currency code"))]
    pub currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Join family request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct JoinFamilyRequest {
    /// Invite code shared by a family member.
    #[validate(length(min = 1, message = "must not be empty"))]
    pub invite_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_claims_without_family() {
        let user = Uuid::new_v4();
        let claims = Claims::new(user, None, TokenKind::Access, Utc::now() + Duration::hours(1));
        assert_eq!(claims.user_id(), user);
        assert!(claims.family_id().is_none());
        assert!(claims.role.is_none());
    }

    #[test]
    fn test_claims_with_family() {
        let family = Uuid::new_v4();
        let claims = Claims::new(
            Uuid::new_v4(),
            Some((family, "owner")),
            TokenKind::Refresh,
            Utc::now() + Duration::days(1),
        );
        assert_eq!(claims.family_id(), Some(family));
        assert_eq!(claims.role.as_deref(), Some("owner"));
        assert_eq!(claims.kind, TokenKind::Refresh);
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterRequest {
            email: "not-an-email".into(),
            password: "short".into(),
            display_name: "Ana".into(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
        assert!(!fields.contains_key("display_name"));
    }

    #[test]
    fn test_create_family_default_currency() {
        let req: CreateFamilyRequest = serde_json::from_str(r#"{"name":"Casa"}"#).unwrap();
        assert_eq!(req.currency, "USD");
        assert!(req.validate().is_ok());
    }
}
