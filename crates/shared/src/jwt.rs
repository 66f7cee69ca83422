//! JWT token generation and validation.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{Claims, TokenKind, TokenPair};
use crate::config::JwtSettings;

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expires_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_token_expires_secs: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_secs: 3600,
            refresh_token_expires_secs: 2_592_000,
        }
    }
}

impl From<&JwtSettings> for JwtConfig {
    fn from(settings: &JwtSettings) -> Self {
        Self {
            secret: settings.secret.clone(),
            access_token_expires_secs: i64::try_from(settings.access_token_expiry_secs)
                .unwrap_or(i64::MAX),
            refresh_token_expires_secs: i64::try_from(settings.refresh_token_expiry_secs)
                .unwrap_or(i64::MAX),
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,

    /// A refresh token was used where an access token is required, or the reverse.
    #[error("wrong token kind")]
    WrongKind,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_secs", &self.config.access_token_expires_secs)
            .field("refresh_token_expires_secs", &self.config.refresh_token_expires_secs)
            .field("keys", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given configuration.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn sign(
        &self,
        user_id: Uuid,
        family: Option<(Uuid, &str)>,
        kind: TokenKind,
    ) -> Result<String, JwtError> {
        let lifetime = match kind {
            TokenKind::Access => self.config.access_token_expires_secs,
            TokenKind::Refresh => self.config.refresh_token_expires_secs,
        };
        let claims = Claims::new(user_id, family, kind, Utc::now() + Duration::seconds(lifetime));

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Issues an access/refresh pair for a user and their current family.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        family: Option<(Uuid, &str)>,
    ) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.sign(user_id, family, TokenKind::Access)?,
            refresh_token: self.sign(user_id, family, TokenKind::Refresh)?,
            expires_in: self.config.access_token_expires_secs,
        })
    }

    /// Validates and decodes a token of any kind.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired and
    /// `JwtError::DecodingError` if it is malformed or badly signed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Validates a token and requires it to be of the given kind.
    ///
    /// # Errors
    ///
    /// Same as [`Self::validate_token`], plus `JwtError::WrongKind`.
    pub fn validate_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.kind != kind {
            return Err(JwtError::WrongKind);
        }
        Ok(claims)
    }

    /// Returns the access token expiration in seconds.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expires_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-testing".to_string(),
            ..JwtConfig::default()
        })
    }

    #[test]
    fn test_issue_and_validate_pair() {
        let service = create_test_service();
        let user_id = Uuid::new_v4();
        let family_id = Uuid::new_v4();

        let pair = service.issue_pair(user_id, Some((family_id, "owner"))).unwrap();
        assert_eq!(pair.expires_in, 3600);

        let claims = service
            .validate_kind(&pair.access_token, TokenKind::Access)
            .unwrap();
        assert_eq!(claims.user_id(), user_id);
        assert_eq!(claims.family_id(), Some(family_id));
        assert_eq!(claims.role.as_deref(), Some("owner"));
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let service = create_test_service();
        let pair = service.issue_pair(Uuid::new_v4(), None).unwrap();

        assert!(matches!(
            service.validate_kind(&pair.refresh_token, TokenKind::Access),
            Err(JwtError::WrongKind)
        ));
        assert!(
            service
                .validate_kind(&pair.refresh_token, TokenKind::Refresh)
                .is_ok()
        );
    }

    #[test]
    fn test_invalid_token() {
        let service = create_test_service();
        assert!(service.validate_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let pair = create_test_service().issue_pair(Uuid::new_v4(), None).unwrap();
        let other = JwtService::new(JwtConfig {
            secret: "another-secret".to_string(),
            ..JwtConfig::default()
        });
        assert!(matches!(
            other.validate_token(&pair.access_token),
            Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_from_settings() {
        let settings = JwtSettings {
            secret: "s".into(),
            access_token_expiry_secs: 60,
            refresh_token_expiry_secs: 120,
        };
        let config = JwtConfig::from(&settings);
        assert_eq!(config.access_token_expires_secs, 60);
        assert_eq!(config.refresh_token_expires_secs, 120);
    }
}
