//! JWT issuing and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token lifetime of {0}s is out of range")]
    LifetimeOutOfRange(i64),

    #[error(transparent)]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// JWT configuration
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token lifetime in seconds
    pub expiration_secs: i64,
    /// Issuer claim
    pub issuer: String,
}

pub const DEFAULT_ISSUER: &str = "complaint-desk";

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_secs,
            issuer: DEFAULT_ISSUER.to_string(),
        }
    }
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    pub name: String,
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    pub iss: String,
}

impl TokenClaims {
    pub fn new(
        user_id: &str,
        name: &str,
        role: &str,
        config: &JwtConfig,
    ) -> Result<Self, TokenError> {
        let now = Utc::now();
        let exp = Duration::try_seconds(config.expiration_secs)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or(TokenError::LifetimeOutOfRange(config.expiration_secs))?;

        Ok(Self {
            sub: user_id.to_string(),
            name: name.to_string(),
            role: role.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: config.issuer.clone(),
        })
    }
}

/// Create a signed token for a user
pub fn create_token(
    user_id: &str,
    name: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, TokenError> {
    let claims = TokenClaims::new(user_id, name, role, config)?;

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?)
}

/// Verify signature, issuer and expiry, then decode the claims
pub fn verify_token(
    token: &str,
    config: &JwtConfig,
) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new("test-secret", 3600)
    }

    #[test]
    fn issued_token_verifies() {
        let token = create_token("u-1", "Alice", "customer", &config()).unwrap();
        let claims = verify_token(&token, &config()).unwrap();
        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.name, "Alice");
        assert_eq!(claims.role, "customer");
        assert_eq!(claims.iss, DEFAULT_ISSUER);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token("u-1", "Alice", "customer", &config()).unwrap();
        let other = JwtConfig::new("another-secret", 3600);
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn foreign_issuer_is_rejected() {
        let mut foreign = config();
        foreign.issuer = "someone-else".into();
        let token = create_token("u-1", "Alice", "customer", &foreign).unwrap();
        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Well past the default validation leeway
        let expired = JwtConfig::new("test-secret", -3600);
        let token = create_token("u-1", "Alice", "customer", &expired).unwrap();
        assert!(verify_token(&token, &config()).is_err());
    }

    #[test]
    fn oversized_lifetime_is_an_error() {
        let forever = JwtConfig::new("test-secret", 100_000_000 * 86_400);
        assert!(matches!(
            create_token("u-1", "Alice", "customer", &forever),
            Err(TokenError::LifetimeOutOfRange(_))
        ));
    }
}
