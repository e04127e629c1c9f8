//! Signed identity tokens.
//!
//! `TokenCodec` is a pure transform: it signs and verifies claims but never
//! persists anything. Session bookkeeping lives in the repository layer.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing key must not be empty")]
    EmptySecret,
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// The two flavors of token a login produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub full_name: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id. `iat` has second granularity, so without this two
    /// logins in the same second would sign byte-identical strings and
    /// collide on the session table's unique token index.
    pub jti: String,
}

impl Claims {
    /// Expiry is checked here, by the caller, not inside `validate`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }
}

/// Issues and verifies HMAC-SHA256 signed tokens.
///
/// Constructed once at startup with an explicit issuer, secret, and per-kind
/// lifetime, then shared read-only across requests.
#[derive(Clone)]
pub struct TokenCodec {
    issuer: String,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(
        issuer: impl Into<String>,
        secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }
        Ok(TokenCodec {
            issuer: issuer.into(),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TokenError> {
        TokenCodec::new(
            config.app_name.clone(),
            &config.app_secret,
            Duration::hours(config.token_ttl_hours as i64),
            Duration::hours(config.refresh_token_ttl_hours as i64),
        )
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Builds and signs a claim whose validity window starts at `now`.
    pub fn issue(
        &self,
        username: &str,
        full_name: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires_at = now + self.ttl(kind);
        let claims = Claims {
            username: username.to_owned(),
            full_name: full_name.to_owned(),
            iss: self.issuer.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Sign)
    }

    /// Verifies signature and structure only. Expiry is left to the caller,
    /// which compares `Claims::exp` against its own clock.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(TokenError::Invalid)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(
            "authgate-test",
            "unit-test-secret",
            Duration::hours(3),
            Duration::hours(72),
        )
        .expect("build codec")
    }

    #[test]
    fn issue_and_validate_round_trip() {
        let now = Utc::now();
        let token = codec()
            .issue("alice", "Alice Example", TokenKind::Access, now)
            .expect("issue token");
        let claims = codec().validate(&token).expect("validate token");

        assert_eq!(claims.username, "alice");
        assert_eq!(claims.full_name, "Alice Example");
        assert_eq!(claims.iss, "authgate-test");
    }

    #[test]
    fn tokens_carry_unique_ids() {
        let now = Utc::now();
        let first = codec()
            .issue("alice", "Alice Example", TokenKind::Access, now)
            .expect("issue token");
        let second = codec()
            .issue("alice", "Alice Example", TokenKind::Access, now)
            .expect("issue token");

        let first = codec().validate(&first).expect("validate token");
        let second = codec().validate(&second).expect("validate token");
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn empty_secret_is_rejected() {
        let result = TokenCodec::new("issuer", "", Duration::hours(3), Duration::hours(72));
        assert!(matches!(result, Err(TokenError::EmptySecret)));
    }
}
