//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying `{sub, exp}`. Verification rejects bad
//! signatures, malformed tokens, tokens past `exp` (no leeway) and tokens
//! without a `sub` claim. There is no revocation or refresh.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::TokenConfig;

/// Errors from token operations.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Signing or validation failed (bad signature, malformed, expired).
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Token verified but carries no subject.
    #[error("token has no subject")]
    MissingSubject,
}

/// Claims carried by issued tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Create a token service from configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::minutes(config.ttl_minutes),
        }
    }

    /// Token lifetime.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `username`, valid from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Jwt` if signing fails.
    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        self.issue_at(username, Utc::now())
    }

    /// Issue a token as if it were created at `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Jwt` if signing fails.
    pub fn issue_at(&self, username: &str, issued_at: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            sub: Some(username.to_owned()),
            exp: (issued_at + self.ttl).timestamp(),
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Jwt` if the token is malformed, badly signed or
    /// expired, and `TokenError::MissingSubject` if it has no `sub`.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)?;
        data.claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(TokenError::MissingSubject)
    }
}
