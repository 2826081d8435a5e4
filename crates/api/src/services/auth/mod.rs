//! Authentication service.
//!
//! A single demo account is checked against configuration; a successful login
//! yields a bearer token from the [`TokenService`].

mod error;

pub use error::AuthError;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::DemoAccount;
use crate::models::Principal;
use crate::services::token::TokenService;

/// Token type reported with every issued token.
pub const TOKEN_TYPE: &str = "bearer";

/// Response body for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Authentication service.
pub struct AuthService<'a> {
    account: &'a DemoAccount,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(account: &'a DemoAccount, tokens: &'a TokenService) -> Self {
        Self { account, tokens }
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if either value is wrong.
    /// Returns `AuthError::Token` if the token cannot be signed.
    pub fn login(&self, username: &str, password: &str) -> Result<AccessToken, AuthError> {
        let username_ok = username == self.account.username;
        let password_ok = password == self.account.password.expose_secret();
        if !(username_ok && password_ok) {
            warn!(username = %username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(username)?;
        info!(username = %username, "Issued access token");

        Ok(AccessToken {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    /// Resolve the principal behind a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Token` if the token does not verify.
    pub fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let username = self.tokens.verify(token)?;
        Ok(Principal { username })
    }
}
