//! Authentication error types.

use thiserror::Error;

use crate::services::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong username or password. Both cases share one message.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token could not be issued or verified.
    #[error("token error: {0}")]
    Token(#[from] TokenError),
}
