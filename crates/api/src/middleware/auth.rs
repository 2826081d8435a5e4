//! Bearer token authentication extractor.
//!
//! Protected handlers take a [`RequireAuth`] argument; the request is rejected
//! with 401 before the handler runs unless it carries
//! `Authorization: Bearer <token>` with a token that verifies.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::models::Principal;
use crate::services::auth::{AuthError, AuthService};
use crate::services::token::TokenError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(principal): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", principal.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Principal);

/// Error returned when a protected route is called without valid credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    /// No `Authorization: Bearer` header.
    MissingToken,
    /// Token failed verification (signature, format or expiry).
    InvalidToken,
    /// Token verified but names no subject.
    MissingSubject,
}

impl AuthRejection {
    const fn message(self) -> &'static str {
        match self {
            Self::MissingToken => "Not authenticated",
            Self::InvalidToken => "Invalid or expired token",
            Self::MissingSubject => "Invalid token payload",
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            [("www-authenticate", "Bearer")],
            Json(json!({ "error": self.message() })),
        )
            .into_response()
    }
}

/// Extract the token from an `Authorization` header value.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let auth = AuthService::new(&state.config().demo_account, state.tokens());

        let principal = auth.authenticate(token).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            match e {
                AuthError::Token(TokenError::MissingSubject) => AuthRejection::MissingSubject,
                AuthError::Token(TokenError::Jwt(_)) | AuthError::InvalidCredentials => {
                    AuthRejection::InvalidToken
                }
            }
        })?;

        Ok(Self(principal))
    }
}
