//! Authentication route handlers.

use axum::{Json, extract::State, extract::rejection::JsonRejection};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::services::auth::{AccessToken, AuthService};
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Exchange the demo credentials for a bearer token.
#[tracing::instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AccessToken>> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let auth = AuthService::new(&state.config().demo_account, state.tokens());
    let token = auth.login(&request.username, &request.password)?;

    Ok(Json(token))
}
