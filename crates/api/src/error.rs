//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; every error body is JSON `{"error": "<message>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::catalog::CatalogError;
use crate::services::orders::OrderError;

/// Message returned whenever the store is missing or unreachable.
pub const DATABASE_UNAVAILABLE: &str = "Database not available";

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cart mutation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Order placement failed.
    #[error("Order error: {0}")]
    Order(#[from] OrderError),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Catalog(CatalogError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Catalog(CatalogError::Unconfigured | CatalogError::Repository(_))
            | Self::Cart(CartError::Unconfigured)
            | Self::Order(OrderError::Unconfigured) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Cart(CartError::InvalidQuantity(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Order(OrderError::EmptyCart) => StatusCode::CONFLICT,
            Self::Auth(AuthError::Token(_))
            | Self::Cart(CartError::Repository(_))
            | Self::Order(OrderError::Repository(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Internal details are never exposed.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Catalog(CatalogError::NotFound(_)) => "Product not found".to_string(),
            Self::Catalog(CatalogError::Unconfigured | CatalogError::Repository(_))
            | Self::Cart(CartError::Unconfigured)
            | Self::Order(OrderError::Unconfigured) => DATABASE_UNAVAILABLE.to_string(),
            Self::Cart(err @ CartError::InvalidQuantity(_)) => err.to_string(),
            Self::Cart(CartError::Repository(_)) => "Failed to update cart".to_string(),
            Self::Order(OrderError::EmptyCart) => "Cart is empty".to_string(),
            Self::Order(OrderError::Repository(_)) => "Failed to place order".to_string(),
            Self::BadRequest(msg) => msg.clone(),
            Self::Auth(AuthError::Token(_)) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
