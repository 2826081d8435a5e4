//! Cart route handlers (all require a bearer token).
//!
//! The cart is shared: whoever is logged in, lines are stored under the
//! single demo owner.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use cloudmart_core::{OwnerId, ProductId};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::EnrichedCartLine;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCart {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Confirmation returned by cart mutations.
#[derive(Debug, Serialize)]
pub struct CartMessage {
    pub message: &'static str,
}

/// Enriched cart contents.
#[tracing::instrument(skip(state, principal), fields(user = %principal.username))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
) -> Json<Vec<EnrichedCartLine>> {
    let cart = CartService::new(state.store());
    Json(cart.get_cart(&OwnerId::shared()).await)
}

/// Add a product or overwrite its quantity.
#[tracing::instrument(skip(state, principal, body), fields(user = %principal.username))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    body: std::result::Result<Json<AddToCart>, JsonRejection>,
) -> Result<Json<CartMessage>> {
    let Json(item) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let cart = CartService::new(state.store());
    cart.add_or_update(
        &OwnerId::shared(),
        &ProductId::new(item.product_id),
        item.quantity,
    )
    .await?;

    Ok(Json(CartMessage {
        message: "Saved to cart",
    }))
}

/// Remove a product from the cart. Absent products are not an error.
#[tracing::instrument(skip(state, principal), fields(user = %principal.username))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
    Path(product_id): Path<String>,
) -> Result<Json<CartMessage>> {
    let cart = CartService::new(state.store());
    cart.remove(&OwnerId::shared(), &ProductId::new(product_id))
        .await?;

    Ok(Json(CartMessage {
        message: "Removed from cart",
    }))
}
