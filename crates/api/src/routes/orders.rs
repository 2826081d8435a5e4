//! Order route handlers (all require a bearer token).

use axum::{Json, extract::State};

use cloudmart_core::OwnerId;

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Order;
use crate::services::orders::OrderService;
use crate::state::AppState;

/// Place an order from the current cart. Any request body is ignored.
#[tracing::instrument(skip(state, principal), fields(user = %principal.username))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
) -> Result<Json<Order>> {
    let orders = OrderService::new(state.store());
    let order = orders.place_order(&OwnerId::shared()).await?;
    Ok(Json(order))
}

/// Order history, oldest first.
#[tracing::instrument(skip(state, principal), fields(user = %principal.username))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(principal): RequireAuth,
) -> Json<Vec<Order>> {
    let orders = OrderService::new(state.store());
    Json(orders.list_orders(&OwnerId::shared()).await)
}
