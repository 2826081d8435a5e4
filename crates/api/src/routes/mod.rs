//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! POST /auth/login                      - Exchange demo credentials for a bearer token
//! GET  /health                          - Service status
//! GET  /health/ready                    - Readiness (store reachable)
//!
//! # Catalog
//! GET  /api/v1/products?category=       - Product listing
//! GET  /api/v1/products/{id}            - Product detail
//! GET  /api/v1/search?q=                - Search by name or category
//! GET  /api/v1/categories               - Distinct categories
//!
//! # Cart (requires auth)
//! GET    /api/v1/cart                   - Enriched cart lines
//! POST   /api/v1/cart/items             - Add or update a line
//! DELETE /api/v1/cart/items/{product_id} - Remove a line
//!
//! # Orders (requires auth)
//! POST /api/v1/orders                   - Place an order from the cart
//! GET  /api/v1/orders                   - Order history
//! ```

pub mod auth;
pub mod cart;
pub mod health;
pub mod orders;
pub mod products;

use axum::{
    Router,
    body::Body,
    http::Request,
    middleware,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(auth::login))
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/search", get(products::search))
        .route("/categories", get(products::categories))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/items", post(cart::add))
        .route("/items/{product_id}", delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new().route("/", get(orders::index).post(orders::create))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/auth", auth_routes())
        .nest(
            "/api/v1",
            catalog_routes()
                .nest("/cart", cart_routes())
                .nest("/orders", order_routes()),
        )
}

/// Build the application router with tracing and request IDs.
///
/// Sentry layers are added by the binary on top of this.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}
