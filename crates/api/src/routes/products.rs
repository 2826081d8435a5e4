//! Catalog route handlers.
//!
//! Listing, search and categories never fail: they answer with an empty list
//! when the store is missing or failing.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use cloudmart_core::ProductId;

use crate::error::{AppError, Result};
use crate::models::Product;
use crate::services::catalog::CatalogService;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
}

/// Query parameters for search.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Product listing, optionally filtered by category.
#[tracing::instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Json<Vec<Product>> {
    let catalog = CatalogService::new(state.store());
    Json(catalog.list_products(filter.category.as_deref()).await)
}

/// Search products by name or category. `q` is required but may be empty.
#[tracing::instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Product>>> {
    let q = query
        .q
        .ok_or_else(|| AppError::BadRequest("Missing query parameter: q".to_string()))?;

    let catalog = CatalogService::new(state.store());
    Ok(Json(catalog.search(&q).await))
}

/// Product detail.
#[tracing::instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let catalog = CatalogService::new(state.store());
    let product = catalog.get_product(&ProductId::new(id)).await?;
    Ok(Json(product))
}

/// Distinct product categories.
#[tracing::instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Json<Vec<String>> {
    let catalog = CatalogService::new(state.store());
    Json(catalog.list_categories().await)
}
