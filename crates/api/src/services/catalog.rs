//! Catalog service.
//!
//! Read-only product access. List-style reads degrade to an empty result when
//! the store is missing or failing; single-product lookup cannot degrade and
//! reports the store as unavailable instead.

use thiserror::Error;
use tracing::{instrument, warn};

use cloudmart_core::ProductId;

use crate::db::{DocumentStore, ProductRepository, RepositoryError};
use crate::models::Product;

/// Errors from catalog lookups.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No product with the given ID.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// Store is not configured.
    #[error("document store is not configured")]
    Unconfigured,

    /// Store lookup failed.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Catalog service.
pub struct CatalogService<'a> {
    products: Option<ProductRepository<'a>>,
}

impl<'a> CatalogService<'a> {
    /// Create a catalog service over an optional store.
    #[must_use]
    pub fn new(store: Option<&'a dyn DocumentStore>) -> Self {
        Self {
            products: store.map(ProductRepository::new),
        }
    }

    /// All products, or those in exactly `category`. An empty category means
    /// no filter.
    #[instrument(skip(self))]
    pub async fn list_products(&self, category: Option<&str>) -> Vec<Product> {
        let Some(products) = &self.products else {
            return Vec::new();
        };
        let category = category.filter(|c| !c.is_empty());

        products.list(category).await.unwrap_or_else(|e| {
            warn!(error = %e, "Product listing failed, returning empty list");
            Vec::new()
        })
    }

    /// Products whose name or category contains `query` (case-sensitive).
    /// An empty query returns the whole catalog.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Vec<Product> {
        let Some(products) = &self.products else {
            return Vec::new();
        };

        products.search(query).await.unwrap_or_else(|e| {
            warn!(error = %e, "Product search failed, returning empty list");
            Vec::new()
        })
    }

    /// Look up one product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist,
    /// `CatalogError::Unconfigured` without a store and
    /// `CatalogError::Repository` if the lookup fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, CatalogError> {
        let products = self.products.as_ref().ok_or(CatalogError::Unconfigured)?;

        products
            .get(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Distinct category names, in no particular order.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Vec<String> {
        let Some(products) = &self.products else {
            return Vec::new();
        };

        products.categories().await.unwrap_or_else(|e| {
            warn!(error = %e, "Category listing failed, returning empty list");
            Vec::new()
        })
    }
}
