//! Product repository.

use cloudmart_core::ProductId;

use super::{Collection, DocumentStore, Filter, RepositoryError, from_document, to_document};
use crate::models::Product;

/// Fields matched by free-text search.
const SEARCH_FIELDS: [&str; 2] = ["name", "category"];

/// Repository for catalog reads and seeding.
pub struct ProductRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// List products, optionally restricted to an exact category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or a document is malformed.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Product>, RepositoryError> {
        let docs = match category {
            Some(category) => {
                let filter = Filter::new().eq("category", category);
                self.store.list_where(Collection::Products, &filter).await?
            }
            None => self.store.list_all(Collection::Products).await?,
        };

        docs.into_iter()
            .map(|doc| from_document(Collection::Products, doc))
            .collect()
    }

    /// Products whose name or category contains `query` (case-sensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or a document is malformed.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        self.store
            .search(Collection::Products, &SEARCH_FIELDS, query)
            .await?
            .into_iter()
            .map(|doc| from_document(Collection::Products, doc))
            .collect()
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or the document is malformed.
    pub async fn get(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let filter = Filter::new().eq("id", id.as_str());
        let doc = self
            .store
            .list_where(Collection::Products, &filter)
            .await?
            .into_iter()
            .next();

        doc.map(|doc| from_document(Collection::Products, doc))
            .transpose()
    }

    /// Distinct category names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn categories(&self) -> Result<Vec<String>, RepositoryError> {
        self.store.distinct(Collection::Products, "category").await
    }

    /// Whether the catalog has no products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.store.list_all(Collection::Products).await?.is_empty())
    }

    /// Insert a product unless one with the same ID exists.
    ///
    /// Returns `true` if the product was inserted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn create_if_absent(&self, product: &Product) -> Result<bool, RepositoryError> {
        self.store
            .create_if_absent(Collection::Products, to_document(product)?)
            .await
    }
}
