//! Cart entry repository.

use cloudmart_core::{OwnerId, ProductId};

use super::{Collection, DocumentStore, Filter, RepositoryError, from_document, to_document};
use crate::models::CartEntry;

/// Repository for cart entries.
pub struct CartRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All entries owned by `owner`, in store order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or a document is malformed.
    pub async fn list_for(&self, owner: &OwnerId) -> Result<Vec<CartEntry>, RepositoryError> {
        let filter = Filter::new().eq("user_id", owner.as_str());
        self.store
            .list_where(Collection::Cart, &filter)
            .await?
            .into_iter()
            .map(|doc| from_document(Collection::Cart, doc))
            .collect()
    }

    /// Entries for one (owner, product) pair.
    ///
    /// Normally at most one, but concurrent adds can leave duplicates.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or a document is malformed.
    pub async fn find(
        &self,
        owner: &OwnerId,
        product_id: &ProductId,
    ) -> Result<Vec<CartEntry>, RepositoryError> {
        let filter = Filter::new()
            .eq("user_id", owner.as_str())
            .eq("product_id", product_id.as_str());
        self.store
            .list_where(Collection::Cart, &filter)
            .await?
            .into_iter()
            .map(|doc| from_document(Collection::Cart, doc))
            .collect()
    }

    /// Insert or replace an entry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn save(&self, entry: &CartEntry) -> Result<(), RepositoryError> {
        self.store
            .upsert(Collection::Cart, to_document(entry)?)
            .await
    }

    /// Delete an entry.
    ///
    /// Returns `true` if the entry existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails.
    pub async fn delete(&self, entry: &CartEntry) -> Result<bool, RepositoryError> {
        self.store
            .delete_by_id(Collection::Cart, entry.id.as_str(), entry.user_id.as_str())
            .await
    }
}
