//! Order repository.

use cloudmart_core::OwnerId;

use super::{Collection, DocumentStore, Filter, RepositoryError, from_document, to_document};
use crate::models::Order;

/// Repository for orders. Orders are written once and never changed.
pub struct OrderRepository<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Persist a new order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if an order with the same ID exists.
    /// Returns `RepositoryError` for other store failures.
    pub async fn create(&self, order: &Order) -> Result<(), RepositoryError> {
        let inserted = self
            .store
            .create_if_absent(Collection::Orders, to_document(order)?)
            .await?;

        if inserted {
            Ok(())
        } else {
            Err(RepositoryError::Conflict(format!(
                "order {} already exists",
                order.id
            )))
        }
    }

    /// All orders owned by `owner`, in store order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the store fails or a document is malformed.
    pub async fn list_for(&self, owner: &OwnerId) -> Result<Vec<Order>, RepositoryError> {
        let filter = Filter::new().eq("user_id", owner.as_str());
        self.store
            .list_where(Collection::Orders, &filter)
            .await?
            .into_iter()
            .map(|doc| from_document(Collection::Orders, doc))
            .collect()
    }
}
