//! Cart service.
//!
//! The cart is a set of `(product, quantity)` entries per owner. Adding a
//! product that is already in the cart overwrites its quantity. Reads and
//! writes are separate store calls, so concurrent adds of the same product
//! may leave duplicate entries or lose an update.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use cloudmart_core::{OwnerId, ProductId};

use crate::db::{CartRepository, DocumentStore, ProductRepository, RepositoryError};
use crate::models::{CartEntry, EnrichedCartLine};

/// Errors from cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity outside `1..=u32::MAX`.
    #[error("quantity must be between 1 and {max}, got {0}", max = u32::MAX)]
    InvalidQuantity(i64),

    /// Store is not configured.
    #[error("document store is not configured")]
    Unconfigured,

    /// Store write failed.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    store: Option<&'a dyn DocumentStore>,
}

impl<'a> CartService<'a> {
    /// Create a cart service over an optional store.
    #[must_use]
    pub const fn new(store: Option<&'a dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Cart contents joined with product details.
    ///
    /// Entries whose product no longer exists are left out. Store failures
    /// yield an empty cart.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn get_cart(&self, owner: &OwnerId) -> Vec<EnrichedCartLine> {
        let Some(store) = self.store else {
            return Vec::new();
        };

        match Self::enrich(store, owner).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!(error = %e, "Cart read failed, returning empty cart");
                Vec::new()
            }
        }
    }

    async fn enrich(
        store: &dyn DocumentStore,
        owner: &OwnerId,
    ) -> Result<Vec<EnrichedCartLine>, RepositoryError> {
        let entries = CartRepository::new(store).list_for(owner).await?;
        let products = ProductRepository::new(store);

        let mut lines = Vec::with_capacity(entries.len());
        for entry in &entries {
            match products.get(&entry.product_id).await? {
                Some(product) => lines.push(EnrichedCartLine::new(entry, product)),
                None => debug!(product_id = %entry.product_id, "Skipping cart entry for missing product"),
            }
        }
        Ok(lines)
    }

    /// Set the quantity of `product_id` in the cart, creating the entry if
    /// needed. The product is not checked against the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity` is below 1 or does
    /// not fit in `u32`,
    /// `CartError::Unconfigured` without a store and `CartError::Repository`
    /// if a store call fails.
    #[instrument(skip(self), fields(owner = %owner, product_id = %product_id))]
    pub async fn add_or_update(
        &self,
        owner: &OwnerId,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<(), CartError> {
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q >= 1)
            .ok_or(CartError::InvalidQuantity(quantity))?;
        let store = self.store.ok_or(CartError::Unconfigured)?;
        let cart = CartRepository::new(store);

        let existing = cart.find(owner, product_id).await?.into_iter().next();
        let entry = match existing {
            Some(mut entry) => {
                entry.quantity = quantity;
                entry
            }
            None => CartEntry::new(owner.clone(), product_id.clone(), quantity),
        };

        cart.save(&entry).await?;
        debug!(entry_id = %entry.id, quantity, "Saved cart entry");
        Ok(())
    }

    /// Remove every entry for `product_id`. Removing an absent product
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Unconfigured` without a store and
    /// `CartError::Repository` if a store call fails.
    #[instrument(skip(self), fields(owner = %owner, product_id = %product_id))]
    pub async fn remove(&self, owner: &OwnerId, product_id: &ProductId) -> Result<(), CartError> {
        let store = self.store.ok_or(CartError::Unconfigured)?;
        let cart = CartRepository::new(store);

        for entry in cart.find(owner, product_id).await? {
            cart.delete(&entry).await?;
        }
        Ok(())
    }
}
