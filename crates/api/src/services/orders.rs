//! Order service.
//!
//! Placing an order snapshots the cart (product and quantity only), persists
//! the order, then deletes the consumed cart entries. The deletes are not
//! rolled back together with the order: if one fails the order still stands
//! and the leftover entries are logged.

use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use cloudmart_core::OwnerId;

use crate::db::{CartRepository, DocumentStore, OrderRepository, RepositoryError};
use crate::models::Order;

/// Errors from order placement.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart has no entries.
    #[error("cart is empty")]
    EmptyCart,

    /// Store is not configured.
    #[error("document store is not configured")]
    Unconfigured,

    /// Store call failed.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    store: Option<&'a dyn DocumentStore>,
}

impl<'a> OrderService<'a> {
    /// Create an order service over an optional store.
    #[must_use]
    pub const fn new(store: Option<&'a dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Turn the owner's cart into a confirmed order and empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if the cart has no entries,
    /// `OrderError::Unconfigured` without a store and `OrderError::Repository`
    /// if reading the cart or writing the order fails.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn place_order(&self, owner: &OwnerId) -> Result<Order, OrderError> {
        let store = self.store.ok_or(OrderError::Unconfigured)?;
        let cart = CartRepository::new(store);

        let entries = cart.list_for(owner).await?;
        if entries.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let order = Order::confirmed(owner.clone(), &entries, Utc::now());
        OrderRepository::new(store).create(&order).await?;
        info!(order_id = %order.id, items = order.items.len(), "Order placed");

        let mut leftover = 0_usize;
        for entry in &entries {
            if let Err(e) = cart.delete(entry).await {
                leftover += 1;
                error!(entry_id = %entry.id, error = %e, "Failed to clear cart entry after order");
            }
        }
        if leftover > 0 {
            warn!(order_id = %order.id, leftover, "Cart only partially cleared after order");
        }

        Ok(order)
    }

    /// All orders for the owner, oldest first. Store failures yield an
    /// empty list.
    #[instrument(skip(self), fields(owner = %owner))]
    pub async fn list_orders(&self, owner: &OwnerId) -> Vec<Order> {
        let Some(store) = self.store else {
            return Vec::new();
        };

        OrderRepository::new(store)
            .list_for(owner)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Order listing failed, returning empty list");
                Vec::new()
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cloudmart_core::{OrderStatus, ProductId};

    use super::*;
    use crate::db::memory::InMemoryStore;
    use crate::db::seed::seed_catalog;
    use crate::services::cart::CartService;

    #[tokio::test]
    async fn test_empty_cart_cannot_be_ordered() {
        let store = InMemoryStore::new();
        let orders = OrderService::new(Some(&store));

        let result = orders.place_order(&OwnerId::shared()).await;

        assert!(matches!(result, Err(OrderError::EmptyCart)));
        assert!(orders.list_orders(&OwnerId::shared()).await.is_empty());
    }

    #[tokio::test]
    async fn test_order_consumes_cart() {
        let store = InMemoryStore::new();
        seed_catalog(&store).await.unwrap();
        let cart = CartService::new(Some(&store));
        let orders = OrderService::new(Some(&store));
        let owner = OwnerId::shared();

        cart.add_or_update(&owner, &ProductId::new("1"), 2).await.unwrap();
        cart.add_or_update(&owner, &ProductId::new("5"), 1).await.unwrap();
        cart.add_or_update(&owner, &ProductId::new("8"), 4).await.unwrap();

        let order = orders.place_order(&owner).await.unwrap();

        assert_eq!(order.items.len(), 3);
        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.user_id, owner);
        assert_eq!(order.items[2].product_id.as_str(), "8");
        assert_eq!(order.items[2].quantity, 4);
        assert!(cart.get_cart(&owner).await.is_empty());
        assert_eq!(store.count(crate::db::Collection::Cart).await, 0);

        let listed = orders.list_orders(&owner).await;
        assert_eq!(listed, vec![order]);
    }

    #[tokio::test]
    async fn test_second_order_on_consumed_cart_is_empty() {
        let store = InMemoryStore::new();
        let cart = CartService::new(Some(&store));
        let orders = OrderService::new(Some(&store));
        let owner = OwnerId::shared();

        cart.add_or_update(&owner, &ProductId::new("1"), 1).await.unwrap();
        orders.place_order(&owner).await.unwrap();

        assert!(matches!(
            orders.place_order(&owner).await,
            Err(OrderError::EmptyCart)
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_store() {
        let orders = OrderService::new(None);
        assert!(matches!(
            orders.place_order(&OwnerId::shared()).await,
            Err(OrderError::Unconfigured)
        ));
        assert!(orders.list_orders(&OwnerId::shared()).await.is_empty());
    }
}
