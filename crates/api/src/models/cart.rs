//! Cart entries and the enriched lines served to clients.

use serde::{Deserialize, Serialize};

use cloudmart_core::{CartEntryId, OwnerId, Price, ProductId};

use super::Product;

/// A persisted cart entry linking one owner to one product.
///
/// At most one entry should exist per (owner, product); this is upheld by
/// the cart service reading before it writes, not by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub id: CartEntryId,
    pub user_id: OwnerId,
    pub product_id: ProductId,
    pub quantity: u32,
}

impl CartEntry {
    /// Create a new entry with a freshly generated ID.
    #[must_use]
    pub fn new(user_id: OwnerId, product_id: ProductId, quantity: u32) -> Self {
        Self {
            id: CartEntryId::generate(),
            user_id,
            product_id,
            quantity,
        }
    }
}

/// A cart entry joined with its product's display attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedCartLine {
    /// The product ID (not the cart entry ID).
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub image: String,
    pub category: String,
}

impl EnrichedCartLine {
    /// Join an entry with the product it references.
    #[must_use]
    pub fn new(entry: &CartEntry, product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
            quantity: entry.quantity,
            image: product.image,
            category: product.category,
        }
    }
}
