//! Catalog product.

use serde::{Deserialize, Serialize};

use cloudmart_core::{Price, ProductId};

/// Placeholder shown when a product has no image token.
pub const DEFAULT_IMAGE: &str = "🛒";

/// Category reported for products stored without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// A product in the catalog.
///
/// Products are created once by the catalog seed and never modified through
/// the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub price: Price,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_image() -> String {
    DEFAULT_IMAGE.to_string()
}
