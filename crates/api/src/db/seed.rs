//! Demo catalog seeding.
//!
//! Runs at startup and from `cm-cli seed`. Seeding only happens when the
//! product collection is empty; products that already exist are left alone.

use cloudmart_core::{Price, ProductId};
use tracing::{info, instrument};

use super::{DocumentStore, ProductRepository, RepositoryError};
use crate::models::Product;

/// `(id, name, description, category, price in cents, stock, image)`
type SeedRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u32,
    u32,
    &'static str,
);

const DEMO_CATALOG: [SeedRow; 8] = [
    (
        "1",
        "Wireless Headphones Pro",
        "Premium noise-cancelling wireless headphones with 30hr battery",
        "Electronics",
        19_999,
        50,
        "🎧",
    ),
    (
        "2",
        "Smart Watch Elite",
        "Advanced fitness tracking smartwatch with GPS",
        "Electronics",
        29_999,
        30,
        "⌚",
    ),
    (
        "3",
        "Running Shoes X1",
        "Lightweight breathable running shoes",
        "Sports",
        8_999,
        100,
        "👟",
    ),
    (
        "4",
        "Laptop Backpack Pro",
        "Water-resistant 15.6 inch laptop backpack",
        "Accessories",
        4_999,
        75,
        "🎒",
    ),
    (
        "5",
        "Coffee Maker Deluxe",
        "12-cup programmable coffee maker",
        "Home",
        7_999,
        40,
        "☕",
    ),
    (
        "6",
        "Yoga Mat Premium",
        "Extra thick eco-friendly yoga mat",
        "Sports",
        3_599,
        60,
        "🧘",
    ),
    (
        "7",
        "Bluetooth Speaker",
        "Portable waterproof bluetooth speaker",
        "Electronics",
        5_999,
        45,
        "🔊",
    ),
    (
        "8",
        "Desk Lamp LED",
        "Adjustable LED desk lamp with USB port",
        "Home",
        2_999,
        80,
        "💡",
    ),
];

/// The fixed demo catalog.
#[must_use]
pub fn demo_catalog() -> Vec<Product> {
    DEMO_CATALOG
        .iter()
        .map(
            |&(id, name, description, category, cents, stock, image)| Product {
                id: ProductId::new(id),
                name: name.to_string(),
                description: description.to_string(),
                category: category.to_string(),
                price: Price::from_cents(cents),
                stock,
                image: image.to_string(),
            },
        )
        .collect()
}

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Products inserted by this run.
    pub inserted: usize,
    /// Products that already existed.
    pub existing: usize,
    /// Seeding was skipped because the catalog was not empty.
    pub skipped: bool,
}

/// Seed the demo catalog if the product collection is empty.
///
/// # Errors
///
/// Returns `RepositoryError` if the store fails. Callers at startup log this
/// and carry on.
#[instrument(skip(store), fields(backend = store.backend_name()))]
pub async fn seed_catalog(store: &dyn DocumentStore) -> Result<SeedReport, RepositoryError> {
    let repo = ProductRepository::new(store);

    if !repo.is_empty().await? {
        info!("Catalog already populated, skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    let mut report = SeedReport::default();
    for product in demo_catalog() {
        if repo.create_if_absent(&product).await? {
            report.inserted += 1;
        } else {
            report.existing += 1;
        }
    }

    info!(
        inserted = report.inserted,
        existing = report.existing,
        "Seeded demo catalog"
    );
    Ok(report)
}
