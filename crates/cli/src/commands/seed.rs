//! Seed the demo catalog.
//!
//! Uses the same routine the server runs at startup: products are only
//! inserted when the catalog is empty.

use cloudmart_api::config::ApiConfig;
use cloudmart_api::db::{open_store, seed};
use tracing::info;

use super::CommandError;

/// Seed the configured store.
///
/// # Errors
///
/// Returns `CommandError::NoStore` if no store is configured and
/// `CommandError::Repository` if the store fails.
pub async fn run() -> Result<(), CommandError> {
    let config = ApiConfig::from_env()?;
    let store = open_store(&config.store)?.ok_or(CommandError::NoStore)?;

    let report = seed::seed_catalog(store.as_ref()).await?;
    if report.skipped {
        info!("Catalog already has products, nothing to do");
    } else {
        info!(
            inserted = report.inserted,
            existing = report.existing,
            "Catalog seeded"
        );
    }

    Ok(())
}
