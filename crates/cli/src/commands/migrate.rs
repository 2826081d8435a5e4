//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! cm-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CLOUDMART_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string
//!
//! Migrations live in `crates/api/migrations/` and are embedded in the binary.

use cloudmart_api::config::{ApiConfig, StoreBackend};
use cloudmart_api::db::postgres::PostgresStore;

use super::CommandError;

/// Apply the document store migrations.
///
/// # Errors
///
/// Returns `CommandError::PostgresOnly` unless the postgres backend is
/// configured, and `CommandError::Repository` if a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let config = ApiConfig::from_env()?;

    let StoreBackend::Postgres { database_url } = &config.store else {
        return Err(CommandError::PostgresOnly("migrate"));
    };

    tracing::info!("Running migrations...");
    PostgresStore::connect_lazy(database_url)?.migrate().await?;
    tracing::info!("Migrations complete!");

    Ok(())
}
