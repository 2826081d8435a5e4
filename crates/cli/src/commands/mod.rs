//! CLI subcommands.

pub mod migrate;
pub mod seed;
pub mod token;

use thiserror::Error;

use cloudmart_api::config::ConfigError;
use cloudmart_api::db::RepositoryError;
use cloudmart_api::services::token::TokenError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The command needs a store but none is configured.
    #[error("no document store configured (set CLOUDMART_DATABASE_URL or CLOUDMART_STORE)")]
    NoStore,

    /// The command only works against `PostgreSQL`.
    #[error("{0} requires the postgres store backend")]
    PostgresOnly(&'static str),

    /// Store operation failed.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Token could not be issued.
    #[error("token error: {0}")]
    Token(#[from] TokenError),
}
