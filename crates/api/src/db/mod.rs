//! Document store access.
//!
//! # Collections
//!
//! The store keeps three schema-flexible collections of JSON documents. Every
//! document carries a string `id`; each collection also names the field that
//! acts as its partition key.
//!
//! - `products` - Catalog, partitioned by `id`
//! - `cart` - Cart entries, partitioned by `user_id`
//! - `orders` - Orders, partitioned by `user_id`
//!
//! # Backends
//!
//! - [`memory::InMemoryStore`] - process-local, for development and tests
//! - [`postgres::PostgresStore`] - `PostgreSQL` JSONB table, migrations run via:
//!
//! ```bash
//! cargo run -p cloudmart-cli -- migrate
//! ```
//!
//! Typed access goes through the repositories ([`ProductRepository`],
//! [`CartRepository`], [`OrderRepository`]), which encode and decode documents.

pub mod cart;
pub mod memory;
pub mod orders;
pub mod postgres;
pub mod products;
pub mod seed;

pub use cart::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::StoreBackend;

/// A stored JSON document. Always an object with a string `id` field.
pub type Document = Map<String, Value>;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// A document with the same identity already exists.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, RepositoryError>;

/// The logical collections kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Cart,
    Orders,
}

impl Collection {
    /// Collection name as stored.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Cart => "cart",
            Self::Orders => "orders",
        }
    }

    /// Field whose value partitions the collection.
    #[must_use]
    pub const fn partition_field(self) -> &'static str {
        match self {
            Self::Products => "id",
            Self::Cart | Self::Orders => "user_id",
        }
    }

    /// Extract `(id, partition key)` from a document of this collection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if either field is missing
    /// or not a string.
    pub fn identity_of(self, doc: &Document) -> StoreResult<(String, String)> {
        let id = string_field(doc, "id").ok_or_else(|| {
            RepositoryError::DataCorruption(format!("{} document without string id", self.name()))
        })?;
        let partition = string_field(doc, self.partition_field()).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "{} document {id} without partition field '{}'",
                self.name(),
                self.partition_field()
            ))
        })?;
        Ok((id.to_owned(), partition.to_owned()))
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Equality filter over one or more top-level document fields.
///
/// A document matches when every clause's field equals the clause's value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    /// Empty filter (matches everything).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Add an equality clause.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push((field.into(), value.into()));
        self
    }

    /// Clauses in insertion order.
    #[must_use]
    pub fn clauses(&self) -> &[(String, Value)] {
        &self.clauses
    }

    /// Check whether a document satisfies every clause.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, value)| doc.get(field) == Some(value))
    }

    /// The filter as a JSON object (used for JSONB containment).
    #[must_use]
    pub fn to_object(&self) -> Value {
        Value::Object(self.clauses.iter().cloned().collect())
    }
}

/// A document database with named collections.
///
/// Implementations must be safe to share across request handlers; every
/// method is a single round trip with no cross-call atomicity.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in a collection, in store order.
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>>;

    /// Documents matching an equality filter.
    async fn list_where(&self, collection: Collection, filter: &Filter)
    -> StoreResult<Vec<Document>>;

    /// Documents where any of `fields` is a string containing `needle`
    /// (case-sensitive). An empty needle matches every document with a
    /// string value in one of the fields.
    async fn search(
        &self,
        collection: Collection,
        fields: &[&str],
        needle: &str,
    ) -> StoreResult<Vec<Document>>;

    /// Distinct string values of `field` across the collection.
    async fn distinct(&self, collection: Collection, field: &str) -> StoreResult<Vec<String>>;

    /// Insert a document unless one with the same `id` exists.
    ///
    /// Returns `true` if the document was inserted.
    async fn create_if_absent(&self, collection: Collection, doc: Document) -> StoreResult<bool>;

    /// Insert a document, or replace the one with the same `id`.
    async fn upsert(&self, collection: Collection, doc: Document) -> StoreResult<()>;

    /// Delete a document by `id` within a partition.
    ///
    /// Returns `true` if a document was deleted.
    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<bool>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> StoreResult<()>;

    /// Short backend name (e.g. `postgres`).
    fn backend_name(&self) -> &'static str;
}

/// Open the configured store backend.
///
/// Returns `None` when no store is configured. The `PostgreSQL` pool connects
/// lazily, so this succeeds even if the database is down.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the connection URL is invalid.
pub fn open_store(backend: &StoreBackend) -> StoreResult<Option<Arc<dyn DocumentStore>>> {
    let store: Arc<dyn DocumentStore> = match backend {
        StoreBackend::None => return Ok(None),
        StoreBackend::Memory => Arc::new(memory::InMemoryStore::new()),
        StoreBackend::Postgres { database_url } => {
            Arc::new(postgres::PostgresStore::connect_lazy(database_url)?)
        }
    };
    Ok(Some(store))
}

/// Get a top-level string field from a document.
fn string_field<'a>(doc: &'a Document, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

/// Encode a typed value as a document.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the value does not serialize
/// to a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<Document> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RepositoryError::DataCorruption(format!(
            "expected a JSON object, got {other}"
        ))),
        Err(e) => Err(RepositoryError::DataCorruption(format!(
            "failed to serialize document: {e}"
        ))),
    }
}

/// Decode a document into a typed value.
///
/// # Errors
///
/// Returns `RepositoryError::DataCorruption` if the document does not match
/// the expected shape.
pub fn from_document<T: DeserializeOwned>(
    collection: Collection,
    doc: Document,
) -> StoreResult<T> {
    let id = string_field(&doc, "id").unwrap_or("<no id>").to_owned();
    serde_json::from_value(Value::Object(doc)).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid {collection} document {id}: {e}"))
    })
}
