//! `PostgreSQL`-backed implementation of the document store.
//!
//! # Data model
//! All collections share one table, `cloudmart.document`:
//!
//! | column | meaning |
//! |---|---|
//! | `collection` | collection name (`products`, `cart`, `orders`) |
//! | `id` | document `id`, unique per collection |
//! | `partition_key` | value of the collection's partition field |
//! | `body` | the full JSON document (`JSONB`) |
//! | `seq` | insertion sequence, used for store order |
//!
//! Equality filters use JSONB containment (`body @> $filter`), substring
//! search uses `strpos` (case-sensitive), and distinct projection uses
//! `SELECT DISTINCT body->>field`. No dynamic SQL is generated.
//!
//! # Timeouts
//! The pool's acquire timeout bounds how long a call waits for a connection,
//! so an unreachable database surfaces as an error instead of a hung request.
//!
//! # Migrations
//! Embedded from `crates/api/migrations/` and applied via the CLI
//! (`cm-cli migrate`), never implicitly at server startup.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::{Collection, Document, DocumentStore, Filter, RepositoryError, StoreResult};

/// Durable document store backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a store with a lazily connecting pool.
    ///
    /// No connection is attempted until the first query, so the server can
    /// start while the database is unreachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the connection URL is invalid.
    pub fn connect_lazy(database_url: &SecretString) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .min_connections(0)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(database_url.expose_secret())?;
        Ok(Self { pool })
    }

    /// Create a store from an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Migration` if a migration fails.
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Unwrap JSONB rows into documents.
fn into_documents(collection: Collection, rows: Vec<Json<Value>>) -> StoreResult<Vec<Document>> {
    rows.into_iter()
        .map(|Json(value)| match value {
            Value::Object(map) => Ok(map),
            other => Err(RepositoryError::DataCorruption(format!(
                "non-object document in {collection}: {other}"
            ))),
        })
        .collect()
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        let rows: Vec<Json<Value>> = sqlx::query_scalar(
            r"
            SELECT body
            FROM cloudmart.document
            WHERE collection = $1
            ORDER BY seq ASC
            ",
        )
        .bind(collection.name())
        .fetch_all(&self.pool)
        .await?;

        into_documents(collection, rows)
    }

    async fn list_where(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Vec<Document>> {
        let rows: Vec<Json<Value>> = sqlx::query_scalar(
            r"
            SELECT body
            FROM cloudmart.document
            WHERE collection = $1 AND body @> $2
            ORDER BY seq ASC
            ",
        )
        .bind(collection.name())
        .bind(Json(filter.to_object()))
        .fetch_all(&self.pool)
        .await?;

        into_documents(collection, rows)
    }

    async fn search(
        &self,
        collection: Collection,
        fields: &[&str],
        needle: &str,
    ) -> StoreResult<Vec<Document>> {
        let fields: Vec<String> = fields.iter().map(|field| (*field).to_owned()).collect();
        let rows: Vec<Json<Value>> = sqlx::query_scalar(
            r"
            SELECT body
            FROM cloudmart.document
            WHERE collection = $1
              AND EXISTS (
                  SELECT 1 FROM unnest($2::text[]) AS field
                  WHERE strpos(body->>field, $3) > 0
              )
            ORDER BY seq ASC
            ",
        )
        .bind(collection.name())
        .bind(&fields)
        .bind(needle)
        .fetch_all(&self.pool)
        .await?;

        into_documents(collection, rows)
    }

    async fn distinct(&self, collection: Collection, field: &str) -> StoreResult<Vec<String>> {
        let values: Vec<String> = sqlx::query_scalar(
            r"
            SELECT DISTINCT body->>$2
            FROM cloudmart.document
            WHERE collection = $1 AND jsonb_typeof(body->$2) = 'string'
            ",
        )
        .bind(collection.name())
        .bind(field)
        .fetch_all(&self.pool)
        .await?;

        Ok(values)
    }

    async fn create_if_absent(&self, collection: Collection, doc: Document) -> StoreResult<bool> {
        let (id, partition_key) = collection.identity_of(&doc)?;
        let result = sqlx::query(
            r"
            INSERT INTO cloudmart.document (collection, id, partition_key, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection, id) DO NOTHING
            ",
        )
        .bind(collection.name())
        .bind(&id)
        .bind(&partition_key)
        .bind(Json(Value::Object(doc)))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert(&self, collection: Collection, doc: Document) -> StoreResult<()> {
        let (id, partition_key) = collection.identity_of(&doc)?;
        sqlx::query(
            r"
            INSERT INTO cloudmart.document (collection, id, partition_key, body)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (collection, id)
            DO UPDATE SET partition_key = EXCLUDED.partition_key,
                          body = EXCLUDED.body,
                          updated_at = now()
            ",
        )
        .bind(collection.name())
        .bind(&id)
        .bind(&partition_key)
        .bind(Json(Value::Object(doc)))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM cloudmart.document
            WHERE collection = $1 AND id = $2 AND partition_key = $3
            ",
        )
        .bind(collection.name())
        .bind(id)
        .bind(partition_key)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
