//! In-memory implementation of the document store.
//!
//! # Purpose
//! Implements [`DocumentStore`] with per-collection vectors guarded by a
//! `tokio::sync::RwLock`. It exists for local development (`CLOUDMART_STORE=memory`)
//! and tests; nothing survives a restart.
//!
//! Documents are kept in insertion order, so `list_all` returns the oldest
//! document first. Replacing a document keeps its original position.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Collection, Document, DocumentStore, Filter, StoreResult};

/// In-memory document store.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, Vec::len)
    }
}

/// Position of the document with `id` in a collection.
fn position_of(docs: &[Document], id: &str) -> Option<usize> {
    docs.iter()
        .position(|doc| doc.get("id").and_then(Value::as_str) == Some(id))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list_all(&self, collection: Collection) -> StoreResult<Vec<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_where(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().filter(|doc| filter.matches(doc)).cloned().collect())
            .unwrap_or_default())
    }

    async fn search(
        &self,
        collection: Collection,
        fields: &[&str],
        needle: &str,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| {
                        fields.iter().any(|field| {
                            doc.get(*field)
                                .and_then(Value::as_str)
                                .is_some_and(|value| value.contains(needle))
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn distinct(&self, collection: Collection, field: &str) -> StoreResult<Vec<String>> {
        let collections = self.collections.read().await;
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for doc in collections.get(&collection).into_iter().flatten() {
            if let Some(value) = doc.get(field).and_then(Value::as_str)
                && seen.insert(value)
            {
                values.push(value.to_owned());
            }
        }
        Ok(values)
    }

    async fn create_if_absent(&self, collection: Collection, doc: Document) -> StoreResult<bool> {
        let (id, _) = collection.identity_of(&doc)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if position_of(docs, &id).is_some() {
            return Ok(false);
        }
        docs.push(doc);
        Ok(true)
    }

    async fn upsert(&self, collection: Collection, doc: Document) -> StoreResult<()> {
        let (id, _) = collection.identity_of(&doc)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        match position_of(docs, &id) {
            Some(index) => {
                if let Some(slot) = docs.get_mut(index) {
                    *slot = doc;
                }
            }
            None => docs.push(doc),
        }
        Ok(())
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &str,
        partition_key: &str,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        let partition_field = collection.partition_field();
        let before = docs.len();
        docs.retain(|doc| {
            let same_id = doc.get("id").and_then(Value::as_str) == Some(id);
            let same_partition =
                doc.get(partition_field).and_then(Value::as_str) == Some(partition_key);
            !(same_id && same_partition)
        });
        Ok(docs.len() < before)
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
