//! In-memory storage implementation.
//!
//! Each collection is a `HashMap` of key to [`Record`] behind its own async-aware
//! read-write lock. The set of collections is fixed when the store is built.

use std::{collections::HashMap, sync::Arc};
use async_trait::async_trait;
use mea::rwlock::RwLock;
use bson::Bson;
use tracing::{debug, info, trace, warn};

use larder_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    config::{default_collections, validate_collections},
    error::{DocumentStoreError, DocumentStoreResult},
    record::{self, Record},
};

use crate::evaluator::FieldMatcher;

type CollectionMap = HashMap<String, Record>;
type StoreMap = HashMap<String, RwLock<CollectionMap>>;


/// Thread-safe in-memory document storage backend.
///
/// # Thread Safety
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same data. Every operation takes exactly one collection
/// lock: writes hold it while replacing or merging a record, reads hold it
/// while cloning results out.
///
/// # Performance
///
/// Field lookups scan every record in the collection (no indexing).
///
/// # Example
///
/// ```ignore
/// use larder_memory::InMemoryStore;
/// use larder::backend::{StoreBackend, StoreBackendBuilder};
/// use bson::doc;
///
/// let store = InMemoryStore::builder().build().await?;
/// let key = store.insert("products", doc! { "name": "Milk", "price": 2.5 }).await?;
/// let found = store.get_by_id("products", &key).await?;
/// assert!(found.is_some());
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryStore {
    /// collection_name -> (key -> record)
    collections: Arc<StoreMap>,
}

impl InMemoryStore {
    /// Creates a store holding exactly the given collections, all empty.
    pub fn new<I, S>(collections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            collections: Arc::new(
                collections
                    .into_iter()
                    .map(|name| (name.into(), RwLock::new(CollectionMap::new())))
                    .collect(),
            ),
        }
    }

    /// Creates a builder preloaded with the default grocery collections.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }

    fn collection(&self, name: &str) -> DocumentStoreResult<&RwLock<CollectionMap>> {
        self.collections.get(name).ok_or_else(|| {
            warn!(collection = name, "access to unknown collection");
            DocumentStoreError::UnknownCollection(name.to_string())
        })
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(default_collections())
    }
}


#[async_trait]
impl StoreBackend for InMemoryStore {
    async fn insert(&self, collection: &str, mut record: Record) -> DocumentStoreResult<String> {
        let records = self.collection(collection)?;
        let key = record::new_key();
        record::stamp_id(&mut record, &key);
        debug_assert_eq!(record::record_key(&record), Some(key.as_str()));

        records.write().await.insert(key.clone(), record);
        debug!(collection, key = %key, "record inserted");

        Ok(key)
    }

    async fn insert_with_key(&self, collection: &str, key: &str, mut record: Record) -> DocumentStoreResult<String> {
        let records = self.collection(collection)?;
        record::stamp_id(&mut record, key);
        debug_assert_eq!(record::record_key(&record), Some(key));

        let replaced = records
            .write()
            .await
            .insert(key.to_string(), record)
            .is_some();
        debug!(collection, key, replaced, "record stored under caller key");

        Ok(key.to_string())
    }

    async fn get_by_id(&self, collection: &str, key: &str) -> DocumentStoreResult<Option<Record>> {
        Ok(
            self.collection(collection)?
                .read()
                .await
                .get(key)
                .cloned()
        )
    }

    async fn get_all(&self, collection: &str) -> DocumentStoreResult<Vec<Record>> {
        let records = self.collection(collection)?
            .read()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        trace!(collection, count = records.len(), "collection scanned");

        Ok(records)
    }

    async fn get_by_field(&self, collection: &str, field: &str, value: &Bson) -> DocumentStoreResult<Vec<Record>> {
        let matched = FieldMatcher::new(field, value)
            .filter_records(self.collection(collection)?.read().await.values());
        trace!(collection, field, count = matched.len(), "field scan finished");

        Ok(matched)
    }

    async fn delete(&self, collection: &str, key: &str) -> DocumentStoreResult<bool> {
        let removed = self.collection(collection)?
            .write()
            .await
            .remove(key)
            .is_some();
        debug!(collection, key, removed, "record delete");

        Ok(removed)
    }

    async fn update(&self, collection: &str, key: &str, partial: Record) -> DocumentStoreResult<bool> {
        let records = self.collection(collection)?;
        let mut guard = records.write().await;

        match guard.get_mut(key) {
            Some(existing) => {
                record::merge(existing, partial, key);
                debug_assert_eq!(record::record_key(existing), Some(key));
                debug!(collection, key, "record merged");
                Ok(true)
            },
            None => {
                debug!(collection, key, "update skipped, no such record");
                Ok(false)
            },
        }
    }

    async fn count(&self, collection: &str) -> DocumentStoreResult<usize> {
        Ok(self.collection(collection)?.read().await.len())
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut names = self.collections
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }
}


/// Builder for constructing [`InMemoryStore`] instances.
///
/// Starts from the default collections (`users`, `categories`, `products`,
/// `orders`); [`collections`](Self::collections) replaces that set.
///
/// # Example
///
/// ```ignore
/// use larder_memory::InMemoryStore;
/// use larder::backend::StoreBackendBuilder;
///
/// let store = InMemoryStore::builder()
///     .collections(["users", "otps"])
///     .build()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStoreBuilder {
    collections: Vec<String>,
}

impl Default for InMemoryStoreBuilder {
    fn default() -> Self {
        Self { collections: default_collections() }
    }
}

impl InMemoryStoreBuilder {
    /// Replaces the collection set.
    pub fn collections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one collection to the set.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collections.push(name.into());
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    /// Builds the store; fails if the collection set is empty or has blank or duplicate names.
    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        validate_collections(&self.collections)?;

        info!(collections = ?self.collections, "in-memory store ready");
        Ok(InMemoryStore::new(self.collections))
    }
}
