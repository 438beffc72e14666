//! Collection handles bound to a storage backend.
//!
//! - [`Collection`] - Untyped handle working on raw [`Record`]s
//! - [`TypedCollection`] - Handle for a specific [`Document`] type
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//!
//! let products = store.collection("products");
//! let key = products.insert(doc! { "name": "Milk", "price": 2.5 }).await?;
//! let milk = products.get_by_field("name", "Milk").await?;
//! assert_eq!(milk.len(), 1);
//! ```

use bson::Bson;
use std::marker::PhantomData;

use crate::{
    backend::StoreBackend,
    document::{Document, DocumentExt},
    error::DocumentStoreResult,
    record::Record,
};

/// An untyped collection with a reference to a storage backend.
#[derive(Debug)]
pub struct Collection<'a, B: StoreBackend> {
    name: String,
    backend: &'a B,
}

impl<'a, B: StoreBackend> Collection<'a, B> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { name, backend }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inserts a record under a generated key and returns the key.
    pub async fn insert(&self, record: Record) -> DocumentStoreResult<String> {
        self.backend.insert(&self.name, record).await
    }

    /// Inserts or replaces the record stored under `key`.
    pub async fn insert_with_key(&self, key: &str, record: Record) -> DocumentStoreResult<String> {
        self.backend
            .insert_with_key(&self.name, key, record)
            .await
    }

    /// Returns a copy of the record stored under `key`.
    pub async fn get_by_id(&self, key: &str) -> DocumentStoreResult<Option<Record>> {
        self.backend.get_by_id(&self.name, key).await
    }

    /// Returns a snapshot of all records.
    pub async fn get_all(&self) -> DocumentStoreResult<Vec<Record>> {
        self.backend.get_all(&self.name).await
    }

    /// Returns every record whose `field` equals `value`.
    pub async fn get_by_field(&self, field: &str, value: impl Into<Bson>) -> DocumentStoreResult<Vec<Record>> {
        self.backend
            .get_by_field(&self.name, field, &value.into())
            .await
    }

    /// Removes the record stored under `key`, returning whether one existed.
    pub async fn delete(&self, key: &str) -> DocumentStoreResult<bool> {
        self.backend.delete(&self.name, key).await
    }

    /// Shallow-merges `partial` into the record stored under `key`.
    ///
    /// Returns `false` without creating anything when the key is absent.
    pub async fn update(&self, key: &str, partial: Record) -> DocumentStoreResult<bool> {
        self.backend
            .update(&self.name, key, partial)
            .await
    }

    /// Returns the number of records in the collection.
    pub async fn count(&self) -> DocumentStoreResult<usize> {
        self.backend.count(&self.name).await
    }
}

/// A collection handle that converts records to and from `D`.
#[derive(Debug)]
pub struct TypedCollection<'a, B: StoreBackend, D: Document> {
    inner: Collection<'a, B>,
    _marker: PhantomData<D>,
}

impl<'a, B: StoreBackend, D: Document> TypedCollection<'a, B, D> {
    pub(crate) fn new(name: String, backend: &'a B) -> Self {
        Self { inner: Collection::new(name, backend), _marker: PhantomData }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Inserts a document under a generated key and returns the key.
    pub async fn insert(&self, document: &D) -> DocumentStoreResult<String> {
        self.inner.insert(document.to_record()?).await
    }

    /// Inserts or replaces the document stored under `key`.
    pub async fn insert_with_key(&self, key: &str, document: &D) -> DocumentStoreResult<String> {
        self.inner
            .insert_with_key(key, document.to_record()?)
            .await
    }

    pub async fn get_by_id(&self, key: &str) -> DocumentStoreResult<Option<D>> {
        self.inner
            .get_by_id(key)
            .await?
            .map(D::from_record)
            .transpose()
    }

    pub async fn get_all(&self) -> DocumentStoreResult<Vec<D>> {
        self.inner
            .get_all()
            .await?
            .into_iter()
            .map(D::from_record)
            .collect()
    }

    pub async fn get_by_field(&self, field: &str, value: impl Into<Bson>) -> DocumentStoreResult<Vec<D>> {
        self.inner
            .get_by_field(field, value)
            .await?
            .into_iter()
            .map(D::from_record)
            .collect()
    }

    pub async fn delete(&self, key: &str) -> DocumentStoreResult<bool> {
        self.inner.delete(key).await
    }

    /// Shallow-merges a partial record; see [`Collection::update`].
    pub async fn update(&self, key: &str, partial: Record) -> DocumentStoreResult<bool> {
        self.inner.update(key, partial).await
    }

    pub async fn count(&self) -> DocumentStoreResult<usize> {
        self.inner.count().await
    }
}
