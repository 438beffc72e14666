//! Storage backend abstraction for the document store.
//!
//! The [`StoreBackend`] trait is the save/find/update/delete contract every
//! storage variant implements, so the in-memory store and a real database can be
//! swapped at startup without touching callers.
//!
//! # Traits
//!
//! - [`StoreBackend`]: The core trait for storage backends
//! - [`DynStoreBackend`]: Object-safe twin used for runtime backend selection
//! - [`StoreBackendBuilder`]: Factory trait for creating backend instances
//!
//! # Examples
//!
//! ```ignore
//! use larder::backend::StoreBackend;
//! use bson::doc;
//!
//! let key = backend.insert("products", doc! { "name": "Milk", "price": 2.5 }).await?;
//! let record = backend.get_by_id("products", &key).await?;
//! assert_eq!(record.unwrap().get_str("id")?, key);
//! ```

use async_trait::async_trait;
use bson::Bson;
use std::{any::Any, fmt::Debug};

use crate::{error::DocumentStoreResult, record::Record};

/// Abstract interface for document storage backends.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` and tolerate concurrent calls from many
/// tasks. Scans and lookups must never observe a partially written record.
///
/// # Errors
///
/// Every method that takes a collection name returns
/// [`DocumentStoreError::UnknownCollection`](crate::error::DocumentStoreError::UnknownCollection)
/// when the name is outside the backend's configured set. A missing key is not
/// an error.
#[async_trait]
pub trait StoreBackend: Send + Sync + Debug {
    /// Stores `record` under a freshly generated key and returns that key.
    ///
    /// The record's `id` field is set to the key.
    async fn insert(&self, collection: &str, record: Record) -> DocumentStoreResult<String>;

    /// Stores `record` under `key`, replacing any record already there.
    ///
    /// The record's `id` field is set to `key` even if the caller supplied another value.
    async fn insert_with_key(
        &self,
        collection: &str,
        key: &str,
        record: Record,
    ) -> DocumentStoreResult<String>;

    /// Returns a copy of the record stored under `key`, or `None`.
    async fn get_by_id(&self, collection: &str, key: &str) -> DocumentStoreResult<Option<Record>>;

    /// Returns a snapshot of every record in the collection, in no particular order.
    async fn get_all(&self, collection: &str) -> DocumentStoreResult<Vec<Record>>;

    /// Returns every record whose `field` equals `value`.
    ///
    /// Records without the field never match. Integers compare exactly, whatever
    /// their width. An integer and a double are deliberately treated as equal when
    /// the double is integral and converts back to the same integer, so values
    /// that went through JSON (`2` vs `2.0`) still find each other. `NaN` matches
    /// `NaN`.
    async fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Bson,
    ) -> DocumentStoreResult<Vec<Record>>;

    /// Removes the record stored under `key`.
    ///
    /// Returns `true` if a record was removed and `false` if the key was absent.
    async fn delete(&self, collection: &str, key: &str) -> DocumentStoreResult<bool>;

    /// Shallow-merges `partial` into the record stored under `key`.
    ///
    /// Fields in `partial` overwrite or extend the record, other fields are kept,
    /// and `id` is re-stamped to `key`. Absent keys are left alone and `false` is
    /// returned; nothing is created.
    async fn update(&self, collection: &str, key: &str, partial: Record) -> DocumentStoreResult<bool>;

    /// Returns the number of records currently in the collection.
    async fn count(&self, collection: &str) -> DocumentStoreResult<usize>;

    /// Lists the names of the collections this backend was configured with.
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;

    /// Cleanly shuts down the backend, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> DocumentStoreResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<B> StoreBackend for &B
where
    B: StoreBackend,
{
    async fn insert(&self, collection: &str, record: Record) -> DocumentStoreResult<String> {
        (*self).insert(collection, record).await
    }

    async fn insert_with_key(
        &self,
        collection: &str,
        key: &str,
        record: Record,
    ) -> DocumentStoreResult<String> {
        (*self)
            .insert_with_key(collection, key, record)
            .await
    }

    async fn get_by_id(&self, collection: &str, key: &str) -> DocumentStoreResult<Option<Record>> {
        (*self).get_by_id(collection, key).await
    }

    async fn get_all(&self, collection: &str) -> DocumentStoreResult<Vec<Record>> {
        (*self).get_all(collection).await
    }

    async fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Bson,
    ) -> DocumentStoreResult<Vec<Record>> {
        (*self)
            .get_by_field(collection, field, value)
            .await
    }

    async fn delete(&self, collection: &str, key: &str) -> DocumentStoreResult<bool> {
        (*self).delete(collection, key).await
    }

    async fn update(&self, collection: &str, key: &str, partial: Record) -> DocumentStoreResult<bool> {
        (*self).update(collection, key, partial).await
    }

    async fn count(&self, collection: &str) -> DocumentStoreResult<usize> {
        (*self).count(collection).await
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        (*self).list_collections().await
    }
}

/// Object-safe form of [`StoreBackend`].
///
/// Blanket-implemented for every `StoreBackend + 'static`, so a concrete backend
/// can be boxed once the configured variant is known.
#[async_trait]
pub trait DynStoreBackend: Send + Sync + Debug {
    async fn insert(&self, collection: &str, record: Record) -> DocumentStoreResult<String>;
    async fn insert_with_key(
        &self,
        collection: &str,
        key: &str,
        record: Record,
    ) -> DocumentStoreResult<String>;
    async fn get_by_id(&self, collection: &str, key: &str) -> DocumentStoreResult<Option<Record>>;
    async fn get_all(&self, collection: &str) -> DocumentStoreResult<Vec<Record>>;
    async fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Bson,
    ) -> DocumentStoreResult<Vec<Record>>;
    async fn delete(&self, collection: &str, key: &str) -> DocumentStoreResult<bool>;
    async fn update(&self, collection: &str, key: &str, partial: Record) -> DocumentStoreResult<bool>;
    async fn count(&self, collection: &str) -> DocumentStoreResult<usize>;
    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>>;
    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()>;

    fn as_any(&self) -> &dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

#[async_trait]
impl<B: StoreBackend + 'static> DynStoreBackend for B {
    async fn insert(&self, collection: &str, record: Record) -> DocumentStoreResult<String> {
        StoreBackend::insert(self, collection, record).await
    }

    async fn insert_with_key(
        &self,
        collection: &str,
        key: &str,
        record: Record,
    ) -> DocumentStoreResult<String> {
        StoreBackend::insert_with_key(self, collection, key, record).await
    }

    async fn get_by_id(&self, collection: &str, key: &str) -> DocumentStoreResult<Option<Record>> {
        StoreBackend::get_by_id(self, collection, key).await
    }

    async fn get_all(&self, collection: &str) -> DocumentStoreResult<Vec<Record>> {
        StoreBackend::get_all(self, collection).await
    }

    async fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Bson,
    ) -> DocumentStoreResult<Vec<Record>> {
        StoreBackend::get_by_field(self, collection, field, value).await
    }

    async fn delete(&self, collection: &str, key: &str) -> DocumentStoreResult<bool> {
        StoreBackend::delete(self, collection, key).await
    }

    async fn update(&self, collection: &str, key: &str, partial: Record) -> DocumentStoreResult<bool> {
        StoreBackend::update(self, collection, key, partial).await
    }

    async fn count(&self, collection: &str) -> DocumentStoreResult<usize> {
        StoreBackend::count(self, collection).await
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        StoreBackend::list_collections(self).await
    }

    async fn shutdown_boxed(self: Box<Self>) -> DocumentStoreResult<()> {
        StoreBackend::shutdown(*self).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A boxed backend is itself a backend, which lets [`DocumentStore`](crate::store::DocumentStore)
/// serve statically and dynamically selected variants through one type.
#[async_trait]
impl StoreBackend for Box<dyn DynStoreBackend> {
    async fn insert(&self, collection: &str, record: Record) -> DocumentStoreResult<String> {
        (**self).insert(collection, record).await
    }

    async fn insert_with_key(
        &self,
        collection: &str,
        key: &str,
        record: Record,
    ) -> DocumentStoreResult<String> {
        (**self)
            .insert_with_key(collection, key, record)
            .await
    }

    async fn get_by_id(&self, collection: &str, key: &str) -> DocumentStoreResult<Option<Record>> {
        (**self).get_by_id(collection, key).await
    }

    async fn get_all(&self, collection: &str) -> DocumentStoreResult<Vec<Record>> {
        (**self).get_all(collection).await
    }

    async fn get_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Bson,
    ) -> DocumentStoreResult<Vec<Record>> {
        (**self)
            .get_by_field(collection, field, value)
            .await
    }

    async fn delete(&self, collection: &str, key: &str) -> DocumentStoreResult<bool> {
        (**self).delete(collection, key).await
    }

    async fn update(&self, collection: &str, key: &str, partial: Record) -> DocumentStoreResult<bool> {
        (**self).update(collection, key, partial).await
    }

    async fn count(&self, collection: &str) -> DocumentStoreResult<usize> {
        (**self).count(collection).await
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        (**self).list_collections().await
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        <dyn DynStoreBackend as DynStoreBackend>::shutdown_boxed(self).await
    }
}

#[async_trait]
pub trait StoreBackendBuilder {
    type Backend: StoreBackend;

    async fn build(self) -> DocumentStoreResult<Self::Backend>;
}
