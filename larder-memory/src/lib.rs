//! In-memory document storage backend for larder.
//!
//! This crate provides the process-local implementation of the `StoreBackend`
//! trait. It stands in for a managed document database during development,
//! demos and tests.
//!
//! # Features
//!
//! - **Fixed collection set** - Collections are declared up front; any other name is an error
//! - **Per-collection locking** - One async-aware RwLock per collection, never more than one held
//! - **Generated keys** - Random UUID keys, mirrored into each record's `id` field
//! - **Field scans** - Exact equality on a single field, numbers compared by value
//!
//! # Quick Start
//!
//! ```ignore
//! use larder::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = DocumentStore::new(InMemoryStore::builder().build().await?);
//!     let products = store.collection("products");
//!
//!     let key = products.insert(doc! { "name": "Milk", "price": 2.5 }).await?;
//!     assert!(products.get_by_id(&key).await?.is_some());
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as larder_memory;

pub mod store;
pub(crate) mod evaluator;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
