//! Main larder crate: a document store for the grocery demo services.
//!
//! The store holds a fixed set of named collections of schemaless records.
//! Each record is keyed by a generated (or caller-chosen) string key that is
//! mirrored into its `id` field. Records can be inserted, fetched by key,
//! scanned by exact field value, shallow-merged and deleted.
//!
//! # Features
//!
//! - **Swappable backends** - In-memory by default, MongoDB behind the `mongodb` feature
//! - **Configuration-driven startup** - [`connect`] builds whichever backend [`StoreConfig`](config::StoreConfig) selects
//! - **Typed or untyped access** - Raw BSON records or serde types implementing [`Document`](document::Document)
//!
//! # Quick Start
//!
//! ```ignore
//! use larder::prelude::*;
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> DocumentStoreResult<()> {
//!     let store = connect(&StoreConfig::from_env()?).await?;
//!     let products = store.collection("products");
//!
//!     let key = products.insert(doc! { "name": "Milk", "price": 2.5 }).await?;
//!     let milk = products.get_by_field("name", "Milk").await?;
//!     assert_eq!(milk[0].get_str("id").unwrap(), key);
//!
//!     products.update(&key, doc! { "price": 2.25 }).await?;
//!     assert!(products.delete(&key).await?);
//!
//!     store.shutdown().await
//! }
//! ```
//!
//! # Backends
//!
//! - [`memory`] - Process-local storage for development, demos and tests
//! - `mongodb` - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;
mod connect;

pub use connect::connect;
pub use larder_core::{collection, config, document, store, backend, record, error};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use larder_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use larder_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
