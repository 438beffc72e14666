//! MongoDB backend implementation for larder.
//!
//! This crate provides the persistent variant of the `StoreBackend` trait, the
//! real database the in-memory store stands in for. It honours the same
//! contract: generated UUID keys mirrored into `id`, shallow-merge updates,
//! exact-field scans and a fixed collection set.
//!
//! To use this backend, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! larder = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use larder::{backend::StoreBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "grocery")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as larder_mongodb;

pub mod store;
pub(crate) mod escape;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
