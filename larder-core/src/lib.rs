//! Core of larder, a small document store for the grocery demo services.
//!
//! This crate provides:
//!
//! - **Records** ([`record`]) - Schemaless BSON records and the key-stamping and merge helpers
//! - **Typed documents** ([`document`]) - Serde types mapped onto records
//! - **Store backend abstraction** ([`backend`]) - The contract every storage variant implements
//! - **Collections interface** ([`collection`]) - Handles bound to one collection
//! - **Document store** ([`store`]) - Entry point handed to the request layer
//! - **Configuration** ([`config`]) - Backend selection and the fixed collection set
//! - **Error handling** ([`error`]) - Error and result types
//!
//! # Example
//!
//! ```ignore
//! use larder::{Document, DocumentStore};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! pub struct User {
//!     #[serde(default)]
//!     pub id: String,
//!     pub email: String,
//! }
//!
//! impl Document for User {
//!     fn collection_name() -> &'static str {
//!         "users"
//!     }
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as larder_core;

pub mod backend;
pub mod collection;
pub mod config;
pub mod document;
pub mod error;
pub mod record;
pub mod store;
