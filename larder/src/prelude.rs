//! Convenient re-exports of commonly used types from larder.
//!
//! ```ignore
//! use larder::prelude::*;
//! ```

pub use larder_core::{
    collection::{Collection, TypedCollection},
    store::{DocumentStore, DynDocumentStore},
    document::{Document, DocumentExt},
    backend::{StoreBackend, DynStoreBackend, StoreBackendBuilder},
    config::{StoreConfig, BackendConfig},
    record::Record,
    error::{DocumentStoreError, DocumentStoreResult},
};
pub use crate::connect::connect;
