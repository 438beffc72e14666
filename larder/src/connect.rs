//! Startup wiring: turns a [`StoreConfig`] into a ready store.

use tracing::info;

use larder_core::{
    backend::StoreBackendBuilder,
    config::{BackendConfig, StoreConfig},
    error::DocumentStoreResult,
    store::{DocumentStore, DynDocumentStore},
};
use larder_memory::InMemoryStore;

/// Validates `config` and builds the backend it selects.
///
/// The returned store is meant to be created once at startup and handed to the
/// request layer.
///
/// # Errors
///
/// Returns a `Configuration` error for an invalid collection set or for a
/// backend that was not compiled in, and whatever the backend builder reports.
pub async fn connect(config: &StoreConfig) -> DocumentStoreResult<DynDocumentStore> {
    config.validate()?;

    match &config.backend {
        BackendConfig::Memory => {
            info!("selected in-memory backend");
            let backend = InMemoryStore::builder()
                .collections(config.collections.iter().cloned())
                .build()
                .await?;

            Ok(DocumentStore::new(backend).into_dyn())
        },
        BackendConfig::Mongodb { dsn, database } => connect_mongodb(dsn, database, &config.collections).await,
    }
}

#[cfg(feature = "mongodb")]
async fn connect_mongodb(dsn: &str, database: &str, collections: &[String]) -> DocumentStoreResult<DynDocumentStore> {
    info!(database, "selected mongodb backend");
    let backend = larder_mongodb::MongoDbStore::builder(dsn, database)
        .collections(collections.iter().cloned())
        .build()
        .await?;

    Ok(DocumentStore::new(backend).into_dyn())
}

#[cfg(not(feature = "mongodb"))]
async fn connect_mongodb(_dsn: &str, _database: &str, _collections: &[String]) -> DocumentStoreResult<DynDocumentStore> {
    Err(larder_core::error::DocumentStoreError::Configuration(
        "the mongodb backend requires the `mongodb` feature".into(),
    ))
}
