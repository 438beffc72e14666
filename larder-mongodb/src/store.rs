use std::collections::HashSet;
use async_trait::async_trait;
use futures::TryStreamExt;
use bson::{Bson, Document, doc};
use mongodb::{
    Client, Collection as MongoCollection,
    options::ClientOptions,
};
use tracing::{debug, info, warn};
use larder_core::{
    backend::{StoreBackend, StoreBackendBuilder},
    config::{default_collections, validate_collections},
    error::{DocumentStoreError, DocumentStoreResult},
    record::{self, Record},
};

use crate::escape::FieldEscaper;

const MONGO_ID: &str = "_id";


/// MongoDB-backed variant of the store.
///
/// Records are stored with `_id` set to their key, so the key doubles as the
/// primary key. Collection names are checked against the configured set
/// before any round trip.
#[derive(Debug)]
pub struct MongoDbStore {
    client: Client,
    database: String,
    collections: HashSet<String>,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String, collections: HashSet<String>) -> Self {
        Self { client, database, collections }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, name: &str) -> DocumentStoreResult<MongoCollection<Document>> {
        if !self.collections.contains(name) {
            warn!(collection = name, "access to unknown collection");
            return Err(DocumentStoreError::UnknownCollection(name.to_string()));
        }

        Ok(
            self.client
                .database(&self.database)
                .collection(&FieldEscaper::escape_name(name))
        )
    }

    fn prepare_record(&self, key: &str, mut record: Record) -> Document {
        record::stamp_id(&mut record, key);

        let mut prepared = FieldEscaper::escape_document(record);
        prepared.insert(MONGO_ID, key);
        prepared
    }

    fn restore_record(&self, mut document: Document) -> Record {
        document.remove(MONGO_ID);
        FieldEscaper::restore_document(document)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

fn backend_error(err: mongodb::error::Error) -> DocumentStoreError {
    DocumentStoreError::Backend(err.to_string())
}

#[async_trait]
impl StoreBackend for MongoDbStore {
    async fn insert(&self, collection: &str, record: Record) -> DocumentStoreResult<String> {
        let key = record::new_key();

        self.get_collection(collection)?
            .insert_one(self.prepare_record(&key, record))
            .await
            .map_err(backend_error)?;
        debug!(collection, key = %key, "record inserted");

        Ok(key)
    }

    async fn insert_with_key(&self, collection: &str, key: &str, record: Record) -> DocumentStoreResult<String> {
        self.get_collection(collection)?
            .replace_one(doc! { MONGO_ID: key }, self.prepare_record(key, record))
            .upsert(true)
            .await
            .map_err(backend_error)?;
        debug!(collection, key, "record stored under caller key");

        Ok(key.to_string())
    }

    async fn get_by_id(&self, collection: &str, key: &str) -> DocumentStoreResult<Option<Record>> {
        Ok(
            self.get_collection(collection)?
                .find_one(doc! { MONGO_ID: key })
                .await
                .map_err(backend_error)?
                .map(|document| self.restore_record(document))
        )
    }

    async fn get_all(&self, collection: &str) -> DocumentStoreResult<Vec<Record>> {
        Ok(
            self.get_collection(collection)?
                .find(doc! {})
                .await
                .map_err(backend_error)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(backend_error)?
                .into_iter()
                .map(|document| self.restore_record(document))
                .collect()
        )
    }

    async fn get_by_field(&self, collection: &str, field: &str, value: &Bson) -> DocumentStoreResult<Vec<Record>> {
        let field = FieldEscaper::escape_name(field);
        let value = FieldEscaper::escape_value(value.clone());
        // `$exists` keeps a null lookup from matching records that lack the field
        let filter = doc! {
            field: { "$eq": value, "$exists": true },
        };

        Ok(
            self.get_collection(collection)?
                .find(filter)
                .await
                .map_err(backend_error)?
                .try_collect::<Vec<Document>>()
                .await
                .map_err(backend_error)?
                .into_iter()
                .map(|document| self.restore_record(document))
                .collect()
        )
    }

    async fn delete(&self, collection: &str, key: &str) -> DocumentStoreResult<bool> {
        let result = self.get_collection(collection)?
            .delete_one(doc! { MONGO_ID: key })
            .await
            .map_err(backend_error)?;
        debug!(collection, key, removed = result.deleted_count > 0, "record delete");

        Ok(result.deleted_count > 0)
    }

    async fn update(&self, collection: &str, key: &str, partial: Record) -> DocumentStoreResult<bool> {
        let mut changes = FieldEscaper::escape_document(partial);
        changes.remove(MONGO_ID);
        changes.insert(record::ID_FIELD, key);

        let result = self.get_collection(collection)?
            .update_one(doc! { MONGO_ID: key }, doc! { "$set": changes })
            .await
            .map_err(backend_error)?;
        debug!(collection, key, matched = result.matched_count, "record merge");

        Ok(result.matched_count > 0)
    }

    async fn count(&self, collection: &str) -> DocumentStoreResult<usize> {
        Ok(
            self.get_collection(collection)?
                .count_documents(doc! {})
                .await
                .map_err(backend_error)? as usize
        )
    }

    async fn list_collections(&self) -> DocumentStoreResult<Vec<String>> {
        let mut names = self.collections
            .iter()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    async fn shutdown(self) -> DocumentStoreResult<()> {
        self.shutdown().await
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
    collections: Vec<String>,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            collections: default_collections(),
        }
    }

    /// Replaces the collection set (defaults to the grocery collections).
    pub fn collections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.collections = names.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl StoreBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> DocumentStoreResult<Self::Backend> {
        validate_collections(&self.collections)?;

        let client = Client::with_options(
            ClientOptions::parse(&self.dsn)
                .await
                .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?,
        )
        .map_err(|e| DocumentStoreError::Initialization(e.to_string()))?;

        info!(database = %self.database, collections = ?self.collections, "mongodb store ready");
        Ok(MongoDbStore::new(client, self.database, self.collections.into_iter().collect()))
    }
}
