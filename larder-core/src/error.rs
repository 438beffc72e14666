//! Error types and result types for document store operations.
//!
//! Missing records are not errors: lookups return `None` and `delete`/`update`
//! report whether a record was touched. Use [`DocumentStoreResult<T>`] as the
//! return type for fallible operations.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

/// Represents all possible errors that can occur when interacting with a document store.
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// The collection name is not part of the store's configured set.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),
    /// Serialization/deserialization error when converting between record formats (BSON, JSON).
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// A value could not be represented as a record (it did not serialize to a mapping).
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
    /// The store configuration is invalid or asks for something this build cannot provide.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Error during store initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for document store operations.
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;

impl From<BsonError> for DocumentStoreError {
    fn from(err: BsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for DocumentStoreError {
    fn from(err: SerdeJsonError) -> Self {
        DocumentStoreError::Serialization(err.to_string())
    }
}
