//! Typed documents layered over schemaless records.
//!
//! Any serde type can be stored as a record by implementing [`Document`], which
//! names the collection it lives in. [`DocumentExt`] converts between the type
//! and a [`Record`] through BSON serialization.

use bson::{Bson, de::deserialize_from_bson, ser::serialize_to_bson};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    record::Record,
};

/// Trait for types stored in a fixed collection.
///
/// The store stamps the record key into an `id` field, so implementers usually
/// declare `#[serde(default)] id: String` to receive it back on reads.
///
/// # Example
///
/// ```ignore
/// use larder::document::Document;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(Debug, Clone, Serialize, Deserialize)]
/// pub struct Product {
///     #[serde(default)]
///     pub id: String,
///     pub name: String,
///     pub price: f64,
/// }
///
/// impl Document for Product {
///     fn collection_name() -> &'static str {
///         "products"
///     }
/// }
/// ```
pub trait Document: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Returns the name of the collection this document belongs to.
    fn collection_name() -> &'static str;
}

/// Conversion helpers for any [`Document`].
pub trait DocumentExt: Document {
    /// Serializes this document into a record.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDocument`] if the type does not serialize to a mapping.
    fn to_record(&self) -> DocumentStoreResult<Record>;

    /// Deserializes a document from a stored record.
    fn from_record(record: Record) -> DocumentStoreResult<Self>;
}

impl<D: Document> DocumentExt for D {
    fn to_record(&self) -> DocumentStoreResult<Record> {
        match serialize_to_bson(self)? {
            Bson::Document(record) => Ok(record),
            other => Err(DocumentStoreError::InvalidDocument(format!(
                "{} serialized to {:?}, expected a document",
                D::collection_name(),
                other.element_type(),
            ))),
        }
    }

    fn from_record(record: Record) -> DocumentStoreResult<Self> {
        Ok(deserialize_from_bson(Bson::Document(record))?)
    }
}
