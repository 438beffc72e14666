//! Schemaless records and the helpers every backend uses to keep them consistent.
//!
//! A [`Record`] is a BSON document: an ordered mapping of field names to tagged
//! [`Bson`](bson::Bson) values. Every stored record carries its own storage key
//! in the reserved [`ID_FIELD`].

use bson::Document;
use uuid::Uuid;

/// A schemaless record as held by a collection.
pub type Record = Document;

/// Reserved field holding a record's storage key.
pub const ID_FIELD: &str = "id";

/// Generates a fresh random key (UUID v4, hyphenated).
pub fn new_key() -> String {
    Uuid::new_v4().to_string()
}

/// Sets the record's [`ID_FIELD`] to `key`, replacing any value the caller supplied.
pub fn stamp_id(record: &mut Record, key: &str) {
    record.insert(ID_FIELD, key);
}

/// Shallow-merges `partial` into `target` and re-stamps the key.
///
/// Fields present in `partial` overwrite or extend `target`; all other fields
/// are left untouched. The key is stamped last so a stray `id` in the partial
/// can never desynchronize the record from its storage key.
pub fn merge(target: &mut Record, partial: Record, key: &str) {
    for (field, value) in partial {
        target.insert(field, value);
    }

    stamp_id(target, key);
}

/// Returns the key stored in the record's [`ID_FIELD`], if it is a string.
pub fn record_key(record: &Record) -> Option<&str> {
    record.get_str(ID_FIELD).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn generated_keys_are_distinct_uuids() {
        let a = new_key();
        let b = new_key();

        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn stamp_overwrites_caller_id() {
        let mut record = doc! { "id": "spoofed", "name": "Milk" };
        stamp_id(&mut record, "k1");

        assert_eq!(record_key(&record), Some("k1"));
        assert_eq!(record.get_str("name").unwrap(), "Milk");
    }

    #[test]
    fn merge_is_shallow() {
        let mut record = doc! { "a": 1, "b": 2, "nested": { "x": 1, "y": 2 }, "id": "k" };
        merge(&mut record, doc! { "b": 3, "c": 4, "nested": { "x": 9 } }, "k");

        assert_eq!(record.get_i32("a").unwrap(), 1);
        assert_eq!(record.get_i32("b").unwrap(), 3);
        assert_eq!(record.get_i32("c").unwrap(), 4);
        assert_eq!(record.get_document("nested").unwrap(), &doc! { "x": 9 });
        assert_eq!(record.len(), 5);
    }

    #[test]
    fn merge_restamps_key() {
        let mut record = doc! { "name": "Eggs", "id": "k" };
        merge(&mut record, doc! { "id": "other" }, "k");

        assert_eq!(record_key(&record), Some("k"));
    }
}
