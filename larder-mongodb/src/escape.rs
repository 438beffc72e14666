//! Field-name escaping for MongoDB.
//!
//! MongoDB reserves `.` for path traversal and `$` for operators, and rejects
//! NUL in keys. Record field names are escaped on the way in and restored on
//! the way out, including keys inside nested documents and arrays. Scalar
//! values are stored untouched. A lookup value that is itself a document goes
//! through [`FieldEscaper::escape_value`] so it compares against the stored,
//! escaped form.
//!
//! Restoring is lossy for names that already contain a replacement token: a
//! stored `a__dot__b` comes back as `a.b`.

use bson::{Bson, Document};


pub(crate) struct FieldEscaper;

impl FieldEscaper {
    const REPLACEMENTS: [(&'static str, &'static str); 3] = [
        (".", "__dot__"),
        ("$", "__dollar__"),
        ("\0", "__null__"),
    ];

    /// Escapes every key of `document`, descending into nested documents and arrays.
    pub(crate) fn escape_document(document: Document) -> Document {
        document
            .into_iter()
            .map(|(k, v)| (Self::escape_name(&k), Self::map_nested(v, Self::escape_document)))
            .collect()
    }

    /// Reverses [`escape_document`](Self::escape_document).
    pub(crate) fn restore_document(document: Document) -> Document {
        document
            .into_iter()
            .map(|(k, v)| (Self::restore_name(&k), Self::map_nested(v, Self::restore_document)))
            .collect()
    }

    /// Escapes the keys of any document nested in `value`; scalars pass through.
    pub(crate) fn escape_value(value: Bson) -> Bson {
        Self::map_nested(value, Self::escape_document)
    }

    pub(crate) fn escape_name(input: &str) -> String {
        Self::REPLACEMENTS
            .iter()
            .fold(input.to_string(), |name, (target, replacement)| name.replace(*target, *replacement))
    }

    pub(crate) fn restore_name(input: &str) -> String {
        Self::REPLACEMENTS
            .iter()
            .rev()
            .fold(input.to_string(), |name, (target, replacement)| name.replace(*replacement, *target))
    }

    fn map_nested(value: Bson, f: fn(Document) -> Document) -> Bson {
        match value {
            Bson::Document(doc) => Bson::Document(f(doc)),
            Bson::Array(items) => Bson::Array(
                items
                    .into_iter()
                    .map(|item| Self::map_nested(item, f))
                    .collect(),
            ),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn escapes_keys_but_not_values() {
        let escaped = FieldEscaper::escape_document(doc! {
            "price.eur": 2.5,
            "note": "costs $2.50",
            "tags": [{ "$weird": 1 }],
        });

        assert_eq!(escaped.get_f64("price__dot__eur").unwrap(), 2.5);
        assert_eq!(escaped.get_str("note").unwrap(), "costs $2.50");
        assert_eq!(
            escaped.get_array("tags").unwrap()[0],
            Bson::Document(doc! { "__dollar__weird": 1 })
        );
    }

    #[test]
    fn escape_value_matches_stored_form() {
        let stored = FieldEscaper::escape_document(doc! { "dims": { "w.cm": 10, "$h": [{ "d.mm": 1 }] } });
        let lookup = FieldEscaper::escape_value(Bson::Document(doc! { "w.cm": 10, "$h": [{ "d.mm": 1 }] }));

        assert_eq!(stored.get("dims"), Some(&lookup));
        assert_eq!(FieldEscaper::escape_value(Bson::from("a.b")), Bson::from("a.b"));
    }

    #[test]
    fn restore_turns_tokens_back_into_characters() {
        let restored = FieldEscaper::restore_document(doc! { "a__dot__b": 1 });

        assert_eq!(restored, doc! { "a.b": 1 });
    }

    #[test]
    fn restore_reverses_escape() {
        let original = doc! { "a.b": { "$c": [ { "d\0": true } ] }, "plain": 1 };

        assert_eq!(FieldEscaper::restore_document(FieldEscaper::escape_document(original.clone())), original);
    }
}
