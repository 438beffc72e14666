//! Field-equality evaluation for in-memory scans.
//!
//! Values are compared through [`Comparable`]. Integers compare exactly as
//! `i64`; an integer equals a double only when the double is integral and
//! converts back to the same integer, so a JSON `2` finds a stored `2.0`
//! without ever confusing two distinct large integers. `NaN` equals `NaN`.

use std::collections::HashMap;
use bson::Bson;

use larder_core::record::Record;


/// Type-erased, comparable representation of BSON values.
///
/// This is a private implementation detail used for field matching.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    /// Int32 and Int64, widened to i64
    Int(i64),
    Double(f64),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other BSON type, compared structurally
    Other(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Double(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect(),
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<HashMap<_, _>>()
            ),
            other => Comparable::Other(other),
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Double(a), Comparable::Double(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Comparable::Int(i), Comparable::Double(d)) | (Comparable::Double(d), Comparable::Int(i)) => {
                integral_double_equals(*d, *i)
            },
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Other(a), Comparable::Other(b)) => a == b,
            _ => false,
        }
    }
}

/// `true` if `d` has no fractional part, lies in `i64` range and is exactly `i`.
fn integral_double_equals(d: f64, i: i64) -> bool {
    // 2^63 is exactly representable; `i64::MAX as f64` would round up to it
    const BOUND: f64 = 9_223_372_036_854_775_808.0;

    d.is_finite() && d.fract() == 0.0 && (-BOUND..BOUND).contains(&d) && d as i64 == i
}


/// Matches records on a single field.
pub(crate) struct FieldMatcher<'a> {
    field: &'a str,
    expected: Comparable<'a>,
}

impl<'a> FieldMatcher<'a> {
    pub fn new(field: &'a str, value: &'a Bson) -> Self {
        Self { field, expected: Comparable::from(value) }
    }

    /// Returns `true` if the record has the field and it equals the expected value.
    pub fn matches(&self, record: &Record) -> bool {
        record
            .get(self.field)
            .is_some_and(|actual| Comparable::from(actual) == self.expected)
    }

    /// Clones every matching record, preserving scan order.
    pub fn filter_records<'r>(&self, records: impl IntoIterator<Item = &'r Record>) -> Vec<Record> {
        records
            .into_iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn numbers_match_across_representations() {
        let record = doc! { "qty": 2_i64, "price": 2.0 };

        assert!(FieldMatcher::new("qty", &Bson::Int32(2)).matches(&record));
        assert!(FieldMatcher::new("price", &Bson::Int32(2)).matches(&record));
        assert!(!FieldMatcher::new("qty", &Bson::Double(2.5)).matches(&record));
    }

    #[test]
    fn large_integers_compare_exactly() {
        let record = doc! { "ref": 9_007_199_254_740_993_i64 };

        assert!(!FieldMatcher::new("ref", &Bson::Int64(9_007_199_254_740_992)).matches(&record));
        assert!(!FieldMatcher::new("ref", &Bson::Double(9_007_199_254_740_992.0)).matches(&record));
        assert!(FieldMatcher::new("ref", &Bson::Int64(9_007_199_254_740_993)).matches(&record));
    }

    #[test]
    fn doubles_match_integers_only_when_integral() {
        let record = doc! { "qty": 3, "max": i64::MAX };

        assert!(FieldMatcher::new("qty", &Bson::Double(3.0)).matches(&record));
        assert!(!FieldMatcher::new("qty", &Bson::Double(3.000_000_1)).matches(&record));
        assert!(!FieldMatcher::new("qty", &Bson::Double(f64::INFINITY)).matches(&record));
        assert!(!FieldMatcher::new("max", &Bson::Double(i64::MAX as f64)).matches(&record));
    }

    #[test]
    fn nan_matches_nan() {
        let record = doc! { "weight": f64::NAN };

        assert!(FieldMatcher::new("weight", &Bson::Double(f64::NAN)).matches(&record));
        assert!(!FieldMatcher::new("weight", &Bson::Double(0.0)).matches(&record));
    }

    #[test]
    fn absent_field_never_matches() {
        let record = doc! { "name": "Milk" };

        assert!(!FieldMatcher::new("brand", &Bson::Null).matches(&record));
    }

    #[test]
    fn explicit_null_matches_null() {
        let record = doc! { "brand": Bson::Null };

        assert!(FieldMatcher::new("brand", &Bson::Null).matches(&record));
    }

    #[test]
    fn strings_do_not_partially_match() {
        let record = doc! { "name": "Whole Milk" };

        assert!(!FieldMatcher::new("name", &Bson::from("Milk")).matches(&record));
        assert!(FieldMatcher::new("name", &Bson::from("Whole Milk")).matches(&record));
    }

    #[test]
    fn nested_documents_compare_by_content() {
        let record = doc! { "address": { "city": "Pune", "zip": 411001 } };
        let expected = Bson::Document(doc! { "zip": 411001_i64, "city": "Pune" });

        assert!(FieldMatcher::new("address", &expected).matches(&record));
    }

    #[test]
    fn other_types_compare_structurally() {
        let oid = ObjectId::new();
        let record = doc! { "ref": oid };

        assert!(FieldMatcher::new("ref", &Bson::ObjectId(oid)).matches(&record));
        assert!(!FieldMatcher::new("ref", &Bson::Null).matches(&record));
    }

    #[test]
    fn filter_keeps_only_matches() {
        let records = vec![
            doc! { "role": "ADMIN", "id": "1" },
            doc! { "role": "CUSTOMER", "id": "2" },
            doc! { "role": "CUSTOMER", "id": "3" },
        ];
        let customers = Bson::from("CUSTOMER");
        let matched = FieldMatcher::new("role", &customers).filter_records(&records);

        assert_eq!(matched.len(), 2);
        assert!(matched.iter().all(|r| r.get_str("role").unwrap() == "CUSTOMER"));
    }
}
