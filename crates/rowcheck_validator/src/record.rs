//! Record view over a raw row.
//!
//! Record checks, record predicates and hooks see a row as a mapping from
//! field name to value. [`Record`] provides that mapping without copying the
//! row.

use rowcheck_core::FieldSchema;
use std::collections::BTreeMap;
use thiserror::Error;

/// A raw row: one ordered sequence of cell values.
pub type Row = Vec<String>;

/// Error returned by [`Record::value`] when a field has no value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' has no value in this record")]
pub struct MissingValue {
    /// Field that was looked up
    pub field: String,
}

/// A row presented as a field-name to value mapping.
///
/// Fields beyond the end of a short row have no value; values beyond the end
/// of the schema in a long row are not reachable by name.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    schema: &'a FieldSchema,
    values: &'a [String],
}

impl<'a> Record<'a> {
    /// Creates a record view over `values`.
    pub fn new(schema: &'a FieldSchema, values: &'a [String]) -> Self {
        Self { schema, values }
    }

    /// Value of a field, if the field exists and the row reaches it.
    pub fn get(&self, field: &str) -> Option<&'a str> {
        let idx = self.schema.index_of(field)?;
        self.values.get(idx).map(String::as_str)
    }

    /// Value of a field, or a [`MissingValue`] error usable with `?`.
    pub fn value(&self, field: &str) -> Result<&'a str, MissingValue> {
        self.get(field).ok_or_else(|| MissingValue {
            field: field.to_string(),
        })
    }

    /// Iterates over every schema field with its value, in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, Option<&'a str>)> + 'a {
        let values = self.values;
        self.schema
            .names()
            .iter()
            .enumerate()
            .map(move |(idx, name)| (name.as_str(), values.get(idx).map(String::as_str)))
    }

    /// The raw row backing this record.
    pub fn raw(&self) -> &'a [String] {
        self.values
    }

    /// Copies the record into an owned map.
    pub fn to_map(&self) -> BTreeMap<String, Option<String>> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.map(str::to_string)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(values: &[&str]) -> Row {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_lookup_by_name() {
        let schema = FieldSchema::new(["foo", "bar"]).unwrap();
        let values = row(&["12", "3.4"]);
        let record = Record::new(&schema, &values);

        assert_eq!(record.get("foo"), Some("12"));
        assert_eq!(record.get("bar"), Some("3.4"));
        assert_eq!(record.get("baz"), None);
    }

    #[test]
    fn test_short_row_has_missing_values() {
        let schema = FieldSchema::new(["foo", "bar"]).unwrap();
        let values = row(&["12"]);
        let record = Record::new(&schema, &values);

        assert_eq!(record.get("bar"), None);
        assert_eq!(
            record.value("bar"),
            Err(MissingValue {
                field: "bar".to_string()
            })
        );
        assert_eq!(
            record.iter().collect::<Vec<_>>(),
            vec![("foo", Some("12")), ("bar", None)]
        );
    }

    #[test]
    fn test_long_row_extra_values_unreachable() {
        let schema = FieldSchema::new(["foo"]).unwrap();
        let values = row(&["1", "2", "3"]);
        let record = Record::new(&schema, &values);

        let map = record.to_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map["foo"], Some("1".to_string()));
        assert_eq!(record.raw().len(), 3);
    }
}
