//! Field schema: the ordered, unique field names a validator expects.

use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Ordered sequence of unique field names.
///
/// The position of a name is the column index of its value in every row, and
/// the number of names is the canonical record length.
///
/// # Example
///
/// ```rust
/// use rowcheck_core::FieldSchema;
///
/// let schema = FieldSchema::new(["foo", "bar"]).unwrap();
/// assert_eq!(schema.len(), 2);
/// assert_eq!(schema.index_of("bar"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldSchema {
    names: Vec<String>,
}

impl FieldSchema {
    /// Creates a schema, rejecting duplicate names.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateField(name.clone()));
            }
        }

        Ok(Self { names })
    }

    /// Number of fields, i.e. the expected record length.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Zero-based column index of a field.
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.names.iter().position(|name| name == field)
    }

    /// Column index of a field, or an unknown field error.
    pub fn require(&self, field: &str) -> Result<usize> {
        self.index_of(field)
            .ok_or_else(|| ConfigError::unknown_field(field))
    }

    /// Returns true if the schema contains the field.
    pub fn contains(&self, field: &str) -> bool {
        self.index_of(field).is_some()
    }

    /// Field names in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Returns true if `row` lists exactly the schema's names in order.
    pub fn matches<S: AsRef<str>>(&self, row: &[S]) -> bool {
        row.len() == self.names.len()
            && row
                .iter()
                .zip(&self.names)
                .all(|(cell, name)| cell.as_ref() == name)
    }
}

impl TryFrom<Vec<String>> for FieldSchema {
    type Error = ConfigError;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<FieldSchema> for Vec<String> {
    fn from(schema: FieldSchema) -> Self {
        schema.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_index_lookup() {
        let schema = FieldSchema::new(["study_id", "patient_id", "gender"]).unwrap();

        assert_eq!(schema.len(), 3);
        assert_eq!(schema.index_of("study_id"), Some(0));
        assert_eq!(schema.index_of("gender"), Some(2));
        assert_eq!(schema.index_of("age"), None);
        assert!(schema.contains("patient_id"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = FieldSchema::new(["foo", "bar", "foo"]);
        assert_eq!(result, Err(ConfigError::DuplicateField("foo".to_string())));
    }

    #[test]
    fn test_require_unknown_field() {
        let schema = FieldSchema::new(["foo"]).unwrap();
        assert_eq!(
            schema.require("bar"),
            Err(ConfigError::UnknownField("bar".to_string()))
        );
    }

    #[test]
    fn test_matches_is_order_sensitive() {
        let schema = FieldSchema::new(["foo", "bar"]).unwrap();

        assert!(schema.matches(&["foo", "bar"]));
        assert!(!schema.matches(&["bar", "foo"]));
        assert!(!schema.matches(&["foo"]));
        assert!(!schema.matches(&["foo", "bar", "baz"]));
    }

    #[test]
    fn test_deserialize_rejects_duplicates() {
        let ok: FieldSchema = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(ok.names(), &["a".to_string(), "b".to_string()]);

        let dup: std::result::Result<FieldSchema, _> = serde_json::from_str(r#"["a", "a"]"#);
        assert!(dup.is_err());
    }
}
