//! Declarative validator definitions.
//!
//! A [`ValidatorDefinition`] describes the schema, the rules and the run
//! options of a validator as plain data, so that it can be stored in a YAML
//! or TOML file and built into a validator later.

use crate::{FieldSchema, RunOptions, UniqueKey};
use serde::{Deserialize, Serialize};

/// A complete, serializable validator description.
///
/// # Example
///
/// ```rust
/// use rowcheck_core::{CheckKind, ValidatorDefinition, ValueRule};
///
/// let definition: ValidatorDefinition = serde_json::from_str(r#"{
///     "fields": ["study_id", "gender"],
///     "value_checks": [
///         {"field": "gender", "check": {"type": "enumeration", "values": ["M", "F"]}}
///     ]
/// }"#).unwrap();
///
/// assert_eq!(definition.fields.len(), 2);
/// assert!(matches!(
///     definition.value_checks[0].check,
///     CheckKind::Enumeration { .. }
/// ));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorDefinition {
    /// Optional human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Expected field names in column order
    pub fields: FieldSchema,

    /// Header check, applied to the header row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_check: Option<RuleSpec>,

    /// Record length check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_length_check: Option<RuleSpec>,

    /// Value checks; a failing check reports the rule's code
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_checks: Vec<ValueRule>,

    /// Value predicates; a check kind used as a predicate reports false
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_predicates: Vec<ValueRule>,

    /// Uniqueness checks on single fields or compound keys
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unique_checks: Vec<UniqueRule>,

    /// Default run options
    #[serde(default)]
    pub options: RunOptions,
}

/// Code, message and sampling modulus shared by every rule kind.
///
/// Absent values fall back to the defaults of the rule kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modulus: Option<usize>,
}

/// A value-level rule bound to one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRule {
    /// Field the rule applies to
    pub field: String,

    /// Built-in check applied to the field's value
    pub check: CheckKind,

    #[serde(flatten)]
    pub spec: RuleSpec,
}

/// A uniqueness rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniqueRule {
    /// Single field name or list of field names
    pub key: UniqueKey,

    #[serde(flatten)]
    pub spec: RuleSpec,
}

/// Built-in value checks available to declarative definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckKind {
    /// Value parses as an integer
    Int,

    /// Value parses as a floating point number
    Float,

    /// Value is one of a fixed set
    Enumeration { values: Vec<String> },

    /// Regex matches at the start of the value
    MatchPattern { regex: String },

    /// Regex matches anywhere in the value
    SearchPattern { regex: String },

    /// Numeric value lies within bounds
    NumberRange {
        min: f64,
        max: f64,
        #[serde(default = "default_inclusive")]
        inclusive: bool,
        #[serde(default)]
        numeric: NumericKind,
    },

    /// Value parses with a strftime-style format
    Datetime { format: String },

    /// Date/time value lies within bounds given in the same format
    DatetimeRange {
        min: String,
        max: String,
        format: String,
        #[serde(default = "default_inclusive")]
        inclusive: bool,
    },
}

/// Coercion applied to values before a numeric range comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericKind {
    Int,
    #[default]
    Float,
}

fn default_inclusive() -> bool {
    true
}
