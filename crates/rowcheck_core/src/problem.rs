//! Problem records produced by a validation run.
//!
//! A [`Problem`] always carries a [`ProblemCode`]. Every other attribute is
//! optional and depends on the kind of rule that produced it and on whether
//! the run was summarized.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Code identifying the kind of a reported problem.
///
/// Built-in codes carry the default message of their rule kind; callers can
/// use any other code through [`ProblemCode::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProblemCode {
    UnexpectedException,
    ValueCheckFailed,
    HeaderCheckFailed,
    RecordLengthCheckFailed,
    ValuePredicateFalse,
    RecordCheckFailed,
    RecordPredicateFalse,
    UniqueCheckFailed,
    AssertCheckFailed,
    FinallyAssertCheckFailed,
    /// Caller supplied code
    Custom(String),
}

impl ProblemCode {
    const BUILTIN: [ProblemCode; 10] = [
        ProblemCode::UnexpectedException,
        ProblemCode::ValueCheckFailed,
        ProblemCode::HeaderCheckFailed,
        ProblemCode::RecordLengthCheckFailed,
        ProblemCode::ValuePredicateFalse,
        ProblemCode::RecordCheckFailed,
        ProblemCode::RecordPredicateFalse,
        ProblemCode::UniqueCheckFailed,
        ProblemCode::AssertCheckFailed,
        ProblemCode::FinallyAssertCheckFailed,
    ];

    /// Creates a caller supplied code.
    pub fn custom(code: impl Into<String>) -> Self {
        Self::Custom(code.into())
    }

    /// Stable numeric identifier of a built-in code.
    pub fn number(&self) -> Option<u8> {
        Self::BUILTIN
            .iter()
            .position(|builtin| builtin == self)
            .map(|idx| idx as u8)
    }

    /// String form of the code, e.g. `VALUE_CHECK_FAILED`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::UnexpectedException => "UNEXPECTED_EXCEPTION",
            Self::ValueCheckFailed => "VALUE_CHECK_FAILED",
            Self::HeaderCheckFailed => "HEADER_CHECK_FAILED",
            Self::RecordLengthCheckFailed => "RECORD_LENGTH_CHECK_FAILED",
            Self::ValuePredicateFalse => "VALUE_PREDICATE_FALSE",
            Self::RecordCheckFailed => "RECORD_CHECK_FAILED",
            Self::RecordPredicateFalse => "RECORD_PREDICATE_FALSE",
            Self::UniqueCheckFailed => "UNIQUE_CHECK_FAILED",
            Self::AssertCheckFailed => "ASSERT_CHECK_FAILED",
            Self::FinallyAssertCheckFailed => "FINALLY_ASSERT_CHECK_FAILED",
            Self::Custom(code) => code,
        }
    }

    /// Default message reported with a built-in code.
    ///
    /// Unexpected exceptions format their message from the error instead, see
    /// [`unexpected_message`].
    pub fn default_message(&self) -> &str {
        match self {
            Self::UnexpectedException => "Unexpected exception.",
            Self::ValueCheckFailed => "Value check failed.",
            Self::HeaderCheckFailed => "Header check failed.",
            Self::RecordLengthCheckFailed => "Record length check failed.",
            Self::ValuePredicateFalse => "Value predicate returned false.",
            Self::RecordCheckFailed => "Record check failed.",
            Self::RecordPredicateFalse => "Record predicate returned false.",
            Self::UniqueCheckFailed => "Unique check failed.",
            Self::AssertCheckFailed => "Assertion check failed.",
            Self::FinallyAssertCheckFailed => "Final assertion check failed.",
            Self::Custom(_) => "",
        }
    }
}

impl fmt::Display for ProblemCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ProblemCode {
    fn from(code: &str) -> Self {
        Self::BUILTIN
            .iter()
            .find(|builtin| builtin.as_str() == code)
            .cloned()
            .unwrap_or_else(|| Self::Custom(code.to_string()))
    }
}

impl From<String> for ProblemCode {
    fn from(code: String) -> Self {
        Self::from(code.as_str())
    }
}

impl Serialize for ProblemCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProblemCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        Ok(Self::from(code))
    }
}

/// Formats the message of an unexpected exception problem.
pub fn unexpected_message(kind: &str, error: &str) -> String {
    format!("Unexpected exception [{kind}]: {error}")
}

/// A single field name or an ordered tuple of field names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UniqueKey {
    Single(String),
    Compound(Vec<String>),
}

impl UniqueKey {
    /// Member field names in key order.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::Single(field) => vec![field.as_str()],
            Self::Compound(fields) => fields.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for UniqueKey {
    fn from(field: &str) -> Self {
        Self::Single(field.to_string())
    }
}

impl From<String> for UniqueKey {
    fn from(field: String) -> Self {
        Self::Single(field)
    }
}

impl<S: Into<String>> From<Vec<S>> for UniqueKey {
    fn from(fields: Vec<S>) -> Self {
        Self::Compound(fields.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for UniqueKey {
    fn from(fields: [S; N]) -> Self {
        Self::Compound(fields.into_iter().map(Into::into).collect())
    }
}

/// Offending value: a single cell, or the values of a compound key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Single(String),
    Tuple(Vec<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

/// A reported rule violation or unexpected error.
///
/// Row and column numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    pub code: ProblemCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<UniqueKey>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<BTreeSet<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unexpected: Option<BTreeSet<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    /// Rendered error chain of an unexpected exception
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,

    /// Name of the rule or hook that raised an unexpected exception
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// Extra payload attached by a failing record check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

impl Problem {
    /// Creates a problem carrying only a code.
    pub fn new(code: impl Into<ProblemCode>) -> Self {
        Self {
            code: code.into(),
            message: None,
            row: None,
            column: None,
            field: None,
            value: None,
            record: None,
            key: None,
            missing: None,
            unexpected: None,
            length: None,
            exception: None,
            function: None,
            details: None,
            context: None,
        }
    }

    /// Sets the message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the 1-based row number and the raw record.
    pub fn at_row(mut self, row: usize, record: &[String]) -> Self {
        self.row = Some(row);
        self.record = Some(record.to_vec());
        self
    }

    /// Sets the 1-based column, field name and offending value.
    pub fn at_field(mut self, column: usize, field: impl Into<String>, value: &str) -> Self {
        self.column = Some(column);
        self.field = Some(field.into());
        self.value = Some(FieldValue::from(value));
        self
    }

    /// Sets the uniqueness key and its duplicated value.
    pub fn with_key(mut self, key: UniqueKey, value: FieldValue) -> Self {
        self.key = Some(key);
        self.value = Some(value);
        self
    }

    /// Sets the missing and unexpected header field sets.
    pub fn with_header_diff(
        mut self,
        missing: BTreeSet<String>,
        unexpected: BTreeSet<String>,
    ) -> Self {
        self.missing = Some(missing);
        self.unexpected = Some(unexpected);
        self
    }

    /// Sets the observed record length.
    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the exception text and the name of the failing function.
    pub fn with_exception(mut self, exception: impl Into<String>, function: &str) -> Self {
        self.exception = Some(exception.into());
        self.function = Some(function.to_string());
        self
    }

    /// Sets the record-check details payload.
    pub fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.details = details;
        self
    }

    /// Sets the caller context.
    pub fn with_context(mut self, context: Option<serde_json::Value>) -> Self {
        self.context = context;
        self
    }

    /// Drops every attribute except the code and the context.
    pub fn into_summary(self) -> Self {
        Self::new(self.code).with_context(self.context)
    }

    /// Returns true if the problem carries nothing but its code and context.
    pub fn is_summary(&self) -> bool {
        *self == self.clone().into_summary()
    }
}
