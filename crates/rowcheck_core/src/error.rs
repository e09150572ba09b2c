//! Error types for validator configuration.
//!
//! Configuration errors are raised while rules are being registered, before
//! any row is processed. They are never reported as problems.

use thiserror::Error;

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised when a validator is configured incorrectly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A rule references a field that is not part of the schema
    #[error("unexpected field name: {0}")]
    UnknownField(String),

    /// The same field name appears twice in a schema
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// A compound uniqueness key lists no fields
    #[error("uniqueness key must name at least one field")]
    EmptyKey,

    /// A sampling modulus of zero would never select a row
    #[error("sampling modulus must be at least 1")]
    InvalidModulus,

    /// An enumeration check was given no members
    #[error("enumeration requires at least one member")]
    EmptyEnumeration,

    /// A regular expression failed to compile
    #[error("invalid regex pattern '{pattern}': {error}")]
    InvalidPattern {
        /// The pattern as supplied
        pattern: String,
        /// Compiler diagnostic
        error: String,
    },

    /// A range bound could not be parsed with the range's coercion
    #[error("invalid range bound '{bound}': {error}")]
    InvalidBound {
        /// The bound as supplied
        bound: String,
        /// Parse diagnostic
        error: String,
    },
}

impl ConfigError {
    /// Creates a new unknown field error.
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField(field.into())
    }

    /// Creates a new invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, error: impl ToString) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            error: error.to_string(),
        }
    }

    /// Creates a new invalid bound error.
    pub fn invalid_bound(bound: impl Into<String>, error: impl ToString) -> Self {
        Self::InvalidBound {
            bound: bound.into(),
            error: error.to_string(),
        }
    }
}
