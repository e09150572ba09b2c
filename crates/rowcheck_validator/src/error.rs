//! Failure signals returned by user-supplied rules.
//!
//! Each rule kind returns a typed result. The domain variant of each signal
//! becomes a regular problem; the `Unexpected` variant carries any other
//! failure and is reported only when the run asks for unexpected exceptions.

use rowcheck_core::ProblemCode;
use std::fmt;
use thiserror::Error;

/// Failure of a value check.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The value is not valid for the field
    #[error("invalid value: {0}")]
    Invalid(String),

    /// The check itself failed
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl ValueError {
    /// Creates a new invalid value error.
    pub fn invalid(value: impl Into<String>) -> Self {
        Self::Invalid(value.into())
    }
}

impl From<std::num::ParseIntError> for ValueError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for ValueError {
    fn from(err: std::num::ParseFloatError) -> Self {
        Self::Invalid(err.to_string())
    }
}

impl From<chrono::ParseError> for ValueError {
    fn from(err: chrono::ParseError) -> Self {
        Self::Invalid(err.to_string())
    }
}

/// Failure of a record check.
///
/// `Failed` may override the code and message configured for the check and
/// attach a details payload to the reported problem.
///
/// Any `std::error::Error` converts into `Unexpected`, so `?` can be used
/// freely inside a record check. An `anyhow::Error` goes through
/// [`RecordError::unexpected`].
pub enum RecordError {
    Failed {
        code: Option<ProblemCode>,
        message: Option<String>,
        details: Option<serde_json::Value>,
    },
    Unexpected(anyhow::Error),
}

impl RecordError {
    /// A failure reported with the check's configured code and message.
    pub fn failed() -> Self {
        Self::Failed {
            code: None,
            message: None,
            details: None,
        }
    }

    /// A failure reported with its own code and message.
    pub fn new(code: impl Into<ProblemCode>, message: impl Into<String>) -> Self {
        Self::Failed {
            code: Some(code.into()),
            message: Some(message.into()),
            details: None,
        }
    }

    /// Wraps an arbitrary failure of the check itself.
    pub fn unexpected(err: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected(err.into())
    }

    /// Attaches a details payload; has no effect on unexpected errors.
    pub fn with_details(self, payload: serde_json::Value) -> Self {
        match self {
            Self::Failed { code, message, .. } => Self::Failed {
                code,
                message,
                details: Some(payload),
            },
            unexpected => unexpected,
        }
    }
}

impl<E> From<E> for RecordError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self::Unexpected(anyhow::Error::new(err))
    }
}

impl fmt::Debug for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed {
                code,
                message,
                details,
            } => f
                .debug_struct("Failed")
                .field("code", code)
                .field("message", message)
                .field("details", details)
                .finish(),
            Self::Unexpected(err) => f.debug_tuple("Unexpected").field(err).finish(),
        }
    }
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { code, message, .. } => write!(
                f,
                "record check failed ({}): {}",
                code.as_ref().map_or("default code", |c| c.as_str()),
                message.as_deref().unwrap_or("default message")
            ),
            Self::Unexpected(err) => write!(f, "{err:#}"),
        }
    }
}

/// Failure of an assert hook.
///
/// A bare `Failed` reports the hook family's default code and message; a
/// carried code and/or message overrides them.
pub enum AssertionFailure {
    Failed {
        code: Option<ProblemCode>,
        message: Option<String>,
    },
    Unexpected(anyhow::Error),
}

impl AssertionFailure {
    /// A failed assertion with the default code and message.
    pub fn failed() -> Self {
        Self::Failed {
            code: None,
            message: None,
        }
    }

    /// A failed assertion overriding only the code.
    pub fn code(code: impl Into<ProblemCode>) -> Self {
        Self::Failed {
            code: Some(code.into()),
            message: None,
        }
    }

    /// A failed assertion overriding code and message.
    pub fn new(code: impl Into<ProblemCode>, message: impl Into<String>) -> Self {
        Self::Failed {
            code: Some(code.into()),
            message: Some(message.into()),
        }
    }

    /// Wraps an arbitrary failure of the hook itself.
    pub fn unexpected(err: impl Into<anyhow::Error>) -> Self {
        Self::Unexpected(err.into())
    }

    /// Fails with the default code and message unless `condition` holds.
    pub fn ensure(condition: bool) -> Result<(), Self> {
        if condition {
            Ok(())
        } else {
            Err(Self::failed())
        }
    }

    /// Fails with the given code and message unless `condition` holds.
    pub fn ensure_with(
        condition: bool,
        code: impl Into<ProblemCode>,
        message: impl Into<String>,
    ) -> Result<(), Self> {
        if condition {
            Ok(())
        } else {
            Err(Self::new(code, message))
        }
    }
}

impl<E> From<E> for AssertionFailure
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        Self::Unexpected(anyhow::Error::new(err))
    }
}

impl fmt::Debug for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { code, message } => f
                .debug_struct("Failed")
                .field("code", code)
                .field("message", message)
                .finish(),
            Self::Unexpected(err) => f.debug_tuple("Unexpected").field(err).finish(),
        }
    }
}

impl fmt::Display for AssertionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed { code, message } => write!(
                f,
                "assertion failed ({}): {}",
                code.as_ref().map_or("default code", |c| c.as_str()),
                message.as_deref().unwrap_or("default message")
            ),
            Self::Unexpected(err) => write!(f, "{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_age(value: &str) -> Result<i64, RecordError> {
        Ok(value.parse::<i64>()?)
    }

    #[test]
    fn test_parse_errors_are_invalid_values() {
        let err: ValueError = "abc".parse::<i64>().unwrap_err().into();
        assert!(matches!(err, ValueError::Invalid(_)));

        let err: ValueError = "abc".parse::<f64>().unwrap_err().into();
        assert!(matches!(err, ValueError::Invalid(_)));
    }

    #[test]
    fn test_anyhow_is_unexpected_value_error() {
        let err: ValueError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ValueError::Unexpected(_)));
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn test_question_mark_in_record_check() {
        assert_eq!(parse_age("42").unwrap(), 42);
        assert!(matches!(parse_age("x"), Err(RecordError::Unexpected(_))));
    }

    #[test]
    fn test_record_error_details() {
        let err = RecordError::new("EX8", "invalid age variables")
            .with_details(serde_json::json!({"age_years": 3}));

        match err {
            RecordError::Failed {
                code,
                message,
                details,
            } => {
                assert_eq!(code, Some(ProblemCode::custom("EX8")));
                assert_eq!(message.as_deref(), Some("invalid age variables"));
                assert_eq!(details, Some(serde_json::json!({"age_years": 3})));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn test_ensure() {
        assert!(AssertionFailure::ensure(true).is_ok());
        assert!(matches!(
            AssertionFailure::ensure(false),
            Err(AssertionFailure::Failed {
                code: None,
                message: None
            })
        ));
        assert!(matches!(
            AssertionFailure::ensure_with(false, "X4", "custom"),
            Err(AssertionFailure::Failed { code: Some(_), message: Some(_) })
        ));
    }
}
