//! Rule registration.
//!
//! Every rule kind is stored in its own list on the [`Validator`]. Lists are
//! only appended to while the validator is being configured; a run reads them
//! in registration order.

use crate::{Record, RecordError, Validator, ValueError};
use rowcheck_core::{ConfigError, ProblemCode, Result, RuleSpec, UniqueKey};

/// Signature of a value check: `Err(ValueError::Invalid)` marks the value bad.
pub type ValueCheckFn = dyn Fn(&str) -> std::result::Result<(), ValueError>;

/// Signature of a value predicate: `Ok(false)` marks the value bad.
pub type ValuePredicateFn = dyn Fn(&str) -> anyhow::Result<bool>;

/// Signature of a record check.
pub type RecordCheckFn = dyn Fn(&Record<'_>) -> std::result::Result<(), RecordError>;

/// Signature of a record predicate: `Ok(false)` marks the record bad.
pub type RecordPredicateFn = dyn Fn(&Record<'_>) -> anyhow::Result<bool>;

/// Signature of a skip predicate over the raw row.
pub type SkipFn = dyn Fn(&[String]) -> anyhow::Result<bool>;

/// Code, message, sampling modulus and name of a rule being registered.
///
/// Anything left unset falls back to the defaults of the rule kind.
///
/// # Example
///
/// ```rust
/// use rowcheck_validator::RuleOptions;
///
/// let options = RuleOptions::new()
///     .with_code("EX3")
///     .with_message("study id must be an integer")
///     .with_modulus(10);
/// assert_eq!(options.modulus, Some(10));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOptions {
    pub code: Option<ProblemCode>,
    pub message: Option<String>,
    pub modulus: Option<usize>,
    /// Reported as `function` on unexpected exception problems
    pub name: Option<String>,
}

impl RuleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for options that only set a code.
    pub fn code(code: impl Into<ProblemCode>) -> Self {
        Self::new().with_code(code)
    }

    pub fn with_code(mut self, code: impl Into<ProblemCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Applies the rule only to rows whose 0-based index is a multiple of
    /// `modulus`.
    pub fn with_modulus(mut self, modulus: usize) -> Self {
        self.modulus = Some(modulus);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn resolve(self, default: ProblemCode) -> Result<(Settings, Option<String>)> {
        let modulus = self.modulus.unwrap_or(1);
        if modulus == 0 {
            return Err(ConfigError::InvalidModulus);
        }

        let settings = Settings {
            message: self
                .message
                .unwrap_or_else(|| default.default_message().to_string()),
            code: self.code.unwrap_or(default),
            modulus,
        };
        Ok((settings, self.name))
    }
}

impl From<&RuleSpec> for RuleOptions {
    fn from(spec: &RuleSpec) -> Self {
        Self {
            code: spec.code.as_deref().map(ProblemCode::from),
            message: spec.message.clone(),
            modulus: spec.modulus,
            name: None,
        }
    }
}

/// Resolved reporting settings of a registered rule.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub code: ProblemCode,
    pub message: String,
    pub modulus: usize,
}

impl Settings {
    /// Returns true if the rule applies to the row at 0-based `index`.
    pub fn samples(&self, index: usize) -> bool {
        index % self.modulus == 0
    }
}

/// A rule bound to one field.
pub(crate) struct FieldRule<F: ?Sized> {
    pub field: String,
    pub column: usize,
    pub name: String,
    pub settings: Settings,
    pub func: Box<F>,
}

/// A rule applied to the whole row.
pub(crate) struct RowRule<F: ?Sized> {
    pub name: String,
    pub settings: Settings,
    pub func: Box<F>,
}

pub(crate) struct UniqueCheck {
    pub key: UniqueKey,
    pub columns: Vec<usize>,
    pub settings: Settings,
}

impl UniqueCheck {
    /// Ordered key values of `row`, or `None` if the row is too short to
    /// reach every key field.
    pub fn extract(&self, row: &[String]) -> Option<Vec<String>> {
        self.columns
            .iter()
            .map(|&column| row.get(column).cloned())
            .collect()
    }
}

pub(crate) struct Skip {
    pub name: String,
    pub func: Box<SkipFn>,
}

/// Every rule registered on a validator, grouped by kind.
#[derive(Default)]
pub(crate) struct RuleSet {
    pub header_checks: Vec<Settings>,
    pub record_length_checks: Vec<Settings>,
    pub value_checks: Vec<FieldRule<ValueCheckFn>>,
    pub value_predicates: Vec<FieldRule<ValuePredicateFn>>,
    pub record_checks: Vec<RowRule<RecordCheckFn>>,
    pub record_predicates: Vec<RowRule<RecordPredicateFn>>,
    pub unique_checks: Vec<UniqueCheck>,
    pub skips: Vec<Skip>,
}

impl RuleSet {
    /// Total number of registered rules.
    pub fn len(&self) -> usize {
        self.header_checks.len()
            + self.record_length_checks.len()
            + self.value_checks.len()
            + self.value_predicates.len()
            + self.record_checks.len()
            + self.record_predicates.len()
            + self.unique_checks.len()
            + self.skips.len()
    }
}

impl Validator {
    /// Registers a value check on `field`.
    ///
    /// The check runs on every sampled data row that has a value at the
    /// field's column. Returning `Err(ValueError::Invalid)` reports a problem
    /// with the rule's code (default `VALUE_CHECK_FAILED`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownField` if `field` is not in the schema.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowcheck_validator::{checks, RuleOptions, Validator};
    ///
    /// let mut validator = Validator::with_fields(["foo", "bar"]).unwrap();
    /// validator
    ///     .add_value_check("foo", checks::int_value, RuleOptions::code("X1"))
    ///     .unwrap()
    ///     .add_value_check("bar", checks::float_value, RuleOptions::code("X2"))
    ///     .unwrap();
    /// ```
    pub fn add_value_check<F>(
        &mut self,
        field: &str,
        check: F,
        options: RuleOptions,
    ) -> Result<&mut Self>
    where
        F: Fn(&str) -> std::result::Result<(), ValueError> + 'static,
    {
        let column = self.schema().require(field)?;
        let (settings, name) = options.resolve(ProblemCode::ValueCheckFailed)?;
        self.rules.value_checks.push(FieldRule {
            field: field.to_string(),
            column,
            name: name.unwrap_or_else(|| format!("value check on '{field}'")),
            settings,
            func: Box::new(check),
        });
        Ok(self)
    }

    /// Registers a value predicate on `field`.
    ///
    /// `Ok(false)` reports a problem with the rule's code (default
    /// `VALUE_PREDICATE_FALSE`); an error is an unexpected exception.
    pub fn add_value_predicate<F>(
        &mut self,
        field: &str,
        predicate: F,
        options: RuleOptions,
    ) -> Result<&mut Self>
    where
        F: Fn(&str) -> anyhow::Result<bool> + 'static,
    {
        let column = self.schema().require(field)?;
        let (settings, name) = options.resolve(ProblemCode::ValuePredicateFalse)?;
        self.rules.value_predicates.push(FieldRule {
            field: field.to_string(),
            column,
            name: name.unwrap_or_else(|| format!("value predicate on '{field}'")),
            settings,
            func: Box::new(predicate),
        });
        Ok(self)
    }

    /// Registers a header check.
    ///
    /// Sampling does not apply to header checks: a modulus in `options` is
    /// still validated, so 0 returns `ConfigError::InvalidModulus`, but any
    /// other value has no effect.
    pub fn add_header_check(&mut self, options: RuleOptions) -> Result<&mut Self> {
        let (settings, _) = options.resolve(ProblemCode::HeaderCheckFailed)?;
        self.rules.header_checks.push(settings);
        Ok(self)
    }

    /// Registers a check that every data row has exactly one value per field.
    pub fn add_record_length_check(&mut self, options: RuleOptions) -> Result<&mut Self> {
        let (settings, _) = options.resolve(ProblemCode::RecordLengthCheckFailed)?;
        self.rules.record_length_checks.push(settings);
        Ok(self)
    }

    /// Registers a record check.
    ///
    /// A [`RecordError::Failed`] may override the rule's code and message and
    /// attach a details payload.
    pub fn add_record_check<F>(&mut self, check: F, options: RuleOptions) -> Result<&mut Self>
    where
        F: Fn(&Record<'_>) -> std::result::Result<(), RecordError> + 'static,
    {
        let (settings, name) = options.resolve(ProblemCode::RecordCheckFailed)?;
        let name =
            name.unwrap_or_else(|| format!("record check #{}", self.rules.record_checks.len() + 1));
        self.rules.record_checks.push(RowRule {
            name,
            settings,
            func: Box::new(check),
        });
        Ok(self)
    }

    /// Registers a record predicate.
    pub fn add_record_predicate<F>(
        &mut self,
        predicate: F,
        options: RuleOptions,
    ) -> Result<&mut Self>
    where
        F: Fn(&Record<'_>) -> anyhow::Result<bool> + 'static,
    {
        let (settings, name) = options.resolve(ProblemCode::RecordPredicateFalse)?;
        let name = name.unwrap_or_else(|| {
            format!("record predicate #{}", self.rules.record_predicates.len() + 1)
        });
        self.rules.record_predicates.push(RowRule {
            name,
            settings,
            func: Box::new(predicate),
        });
        Ok(self)
    }

    /// Registers a uniqueness check on a single field or a compound key.
    ///
    /// The first row carrying a key value is accepted; every later row with
    /// the same value is reported. Sampling does not apply: every data row
    /// is checked and recorded whatever modulus `options` carries.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyKey` for a compound key without fields,
    /// `ConfigError::UnknownField` if any key field is not in the schema and
    /// `ConfigError::InvalidModulus` for a modulus of 0.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowcheck_validator::{RuleOptions, Validator};
    ///
    /// let mut validator = Validator::with_fields(["study_id", "patient_id"]).unwrap();
    /// validator
    ///     .add_unique_check(["study_id", "patient_id"], RuleOptions::new())
    ///     .unwrap();
    /// assert!(validator.add_unique_check("visit", RuleOptions::new()).is_err());
    /// ```
    pub fn add_unique_check(
        &mut self,
        key: impl Into<UniqueKey>,
        options: RuleOptions,
    ) -> Result<&mut Self> {
        let key = key.into();
        let fields = key.fields();
        if fields.is_empty() {
            return Err(ConfigError::EmptyKey);
        }

        let columns = fields
            .iter()
            .map(|field| self.schema().require(field))
            .collect::<Result<Vec<_>>>()?;
        let (settings, _) = options.resolve(ProblemCode::UniqueCheckFailed)?;

        self.rules.unique_checks.push(UniqueCheck {
            key,
            columns,
            settings,
        });
        Ok(self)
    }

    /// Registers a skip predicate. A data row for which any skip predicate
    /// returns true is not checked at all.
    pub fn add_skip<F>(&mut self, skip: F) -> &mut Self
    where
        F: Fn(&[String]) -> anyhow::Result<bool> + 'static,
    {
        let name = format!("skip #{}", self.rules.skips.len() + 1);
        self.rules.skips.push(Skip {
            name,
            func: Box::new(skip),
        });
        self
    }
}
