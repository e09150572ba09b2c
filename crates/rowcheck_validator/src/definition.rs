//! Building validators from declarative definitions.

use crate::rules::ValueCheckFn;
use crate::{RuleOptions, Validator, ValueError, checks};
use rowcheck_core::{CheckKind, NumericKind, Result, ValidatorDefinition};
use tracing::debug;

impl Validator {
    /// Builds a validator from a rule definition.
    ///
    /// Rules are registered in the order header check, record length check,
    /// value checks, value predicates, uniqueness checks. The definition's
    /// run options are not applied; pass `definition.options` to the run.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`](rowcheck_core::ConfigError) raised
    /// while registering the rules.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rowcheck_core::ValidatorDefinition;
    /// use rowcheck_validator::Validator;
    ///
    /// let definition: ValidatorDefinition = serde_json::from_str(r#"{
    ///     "fields": ["foo"],
    ///     "value_checks": [{"field": "foo", "check": {"type": "int"}}]
    /// }"#).unwrap();
    ///
    /// let mut validator = Validator::from_definition(&definition).unwrap();
    /// let problems = validator.validate(vec![vec!["foo"], vec!["x"]], &definition.options);
    /// assert_eq!(problems.len(), 1);
    /// ```
    pub fn from_definition(definition: &ValidatorDefinition) -> Result<Self> {
        let mut validator = Validator::new(definition.fields.clone());

        if let Some(spec) = &definition.header_check {
            validator.add_header_check(spec.into())?;
        }
        if let Some(spec) = &definition.record_length_check {
            validator.add_record_length_check(spec.into())?;
        }

        for rule in &definition.value_checks {
            let check = build_check(&rule.check)?;
            let options = RuleOptions::from(&rule.spec)
                .with_name(format!("{} check on '{}'", kind_name(&rule.check), rule.field));
            validator.add_value_check(&rule.field, check, options)?;
        }

        for rule in &definition.value_predicates {
            let check = build_check(&rule.check)?;
            let options = RuleOptions::from(&rule.spec).with_name(format!(
                "{} predicate on '{}'",
                kind_name(&rule.check),
                rule.field
            ));
            validator.add_value_predicate(
                &rule.field,
                move |value| match check(value) {
                    Ok(()) => Ok(true),
                    Err(ValueError::Invalid(_)) => Ok(false),
                    Err(ValueError::Unexpected(err)) => Err(err),
                },
                options,
            )?;
        }

        for rule in &definition.unique_checks {
            validator.add_unique_check(rule.key.clone(), (&rule.spec).into())?;
        }

        debug!(
            name = definition.name.as_deref().unwrap_or("<unnamed>"),
            fields = definition.fields.len(),
            rules = validator.rules.len(),
            "Built validator from definition"
        );

        Ok(validator)
    }
}

/// Turns a declarative check into a value check.
fn build_check(kind: &CheckKind) -> Result<Box<ValueCheckFn>> {
    let check: Box<ValueCheckFn> = match kind {
        CheckKind::Int => Box::new(checks::int_value),
        CheckKind::Float => Box::new(checks::float_value),
        CheckKind::Enumeration { values } => Box::new(checks::enumeration(values.clone())?),
        CheckKind::MatchPattern { regex } => Box::new(checks::match_pattern(regex)?),
        CheckKind::SearchPattern { regex } => Box::new(checks::search_pattern(regex)?),
        CheckKind::NumberRange {
            min,
            max,
            inclusive,
            numeric,
        } => {
            let coerce: fn(&str) -> std::result::Result<f64, ValueError> = match numeric {
                NumericKind::Int => parse_int_as_float,
                NumericKind::Float => parse_float,
            };
            if *inclusive {
                Box::new(checks::number_range_inclusive_with(*min, *max, coerce))
            } else {
                Box::new(checks::number_range_exclusive_with(*min, *max, coerce))
            }
        }
        CheckKind::Datetime { format } => Box::new(checks::datetime_string(format)),
        CheckKind::DatetimeRange {
            min,
            max,
            format,
            inclusive,
        } => {
            if *inclusive {
                Box::new(checks::datetime_range_inclusive(min, max, format)?)
            } else {
                Box::new(checks::datetime_range_exclusive(min, max, format)?)
            }
        }
    };
    Ok(check)
}

fn kind_name(kind: &CheckKind) -> &'static str {
    match kind {
        CheckKind::Int => "int",
        CheckKind::Float => "float",
        CheckKind::Enumeration { .. } => "enumeration",
        CheckKind::MatchPattern { .. } => "match_pattern",
        CheckKind::SearchPattern { .. } => "search_pattern",
        CheckKind::NumberRange { .. } => "number_range",
        CheckKind::Datetime { .. } => "datetime",
        CheckKind::DatetimeRange { .. } => "datetime_range",
    }
}

fn parse_int_as_float(value: &str) -> std::result::Result<f64, ValueError> {
    Ok(value.trim().parse::<i64>()? as f64)
}

fn parse_float(value: &str) -> std::result::Result<f64, ValueError> {
    Ok(value.trim().parse::<f64>()?)
}
