//! Main validation engine.
//!
//! This module provides the [`Validator`], which owns the schema, the
//! registered rules and the extension hooks, and [`Problems`], the lazy
//! iterator that evaluates one row at a time.
//!
//! Within a data row, rules are evaluated in a fixed phase order: skips,
//! `each` hooks, value checks, record length checks, value predicates,
//! record checks, record predicates, uniqueness checks, `check` hooks and
//! finally `assert` hooks. `finally_assert` hooks run once after the last
//! row.

use crate::classify::{RowKind, classify};
use crate::extension::HookSet;
use crate::rules::{RuleSet, Settings};
use crate::uniqueness::UniqueTracker;
use crate::{AssertionFailure, Record, RecordError, Row, ValueError};
use rowcheck_core::{
    FieldSchema, FieldValue, Problem, ProblemCode, Result, RunOptions, UniqueKey,
    unexpected_message,
};
use std::collections::{BTreeSet, VecDeque};
use std::iter::FusedIterator;
use tracing::{debug, trace};

/// Rule engine for row-oriented data.
///
/// A validator is configured once through the `add_*` methods and can then
/// run over any number of data sources. Runs are independent: uniqueness
/// state is created fresh for every run.
///
/// # Example
///
/// ```rust
/// use rowcheck_core::{ProblemCode, RunOptions};
/// use rowcheck_validator::{checks, RuleOptions, Validator};
///
/// let mut validator = Validator::with_fields(["foo", "bar"]).unwrap();
/// validator
///     .add_value_check("foo", checks::int_value, RuleOptions::new())
///     .unwrap();
///
/// let data = vec![vec!["foo", "bar"], vec!["12", "3.4"], vec!["1.2", "3.4"]];
/// let problems = validator.validate(data, &RunOptions::new());
///
/// assert_eq!(problems.len(), 1);
/// assert_eq!(problems[0].code, ProblemCode::ValueCheckFailed);
/// assert_eq!(problems[0].row, Some(3));
/// ```
pub struct Validator {
    schema: FieldSchema,
    pub(crate) rules: RuleSet,
    pub(crate) hooks: HookSet,
}

impl Validator {
    /// Creates a validator with no rules.
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            schema,
            rules: RuleSet::default(),
            hooks: HookSet::default(),
        }
    }

    /// Creates a validator from field names.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateField` if a name repeats.
    pub fn with_fields<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(FieldSchema::new(names)?))
    }

    /// The expected field names.
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Validates `data` and collects the problems.
    ///
    /// With a non-zero `limit` in `options`, at most `limit` problems are
    /// returned and the rest of the data is not read.
    pub fn validate<I>(&mut self, data: I, options: &RunOptions) -> Vec<Problem>
    where
        I: IntoIterator,
        I::Item: IntoIterator,
        <I::Item as IntoIterator>::Item: Into<String>,
    {
        let limit = options.limit;
        let problems = self.iter_validate(data, options);
        if limit > 0 {
            problems.take(limit).collect()
        } else {
            problems.collect()
        }
    }

    /// Validates `data` lazily.
    ///
    /// Rows are pulled from `data` only as problems are requested. The
    /// validator stays borrowed until the iterator is dropped.
    pub fn iter_validate<I>(&mut self, data: I, options: &RunOptions) -> Problems<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: IntoIterator,
        <I::Item as IntoIterator>::Item: Into<String>,
    {
        debug!(
            fields = self.schema.len(),
            rules = self.rules.len(),
            hooks = self.hooks.len(),
            summarize = options.summarize,
            "Starting validation run"
        );

        let tracker = UniqueTracker::new(self.rules.unique_checks.len());
        Problems {
            validator: self,
            rows: data.into_iter(),
            options: options.clone(),
            index: 0,
            tracker,
            emitter: Emitter::new(options),
            finished: false,
        }
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("schema", &self.schema)
            .field("rules", &self.rules.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// Lazy sequence of problems produced by [`Validator::iter_validate`].
///
/// Problems come out in row order, and within a row in phase order.
pub struct Problems<'a, R> {
    validator: &'a mut Validator,
    rows: R,
    options: RunOptions,
    index: usize,
    tracker: UniqueTracker,
    emitter: Emitter,
    finished: bool,
}

impl<R> Iterator for Problems<'_, R>
where
    R: Iterator,
    R::Item: IntoIterator,
    <R::Item as IntoIterator>::Item: Into<String>,
{
    type Item = Problem;

    fn next(&mut self) -> Option<Problem> {
        loop {
            if let Some(problem) = self.emitter.pending.pop_front() {
                self.emitter.yielded += 1;
                return Some(problem);
            }
            if self.finished {
                return None;
            }

            match self.rows.next() {
                Some(cells) => {
                    let row: Row = cells.into_iter().map(Into::into).collect();
                    let index = self.index;
                    self.index += 1;
                    self.process(index, &row);
                }
                None => self.finish(),
            }
        }
    }
}

impl<R> FusedIterator for Problems<'_, R>
where
    R: Iterator,
    R::Item: IntoIterator,
    <R::Item as IntoIterator>::Item: Into<String>,
{
}

impl<R> Problems<'_, R> {
    fn process(&mut self, index: usize, row: &[String]) {
        let kind = classify(index, &self.options);
        trace!(row = index + 1, ?kind, "Classified row");

        match kind {
            RowKind::Ignored => {}
            RowKind::Header => check_header(
                &self.validator.schema,
                &self.validator.rules,
                &mut self.emitter,
                index,
                row,
            ),
            RowKind::Data => evaluate_row(
                &mut *self.validator,
                &mut self.tracker,
                &mut self.emitter,
                index,
                row,
            ),
        }
    }

    fn finish(&mut self) {
        self.finished = true;

        for hook in &mut self.validator.hooks.finally_assert {
            if let Err(failure) = (hook.func)() {
                let located = Problem::new(ProblemCode::UnexpectedException);
                self.emitter.assertion(
                    failure,
                    ProblemCode::FinallyAssertCheckFailed,
                    &hook.name,
                    located,
                );
            }
        }

        debug!(
            rows = self.index,
            problems = self.emitter.yielded + self.emitter.pending.len(),
            "Finished validation run"
        );
    }
}

/// Applies the run's presentation options to problems and buffers them.
struct Emitter {
    summarize: bool,
    context: Option<serde_json::Value>,
    report_unexpected: bool,
    pending: VecDeque<Problem>,
    yielded: usize,
}

impl Emitter {
    fn new(options: &RunOptions) -> Self {
        Self {
            summarize: options.summarize,
            context: options.context.clone(),
            report_unexpected: options.report_unexpected_exceptions,
            pending: VecDeque::new(),
            yielded: 0,
        }
    }

    fn report(&mut self, problem: Problem) {
        let problem = problem.with_context(self.context.clone());
        self.pending.push_back(if self.summarize {
            problem.into_summary()
        } else {
            problem
        });
    }

    /// Reports a rule violation with the rule's code and message.
    fn violation(&mut self, settings: &Settings, located: Problem) {
        let mut problem = located.with_message(settings.message.clone());
        problem.code = settings.code.clone();
        self.report(problem);
    }

    /// Reports a failure raised by user code, if the run asks for them.
    ///
    /// `located` carries the position of the failure and the
    /// `UNEXPECTED_EXCEPTION` code.
    fn unexpected(&mut self, error: &anyhow::Error, function: &str, located: Problem) {
        let rendered = format!("{error:#}");
        if !self.report_unexpected {
            debug!(function, error = %rendered, "Suppressed unexpected exception");
            return;
        }

        let problem = located
            .with_message(unexpected_message(function, &rendered))
            .with_exception(rendered, function);
        self.report(problem);
    }

    /// Reports a failed record check or `check` hook.
    fn record_failure(
        &mut self,
        error: RecordError,
        settings: &Settings,
        function: &str,
        located: Problem,
    ) {
        match error {
            RecordError::Failed {
                code,
                message,
                details,
            } => {
                let mut problem = located
                    .with_message(message.unwrap_or_else(|| settings.message.clone()))
                    .with_details(details);
                problem.code = code.unwrap_or_else(|| settings.code.clone());
                self.report(problem);
            }
            RecordError::Unexpected(err) => self.unexpected(&err, function, located),
        }
    }

    /// Reports a failed `assert` or `finally_assert` hook.
    fn assertion(
        &mut self,
        failure: AssertionFailure,
        default: ProblemCode,
        function: &str,
        located: Problem,
    ) {
        match failure {
            AssertionFailure::Failed { code, message } => {
                let mut problem = located.with_message(
                    message.unwrap_or_else(|| default.default_message().to_string()),
                );
                problem.code = code.unwrap_or(default);
                self.report(problem);
            }
            AssertionFailure::Unexpected(err) => self.unexpected(&err, function, located),
        }
    }
}

/// Problem positioned on a whole row, coded as an unexpected exception
/// until a rule assigns its own code.
fn at_row(index: usize, row: &[String]) -> Problem {
    Problem::new(ProblemCode::UnexpectedException).at_row(index + 1, row)
}

fn check_header(
    schema: &FieldSchema,
    rules: &RuleSet,
    emitter: &mut Emitter,
    index: usize,
    row: &[String],
) {
    if rules.header_checks.is_empty() || schema.matches(row) {
        return;
    }

    let expected: BTreeSet<String> = schema.names().iter().cloned().collect();
    let actual: BTreeSet<String> = row.iter().cloned().collect();
    let missing: BTreeSet<String> = expected.difference(&actual).cloned().collect();
    let unexpected: BTreeSet<String> = actual.difference(&expected).cloned().collect();

    for settings in &rules.header_checks {
        let located = at_row(index, row).with_header_diff(missing.clone(), unexpected.clone());
        emitter.violation(settings, located);
    }
}

fn evaluate_row(
    validator: &mut Validator,
    tracker: &mut UniqueTracker,
    emitter: &mut Emitter,
    index: usize,
    row: &[String],
) {
    let Validator {
        schema,
        rules,
        hooks,
    } = validator;

    // Skip failures only count when no skip predicate claims the row.
    let mut skip_failures = Vec::new();
    let mut skipped = false;
    for skip in &rules.skips {
        match (skip.func)(row) {
            Ok(true) => skipped = true,
            Ok(false) => {}
            Err(err) => skip_failures.push((err, skip.name.as_str())),
        }
    }
    if skipped {
        trace!(row = index + 1, "Skipped row");
        return;
    }
    for (err, name) in skip_failures {
        emitter.unexpected(&err, name, at_row(index, row));
    }

    let record = Record::new(schema, row);

    for hook in &mut hooks.each {
        if let Err(err) = (hook.func)(&record) {
            emitter.unexpected(&err, &hook.name, at_row(index, row));
        }
    }

    for check in &rules.value_checks {
        if !check.settings.samples(index) {
            continue;
        }
        let Some(value) = row.get(check.column) else {
            continue;
        };

        let located = at_row(index, row).at_field(check.column + 1, &check.field, value);
        match (check.func)(value) {
            Ok(()) => {}
            Err(ValueError::Invalid(_)) => emitter.violation(&check.settings, located),
            Err(ValueError::Unexpected(err)) => emitter.unexpected(&err, &check.name, located),
        }
    }

    for settings in &rules.record_length_checks {
        if settings.samples(index) && row.len() != schema.len() {
            emitter.violation(settings, at_row(index, row).with_length(row.len()));
        }
    }

    for predicate in &rules.value_predicates {
        if !predicate.settings.samples(index) {
            continue;
        }
        let Some(value) = row.get(predicate.column) else {
            continue;
        };

        let located = at_row(index, row).at_field(predicate.column + 1, &predicate.field, value);
        match (predicate.func)(value) {
            Ok(true) => {}
            Ok(false) => emitter.violation(&predicate.settings, located),
            Err(err) => emitter.unexpected(&err, &predicate.name, located),
        }
    }

    for check in &rules.record_checks {
        if !check.settings.samples(index) {
            continue;
        }
        if let Err(error) = (check.func)(&record) {
            emitter.record_failure(error, &check.settings, &check.name, at_row(index, row));
        }
    }

    for predicate in &rules.record_predicates {
        if !predicate.settings.samples(index) {
            continue;
        }
        match (predicate.func)(&record) {
            Ok(true) => {}
            Ok(false) => emitter.violation(&predicate.settings, at_row(index, row)),
            Err(err) => emitter.unexpected(&err, &predicate.name, at_row(index, row)),
        }
    }

    for (slot, check) in rules.unique_checks.iter().enumerate() {
        let Some(key) = check.extract(row) else {
            continue;
        };

        let value = match (&check.key, key.as_slice()) {
            (UniqueKey::Single(_), [single]) => FieldValue::Single(single.clone()),
            _ => FieldValue::Tuple(key.clone()),
        };
        if tracker.observe(slot, key) {
            let located = at_row(index, row).with_key(check.key.clone(), value);
            emitter.violation(&check.settings, located);
        }
    }

    let record_check = Settings {
        code: ProblemCode::RecordCheckFailed,
        message: ProblemCode::RecordCheckFailed.default_message().to_string(),
        modulus: 1,
    };
    for hook in &mut hooks.check {
        if let Err(error) = (hook.func)(&record) {
            emitter.record_failure(error, &record_check, &hook.name, at_row(index, row));
        }
    }

    for hook in &mut hooks.assert {
        if let Err(failure) = (hook.func)(&record) {
            emitter.assertion(
                failure,
                ProblemCode::AssertCheckFailed,
                &hook.name,
                at_row(index, row),
            );
        }
    }
}
