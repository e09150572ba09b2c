//! Options controlling a single validation run.

use serde::{Deserialize, Serialize};

/// Options for one validation run.
///
/// The defaults describe the common case: the first row is a header, no
/// preamble is skipped, problems are reported in full, there is no limit, and
/// failures raised by user code are reported as problems.
///
/// # Example
///
/// ```rust
/// use rowcheck_core::RunOptions;
/// use serde_json::json;
///
/// let options = RunOptions::new()
///     .with_ignore_lines(2)
///     .with_limit(100)
///     .with_context(json!({"file": "patients.tsv"}));
///
/// assert!(options.expect_header_row);
/// assert_eq!(options.limit, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    /// Whether the row at `ignore_lines` is a header row
    pub expect_header_row: bool,

    /// Number of leading rows that are never evaluated
    pub ignore_lines: usize,

    /// Reduce every problem to its code (and context)
    pub summarize: bool,

    /// Maximum number of problems collected by an eager run; 0 means no limit
    pub limit: usize,

    /// Opaque value attached to every problem of the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,

    /// Report failures raised by user code as problems instead of dropping them
    pub report_unexpected_exceptions: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            expect_header_row: true,
            ignore_lines: 0,
            summarize: false,
            limit: 0,
            context: None,
            report_unexpected_exceptions: true,
        }
    }
}

impl RunOptions {
    /// Creates run options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether a header row is expected.
    pub fn with_header_row(mut self, expect_header_row: bool) -> Self {
        self.expect_header_row = expect_header_row;
        self
    }

    /// Sets the number of leading rows to ignore.
    pub fn with_ignore_lines(mut self, ignore_lines: usize) -> Self {
        self.ignore_lines = ignore_lines;
        self
    }

    /// Sets summarize mode.
    pub fn with_summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    /// Sets the problem limit for eager runs.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the caller context.
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Sets whether unexpected exceptions are reported.
    pub fn with_unexpected_exceptions(mut self, report: bool) -> Self {
        self.report_unexpected_exceptions = report;
        self
    }
}
