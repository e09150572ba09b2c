//! Row classification.
//!
//! A data source is laid out as an optional preamble to skip, then an
//! optional header row, then data rows.

use rowcheck_core::RunOptions;

/// Role of a row within a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    /// The header row; only header checks apply
    Header,
    /// A preamble row; never evaluated
    Ignored,
    /// A row subject to every other rule
    Data,
}

/// Classifies the row at 0-based `index`.
///
/// The header row sits directly after the ignored preamble, so with no
/// preamble the first row is the header.
pub fn classify_row(index: usize, expect_header_row: bool, ignore_lines: usize) -> RowKind {
    if expect_header_row && index == ignore_lines {
        RowKind::Header
    } else if index < ignore_lines {
        RowKind::Ignored
    } else {
        RowKind::Data
    }
}

/// Classifies a row using the layout settings of `options`.
pub fn classify(index: usize, options: &RunOptions) -> RowKind {
    classify_row(index, options.expect_header_row, options.ignore_lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_row_is_header_by_default() {
        let options = RunOptions::new();

        assert_eq!(classify(0, &options), RowKind::Header);
        assert_eq!(classify(1, &options), RowKind::Data);
        assert_eq!(classify(2, &options), RowKind::Data);
    }

    #[test]
    fn test_header_follows_ignored_lines() {
        assert_eq!(classify_row(0, true, 2), RowKind::Ignored);
        assert_eq!(classify_row(1, true, 2), RowKind::Ignored);
        assert_eq!(classify_row(2, true, 2), RowKind::Header);
        assert_eq!(classify_row(3, true, 2), RowKind::Data);
    }

    #[test]
    fn test_no_header() {
        assert_eq!(classify_row(0, false, 0), RowKind::Data);
        assert_eq!(classify_row(0, false, 1), RowKind::Ignored);
        assert_eq!(classify_row(1, false, 1), RowKind::Data);
    }
}
