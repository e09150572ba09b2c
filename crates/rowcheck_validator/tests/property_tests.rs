//! Property-based tests for the validation engine.
//!
//! Each property generates random rows, computes the expected outcome
//! independently and compares it with what the engine reports:
//! - Sampling: a rule with modulus `m` only sees rows whose index is a multiple of `m`
//! - Uniqueness: first occurrences are never reported, every repeat is
//! - Summaries keep the code sequence of the full report
//! - Limits truncate the eager report without reordering it

use proptest::prelude::*;
use rowcheck_core::{ProblemCode, RunOptions};
use rowcheck_validator::{RuleOptions, Validator, checks};
use std::collections::HashSet;

fn single_column(values: &[String]) -> Vec<Vec<String>> {
    values.iter().map(|v| vec![v.clone()]).collect()
}

fn no_header() -> RunOptions {
    RunOptions::new().with_header_row(false)
}

proptest! {
    /// Every row fails the int check, so the reported rows are exactly the sampled ones.
    #[test]
    fn prop_sampling_modulus_selects_rows(
        num_rows in 0usize..200,
        modulus in 1usize..10
    ) {
        let mut validator = Validator::with_fields(["foo"]).unwrap();
        validator
            .add_value_check("foo", checks::int_value, RuleOptions::new().with_modulus(modulus))
            .unwrap();

        let data: Vec<Vec<String>> = (0..num_rows).map(|_| vec!["x".to_string()]).collect();
        let problems = validator.validate(data, &no_header());

        let rows: Vec<usize> = problems.iter().filter_map(|p| p.row).collect();
        let expected: Vec<usize> = (0..num_rows)
            .filter(|index| index % modulus == 0)
            .map(|index| index + 1)
            .collect();
        prop_assert_eq!(rows, expected);
    }

    #[test]
    fn prop_unique_reports_repeats_only(values in prop::collection::vec("[a-d]", 0..100)) {
        let mut validator = Validator::with_fields(["foo"]).unwrap();
        validator.add_unique_check("foo", RuleOptions::new()).unwrap();

        let problems = validator.validate(single_column(&values), &no_header());

        let distinct: HashSet<&String> = values.iter().collect();
        prop_assert_eq!(problems.len(), values.len() - distinct.len());
        prop_assert!(problems.iter().all(|p| p.code == ProblemCode::UniqueCheckFailed));

        let mut seen = HashSet::new();
        let expected: Vec<usize> = values
            .iter()
            .enumerate()
            .filter(|(_, value)| !seen.insert(*value))
            .map(|(index, _)| index + 1)
            .collect();
        let rows: Vec<usize> = problems.iter().filter_map(|p| p.row).collect();
        prop_assert_eq!(rows, expected);
    }

    #[test]
    fn prop_summaries_keep_codes(values in prop::collection::vec("[0-9x]{1,3}", 0..60)) {
        let mut validator = Validator::with_fields(["foo"]).unwrap();
        validator
            .add_value_check("foo", checks::int_value, RuleOptions::new())
            .unwrap()
            .add_unique_check("foo", RuleOptions::new())
            .unwrap();

        let full = validator.validate(single_column(&values), &no_header());
        let summary = validator.validate(single_column(&values), &no_header().with_summarize(true));

        let full_codes: Vec<_> = full.iter().map(|p| p.code.clone()).collect();
        let summary_codes: Vec<_> = summary.iter().map(|p| p.code.clone()).collect();
        prop_assert_eq!(full_codes, summary_codes);
        prop_assert!(summary.iter().all(|p| p.is_summary()));
    }

    #[test]
    fn prop_limit_is_a_prefix(
        values in prop::collection::vec("[0-9x]{1,2}", 0..60),
        limit in 1usize..20
    ) {
        let mut validator = Validator::with_fields(["foo"]).unwrap();
        validator
            .add_value_check("foo", checks::int_value, RuleOptions::new())
            .unwrap()
            .add_unique_check("foo", RuleOptions::new())
            .unwrap();

        let full = validator.validate(single_column(&values), &no_header());
        let limited = validator.validate(single_column(&values), &no_header().with_limit(limit));

        prop_assert!(limited.len() <= limit);
        prop_assert_eq!(limited.len(), full.len().min(limit));
        prop_assert_eq!(&limited[..], &full[..limited.len()]);
    }

    #[test]
    fn prop_range_check_agrees_with_comparison(value in -1000i64..1000) {
        let check = checks::number_range_inclusive::<i64>(-100, 100);
        prop_assert_eq!(check(&value.to_string()).is_ok(), (-100..=100).contains(&value));

        let open = checks::number_range_exclusive::<i64>(-100, 100);
        prop_assert_eq!(open(&value.to_string()).is_ok(), value > -100 && value < 100);
    }
}
