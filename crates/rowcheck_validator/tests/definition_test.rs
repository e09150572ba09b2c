//! Integration tests for validators built from YAML and TOML definitions.

use pretty_assertions::assert_eq;
use rowcheck_core::{FieldValue, ProblemCode};
use rowcheck_parser::{parse_toml, parse_yaml};
use rowcheck_validator::Validator;

const PATIENTS_YAML: &str = r#"
name: patients
fields: [study_id, patient_id, gender, age_years, date_inclusion]
header_check:
  code: EX1
  message: bad header
record_length_check:
  code: EX2
  message: unexpected record length
value_checks:
  - field: study_id
    check: { type: int }
    code: EX3
    message: invalid study id
  - field: gender
    check:
      type: enumeration
      values: [M, F]
    code: EX5
    message: invalid gender
  - field: age_years
    check:
      type: number_range
      min: 0
      max: 120
      numeric: int
    code: EX6
    message: invalid age
  - field: date_inclusion
    check:
      type: datetime
      format: "%Y-%m-%d"
    code: EX7
    message: invalid date
value_predicates:
  - field: patient_id
    check:
      type: match_pattern
      regex: "P\\d+"
    code: EX4
    message: invalid patient id
unique_checks:
  - key: [study_id, patient_id]
    code: EX8
    message: duplicate patient
options:
  summarize: false
"#;

#[test]
fn test_patients_definition() {
    let definition = parse_yaml(PATIENTS_YAML).expect("Failed to parse YAML");
    let mut validator = Validator::from_definition(&definition).expect("Invalid definition");

    let data = vec![
        vec!["study_id", "patient_id", "gender", "age_years", "date_inclusion"],
        vec!["1", "P1", "M", "34", "2011-02-03"],
        vec!["x", "P2", "F", "34", "2011-02-03"],
        vec!["1", "Q3", "F", "34", "2011-02-03"],
        vec!["1", "P4", "X", "34", "2011-02-03"],
        vec!["1", "P5", "F", "34.5", "2011-02-03"],
        vec!["1", "P6", "F", "34", "2011-02-30"],
        vec!["1", "P1", "M", "34", "2011-02-03"],
        vec!["1", "P7", "M", "34"],
    ];

    let problems = validator.validate(data, &definition.options);

    let found: Vec<_> = problems
        .iter()
        .map(|p| (p.row.unwrap(), p.code.to_string()))
        .collect();
    assert_eq!(
        found,
        vec![
            (3, "EX3".to_string()),
            (4, "EX4".to_string()),
            (5, "EX5".to_string()),
            (6, "EX6".to_string()),
            (7, "EX7".to_string()),
            (8, "EX8".to_string()),
            (9, "EX2".to_string()),
        ]
    );

    let duplicate = &problems[5];
    assert_eq!(duplicate.message.as_deref(), Some("duplicate patient"));
    assert_eq!(
        duplicate.value,
        Some(FieldValue::Tuple(vec!["1".to_string(), "P1".to_string()]))
    );
}

#[test]
fn test_header_from_definition() {
    let definition = parse_yaml(PATIENTS_YAML).unwrap();
    let mut validator = Validator::from_definition(&definition).unwrap();

    let problems = validator.validate(
        vec![vec!["study_id", "patient", "gender", "age_years", "date_inclusion"]],
        &definition.options,
    );

    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].code, ProblemCode::custom("EX1"));
    assert_eq!(problems[0].message.as_deref(), Some("bad header"));
}

#[test]
fn test_toml_definition_with_options() {
    let toml = r#"
fields = ["foo", "bar"]

[[value_checks]]
field = "bar"
check = { type = "search_pattern", regex = "\\d{4}" }
modulus = 2

[[unique_checks]]
key = "foo"

[options]
expect_header_row = false
summarize = true
limit = 2
"#;

    let definition = parse_toml(toml).expect("Failed to parse TOML");
    let mut validator = Validator::from_definition(&definition).unwrap();

    let data = vec![
        vec!["1", "x"],
        vec!["2", "x"],
        vec!["1", "x"],
        vec!["1", "x"],
        vec!["1", "x"],
    ];
    let problems = validator.validate(data, &definition.options);

    let codes: Vec<_> = problems.iter().map(|p| p.code.clone()).collect();
    assert_eq!(
        codes,
        vec![ProblemCode::ValueCheckFailed, ProblemCode::ValueCheckFailed]
    );
    assert!(problems.iter().all(|p| p.is_summary()));
}
