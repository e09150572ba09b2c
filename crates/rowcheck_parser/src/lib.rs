//! Parser for rowcheck rule definitions (YAML/TOML formats).
//!
//! This crate reads declarative validator definitions from YAML and TOML
//! documents into the strongly-typed [`ValidatorDefinition`] structure.
//!
//! # Example
//!
//! ```rust
//! use rowcheck_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: patients
//! fields: [study_id, patient_id, gender]
//! header_check:
//!   code: EX1
//!   message: bad header
//! value_checks:
//!   - field: gender
//!     check:
//!       type: enumeration
//!       values: [M, F]
//!     code: EX5
//! "#;
//!
//! let definition = parse_yaml(yaml).expect("Failed to parse definition");
//! assert_eq!(definition.fields.len(), 3);
//! ```

use rowcheck_core::ValidatorDefinition;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while parsing a definition.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a definition from a YAML string.
pub fn parse_yaml(content: &str) -> Result<ValidatorDefinition> {
    let definition: ValidatorDefinition = serde_yaml_ng::from_str(content)?;
    Ok(definition)
}

/// Parse a definition from a TOML string.
///
/// # Example
///
/// ```rust
/// use rowcheck_parser::parse_toml;
///
/// let toml = r#"
/// fields = ["foo", "bar"]
///
/// [[unique_checks]]
/// key = "foo"
/// "#;
///
/// let definition = parse_toml(toml).unwrap();
/// assert_eq!(definition.unique_checks.len(), 1);
/// ```
pub fn parse_toml(content: &str) -> Result<ValidatorDefinition> {
    let definition: ValidatorDefinition =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(definition)
}

/// Detect the definition format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DefinitionFormat::Yaml`
/// * `.toml` → `DefinitionFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DefinitionFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DefinitionFormat::Yaml),
        "toml" => Ok(DefinitionFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a definition from a file with automatic format detection.
///
/// ```no_run
/// use rowcheck_parser::parse_file;
/// use std::path::Path;
///
/// let definition = parse_file(Path::new("rules/patients.yml")).unwrap();
/// println!("Loaded definition with {} fields", definition.fields.len());
/// ```
pub fn parse_file(path: &Path) -> Result<ValidatorDefinition> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        DefinitionFormat::Yaml => parse_yaml(&content),
        DefinitionFormat::Toml => parse_toml(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rowcheck_core::{CheckKind, NumericKind, RuleSpec, UniqueKey};
    use std::io::Write;

    const PATIENTS_YAML: &str = r#"
name: patients
fields:
  - study_id
  - patient_id
  - gender
  - age_years
  - age_months
  - date_inclusion
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
    message: study id must be an integer
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
  - field: date_inclusion
    check:
      type: datetime
      format: "%Y-%m-%d"
    code: EX7
unique_checks:
  - key: [study_id, patient_id]
options:
  ignore_lines: 1
  summarize: true
"#;

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let definition = parse_yaml("fields: [foo, bar]").expect("Failed to parse valid YAML");

        assert_eq!(definition.name, None);
        assert_eq!(
            definition.fields.names(),
            &["foo".to_string(), "bar".to_string()]
        );
        assert!(definition.header_check.is_none());
        assert!(definition.unique_checks.is_empty());
    }

    #[test]
    fn test_parse_full_yaml() {
        let definition = parse_yaml(PATIENTS_YAML).expect("Failed to parse YAML");

        assert_eq!(definition.name.as_deref(), Some("patients"));
        assert_eq!(definition.fields.len(), 6);
        assert_eq!(
            definition.header_check,
            Some(RuleSpec {
                code: Some("EX1".to_string()),
                message: Some("bad header".to_string()),
                modulus: None,
            })
        );
        assert_eq!(definition.value_checks.len(), 4);
        assert_eq!(definition.value_checks[0].check, CheckKind::Int);
        assert_eq!(
            definition.value_checks[2].check,
            CheckKind::NumberRange {
                min: 0.0,
                max: 120.0,
                inclusive: true,
                numeric: NumericKind::Int,
            }
        );
        assert_eq!(
            definition.unique_checks[0].key,
            UniqueKey::Compound(vec!["study_id".to_string(), "patient_id".to_string()])
        );
        assert_eq!(definition.options.ignore_lines, 1);
        assert!(definition.options.summarize);
        assert!(definition.options.expect_header_row);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_yaml("fields: [foo\n  broken: :");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_missing_fields() {
        let result = parse_yaml("name: nothing");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_yaml_duplicate_fields() {
        let result = parse_yaml("fields: [foo, foo]");
        assert!(matches!(result, Err(ParserError::YamlError(_))));
    }

    #[test]
    fn test_parse_valid_toml() {
        let toml = r#"
name = "toml_rules"
fields = ["foo", "bar"]

[record_length_check]
code = "X2"
modulus = 2

[[value_checks]]
field = "bar"
code = "X3"
check = { type = "search_pattern", regex = "\\d{4}" }

[[unique_checks]]
key = "foo"

[options]
expect_header_row = false
"#;

        let definition = parse_toml(toml).expect("Failed to parse TOML");

        assert_eq!(definition.name.as_deref(), Some("toml_rules"));
        assert_eq!(
            definition.record_length_check.as_ref().and_then(|r| r.modulus),
            Some(2)
        );
        assert_eq!(
            definition.value_checks[0].check,
            CheckKind::SearchPattern {
                regex: "\\d{4}".to_string()
            }
        );
        assert_eq!(
            definition.unique_checks[0].key,
            UniqueKey::Single("foo".to_string())
        );
        assert!(!definition.options.expect_header_row);
    }

    #[test]
    fn test_parse_invalid_toml() {
        let result = parse_toml("fields = [\n[[[invalid syntax");
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("rules.yaml")).unwrap(),
            DefinitionFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("rules.YML")).unwrap(),
            DefinitionFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("rules.toml")).unwrap(),
            DefinitionFormat::Toml
        );
    }

    #[test]
    fn test_detect_format_unsupported() {
        let result = detect_format(Path::new("rules.json"));
        assert!(matches!(
            result.unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_detect_format_no_extension() {
        let result = detect_format(Path::new("rules"));
        assert!(matches!(result.unwrap_err(), ParserError::InvalidExtension));
    }

    #[test]
    fn test_parse_file_yaml() {
        let mut file = tempfile::Builder::new()
            .suffix(".yml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(PATIENTS_YAML.as_bytes()).unwrap();

        let definition = parse_file(file.path()).expect("Failed to parse YAML file");
        assert_eq!(definition.name.as_deref(), Some("patients"));
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("does/not/exist.toml"));
        assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
    }

    #[test]
    fn test_round_trip_yaml() {
        let original = parse_yaml(PATIENTS_YAML).unwrap();

        let yaml = serde_yaml_ng::to_string(&original).expect("Failed to serialize");
        let parsed = parse_yaml(&yaml).expect("Failed to parse");

        assert_eq!(parsed, original);
    }
}
