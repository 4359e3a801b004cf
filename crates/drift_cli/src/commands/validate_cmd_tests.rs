//! Tests for the validate command.

use super::*;
use std::io::Write;

fn config_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

#[test]
fn test_validate_accepts_valid_file() {
    let file = config_file(
        ".toml",
        r#"
[[team_projects]]
name = "Storefront"
key = "web"

[[patterns]]
type = "security"
name = "Baseline"

[mappings]
web = "Baseline"
"#,
    );

    let result = execute(&ValidateArgs {
        config_file: file.path().to_path_buf(),
    });

    assert!(result.is_ok());
}

#[test]
fn test_validate_reports_errors() {
    let file = config_file(".json", r#"{ "team_projects": [{ "name": "" }] }"#);

    let result = execute(&ValidateArgs {
        config_file: file.path().to_path_buf(),
    });

    match result {
        Err(Error::Config(ConfigurationError::ValidationFailed { errors, .. })) => {
            assert_eq!(errors[0].field_path, "team_projects[0].name");
        }
        other => panic!("Expected ValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_validate_missing_file() {
    let result = execute(&ValidateArgs {
        config_file: PathBuf::from("/nonexistent/drift.toml"),
    });

    assert!(matches!(
        result,
        Err(Error::Config(ConfigurationError::FileNotFound { .. }))
    ));
}

#[test]
fn test_format_success_lists_warnings() {
    colored::control::set_override(false);
    let warnings = vec![ValidationWarning {
        field_path: "mappings.api".to_string(),
        message: "No team project has the key 'api'".to_string(),
    }];

    let output = format_success("drift.toml", &warnings);

    assert!(output.contains("✓ Configuration is VALID: drift.toml"));
    assert!(output.contains("⚠ mappings.api: No team project has the key 'api'"));
}

#[test]
fn test_format_failure_lists_errors() {
    colored::control::set_override(false);
    let errors = vec![ValidationError {
        error_type: config_manager::ValidationErrorType::RequiredFieldMissing,
        field_path: "team_projects[0].name".to_string(),
        message: "Team project name is required".to_string(),
        suggestion: None,
    }];

    let output = format_failure(&errors);

    assert!(output.contains("FAILED"));
    assert!(output.contains("✗ team_projects[0].name: Team project name is required"));
}
