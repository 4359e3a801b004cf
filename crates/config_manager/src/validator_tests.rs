//! Tests for the configuration validator.

use super::*;
use drift_core::{ApplicationGroup, Namespace, TeamProject};
use uuid::Uuid;

fn baseline() -> Pattern {
    Pattern::from(
        SecurityPattern::new("Baseline").with_application_group(
            ApplicationGroup::new("[{teamProject.Name}]\\Contributors")
                .with_members(["{teamProject.Name} Team"])
                .with_namespace(Namespace::new("Git Repositories").with_allow(["Read"])),
        ),
    )
}

fn valid_config() -> DriftConfiguration {
    let mut config = DriftConfiguration::default();
    config.organization.patterns.push(baseline());
    config
        .organization
        .team_projects
        .push(TeamProject::named("Storefront").with_key("web"));
    config
        .organization
        .mappings
        .insert("web".to_string(), "Baseline".to_string());
    config
}

fn field_paths(errors: &[ValidationError]) -> Vec<&str> {
    errors.iter().map(|e| e.field_path.as_str()).collect()
}

// ============================================================================
// ValidationResult Tests
// ============================================================================

#[test]
fn test_validation_result_new_is_valid() {
    let result = ValidationResult::new();
    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

/// Verify validation result remains valid with only warnings.
#[test]
fn test_validation_result_valid_with_warnings() {
    let mut result = ValidationResult::new();
    result.add_warning(ValidationWarning {
        field_path: "mappings.web".to_string(),
        message: "Test warning".to_string(),
    });

    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_validation_error_display_includes_suggestion() {
    let error = ValidationError {
        error_type: ValidationErrorType::UnknownReference,
        field_path: "mappings.web".to_string(),
        message: "Mapping refers to unknown pattern 'Nope'".to_string(),
        suggestion: Some("Declare the pattern".to_string()),
    };

    assert_eq!(
        error.to_string(),
        "mappings.web: Mapping refers to unknown pattern 'Nope' (Declare the pattern)"
    );
    assert_eq!(error.error_type.to_string(), "UnknownReference");
}

// ============================================================================
// ConfigurationValidator Tests
// ============================================================================

#[test]
fn test_valid_configuration_passes() {
    let result = ConfigurationValidator::new().validate(&valid_config());

    assert!(result.is_valid(), "unexpected errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_empty_configuration_passes() {
    let result = ConfigurationValidator::new().validate(&DriftConfiguration::default());

    assert!(result.is_valid());
}

#[test]
fn test_blank_team_project_name_is_required() {
    let mut config = valid_config();
    config
        .organization
        .team_projects
        .push(TeamProject::named("  "));

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(field_paths(&result.errors), vec!["team_projects[1].name"]);
    assert_eq!(
        result.errors[0].error_type,
        ValidationErrorType::RequiredFieldMissing
    );
}

#[test]
fn test_duplicate_keys_are_rejected_case_insensitively() {
    let mut config = valid_config();
    config
        .organization
        .team_projects
        .push(TeamProject::named("Backoffice").with_key("WEB"));

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(field_paths(&result.errors), vec!["team_projects[1].key"]);
    assert_eq!(result.errors[0].error_type, ValidationErrorType::DuplicateValue);
    assert!(result.errors[0].message.contains("team_projects[0]"));
}

#[test]
fn test_empty_keys_may_repeat() {
    let mut config = valid_config();
    config
        .organization
        .team_projects
        .push(TeamProject::named("Backoffice"));
    config
        .organization
        .team_projects
        .push(TeamProject::named("Billing"));

    let result = ConfigurationValidator::new().validate(&config);

    assert!(result.is_valid());
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let id = Uuid::new_v4();
    let mut config = DriftConfiguration::default();
    config
        .organization
        .team_projects
        .push(TeamProject::new(id, "Storefront"));
    config
        .organization
        .team_projects
        .push(TeamProject::new(id, "Storefront Copy"));

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(field_paths(&result.errors), vec!["team_projects[1].id"]);
}

#[test]
fn test_duplicate_pattern_names_are_rejected() {
    let mut config = valid_config();
    config
        .organization
        .patterns
        .push(Pattern::from(SecurityPattern::new("baseline")));

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(field_paths(&result.errors), vec!["patterns[1].name"]);
}

#[test]
fn test_blank_names_inside_patterns_are_required() {
    let mut config = DriftConfiguration::default();
    config.organization.patterns.push(Pattern::from(
        SecurityPattern::new("").with_application_group(
            ApplicationGroup::new("")
                .with_members(["Alice", " "])
                .with_namespace(Namespace::new("")),
        ),
    ));

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(
        field_paths(&result.errors),
        vec![
            "patterns[0].name",
            "patterns[0].application_groups[0].name",
            "patterns[0].application_groups[0].members[1]",
            "patterns[0].application_groups[0].namespaces[0].name",
        ]
    );
}

#[test]
fn test_mapping_to_unknown_pattern_is_an_error() {
    let mut config = valid_config();
    config
        .organization
        .mappings
        .insert("web".to_string(), "Hardened".to_string());

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(field_paths(&result.errors), vec!["mappings.web"]);
    assert_eq!(
        result.errors[0].error_type,
        ValidationErrorType::UnknownReference
    );
}

#[test]
fn test_mapping_pattern_lookup_ignores_case() {
    let mut config = valid_config();
    config
        .organization
        .mappings
        .insert("web".to_string(), "BASELINE".to_string());

    let result = ConfigurationValidator::new().validate(&config);

    assert!(result.is_valid());
}

#[test]
fn test_mapping_without_team_project_is_a_warning() {
    let mut config = valid_config();
    config
        .organization
        .mappings
        .insert("api".to_string(), "Baseline".to_string());

    let result = ConfigurationValidator::new().validate(&config);

    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].field_path, "mappings.api");
}

#[test]
fn test_mapping_key_matches_team_project_ignoring_case() {
    let mut config = valid_config();
    config.organization.team_projects[0].key = "WEB".to_string();

    let result = ConfigurationValidator::new().validate(&config);

    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_mapping_keys_differing_only_in_case_are_rejected() {
    let mut config = valid_config();
    config
        .organization
        .mappings
        .insert("Web".to_string(), "Baseline".to_string());

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(field_paths(&result.errors), vec!["mappings.web"]);
    assert_eq!(result.errors[0].error_type, ValidationErrorType::DuplicateValue);
    assert!(result.errors[0].message.contains("'Web'"));
}

#[test]
fn test_non_http_url_is_rejected() {
    let mut config = valid_config();
    config.connection.organization_url = Some("ftp://dev.azure.com/contoso".parse().unwrap());

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(
        field_paths(&result.errors),
        vec!["connection.organization_url"]
    );
    assert_eq!(result.errors[0].error_type, ValidationErrorType::InvalidValue);
}

#[test]
fn test_zero_timeout_is_rejected() {
    let mut config = valid_config();
    config.connection.timeout_seconds = 0;

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(
        field_paths(&result.errors),
        vec!["connection.timeout_seconds"]
    );
}

#[test]
fn test_blank_special_group_is_rejected() {
    let mut config = valid_config();
    config.connection.special_groups.push(String::new());

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(
        field_paths(&result.errors),
        vec!["connection.special_groups[1]"]
    );
}

#[test]
fn test_tokens_in_project_level_pattern_warn() {
    let mut config = DriftConfiguration::default();
    config
        .organization
        .team_projects
        .push(TeamProject::named("Storefront").with_pattern(baseline()));

    let result = ConfigurationValidator::new().validate(&config);

    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(
        result.warnings[0].field_path,
        "team_projects[0].patterns[0].application_groups[0]"
    );
}

#[test]
fn test_all_errors_are_collected() {
    let mut config = valid_config();
    config.connection.timeout_seconds = 0;
    config
        .organization
        .team_projects
        .push(TeamProject::named(""));
    config
        .organization
        .mappings
        .insert("web".to_string(), "Missing".to_string());

    let result = ConfigurationValidator::new().validate(&config);

    assert_eq!(result.errors.len(), 3);
}
