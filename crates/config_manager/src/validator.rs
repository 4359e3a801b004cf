//! Configuration validation.
//!
//! [`ConfigurationValidator`] checks a loaded [`DriftConfiguration`] for
//! mistakes serde cannot catch: blank names, duplicate keys, and mappings that
//! point at templates that do not exist. Keys and pattern names compare
//! without regard to case. All problems are collected in a single pass.
//!
//! # Examples
//!
//! ```rust
//! use config_manager::{ValidationResult, ValidationError, ValidationErrorType};
//!
//! let mut result = ValidationResult::new();
//!
//! result.add_error(ValidationError {
//!     error_type: ValidationErrorType::RequiredFieldMissing,
//!     field_path: "patterns[0].name".to_string(),
//!     message: "Pattern name is required".to_string(),
//!     suggestion: None,
//! });
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.errors.len(), 1);
//! ```

use drift_core::{contains_tokens, Pattern, SecurityPattern};
use std::collections::{HashMap, HashSet};

use crate::DriftConfiguration;

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;

/// Result of configuration validation.
///
/// Validation is considered successful only if no errors are present.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors (blocking issues).
    pub errors: Vec<ValidationError>,
    /// List of validation warnings (non-blocking suggestions).
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// Individual validation error with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The category of validation error.
    pub error_type: ValidationErrorType,
    /// Path to the field that failed validation, e.g. `patterns[1].name`.
    pub field_path: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field_path, self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " ({})", suggestion)?;
        }
        Ok(())
    }
}

/// Validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorType {
    /// A required field is missing or blank.
    RequiredFieldMissing,
    /// A field value is invalid (wrong scheme, out of range, etc.).
    InvalidValue,
    /// A value that must be unique appears more than once.
    DuplicateValue,
    /// A reference points at something that does not exist.
    UnknownReference,
}

impl std::fmt::Display for ValidationErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequiredFieldMissing => write!(f, "RequiredFieldMissing"),
            Self::InvalidValue => write!(f, "InvalidValue"),
            Self::DuplicateValue => write!(f, "DuplicateValue"),
            Self::UnknownReference => write!(f, "UnknownReference"),
        }
    }
}

/// Non-blocking validation warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Path to the field that triggered the warning.
    pub field_path: String,
    /// Human-readable warning message.
    pub message: String,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field_path, self.message)
    }
}

/// Validates drift configurations.
#[derive(Debug, Default)]
pub struct ConfigurationValidator;

impl ConfigurationValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validates the whole configuration.
    pub fn validate(&self, config: &DriftConfiguration) -> ValidationResult {
        let mut result = ValidationResult::new();

        self.validate_connection(config, &mut result);
        self.validate_team_projects(config, &mut result);
        self.validate_patterns(config, &mut result);
        self.validate_mappings(config, &mut result);

        result
    }

    fn validate_connection(&self, config: &DriftConfiguration, result: &mut ValidationResult) {
        let connection = &config.connection;

        let urls = [
            ("connection.organization_url", &connection.organization_url),
            ("connection.graph_url", &connection.graph_url),
        ];
        for (field_path, url) in urls {
            if let Some(url) = url {
                if !matches!(url.scheme(), "http" | "https") {
                    result.add_error(ValidationError {
                        error_type: ValidationErrorType::InvalidValue,
                        field_path: field_path.to_string(),
                        message: format!("URL '{}' must use http or https", url),
                        suggestion: Some("Use a URL like https://dev.azure.com/contoso".to_string()),
                    });
                }
            }
        }

        if connection.timeout_seconds == 0 {
            result.add_error(ValidationError {
                error_type: ValidationErrorType::InvalidValue,
                field_path: "connection.timeout_seconds".to_string(),
                message: "Timeout must be greater than zero".to_string(),
                suggestion: None,
            });
        }

        for (index, name) in connection.special_groups.iter().enumerate() {
            if name.trim().is_empty() {
                result.add_error(required(
                    format!("connection.special_groups[{}]", index),
                    "Special group name must not be blank",
                ));
            }
        }
    }

    fn validate_team_projects(&self, config: &DriftConfiguration, result: &mut ValidationResult) {
        let mut keys = HashMap::new();
        let mut ids = HashMap::new();

        for (index, team_project) in config.organization.team_projects.iter().enumerate() {
            let path = format!("team_projects[{}]", index);

            if team_project.name.trim().is_empty() {
                result.add_error(required(
                    format!("{}.name", path),
                    "Team project name is required",
                ));
            }

            if !team_project.key.is_empty() {
                if let Some(first) = keys.insert(team_project.key.to_lowercase(), index) {
                    result.add_error(duplicate(
                        format!("{}.key", path),
                        format!(
                            "Key '{}' is already used by team_projects[{}]",
                            team_project.key, first
                        ),
                    ));
                }
            }

            if let Some(id) = team_project.id {
                if let Some(first) = ids.insert(id, index) {
                    result.add_error(duplicate(
                        format!("{}.id", path),
                        format!("Id '{}' is already used by team_projects[{}]", id, first),
                    ));
                }
            }

            for (pattern_index, pattern) in team_project.patterns.iter().enumerate() {
                let pattern_path = format!("{}.patterns[{}]", path, pattern_index);
                self.validate_pattern(pattern, &pattern_path, result);
                warn_unexpanded_tokens(pattern, &pattern_path, result);
            }
        }
    }

    fn validate_patterns(&self, config: &DriftConfiguration, result: &mut ValidationResult) {
        let mut names = HashMap::new();

        for (index, pattern) in config.organization.patterns.iter().enumerate() {
            let path = format!("patterns[{}]", index);
            self.validate_pattern(pattern, &path, result);

            if let Some(first) = names.insert(pattern.name().to_lowercase(), index) {
                result.add_error(duplicate(
                    format!("{}.name", path),
                    format!(
                        "Pattern name '{}' is already used by patterns[{}]",
                        pattern.name(),
                        first
                    ),
                ));
            }
        }
    }

    fn validate_pattern(&self, pattern: &Pattern, path: &str, result: &mut ValidationResult) {
        if pattern.name().trim().is_empty() {
            result.add_error(required(
                format!("{}.name", path),
                "Pattern name is required",
            ));
        }

        match pattern {
            Pattern::Security(security) => self.validate_security_pattern(security, path, result),
        }
    }

    fn validate_security_pattern(
        &self,
        pattern: &SecurityPattern,
        path: &str,
        result: &mut ValidationResult,
    ) {
        for (group_index, group) in pattern.application_groups.iter().enumerate() {
            let group_path = format!("{}.application_groups[{}]", path, group_index);

            if group.name.trim().is_empty() {
                result.add_error(required(
                    format!("{}.name", group_path),
                    "Application group name is required",
                ));
            }

            for (member_index, member) in group.members.iter().enumerate() {
                if member.trim().is_empty() {
                    result.add_error(required(
                        format!("{}.members[{}]", group_path, member_index),
                        "Member name must not be blank",
                    ));
                }
            }

            for (namespace_index, namespace) in group.namespaces.iter().enumerate() {
                if namespace.name.trim().is_empty() {
                    result.add_error(required(
                        format!("{}.namespaces[{}].name", group_path, namespace_index),
                        "Namespace name is required",
                    ));
                }
            }
        }
    }

    fn validate_mappings(&self, config: &DriftConfiguration, result: &mut ValidationResult) {
        let organization = &config.organization;
        let keys: HashSet<String> = organization
            .team_projects
            .iter()
            .map(|tp| tp.key.to_lowercase())
            .collect();
        let mut mapped: HashMap<String, &str> = HashMap::new();

        for (key, pattern_name) in &organization.mappings {
            let path = format!("mappings.{}", key);

            if let Some(first) = mapped.insert(key.to_lowercase(), key.as_str()) {
                result.add_error(duplicate(
                    path.clone(),
                    format!("Key '{}' is already mapped as '{}'", key, first),
                ));
            }

            let known = organization
                .patterns
                .iter()
                .any(|p| p.name().eq_ignore_ascii_case(pattern_name));
            if !known {
                result.add_error(ValidationError {
                    error_type: ValidationErrorType::UnknownReference,
                    field_path: path.clone(),
                    message: format!("Mapping refers to unknown pattern '{}'", pattern_name),
                    suggestion: Some("Declare the pattern under [[patterns]]".to_string()),
                });
            }

            if !keys.contains(&key.to_lowercase()) {
                result.add_warning(ValidationWarning {
                    field_path: path,
                    message: format!("No team project has the key '{}'", key),
                });
            }
        }
    }
}

fn required(field_path: String, message: &str) -> ValidationError {
    ValidationError {
        error_type: ValidationErrorType::RequiredFieldMissing,
        field_path,
        message: message.to_string(),
        suggestion: None,
    }
}

fn duplicate(field_path: String, message: String) -> ValidationError {
    ValidationError {
        error_type: ValidationErrorType::DuplicateValue,
        field_path,
        message,
        suggestion: None,
    }
}

/// Patterns declared directly on a team project are never expanded, so any
/// token left in them is compared literally.
fn warn_unexpanded_tokens(pattern: &Pattern, path: &str, result: &mut ValidationResult) {
    let Pattern::Security(security) = pattern;

    for (group_index, group) in security.application_groups.iter().enumerate() {
        let names = std::iter::once(&group.name).chain(group.members.iter());
        if names.into_iter().any(|name| contains_tokens(name)) {
            result.add_warning(ValidationWarning {
                field_path: format!("{}.application_groups[{}]", path, group_index),
                message: "Contains {teamProject.*} tokens that are only substituted in mapped templates"
                    .to_string(),
            });
        }
    }
}
