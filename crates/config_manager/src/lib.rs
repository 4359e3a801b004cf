//! Configuration management for the drift detector
//!
//! This crate loads the desired-state document that describes an Azure
//! DevOps organization: the expected team projects, the pattern templates
//! that apply to them and the connection settings used to reach the service.
//!
//! ## File Format
//!
//! Both TOML and JSON are accepted; the format is chosen by file extension.
//!
//! ```toml
//! [connection]
//! organization_url = "https://dev.azure.com/contoso"
//!
//! [[team_projects]]
//! name = "Storefront"
//! key = "web"
//!
//! [[patterns]]
//! type = "security"
//! name = "Baseline"
//!
//! [[patterns.application_groups]]
//! name = "[{teamProject.Name}]\\Contributors"
//! members = ["{teamProject.Name} Team"]
//!
//! [mappings]
//! web = "Baseline"
//! ```
//!
//! ## Validation
//!
//! [`DriftConfiguration::validate`] runs the [`ConfigurationValidator`] and
//! turns any errors into [`ConfigurationError::ValidationFailed`].

use drift_core::Organization;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument, warn};

mod connection;
pub mod errors;
pub mod validator;

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

pub use connection::ConnectionConfig;
pub use errors::{ConfigurationError, ConfigurationResult};
pub use validator::{
    ConfigurationValidator, ValidationError, ValidationErrorType, ValidationResult,
    ValidationWarning,
};

/// The complete contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftConfiguration {
    /// Connection settings.
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Desired state of the organization.
    #[serde(flatten)]
    pub organization: Organization,
}

impl DriftConfiguration {
    /// Loads a configuration file.
    ///
    /// Files ending in `.toml` are parsed as TOML and files ending in `.json`
    /// as JSON. The result is not validated.
    ///
    /// # Errors
    ///
    /// * [`ConfigurationError::FileNotFound`] if the path does not exist.
    /// * [`ConfigurationError::UnsupportedFormat`] for any other extension.
    /// * [`ConfigurationError::FileAccessError`] if the file cannot be read.
    /// * [`ConfigurationError::ParseError`] if the content is malformed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> ConfigurationResult<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();

        if !path.exists() {
            return Err(ConfigurationError::FileNotFound { path: display });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let parse: fn(&str) -> ConfigurationResult<Self> = match extension.as_deref() {
            Some("toml") => Self::from_toml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ConfigurationError::UnsupportedFormat { path: display }),
        };

        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigurationError::FileAccessError {
                path: display.clone(),
                reason: e.to_string(),
            })?;

        let config = parse(&content)?;
        debug!(
            team_projects = config.organization.team_projects.len(),
            patterns = config.organization.patterns.len(),
            mappings = config.organization.mappings.len(),
            "Loaded configuration"
        );

        Ok(config)
    }

    /// Parses a TOML document.
    pub fn from_toml_str(content: &str) -> ConfigurationResult<Self> {
        toml::from_str(content).map_err(|e| ConfigurationError::ParseError {
            reason: e.to_string(),
        })
    }

    /// Parses a JSON document.
    pub fn from_json_str(content: &str) -> ConfigurationResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigurationError::ParseError {
            reason: e.to_string(),
        })
    }

    /// Validates the configuration.
    ///
    /// Warnings are logged and returned. Errors fail the call.
    pub fn validate(&self) -> ConfigurationResult<Vec<ValidationWarning>> {
        let result = ConfigurationValidator::new().validate(self);

        for warning in &result.warnings {
            warn!(field = %warning.field_path, "{}", warning.message);
        }

        if result.is_valid() {
            Ok(result.warnings)
        } else {
            Err(ConfigurationError::ValidationFailed {
                error_count: result.errors.len(),
                errors: result.errors,
            })
        }
    }

    /// Moves the organization out of the configuration.
    pub fn into_organization(self) -> Organization {
        self.organization
    }
}
