//! Connection and credential resolution for the drift CLI.
//!
//! Command-line values take precedence over the `[connection]` section of the
//! configuration file.

use clap::ValueEnum;
use config_manager::ConnectionConfig;
use devops_client::{ClientSettings, Credentials};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::errors::Error;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "drift.toml";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// How the CLI authenticates against Azure DevOps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AuthType {
    /// Personal access token.
    #[default]
    Pat,
    /// User name and password.
    Basic,
}

/// Builds the client settings from the configuration file and the optional
/// `--service-url` override.
///
/// # Errors
///
/// Returns [`Error::InvalidArguments`] if neither source provides an
/// organization URL.
pub fn client_settings(
    connection: &ConnectionConfig,
    service_url: Option<&Url>,
) -> Result<ClientSettings, Error> {
    let organization_url = service_url
        .or(connection.organization_url.as_ref())
        .cloned()
        .ok_or_else(|| {
            Error::InvalidArguments(
                "No organization URL. Pass --service-url or set connection.organization_url"
                    .to_string(),
            )
        })?;

    debug!(organization_url = %organization_url, "Resolved organization URL");

    let mut settings = ClientSettings::new(organization_url)
        .with_special_groups(connection.special_groups.clone())
        .with_timeout(Duration::from_secs(connection.timeout_seconds));

    // A graph URL from the file belongs to the file's organization.
    if service_url.is_none() {
        if let Some(graph_url) = &connection.graph_url {
            settings = settings.with_graph_url(graph_url.clone());
        }
    }

    Ok(settings)
}

/// Builds the credentials for the chosen authentication type.
///
/// # Errors
///
/// Returns [`Error::Auth`] if a value the authentication type needs is
/// missing or blank.
pub fn credentials(
    auth_type: AuthType,
    token: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
) -> Result<Credentials, Error> {
    fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str, Error> {
        value
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Auth(message.to_string()))
    }

    match auth_type {
        AuthType::Pat => {
            let token = required(
                token,
                "A personal access token is required. Pass --token or set DRIFT_TOKEN",
            )?;
            Ok(Credentials::personal_access_token(token))
        }
        AuthType::Basic => {
            let username = required(username, "Basic authentication requires --username")?;
            let password = required(
                password,
                "Basic authentication requires --password or DRIFT_PASSWORD",
            )?;
            Ok(Credentials::basic(username, password))
        }
    }
}
