//! The `check` command.
//!
//! Loads and validates the configuration, expands the pattern templates,
//! reads the live state through [`DevOpsClient`] and renders the deviations.
//!
//! # Examples
//!
//! ```bash
//! # Check with a personal access token from the environment
//! DRIFT_TOKEN=... drift check --config-file drift.toml
//!
//! # Override the organization and emit JSON
//! drift check --config-file drift.toml \
//!     --service-url https://dev.azure.com/contoso --format json
//! ```

use chrono::Utc;
use clap::Args;
use config_manager::DriftConfiguration;
use devops_client::DevOpsClient;
use drift_core::{Findings, Organization, Services};
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, instrument};
use url::Url;

use crate::config::{client_settings, credentials, AuthType, DEFAULT_CONFIG_FILENAME};
use crate::errors::Error;
use crate::report::{render, OutputFormat, Report};

#[cfg(test)]
#[path = "check_cmd_tests.rs"]
mod tests;

/// Exit code when the live state matches the configuration.
pub const EXIT_NO_DRIFT: i32 = 0;

/// Exit code when at least one deviation was found.
pub const EXIT_DRIFT: i32 = 1;

/// Exit code when the run failed.
pub const EXIT_ERROR: i32 = 2;

/// Arguments of the `check` command.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the configuration file (.toml or .json).
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILENAME)]
    pub config_file: PathBuf,

    /// Organization URL. Overrides `connection.organization_url`.
    #[arg(long)]
    pub service_url: Option<Url>,

    /// Authentication type.
    #[arg(long, value_enum, default_value_t = AuthType::Pat)]
    pub auth_type: AuthType,

    /// Personal access token.
    #[arg(long, env = "DRIFT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// User name for basic authentication.
    #[arg(long)]
    pub username: Option<String>,

    /// Password for basic authentication.
    #[arg(long, env = "DRIFT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,
}

/// Runs the `check` command and returns the process exit code.
///
/// The report goes to stdout.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or is invalid,
/// credentials are missing, or any request to Azure DevOps fails.
#[instrument(skip(args), fields(config_file = %args.config_file.display()))]
pub async fn execute(args: &CheckArgs) -> Result<i32, Error> {
    let configuration = DriftConfiguration::load(&args.config_file)?;
    configuration.validate()?;

    let settings = client_settings(&configuration.connection, args.service_url.as_ref())?;
    let credentials = credentials(
        args.auth_type,
        args.token.as_deref(),
        args.username.as_deref(),
        args.password.as_deref(),
    )?;

    let organization_url = settings.organization_url.to_string();
    let client = DevOpsClient::new(settings, credentials)?;
    let services = client.into_services();

    let findings = run_check(configuration.into_organization(), &services).await?;

    let report = Report::new(&findings, &organization_url, Utc::now());
    let output = render(&report, args.format)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", output)
        .and_then(|_| stdout.flush())
        .map_err(|e| Error::Output(format!("Failed to write report: {}", e)))?;

    Ok(exit_code(&findings))
}

/// Expands the organization and collects its deviations.
pub async fn run_check(
    mut organization: Organization,
    services: &Services,
) -> Result<Findings, Error> {
    organization.expand()?;

    let findings = organization.collect_deviations(services).await?;

    let summary = findings.summary();
    info!(
        missing = summary.missing,
        obsolete = summary.obsolete,
        incorrect = summary.incorrect,
        diagnostics = summary.diagnostics,
        "Drift check complete"
    );

    Ok(findings)
}

/// Maps the findings of a run to the process exit code.
pub fn exit_code(findings: &Findings) -> i32 {
    if findings.has_drift() {
        EXIT_DRIFT
    } else {
        EXIT_NO_DRIFT
    }
}
