//! The `validate` command: checks a configuration file offline.

use clap::Args;
use colored::Colorize;
use config_manager::{ConfigurationError, DriftConfiguration, ValidationError, ValidationWarning};
use std::path::PathBuf;
use tracing::instrument;

use crate::config::DEFAULT_CONFIG_FILENAME;
use crate::errors::Error;

#[cfg(test)]
#[path = "validate_cmd_tests.rs"]
mod tests;

/// Arguments of the `validate` command.
#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to the configuration file (.toml or .json).
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_FILENAME)]
    pub config_file: PathBuf,
}

/// Loads and validates the configuration file, printing the outcome.
///
/// # Errors
///
/// Returns [`Error::Config`] if the file cannot be loaded or has validation
/// errors. The individual errors are printed before returning.
#[instrument(skip(args), fields(config_file = %args.config_file.display()))]
pub fn execute(args: &ValidateArgs) -> Result<(), Error> {
    let configuration = DriftConfiguration::load(&args.config_file)?;

    match configuration.validate() {
        Ok(warnings) => {
            println!(
                "{}",
                format_success(&args.config_file.display().to_string(), &warnings)
            );
            Ok(())
        }
        Err(ConfigurationError::ValidationFailed {
            error_count,
            errors,
        }) => {
            println!("{}", format_failure(&errors));
            Err(Error::Config(ConfigurationError::ValidationFailed {
                error_count,
                errors,
            }))
        }
        Err(e) => Err(e.into()),
    }
}

fn format_success(path: &str, warnings: &[ValidationWarning]) -> String {
    let mut output = format!("{} {}\n", "✓ Configuration is VALID:".green().bold(), path);

    if !warnings.is_empty() {
        output.push_str(&format!("\n{}:\n", "Warnings".yellow().bold()));
        for warning in warnings {
            output.push_str(&format!("  {} {}\n", "⚠".yellow(), warning));
        }
    }

    output
}

fn format_failure(errors: &[ValidationError]) -> String {
    let mut output = format!("{}\n\n", "✗ Configuration validation FAILED".red().bold());

    output.push_str(&format!("{}:\n", "Issues".red().bold()));
    for error in errors {
        output.push_str(&format!("  {} {}\n", "✗".red(), error));
    }

    output
}
