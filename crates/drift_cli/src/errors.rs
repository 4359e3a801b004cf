use config_manager::ConfigurationError;
use drift_core::DriftError;
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the drift CLI application.
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials were missing or incomplete.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The configuration file could not be loaded or failed validation.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigurationError),

    /// Invalid command-line arguments were provided.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The reconciliation run failed.
    #[error("Drift detection failed: {0}")]
    Drift(#[from] DriftError),

    /// The Azure DevOps client could not be created.
    #[error("Client error: {0}")]
    Client(#[from] devops_client::Error),

    /// The report could not be rendered or written.
    #[error("Output error: {0}")]
    Output(String),
}
