//! Error types for Azure DevOps client operations.
//!
//! The adapter reports transport and protocol failures with its own [`Error`]
//! type. At the boundary with the reconciliation core the errors are converted
//! into [`DriftError`], keeping precondition and not-found failures
//! distinguishable.

use drift_core::DriftError;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while talking to the Azure DevOps REST API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The service rejected the credentials (HTTP 401 or 403), or the client
    /// could not be configured with them.
    #[error("Failed to authenticate with Azure DevOps: {0}")]
    AuthError(String),

    /// The service answered with an unexpected HTTP status.
    #[error("Request to '{url}' failed with status {status}")]
    Http { status: u16, url: String },

    /// The request could not be sent or the response body could not be read.
    #[error("Failed to send request: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body does not have the expected shape.
    #[error("Failed to deserialize Azure DevOps response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A service URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A subject descriptor does not carry a decodable security identifier.
    #[error("Invalid descriptor '{0}'")]
    InvalidDescriptor(String),

    /// The requested resource does not exist or is not visible.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The service throttled the client (HTTP 429).
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl From<url::ParseError> for Error {
    fn from(value: url::ParseError) -> Self {
        Error::InvalidUrl(value.to_string())
    }
}

impl From<Error> for DriftError {
    fn from(value: Error) -> Self {
        match value {
            Error::NotFound(reason) => DriftError::not_found(reason),
            Error::InvalidDescriptor(descriptor) => DriftError::invalid_argument(
                "application_group",
                format!("Descriptor '{}' is not a group descriptor", descriptor),
            ),
            other => DriftError::service(other),
        }
    }
}
