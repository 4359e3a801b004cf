//! Error types for drift detection.
//!
//! The reconciliation core distinguishes precondition violations, lookups that
//! produced no data, configuration mistakes in the pattern mappings, and
//! failures reported by the remote collaborators. Ambiguous remote state is not
//! an error; it is reported as a [`crate::Diagnostic`] instead.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while expanding patterns or collecting deviations.
#[derive(Error, Debug)]
pub enum DriftError {
    /// A required input was missing or blank.
    ///
    /// Raised before any remote call is made, e.g. when an application group
    /// without a descriptor is passed to a membership or namespace query.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// A collaborator found no remote data for a lookup that requires some.
    #[error("Not found: {reason}")]
    NotFound { reason: String },

    /// A team project key is mapped to a pattern template that does not exist.
    #[error("Team project key '{key}' is mapped to unknown pattern '{pattern}'")]
    UnknownPattern { key: String, pattern: String },

    /// A failure reported by a remote collaborator, passed through unchanged.
    #[error(transparent)]
    Service(Box<dyn std::error::Error + Send + Sync>),
}

impl DriftError {
    /// Creates an [`DriftError::InvalidArgument`] error.
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    /// Creates a [`DriftError::NotFound`] error.
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    /// Wraps a collaborator error without altering it.
    pub fn service<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Service(Box::new(error))
    }

    /// Returns true if the error is a precondition violation.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Result type alias for drift detection operations.
pub type DriftResult<T> = Result<T, DriftError>;
