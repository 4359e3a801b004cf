//! Reconciliation results: deviations plus non-fatal diagnostics.

use serde::{Deserialize, Serialize};

use crate::{Deviation, DeviationType, TeamProjectRef};

#[cfg(test)]
#[path = "findings_tests.rs"]
mod tests;

/// A non-fatal observation made while reading live state.
///
/// Raised when the effective permissions of a group on a namespace cannot be
/// determined unambiguously. The namespace is left out of the comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub team_project: TeamProjectRef,
    pub application_group: String,
    pub namespace: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} for {} in {} in Team Project {}.",
            self.message, self.namespace, self.application_group, self.team_project
        )
    }
}

/// Ordered deviations and diagnostics from a reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    pub deviations: Vec<Deviation>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `other`, keeping its order.
    pub fn extend(&mut self, other: Findings) {
        self.deviations.extend(other.deviations);
        self.diagnostics.extend(other.diagnostics);
    }

    /// Returns true if at least one deviation was found.
    pub fn has_drift(&self) -> bool {
        !self.deviations.is_empty()
    }

    /// Counts the deviations per type.
    pub fn summary(&self) -> DeviationSummary {
        let mut summary = DeviationSummary::default();
        for deviation in &self.deviations {
            match deviation.deviation_type() {
                DeviationType::Missing => summary.missing += 1,
                DeviationType::Obsolete => summary.obsolete += 1,
                DeviationType::Incorrect => summary.incorrect += 1,
            }
        }
        summary.diagnostics = self.diagnostics.len();
        summary
    }
}

/// Deviation counts per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviationSummary {
    pub missing: usize,
    pub obsolete: usize,
    pub incorrect: usize,
    pub diagnostics: usize,
}

impl DeviationSummary {
    pub fn total(&self) -> usize {
        self.missing + self.obsolete + self.incorrect
    }
}
