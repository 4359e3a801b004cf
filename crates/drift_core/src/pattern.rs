//! Desired-state patterns.
//!
//! A [`Pattern`] compares itself against the live state of a team project and
//! can be expanded from an organization-level template into a copy bound to
//! one team project.

use serde::{Deserialize, Serialize};

use crate::{DriftResult, Findings, SecurityPattern, Services, TeamProject};

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;

/// A desired-state pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Pattern {
    /// Expected application groups, members and namespace permissions.
    Security(SecurityPattern),
}

impl Pattern {
    /// Returns the pattern name.
    pub fn name(&self) -> &str {
        match self {
            Self::Security(p) => &p.name,
        }
    }

    /// Returns a copy of this pattern bound to `team_project`.
    pub fn expand(&self, team_project: &TeamProject) -> Pattern {
        match self {
            Self::Security(p) => Self::Security(p.expand(team_project)),
        }
    }

    /// Compares the pattern against the live state of `team_project`.
    pub async fn collect_deviations(
        &self,
        team_project: &TeamProject,
        services: &Services,
    ) -> DriftResult<Findings> {
        match self {
            Self::Security(p) => p.collect_deviations(team_project, services).await,
        }
    }
}

impl From<SecurityPattern> for Pattern {
    fn from(value: SecurityPattern) -> Self {
        Self::Security(value)
    }
}
