//! Team project types.
//!
//! A [`TeamProject`] exists on both sides of a reconciliation: the expected
//! projects come from configuration and carry the patterns that apply to them,
//! the actual projects come from the remote platform and carry identity only.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{DriftError, DriftResult, Findings, Pattern, Services};

#[cfg(test)]
#[path = "team_project_tests.rs"]
mod tests;

/// A team project on the remote platform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamProject {
    /// Remote unique identifier. May be absent for expected projects that are
    /// matched by name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Display name.
    pub name: String,

    /// Local configuration key used to select the pattern template.
    #[serde(default)]
    pub key: String,

    /// Patterns bound to this project.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub patterns: Vec<Pattern>,
}

impl TeamProject {
    /// Creates a team project with a known remote identifier.
    pub fn new(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creates a team project that is only known by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the configuration key.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Adds a pattern.
    pub fn with_pattern(mut self, pattern: Pattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Returns the identity of this project as carried by deviations.
    pub fn reference(&self) -> TeamProjectRef {
        TeamProjectRef {
            id: self.id,
            name: self.name.clone(),
        }
    }

    /// Returns the remote identifier, failing if it has not been set.
    pub fn require_id(&self) -> DriftResult<Uuid> {
        self.id.ok_or_else(|| {
            DriftError::invalid_argument(
                "team_project",
                format!("Team project '{}' has no identifier", self.name),
            )
        })
    }

    /// Returns true if `other` refers to the same remote project.
    ///
    /// Projects are matched by identifier. An expected project without an
    /// identifier matches by case-insensitive name.
    pub fn is_same_project(&self, other: &TeamProject) -> bool {
        match (self.id, other.id) {
            (Some(left), Some(right)) => left == right,
            (None, _) => self.name.to_lowercase() == other.name.to_lowercase(),
            (Some(_), None) => false,
        }
    }

    /// Returns a copy of this project carrying the identifier of the matched
    /// remote project.
    pub fn resolved_from(&self, actual: &TeamProject) -> TeamProject {
        let mut resolved = self.clone();
        if resolved.id.is_none() {
            resolved.id = actual.id;
        }
        resolved
    }

    /// Adds `pattern`, replacing an existing pattern with the same name.
    pub fn upsert_pattern(&mut self, pattern: Pattern) {
        let existing = self
            .patterns
            .iter_mut()
            .find(|p| p.name().eq_ignore_ascii_case(pattern.name()));

        match existing {
            Some(slot) => *slot = pattern,
            None => self.patterns.push(pattern),
        }
    }

    /// Runs every bound pattern against the live state of this project.
    pub async fn collect_deviations(&self, services: &Services) -> DriftResult<Findings> {
        debug!(
            team_project = %self.name,
            pattern_count = self.patterns.len(),
            "Collecting deviations for team project"
        );

        let mut findings = Findings::new();
        for pattern in &self.patterns {
            findings.extend(pattern.collect_deviations(self, services).await?);
        }

        Ok(findings)
    }
}

/// Identity of a team project as carried by deviations and diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamProjectRef {
    /// Remote unique identifier, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Display name.
    pub name: String,
}

impl std::fmt::Display for TeamProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
