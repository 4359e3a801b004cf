//! The organization aggregate: expected team projects, pattern templates and
//! the mappings that bind one to the other.

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use crate::{
    Deviation, DeviationType, DriftError, DriftResult, Findings, Pattern, Services, TeamProject,
    TeamProjectDeviation,
};

#[cfg(test)]
#[path = "organization_tests.rs"]
mod tests;

/// Desired state of an organization.
///
/// # Examples
///
/// ```rust
/// use drift_core::{ApplicationGroup, Organization, Pattern, SecurityPattern, TeamProject};
///
/// let template = SecurityPattern::new("Baseline").with_application_group(
///     ApplicationGroup::new("[{teamProject.Name}]\\Project Administrators"),
/// );
///
/// let mut organization = Organization::new();
/// organization.patterns.push(Pattern::from(template));
/// organization
///     .mappings
///     .insert("web".to_string(), "Baseline".to_string());
/// organization
///     .team_projects
///     .push(TeamProject::named("Storefront").with_key("web"));
///
/// organization.expand().unwrap();
///
/// let Pattern::Security(bound) = &organization.team_projects[0].patterns[0];
/// assert_eq!(
///     bound.application_groups[0].name,
///     "[Storefront]\\Project Administrators"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Team projects that are expected to exist.
    #[serde(default)]
    pub team_projects: Vec<TeamProject>,

    /// Organization-level pattern templates.
    #[serde(default)]
    pub patterns: Vec<Pattern>,

    /// Team project key to the name of the pattern template that applies.
    #[serde(default)]
    pub mappings: BTreeMap<String, String>,
}

impl Organization {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the mapped pattern template to every team project.
    ///
    /// For each team project whose key has a mapping (keys compare without
    /// regard to case), the mapped template is
    /// expanded for that project and replaces the project's pattern of the same
    /// name (or is added if there is none). Projects without a mapping are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::UnknownPattern` if a mapping names a template that
    /// is not declared in [`Organization::patterns`].
    #[instrument(skip(self), fields(team_projects = self.team_projects.len()))]
    pub fn expand(&mut self) -> DriftResult<()> {
        for team_project in &mut self.team_projects {
            let Some(template_name) = mapped_template(&self.mappings, &team_project.key) else {
                debug!(
                    team_project = %team_project.name,
                    key = %team_project.key,
                    "No pattern mapping for team project"
                );
                continue;
            };

            let template = self
                .patterns
                .iter()
                .find(|p| p.name().eq_ignore_ascii_case(template_name))
                .ok_or_else(|| DriftError::UnknownPattern {
                    key: team_project.key.clone(),
                    pattern: template_name.clone(),
                })?;

            let expanded = template.expand(team_project);
            team_project.upsert_pattern(expanded);

            debug!(
                team_project = %team_project.name,
                pattern = %template_name,
                "Bound pattern template to team project"
            );
        }

        Ok(())
    }

    /// Compares the organization against the live state of the remote platform.
    ///
    /// Deviations are ordered as follows:
    ///
    /// 1. pattern deviations of every matched team project, in the order of
    ///    [`Organization::team_projects`]
    /// 2. missing team projects
    /// 3. obsolete team projects, in the order returned by the project service
    /// 4. team projects whose name differs from the remote name
    ///
    /// # Errors
    ///
    /// Any collaborator error aborts the run and is returned unchanged.
    #[instrument(skip(self, services), fields(team_projects = self.team_projects.len()))]
    pub async fn collect_deviations(&self, services: &Services) -> DriftResult<Findings> {
        let actual_projects = services.projects.get_projects().await?;

        info!(
            expected_count = self.team_projects.len(),
            actual_count = actual_projects.len(),
            "Retrieved team projects"
        );

        let matched: Vec<(&TeamProject, &TeamProject)> = self
            .team_projects
            .iter()
            .filter_map(|expected| {
                actual_projects
                    .iter()
                    .find(|actual| expected.is_same_project(actual))
                    .map(|actual| (expected, actual))
            })
            .collect();

        let resolved: Vec<TeamProject> = matched
            .iter()
            .map(|(expected, actual)| expected.resolved_from(actual))
            .collect();

        let per_project = try_join_all(
            resolved
                .iter()
                .map(|team_project| team_project.collect_deviations(services)),
        )
        .await?;

        let mut findings = Findings::new();
        for project_findings in per_project {
            findings.extend(project_findings);
        }

        for expected in &self.team_projects {
            let exists = actual_projects
                .iter()
                .any(|actual| expected.is_same_project(actual));
            if !exists {
                findings
                    .deviations
                    .push(team_project_deviation(expected, DeviationType::Missing));
            }
        }

        for actual in &actual_projects {
            let expected = self
                .team_projects
                .iter()
                .any(|expected| expected.is_same_project(actual));
            if !expected {
                findings
                    .deviations
                    .push(team_project_deviation(actual, DeviationType::Obsolete));
            }
        }

        for (expected, actual) in &matched {
            if expected.id.is_some() && expected.name != actual.name {
                findings
                    .deviations
                    .push(team_project_deviation(expected, DeviationType::Incorrect));
            }
        }

        info!(
            deviation_count = findings.deviations.len(),
            diagnostic_count = findings.diagnostics.len(),
            "Collected deviations"
        );

        Ok(findings)
    }
}

fn team_project_deviation(team_project: &TeamProject, deviation_type: DeviationType) -> Deviation {
    Deviation::TeamProject(TeamProjectDeviation {
        team_project: team_project.reference(),
        deviation_type,
    })
}

/// Looks up the template mapped to `key`, ignoring case. An exact match wins.
fn mapped_template<'a>(mappings: &'a BTreeMap<String, String>, key: &str) -> Option<&'a String> {
    mappings.get(key).or_else(|| {
        mappings
            .iter()
            .find(|(mapped, _)| mapped.eq_ignore_ascii_case(key))
            .map(|(_, template)| template)
    })
}
