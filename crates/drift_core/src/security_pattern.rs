//! Security pattern: expected application groups, members and namespace
//! permissions for a team project.
//!
//! # Comparison
//!
//! For one team project the comparison runs top-down:
//!
//! 1. Expected groups without a current counterpart are `Missing`; current
//!    groups that are neither expected nor special are `Obsolete`.
//! 2. Every matched group is enriched with the descriptor of its current
//!    counterpart, then its members are compared.
//! 3. Matched groups that are not special have their namespaces compared and,
//!    for namespaces present on both sides, their allow and deny permissions.
//!
//! All names are compared without regard to case. The queries for the matched
//! groups run concurrently; the deviations are assembled in the order of the
//! expected groups once every query has completed:
//!
//! - per matched group: missing members, obsolete members, missing namespaces,
//!   obsolete namespaces, then per namespace missing allow, obsolete allow,
//!   missing deny and obsolete deny permissions
//! - missing groups
//! - obsolete groups

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::matching::{distinct, exclusive, NameSet};
use crate::{
    ApplicationGroup, ApplicationGroupDeviation, ApplicationGroupMemberDeviation, Authorization,
    Deviation, DeviationType, DriftResult, Findings, Namespace, NamespaceDeviation,
    NamespacePermissionDeviation, NamespaceSnapshot, Services, TeamProject, TeamProjectRef,
};

#[cfg(test)]
#[path = "security_pattern_tests.rs"]
mod tests;

/// A named set of expected application groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityPattern {
    pub name: String,

    #[serde(default)]
    pub application_groups: Vec<ApplicationGroup>,
}

impl SecurityPattern {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            application_groups: Vec::new(),
        }
    }

    pub fn with_application_group(mut self, application_group: ApplicationGroup) -> Self {
        self.application_groups.push(application_group);
        self
    }

    /// Returns a copy with every application group bound to `team_project`.
    pub fn expand(&self, team_project: &TeamProject) -> SecurityPattern {
        SecurityPattern {
            name: self.name.clone(),
            application_groups: self
                .application_groups
                .iter()
                .map(|group| group.expand(team_project))
                .collect(),
        }
    }

    /// Compares the expected groups against the live state of `team_project`.
    ///
    /// # Errors
    ///
    /// Any collaborator error aborts the comparison for this project and is
    /// returned unchanged.
    #[instrument(skip(self, team_project, services), fields(pattern = %self.name, team_project = %team_project.name))]
    pub async fn collect_deviations(
        &self,
        team_project: &TeamProject,
        services: &Services,
    ) -> DriftResult<Findings> {
        let project = team_project.reference();
        let current_groups = services.graph.get_application_groups(team_project).await?;

        debug!(
            expected_count = self.application_groups.len(),
            current_count = current_groups.len(),
            "Retrieved current application groups"
        );

        let expected_names =
            NameSet::from_names(self.application_groups.iter().map(|g| g.name.as_str()));
        let current_names = NameSet::from_names(current_groups.iter().map(|g| g.name.as_str()));

        let missing_groups: Vec<Deviation> =
            exclusive(&self.application_groups, |g| g.name.as_str(), &current_names)
                .into_iter()
                .map(|g| group_deviation(&project, g, DeviationType::Missing))
                .collect();

        let obsolete_groups: Vec<Deviation> =
            exclusive(&current_groups, |g| g.name.as_str(), &expected_names)
                .into_iter()
                .filter(|g| !g.is_special)
                .map(|g| group_deviation(&project, g, DeviationType::Obsolete))
                .collect();

        let matched_groups: Vec<ApplicationGroup> =
            distinct(&self.application_groups, |g| g.name.as_str())
                .into_iter()
                .filter_map(|expected| {
                    current_groups
                        .iter()
                        .find(|current| current.matches(&expected.name))
                        .map(|current| expected.resolved_from(current))
                })
                .collect();

        let per_group = try_join_all(
            matched_groups
                .iter()
                .map(|group| compare_application_group(team_project, group, services)),
        )
        .await?;

        let mut findings = Findings::new();
        for group_findings in per_group {
            findings.extend(group_findings);
        }

        findings.deviations.extend(missing_groups);
        findings.deviations.extend(obsolete_groups);

        debug!(
            deviation_count = findings.deviations.len(),
            diagnostic_count = findings.diagnostics.len(),
            "Compared security pattern"
        );

        Ok(findings)
    }
}

/// Compares one matched, descriptor-resolved group against live state.
async fn compare_application_group(
    team_project: &TeamProject,
    group: &ApplicationGroup,
    services: &Services,
) -> DriftResult<Findings> {
    group.require_descriptor()?;
    let project = team_project.reference();
    let mut findings = Findings::new();

    if group.is_special {
        debug!(
            application_group = %group.name,
            "Skipping namespace comparison for special application group"
        );

        let current_members = services.graph.get_members(team_project, group).await?;
        findings
            .deviations
            .extend(member_deviations(&project, group, &current_members));
        return Ok(findings);
    }

    let (current_members, snapshot): (Vec<String>, NamespaceSnapshot) = futures::try_join!(
        services.graph.get_members(team_project, group),
        services.security.get_namespaces(team_project, group),
    )?;

    findings
        .deviations
        .extend(member_deviations(&project, group, &current_members));
    findings
        .deviations
        .extend(namespace_deviations(&project, group, &snapshot.namespaces));
    findings.diagnostics.extend(snapshot.diagnostics);

    Ok(findings)
}

fn group_deviation(
    project: &TeamProjectRef,
    group: &ApplicationGroup,
    deviation_type: DeviationType,
) -> Deviation {
    Deviation::ApplicationGroup(ApplicationGroupDeviation {
        team_project: project.clone(),
        application_group: group.name.clone(),
        deviation_type,
    })
}

fn member_deviations(
    project: &TeamProjectRef,
    group: &ApplicationGroup,
    current_members: &[String],
) -> Vec<Deviation> {
    let expected = NameSet::from_names(group.members.iter().map(String::as_str));
    let current = NameSet::from_names(current_members.iter().map(String::as_str));

    let missing = exclusive(&group.members, |m| m.as_str(), &current)
        .into_iter()
        .map(|m| (m, DeviationType::Missing));
    let obsolete = exclusive(current_members, |m| m.as_str(), &expected)
        .into_iter()
        .map(|m| (m, DeviationType::Obsolete));

    missing
        .chain(obsolete)
        .map(|(member, deviation_type)| {
            Deviation::ApplicationGroupMember(ApplicationGroupMemberDeviation {
                team_project: project.clone(),
                application_group: group.name.clone(),
                member: member.clone(),
                deviation_type,
            })
        })
        .collect()
}

fn namespace_deviations(
    project: &TeamProjectRef,
    group: &ApplicationGroup,
    current_namespaces: &[Namespace],
) -> Vec<Deviation> {
    let expected = NameSet::from_names(group.namespaces.iter().map(|n| n.name.as_str()));
    let current = NameSet::from_names(current_namespaces.iter().map(|n| n.name.as_str()));

    let missing = exclusive(&group.namespaces, |n| n.name.as_str(), &current)
        .into_iter()
        .map(|n| (n, DeviationType::Missing));
    let obsolete = exclusive(current_namespaces, |n| n.name.as_str(), &expected)
        .into_iter()
        .map(|n| (n, DeviationType::Obsolete));

    let mut deviations: Vec<Deviation> = missing
        .chain(obsolete)
        .map(|(namespace, deviation_type)| {
            Deviation::Namespace(NamespaceDeviation {
                team_project: project.clone(),
                application_group: group.name.clone(),
                namespace: namespace.name.clone(),
                deviation_type,
            })
        })
        .collect();

    for expected_namespace in distinct(&group.namespaces, |n| n.name.as_str()) {
        let matching = current_namespaces
            .iter()
            .find(|current| current.matches(&expected_namespace.name));

        if let Some(current_namespace) = matching {
            deviations.extend(permission_deviations(
                project,
                group,
                expected_namespace,
                current_namespace,
            ));
        }
    }

    deviations
}

fn permission_deviations(
    project: &TeamProjectRef,
    group: &ApplicationGroup,
    expected: &Namespace,
    current: &Namespace,
) -> Vec<Deviation> {
    let sides = [
        (Authorization::Allow, &expected.allow, &current.allow),
        (Authorization::Deny, &expected.deny, &current.deny),
    ];

    let mut deviations = Vec::new();
    for (authorization, expected_permissions, current_permissions) in sides {
        let expected_set = NameSet::from_names(expected_permissions.iter().map(String::as_str));
        let current_set = NameSet::from_names(current_permissions.iter().map(String::as_str));

        let missing = exclusive(expected_permissions, |p| p.as_str(), &current_set)
            .into_iter()
            .map(|p| (p, DeviationType::Missing));
        let obsolete = exclusive(current_permissions, |p| p.as_str(), &expected_set)
            .into_iter()
            .map(|p| (p, DeviationType::Obsolete));

        deviations.extend(missing.chain(obsolete).map(|(permission, deviation_type)| {
            Deviation::NamespacePermission(NamespacePermissionDeviation {
                team_project: project.clone(),
                application_group: group.name.clone(),
                namespace: expected.name.clone(),
                permission: permission.clone(),
                authorization,
                deviation_type,
            })
        }));
    }

    deviations
}
