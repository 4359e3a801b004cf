//! Deviation records produced by a reconciliation run.
//!
//! Every deviation names the team project it concerns and whether the item is
//! [`DeviationType::Missing`], [`DeviationType::Obsolete`] or
//! [`DeviationType::Incorrect`]. Deviations are output only; nothing refers
//! back to them.

use serde::{Deserialize, Serialize};

use crate::TeamProjectRef;

#[cfg(test)]
#[path = "deviation_tests.rs"]
mod tests;

/// The kind of discrepancy between expected and actual state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviationType {
    /// Expected but not observed.
    Missing,

    /// Observed but not expected.
    Obsolete,

    /// Expected and observed, but different.
    Incorrect,
}

impl std::fmt::Display for DeviationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Missing => "Missing",
            Self::Obsolete => "Obsolete",
            Self::Incorrect => "Incorrect",
        };
        write!(f, "{}", text)
    }
}

/// Whether a permission deviation concerns an allow or a deny grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authorization {
    Allow,
    Deny,
    Unset,
}

impl std::fmt::Display for Authorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::Allow => "Allow",
            Self::Deny => "Deny",
            Self::Unset => "Unset",
        };
        write!(f, "{}", text)
    }
}

/// The team project itself is missing, obsolete, or has the wrong name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProjectDeviation {
    pub team_project: TeamProjectRef,
    pub deviation_type: DeviationType,
}

/// An application group is missing or obsolete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationGroupDeviation {
    pub team_project: TeamProjectRef,
    pub application_group: String,
    pub deviation_type: DeviationType,
}

/// A member of an application group is missing or obsolete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationGroupMemberDeviation {
    pub team_project: TeamProjectRef,
    pub application_group: String,
    pub member: String,
    pub deviation_type: DeviationType,
}

/// A security namespace is missing or obsolete for an application group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceDeviation {
    pub team_project: TeamProjectRef,
    pub application_group: String,
    pub namespace: String,
    pub deviation_type: DeviationType,
}

/// A single permission within a namespace is missing or obsolete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespacePermissionDeviation {
    pub team_project: TeamProjectRef,
    pub application_group: String,
    pub namespace: String,
    pub permission: String,
    pub authorization: Authorization,
    pub deviation_type: DeviationType,
}

/// One detected discrepancy between expected and actual configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Deviation {
    TeamProject(TeamProjectDeviation),
    ApplicationGroup(ApplicationGroupDeviation),
    ApplicationGroupMember(ApplicationGroupMemberDeviation),
    Namespace(NamespaceDeviation),
    NamespacePermission(NamespacePermissionDeviation),
}

impl Deviation {
    /// Returns the team project this deviation concerns.
    pub fn team_project(&self) -> &TeamProjectRef {
        match self {
            Self::TeamProject(d) => &d.team_project,
            Self::ApplicationGroup(d) => &d.team_project,
            Self::ApplicationGroupMember(d) => &d.team_project,
            Self::Namespace(d) => &d.team_project,
            Self::NamespacePermission(d) => &d.team_project,
        }
    }

    /// Returns the kind of discrepancy.
    pub fn deviation_type(&self) -> DeviationType {
        match self {
            Self::TeamProject(d) => d.deviation_type,
            Self::ApplicationGroup(d) => d.deviation_type,
            Self::ApplicationGroupMember(d) => d.deviation_type,
            Self::Namespace(d) => d.deviation_type,
            Self::NamespacePermission(d) => d.deviation_type,
        }
    }

    /// Returns the application group this deviation concerns, if any.
    pub fn application_group(&self) -> Option<&str> {
        match self {
            Self::TeamProject(_) => None,
            Self::ApplicationGroup(d) => Some(&d.application_group),
            Self::ApplicationGroupMember(d) => Some(&d.application_group),
            Self::Namespace(d) => Some(&d.application_group),
            Self::NamespacePermission(d) => Some(&d.application_group),
        }
    }
}

impl std::fmt::Display for Deviation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TeamProject(d) => write!(f, "{} is {}.", d.team_project, d.deviation_type),
            Self::ApplicationGroup(d) => write!(
                f,
                "Application group {} is {} in Team Project {}.",
                d.application_group, d.deviation_type, d.team_project
            ),
            Self::ApplicationGroupMember(d) => write!(
                f,
                "Member {} is {} for {} in Team Project {}.",
                d.member, d.deviation_type, d.application_group, d.team_project
            ),
            Self::Namespace(d) => write!(
                f,
                "Namespace {} is {} for {} in Team Project {}.",
                d.namespace, d.deviation_type, d.application_group, d.team_project
            ),
            Self::NamespacePermission(d) => write!(
                f,
                "{} {} is {} for {} in {} in Team Project {}.",
                d.authorization,
                d.permission,
                d.deviation_type,
                d.namespace,
                d.application_group,
                d.team_project
            ),
        }
    }
}
