//! Collaborator contracts for reading live state from the remote platform.
//!
//! The reconciliation core never talks to the network itself. Implementations
//! of these traits (see the `devops_client` crate) are handed to it bundled in
//! a [`Services`] value.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{ApplicationGroup, Diagnostic, DriftResult, Namespace, TeamProject};

/// Lists the team projects that exist on the remote platform.
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Returns all team projects (identifier and name only).
    async fn get_projects(&self) -> DriftResult<Vec<TeamProject>>;
}

/// Reads application groups and their memberships.
#[async_trait]
pub trait GraphService: Send + Sync {
    /// Returns the application groups of a team project.
    ///
    /// The returned groups carry name, descriptor and the `is_special` flag.
    /// Members and namespaces are not populated.
    async fn get_application_groups(
        &self,
        team_project: &TeamProject,
    ) -> DriftResult<Vec<ApplicationGroup>>;

    /// Returns the display names of the direct members of a group.
    ///
    /// # Errors
    ///
    /// Returns `DriftError::InvalidArgument` if the group descriptor is unset
    /// or blank. No remote call is made in that case.
    async fn get_members(
        &self,
        team_project: &TeamProject,
        application_group: &ApplicationGroup,
    ) -> DriftResult<Vec<String>>;
}

/// Reads the effective namespace permissions of application groups.
#[async_trait]
pub trait SecurityService: Send + Sync {
    /// Returns the namespaces on which the group has an unambiguous effective
    /// permission state.
    ///
    /// Namespaces with ambiguous state are left out and reported in
    /// [`NamespaceSnapshot::diagnostics`].
    ///
    /// # Errors
    ///
    /// - `DriftError::InvalidArgument` if the group descriptor is unset or blank
    /// - `DriftError::NotFound` if no namespace resolves for the group
    async fn get_namespaces(
        &self,
        team_project: &TeamProject,
        application_group: &ApplicationGroup,
    ) -> DriftResult<NamespaceSnapshot>;
}

/// Namespace permissions of one group as read from the remote platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceSnapshot {
    pub namespaces: Vec<Namespace>,
    pub diagnostics: Vec<Diagnostic>,
}

impl NamespaceSnapshot {
    pub fn new(namespaces: Vec<Namespace>) -> Self {
        Self {
            namespaces,
            diagnostics: Vec::new(),
        }
    }
}

/// The collaborators used by a reconciliation run.
#[derive(Clone)]
pub struct Services {
    pub projects: Arc<dyn ProjectService>,
    pub graph: Arc<dyn GraphService>,
    pub security: Arc<dyn SecurityService>,
}

impl Services {
    pub fn new(
        projects: Arc<dyn ProjectService>,
        graph: Arc<dyn GraphService>,
        security: Arc<dyn SecurityService>,
    ) -> Self {
        Self {
            projects,
            graph,
            security,
        }
    }
}
