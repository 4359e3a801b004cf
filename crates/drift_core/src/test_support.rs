//! In-memory collaborators for testing the reconciliation logic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{
    ApplicationGroup, DriftError, DriftResult, GraphService, NamespaceSnapshot, ProjectService,
    SecurityService, Services, TeamProject,
};

/// Mock project service returning a fixed project list.
#[derive(Default)]
pub struct MockProjectService {
    projects: Vec<TeamProject>,
    fail: bool,
}

impl MockProjectService {
    pub fn new(projects: Vec<TeamProject>) -> Self {
        Self {
            projects,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            projects: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ProjectService for MockProjectService {
    async fn get_projects(&self) -> DriftResult<Vec<TeamProject>> {
        if self.fail {
            return Err(DriftError::not_found("projects unavailable"));
        }
        Ok(self.projects.clone())
    }
}

/// Mock graph service keyed by lowercase group name.
#[derive(Default)]
pub struct MockGraphService {
    groups: HashMap<String, Vec<ApplicationGroup>>,
    members: HashMap<String, Vec<String>>,
    pub member_calls: Mutex<Vec<String>>,
}

impl MockGraphService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a current group for every team project, with a descriptor
    /// derived from its name.
    pub fn with_group(mut self, name: &str, members: &[&str]) -> Self {
        self.push_group(
            ApplicationGroup::new(name).with_descriptor(format!("vssgp.{}", name)),
            members,
        );
        self
    }

    /// Registers a current group whose descriptor was never returned.
    pub fn with_undescribed_group(mut self, name: &str, members: &[&str]) -> Self {
        self.push_group(ApplicationGroup::new(name), members);
        self
    }

    /// Registers a current special group.
    pub fn with_special_group(mut self, name: &str, members: &[&str]) -> Self {
        self.push_group(
            ApplicationGroup::new(name)
                .with_descriptor(format!("vssgp.{}", name))
                .special(),
            members,
        );
        self
    }

    /// Registers a current group for one team project only.
    pub fn with_project_group(mut self, project: &str, name: &str, members: &[&str]) -> Self {
        let group = ApplicationGroup::new(name).with_descriptor(format!("vssgp.{}", name));
        self.groups
            .entry(project.to_lowercase())
            .or_default()
            .push(group);
        self.members.insert(
            name.to_lowercase(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self
    }

    fn push_group(&mut self, group: ApplicationGroup, members: &[&str]) {
        self.members.insert(
            group.name.to_lowercase(),
            members.iter().map(|m| m.to_string()).collect(),
        );
        self.groups.entry(String::new()).or_default().push(group);
    }

    pub fn member_calls(&self) -> Vec<String> {
        self.member_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphService for MockGraphService {
    async fn get_application_groups(
        &self,
        team_project: &TeamProject,
    ) -> DriftResult<Vec<ApplicationGroup>> {
        let mut groups = self.groups.get("").cloned().unwrap_or_default();
        if let Some(project_groups) = self.groups.get(&team_project.name.to_lowercase()) {
            groups.extend(project_groups.iter().cloned());
        }
        Ok(groups)
    }

    async fn get_members(
        &self,
        _team_project: &TeamProject,
        application_group: &ApplicationGroup,
    ) -> DriftResult<Vec<String>> {
        self.member_calls
            .lock()
            .unwrap()
            .push(application_group.name.clone());
        application_group.require_descriptor()?;
        Ok(self
            .members
            .get(&application_group.name.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

/// Mock security service keyed by descriptor.
#[derive(Default)]
pub struct MockSecurityService {
    snapshots: HashMap<String, NamespaceSnapshot>,
    pub calls: Mutex<Vec<String>>,
}

impl MockSecurityService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, group_name: &str, snapshot: NamespaceSnapshot) -> Self {
        self.snapshots
            .insert(format!("vssgp.{}", group_name), snapshot);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecurityService for MockSecurityService {
    async fn get_namespaces(
        &self,
        _team_project: &TeamProject,
        application_group: &ApplicationGroup,
    ) -> DriftResult<NamespaceSnapshot> {
        self.calls
            .lock()
            .unwrap()
            .push(application_group.name.clone());
        let descriptor = application_group.require_descriptor()?;
        self.snapshots
            .get(descriptor.as_str())
            .cloned()
            .ok_or_else(|| {
                DriftError::not_found(format!(
                    "Cannot get the namespaces for application group {}",
                    application_group.name
                ))
            })
    }
}

/// Bundles the mocks, keeping handles for call inspection.
pub struct MockServices {
    pub graph: Arc<MockGraphService>,
    pub security: Arc<MockSecurityService>,
    pub services: Services,
}

impl MockServices {
    pub fn new(
        projects: MockProjectService,
        graph: MockGraphService,
        security: MockSecurityService,
    ) -> Self {
        let graph = Arc::new(graph);
        let security = Arc::new(security);
        let services = Services::new(Arc::new(projects), graph.clone(), security.clone());
        Self {
            graph,
            security,
            services,
        }
    }
}
