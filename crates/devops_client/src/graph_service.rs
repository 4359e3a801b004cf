//! Application groups and memberships from the graph API.

use async_trait::async_trait;
use drift_core::{ApplicationGroup, Descriptor, DriftResult, GraphService, TeamProject};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::models::{
    GraphDescriptorResult, GraphGroup, GraphMembership, GraphSubjectLookup,
    GraphSubjectLookupKey, GraphSubjectLookupResult, ListResponse,
};
use crate::{DevOpsClient, Error};

impl DevOpsClient {
    /// Lists the groups scoped to a team project.
    #[instrument(skip(self), fields(project_id = %project_id))]
    pub async fn list_groups(&self, project_id: Uuid) -> Result<Vec<GraphGroup>, Error> {
        let project_id = project_id.to_string();
        let url = self.graph_endpoint(&["_apis", "graph", "descriptors", &project_id])?;
        let scope: GraphDescriptorResult = self.get_json(url).await?;

        let mut url = self.graph_endpoint(&["_apis", "graph", "groups"])?;
        url.query_pairs_mut()
            .append_pair("scopeDescriptor", &scope.value);

        let groups: Vec<GraphGroup> = self.get_paged(url).await?;

        info!(group_count = groups.len(), "Retrieved application groups");
        Ok(groups)
    }

    /// Returns the display names of the direct members of a group, in the
    /// order the memberships are returned.
    #[instrument(skip(self), fields(descriptor = %descriptor))]
    pub async fn list_member_names(&self, descriptor: &Descriptor) -> Result<Vec<String>, Error> {
        let mut url =
            self.graph_endpoint(&["_apis", "graph", "Memberships", descriptor.as_str()])?;
        url.query_pairs_mut().append_pair("direction", "down");

        let memberships: ListResponse<GraphMembership> = self.get_json(url).await?;
        if memberships.value.is_empty() {
            debug!("Group has no members");
            return Ok(Vec::new());
        }

        let lookup = GraphSubjectLookup {
            lookup_keys: memberships
                .value
                .iter()
                .map(|m| GraphSubjectLookupKey {
                    descriptor: m.member_descriptor.clone(),
                })
                .collect(),
        };
        let url = self.graph_endpoint(&["_apis", "graph", "subjectlookup"])?;
        let subjects: GraphSubjectLookupResult = self.post_json(url, &lookup).await?;

        let mut names = Vec::with_capacity(memberships.value.len());
        for membership in &memberships.value {
            let name = subjects
                .value
                .get(&membership.member_descriptor)
                .and_then(|subject| {
                    subject
                        .display_name
                        .clone()
                        .or_else(|| subject.principal_name.clone())
                });

            match name {
                Some(name) => names.push(name),
                None => debug!(
                    member_descriptor = %membership.member_descriptor,
                    "Skipping member that could not be resolved"
                ),
            }
        }

        Ok(names)
    }

    /// Converts a graph group into an actual-side application group.
    ///
    /// The project qualified principal name is used as the group name so that
    /// names like `[Storefront]\Readers` compare directly. Groups without any
    /// name are dropped.
    fn to_application_group(&self, group: GraphGroup) -> Option<ApplicationGroup> {
        let is_special = self.is_special_group(&group);
        let name = group.principal_name.or(group.display_name)?;

        let application_group = ApplicationGroup::new(name).with_descriptor(group.descriptor);
        Some(if is_special {
            application_group.special()
        } else {
            application_group
        })
    }

    fn is_special_group(&self, group: &GraphGroup) -> bool {
        let short_name = group.display_name.as_deref().or_else(|| {
            group
                .principal_name
                .as_deref()
                .map(|name| name.rsplit('\\').next().unwrap_or(name))
        });

        short_name.is_some_and(|short_name| {
            self.special_groups
                .iter()
                .any(|special| special.eq_ignore_ascii_case(short_name))
        })
    }
}

#[async_trait]
impl GraphService for DevOpsClient {
    async fn get_application_groups(
        &self,
        team_project: &TeamProject,
    ) -> DriftResult<Vec<ApplicationGroup>> {
        let project_id = team_project.require_id()?;
        let groups = self.list_groups(project_id).await?;

        Ok(groups
            .into_iter()
            .filter_map(|group| self.to_application_group(group))
            .collect())
    }

    async fn get_members(
        &self,
        _team_project: &TeamProject,
        application_group: &ApplicationGroup,
    ) -> DriftResult<Vec<String>> {
        let descriptor = application_group.require_descriptor()?;
        Ok(self.list_member_names(descriptor).await?)
    }
}
