//! Team project listing.

use async_trait::async_trait;
use drift_core::{DriftResult, ProjectService, TeamProject};
use tracing::{info, instrument};

use crate::models::ProjectReference;
use crate::{DevOpsClient, Error};

const PAGE_SIZE: &str = "100";

impl DevOpsClient {
    /// Lists every team project of the organization.
    #[instrument(skip(self), fields(organization_url = %self.organization_url))]
    pub async fn list_projects(&self) -> Result<Vec<ProjectReference>, Error> {
        let mut url = self.organization_endpoint(&["_apis", "projects"])?;
        url.query_pairs_mut().append_pair("$top", PAGE_SIZE);

        let projects: Vec<ProjectReference> = self.get_paged(url).await?;

        info!(project_count = projects.len(), "Retrieved team projects");
        Ok(projects)
    }
}

#[async_trait]
impl ProjectService for DevOpsClient {
    async fn get_projects(&self) -> DriftResult<Vec<TeamProject>> {
        let projects = self.list_projects().await?;
        Ok(projects
            .into_iter()
            .map(|project| TeamProject::new(project.id, project.name))
            .collect())
    }
}
