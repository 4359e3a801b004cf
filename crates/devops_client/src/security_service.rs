//! Effective namespace permissions from the security API.
//!
//! Access control entries are keyed by identity descriptor
//! (`Microsoft.TeamFoundation.Identity;S-1-9-...`), while groups are known by
//! their graph descriptor (`vssgp.<base64 of the SID>`). The two are correlated
//! by decoding the SID out of the graph descriptor.

use async_trait::async_trait;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use drift_core::{
    ApplicationGroup, Descriptor, Diagnostic, DriftResult, Namespace, NamespaceSnapshot,
    SecurityService, TeamProject,
};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::models::{AccessControlList, ListResponse, SecurityNamespace};
use crate::{DevOpsClient, Error, ACL_CONCURRENCY};

#[cfg(test)]
#[path = "security_service_tests.rs"]
mod tests;

/// Outcome of resolving one namespace for one identity.
#[derive(Debug, PartialEq)]
pub(crate) enum Resolution {
    Resolved(Namespace),
    Ambiguous {
        allow_values: usize,
        deny_values: usize,
    },
    Absent,
}

impl DevOpsClient {
    /// Lists the security namespaces of the organization.
    ///
    /// The definitions are read once per client and cached. Concurrent
    /// callers wait for the same request.
    #[instrument(skip(self))]
    pub async fn list_security_namespaces(&self) -> Result<Arc<Vec<SecurityNamespace>>, Error> {
        let namespaces = self
            .namespace_cache
            .get_or_try_init(|| async {
                let url = self.organization_endpoint(&["_apis", "securitynamespaces"])?;
                let response: ListResponse<SecurityNamespace> = self.get_json(url).await?;

                info!(
                    namespace_count = response.value.len(),
                    "Retrieved security namespaces"
                );
                Ok::<_, Error>(Arc::new(response.value))
            })
            .await?;

        Ok(namespaces.clone())
    }

    /// Lists the top-level access control lists of a namespace, including
    /// the effective permissions of every entry.
    ///
    /// The lists do not depend on the group being inspected, so each
    /// namespace is read once per client and shared by all callers.
    #[instrument(skip(self), fields(namespace_id = %namespace_id))]
    pub async fn list_access_control_lists(
        &self,
        namespace_id: Uuid,
    ) -> Result<Arc<Vec<AccessControlList>>, Error> {
        let cell = {
            let mut cache = self.acl_cache.lock().await;
            cache.entry(namespace_id).or_default().clone()
        };

        let lists = cell
            .get_or_try_init(|| async {
                let namespace_id = namespace_id.to_string();
                let mut url =
                    self.organization_endpoint(&["_apis", "accesscontrollists", &namespace_id])?;
                url.query_pairs_mut()
                    .append_pair("includeExtendedInfo", "true")
                    .append_pair("recurse", "false");

                let response: ListResponse<AccessControlList> = self.get_json(url).await?;
                debug!(list_count = response.value.len(), "Retrieved access control lists");
                Ok::<_, Error>(Arc::new(response.value))
            })
            .await?;

        Ok(lists.clone())
    }

    /// Reads the effective permissions of a group on every namespace.
    ///
    /// Namespaces where the group has no entry are skipped. Namespaces where
    /// the entries disagree are skipped and reported as diagnostics.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if no namespace resolves for the group.
    #[instrument(skip(self, team_project, application_group), fields(team_project = %team_project.name, application_group = %application_group.name))]
    pub async fn namespace_snapshot(
        &self,
        team_project: &TeamProject,
        application_group: &ApplicationGroup,
        descriptor: &Descriptor,
    ) -> Result<NamespaceSnapshot, Error> {
        let identifier = descriptor_identifier(descriptor)?;
        let namespaces = self.list_security_namespaces().await?;

        let namespace_ids: Vec<Uuid> = namespaces
            .iter()
            .map(|namespace| namespace.namespace_id)
            .collect();
        let acls: Vec<Arc<Vec<AccessControlList>>> = stream::iter(namespace_ids)
            .map(|namespace_id| self.list_access_control_lists(namespace_id))
            .buffered(ACL_CONCURRENCY)
            .try_collect()
            .await?;

        let mut snapshot = NamespaceSnapshot::default();
        for (namespace, lists) in namespaces.iter().zip(acls.iter()) {
            match resolve_namespace(namespace, lists, &identifier) {
                Resolution::Resolved(resolved) => snapshot.namespaces.push(resolved),
                Resolution::Ambiguous {
                    allow_values,
                    deny_values,
                } => {
                    warn!(
                        namespace = %namespace.name,
                        allow_values,
                        deny_values,
                        "Ambiguous effective permissions, skipping namespace"
                    );
                    snapshot.diagnostics.push(Diagnostic {
                        team_project: team_project.reference(),
                        application_group: application_group.name.clone(),
                        namespace: namespace.name.clone(),
                        message: format!(
                            "Ambiguous effective permissions ({} allow values, {} deny values)",
                            allow_values, deny_values
                        ),
                    });
                }
                Resolution::Absent => {
                    debug!(namespace = %namespace.name, "No access control entry for group")
                }
            }
        }

        if snapshot.namespaces.is_empty() {
            return Err(Error::NotFound(format!(
                "Cannot get the namespaces for application group {}",
                application_group.name
            )));
        }

        debug!(
            namespace_count = snapshot.namespaces.len(),
            diagnostic_count = snapshot.diagnostics.len(),
            "Resolved namespaces"
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl SecurityService for DevOpsClient {
    async fn get_namespaces(
        &self,
        team_project: &TeamProject,
        application_group: &ApplicationGroup,
    ) -> DriftResult<NamespaceSnapshot> {
        let descriptor = application_group.require_descriptor()?;
        Ok(self
            .namespace_snapshot(team_project, application_group, descriptor)
            .await?)
    }
}

/// Decodes the security identifier embedded in a graph subject descriptor.
pub(crate) fn descriptor_identifier(descriptor: &Descriptor) -> Result<String, Error> {
    let invalid = || Error::InvalidDescriptor(descriptor.to_string());

    let (_, encoded) = descriptor.as_str().split_once('.').ok_or_else(invalid)?;
    let encoded = encoded.trim_end_matches('=');
    let bytes = STANDARD_NO_PAD
        .decode(encoded)
        .or_else(|_| URL_SAFE_NO_PAD.decode(encoded))
        .map_err(|_| invalid())?;

    String::from_utf8(bytes).map_err(|_| invalid())
}

/// Determines the effective permissions of `identifier` on `namespace`.
pub(crate) fn resolve_namespace(
    namespace: &SecurityNamespace,
    lists: &[AccessControlList],
    identifier: &str,
) -> Resolution {
    let mut allows = BTreeSet::new();
    let mut denies = BTreeSet::new();

    for entry in lists
        .iter()
        .flat_map(|list| list.aces_dictionary.values())
        .filter(|entry| entry.identifier().eq_ignore_ascii_case(identifier))
    {
        allows.insert(entry.effective_allow());
        denies.insert(entry.effective_deny());
    }

    match (allows.len(), denies.len()) {
        (0, 0) => Resolution::Absent,
        (1, 1) => {
            let allow = allows.into_iter().next().unwrap_or_default();
            let deny = denies.into_iter().next().unwrap_or_default();
            Resolution::Resolved(
                Namespace::new(namespace.name.clone())
                    .with_allow(namespace.action_names(allow))
                    .with_deny(namespace.action_names(deny)),
            )
        }
        (allow_values, deny_values) => Resolution::Ambiguous {
            allow_values,
            deny_values,
        },
    }
}
