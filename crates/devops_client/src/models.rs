//! # Models
//!
//! Wire representations of the Azure DevOps REST resources read by the
//! adapter. Only the fields the drift detector needs are modelled; everything
//! else in the responses is ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The `{ count, value }` envelope used by most list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// A team project as returned by `_apis/projects`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectReference {
    pub id: Uuid,
    pub name: String,
}

/// Response of `_apis/graph/descriptors/{storageKey}`.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphDescriptorResult {
    /// The scope descriptor, e.g. `scp.ZjI2...`.
    pub value: String,
}

/// A group as returned by `_apis/graph/groups`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphGroup {
    pub descriptor: String,

    /// Short name, e.g. `Project Administrators`.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Project qualified name, e.g. `[Storefront]\Project Administrators`.
    #[serde(default)]
    pub principal_name: Option<String>,
}

/// A direct membership edge as returned by `_apis/graph/Memberships`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMembership {
    pub member_descriptor: String,
}

/// A subject lookup key sent to `_apis/graph/subjectlookup`.
#[derive(Debug, Clone, Serialize)]
pub struct GraphSubjectLookupKey {
    pub descriptor: String,
}

/// Request body of `_apis/graph/subjectlookup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSubjectLookup {
    pub lookup_keys: Vec<GraphSubjectLookupKey>,
}

/// A resolved graph subject.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSubject {
    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub principal_name: Option<String>,
}

/// Response of `_apis/graph/subjectlookup`, keyed by subject descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphSubjectLookupResult {
    #[serde(default)]
    pub value: HashMap<String, GraphSubject>,
}

/// A security namespace definition.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityNamespace {
    pub namespace_id: Uuid,
    pub name: String,

    #[serde(default)]
    pub actions: Vec<ActionDefinition>,
}

impl SecurityNamespace {
    /// Returns the display names of the actions whose bit is set in `mask`.
    pub fn action_names(&self, mask: i64) -> Vec<String> {
        self.actions
            .iter()
            .filter(|action| action.bit & mask != 0)
            .map(|action| action.display_name.clone())
            .collect()
    }
}

/// A permission of a security namespace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDefinition {
    pub bit: i64,
    pub display_name: String,
}

/// An access control list of a security namespace.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlList {
    /// Entries keyed by identity descriptor, e.g.
    /// `Microsoft.TeamFoundation.Identity;S-1-9-1551374245-...`.
    #[serde(default)]
    pub aces_dictionary: HashMap<String, AccessControlEntry>,
}

/// An access control entry for one identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlEntry {
    pub descriptor: String,

    #[serde(default)]
    pub allow: i64,

    #[serde(default)]
    pub deny: i64,

    #[serde(default)]
    pub extended_info: Option<AceExtendedInformation>,
}

impl AccessControlEntry {
    /// Returns the security identifier part of the identity descriptor.
    pub fn identifier(&self) -> &str {
        self.descriptor
            .split_once(';')
            .map(|(_, identifier)| identifier)
            .unwrap_or(&self.descriptor)
    }

    /// Effective allow mask, falling back to the explicit mask.
    pub fn effective_allow(&self) -> i64 {
        self.extended_info
            .as_ref()
            .and_then(|info| info.effective_allow)
            .unwrap_or(self.allow)
    }

    /// Effective deny mask, falling back to the explicit mask.
    pub fn effective_deny(&self) -> i64 {
        self.extended_info
            .as_ref()
            .and_then(|info| info.effective_deny)
            .unwrap_or(self.deny)
    }
}

/// Inherited and effective masks of an access control entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AceExtendedInformation {
    #[serde(default)]
    pub effective_allow: Option<i64>,

    #[serde(default)]
    pub effective_deny: Option<i64>,
}
