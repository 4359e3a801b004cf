//! Application group types.

use serde::{Deserialize, Serialize};

use crate::template::expand_tokens;
use crate::{DriftError, DriftResult, Namespace, TeamProject};

#[cfg(test)]
#[path = "application_group_tests.rs"]
mod tests;

/// Opaque remote identifier correlating an application group to ACL entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Descriptor(String);

impl Descriptor {
    /// Creates a descriptor from its remote representation.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the descriptor as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the descriptor is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Descriptor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A principal-holding group scoped to a team project.
///
/// On the expected side the group lists the members and namespace permissions
/// it should have. On the actual side the remote platform supplies the name,
/// the descriptor and the `is_special` flag only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationGroup {
    /// Display name. May contain `{teamProject.*}` tokens in templates.
    pub name: String,

    /// Remote descriptor, resolved when the group is matched against live data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Descriptor>,

    /// Expected member display names.
    #[serde(default)]
    pub members: Vec<String>,

    /// Expected namespace permissions.
    #[serde(default)]
    pub namespaces: Vec<Namespace>,

    /// Platform built-in group that is never reported obsolete and is exempt
    /// from namespace checks.
    #[serde(default)]
    pub is_special: bool,
}

impl ApplicationGroup {
    /// Creates an application group with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the descriptor.
    pub fn with_descriptor(mut self, descriptor: impl Into<String>) -> Self {
        self.descriptor = Some(Descriptor::new(descriptor));
        self
    }

    /// Sets the expected members.
    pub fn with_members<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = members.into_iter().map(Into::into).collect();
        self
    }

    /// Adds an expected namespace.
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespaces.push(namespace);
        self
    }

    /// Marks the group as a platform built-in group.
    pub fn special(mut self) -> Self {
        self.is_special = true;
        self
    }

    /// Returns true if the group has the given name, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Returns the descriptor, failing if it is unset or blank.
    ///
    /// Remote queries keyed by descriptor must call this before issuing any
    /// request.
    pub fn require_descriptor(&self) -> DriftResult<&Descriptor> {
        match &self.descriptor {
            Some(descriptor) if !descriptor.is_blank() => Ok(descriptor),
            _ => Err(DriftError::invalid_argument(
                "application_group",
                format!("Descriptor has not been set for '{}'", self.name),
            )),
        }
    }

    /// Returns a copy of this expected group enriched with the remote state of
    /// the matching `current` group.
    pub fn resolved_from(&self, current: &ApplicationGroup) -> ApplicationGroup {
        ApplicationGroup {
            descriptor: current.descriptor.clone(),
            is_special: self.is_special || current.is_special,
            ..self.clone()
        }
    }

    /// Returns a copy with the templated fields bound to `team_project`.
    pub fn expand(&self, team_project: &TeamProject) -> ApplicationGroup {
        ApplicationGroup {
            name: expand_tokens(&self.name, team_project),
            descriptor: self.descriptor.clone(),
            members: self
                .members
                .iter()
                .map(|m| expand_tokens(m, team_project))
                .collect(),
            namespaces: self.namespaces.clone(),
            is_special: self.is_special,
        }
    }
}
