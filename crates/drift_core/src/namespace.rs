//! Security namespace permission sets.

use serde::{Deserialize, Serialize};

/// Allow and deny permissions of one application group on a security namespace.
///
/// Permissions are identified by their display names. Two values with the same
/// name describe the same namespace, possibly in different states.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Namespace {
    /// Security namespace name, e.g. `Git Repositories`.
    pub name: String,

    /// Permissions that are granted.
    #[serde(default)]
    pub allow: Vec<String>,

    /// Permissions that are denied.
    #[serde(default)]
    pub deny: Vec<String>,
}

impl Namespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_allow<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allow = permissions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_deny<I, S>(mut self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deny = permissions.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if the namespace has the given name, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
