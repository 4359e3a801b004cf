//! # Drift Core
//!
//! This crate provides the reconciliation model of the drift detector: it
//! compares the security configuration an organization expects its Azure
//! DevOps team projects to have against the live state, and reports every
//! difference as a typed [`Deviation`].
//!
//! ## Overview
//!
//! A run consists of two steps:
//! 1. [`Organization::expand`] binds the organization-level pattern templates
//!    to the team projects, substituting `{teamProject.Name}` style tokens.
//! 2. [`Organization::collect_deviations`] reads the live state through the
//!    collaborator traits in [`services`] and compares team projects,
//!    application groups, members, namespaces and namespace permissions.
//!
//! ## Examples
//!
//! ```no_run
//! use drift_core::{Organization, Services};
//!
//! # async fn example(mut organization: Organization, services: Services) -> Result<(), Box<dyn std::error::Error>> {
//! organization.expand()?;
//!
//! let findings = organization.collect_deviations(&services).await?;
//! for deviation in &findings.deviations {
//!     println!("{deviation}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The crate never talks to the network. Live state is read through the
//! [`ProjectService`], [`GraphService`] and [`SecurityService`] traits, which
//! are implemented over the Azure DevOps REST API in the `devops_client` crate
//! and by in-memory mocks in the tests.

mod errors;
pub use errors::{DriftError, DriftResult};

/// Application groups and their descriptors
pub mod application_group;

/// Deviation records
pub mod deviation;

/// Deviations plus diagnostics of a run
pub mod findings;

/// Security namespace permission sets
pub mod namespace;

/// Organization aggregate
pub mod organization;

/// Pattern sum type
pub mod pattern;

/// Security pattern comparison
pub mod security_pattern;

/// Collaborator traits
pub mod services;

/// Team projects
pub mod team_project;

mod matching;
mod template;

#[cfg(test)]
mod test_support;

pub use application_group::{ApplicationGroup, Descriptor};
pub use deviation::{
    ApplicationGroupDeviation, ApplicationGroupMemberDeviation, Authorization, Deviation,
    DeviationType, NamespaceDeviation, NamespacePermissionDeviation, TeamProjectDeviation,
};
pub use findings::{DeviationSummary, Diagnostic, Findings};
pub use namespace::Namespace;
pub use organization::Organization;
pub use pattern::Pattern;
pub use security_pattern::SecurityPattern;
pub use services::{GraphService, NamespaceSnapshot, ProjectService, SecurityService, Services};
pub use team_project::{TeamProject, TeamProjectRef};
pub use template::contains_tokens;
