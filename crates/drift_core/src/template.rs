//! Substitution of `{teamProject.*}` tokens in pattern fields.
//!
//! Expansion is best effort: recognized tokens are replaced with the value from
//! the team project, anything else is left verbatim.

use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::TeamProject;

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| {
        Regex::new(r"\{teamProject\.([A-Za-z]+)\}").expect("token pattern is a valid regex")
    })
}

/// Replaces the `{teamProject.Name}`, `{teamProject.Key}` and
/// `{teamProject.Id}` tokens in `value`.
///
/// The id token is left in place when the project has no identifier.
pub(crate) fn expand_tokens(value: &str, team_project: &TeamProject) -> String {
    token_pattern()
        .replace_all(value, |caps: &Captures| match &caps[1] {
            "Name" => team_project.name.clone(),
            "Key" => team_project.key.clone(),
            "Id" => team_project
                .id
                .map(|id| id.to_string())
                .unwrap_or_else(|| caps[0].to_string()),
            _ => caps[0].to_string(),
        })
        .into_owned()
}

/// Returns true if `value` still contains a recognized token.
pub fn contains_tokens(value: &str) -> bool {
    token_pattern().is_match(value)
}
