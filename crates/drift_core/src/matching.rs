//! Case-insensitive set operations on named items.

use std::collections::HashSet;

#[cfg(test)]
#[path = "matching_tests.rs"]
mod tests;

/// A set of names compared without regard to case.
#[derive(Debug, Default)]
pub(crate) struct NameSet(HashSet<String>);

impl NameSet {
    pub(crate) fn from_names<'a, I>(names: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self(names.into_iter().map(str::to_lowercase).collect())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_lowercase())
    }
}

/// Returns the items of `items` whose name is not in `others`, in order.
///
/// Items whose name was already yielded (in any letter case) are skipped.
pub(crate) fn exclusive<'a, T, F>(items: &'a [T], name: F, others: &NameSet) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    let mut seen = HashSet::new();
    items
        .iter()
        .filter(|item| !others.contains(name(item)))
        .filter(|item| seen.insert(name(item).to_lowercase()))
        .collect()
}

/// Returns the items of `items` with duplicate names removed, in order.
pub(crate) fn distinct<'a, T, F>(items: &'a [T], name: F) -> Vec<&'a T>
where
    F: Fn(&T) -> &str,
{
    exclusive(items, name, &NameSet::default())
}
