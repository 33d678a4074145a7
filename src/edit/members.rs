//! The in-memory working set of archive members.

use std::collections::HashMap;

use crate::archive_path::trim_dir_suffix;
use crate::format::{Entry, reorder};

/// Members keyed by stored name.
///
/// Order is not tracked; [`MemberSet::into_ordered`] imposes canonical order
/// once editing is done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberSet {
    members: HashMap<String, Entry>,
}

impl MemberSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from decoded entries. A later entry with the same stored
    /// name replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = Entry>) -> Self {
        let mut set = Self::new();
        for entry in entries {
            if let Some(previous) = set.members.insert(entry.name.clone(), entry) {
                log::debug!("'{}' appears more than once, keeping the last", previous.name);
            }
        }
        set
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if there are no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns true if a member is stored under exactly `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Returns the member stored under exactly `name`.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.members.get(name)
    }

    /// Iterates over stored names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    /// Iterates over members in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.members.values()
    }

    /// Inserts or replaces a member, returning the replaced one.
    ///
    /// A directory also replaces a directory stored under the other spelling
    /// (`x` versus `x/`), so re-adding a tree does not duplicate it.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        if entry.is_dir() {
            let canonical = trim_dir_suffix(&entry.name);
            let other = if canonical.len() == entry.name.len() {
                format!("{}/", canonical)
            } else {
                canonical.to_string()
            };
            if self.members.get(&other).is_some_and(Entry::is_dir) {
                let replaced = self.members.remove(&other);
                self.members.insert(entry.name.clone(), entry);
                return replaced;
            }
        }
        self.members.insert(entry.name.clone(), entry)
    }

    /// Removes every member for which `predicate` returns true and returns
    /// them sorted by name.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&str) -> bool) -> Vec<Entry> {
        let doomed: Vec<String> = self
            .members
            .keys()
            .filter(|name| predicate(name))
            .cloned()
            .collect();
        let mut removed: Vec<Entry> = doomed
            .iter()
            .filter_map(|name| self.members.remove(name))
            .collect();
        removed.sort_by(|a, b| a.name.cmp(&b.name));
        removed
    }

    /// Consumes the set, returning members in canonical order with trailing
    /// `/` stripped from names.
    pub fn into_ordered(self) -> Vec<Entry> {
        reorder(self.members.into_values())
    }
}

impl FromIterator<Entry> for MemberSet {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_duplicate_wins() {
        let set = MemberSet::from_entries(vec![
            Entry::file("a.txt", b"old".to_vec()),
            Entry::file("b.txt", b"b".to_vec()),
            Entry::file("a.txt", b"new".to_vec()),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("a.txt").unwrap().content, b"new");
    }

    #[test]
    fn test_directory_spellings_merge() {
        let mut set = MemberSet::new();
        set.insert(Entry::directory("docs"));
        let replaced = set.insert(Entry::directory("docs/"));
        assert!(replaced.is_some());
        assert_eq!(set.len(), 1);
        assert!(set.contains("docs/"));
    }

    #[test]
    fn test_file_and_directory_spellings_stay_apart() {
        let mut set = MemberSet::new();
        set.insert(Entry::file("docs", b"plain".to_vec()));
        set.insert(Entry::directory("docs/"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_remove_where() {
        let mut set: MemberSet = vec![
            Entry::file("keep", b"".to_vec()),
            Entry::file("tmp/b", b"".to_vec()),
            Entry::file("tmp/a", b"".to_vec()),
        ]
        .into_iter()
        .collect();
        let removed = set.remove_where(|name| name.starts_with("tmp/"));
        let names: Vec<_> = removed.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["tmp/a", "tmp/b"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_into_ordered() {
        let set = MemberSet::from_entries(vec![
            Entry::file("b", b"".to_vec()),
            Entry::directory("a/"),
            Entry::file("a/x", b"".to_vec()),
        ]);
        let names: Vec<_> = set.into_ordered().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["a", "a/x", "b"]);
    }
}
