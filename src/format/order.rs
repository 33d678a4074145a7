//! Canonical member order.
//!
//! Names are compared `/`-segment by segment, each segment byte-wise; when
//! one name's segments are a prefix of the other's, the shorter sorts first.
//! So `a/b` sorts before `a/b/c` and `a/c`, and a directory is always
//! immediately followed by its subtree.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::archive_path::trim_dir_suffix;

use super::entry::Entry;

/// Compares two member names in canonical order.
///
/// ```
/// use std::cmp::Ordering;
/// use retar::format::order::compare_names;
///
/// assert_eq!(compare_names("a/b", "a/b/c"), Ordering::Less);
/// assert_eq!(compare_names("a/b/c", "a/c"), Ordering::Less);
/// assert_eq!(compare_names("a.txt", "a/b"), Ordering::Less);
/// ```
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let mut left = a.split('/');
    let mut right = b.split('/');
    loop {
        match (left.next(), right.next()) {
            (Some(l), Some(r)) => match l.as_bytes().cmp(r.as_bytes()) {
                Ordering::Equal => continue,
                unequal => return unequal,
            },
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (None, None) => return Ordering::Equal,
        }
    }
}

/// Puts members into canonical order and strips trailing `/` from names.
///
/// If stripping makes two names equal, the member whose stored name was
/// already canonical is kept and the other is dropped with a warning. The
/// result depends only on the set of members, not on the input order.
pub fn reorder(entries: impl IntoIterator<Item = Entry>) -> Vec<Entry> {
    let mut by_name: HashMap<String, Entry> = HashMap::new();
    for entry in entries {
        let canonical = entry.canonical_name().to_string();
        match by_name.get(&canonical) {
            Some(kept) if rank(kept) <= rank(&entry) => {
                log::warn!(
                    "dropping '{}': '{}' already names the same member",
                    entry.name,
                    kept.name
                );
            }
            Some(kept) => {
                log::warn!(
                    "dropping '{}': '{}' already names the same member",
                    kept.name,
                    entry.name
                );
                by_name.insert(canonical, entry);
            }
            None => {
                by_name.insert(canonical, entry);
            }
        }
    }

    let mut ordered: Vec<Entry> = by_name
        .into_iter()
        .map(|(canonical, mut entry)| {
            entry.name = canonical;
            entry
        })
        .collect();
    ordered.sort_by(|a, b| compare_names(&a.name, &b.name));
    ordered
}

/// Already-canonical names win, then the shortest stored name.
fn rank(entry: &Entry) -> (bool, usize) {
    (
        entry.name.len() != trim_dir_suffix(&entry.name).len(),
        entry.name.len(),
    )
}
