//! Property-based tests using proptest.
//!
//! These tests verify invariants of member naming, canonical ordering,
//! member patterns and collision renaming using randomly generated inputs.

use std::cmp::Ordering;

use proptest::prelude::*;
use retar::edit::{MemberPattern, MemberSet, collides, next_free_name};
use retar::format::{compare_names, encode_to_vec, reorder};
use retar::{ArchivePath, CompressionOptions, Entry};

/// Strategy for generating valid archive path strings.
///
/// - 1-4 path components separated by '/'
/// - Each component is 1-10 alphanumeric characters with optional underscores/dots/dashes
/// - Excludes "." and ".." segments (path traversal)
fn valid_path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-zA-Z0-9][a-zA-Z0-9_.-]{0,9}", 1..4)
        .prop_map(|parts| parts.join("/"))
        .prop_filter("must not contain invalid segments", |s| {
            !s.split('/').any(|seg| seg == "." || seg == "..")
        })
}

/// Names over a tiny alphabet so that shared prefixes and segments are common.
fn clustered_name_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[ab][ab.]{0,2}", 1..4).prop_map(|parts| parts.join("/"))
}

proptest! {
    /// Valid paths should always parse successfully.
    #[test]
    fn valid_paths_parse_successfully(path in valid_path_strategy()) {
        let result = ArchivePath::new(&path);
        prop_assert!(result.is_ok(), "Valid path '{}' failed to parse: {:?}", path, result);
        let parsed = result.unwrap();
        prop_assert_eq!(parsed.as_str(), &path);
    }

    /// Absolute paths should always be rejected.
    #[test]
    fn absolute_paths_rejected(path in "/[a-zA-Z0-9/]+") {
        let result = ArchivePath::new(&path);
        prop_assert!(result.is_err(), "Absolute path '{}' should be rejected", path);
    }

    /// Paths with ".." as a complete segment should always be rejected.
    #[test]
    fn traversal_paths_rejected(
        prefix in "[a-zA-Z0-9]{1,5}",
        suffix in "[a-zA-Z0-9]{1,5}"
    ) {
        let dotdot_path = format!("{}/../{}", prefix, suffix);
        prop_assert!(ArchivePath::new(&dotdot_path).is_err(), "Traversal path '{}' should be rejected", dotdot_path);
    }

    /// The segment comparison is a total order consistent with equality.
    #[test]
    fn name_order_is_total(
        a in clustered_name_strategy(),
        b in clustered_name_strategy(),
        c in clustered_name_strategy()
    ) {
        prop_assert_eq!(compare_names(&a, &b), compare_names(&b, &a).reverse());
        prop_assert_eq!(compare_names(&a, &b) == Ordering::Equal, a == b);
        if compare_names(&a, &b) != Ordering::Greater && compare_names(&b, &c) != Ordering::Greater {
            prop_assert_ne!(compare_names(&a, &c), Ordering::Greater);
        }
    }

    /// A parent always sorts before anything below it.
    #[test]
    fn parent_precedes_children(parent in valid_path_strategy(), child in valid_path_strategy()) {
        let nested = format!("{}/{}", parent, child);
        prop_assert_eq!(compare_names(&parent, &nested), Ordering::Less);
    }

    /// Reordering is independent of input order and sorted afterwards.
    #[test]
    fn reorder_is_canonical(names in proptest::collection::btree_set(clustered_name_strategy(), 0..12)) {
        let entries: Vec<Entry> = names.iter().map(|n| Entry::file(n.clone(), n.as_bytes().to_vec())).collect();

        let forward = reorder(entries.clone());
        let backward = reorder(entries.into_iter().rev());
        prop_assert_eq!(&forward, &backward);

        for pair in forward.windows(2) {
            prop_assert_eq!(compare_names(&pair[0].name, &pair[1].name), Ordering::Less);
        }

        let options = CompressionOptions::new();
        let once = encode_to_vec(&forward, &options).unwrap();
        let twice = encode_to_vec(&reorder(forward), &options).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// A directory prefix selects exactly the members below it.
    #[test]
    fn prefix_pattern_selects_subtree(dir in valid_path_strategy(), rest in valid_path_strategy()) {
        let pattern = MemberPattern::new(&format!("{}/", dir)).unwrap();
        let below = format!("{}/{}", dir, rest);
        let sibling = format!("{}x/{}", dir, rest);
        prop_assert!(pattern.matches(&below));
        prop_assert!(!pattern.matches(&sibling));
    }

    /// The renamed name never collides and repeated appends keep counting up.
    #[test]
    fn renaming_finds_free_names(base in "[a-z]{1,6}", ext in "(\\.[a-z]{1,3})?", rounds in 1usize..6) {
        let name = format!("{}{}", base, ext);
        let mut members = MemberSet::from_entries([Entry::file(name.clone(), Vec::new())]);

        for round in 1..=rounds {
            let renamed = next_free_name(&members, &name);
            prop_assert_eq!(&renamed, &format!("{}_{}{}", base, round, ext));
            prop_assert!(!collides(&members, &renamed));
            members.insert(Entry::file(renamed, Vec::new()));
            prop_assert!(collides(&members, &name));
        }
    }
}
