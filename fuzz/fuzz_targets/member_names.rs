//! Fuzz target for member name handling.
//!
//! Run with: cargo +nightly fuzz run member_names
//!
//! Checks that validated names stay relative, that the name order is
//! antisymmetric and that a pattern never panics on any input.

#![no_main]

use std::cmp::Ordering;

use libfuzzer_sys::fuzz_target;
use retar::ArchivePath;
use retar::edit::MemberPattern;
use retar::format::compare_names;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let (left, right) = text.split_once('\n').unwrap_or((text, ""));

    if let Ok(path) = ArchivePath::new(left) {
        let normalized = path.as_str();
        assert!(!normalized.starts_with('/'), "absolute: {:?}", normalized);
        assert!(!normalized.contains('\0'), "NUL byte: {:?}", normalized);
        assert!(
            !normalized.split('/').any(|seg| seg == ".."),
            "traversal: {:?}",
            normalized
        );
    }

    let forward = compare_names(left, right);
    assert_eq!(forward, compare_names(right, left).reverse());
    assert_eq!(forward == Ordering::Equal, left == right);

    if let Ok(pattern) = MemberPattern::new(left) {
        let _ = pattern.matches(right);
    }
});
