//! Fuzz target for decoding arbitrary bytes as a tar stream.
//!
//! Run with: cargo +nightly fuzz run read_entries
//!
//! The first byte picks the codec so that the gzip and zstd framing paths
//! are reached as well as plain tar.

#![no_main]

use libfuzzer_sys::fuzz_target;
use retar::CodecMethod;
use retar::format::read_entries;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let method = match selector % 3 {
        0 => None,
        1 => Some(CodecMethod::Gzip),
        _ => Some(CodecMethod::Zstd),
    };

    if let Ok(entries) = read_entries(body, method) {
        for entry in &entries {
            // Every decoded name can be written back
            let name = retar::archive_path::trim_dir_suffix(&entry.name);
            assert!(retar::ArchivePath::new(name).is_ok(), "unwritable name: {:?}", entry.name);
            assert_eq!(entry.size(), entry.content.len() as u64);
        }
    }
});
