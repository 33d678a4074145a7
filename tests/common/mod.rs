//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use retar::{CompressionOptions, Entry, Timestamps, format::encode_to_vec};

/// A fixed modification time so archives built in tests are reproducible.
pub const MTIME: u64 = 1_700_000_000;

/// Builds archive bytes from `(name, content)` pairs; names ending in `/`
/// become directories.
pub fn build_archive(compression: &CompressionOptions, members: &[(&str, &[u8])]) -> Vec<u8> {
    let entries: Vec<Entry> = members
        .iter()
        .map(|(name, content)| {
            let entry = if name.ends_with('/') {
                Entry::directory(*name)
            } else {
                Entry::file(*name, content.to_vec())
            };
            entry.with_timestamps(Timestamps::modified_at(MTIME))
        })
        .collect();
    encode_to_vec(&entries, compression).expect("Failed to encode test archive")
}

/// Writes a plain tar archive with `members` to `path`.
pub fn write_archive(path: &Path, members: &[(&str, &[u8])]) {
    fs::write(path, build_archive(&CompressionOptions::new(), members))
        .expect("Failed to write archive");
}

/// Creates a file below `root`, including missing parent directories.
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(&path, content).expect("Failed to write file");
    path
}

/// Member names of the archive at `path`, in stored order.
pub fn member_names(path: &Path, compression: &CompressionOptions) -> Vec<String> {
    retar::read_archive(path, compression.method)
        .expect("Failed to read archive")
        .into_iter()
        .map(|e| e.name)
        .collect()
}

/// Content of the member `name`, if present.
pub fn member_content(path: &Path, name: &str) -> Option<Vec<u8>> {
    retar::read_archive(path, None)
        .expect("Failed to read archive")
        .into_iter()
        .find(|e| e.name == name)
        .map(|e| e.content)
}

/// Incompressible bytes from a seeded generator.
pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    use rand::{RngCore, SeedableRng, rngs::StdRng};

    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}
