//! Integration tests for archive statistics.

mod common;

use retar::format::encode_to_vec;
use retar::stats::HumanSize;
use retar::{ArchiveStats, CompressionOptions, Entry, EntryKind};

#[test]
fn test_stats_of_mixed_archive() {
    let mut fifo = Entry::file("run/queue", Vec::new());
    fifo.kind = EntryKind::Other(b'6');
    let entries = vec![
        Entry::directory("bin/"),
        Entry::file("bin/tool", vec![1; 2048]),
        Entry::symlink("bin/t", "tool"),
        Entry::file("README", vec![2; 512]),
        fifo,
    ];
    let bytes = encode_to_vec(&entries, &CompressionOptions::new()).unwrap();
    let decoded = retar::read_entries(bytes.as_slice(), None).unwrap();

    let stats = ArchiveStats::from_entries(&decoded);
    assert_eq!(stats.files, 2);
    assert_eq!(stats.directories, 1);
    assert_eq!(stats.symlinks, 1);
    assert_eq!(stats.others, 1);
    assert_eq!(stats.total_size, 2560);
    assert_eq!(HumanSize(stats.total_size).to_string(), "2.50 KB");
}

#[test]
fn test_stats_of_empty_archive() {
    let bytes = common::build_archive(&CompressionOptions::new(), &[]);
    let decoded = retar::read_entries(bytes.as_slice(), None).unwrap();

    let stats = ArchiveStats::from_entries(&decoded);
    assert_eq!(stats, ArchiveStats::default());
    assert_eq!(stats.total_entries(), 0);
}
