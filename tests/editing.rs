//! Integration tests for in-place archive editing.
//!
//! These tests verify that editing an archive file:
//! - Renames appended duplicates with numeric suffixes
//! - Deletes by glob and by directory prefix
//! - Replaces or inserts members on update
//! - Leaves the file untouched when anything fails before the rewrite

mod common;

use std::fs;

use retar::archive_path::ArchivePath;
use retar::edit::{ArchiveEditor, CollisionPolicy, EditOptions};
use retar::progress::{EventLog, MutationEvent, NoProgress, ProgressReporter};
use retar::{CodecMethod, CompressionOptions, Entry, EntryKind, Error};

use common::{member_content, member_names, write_archive, write_file};

fn plain() -> CompressionOptions {
    CompressionOptions::new()
}

// ============================================================================
// Append
// ============================================================================

#[test]
fn test_append_renames_duplicates_in_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("docs.tar");
    write_archive(&archive, &[("report.txt", b"v0")]);

    for content in [b"v1", b"v2"] {
        let result = retar::append(
            &archive,
            [Entry::file("report.txt", content.to_vec())],
            &EditOptions::default(),
        )
        .unwrap();
        assert_eq!(result.entries_added, 1);
        assert_eq!(result.entries_renamed, 1);
    }

    assert_eq!(
        member_names(&archive, &plain()),
        ["report.txt", "report_1.txt", "report_2.txt"]
    );
    assert_eq!(member_content(&archive, "report.txt").unwrap(), b"v0");
    assert_eq!(member_content(&archive, "report_1.txt").unwrap(), b"v1");
    assert_eq!(member_content(&archive, "report_2.txt").unwrap(), b"v2");
}

#[test]
fn test_append_from_disk_uses_path_as_name() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("out.tar");
    let source = dir.path().join("src");
    write_file(&source, "main.rs", b"fn main() {}");
    write_file(&source, "lib/mod.rs", b"");

    let result = retar::append(&archive, [source.as_path()], &EditOptions::default()).unwrap();

    let prefix = ArchivePath::from_fs_path(&source).unwrap().into_string();
    let names = member_names(&archive, &plain());
    assert!(names.contains(&format!("{}/main.rs", prefix)), "{names:?}");
    assert!(names.contains(&format!("{}/lib/mod.rs", prefix)), "{names:?}");
    assert!(names.contains(&format!("{}/lib", prefix)), "{names:?}");
    assert_eq!(result.entries_renamed, 0);
}

#[test]
fn test_append_directories_never_collide() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("assets/", b""), ("assets/logo.png", b"png")]);

    let result = retar::append(
        &archive,
        [Entry::directory("assets/")],
        &EditOptions::default(),
    )
    .unwrap();

    assert_eq!(result.entries_renamed, 0);
    assert_eq!(member_names(&archive, &plain()), ["assets", "assets/logo.png"]);
}

#[test]
fn test_append_skip_policy() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("notes.md", b"old")]);

    let mut log = EventLog::new();
    let result = ArchiveEditor::open(&archive)
        .options(EditOptions::new().collision(CollisionPolicy::Skip))
        .add(Entry::file("notes.md", b"new".to_vec()))
        .add(Entry::file("todo.md", b"x".to_vec()))
        .apply(&mut log)
        .unwrap();

    assert_eq!(result.entries_skipped, 1);
    assert_eq!(result.entries_added, 1);
    assert_eq!(member_content(&archive, "notes.md").unwrap(), b"old");
    assert_eq!(
        log.lines(),
        ["Skipping file: notes.md", "Appended: todo.md (1 bytes)"]
    );
}

#[test]
fn test_append_ask_policy_consults_prompt() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("a.txt", b"1"), ("b.txt", b"2")]);

    let policy = CollisionPolicy::ask(|name: &str| name == "a.txt");
    let result = ArchiveEditor::open(&archive)
        .options(EditOptions::new().collision(policy))
        .add(Entry::file("a.txt", b"3".to_vec()))
        .add(Entry::file("b.txt", b"4".to_vec()))
        .apply(NoProgress)
        .unwrap();

    assert_eq!(result.entries_renamed, 1);
    assert_eq!(result.entries_skipped, 1);
    assert_eq!(
        member_names(&archive, &plain()),
        ["a.txt", "a_1.txt", "b.txt"]
    );
}

#[test]
fn test_append_creates_missing_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("new.tar");

    let result = retar::append(
        &archive,
        [Entry::file("hello.txt", b"hi".to_vec())],
        &EditOptions::default(),
    )
    .unwrap();

    assert_eq!(result.total_entries, 1);
    assert_eq!(result.archive_size, fs::metadata(&archive).unwrap().len());
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn test_delete_by_prefix_keeps_sibling() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(
        &archive,
        &[
            ("logs", b"a file named logs"),
            ("logs2/x.log", b"x"),
            ("logsx.txt", b"y"),
        ],
    );
    // `logs` stays a plain file while `logs/...` members exist beside it
    retar::append(
        &archive,
        [
            Entry::file("logs/a.log", b"a".to_vec()),
            Entry::file("logs/deep/b.log", b"b".to_vec()),
        ],
        &EditOptions::default(),
    )
    .unwrap();

    let result = retar::delete(&archive, ["logs/"], &EditOptions::default()).unwrap();

    assert_eq!(result.entries_deleted, 2);
    assert_eq!(
        member_names(&archive, &plain()),
        ["logs", "logs2/x.log", "logsx.txt"]
    );
}

#[test]
fn test_delete_glob_does_not_cross_directories() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(
        &archive,
        &[("a.tmp", b""), ("keep.txt", b""), ("sub/b.tmp", b"")],
    );

    let mut log = EventLog::new();
    let result = ArchiveEditor::open(&archive)
        .delete("*.tmp")
        .unwrap()
        .apply(&mut log)
        .unwrap();

    assert_eq!(result.entries_deleted, 1);
    assert_eq!(log.lines(), ["Deleted: a.tmp"]);
    assert_eq!(member_names(&archive, &plain()), ["keep.txt", "sub/b.tmp"]);
}

#[test]
fn test_delete_without_match_still_reorganizes() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("b", b""), ("a", b"")]);

    let result = retar::delete(&archive, ["nothing*"], &EditOptions::default()).unwrap();

    assert_eq!(result.entries_deleted, 0);
    assert_eq!(result.entries_kept, 2);
    assert_eq!(member_names(&archive, &plain()), ["a", "b"]);
}

#[test]
fn test_delete_invalid_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("a", b"")]);
    let before = fs::read(&archive).unwrap();

    let err = retar::delete(&archive, ["[unclosed"], &EditOptions::default()).unwrap_err();

    assert!(matches!(err, Error::Pattern { .. }), "{err}");
    assert_eq!(fs::read(&archive).unwrap(), before);
}

// ============================================================================
// Update
// ============================================================================

#[test]
fn test_update_replaces_and_inserts() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("site.tar");
    write_archive(
        &archive,
        &[("index.html", b"<old>"), ("style.css", b"body {}")],
    );
    let untouched_before = retar::read_archive(&archive, None)
        .unwrap()
        .into_iter()
        .find(|e| e.name == "style.css")
        .unwrap();

    let mut log = EventLog::new();
    let result = ArchiveEditor::open(&archive)
        .update(Entry::file("index.html", b"<new page>".to_vec()))
        .update(Entry::file("robots.txt", b"*".to_vec()))
        .apply(&mut log)
        .unwrap();

    assert_eq!(result.entries_updated, 2);
    assert_eq!(result.entries_kept, 1);
    assert_eq!(result.total_entries, 3);
    assert_eq!(
        log.lines(),
        [
            "Added or updated: index.html (10 bytes)",
            "Added or updated: robots.txt (1 bytes)"
        ]
    );

    let entries = retar::read_archive(&archive, None).unwrap();
    let index = entries.iter().find(|e| e.name == "index.html").unwrap();
    assert_eq!(index.content, b"<new page>");
    assert_eq!(index.size(), 10);
    let style = entries.iter().find(|e| e.name == "style.css").unwrap();
    assert_eq!(style, &untouched_before);
}

#[test]
fn test_update_symlink_over_file() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("current", b"v1")]);

    retar::update(
        &archive,
        [Entry::symlink("current", "releases/v2")],
        &EditOptions::default(),
    )
    .unwrap();

    let entries = retar::read_archive(&archive, None).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Symlink);
    assert_eq!(entries[0].link_name.as_deref(), Some("releases/v2"));
}

// ============================================================================
// Compressed archives
// ============================================================================

#[cfg(feature = "deflate")]
#[test]
fn test_edit_keeps_codec() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar.gz");
    let gzip = CompressionOptions::new().method(CodecMethod::Gzip);
    fs::write(
        &archive,
        common::build_archive(&gzip, &[("a", b"1"), ("b", b"2")]),
    )
    .unwrap();

    let options = EditOptions::new().compression(gzip.clone());
    retar::delete(&archive, ["a"], &options).unwrap();

    let bytes = fs::read(&archive).unwrap();
    assert_eq!(&bytes[..2], &[0x1f, 0x8b]);
    assert_eq!(member_names(&archive, &gzip), ["b"]);
}

// ============================================================================
// Atomicity
// ============================================================================

#[test]
fn test_unreadable_source_leaves_archive_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("a", b"1")]);
    let before = fs::read(&archive).unwrap();

    let err = ArchiveEditor::open(&archive)
        .delete("a")
        .unwrap()
        .add(dir.path().join("does-not-exist"))
        .apply(NoProgress)
        .unwrap_err();

    assert!(matches!(err, Error::SourceUnreadable { .. }), "{err}");
    assert_eq!(fs::read(&archive).unwrap(), before);
}

#[test]
fn test_collision_failure_leaves_archive_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("a.txt", b"1")]);
    let before = fs::read(&archive).unwrap();

    let err = ArchiveEditor::open(&archive)
        .options(EditOptions::new().collision(CollisionPolicy::Fail))
        .add(Entry::file("a.txt", b"2".to_vec()))
        .apply(NoProgress)
        .unwrap_err();

    assert!(matches!(err, Error::EntryExists { ref path } if path == "a.txt"));
    assert_eq!(fs::read(&archive).unwrap(), before);
}

#[test]
fn test_wrong_codec_leaves_archive_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("a", b"1")]);
    let before = fs::read(&archive).unwrap();

    let options = EditOptions::new().compression(CompressionOptions::new().method(CodecMethod::Gzip));
    let result = retar::append(&archive, [Entry::file("b", b"2".to_vec())], &options);

    assert!(result.is_err());
    assert_eq!(fs::read(&archive).unwrap(), before);
}

struct CancelAfter {
    remaining: usize,
}

impl ProgressReporter for CancelAfter {
    fn on_event(&mut self, _event: &MutationEvent<'_>) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    fn should_cancel(&self) -> bool {
        self.remaining == 0
    }
}

#[test]
fn test_cancel_leaves_archive_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("a", b"1"), ("b", b"2")]);
    let before = fs::read(&archive).unwrap();

    let err = ArchiveEditor::open(&archive)
        .delete("a")
        .unwrap()
        .delete("b")
        .unwrap()
        .apply(CancelAfter { remaining: 1 })
        .unwrap_err();

    assert!(matches!(err, Error::Cancelled));
    assert_eq!(fs::read(&archive).unwrap(), before);
}

#[test]
fn test_open_requires_existing_archive() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("missing.tar");

    let err = retar::reorganize(&archive, &EditOptions::default()).unwrap_err();

    assert!(err.is_io_error());
    assert!(!archive.exists());
}

#[cfg(unix)]
#[test]
fn test_rewrite_keeps_file_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("a", b"1")]);
    fs::set_permissions(&archive, fs::Permissions::from_mode(0o600)).unwrap();

    retar::append(
        &archive,
        [Entry::file("b", b"2".to_vec())],
        &EditOptions::default(),
    )
    .unwrap();

    let mode = fs::metadata(&archive).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

// ============================================================================
// Archives written by other tools
// ============================================================================

/// One regular member with a hand-filled header. Only the name, type, size
/// and checksum are set, so mode, uid, gid and mtime stay blank.
fn hand_written_member(name: &[u8], content: &[u8]) -> Vec<u8> {
    let mut header = tar::Header::new_gnu();
    header.as_old_mut().name[..name.len()].copy_from_slice(name);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(content.len() as u64);
    header.set_cksum();
    let mut builder = tar::Builder::new(Vec::new());
    builder.append(&header, content).unwrap();
    builder.into_inner().unwrap()
}

#[test]
fn test_append_to_archive_with_parent_segments() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("foreign.tar");
    fs::write(&archive, hand_written_member(b"a/../b", b"old")).unwrap();

    let result = retar::append(
        &archive,
        [Entry::file("new.txt", b"new".to_vec())],
        &EditOptions::default(),
    )
    .unwrap();

    assert_eq!(result.total_entries, 2);
    assert_eq!(member_names(&archive, &plain()), ["a/b", "new.txt"]);
    assert_eq!(member_content(&archive, "a/b").unwrap(), b"old");
}

#[test]
fn test_reorganize_archive_with_blank_numeric_fields() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("blank.tar");
    fs::write(&archive, hand_written_member(b"plain.txt", b"data")).unwrap();

    retar::reorganize(&archive, &EditOptions::default()).unwrap();

    let entries = retar::read_archive(&archive, None).unwrap();
    assert_eq!(entries[0].name, "plain.txt");
    assert_eq!(entries[0].ownership.uid, 0);
    assert_eq!(entries[0].timestamps.modified, 0);
    assert_eq!(entries[0].content, b"data");
}

#[test]
fn test_non_utf8_name_is_refused_not_renamed() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("latin1.tar");
    let bytes = hand_written_member(b"caf\xE9.txt", b"x");
    fs::write(&archive, &bytes).unwrap();

    let err = retar::reorganize(&archive, &EditOptions::default()).unwrap_err();

    assert!(err.is_format_error(), "{err}");
    assert_eq!(fs::read(&archive).unwrap(), bytes);
}

// ============================================================================
// Progress through the one-call functions
// ============================================================================

#[test]
fn test_one_call_functions_report_progress() {
    let dir = tempfile::tempdir().unwrap();
    let archive = dir.path().join("a.tar");
    write_archive(&archive, &[("report.txt", b"v0"), ("old.log", b"x0")]);
    let options = EditOptions::default();
    let mut log = EventLog::new();

    retar::append_with_progress(
        &archive,
        [Entry::file("report.txt", b"v1".to_vec())],
        &options,
        &mut log,
    )
    .unwrap();
    retar::update_with_progress(
        &archive,
        [Entry::file("notes.md", b"n".to_vec())],
        &options,
        &mut log,
    )
    .unwrap();
    retar::delete_with_progress(&archive, ["*.log"], &options, &mut log).unwrap();
    retar::reorganize_with_progress(&archive, &options, &mut log).unwrap();

    assert_eq!(
        log.lines(),
        [
            "Duplicated file renamed to: report_1.txt",
            "Appended: report_1.txt (2 bytes)",
            "Added or updated: notes.md (1 bytes)",
            "Deleted: old.log",
        ]
    );

    let fresh = dir.path().join("fresh.tar");
    let mut log = EventLog::new();
    retar::create_with_progress(&fresh, [Entry::file("one", b"1".to_vec())], &options, &mut log)
        .unwrap();
    assert_eq!(log.lines(), ["Appended: one (1 bytes)"]);
}
