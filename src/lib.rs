//! # retar
//!
//! In-place editing of tar archives, optionally wrapped in one of several
//! compression codecs.
//!
//! An archive is read completely into memory, changed there, sorted into a
//! canonical path order and written back over the original file. The file is
//! only touched once the new archive has been fully built, so a corrupt
//! archive, an unreadable input or a codec failure never leaves a half
//! written file behind.
//!
//! ## Quick Start
//!
//! ### Appending Files
//!
//! ```rust,no_run
//! use retar::{EditOptions, Result};
//!
//! fn main() -> Result<()> {
//!     // report.txt already in the archive is kept; the new one is stored
//!     // as report_1.txt
//!     let result = retar::append("backup.tar", ["report.txt"], &EditOptions::default())?;
//!     println!("added {}, renamed {}", result.entries_added, result.entries_renamed);
//!     Ok(())
//! }
//! ```
//!
//! ### Updating and Deleting in a Compressed Archive
//!
//! ```rust,no_run
//! use retar::{CodecMethod, CompressionOptions, EditOptions, Result};
//!
//! fn main() -> Result<()> {
//!     let options = EditOptions::new().compression(
//!         CompressionOptions::new()
//!             .method(CodecMethod::Gzip)
//!             .level(9)?,
//!     );
//!
//!     retar::update("site.tar.gz", ["public/index.html"], &options)?;
//!     retar::delete("site.tar.gz", ["public/drafts/", "*.bak"], &options)?;
//!     Ok(())
//! }
//! ```
//!
//! ### Inspecting an Archive
//!
//! ```rust,no_run
//! use retar::{ArchiveStats, CodecMethod, Result};
//!
//! fn main() -> Result<()> {
//!     let entries = retar::read_archive("logs.tar.zst", Some(CodecMethod::Zstd))?;
//!     for entry in &entries {
//!         println!("{:o} {} ({} bytes)", entry.mode, entry.name, entry.size());
//!     }
//!     let stats = ArchiveStats::from_entries(&entries);
//!     println!("{} files, {} bytes", stats.files, stats.total_size);
//!     Ok(())
//! }
//! ```
//!
//! For queued, mixed requests with progress events use
//! [`edit::ArchiveEditor`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `deflate` | Yes | gzip and zlib |
//! | `bzip2` | Yes | bzip2 |
//! | `xz` | Yes | xz and legacy lzma |
//! | `lz4` | Yes | LZ4 frames |
//! | `zstd` | Yes | Zstandard, multithreaded |
//! | `brotli` | Yes | Brotli |
//! | `s2` | Yes | Snappy framing (s2) |
//! | `cli` | Yes | The `retar` command-line tool |
//!
//! ### Disabling Default Features
//!
//! ```toml
//! [dependencies]
//! retar = { version = "0.1", default-features = false, features = ["zstd"] }
//! ```
//!
//! Selecting a codec whose feature is disabled fails with
//! [`Error::UnsupportedFeature`].
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

use std::path::Path;

pub mod archive_path;
pub mod codec;
pub mod edit;
pub mod error;
pub mod extract;
pub mod format;
pub mod ownership;
pub mod progress;
pub mod safety;
pub mod stats;
pub mod timestamp;

pub use archive_path::ArchivePath;
pub use codec::{CodecMethod, CompressionOptions};
pub use edit::{
    ArchiveEditor, CollisionPolicy, EditOptions, EditResult, EntrySource, MemberPattern,
    Operation, OperationBuilder,
};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, ExtractResult, extract_to_dir, write_contents};
pub use format::{Entry, EntryKind, read_archive, read_entries};
pub use ownership::Ownership;
pub use progress::{MutationEvent, NoProgress, ProgressReporter, progress_fn};
pub use stats::ArchiveStats;
pub use timestamp::Timestamps;

/// Appends `inputs` to the archive at `path`, walking directories.
///
/// Names already in the archive are resolved with the collision policy in
/// `options`. A missing archive is created.
///
/// # Errors
///
/// See [`ArchiveEditor::apply`].
pub fn append<I, S>(path: impl AsRef<Path>, inputs: I, options: &EditOptions) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: Into<EntrySource>,
{
    append_with_progress(path, inputs, options, NoProgress)
}

/// Like [`append`], reporting every added, renamed or skipped member to
/// `reporter`.
pub fn append_with_progress<I, S>(
    path: impl AsRef<Path>,
    inputs: I,
    options: &EditOptions,
    reporter: impl ProgressReporter,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: Into<EntrySource>,
{
    inputs
        .into_iter()
        .fold(ArchiveEditor::open_or_create(path), |editor, input| editor.add(input))
        .options(options.clone())
        .apply(reporter)
}

/// Inserts `inputs` into the archive at `path`, replacing members with the
/// same name. A missing archive is created.
///
/// # Errors
///
/// See [`ArchiveEditor::apply`].
pub fn update<I, S>(path: impl AsRef<Path>, inputs: I, options: &EditOptions) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: Into<EntrySource>,
{
    update_with_progress(path, inputs, options, NoProgress)
}

/// Like [`update`], reporting every inserted or replaced member.
pub fn update_with_progress<I, S>(
    path: impl AsRef<Path>,
    inputs: I,
    options: &EditOptions,
    reporter: impl ProgressReporter,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: Into<EntrySource>,
{
    inputs
        .into_iter()
        .fold(ArchiveEditor::open_or_create(path), |editor, input| editor.update(input))
        .options(options.clone())
        .apply(reporter)
}

/// Removes every member selected by any of `patterns`.
///
/// All patterns are compiled before the archive is read.
///
/// # Errors
///
/// Returns [`Error::Pattern`] for invalid patterns; otherwise see
/// [`ArchiveEditor::apply`].
pub fn delete<I, S>(path: impl AsRef<Path>, patterns: I, options: &EditOptions) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    delete_with_progress(path, patterns, options, NoProgress)
}

/// Like [`delete`], reporting every removed member.
pub fn delete_with_progress<I, S>(
    path: impl AsRef<Path>,
    patterns: I,
    options: &EditOptions,
    reporter: impl ProgressReporter,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut editor = ArchiveEditor::open(path).options(options.clone());
    for pattern in patterns {
        editor = editor.delete(pattern.as_ref())?;
    }
    editor.apply(reporter)
}

/// Rewrites the archive at `path` in canonical member order.
///
/// Running this twice produces byte-identical files.
///
/// # Errors
///
/// See [`ArchiveEditor::apply`].
pub fn reorganize(path: impl AsRef<Path>, options: &EditOptions) -> Result<EditResult> {
    reorganize_with_progress(path, options, NoProgress)
}

/// Like [`reorganize`]. No member events are emitted, but `reporter` can
/// still cancel before the rewrite.
pub fn reorganize_with_progress(
    path: impl AsRef<Path>,
    options: &EditOptions,
    reporter: impl ProgressReporter,
) -> Result<EditResult> {
    ArchiveEditor::open(path)
        .options(options.clone())
        .apply(reporter)
}

/// Creates a new archive at `path` from `inputs`, replacing any existing
/// file.
///
/// # Errors
///
/// See [`ArchiveEditor::apply`].
pub fn create<I, S>(path: impl AsRef<Path>, inputs: I, options: &EditOptions) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: Into<EntrySource>,
{
    create_with_progress(path, inputs, options, NoProgress)
}

/// Like [`create`], reporting every added member.
pub fn create_with_progress<I, S>(
    path: impl AsRef<Path>,
    inputs: I,
    options: &EditOptions,
    reporter: impl ProgressReporter,
) -> Result<EditResult>
where
    I: IntoIterator<Item = S>,
    S: Into<EntrySource>,
{
    inputs
        .into_iter()
        .fold(ArchiveEditor::create(path), |editor, input| editor.add(input))
        .options(options.clone())
        .apply(reporter)
}
