//! Archive editor for rewriting archives in place.

use std::io;
use std::path::{Path, PathBuf};

use crate::codec::CompressionOptions;
use crate::format::{encode_to_vec, read_archive};
use crate::progress::ProgressReporter;
use crate::{Error, Result};

use super::collision::CollisionPolicy;
use super::commit::commit;
use super::members::MemberSet;
use super::operation::{Operation, OperationBuilder};
use super::planner::plan;
use super::source::EntrySource;

/// Settings shared by every editing entry point.
#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    /// Codec used both to read the existing archive and to write the new one.
    pub compression: CompressionOptions,
    /// What to do when an added member's name is taken.
    pub collision: CollisionPolicy,
}

impl EditOptions {
    /// Creates options for a plain tar with the rename policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression options.
    pub fn compression(mut self, compression: CompressionOptions) -> Self {
        self.compression = compression;
        self
    }

    /// Sets the collision policy.
    pub fn collision(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }
}

/// Result of an edit operation.
#[must_use = "edit result should be checked to verify operation completed as expected"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    /// Members inserted by add requests, renamed ones included.
    pub entries_added: usize,
    /// Members inserted or replaced by update requests.
    pub entries_updated: usize,
    /// Added members stored under a suffixed name.
    pub entries_renamed: usize,
    /// Added members left out after a collision.
    pub entries_skipped: usize,
    /// Members removed by delete requests.
    pub entries_deleted: usize,
    /// Members carried over without being touched by any request.
    pub entries_kept: usize,
    /// Members in the rewritten archive.
    pub total_entries: usize,
    /// Size of the rewritten archive file in bytes.
    pub archive_size: u64,
}

/// An editor for one archive file.
///
/// Requests are queued and only run by [`ArchiveEditor::apply`], which
/// reads the whole archive, applies the requests in order, sorts the members
/// into canonical order and writes the result back over the file. Nothing on
/// disk changes unless every step up to the final write succeeds.
///
/// # Example
///
/// ```rust,no_run
/// use retar::edit::{ArchiveEditor, CollisionPolicy, EditOptions};
/// use retar::progress::NoProgress;
///
/// let result = ArchiveEditor::open("backup.tar")
///     .options(EditOptions::new().collision(CollisionPolicy::Skip))
///     .add("notes/")
///     .delete("*.tmp")?
///     .apply(NoProgress)?;
/// println!("{} members, {} added", result.total_entries, result.entries_added);
/// # Ok::<(), retar::Error>(())
/// ```
#[derive(Debug)]
pub struct ArchiveEditor {
    path: PathBuf,
    mode: OpenMode,
    operations: OperationBuilder,
    options: EditOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpenMode {
    /// The archive must exist.
    Existing,
    /// A missing archive is treated as empty.
    CreateIfMissing,
    /// Any existing content is ignored.
    Truncate,
}

impl ArchiveEditor {
    fn with_mode(path: impl AsRef<Path>, mode: OpenMode) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            mode,
            operations: OperationBuilder::new(),
            options: EditOptions::default(),
        }
    }

    /// Edits an existing archive. [`apply`](Self::apply) fails if the file
    /// does not exist.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::with_mode(path, OpenMode::Existing)
    }

    /// Edits an archive, starting from an empty one if the file is missing.
    pub fn open_or_create(path: impl AsRef<Path>) -> Self {
        Self::with_mode(path, OpenMode::CreateIfMissing)
    }

    /// Builds a new archive, discarding whatever the file holds.
    pub fn create(path: impl AsRef<Path>) -> Self {
        Self::with_mode(path, OpenMode::Truncate)
    }

    /// Sets the edit options.
    pub fn options(mut self, options: EditOptions) -> Self {
        self.options = options;
        self
    }

    /// Queues an add request. Directories are walked.
    pub fn add(mut self, source: impl Into<EntrySource>) -> Self {
        self.operations = self.operations.add(source);
        self
    }

    /// Queues an update request. Directories are walked.
    pub fn update(mut self, source: impl Into<EntrySource>) -> Self {
        self.operations = self.operations.update(source);
        self
    }

    /// Queues a delete request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] if the pattern does not compile.
    pub fn delete(mut self, pattern: &str) -> Result<Self> {
        self.operations = self.operations.delete(pattern)?;
        Ok(self)
    }

    /// Queues an already built request.
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations = self.operations.push(operation);
        self
    }

    /// Runs the queued requests and rewrites the archive.
    ///
    /// With no queued requests this reorganizes the archive: members are
    /// re-encoded in canonical order with the configured codec.
    ///
    /// # Errors
    ///
    /// Any decode, source, collision, codec or I/O failure. Except for I/O
    /// errors during the final write, the archive file is left unchanged.
    pub fn apply(self, mut reporter: impl ProgressReporter) -> Result<EditResult> {
        let Self {
            path,
            mode,
            operations,
            options,
        } = self;
        let operations = operations.build();

        let mut members = match load(&path, mode, &options.compression)? {
            Some(members) => members,
            None => MemberSet::new(),
        };
        let original_count = members.len();
        log::debug!(
            "loaded {} members from {}",
            original_count,
            path.display()
        );

        let summary = plan(&mut members, &operations, &options.collision, &mut reporter)?;

        let ordered = members.into_ordered();
        let bytes = encode_to_vec(&ordered, &options.compression)?;

        if reporter.should_cancel() {
            return Err(Error::Cancelled);
        }
        commit(&path, &bytes)?;

        let total_entries = ordered.len();
        Ok(EditResult {
            entries_added: summary.added,
            entries_updated: summary.updated,
            entries_renamed: summary.renamed,
            entries_skipped: summary.skipped,
            entries_deleted: summary.deleted,
            entries_kept: total_entries.saturating_sub(summary.added + summary.updated),
            total_entries,
            archive_size: bytes.len() as u64,
        })
    }
}

fn load(path: &Path, mode: OpenMode, compression: &CompressionOptions) -> Result<Option<MemberSet>> {
    if mode == OpenMode::Truncate {
        return Ok(None);
    }
    match read_archive(path, compression.method) {
        Ok(entries) => Ok(Some(MemberSet::from_entries(entries))),
        Err(Error::Io(e)) if e.kind() == io::ErrorKind::NotFound && mode == OpenMode::CreateIfMissing => {
            log::debug!("{} does not exist, starting empty", path.display());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
