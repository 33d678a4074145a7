//! Writing archive members to the filesystem or a stream.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::edit::{MemberPattern, matches_any};
use crate::format::{Entry, EntryKind};
use crate::safety::validate_extract_path;
use crate::Result;

/// Options for [`extract_to_dir`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Only members selected by one of these are extracted; empty selects all.
    pub patterns: Vec<MemberPattern>,
    /// Restore permission bits from the archive.
    pub preserve_permissions: bool,
    /// Restore modification times from the archive.
    pub preserve_mtime: bool,
    /// Restore owner and group ids. Usually requires root.
    pub preserve_owner: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            patterns: Vec::new(),
            preserve_permissions: true,
            preserve_mtime: true,
            preserve_owner: false,
        }
    }
}

impl ExtractOptions {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts extraction to members selected by `patterns`.
    pub fn patterns(mut self, patterns: Vec<MemberPattern>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Sets whether permission bits are restored.
    pub fn preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Sets whether modification times are restored.
    pub fn preserve_mtime(mut self, preserve: bool) -> Self {
        self.preserve_mtime = preserve;
        self
    }

    /// Sets whether owner and group are restored.
    pub fn preserve_owner(mut self, preserve: bool) -> Self {
        self.preserve_owner = preserve;
        self
    }
}

/// Result of an extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractResult {
    /// Paths written, in archive order.
    pub extracted: Vec<PathBuf>,
    /// Selected members that could not be represented on this platform.
    pub entries_skipped: usize,
    /// Content bytes written.
    pub bytes_written: u64,
}

/// Extracts members below `dest`, creating it if needed.
///
/// Member names are validated so nothing is written outside `dest`.
/// Failing to restore metadata is logged and does not stop extraction.
///
/// # Errors
///
/// Returns [`Error::InvalidArchivePath`](crate::Error::InvalidArchivePath)
/// for unsafe member names and [`Error::Io`](crate::Error::Io) for
/// filesystem failures.
pub fn extract_to_dir(
    entries: &[Entry],
    dest: impl AsRef<Path>,
    options: &ExtractOptions,
) -> Result<ExtractResult> {
    let dest = dest.as_ref();
    fs::create_dir_all(dest)?;

    let mut result = ExtractResult::default();
    let mut directories = Vec::new();

    for entry in entries {
        if !matches_any(&options.patterns, &entry.name) {
            continue;
        }
        let path = validate_extract_path(entry.canonical_name(), dest)?;

        match entry.kind {
            EntryKind::Directory => {
                fs::create_dir_all(&path)?;
                directories.push((path.clone(), entry));
            }
            EntryKind::File => {
                create_parent(&path)?;
                fs::write(&path, &entry.content)?;
                result.bytes_written += entry.size();
                restore_metadata(&path, entry, options);
            }
            EntryKind::Symlink => {
                if !create_symlink(&path, entry)? {
                    result.entries_skipped += 1;
                    continue;
                }
            }
            EntryKind::Hardlink => {
                let target = entry.link_name.as_deref().unwrap_or_default();
                let target = validate_extract_path(target, dest)?;
                create_parent(&path)?;
                remove_existing(&path)?;
                fs::hard_link(&target, &path)?;
            }
            EntryKind::Other(flag) => {
                log::warn!(
                    "skipping {}: cannot extract member type '{}'",
                    entry.name,
                    flag as char
                );
                result.entries_skipped += 1;
                continue;
            }
        }
        result.extracted.push(path);
    }

    // Directory times last, since creating children updates them.
    for (path, entry) in directories.into_iter().rev() {
        restore_metadata(&path, entry, options);
    }

    log::debug!(
        "extracted {} members to {}",
        result.extracted.len(),
        dest.display()
    );
    Ok(result)
}

/// Writes the content of selected regular files to `out`, back to back.
///
/// Returns the number of bytes written.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if writing fails.
pub fn write_contents<W: Write>(
    entries: &[Entry],
    patterns: &[MemberPattern],
    mut out: W,
) -> Result<u64> {
    let mut written = 0;
    for entry in entries
        .iter()
        .filter(|e| e.is_file() && matches_any(patterns, &e.name))
    {
        out.write_all(&entry.content)?;
        written += entry.size();
    }
    out.flush()?;
    Ok(written)
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn remove_existing(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if !metadata.is_dir() => fs::remove_file(path)?,
        _ => {}
    }
    Ok(())
}

#[cfg(unix)]
fn create_symlink(path: &Path, entry: &Entry) -> Result<bool> {
    let target = entry.link_name.as_deref().unwrap_or_default();
    create_parent(path)?;
    remove_existing(path)?;
    std::os::unix::fs::symlink(target, path)?;
    Ok(true)
}

#[cfg(not(unix))]
fn create_symlink(_path: &Path, entry: &Entry) -> Result<bool> {
    log::warn!("skipping symbolic link {}: not supported here", entry.name);
    Ok(false)
}

fn restore_metadata(path: &Path, entry: &Entry, options: &ExtractOptions) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if options.preserve_permissions {
            if let Err(e) = fs::set_permissions(path, fs::Permissions::from_mode(entry.mode)) {
                log::warn!("Failed to set permissions on '{}': {}", path.display(), e);
            }
        }
    }

    if options.preserve_owner {
        if let Err(e) = entry.ownership.apply_to_path(path) {
            log::warn!("Failed to set owner of '{}': {}", path.display(), e);
        }
    }

    if options.preserve_mtime {
        let mtime = filetime::FileTime::from_unix_time(entry.timestamps.modified as i64, 0);
        if let Err(e) = filetime::set_file_mtime(path, mtime) {
            log::warn!("Failed to set mtime on '{}': {}", path.display(), e);
        }
    }
}
