//! Turning filesystem inputs into archive members.

use std::fs::{self, Metadata};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::archive_path::ArchivePath;
use crate::format::{Entry, EntryKind};
use crate::ownership::Ownership;
use crate::timestamp::Timestamps;
use crate::{Error, Result};

/// Where the members of an add or update request come from.
#[derive(Debug, Clone)]
pub enum EntrySource {
    /// A file, directory or link on disk. The member name is the path as
    /// given, made relative.
    Path(PathBuf),
    /// A member built in memory.
    Entry(Entry),
}

impl From<PathBuf> for EntrySource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for EntrySource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for EntrySource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<Entry> for EntrySource {
    fn from(entry: Entry) -> Self {
        Self::Entry(entry)
    }
}

impl EntrySource {
    /// Materializes the source into members, in walk order.
    ///
    /// Directories are walked when `recursive` is set; symbolic links are
    /// stored as links and never followed. Sockets are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceUnreadable`] if any part of the source cannot
    /// be read, and [`Error::InvalidArchivePath`] for paths that cannot be
    /// turned into member names.
    pub fn collect(&self, recursive: bool) -> Result<Vec<Entry>> {
        match self {
            Self::Entry(entry) => Ok(vec![entry.clone()]),
            Self::Path(path) => collect_path(path, recursive),
        }
    }
}

fn collect_path(root: &Path, recursive: bool) -> Result<Vec<Entry>> {
    let mut walker = WalkDir::new(root).follow_links(false).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(0);
    }

    let mut entries = Vec::new();
    for item in walker {
        let item = item.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
            Error::SourceUnreadable { path, source }
        })?;
        let metadata = item.metadata().map_err(|e| Error::SourceUnreadable {
            path: item.path().to_path_buf(),
            source: e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop")),
        })?;

        if let Some(entry) = entry_from_disk(item.path(), &metadata)? {
            entries.push(entry);
        }
    }
    Ok(entries)
}

fn entry_from_disk(path: &Path, metadata: &Metadata) -> Result<Option<Entry>> {
    let unreadable = |source: std::io::Error| Error::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    };

    let name = match ArchivePath::from_fs_path(path) {
        Ok(name) => name.into_string(),
        Err(_) if metadata.is_dir() => {
            log::debug!("not storing {} as a member", path.display());
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let file_type = metadata.file_type();
    let mut entry = if file_type.is_symlink() {
        let target = fs::read_link(path).map_err(unreadable)?;
        let target = target.to_str().ok_or_else(|| {
            Error::InvalidArchivePath(format!(
                "link target of {} is not valid UTF-8",
                path.display()
            ))
        })?;
        Entry::symlink(name, target)
    } else if file_type.is_dir() {
        Entry::directory(format!("{}/", name))
    } else if file_type.is_file() {
        let content = fs::read(path).map_err(unreadable)?;
        Entry::file(name, content)
    } else {
        match special_entry(name, metadata) {
            Some(entry) => entry,
            None => {
                log::warn!("skipping {}: unsupported file type", path.display());
                return Ok(None);
            }
        }
    };

    entry.mode = mode_of(metadata, entry.kind);
    entry.ownership = Ownership::from_metadata(metadata);
    entry.timestamps = Timestamps::from_metadata(metadata);
    Ok(Some(entry))
}

#[cfg(unix)]
fn mode_of(metadata: &Metadata, _kind: EntryKind) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn mode_of(metadata: &Metadata, kind: EntryKind) -> u32 {
    use crate::format::entry::{DEFAULT_DIR_MODE, DEFAULT_FILE_MODE, DEFAULT_SYMLINK_MODE};

    match kind {
        EntryKind::Directory => DEFAULT_DIR_MODE,
        EntryKind::Symlink => DEFAULT_SYMLINK_MODE,
        _ if metadata.permissions().readonly() => DEFAULT_FILE_MODE & !0o222,
        _ => DEFAULT_FILE_MODE,
    }
}

/// Device nodes and FIFOs become header-only members.
#[cfg(unix)]
fn special_entry(name: String, metadata: &Metadata) -> Option<Entry> {
    use std::os::unix::fs::{FileTypeExt, MetadataExt};

    let file_type = metadata.file_type();
    let (flag, device) = if file_type.is_char_device() {
        (tar::EntryType::Char, Some(split_rdev(metadata.rdev())))
    } else if file_type.is_block_device() {
        (tar::EntryType::Block, Some(split_rdev(metadata.rdev())))
    } else if file_type.is_fifo() {
        (tar::EntryType::Fifo, None)
    } else {
        return None;
    };

    let mut entry = Entry::file(name, Vec::new());
    entry.kind = EntryKind::Other(flag.as_byte());
    entry.device = device;
    Some(entry)
}

#[cfg(not(unix))]
fn special_entry(_name: String, _metadata: &Metadata) -> Option<Entry> {
    None
}

/// Splits a Linux `dev_t` into major and minor numbers.
#[cfg(unix)]
fn split_rdev(rdev: u64) -> (u32, u32) {
    let major = ((rdev >> 32) & 0xffff_f000) | ((rdev >> 8) & 0x0000_0fff);
    let minor = ((rdev >> 12) & 0xffff_ff00) | (rdev & 0x0000_00ff);
    (major as u32, minor as u32)
}
