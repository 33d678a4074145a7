//! In-memory archive members.

use crate::archive_path::trim_dir_suffix;
use crate::ownership::Ownership;
use crate::timestamp::Timestamps;

/// Default mode for regular files created in memory.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Default mode for directories created in memory.
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Default mode for symbolic links.
pub const DEFAULT_SYMLINK_MODE: u32 = 0o777;

/// The kind of an archive member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file with content.
    File,
    /// Directory (header only).
    Directory,
    /// Symbolic link; the target is in [`Entry::link_name`].
    Symlink,
    /// Hard link to another member; the target is in [`Entry::link_name`].
    Hardlink,
    /// Any other member type, kept with its raw tar type flag
    /// (devices, FIFOs, PAX global headers, ...).
    Other(u8),
}

impl EntryKind {
    /// Maps a tar type flag to a kind.
    ///
    /// Contiguous and GNU sparse files are read back as regular files, since
    /// their content is materialized in full.
    pub fn from_entry_type(ty: tar::EntryType) -> Self {
        match ty {
            tar::EntryType::Regular | tar::EntryType::Continuous | tar::EntryType::GNUSparse => {
                Self::File
            }
            tar::EntryType::Directory => Self::Directory,
            tar::EntryType::Symlink => Self::Symlink,
            tar::EntryType::Link => Self::Hardlink,
            other => Self::Other(other.as_byte()),
        }
    }

    /// Returns the tar type flag written for this kind.
    pub fn entry_type(&self) -> tar::EntryType {
        match self {
            Self::File => tar::EntryType::Regular,
            Self::Directory => tar::EntryType::Directory,
            Self::Symlink => tar::EntryType::Symlink,
            Self::Hardlink => tar::EntryType::Link,
            Self::Other(flag) => tar::EntryType::new(*flag),
        }
    }

    /// Returns true for symbolic and hard links.
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Symlink | Self::Hardlink)
    }
}

/// One archive member with its header metadata and materialized content.
///
/// The content length is the member size; there is no separately stored
/// size that could disagree with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Member name, `/`-separated. Directories may carry a trailing `/`.
    pub name: String,
    /// Member kind.
    pub kind: EntryKind,
    /// Permission bits (and setuid/setgid/sticky).
    pub mode: u32,
    /// Owner and group.
    pub ownership: Ownership,
    /// Modification, access and change times.
    pub timestamps: Timestamps,
    /// Link target for symbolic and hard links.
    pub link_name: Option<String>,
    /// Device major and minor numbers for device nodes.
    pub device: Option<(u32, u32)>,
    /// Member content; empty for directories and links.
    pub content: Vec<u8>,
}

impl Entry {
    fn new(name: impl Into<String>, kind: EntryKind, mode: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            mode,
            ownership: Ownership::default(),
            timestamps: Timestamps::default(),
            link_name: None,
            device: None,
            content: Vec::new(),
        }
    }

    /// Creates a regular file member.
    ///
    /// ```
    /// use retar::Entry;
    ///
    /// let entry = Entry::file("notes/todo.txt", b"buy milk".to_vec());
    /// assert_eq!(entry.size(), 8);
    /// ```
    pub fn file(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let mut entry = Self::new(name, EntryKind::File, DEFAULT_FILE_MODE);
        entry.content = content.into();
        entry
    }

    /// Creates a directory member.
    pub fn directory(name: impl Into<String>) -> Self {
        Self::new(name, EntryKind::Directory, DEFAULT_DIR_MODE)
    }

    /// Creates a symbolic link member.
    pub fn symlink(name: impl Into<String>, target: impl Into<String>) -> Self {
        let mut entry = Self::new(name, EntryKind::Symlink, DEFAULT_SYMLINK_MODE);
        entry.link_name = Some(target.into());
        entry
    }

    /// Sets the permission bits.
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the owner and group.
    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    /// Sets the timestamps.
    pub fn with_timestamps(mut self, timestamps: Timestamps) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Returns the content size in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    /// Returns true if this member is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Returns true if this member is a regular file.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Returns the name with any trailing `/` removed.
    pub fn canonical_name(&self) -> &str {
        trim_dir_suffix(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_entry() {
        let entry = Entry::file("a.txt", b"hello".to_vec()).with_mode(0o600);
        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.size(), 5);
        assert_eq!(entry.mode, 0o600);
        assert!(entry.is_file());
        assert!(!entry.is_dir());
    }

    #[test]
    fn test_directory_canonical_name() {
        let entry = Entry::directory("logs/");
        assert!(entry.is_dir());
        assert_eq!(entry.size(), 0);
        assert_eq!(entry.canonical_name(), "logs");
        assert_eq!(entry.mode, DEFAULT_DIR_MODE);
    }

    #[test]
    fn test_symlink_entry() {
        let entry = Entry::symlink("current", "releases/v2");
        assert!(entry.kind.is_link());
        assert_eq!(entry.link_name.as_deref(), Some("releases/v2"));
    }

    #[test]
    fn test_kind_type_flag_mapping() {
        for kind in [
            EntryKind::File,
            EntryKind::Directory,
            EntryKind::Symlink,
            EntryKind::Hardlink,
            EntryKind::Other(b'3'),
            EntryKind::Other(b'6'),
        ] {
            assert_eq!(EntryKind::from_entry_type(kind.entry_type()), kind);
        }
        assert_eq!(
            EntryKind::from_entry_type(tar::EntryType::GNUSparse),
            EntryKind::File
        );
        assert_eq!(
            EntryKind::from_entry_type(tar::EntryType::Continuous),
            EntryKind::File
        );
    }
}
