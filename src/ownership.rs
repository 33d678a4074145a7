//! Unix file ownership carried by archive members.
//!
//! Tar headers store numeric owner and group ids plus optional user and
//! group names. Names are never resolved from the ids here; they are only
//! carried through from headers that already contain them.

use std::fs::Metadata;
use std::path::Path;

/// Owner and group of an archive member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ownership {
    /// User ID (UID).
    pub uid: u64,
    /// Group ID (GID).
    pub gid: u64,
    /// User name (owner), if recorded.
    pub user_name: Option<String>,
    /// Group name, if recorded.
    pub group_name: Option<String>,
}

impl Ownership {
    /// Creates ownership from UID and GID only.
    pub fn from_ids(uid: u64, gid: u64) -> Self {
        Self {
            uid,
            gid,
            user_name: None,
            group_name: None,
        }
    }

    /// Sets the user and group names.
    pub fn with_names(mut self, user: impl Into<String>, group: impl Into<String>) -> Self {
        self.user_name = Some(user.into());
        self.group_name = Some(group.into());
        self
    }

    /// Reads ownership from filesystem metadata.
    ///
    /// On non-Unix platforms this is root:root (`0:0`).
    #[cfg(unix)]
    pub fn from_metadata(metadata: &Metadata) -> Self {
        use std::os::unix::fs::MetadataExt;

        Self::from_ids(u64::from(metadata.uid()), u64::from(metadata.gid()))
    }

    /// Reads ownership from filesystem metadata.
    ///
    /// On non-Unix platforms this is root:root (`0:0`).
    #[cfg(not(unix))]
    pub fn from_metadata(_metadata: &Metadata) -> Self {
        Self::default()
    }

    /// Applies ownership to a file path.
    ///
    /// This only works on Unix systems and requires appropriate permissions.
    /// Ids that do not fit the platform's id type are left unchanged.
    #[cfg(unix)]
    pub fn apply_to_path(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        use std::os::unix::fs::lchown;

        let uid = u32::try_from(self.uid).ok();
        let gid = u32::try_from(self.gid).ok();
        lchown(path, uid, gid)
    }

    /// Applies ownership to a file path.
    ///
    /// This only works on Unix systems and requires appropriate permissions.
    #[cfg(not(unix))]
    pub fn apply_to_path(&self, _path: impl AsRef<Path>) -> std::io::Result<()> {
        Ok(())
    }
}
