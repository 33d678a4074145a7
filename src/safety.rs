//! Path validation for extraction.
//!
//! Member names come from the archive and cannot be trusted: a name like
//! `../../etc/passwd` or `/etc/passwd` must never be written outside the
//! destination directory, and neither may a name that passes through a
//! symbolic link created by an earlier member.

use std::path::{Path, PathBuf};

use crate::archive_path::ArchivePath;
use crate::{Error, Result};

/// Resolves a member name to a path below `dest_root`.
///
/// The name is validated as an [`ArchivePath`] (relative, no `..`), then the
/// deepest existing ancestor of the target is canonicalized and must still
/// lie inside the canonicalized destination.
///
/// # Errors
///
/// Returns [`Error::InvalidArchivePath`] if the name is unsafe or resolves
/// outside `dest_root`, and [`Error::Io`] if `dest_root` cannot be
/// canonicalized.
///
/// ```rust,no_run
/// use retar::safety::validate_extract_path;
/// use std::path::Path;
///
/// let dest = Path::new("out");
/// assert!(validate_extract_path("docs/readme.md", dest).is_ok());
/// assert!(validate_extract_path("../escape", dest).is_err());
/// assert!(validate_extract_path("/etc/passwd", dest).is_err());
/// ```
pub fn validate_extract_path(name: &str, dest_root: &Path) -> Result<PathBuf> {
    let member = ArchivePath::new(name)?;
    let full_path = dest_root.join(member.as_str());

    let canonical_dest = dest_root.canonicalize()?;

    let mut ancestor = full_path.as_path();
    let mut pending = Vec::new();
    while !ancestor.exists() {
        if let Some(file_name) = ancestor.file_name() {
            pending.push(file_name.to_os_string());
        }
        match ancestor.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => ancestor = parent,
            _ => break,
        }
    }

    let mut resolved = if ancestor.exists() {
        ancestor.canonicalize()?
    } else {
        canonical_dest.clone()
    };
    for component in pending.into_iter().rev() {
        resolved.push(component);
    }

    if !resolved.starts_with(&canonical_dest) {
        return Err(Error::InvalidArchivePath(format!(
            "{} resolves outside the destination",
            name
        )));
    }
    Ok(full_path)
}
