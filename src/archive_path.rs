//! Archive member names: normalization on the way in, validation on the way out.

use crate::{Error, Result};
use std::fmt;
use std::path::{Component, Path};

/// Maximum length for archive paths (in bytes).
///
/// GNU long-name records can carry arbitrarily long names; this bounds what
/// a hostile archive can make us allocate per header.
const MAX_PATH_LENGTH: usize = 32768;

/// A validated member name that can be written into a tar header.
///
/// `ArchivePath` uses forward slashes and validates that:
/// - No NUL bytes are present
/// - The path is not absolute (does not start with `/`)
/// - No empty segments exist (no `//` or trailing `/`)
/// - No `.` or `..` segments are present
///
/// # Examples
///
/// ```
/// use retar::ArchivePath;
///
/// let path = ArchivePath::new("dir/file.txt").unwrap();
/// assert_eq!(path.as_str(), "dir/file.txt");
///
/// assert!(ArchivePath::new("../secret").is_err());
/// assert!(ArchivePath::new("/absolute/path").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Creates a new `ArchivePath` from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchivePath`] if the path:
    /// - Contains NUL bytes
    /// - Is an absolute path (starts with `/`)
    /// - Contains empty segments (e.g., `a//b`) or a trailing slash
    /// - Contains `.` or `..` segments
    /// - Is empty
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Builds a member name from a filesystem path.
    ///
    /// Separators become `/`, `.` components are dropped, and any root,
    /// drive prefix, or `..` components are stripped with a warning, the
    /// way `tar` itself does when archiving such paths.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchivePath`] if nothing remains of the path
    /// or it is not valid UTF-8.
    pub fn from_fs_path(path: &Path) -> Result<Self> {
        let mut segments = Vec::new();
        let mut stripped = false;
        for component in path.components() {
            match component {
                Component::Normal(part) => {
                    let part = part.to_str().ok_or_else(|| {
                        Error::InvalidArchivePath(format!(
                            "{} is not valid UTF-8",
                            path.display()
                        ))
                    })?;
                    segments.push(part);
                }
                Component::CurDir => {}
                Component::RootDir | Component::Prefix(_) | Component::ParentDir => {
                    stripped = true;
                }
            }
        }
        if stripped {
            log::warn!(
                "removing leading or parent components from member name {}",
                path.display()
            );
        }
        Self::new(&segments.join("/"))
    }

    /// Validates an archive path string.
    fn validate(s: &str) -> Result<()> {
        if s.contains('\0') {
            return Err(Error::InvalidArchivePath("contains NUL byte".into()));
        }

        if s.is_empty() {
            return Err(Error::InvalidArchivePath("empty path".into()));
        }

        if s.len() > MAX_PATH_LENGTH {
            return Err(Error::InvalidArchivePath(format!(
                "path exceeds maximum length of {} bytes",
                MAX_PATH_LENGTH
            )));
        }

        if s.starts_with('/') {
            return Err(Error::InvalidArchivePath(format!(
                "absolute path not allowed: {}",
                s
            )));
        }

        if s.ends_with('/') {
            return Err(Error::InvalidArchivePath(format!(
                "trailing slash not allowed: {}",
                s
            )));
        }

        for segment in s.split('/') {
            match segment {
                "" => {
                    return Err(Error::InvalidArchivePath(format!(
                        "empty segment (consecutive slashes): {}",
                        s
                    )));
                }
                "." => {
                    return Err(Error::InvalidArchivePath(format!(
                        "'.' segment not allowed: {}",
                        s
                    )));
                }
                ".." => {
                    return Err(Error::InvalidArchivePath(format!(
                        "'..' segment not allowed: {}",
                        s
                    )));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the path and returns the inner string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Returns the file name (last segment) of this path.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Returns the file extension, if any.
    ///
    /// ```
    /// use retar::ArchivePath;
    ///
    /// assert_eq!(ArchivePath::new("dir/file.txt").unwrap().extension(), Some("txt"));
    /// assert_eq!(ArchivePath::new(".gitignore").unwrap().extension(), None);
    /// ```
    pub fn extension(&self) -> Option<&str> {
        let (_, ext) = split_extension(&self.0);
        ext.strip_prefix('.')
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for ArchivePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ArchivePath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}

/// Splits a member name into the part before its extension and the
/// extension including the dot.
///
/// The extension starts at the last `.` of the final segment. A final
/// segment that starts with its only dot (`.bashrc`) has no extension.
///
/// ```
/// use retar::archive_path::split_extension;
///
/// assert_eq!(split_extension("docs/report.txt"), ("docs/report", ".txt"));
/// assert_eq!(split_extension("a.tar.gz"), ("a.tar", ".gz"));
/// assert_eq!(split_extension("dir.d/README"), ("dir.d/README", ""));
/// assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
/// ```
pub fn split_extension(name: &str) -> (&str, &str) {
    let segment_start = name.rfind('/').map_or(0, |i| i + 1);
    match name[segment_start..].rfind('.') {
        Some(0) | None => (name, ""),
        Some(dot) => name.split_at(segment_start + dot),
    }
}

/// Strips trailing `/` separators from a member name.
pub fn trim_dir_suffix(name: &str) -> &str {
    name.trim_end_matches('/')
}

/// Cleans a member name as read from a tar header.
///
/// Leading `/` characters and `..` segments are removed with a warning, and
/// empty and `.` segments are dropped, so `./a//b` and `a/b` name the same
/// member and `a/../b` becomes `a/b`. A trailing `/` (directory marker) is
/// preserved. Returns an empty string for the archive
/// root itself (`./`).
pub fn sanitize_member_name(raw: &str) -> String {
    if raw.starts_with('/') {
        log::warn!("removing leading '/' from member name {}", raw);
    }
    if raw.split('/').any(|segment| segment == "..") {
        log::warn!("removing '..' segments from member name {}", raw);
    }
    let mut name = raw
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect::<Vec<_>>()
        .join("/");
    if raw.ends_with('/') && !name.is_empty() {
        name.push('/');
    }
    name
}
