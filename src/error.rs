//! Error types for tar mutation operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes when decoding, mutating, and re-encoding tar archives,
//! along with a convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`. Nothing
//! is retried internally: every failure that happens before the archive is
//! rewritten leaves the file on disk untouched.
//!
//! ```rust,no_run
//! use retar::{EditOptions, Error};
//!
//! match retar::delete("backup.tar.zst", ["logs/"], &EditOptions::default()) {
//!     Ok(result) => println!("removed {} entries", result.entries_deleted),
//!     Err(Error::MalformedArchive { entry, reason }) => {
//!         eprintln!("archive is damaged near {:?}: {}", entry, reason);
//!     }
//!     Err(Error::Pattern { pattern, .. }) => eprintln!("bad pattern: {}", pattern),
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// Helper struct for formatting MalformedArchive error messages.
struct MalformedDisplay<'a> {
    entry: Option<&'a str>,
    reason: &'a str,
}

impl std::fmt::Display for MalformedDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Malformed archive")?;
        if let Some(name) = self.entry {
            write!(f, " at entry '{}'", name)?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// The main error type for tar mutation operations.
///
/// # Error Categories
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io], [`SourceUnreadable`][Self::SourceUnreadable] | File system operations |
/// | Format | [`MalformedArchive`][Self::MalformedArchive], [`InvalidArchivePath`][Self::InvalidArchivePath] | Damaged or hostile archive data |
/// | Codec | [`Codec`][Self::Codec], [`UnknownCodec`][Self::UnknownCodec], [`UnsupportedFeature`][Self::UnsupportedFeature] | Compression stream setup |
/// | Request | [`Pattern`][Self::Pattern], [`InvalidCompressionLevel`][Self::InvalidCompressionLevel], [`EntryExists`][Self::EntryExists], [`Cancelled`][Self::Cancelled] | Caller-supplied parameters |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred during file operations.
    ///
    /// This covers reading the archive file, writing the rebuilt archive and
    /// restoring its permissions.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A source path given to an add or update request could not be read.
    #[error("Cannot read source '{}': {source}", path.display())]
    SourceUnreadable {
        /// The filesystem path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The archive stream is corrupt or truncated.
    ///
    /// Returned for bad header checksums, unparsable header fields, a
    /// compressed stream that fails mid-way, and member content shorter than
    /// the size recorded in its header.
    #[error("{}", MalformedDisplay { entry: entry.as_deref(), reason })]
    MalformedArchive {
        /// The member being read when the damage was detected, if known.
        entry: Option<String>,
        /// A description of the damage.
        reason: String,
    },

    /// A compression codec failed to initialize or finalize.
    #[error("{method} codec error: {reason}")]
    Codec {
        /// Name of the codec.
        method: &'static str,
        /// A description of the failure.
        reason: String,
    },

    /// A codec identifier did not name any known algorithm.
    #[error("Unknown compression algorithm: {0}")]
    UnknownCodec(String),

    /// A feature required by the request was compiled out of this build.
    ///
    /// # Recovery
    ///
    /// Enable the corresponding feature flag when building:
    /// ```toml
    /// retar = { version = "0.1", features = ["zstd", "xz"] }
    /// ```
    #[error("Unsupported feature: {feature}")]
    UnsupportedFeature {
        /// The name of the unsupported feature.
        feature: &'static str,
    },

    /// A member pattern has invalid glob syntax.
    ///
    /// Raised while the delete request is built, before anything is mutated.
    #[error("Invalid pattern '{pattern}': {reason}")]
    Pattern {
        /// The offending pattern.
        pattern: String,
        /// Description of why the pattern is invalid.
        reason: String,
    },

    /// An archive path is invalid.
    ///
    /// Archive paths must:
    /// - Not contain null bytes
    /// - Not be empty
    /// - Not contain `..` segments
    /// - Be relative
    #[error("Invalid archive path: {0}")]
    InvalidArchivePath(String),

    /// An entry already exists in the archive.
    ///
    /// Returned by append when the collision policy is
    /// [`CollisionPolicy::Fail`](crate::edit::CollisionPolicy::Fail).
    #[error("Entry already exists: {path}")]
    EntryExists {
        /// The path that already exists.
        path: String,
    },

    /// The operation was cancelled through the progress reporter before the
    /// archive was rewritten.
    #[error("Operation cancelled")]
    Cancelled,

    /// An invalid compression level was provided.
    ///
    /// Compression levels must be in the range 0-9 and are reinterpreted
    /// for each algorithm.
    ///
    /// ```rust
    /// use retar::{CompressionOptions, Error};
    ///
    /// assert!(CompressionOptions::new().level(9).is_ok());
    /// let result = CompressionOptions::new().level(15);
    /// assert!(matches!(result, Err(Error::InvalidCompressionLevel { level: 15 })));
    /// ```
    #[error("invalid compression level {level}: must be 0-9")]
    InvalidCompressionLevel {
        /// The invalid level that was provided.
        level: u32,
    },
}

impl Error {
    /// Returns `true` if the archive contents themselves are at fault.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::MalformedArchive { .. } | Error::InvalidArchivePath(_)
        )
    }

    /// Returns `true` if this error came from the filesystem.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_) | Error::SourceUnreadable { .. })
    }

    /// Returns `true` if this error is related to codecs or features missing
    /// from this build.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFeature { .. } | Error::UnknownCodec(_)
        )
    }

    /// Returns the entry name associated with this error, if any.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::MalformedArchive { entry, .. } => entry.as_deref(),
            Error::EntryExists { path } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Creates a MalformedArchive error.
    pub fn malformed(entry: Option<&str>, reason: impl Into<String>) -> Self {
        Error::MalformedArchive {
            entry: entry.map(str::to_owned),
            reason: reason.into(),
        }
    }

    /// Creates a Codec error.
    pub fn codec(method: &'static str, reason: impl std::fmt::Display) -> Self {
        Error::Codec {
            method,
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for tar mutation operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.is_io_error());
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_malformed_with_entry() {
        let err = Error::malformed(Some("docs/a.txt"), "unexpected end of content");
        assert_eq!(
            err.to_string(),
            "Malformed archive at entry 'docs/a.txt': unexpected end of content"
        );
        assert_eq!(err.entry_name(), Some("docs/a.txt"));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_malformed_without_entry() {
        let err = Error::malformed(None, "bad checksum");
        assert_eq!(err.to_string(), "Malformed archive: bad checksum");
        assert_eq!(err.entry_name(), None);
    }

    #[test]
    fn test_codec_error() {
        let err = Error::codec("zstd", "bad frame");
        assert_eq!(err.to_string(), "zstd codec error: bad frame");
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_pattern_error() {
        let err = Error::Pattern {
            pattern: "[a".into(),
            reason: "unclosed character class".into(),
        };
        assert!(err.to_string().contains("[a"));
    }

    #[test]
    fn test_source_unreadable_keeps_source() {
        use std::error::Error as _;
        let err = Error::SourceUnreadable {
            path: PathBuf::from("/missing"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.is_io_error());
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/missing"));
    }

    #[test]
    fn test_unsupported() {
        assert!(Error::UnsupportedFeature { feature: "xz" }.is_unsupported());
        assert!(Error::UnknownCodec("rar".into()).is_unsupported());
        assert!(!Error::EntryExists { path: "a".into() }.is_unsupported());
    }

    #[test]
    fn test_invalid_compression_level() {
        let err = Error::InvalidCompressionLevel { level: 12 };
        assert_eq!(err.to_string(), "invalid compression level 12: must be 0-9");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
