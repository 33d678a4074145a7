//! Member timestamps.
//!
//! Tar headers carry a modification time in whole seconds since the Unix
//! epoch. GNU headers add access and change times in the same unit, and PAX
//! records can carry them as decimal strings with a fractional part. Only
//! whole seconds are kept; a member's timestamps survive a rewrite exactly
//! as read.

use std::fs::Metadata;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Modification, access and change times of a member, in Unix seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Timestamps {
    /// Modification time.
    pub modified: u64,
    /// Access time, if recorded.
    pub accessed: Option<u64>,
    /// Status change time, if recorded.
    pub changed: Option<u64>,
}

impl Timestamps {
    /// Creates timestamps with only a modification time.
    pub fn modified_at(secs: u64) -> Self {
        Self {
            modified: secs,
            accessed: None,
            changed: None,
        }
    }

    /// Reads timestamps from filesystem metadata.
    ///
    /// Times before the epoch are recorded as 0. The change time is only
    /// available on Unix.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            modified: metadata.modified().map(unix_secs).unwrap_or(0),
            accessed: metadata.accessed().ok().map(unix_secs),
            changed: change_time(metadata),
        }
    }

    /// Returns the modification time as a `SystemTime`.
    pub fn modified_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.modified)
    }

    /// Returns the access time as a `SystemTime`, falling back to the
    /// modification time.
    pub fn accessed_time(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.accessed.unwrap_or(self.modified))
    }
}

/// Converts a `SystemTime` into whole seconds since the epoch, clamping
/// pre-epoch times to 0.
pub fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Parses a PAX time record (`"1700000000"` or `"1700000000.123456"`).
///
/// Returns `None` for negative or malformed values.
pub fn parse_pax_time(value: &str) -> Option<u64> {
    let whole = value.split('.').next()?;
    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    whole.parse().ok()
}

#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Option<u64> {
    use std::os::unix::fs::MetadataExt;

    u64::try_from(metadata.ctime()).ok()
}

#[cfg(not(unix))]
fn change_time(_metadata: &Metadata) -> Option<u64> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modified_at() {
        let ts = Timestamps::modified_at(1_700_000_000);
        assert_eq!(ts.modified, 1_700_000_000);
        assert_eq!(ts.accessed, None);
        assert_eq!(ts.changed, None);
        assert_eq!(
            ts.modified_time(),
            UNIX_EPOCH + Duration::from_secs(1_700_000_000)
        );
        assert_eq!(ts.accessed_time(), ts.modified_time());
    }

    #[test]
    fn test_unix_secs_clamps_before_epoch() {
        assert_eq!(unix_secs(UNIX_EPOCH), 0);
        assert_eq!(unix_secs(UNIX_EPOCH + Duration::from_millis(2500)), 2);
        assert_eq!(unix_secs(UNIX_EPOCH - Duration::from_secs(10)), 0);
    }

    #[test]
    fn test_parse_pax_time() {
        assert_eq!(parse_pax_time("1700000000"), Some(1_700_000_000));
        assert_eq!(parse_pax_time("1700000000.987654321"), Some(1_700_000_000));
        assert_eq!(parse_pax_time("-5.0"), None);
        assert_eq!(parse_pax_time("abc"), None);
        assert_eq!(parse_pax_time(""), None);
    }

    #[test]
    fn test_from_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stamp.txt");
        std::fs::write(&file, b"x").unwrap();
        let when = UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        filetime::set_file_mtime(&file, filetime::FileTime::from_system_time(when)).unwrap();

        let ts = Timestamps::from_metadata(&std::fs::metadata(&file).unwrap());
        assert_eq!(ts.modified, 1_600_000_000);
        assert!(ts.accessed.is_some());
    }
}
