//! Archive summaries.

use std::fmt;

use crate::format::{Entry, EntryKind};

/// Counts of member kinds and total file content size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveStats {
    /// Regular files.
    pub files: usize,
    /// Directories.
    pub directories: usize,
    /// Symbolic links.
    pub symlinks: usize,
    /// Everything else: hard links, devices, FIFOs.
    pub others: usize,
    /// Sum of regular file sizes in bytes.
    pub total_size: u64,
}

impl ArchiveStats {
    /// Summarizes `entries`.
    ///
    /// ```
    /// use retar::{ArchiveStats, Entry};
    ///
    /// let stats = ArchiveStats::from_entries(&[
    ///     Entry::directory("src"),
    ///     Entry::file("src/main.rs", b"fn main() {}".to_vec()),
    /// ]);
    /// assert_eq!(stats.files, 1);
    /// assert_eq!(stats.directories, 1);
    /// assert_eq!(stats.total_size, 12);
    /// ```
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut stats = Self::default();
        for entry in entries {
            match entry.kind {
                EntryKind::File => {
                    stats.files += 1;
                    stats.total_size += entry.size();
                }
                EntryKind::Directory => stats.directories += 1,
                EntryKind::Symlink => stats.symlinks += 1,
                EntryKind::Hardlink | EntryKind::Other(_) => stats.others += 1,
            }
        }
        stats
    }

    /// Total number of members.
    pub fn total_entries(&self) -> usize {
        self.files + self.directories + self.symlinks + self.others
    }
}

/// A byte count rendered as `bytes`, `KB`, `MB` or `GB` (1024-based).
///
/// Two decimals are shown unless the scaled value is a whole number.
///
/// ```
/// use retar::stats::HumanSize;
///
/// assert_eq!(HumanSize(512).to_string(), "512 bytes");
/// assert_eq!(HumanSize(1536).to_string(), "1.50 KB");
/// assert_eq!(HumanSize(3 * 1024 * 1024).to_string(), "3 MB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanSize(pub u64);

impl fmt::Display for HumanSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UNITS: [&str; 4] = ["bytes", "KB", "MB", "GB"];

        let mut value = self.0 as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit + 1 < UNITS.len() {
            value /= 1024.0;
            unit += 1;
        }
        if value.fract() == 0.0 {
            write!(f, "{:.0} {}", value, UNITS[unit])
        } else {
            write!(f, "{:.2} {}", value, UNITS[unit])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let mut hardlink = Entry::file("b", Vec::new());
        hardlink.kind = EntryKind::Hardlink;
        hardlink.link_name = Some("a".into());

        let entries = vec![
            Entry::file("a", vec![0; 100]),
            hardlink,
            Entry::symlink("c", "a"),
            Entry::directory("d"),
            Entry::file("d/e", vec![0; 28]),
        ];
        let stats = ArchiveStats::from_entries(&entries);
        assert_eq!(
            stats,
            ArchiveStats {
                files: 2,
                directories: 1,
                symlinks: 1,
                others: 1,
                total_size: 128,
            }
        );
        assert_eq!(stats.total_entries(), 5);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(HumanSize(0).to_string(), "0 bytes");
        assert_eq!(HumanSize(1023).to_string(), "1023 bytes");
        assert_eq!(HumanSize(1024).to_string(), "1 KB");
        assert_eq!(HumanSize(1100).to_string(), "1.07 KB");
        assert_eq!(HumanSize(5 * 1024 * 1024 * 1024).to_string(), "5 GB");
        assert_eq!(HumanSize(4096 * 1024 * 1024 * 1024).to_string(), "4096 GB");
    }
}
