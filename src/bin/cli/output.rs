//! Output formatting for CLI operations.

use retar::stats::HumanSize;
use retar::{ArchiveStats, EditResult, Entry, EntryKind, ExtractResult};
use serde_json::json;

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a list of entries
    fn format_list(&self, entries: &[Entry]) -> String;

    /// Formats archive statistics
    fn format_stats(&self, archive: &str, stats: &ArchiveStats) -> String;

    /// Formats the outcome of a mutating command
    fn format_edit_result(&self, archive: &str, result: &EditResult) -> String;

    /// Formats extraction results
    fn format_extract_result(&self, result: &ExtractResult) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_list(&self, entries: &[Entry]) -> String {
        let mut output = String::new();
        for entry in entries {
            output.push_str(&format!(
                "{} {} {} ({})\n",
                mode_string(entry),
                format_timestamp(entry.timestamps.modified),
                entry.name,
                HumanSize(entry.size())
            ));
        }
        output
    }

    fn format_stats(&self, archive: &str, stats: &ArchiveStats) -> String {
        let mut output = String::new();
        output.push_str(&format!("Statistics for tarball : {}\n", archive));
        output.push_str(&format!("Total files            : {}\n", stats.files));
        output.push_str(&format!("Total directories      : {}\n", stats.directories));
        output.push_str(&format!("Total symbolic links   : {}\n", stats.symlinks));
        output.push_str(&format!("Total other entries    : {}\n", stats.others));
        output.push_str(&format!(
            "Total size             : {}\n",
            HumanSize(stats.total_size)
        ));
        output
    }

    fn format_edit_result(&self, archive: &str, result: &EditResult) -> String {
        let mut changes = Vec::new();
        for (count, label) in [
            (result.entries_added, "added"),
            (result.entries_renamed, "renamed"),
            (result.entries_updated, "updated"),
            (result.entries_skipped, "skipped"),
            (result.entries_deleted, "deleted"),
        ] {
            if count > 0 {
                changes.push(format!("{} {}", count, label));
            }
        }
        if changes.is_empty() {
            changes.push("no changes".to_string());
        }

        format!(
            "{}: {} members, {} ({})\n",
            archive,
            result.total_entries,
            HumanSize(result.archive_size),
            changes.join(", ")
        )
    }

    fn format_extract_result(&self, result: &ExtractResult) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "Extracted {} members ({})\n",
            result.extracted.len(),
            HumanSize(result.bytes_written)
        ));
        if result.entries_skipped > 0 {
            output.push_str(&format!(
                "Skipped {} members that cannot be created here\n",
                result.entries_skipped
            ));
        }
        output
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_list(&self, entries: &[Entry]) -> String {
        let items: Vec<_> = entries
            .iter()
            .map(|e| {
                json!({
                    "name": e.name,
                    "type": kind_name(&e.kind),
                    "mode": format!("{:o}", e.mode),
                    "size": e.size(),
                    "modified": e.timestamps.modified,
                    "uid": e.ownership.uid,
                    "gid": e.ownership.gid,
                    "link_name": e.link_name,
                })
            })
            .collect();

        serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_stats(&self, archive: &str, stats: &ArchiveStats) -> String {
        let obj = json!({
            "archive": archive,
            "files": stats.files,
            "directories": stats.directories,
            "symlinks": stats.symlinks,
            "others": stats.others,
            "total_entries": stats.total_entries(),
            "total_size": stats.total_size,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_edit_result(&self, archive: &str, result: &EditResult) -> String {
        let obj = json!({
            "archive": archive,
            "entries_added": result.entries_added,
            "entries_updated": result.entries_updated,
            "entries_renamed": result.entries_renamed,
            "entries_skipped": result.entries_skipped,
            "entries_deleted": result.entries_deleted,
            "entries_kept": result.entries_kept,
            "total_entries": result.total_entries,
            "archive_size": result.archive_size,
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_extract_result(&self, result: &ExtractResult) -> String {
        let obj = json!({
            "entries_extracted": result.extracted.len(),
            "entries_skipped": result.entries_skipped,
            "bytes_written": result.bytes_written,
            "paths": result
                .extracted
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>(),
        });

        serde_json::to_string_pretty(&obj).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Creates the appropriate formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}

fn kind_name(kind: &EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "file",
        EntryKind::Directory => "directory",
        EntryKind::Symlink => "symlink",
        EntryKind::Hardlink => "hardlink",
        EntryKind::Other(_) => "other",
    }
}

/// Renders the member type and permission bits like `ls -l`.
pub fn mode_string(entry: &Entry) -> String {
    let kind = match entry.kind {
        EntryKind::Directory => 'd',
        EntryKind::Symlink => 'L',
        EntryKind::Other(b'3') => 'c',
        EntryKind::Other(b'4') => 'D',
        EntryKind::Other(b'6') => 'p',
        EntryKind::File | EntryKind::Hardlink | EntryKind::Other(_) => '-',
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    for shift in [6, 3, 0] {
        let bits = (entry.mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

/// Formats Unix seconds as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(secs: u64) -> String {
    let days = (secs / 86400) as i64;
    let time_of_day = secs % 86400;
    let (year, month, day) = civil_from_days(days);

    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        time_of_day / 3600,
        (time_of_day % 3600) / 60,
        time_of_day % 60
    )
}

// Days since 1970-01-01 to a proleptic Gregorian date.
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
