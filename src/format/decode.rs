//! Tar stream decoding into materialized entries.

use std::fs;
use std::io::{self, Cursor, Read};
use std::path::Path;

use crate::archive_path::{ArchivePath, sanitize_member_name, trim_dir_suffix};
use crate::codec::{CodecMethod, open_reader};
use crate::ownership::Ownership;
use crate::timestamp::{Timestamps, parse_pax_time};
use crate::{Error, Result};

use super::entry::{Entry, EntryKind};

/// Reads every member of the archive file at `path`, in stream order.
///
/// An empty file is an empty archive.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and
/// [`Error::MalformedArchive`] if the stream is corrupt or truncated.
pub fn read_archive(path: impl AsRef<Path>, method: Option<CodecMethod>) -> Result<Vec<Entry>> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        log::debug!("{} is empty, treating as an empty archive", path.display());
        return Ok(Vec::new());
    }
    read_entries(Cursor::new(bytes), method)
}

/// Reads every member from a raw (possibly compressed) tar stream.
///
/// Members are returned in stream order with their content fully read. If a
/// name appears more than once, every occurrence is returned; callers that
/// build a name map keep the last one.
///
/// # Errors
///
/// Returns [`Error::Codec`] if the decoder cannot be set up and
/// [`Error::MalformedArchive`] for any header, checksum, codec stream, or
/// truncation failure while reading.
pub fn read_entries<R: Read + Send>(raw: R, method: Option<CodecMethod>) -> Result<Vec<Entry>> {
    let decoder = open_reader(raw, method)?;
    let mut archive = tar::Archive::new(decoder);

    let mut out = Vec::new();
    {
        let entries = archive
            .entries()
            .map_err(|e| Error::malformed(None, e.to_string()))?;

        let mut last_name: Option<String> = None;
        for item in entries {
            let mut raw_entry = item.map_err(|e| {
                let reason = match &last_name {
                    Some(name) => format!("{} (after entry '{}')", e, name),
                    None => e.to_string(),
                };
                Error::malformed(None, reason)
            })?;

            let entry = decode_member(&mut raw_entry)?;
            last_name = Some(entry.name.clone());
            if entry.name.is_empty() {
                log::debug!("skipping archive root member");
                continue;
            }
            out.push(entry);
        }
    }

    // Codec trailers (checksums, frame ends) follow the end-of-archive blocks
    let mut decoder = archive.into_inner();
    io::copy(&mut decoder, &mut io::sink())
        .map_err(|e| Error::malformed(None, format!("damaged stream after last entry: {}", e)))?;

    log::debug!("decoded {} members", out.len());
    Ok(out)
}

fn decode_member<R: Read>(raw: &mut tar::Entry<'_, R>) -> Result<Entry> {
    let raw_name = text_field(&raw.path_bytes(), "member name")?;
    let name = sanitize_member_name(&raw_name);
    let malformed = |reason: String| Error::malformed(Some(&name), reason);

    if !name.is_empty() {
        ArchivePath::new(trim_dir_suffix(&name)).map_err(|e| malformed(e.to_string()))?;
    }

    let link_name = match raw.link_name_bytes() {
        Some(bytes) => Some(
            std::str::from_utf8(&bytes)
                .map_err(|_| malformed("link target is not valid UTF-8".to_string()))?
                .to_string(),
        ),
        None => None,
    };

    let mut pax = PaxOverrides::default();
    if let Some(extensions) = raw
        .pax_extensions()
        .map_err(|e| malformed(format!("bad PAX header: {}", e)))?
    {
        for extension in extensions {
            let extension = extension.map_err(|e| malformed(format!("bad PAX record: {}", e)))?;
            if let (Ok(key), Ok(value)) = (extension.key(), extension.value()) {
                pax.record(key, value);
            }
        }
    }

    let header = raw.header();
    let mut kind = EntryKind::from_entry_type(header.entry_type());
    if kind == EntryKind::File && name.ends_with('/') {
        kind = EntryKind::Directory;
    }

    let fields = header.as_old();
    let mode = numeric_field(&fields.mode, header.mode())
        .map_err(|e| malformed(format!("bad mode field: {}", e)))?;
    let uid = numeric_field(&fields.uid, header.uid())
        .map_err(|e| malformed(format!("bad uid field: {}", e)))?;
    let gid = numeric_field(&fields.gid, header.gid())
        .map_err(|e| malformed(format!("bad gid field: {}", e)))?;
    let modified = numeric_field(&fields.mtime, header.mtime())
        .map_err(|e| malformed(format!("bad mtime field: {}", e)))?;

    let mut accessed = pax.accessed;
    let mut changed = pax.changed;
    if let Some(gnu) = header.as_gnu() {
        if accessed.is_none() {
            accessed = gnu.atime().ok().filter(|&t| t != 0);
        }
        if changed.is_none() {
            changed = gnu.ctime().ok().filter(|&t| t != 0);
        }
    }

    let ownership = Ownership {
        uid: pax.uid.unwrap_or(uid),
        gid: pax.gid.unwrap_or(gid),
        user_name: pax.user_name.or_else(|| non_empty(header.username())),
        group_name: pax.group_name.or_else(|| non_empty(header.groupname())),
    };

    let device = match (header.device_major(), header.device_minor()) {
        (Ok(Some(major)), Ok(Some(minor))) if matches!(kind, EntryKind::Other(_)) => {
            Some((major, minor))
        }
        _ => None,
    };

    let expected = raw.size();
    let mut content = Vec::with_capacity(expected.min(64 * 1024 * 1024) as usize);
    raw.read_to_end(&mut content)
        .map_err(|e| malformed(format!("cannot read content: {}", e)))?;
    if (content.len() as u64) < expected {
        return Err(malformed(format!(
            "content truncated: expected {} bytes, got {}",
            expected,
            content.len()
        )));
    }
    if kind == EntryKind::Directory || kind.is_link() {
        content.clear();
    }

    Ok(Entry {
        name,
        kind,
        mode,
        ownership,
        timestamps: Timestamps {
            modified: pax.modified.unwrap_or(modified),
            accessed,
            changed,
        },
        link_name,
        device,
        content,
    })
}

/// PAX records that take precedence over the fixed header fields.
#[derive(Debug, Default)]
struct PaxOverrides {
    uid: Option<u64>,
    gid: Option<u64>,
    user_name: Option<String>,
    group_name: Option<String>,
    modified: Option<u64>,
    accessed: Option<u64>,
    changed: Option<u64>,
}

impl PaxOverrides {
    fn record(&mut self, key: &str, value: &str) {
        match key {
            "uid" => self.uid = value.parse().ok(),
            "gid" => self.gid = value.parse().ok(),
            "uname" if !value.is_empty() => self.user_name = Some(value.to_string()),
            "gname" if !value.is_empty() => self.group_name = Some(value.to_string()),
            "mtime" => self.modified = parse_pax_time(value),
            "atime" => self.accessed = parse_pax_time(value),
            "ctime" => self.changed = parse_pax_time(value),
            _ => {}
        }
    }
}

/// Decodes a name field, refusing bytes that are not UTF-8.
///
/// Member names are stored as `String`, so a lossy conversion would rename
/// the member on the next rewrite.
fn text_field(bytes: &[u8], what: &str) -> Result<String> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Ok(text.to_string()),
        Err(_) => {
            let shown = String::from_utf8_lossy(bytes);
            Err(Error::malformed(
                Some(shown.as_ref()),
                format!("{} is not valid UTF-8", what),
            ))
        }
    }
}

/// A numeric header field that is all NUL or spaces reads as zero.
fn numeric_field<T: Default>(raw: &[u8], parsed: io::Result<T>) -> io::Result<T> {
    if raw.iter().all(|&b| b == 0 || b == b' ') {
        return Ok(T::default());
    }
    parsed
}

fn non_empty(field: std::result::Result<Option<&str>, std::str::Utf8Error>) -> Option<String> {
    match field {
        Ok(Some(value)) if !value.is_empty() => Some(value.to_string()),
        _ => None,
    }
}
