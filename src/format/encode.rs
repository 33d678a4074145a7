//! Tar stream encoding from ordered entries.

use std::io::Write;

use crate::archive_path::ArchivePath;
use crate::codec::{CompressionOptions, open_writer};
use crate::{Error, Result};

use super::entry::{Entry, EntryKind};

/// Encodes `entries`, in the given order, into a complete archive held in
/// memory.
///
/// # Errors
///
/// See [`write_entries`].
pub fn encode_to_vec(entries: &[Entry], compression: &CompressionOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_entries(entries, &mut buffer, compression)?;
    Ok(buffer)
}

/// Writes `entries`, in the given order, as a tar stream to `sink` through
/// the codec selected by `compression`.
///
/// Every header is regenerated from the entry in GNU format with the size
/// taken from the content, so the same entries always produce the same
/// bytes. Directories are written header-only and links carry their target.
///
/// # Errors
///
/// Returns [`Error::InvalidArchivePath`] for names that cannot be stored
/// (absolute, `..`, empty), [`Error::Codec`] if the codec fails to set up or
/// finish, and [`Error::Io`] for write failures.
pub fn write_entries<W: Write + Send>(
    entries: &[Entry],
    sink: W,
    compression: &CompressionOptions,
) -> Result<()> {
    let method_name = compression.method.map_or("copy", |m| m.name());
    let encoder = open_writer(sink, compression)?;
    let mut builder = tar::Builder::new(encoder);

    for entry in entries {
        append_entry(&mut builder, entry)?;
    }

    let encoder = builder.into_inner()?;
    encoder
        .finish()
        .map_err(|e| Error::codec(method_name, e))?;
    log::debug!("encoded {} members", entries.len());
    Ok(())
}

fn append_entry<W: Write>(builder: &mut tar::Builder<W>, entry: &Entry) -> Result<()> {
    let name = ArchivePath::new(entry.canonical_name())?;
    let (mut header, pax) = build_header(entry)?;
    if !pax.is_empty() {
        builder.append_pax_extensions(pax.iter().map(|(key, value)| (*key, value.as_bytes())))?;
    }

    match entry.kind {
        EntryKind::Symlink | EntryKind::Hardlink => {
            let target = entry.link_name.as_deref().unwrap_or_default();
            if target.is_empty() {
                return Err(Error::InvalidArchivePath(format!(
                    "link {} has no target",
                    name
                )));
            }
            builder.append_link(&mut header, name.as_str(), target)?;
        }
        EntryKind::Directory => {
            builder.append_data(&mut header, name.as_str(), std::io::empty())?;
        }
        _ => {
            builder.append_data(&mut header, name.as_str(), entry.content.as_slice())?;
        }
    }
    Ok(())
}

/// Builds the GNU header for `entry`, plus the PAX records for owner names
/// too long for the fixed fields.
fn build_header(entry: &Entry) -> Result<(tar::Header, Vec<(&'static str, String)>)> {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(entry.kind.entry_type());
    header.set_mode(entry.mode);
    header.set_uid(entry.ownership.uid);
    header.set_gid(entry.ownership.gid);
    header.set_mtime(entry.timestamps.modified);

    let mut pax = Vec::new();
    if let Some(user) = &entry.ownership.user_name {
        if header.set_username(user).is_err() {
            log::debug!("user name of {} stored as a PAX record", entry.name);
            pax.push(("uname", user.clone()));
        }
    }
    if let Some(group) = &entry.ownership.group_name {
        if header.set_groupname(group).is_err() {
            log::debug!("group name of {} stored as a PAX record", entry.name);
            pax.push(("gname", group.clone()));
        }
    }

    if let Some(gnu) = header.as_gnu_mut() {
        if let Some(accessed) = entry.timestamps.accessed {
            gnu.set_atime(accessed);
        }
        if let Some(changed) = entry.timestamps.changed {
            gnu.set_ctime(changed);
        }
    }

    if let Some((major, minor)) = entry.device {
        header.set_device_major(major)?;
        header.set_device_minor(minor)?;
    }

    let size = match entry.kind {
        EntryKind::Directory | EntryKind::Symlink | EntryKind::Hardlink => 0,
        _ => entry.size(),
    };
    header.set_size(size);
    Ok((header, pax))
}
