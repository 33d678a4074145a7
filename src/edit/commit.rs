//! Writing a rebuilt archive over the original file.

use std::fs::{self, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use crate::Result;

/// Replaces the contents of `path` with `bytes`.
///
/// The caller renders `bytes` completely before calling this, so every
/// failure up to that point leaves the file as it was. The file is created
/// if it does not exist; otherwise it is truncated in place and its original
/// permissions are restored afterwards. A failure during the write itself
/// can leave the file truncated.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) for any filesystem failure.
pub fn commit(path: &Path, bytes: &[u8]) -> Result<()> {
    let preserved = match fs::metadata(path) {
        Ok(metadata) => Some(metadata.permissions()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);

    if let Some(permissions) = preserved {
        fs::set_permissions(path, permissions)?;
    }
    log::debug!("committed {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
