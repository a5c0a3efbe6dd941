//! Atomic file replacement

use crate::error::{Result, ShelfError};
use std::io::Write;
use std::path::Path;

/// Replace `path` with `contents` through a temporary file in the same folder
///
/// Readers see either the old or the new file, never a partial write.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| ShelfError::IoError(e.error))?;
    Ok(())
}
