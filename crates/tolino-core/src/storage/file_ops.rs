//! Whole-file read and replace helpers shared by the stores

use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{Result, TolinoError};

/// Read a file, returning `None` if it does not exist
pub(crate) fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(TolinoError::storage(path, e)),
    }
}

/// Replace a file's contents atomically using a uniquely named sibling temp file
///
/// The temp file is removed on every failure path.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent).map_err(|e| TolinoError::storage(parent, e))?;
            parent
        }
        None => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| TolinoError::storage(parent, e))?;
    temp.write_all(contents)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| TolinoError::storage(temp.path(), e))?;

    temp.persist(path)
        .map_err(|e| TolinoError::storage(path, e.error))?;

    Ok(())
}
