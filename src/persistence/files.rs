use crate::error::{PersistError, PersistResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write content to a file using temp file + rename
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &str) -> PersistResult<()> {
    let path = path.as_ref();
    let dir = path.parent().ok_or_else(|| {
        PersistError::Unavailable(format!("{} has no parent directory", path.display()))
    })?;

    // Temp file must live on the same filesystem for the rename to be atomic
    let mut temp_file = NamedTempFile::new_in(dir).map_err(|e| PersistError::io(dir, e))?;

    temp_file
        .write_all(content.as_bytes())
        .map_err(|e| PersistError::io(temp_file.path(), e))?;

    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| PersistError::io(path, e))?;

    temp_file
        .persist(path)
        .map_err(|e| PersistError::io(path, e.error))?;

    Ok(())
}

/// Read file content, `None` if the file doesn't exist
pub fn read_file<P: AsRef<Path>>(path: P) -> PersistResult<Option<String>> {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(PersistError::io(path, e)),
    }
}
