//! File-based document storage.

use crate::errors::{ReadmeError, Result};
use crate::storage::DocumentStore;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A document stored as one UTF-8 text file.
///
/// Writes overwrite the file in place (no temp file and rename), so an
/// interrupted write can leave a truncated file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DocumentStore for FileStorage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ReadmeError::storage("read", &self.path, e)),
        }
    }

    fn write(&self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ReadmeError::storage("create directory for", &self.path, e))?;
        }
        fs::write(&self.path, contents).map_err(|e| ReadmeError::storage("write", &self.path, e))
    }

    fn remove(&self) -> Result<()> {
        fs::remove_file(&self.path).map_err(|e| ReadmeError::storage("delete", &self.path, e))
    }

    fn backup(&self, backup_dir: &Path, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(backup_dir)
            .map_err(|e| ReadmeError::storage("create backup directory", backup_dir, e))?;
        let target = backup_dir.join(file_name);
        fs::copy(&self.path, &target)
            .map_err(|e| ReadmeError::storage("back up", &self.path, e))?;
        Ok(target)
    }
}
