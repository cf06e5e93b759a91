//! In-memory document storage for testing.
//!
//! Uses `Rc<RefCell<>>` for shared interior mutability: clones share the
//! same document, so a test can keep a handle and inspect what a manager
//! wrote.

use crate::errors::{ReadmeError, Result};
use crate::storage::DocumentStore;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// In-memory backend holding one document and any backups taken of it.
///
/// # Examples
///
/// ```
/// use readme_manager::storage::{DocumentStore, InMemoryStorage};
///
/// let store = InMemoryStorage::new("README.md");
/// store.write("# Title\n").unwrap();
/// assert_eq!(store.read().unwrap().as_deref(), Some("# Title\n"));
/// ```
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    path: PathBuf,
    document: Rc<RefCell<Option<String>>>,
    backups: Rc<RefCell<BTreeMap<PathBuf, String>>>,
    fail_backups: bool,
}

impl InMemoryStorage {
    /// Create an empty store that reports `path` as its location.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            document: Rc::new(RefCell::new(None)),
            backups: Rc::new(RefCell::new(BTreeMap::new())),
            fail_backups: false,
        }
    }

    /// Create a store that already holds `contents`.
    pub fn with_document<P: AsRef<Path>>(path: P, contents: &str) -> Self {
        let store = Self::new(path);
        *store.document.borrow_mut() = Some(contents.to_string());
        store
    }

    /// Make every backup attempt fail with a permission error.
    pub fn failing_backups(mut self) -> Self {
        self.fail_backups = true;
        self
    }

    /// Current stored document, if any.
    pub fn contents(&self) -> Option<String> {
        self.document.borrow().clone()
    }

    /// All backups taken so far, keyed by backup path.
    pub fn backups(&self) -> BTreeMap<PathBuf, String> {
        self.backups.borrow().clone()
    }
}

impl DocumentStore for InMemoryStorage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn exists(&self) -> bool {
        self.document.borrow().is_some()
    }

    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, contents: &str) -> Result<()> {
        *self.document.borrow_mut() = Some(contents.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.document.borrow_mut().take().map(|_| ()).ok_or_else(|| {
            ReadmeError::storage(
                "delete",
                &self.path,
                io::Error::new(io::ErrorKind::NotFound, "no document stored"),
            )
        })
    }

    fn backup(&self, backup_dir: &Path, file_name: &str) -> Result<PathBuf> {
        if self.fail_backups {
            return Err(ReadmeError::storage(
                "back up",
                &self.path,
                io::Error::new(io::ErrorKind::PermissionDenied, "backup directory is read-only"),
            ));
        }

        let contents = self.contents().ok_or_else(|| {
            ReadmeError::storage(
                "back up",
                &self.path,
                io::Error::new(io::ErrorKind::NotFound, "no document stored"),
            )
        })?;
        let target = backup_dir.join(file_name);
        self.backups.borrow_mut().insert(target.clone(), contents);
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_document() {
        let store = InMemoryStorage::new("README.md");
        let handle = store.clone();

        store.write("x\n").unwrap();

        assert_eq!(handle.contents().as_deref(), Some("x\n"));
    }

    #[test]
    fn test_remove_empty_store_fails() {
        let store = InMemoryStorage::new("README.md");
        assert!(store.remove().unwrap_err().is_storage());
    }

    #[test]
    fn test_backup_records_copy() {
        let store = InMemoryStorage::with_document("README.md", "old\n");

        let path = store.backup(Path::new(".backups"), "README_x.md.bak").unwrap();

        assert_eq!(path, PathBuf::from(".backups/README_x.md.bak"));
        assert_eq!(store.backups().get(&path).map(String::as_str), Some("old\n"));
    }

    #[test]
    fn test_failing_backups() {
        let store = InMemoryStorage::with_document("README.md", "old\n").failing_backups();
        assert!(store.backup(Path::new(".backups"), "b").is_err());
        assert!(store.backups().is_empty());
    }
}
