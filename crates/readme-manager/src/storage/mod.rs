//! Storage abstraction for the backing document.
//!
//! The `DocumentStore` trait hides where the rendered README lives, so the
//! document builder can run against a real file or an in-memory store in
//! tests.

use crate::errors::Result;
use std::path::{Path, PathBuf};

pub mod backup;
pub mod file;
pub mod memory;

pub use backup::{backup_file_name, BackupPolicy};
pub use file::FileStorage;
pub use memory::InMemoryStorage;

/// Backend that persists a single text document.
///
/// # Examples
///
/// ```no_run
/// use readme_manager::storage::{DocumentStore, FileStorage};
///
/// let store = FileStorage::new("README.md");
/// store.write("# Title\n").unwrap();
/// assert_eq!(store.read().unwrap().as_deref(), Some("# Title\n"));
/// ```
pub trait DocumentStore {
    /// Path of the document, used for logging and backup naming.
    fn path(&self) -> &Path;

    /// Whether a stored document currently exists.
    fn exists(&self) -> bool;

    /// Read the stored document.
    ///
    /// Returns `Ok(None)` when nothing is stored yet.
    ///
    /// # Errors
    ///
    /// `Storage` if the document exists but cannot be read.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored document with `contents`.
    ///
    /// This is a whole-document overwrite, never an append.
    fn write(&self, contents: &str) -> Result<()>;

    /// Delete the stored document.
    fn remove(&self) -> Result<()>;

    /// Copy the stored document into `backup_dir` under `file_name`.
    ///
    /// Returns the path of the copy.
    fn backup(&self, backup_dir: &Path, file_name: &str) -> Result<PathBuf>;
}
