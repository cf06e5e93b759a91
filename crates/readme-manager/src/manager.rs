//! Document builder.
//!
//! `ReadmeManager` owns a [`LineBuffer`] and the store it came from. It is
//! created in one of two modes:
//! - **Fresh**: any stored document is backed up (if the policy allows) and
//!   deleted, and building starts from an empty buffer.
//! - **Preserve**: the stored document is loaded verbatim and new content is
//!   appended after it.
//!
//! Nothing is written until [`ReadmeManager::save`] is called.

use crate::buffer::LineBuffer;
use crate::config::Settings;
use crate::errors::Result;
use crate::link;
use crate::storage::{BackupPolicy, DocumentStore, FileStorage};
use crate::table::TableRegion;
use std::path::Path;
use tracing::{debug, error, info, info_span, Span};

/// How a manager treats a document that already exists in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMode {
    /// Discard the stored document and start empty.
    #[default]
    Fresh,
    /// Load the stored document and keep building after it.
    Preserve,
}

/// Builder for [`ReadmeManager`].
pub struct ManagerBuilder<S: DocumentStore> {
    store: S,
    mode: InitMode,
    backup: BackupPolicy,
    span: Option<Span>,
}

impl<S: DocumentStore> ManagerBuilder<S> {
    pub fn mode(mut self, mode: InitMode) -> Self {
        self.mode = mode;
        self
    }

    /// Start from the stored document instead of discarding it.
    pub fn preserve_existing(self, preserve: bool) -> Self {
        self.mode(if preserve {
            InitMode::Preserve
        } else {
            InitMode::Fresh
        })
    }

    pub fn backup(mut self, policy: BackupPolicy) -> Self {
        self.backup = policy;
        self
    }

    /// Span every manager operation is recorded under.
    ///
    /// Defaults to a `readme` span carrying the document path.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Initialize storage according to the mode and build the manager.
    ///
    /// # Errors
    ///
    /// `Storage` if the old document cannot be deleted (Fresh) or read
    /// (Preserve). A failed backup is logged and does not abort.
    pub fn build(self) -> Result<ReadmeManager<S>> {
        let span = self
            .span
            .unwrap_or_else(|| info_span!("readme", path = %self.store.path().display()));

        let buffer = {
            let _enter = span.enter();
            initialize(&self.store, self.mode, &self.backup).map_err(|e| {
                error!("Failed to initialize README manager: {}", e);
                e
            })?
        };

        Ok(ReadmeManager {
            store: self.store,
            buffer,
            span,
        })
    }
}

fn initialize<S: DocumentStore>(
    store: &S,
    mode: InitMode,
    backup: &BackupPolicy,
) -> Result<LineBuffer> {
    match mode {
        InitMode::Fresh => {
            if store.exists() {
                backup.run(store);
                store.remove().map_err(|e| {
                    error!("Error deleting {}: {}", store.path().display(), e);
                    e
                })?;
                info!("Deleted existing file: {}", store.path().display());
            }
            Ok(LineBuffer::new())
        }
        InitMode::Preserve => {
            let contents = store.read().map_err(|e| {
                error!("Error loading content: {}", e);
                e
            })?;
            let buffer = contents
                .as_deref()
                .map(LineBuffer::parse)
                .unwrap_or_default();
            debug!("Loaded {} existing lines", buffer.len());
            Ok(buffer)
        }
    }
}

/// Builds a Markdown document and saves it to a [`DocumentStore`].
///
/// # Examples
///
/// ```
/// use readme_manager::link::create_link;
/// use readme_manager::manager::ReadmeManager;
/// use readme_manager::storage::InMemoryStorage;
///
/// let store = InMemoryStorage::new("README.md");
/// let mut readme = ReadmeManager::builder(store.clone()).build().unwrap();
///
/// readme.add_header("Research", 1);
/// readme.create_table(&["Title", "Summary"]).unwrap();
/// let link = create_link("Paper", "docs/paper.pdf");
/// readme.add_table_row(&[link.as_str(), ""]).unwrap();
/// readme.save().unwrap();
///
/// assert!(store.contents().unwrap().contains("| [Paper](docs/paper.pdf) |  |"));
/// ```
pub struct ReadmeManager<S: DocumentStore = FileStorage> {
    store: S,
    buffer: LineBuffer,
    span: Span,
}

impl ReadmeManager<FileStorage> {
    /// Open a file-backed manager using configured defaults.
    ///
    /// `path` overrides `file_settings.default_file`; backups follow
    /// `file_settings.backup_*`.
    pub fn from_settings(settings: &Settings, path: Option<&Path>, mode: InitMode) -> Result<Self> {
        let file_settings = settings.file_settings()?;
        let path = path.unwrap_or(file_settings.default_file.as_path());

        ReadmeManager::builder(FileStorage::new(path))
            .mode(mode)
            .backup(BackupPolicy::from_settings(&file_settings))
            .build()
    }
}

impl<S: DocumentStore> ReadmeManager<S> {
    pub fn builder(store: S) -> ManagerBuilder<S> {
        ManagerBuilder {
            store,
            mode: InitMode::default(),
            backup: BackupPolicy::default(),
            span: None,
        }
    }

    /// See [`link::create_link`].
    pub fn create_link(text: &str, url: &str) -> String {
        link::create_link(text, url)
    }

    /// See [`link::create_image_link`].
    pub fn create_image_link(alt_text: &str, image_url: &str, link_url: Option<&str>) -> String {
        link::create_image_link(alt_text, image_url, link_url)
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    pub fn lines(&self) -> &[String] {
        self.buffer.lines()
    }

    /// Add a header; `level` is clamped to 1..=6.
    pub fn add_header(&mut self, text: &str, level: usize) {
        let _enter = self.span.enter();
        self.buffer.append_header(text, level);
        debug!("Added level {} header: {}", level.clamp(1, 6), text.trim());
    }

    pub fn add_text(&mut self, text: &str) {
        let _enter = self.span.enter();
        self.buffer.append_text(text);
    }

    /// Start a new table. Fails on empty `headers`.
    pub fn create_table<H: AsRef<str>>(&mut self, headers: &[H]) -> Result<()> {
        let _enter = self.span.enter();
        self.buffer.create_table(headers)?;
        debug!("Created table with {} columns", headers.len());
        Ok(())
    }

    /// Append a row to the table at the end of the document. Fails on
    /// empty `values`.
    pub fn add_table_row<V: ToString>(&mut self, values: &[V]) -> Result<()> {
        let _enter = self.span.enter();
        self.buffer.add_table_row(values)
    }

    pub fn find_table_regions(&self) -> Vec<TableRegion> {
        self.buffer.find_table_regions()
    }

    /// Add a column to the last table. Fails with `NotFound` if there is none.
    pub fn add_column<V: ToString>(&mut self, header: &str, values: Option<&[V]>) -> Result<()> {
        let _enter = self.span.enter();
        self.buffer.add_column(header, values)?;
        debug!("Added column: {}", header.trim());
        Ok(())
    }

    /// Write the whole document to storage.
    pub fn save(&self) -> Result<()> {
        let _enter = self.span.enter();
        match self.store.write(&self.buffer.render()) {
            Ok(()) => {
                info!("Successfully saved content to {}", self.path().display());
                Ok(())
            }
            Err(e) => {
                error!("Error saving content: {}", e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn backups_on(dir: &str) -> BackupPolicy {
        BackupPolicy {
            enabled: true,
            directory: PathBuf::from(dir),
            count: 5,
        }
    }

    #[test]
    fn test_fresh_mode_starts_empty_and_deletes_old_document() {
        let store = InMemoryStorage::with_document("README.md", "# Old\n");

        let manager = ReadmeManager::builder(store.clone())
            .backup(BackupPolicy::disabled())
            .build()
            .unwrap();

        assert!(manager.lines().is_empty());
        assert_eq!(store.contents(), None);
        assert!(store.backups().is_empty());
    }

    #[test]
    fn test_fresh_mode_backs_up_before_delete() {
        let store = InMemoryStorage::with_document("README.md", "# Old\n");

        ReadmeManager::builder(store.clone())
            .backup(backups_on(".backups"))
            .build()
            .unwrap();

        let backups = store.backups();
        assert_eq!(backups.len(), 1);
        let (path, contents) = backups.iter().next().unwrap();
        assert!(path.starts_with(".backups"));
        assert_eq!(contents, "# Old\n");
    }

    #[test]
    fn test_backup_failure_does_not_abort() {
        let store = InMemoryStorage::with_document("README.md", "# Old\n").failing_backups();

        let manager = ReadmeManager::builder(store.clone())
            .backup(backups_on(".backups"))
            .build()
            .unwrap();

        assert!(manager.lines().is_empty());
        assert_eq!(store.contents(), None);
    }

    #[test]
    fn test_fresh_mode_on_missing_document_skips_backup() {
        let store = InMemoryStorage::new("README.md");

        ReadmeManager::builder(store.clone())
            .backup(backups_on(".backups"))
            .build()
            .unwrap();

        assert!(store.backups().is_empty());
    }

    #[test]
    fn test_preserve_mode_loads_lines() {
        let store = InMemoryStorage::with_document("README.md", "# Old\n\n| A |\n| --- |\n");

        let manager = ReadmeManager::builder(store)
            .preserve_existing(true)
            .build()
            .unwrap();

        assert_eq!(manager.lines(), ["# Old", "", "| A |", "| --- |"]);
        assert_eq!(manager.find_table_regions(), vec![TableRegion { start: 2, end: 4 }]);
    }

    #[test]
    fn test_preserve_mode_missing_document_is_empty() {
        let manager = ReadmeManager::builder(InMemoryStorage::new("README.md"))
            .mode(InitMode::Preserve)
            .build()
            .unwrap();

        assert!(manager.lines().is_empty());
    }

    #[test]
    fn test_nothing_written_until_save() {
        let store = InMemoryStorage::new("README.md");
        let mut manager = ReadmeManager::builder(store.clone()).build().unwrap();

        manager.add_header("Research", 1);
        assert_eq!(store.contents(), None);

        manager.save().unwrap();
        assert_eq!(store.contents().as_deref(), Some("\n# Research\n\n"));
    }

    #[test]
    fn test_full_build_sequence() {
        let store = InMemoryStorage::new("README.md");
        let mut readme = ReadmeManager::builder(store.clone()).build().unwrap();

        readme.add_header("Research", 1);
        readme.add_text("Papers I found interesting.");
        readme.add_header("Articles", 2);
        readme.create_table(&["Title", "Summary"]).unwrap();
        let link = ReadmeManager::<InMemoryStorage>::create_link("Paper | One", "docs/one.pdf");
        readme.add_table_row(&[link.as_str(), ""]).unwrap();
        readme.add_column("Read", Some(&["yes"][..])).unwrap();
        readme.save().unwrap();

        assert_eq!(
            store.contents().unwrap(),
            "\n# Research\n\nPapers I found interesting.\n\n## Articles\n\n\n\
             | Title | Summary | Read |\n| --- | --- | --- |\n\
             | [Paper \\| One](docs/one.pdf) |  | yes |\n"
        );
    }

    #[test]
    fn test_add_column_without_table_leaves_document() {
        let mut readme = ReadmeManager::builder(InMemoryStorage::new("README.md"))
            .build()
            .unwrap();
        readme.add_text("no tables here");

        let err = readme.add_column::<&str>("D", None).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(readme.lines(), ["no tables here"]);
    }

    #[test]
    fn test_save_then_preserve_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/README.md");

        let mut first = ReadmeManager::builder(FileStorage::new(&path))
            .backup(BackupPolicy::disabled())
            .build()
            .unwrap();
        first.add_header("Research", 1);
        first.create_table(&["A", "B"]).unwrap();
        first.add_table_row(&["1", "2"]).unwrap();
        first.save().unwrap();

        let second = ReadmeManager::builder(FileStorage::new(&path))
            .preserve_existing(true)
            .build()
            .unwrap();

        assert_eq!(second.lines(), first.lines());
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("| 1 | 2 |\n"));
        assert!(!raw.contains('\r'));
    }

    #[test]
    fn test_from_settings_uses_default_file_and_backup_dir() {
        let temp = TempDir::new().unwrap();
        let doc = temp.path().join("README.md");
        std::fs::write(&doc, "old\n").unwrap();

        let mut settings = Settings::defaults();
        settings.set("file_settings", "default_file", doc.to_string_lossy().into_owned());
        settings.set(
            "file_settings",
            "backup_directory",
            temp.path().join("bk").to_string_lossy().into_owned(),
        );

        let manager =
            ReadmeManager::<FileStorage>::from_settings(&settings, None, InitMode::Fresh).unwrap();

        assert_eq!(manager.path(), doc.as_path());
        assert!(!doc.exists());
        let backups: Vec<_> = std::fs::read_dir(temp.path().join("bk")).unwrap().collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_fresh_mode_delete_failure_is_storage_error() {
        let temp = TempDir::new().unwrap();

        let result = ReadmeManager::builder(FileStorage::new(temp.path()))
            .backup(BackupPolicy::disabled())
            .span(Span::none())
            .build();

        assert!(result.err().is_some_and(|e| e.is_storage()));
    }

    #[test]
    fn test_save_failure_is_storage_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let mut manager = ReadmeManager::builder(FileStorage::new(blocker.join("README.md")))
            .build()
            .unwrap();
        manager.add_text("x");

        assert!(manager.save().unwrap_err().is_storage());
    }
}
