//! Timestamped backups taken before a document is discarded.

use crate::config::FileSettings;
use crate::storage::DocumentStore;
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Timestamp format embedded in backup file names.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// When and where to back up a document before it is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupPolicy {
    pub enabled: bool,
    pub directory: PathBuf,
    /// Number of backups to retain. Read from configuration but not
    /// enforced: old backups are never pruned.
    pub count: u32,
}

impl BackupPolicy {
    /// Policy that never backs up.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn from_settings(settings: &FileSettings) -> Self {
        Self {
            enabled: settings.backup_enabled,
            directory: settings.backup_directory.clone(),
            count: settings.backup_count,
        }
    }

    /// Back up the stored document if the policy is enabled.
    ///
    /// Best effort: failures are logged and `None` is returned.
    pub fn run<S: DocumentStore>(&self, store: &S) -> Option<PathBuf> {
        self.run_at(store, &Local::now())
    }

    /// Like [`run`](Self::run) with an explicit timestamp.
    pub fn run_at<S: DocumentStore, Tz: TimeZone>(
        &self,
        store: &S,
        now: &DateTime<Tz>,
    ) -> Option<PathBuf>
    where
        Tz::Offset: std::fmt::Display,
    {
        if !self.enabled {
            return None;
        }

        let name = backup_file_name(store.path(), now);
        match store.backup(&self.directory, &name) {
            Ok(path) => {
                info!("Created backup at {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to create backup: {}", e);
                None
            }
        }
    }
}

impl Default for BackupPolicy {
    fn default() -> Self {
        Self::from_settings(&FileSettings::default())
    }
}

/// Name of the backup for `document` taken at `now`.
///
/// `README.md` becomes `README_20240131_093000.md.bak`.
pub fn backup_file_name<Tz: TimeZone>(document: &Path, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let stamp = now.format(TIMESTAMP_FORMAT);
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "README".to_string());

    match document.extension() {
        Some(ext) => format!("{}_{}.{}.bak", stem, stamp, ext.to_string_lossy()),
        None => format!("{}_{}.bak", stem, stamp),
    }
}
