//! Configuration file loading and lookup.
//!
//! Settings are TOML tables merged from several files in precedence order
//! (lowest first):
//! 1. Built-in defaults
//! 2. Project config (`default_config.toml`)
//! 3. User config (`~/.readme_manager/config.toml`)
//! 4. Directory config (`.readme_manager.toml`)
//! 5. An explicit custom path (`--config`)
//!
//! Consumers only see [`Settings`]: plain `section.key` lookups with typed
//! accessors and fallbacks.

use crate::errors::{ReadmeError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::{info, warn};

/// Project-level config file name.
pub const PROJECT_CONFIG: &str = "default_config.toml";
/// Directory-level config file name, also the default target of `config init`.
pub const DIRECTORY_CONFIG: &str = ".readme_manager.toml";
/// Environment variable overriding `logging.level`.
pub const LOG_LEVEL_ENV: &str = "README_MANAGER_LOG";

const FILE_SETTINGS: &str = "file_settings";
const LOGGING: &str = "logging";

/// Merged key-value configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    table: Table,
}

impl Settings {
    /// Settings with no keys at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in defaults.
    pub fn defaults() -> Self {
        let file = FileSettings::default();
        let logging = LoggingSettings::default();

        let mut settings = Self::empty();
        settings.set(
            FILE_SETTINGS,
            "default_file",
            file.default_file.to_string_lossy().into_owned(),
        );
        settings.set(FILE_SETTINGS, "backup_enabled", file.backup_enabled);
        settings.set(
            FILE_SETTINGS,
            "backup_directory",
            file.backup_directory.to_string_lossy().into_owned(),
        );
        settings.set(FILE_SETTINGS, "backup_count", i64::from(file.backup_count));
        settings.set(LOGGING, "level", logging.level.as_str());
        settings.set(LOGGING, "format", logging.format.as_str());
        settings
    }

    /// Parse settings from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let table: Table = toml::from_str(text).map_err(|e| ReadmeError::Config(e.to_string()))?;
        Ok(Self { table })
    }

    /// Read settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ReadmeError::storage("read", path, e))?;
        Self::parse(&text).map_err(|e| match e {
            ReadmeError::Config(msg) => ReadmeError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Overlay `other` on top of these settings, key by key.
    pub fn merge(&mut self, other: Settings) {
        merge_tables(&mut self.table, other.table);
    }

    /// Raw value of `section.key`.
    pub fn get(&self, section: &str, key: &str) -> Option<&Value> {
        self.table.get(section)?.as_table()?.get(key)
    }

    /// String value of `section.key`, or `fallback` when missing.
    ///
    /// Non-string values are rendered as TOML (`true`, `5`).
    pub fn get_str(&self, section: &str, key: &str, fallback: &str) -> String {
        match self.get(section, key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => fallback.to_string(),
        }
    }

    /// Boolean value of `section.key`.
    ///
    /// Accepts TOML booleans, `0`/`1`, and the strings `yes`/`no`, `on`/`off`,
    /// `true`/`false`, `1`/`0` in any case.
    pub fn get_bool(&self, section: &str, key: &str, fallback: bool) -> Result<bool> {
        match self.get(section, key) {
            None => Ok(fallback),
            Some(Value::Boolean(b)) => Ok(*b),
            Some(Value::Integer(1)) => Ok(true),
            Some(Value::Integer(0)) => Ok(false),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "yes" | "on" | "true" | "1" => Ok(true),
                "no" | "off" | "false" | "0" => Ok(false),
                _ => Err(invalid(section, key, "a boolean", s)),
            },
            Some(other) => Err(invalid(section, key, "a boolean", &other.to_string())),
        }
    }

    /// Integer value of `section.key`. Numeric strings are accepted.
    pub fn get_int(&self, section: &str, key: &str, fallback: i64) -> Result<i64> {
        match self.get(section, key) {
            None => Ok(fallback),
            Some(Value::Integer(i)) => Ok(*i),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map_err(|_| invalid(section, key, "an integer", s)),
            Some(other) => Err(invalid(section, key, "an integer", &other.to_string())),
        }
    }

    /// Set `section.key`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        let entry = self
            .table
            .entry(section.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        if let Value::Table(t) = entry {
            t.insert(key.to_string(), value.into());
        }
    }

    /// Render as TOML text.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(&self.table).map_err(|e| ReadmeError::Config(e.to_string()))
    }

    /// Write the settings to `path` as TOML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| ReadmeError::storage("create directory for", path, e))?;
        }
        fs::write(path, text).map_err(|e| ReadmeError::storage("write", path, e))?;
        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Typed view of the `[file_settings]` section.
    pub fn file_settings(&self) -> Result<FileSettings> {
        let defaults = FileSettings::default();
        let count = self.get_int(FILE_SETTINGS, "backup_count", i64::from(defaults.backup_count))?;

        Ok(FileSettings {
            default_file: PathBuf::from(self.get_str(
                FILE_SETTINGS,
                "default_file",
                &defaults.default_file.to_string_lossy(),
            )),
            backup_enabled: self.get_bool(
                FILE_SETTINGS,
                "backup_enabled",
                defaults.backup_enabled,
            )?,
            backup_directory: PathBuf::from(self.get_str(
                FILE_SETTINGS,
                "backup_directory",
                &defaults.backup_directory.to_string_lossy(),
            )),
            backup_count: u32::try_from(count).map_err(|_| {
                invalid(
                    FILE_SETTINGS,
                    "backup_count",
                    "a non-negative integer",
                    &count.to_string(),
                )
            })?,
        })
    }

    /// Typed view of the `[logging]` section.
    pub fn logging(&self) -> Result<LoggingSettings> {
        let defaults = LoggingSettings::default();
        let format = self.get_str(LOGGING, "format", defaults.format.as_str());

        Ok(LoggingSettings {
            level: self.get_str(LOGGING, "level", &defaults.level),
            format: format.parse()?,
        })
    }
}

fn invalid(section: &str, key: &str, expected: &str, found: &str) -> ReadmeError {
    ReadmeError::Config(format!(
        "{}.{} must be {}, found '{}'",
        section, key, expected, found
    ))
}

fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match value {
            Value::Table(incoming) => match base.get_mut(&key) {
                Some(Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, Value::Table(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

/// Typed `[file_settings]` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSettings {
    /// Document written when no path is given (default: `README.md`).
    pub default_file: PathBuf,
    /// Back up the old document before discarding it (default: true).
    pub backup_enabled: bool,
    /// Where backups go (default: `.backups`).
    pub backup_directory: PathBuf,
    /// Number of backups to keep (default: 5). Not enforced.
    pub backup_count: u32,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            default_file: PathBuf::from("README.md"),
            backup_enabled: true,
            backup_directory: PathBuf::from(".backups"),
            backup_count: 5,
        }
    }
}

/// Typed `[logging]` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Level name: `TRACE`, `DEBUG`, `INFO`, `WARNING`, `ERROR`, `CRITICAL`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
            format: LogFormat::Full,
        }
    }
}

/// Output layout of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Full,
    Compact,
    Pretty,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ReadmeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(invalid(LOGGING, "format", "full, compact or pretty", other)),
        }
    }
}

// ============================================================
// Config Loader with Priority and Merging
// ============================================================

/// Builder for loading settings from multiple files with priority.
///
/// Layers are applied in the order they are added; later layers win.
/// Missing optional layers are skipped, and malformed ones are skipped and
/// reported in [`LoadedConfig::skipped`]. The custom layer is mandatory: if
/// it is missing or malformed, loading fails.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    layers: Vec<PathBuf>,
    custom: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a loader with only the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the standard project, user, and directory layers relative to `dir`.
    pub fn with_standard_layers(mut self, dir: &Path) -> Self {
        self.layers.push(dir.join(PROJECT_CONFIG));
        if let Some(home) = dirs::home_dir() {
            self.layers.push(home.join(".readme_manager").join("config.toml"));
        }
        self.layers.push(dir.join(DIRECTORY_CONFIG));
        self
    }

    /// Add an optional layer.
    pub fn with_layer<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.layers.push(path.as_ref().to_path_buf());
        self
    }

    /// Add the mandatory highest-priority layer.
    pub fn with_custom<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.custom = Some(path.as_ref().to_path_buf());
        self
    }

    /// Merge every layer over the defaults, then apply environment overrides.
    pub fn load(self) -> Result<LoadedConfig> {
        self.load_with_env(|name| std::env::var(name).ok())
    }

    /// Like [`load`](Self::load), with environment lookups routed through `env`.
    pub fn load_with_env(self, env: impl Fn(&str) -> Option<String>) -> Result<LoadedConfig> {
        let mut settings = Settings::defaults();
        let mut loaded = Vec::new();
        let mut skipped = Vec::new();

        for path in self.layers {
            if !path.exists() {
                continue;
            }
            match Settings::from_file(&path) {
                Ok(layer) => {
                    settings.merge(layer);
                    loaded.push(path);
                }
                Err(e) => skipped.push(e),
            }
        }

        if let Some(path) = self.custom {
            settings.merge(Settings::from_file(&path)?);
            loaded.push(path);
        }

        if let Some(level) = env(LOG_LEVEL_ENV) {
            settings.set(LOGGING, "level", level);
        }

        Ok(LoadedConfig {
            settings,
            loaded,
            skipped,
        })
    }
}

/// Outcome of [`ConfigLoader::load`].
///
/// Loading usually happens before a subscriber is installed, so the layer
/// report is kept here and emitted with [`LoadedConfig::log`] afterwards.
#[derive(Debug)]
pub struct LoadedConfig {
    pub settings: Settings,
    /// Layers merged into `settings`, lowest priority first.
    pub loaded: Vec<PathBuf>,
    /// Optional layers that exist but could not be read or parsed.
    pub skipped: Vec<ReadmeError>,
}

impl LoadedConfig {
    /// Emit the layer report as tracing events.
    pub fn log(&self) {
        for path in &self.loaded {
            info!("Loaded config from {}", path.display());
        }
        for error in &self.skipped {
            warn!("Skipped config layer: {}", error);
        }
    }
}
