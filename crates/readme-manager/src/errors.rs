//! Error types and actionable error formatting.
//!
//! [`ReadmeError`] is the library's error type. Every failure the document
//! model can surface falls into one of its kinds:
//! - `InvalidArgument`: empty headers or values passed to table construction
//! - `NotFound`: a table operation needs a table and the document has none
//! - `Storage`: reading, writing, or deleting the backing file failed
//! - `Config`: a configuration or manifest file could not be parsed
//!
//! [`ActionableError`] wraps a message with causes and remediation steps for
//! display by the command-line binary.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, ReadmeError>;

/// Errors raised by the document model, storage, and configuration layers.
#[derive(Debug, Error)]
pub enum ReadmeError {
    /// A caller passed an argument the operation cannot accept.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The document does not contain what the operation requires.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An OS-level failure on the backing file.
    #[error("Failed to {action} {}: {source}", .path.display())]
    Storage {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A configuration or manifest file is malformed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ReadmeError {
    /// Build a storage error for `action` on `path`.
    pub fn storage(action: &'static str, path: impl AsRef<Path>, source: io::Error) -> Self {
        ReadmeError::Storage {
            action,
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this is an argument validation failure.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ReadmeError::InvalidArgument(_))
    }

    /// Whether this is a missing-table (or similar) failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReadmeError::NotFound(_))
    }

    /// Whether this wraps an I/O failure on the backing file.
    pub fn is_storage(&self) -> bool {
        matches!(self, ReadmeError::Storage { .. })
    }
}

/// An error with diagnostic context and remediation steps.
///
/// # Example
///
/// ```
/// use readme_manager::errors::ActionableError;
///
/// let error = ActionableError::new("No tables found in README.md")
///     .with_cause("The document has no header row followed by a --- separator")
///     .with_remedy("Create a table first: readme-manager build <manifest>");
///
/// eprintln!("{}", error);
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    error: String,
    causes: Vec<String>,
    remediation: Vec<String>,
}

impl ActionableError {
    /// Create a new actionable error with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step.
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("Error: {}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}

impl From<&ReadmeError> for ActionableError {
    fn from(err: &ReadmeError) -> Self {
        let base = ActionableError::new(err.to_string());
        match err {
            ReadmeError::InvalidArgument(_) => base
                .with_cause("A table was given no headers or a row was given no values")
                .with_remedy("Check that every section in the manifest declares columns"),
            ReadmeError::NotFound(_) => base
                .with_cause("The document has no header row followed by a --- separator row")
                .with_remedy("List detected tables: readme-manager tables")
                .with_remedy("Regenerate the document: readme-manager build <manifest>"),
            ReadmeError::Storage { path, .. } => base
                .with_cause("The file or its directory may not be writable")
                .with_cause("The path may point to a directory")
                .with_remedy(format!("Check permissions on {}", path.display())),
            ReadmeError::Config(_) => base
                .with_cause("A TOML file has a syntax error or a value of the wrong type")
                .with_remedy("Show the effective configuration: readme-manager config show"),
        }
    }
}
