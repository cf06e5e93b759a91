//! Declarative README manifests.
//!
//! A catalog describes a whole README: a title, an intro paragraph, an
//! optional banner image, and sections that each hold one table of linked
//! entries. Rendering a catalog into a fresh manager regenerates the same
//! document every time.
//!
//! ```toml
//! title = "Research"
//! intro = "Articles I have read and found interesting."
//!
//! [[sections]]
//! heading = "Articles"
//! columns = ["Title", "Summary"]
//!
//! [[sections.entries]]
//! title = "Combining Language Models and Knowledge Graphs"
//! url = "docs/lm-kg.pdf"
//! cells = ["Retrieval with KGs"]
//! ```

use crate::errors::{ReadmeError, Result};
use crate::link::{create_image_link, create_link, escape_cell};
use crate::manager::ReadmeManager;
use crate::storage::DocumentStore;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_level() -> usize {
    2
}

/// Root of a manifest file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Level-1 header at the top of the document (optional).
    pub title: Option<String>,
    /// Paragraph under the title (optional).
    pub intro: Option<String>,
    /// Output path, overriding `file_settings.default_file` (optional).
    pub output: Option<PathBuf>,
    /// Image line under the intro (optional).
    pub banner: Option<Banner>,
    #[serde(default)]
    pub sections: Vec<Section>,
}

/// An image, optionally linked.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Banner {
    pub alt: String,
    pub src: String,
    pub href: Option<String>,
}

/// A header followed by one table.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub heading: String,
    #[serde(default = "default_level")]
    pub level: usize,
    /// Optional paragraph between the header and the table.
    pub description: Option<String>,
    pub columns: Vec<String>,
    #[serde(default)]
    pub entries: Vec<Entry>,
    /// Columns spliced onto the finished table.
    #[serde(default)]
    pub extra_columns: Vec<ExtraColumn>,
}

/// One table row. The first cell is the (linked) title.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub title: String,
    pub url: Option<String>,
    /// Cells for the remaining columns.
    #[serde(default)]
    pub cells: Vec<String>,
}

impl Entry {
    /// Render this entry as a row for a table with `width` columns.
    ///
    /// Every cell has `|` escaped. Missing cells are filled with `""`;
    /// surplus cells are kept.
    pub fn row(&self, width: usize) -> Vec<String> {
        let first = match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => create_link(&self.title, url),
            _ => escape_cell(&self.title),
        };

        let mut row = Vec::with_capacity(width.max(1 + self.cells.len()));
        row.push(first);
        row.extend(self.cells.iter().map(|cell| escape_cell(cell)));
        while row.len() < width {
            row.push(String::new());
        }
        row
    }
}

/// A column added after the rows are written.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExtraColumn {
    pub header: String,
    /// Values for the rows, top to bottom. Missing values become `""`.
    #[serde(default)]
    pub values: Vec<String>,
}

impl Catalog {
    /// Parse a manifest from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ReadmeError::Config(e.to_string()))
    }

    /// Read and parse a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| ReadmeError::storage("read", path, e))?;
        Self::parse(&text).map_err(|e| match e {
            ReadmeError::Config(msg) => ReadmeError::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Total number of entries across all sections.
    pub fn entry_count(&self) -> usize {
        self.sections.iter().map(|s| s.entries.len()).sum()
    }

    /// Append the whole catalog to `manager`.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if a section declares no columns. Content rendered
    /// before the failing section stays in the buffer, but nothing is saved.
    pub fn render<S: DocumentStore>(&self, manager: &mut ReadmeManager<S>) -> Result<()> {
        if let Some(title) = &self.title {
            manager.add_header(title, 1);
        }
        if let Some(intro) = &self.intro {
            manager.add_text(intro);
        }
        if let Some(banner) = &self.banner {
            manager.add_text(&create_image_link(&banner.alt, &banner.src, banner.href.as_deref()));
        }

        for section in &self.sections {
            manager.add_header(&section.heading, section.level);
            if let Some(description) = &section.description {
                manager.add_text(description);
            }
            let columns: Vec<String> = section.columns.iter().map(|c| escape_cell(c)).collect();
            manager.create_table(&columns)?;
            for entry in &section.entries {
                manager.add_table_row(&entry.row(section.columns.len()))?;
            }
            for column in &section.extra_columns {
                let values: Vec<String> = column.values.iter().map(|v| escape_cell(v)).collect();
                manager.add_column(&escape_cell(&column.header), Some(values.as_slice()))?;
            }
            debug!(
                "Rendered section '{}' with {} entries",
                section.heading,
                section.entries.len()
            );
        }

        Ok(())
    }
}
