//! Command-line interface definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// README manager
///
/// Generates Markdown READMEs from a declarative manifest and edits the
/// tables of existing ones in place.
///
/// Exit Codes:
///   0  - Command succeeded
///   1  - Generic error occurred
///   2  - Invalid arguments, configuration, or manifest
///   3  - Resource not found (no table, missing manifest)
///  10  - File system failure
#[derive(Parser)]
#[command(name = "readme-manager", version)]
#[command(about = "Generate and edit Markdown READMEs", long_about = None)]
pub struct Cli {
    /// Extra configuration file, applied over all other layers
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress non-essential output (for scripting)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Regenerate a README from a TOML manifest
    Build {
        /// Manifest describing the title, sections, and entries
        manifest: PathBuf,

        /// Output file (overrides the manifest and file_settings.default_file)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Append to the existing document instead of replacing it
        #[arg(long)]
        preserve: bool,

        /// Do not back up the document being replaced
        #[arg(long)]
        no_backup: bool,
    },

    /// List the tables found in a document
    Tables {
        /// Document to scan (default: file_settings.default_file)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Output JSON (0-based, end-exclusive line indices)
        #[arg(long)]
        json: bool,
    },

    /// Add a column to the last table in a document
    AddColumn {
        /// Header of the new column
        header: String,

        /// Cell values, top to bottom (repeatable); missing values are left empty
        #[arg(short, long = "value")]
        values: Vec<String>,

        /// Document to edit (default: file_settings.default_file)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Print a table-safe Markdown link
    Link {
        text: String,
        url: String,
    },

    /// Print a table-safe Markdown image, optionally linked
    Image {
        alt: String,
        src: String,

        /// Wrap the image in a link to this URL
        #[arg(long)]
        href: Option<String>,
    },

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Write the effective configuration to a file
    Init {
        /// Destination (default: .readme_manager.toml)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}
