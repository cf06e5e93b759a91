//! README manager library
//!
//! Builds Markdown documents as a flat list of lines: headers, text, and
//! pipe tables whose cells hold escaped links and images. Tables are found
//! by scanning the lines, and new columns are spliced into rendered rows in
//! place, so existing documents can be amended without a Markdown parser.

pub mod buffer;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod link;
pub mod logging;
pub mod manager;
pub mod output;
pub mod storage;
pub mod table;

// Re-export commonly used types
pub use buffer::LineBuffer;
pub use catalog::Catalog;
pub use config::{ConfigLoader, LoadedConfig, Settings};
pub use errors::{ReadmeError, Result};
pub use manager::{InitMode, ReadmeManager};
pub use storage::{DocumentStore, FileStorage, InMemoryStorage};
pub use table::TableRegion;
