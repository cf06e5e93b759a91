//! Pipe-table detection and in-place column insertion.
//!
//! Tables are never stored as structure. Their boundaries are recovered on
//! demand by scanning the document lines, and edits splice text into the
//! already rendered rows.

use crate::buffer::SEPARATOR_CELL;
use crate::errors::{ReadmeError, Result};
use serde::Serialize;

/// Line range of one pipe table.
///
/// `start` is the header row; `end` is exclusive (one past the last data row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableRegion {
    pub start: usize,
    pub end: usize,
}

impl TableRegion {
    /// Index of the separator row.
    pub fn separator(&self) -> usize {
        self.start + 1
    }

    /// Indices of the data rows (everything after the separator).
    pub fn data_rows(&self) -> std::ops::Range<usize> {
        (self.start + 2).min(self.end)..self.end
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.data_rows().len()
    }
}

/// Scan `lines` for pipe tables, in document order.
///
/// A table opens at a line starting with `|` whose next line contains `---`.
/// It closes at the first line that does not start with `|`, or at the last
/// line of the document.
///
/// The separator test only checks for the `---` substring, so a data row
/// with a cell like `---` (or `a---b`) is taken as the separator of a new
/// table starting on the row above it.
pub fn find_table_regions<S: AsRef<str>>(lines: &[S]) -> Vec<TableRegion> {
    let mut regions = Vec::new();
    let mut start: Option<usize> = None;
    let last = lines.len().saturating_sub(1);

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        let is_row = line.starts_with('|');

        let opens = is_row
            && lines
                .get(i + 1)
                .is_some_and(|next| next.as_ref().contains(SEPARATOR_CELL));

        if opens {
            start = Some(i);
        } else if let Some(s) = start {
            if !is_row || i == last {
                let end = if is_row { i + 1 } else { i };
                regions.push(TableRegion { start: s, end });
                start = None;
            }
        }
    }

    regions
}

/// Insert a column at the right edge of the last table in `lines`.
///
/// The header row gets ` {header} `, the separator row ` --- `, and each
/// data row the matching entry of `values`. Rows past the end of `values`,
/// or every row when `values` is `None`, get an empty cell. Values beyond
/// the last data row are ignored.
///
/// Each row is split on `|` and the new cell goes before the final segment,
/// so existing spacing is preserved as-is.
///
/// # Errors
///
/// `NotFound` if `lines` contains no table. Nothing is modified.
pub fn add_column<V: ToString>(
    lines: &mut [String],
    header: &str,
    values: Option<&[V]>,
) -> Result<()> {
    let region = find_table_regions(&*lines)
        .pop()
        .ok_or_else(|| ReadmeError::NotFound("No tables found in the README".to_string()))?;

    lines[region.start] = insert_cell(&lines[region.start], header.trim());
    let sep = region.separator();
    lines[sep] = insert_cell(&lines[sep], SEPARATOR_CELL);

    for (offset, row) in region.data_rows().enumerate() {
        let value = values
            .and_then(|v| v.get(offset))
            .map(|v| v.to_string().trim().to_string())
            .unwrap_or_default();
        lines[row] = insert_cell(&lines[row], &value);
    }

    Ok(())
}

/// Insert ` {cell} ` before the last `|`-separated segment of `row`.
fn insert_cell(row: &str, cell: &str) -> String {
    let mut parts: Vec<String> = row.split('|').map(str::to_string).collect();
    let at = parts.len() - 1;
    parts.insert(at, format!(" {} ", cell));
    parts.join("|")
}
