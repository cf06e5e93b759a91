//! Line-oriented document model.
//!
//! A document is an ordered list of lines. Every operation appends to or
//! rewrites lines in place; there is no tree, and table structure is
//! recovered by scanning (see [`crate::table`]).

use crate::errors::{ReadmeError, Result};
use crate::table::{self, TableRegion};

/// Smallest ATX header level.
pub const MIN_HEADER_LEVEL: usize = 1;
/// Largest ATX header level.
pub const MAX_HEADER_LEVEL: usize = 6;

/// Separator cell written under each table header.
pub const SEPARATOR_CELL: &str = "---";

/// Mutable, ordered sequence of document lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer from existing lines, verbatim.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split stored text into lines. Handles `\n` and `\r\n` endings.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Append a header surrounded by blank lines.
    ///
    /// `level` is clamped to `1..=6`.
    pub fn append_header(&mut self, text: &str, level: usize) {
        let level = level.clamp(MIN_HEADER_LEVEL, MAX_HEADER_LEVEL);
        self.lines.push(String::new());
        self.lines.push(format!("{} {}", "#".repeat(level), text.trim()));
        self.lines.push(String::new());
    }

    /// Append a single line of text.
    pub fn append_text(&mut self, text: &str) {
        self.lines.push(text.to_string());
    }

    /// Start a new table: a blank line, the header row and the separator row.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `headers` is empty. The buffer is left untouched.
    pub fn create_table<S: AsRef<str>>(&mut self, headers: &[S]) -> Result<()> {
        if headers.is_empty() {
            return Err(ReadmeError::InvalidArgument(
                "Headers list cannot be empty".to_string(),
            ));
        }

        let header_row = render_row(headers.iter().map(|h| h.as_ref().trim().to_string()));
        let separator_row = render_row(headers.iter().map(|_| SEPARATOR_CELL.to_string()));

        self.lines.push(String::new());
        self.lines.push(header_row);
        self.lines.push(separator_row);
        Ok(())
    }

    /// Append a data row at the end of the buffer.
    ///
    /// The row is not routed to any particular table: it extends whatever
    /// table sits at the tail, so callers must add rows before appending
    /// other content.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `values` is empty. The buffer is left untouched.
    pub fn add_table_row<V: ToString>(&mut self, values: &[V]) -> Result<()> {
        if values.is_empty() {
            return Err(ReadmeError::InvalidArgument(
                "Values list cannot be empty".to_string(),
            ));
        }

        let row = render_row(values.iter().map(|v| v.to_string().trim().to_string()));
        self.lines.push(row);
        Ok(())
    }

    /// Locate every table in the buffer.
    pub fn find_table_regions(&self) -> Vec<TableRegion> {
        table::find_table_regions(&self.lines)
    }

    /// Insert a column into the last table in the buffer.
    ///
    /// See [`table::add_column`].
    pub fn add_column<V: ToString>(&mut self, header: &str, values: Option<&[V]>) -> Result<()> {
        table::add_column(&mut self.lines, header, values)
    }

    /// Serialize for storage: lines joined by `\n` with one trailing `\n`.
    ///
    /// An empty buffer and a buffer holding one blank line both render as
    /// `"\n"`, which [`parse`](Self::parse) reads back as one blank line.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

/// Render cells as `| a | b | c |`.
fn render_row(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |", cells.collect::<Vec<_>>().join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tail(buffer: &LineBuffer, n: usize) -> Vec<&str> {
        let lines = buffer.lines();
        lines[lines.len() - n..].iter().map(String::as_str).collect()
    }

    #[test]
    fn test_header_occupies_three_lines() {
        let mut buffer = LineBuffer::new();
        buffer.append_header("  Research ", 1);

        assert_eq!(buffer.lines(), ["", "# Research", ""]);
    }

    #[test]
    fn test_header_level_clamped_high() {
        let mut buffer = LineBuffer::new();
        buffer.append_header("X", 9);
        assert_eq!(buffer.lines()[1], "###### X");
    }

    #[test]
    fn test_header_level_clamped_low() {
        let mut buffer = LineBuffer::new();
        buffer.append_header("X", 0);
        assert_eq!(buffer.lines()[1], "# X");
    }

    #[test]
    fn test_append_text_adds_single_line() {
        let mut buffer = LineBuffer::new();
        buffer.append_text("Below you will find a list.");
        assert_eq!(buffer.lines(), ["Below you will find a list."]);
    }

    #[test]
    fn test_table_with_row() {
        let mut buffer = LineBuffer::new();
        buffer.create_table(&["A", "B", "C"]).unwrap();
        buffer.add_table_row(&["x", "y", "z"]).unwrap();

        assert_eq!(
            tail(&buffer, 3),
            ["| A | B | C |", "| --- | --- | --- |", "| x | y | z |"]
        );
        assert_eq!(buffer.lines()[0], "");
    }

    #[test]
    fn test_table_cells_are_trimmed() {
        let mut buffer = LineBuffer::new();
        buffer.create_table(&[" Title ", "Summary "]).unwrap();
        buffer.add_table_row(&[" [a](b) ", " "]).unwrap();

        assert_eq!(tail(&buffer, 3), ["| Title | Summary |", "| --- | --- |", "| [a](b) |  |"]);
    }

    #[test]
    fn test_row_accepts_non_string_values() {
        let mut buffer = LineBuffer::new();
        buffer.create_table(&["n", "ok"]).unwrap();
        buffer.add_table_row(&[1.5, 2.0]).unwrap();
        assert_eq!(buffer.lines()[3], "| 1.5 | 2 |");
    }

    #[test]
    fn test_empty_headers_rejected_without_mutation() {
        let mut buffer = LineBuffer::new();
        buffer.append_text("keep");
        let empty: [&str; 0] = [];

        let err = buffer.create_table(&empty).unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(buffer.lines(), ["keep"]);
    }

    #[test]
    fn test_empty_row_rejected_without_mutation() {
        let mut buffer = LineBuffer::new();
        buffer.create_table(&["A"]).unwrap();
        let before = buffer.clone();
        let empty: [&str; 0] = [];

        let err = buffer.add_table_row(&empty).unwrap_err();

        assert!(err.is_invalid_argument());
        assert_eq!(buffer, before);
    }

    // Rows are appended at the tail, not into the last located table. Text
    // written between rows therefore splits the table; this pins that
    // behavior so a change to it is deliberate.
    #[test]
    fn test_row_after_intervening_text_lands_at_tail() {
        let mut buffer = LineBuffer::new();
        buffer.create_table(&["A", "B"]).unwrap();
        buffer.add_table_row(&["1", "2"]).unwrap();
        buffer.append_text("interlude");
        buffer.add_table_row(&["3", "4"]).unwrap();

        assert_eq!(
            buffer.lines(),
            ["", "| A | B |", "| --- | --- |", "| 1 | 2 |", "interlude", "| 3 | 4 |"]
        );
        let regions = buffer.find_table_regions();
        assert_eq!(regions, vec![TableRegion { start: 1, end: 4 }]);
    }

    #[test]
    fn test_render_appends_single_trailing_newline() {
        let buffer = LineBuffer::from_lines(vec!["# T".into(), "".into(), "x".into()]);
        assert_eq!(buffer.render(), "# T\n\nx\n");
    }

    #[test]
    fn test_parse_round_trips_render() {
        let mut buffer = LineBuffer::new();
        buffer.append_header("Research", 1);
        buffer.append_text("intro");
        buffer.create_table(&["Title"]).unwrap();
        buffer.add_table_row(&["[a](b)"]).unwrap();

        let reparsed = LineBuffer::parse(&buffer.render());

        assert_eq!(reparsed, buffer);
    }

    #[test]
    fn test_empty_buffer_reloads_as_one_blank_line() {
        let empty = LineBuffer::new();
        assert_eq!(empty.render(), "\n");

        let reparsed = LineBuffer::parse(&empty.render());

        assert_eq!(reparsed.lines(), [""]);
        assert_eq!(reparsed.render(), empty.render());
    }

    #[test]
    fn test_parse_strips_carriage_returns() {
        let buffer = LineBuffer::parse("| A |\r\n| --- |\r\n");
        assert_eq!(buffer.lines(), ["| A |", "| --- |"]);
    }
}
