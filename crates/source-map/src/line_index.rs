//! Offset to line/column conversion.

use crate::ByteOffset;
use std::fmt;
use text_size::TextSize;

/// A 1-based line and column, as shown to users.
///
/// Columns count characters, not bytes, so positions line up with what an
/// editor displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Line start table for one source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<ByteOffset>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(TextSize::from(0))
            .chain(
                text.match_indices('\n')
                    .map(|(offset, _)| TextSize::from(offset as u32 + 1)),
            )
            .collect();
        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Resolves a byte offset to a 1-based position.
    ///
    /// Offsets past the end of the text resolve to the end of the last line.
    pub fn position(&self, offset: ByteOffset) -> Position {
        let offset = offset.min(TextSize::of(self.text));
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        let line_start = usize::from(self.line_starts[line]);
        let column = self
            .text
            .get(line_start..usize::from(offset))
            .map_or(0, |prefix| prefix.chars().count());

        Position {
            line: line as u32 + 1,
            column: column as u32 + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pos(line: u32, column: u32) -> Position {
        Position { line, column }
    }

    #[test]
    fn test_first_line() {
        let index = LineIndex::new("hello\nworld");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.position(TextSize::from(0)), pos(1, 1));
        assert_eq!(index.position(TextSize::from(4)), pos(1, 5));
    }

    #[test]
    fn test_after_newline() {
        let index = LineIndex::new("hello\nworld\n");
        assert_eq!(index.position(TextSize::from(5)), pos(1, 6));
        assert_eq!(index.position(TextSize::from(6)), pos(2, 1));
        assert_eq!(index.position(TextSize::from(12)), pos(3, 1));
    }

    #[test]
    fn test_columns_count_chars() {
        let index = LineIndex::new("é<div>");
        // 'é' is two bytes wide
        assert_eq!(index.position(TextSize::from(2)), pos(1, 2));
    }

    #[test]
    fn test_out_of_bounds_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.position(TextSize::from(99)), pos(1, 3));
    }

    #[test]
    fn test_display() {
        assert_eq!(pos(3, 14).to_string(), "3:14");
    }
}
