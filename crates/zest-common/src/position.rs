//! Position utilities.
//!
//! Tokens carry byte offsets; errors and source maps talk in lines. Only `\n`
//! terminates a line here, matching how output line counts are compared.

use serde::Serialize;
use std::fmt;

/// A 1-based line/column pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Location { line, column }
    }

    /// Compute the location of `offset` in `source` without building a map.
    ///
    /// Only used on error paths, so a linear scan is fine.
    pub fn from_offset(source: &str, offset: u32) -> Self {
        LineMap::build(source).location(offset, source)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Line map for offset -> location conversion.
/// Stores the starting offset of each line.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Starting offset of each line (line_starts[0] is always 0)
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn build(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(memchr::memchr_iter(b'\n', source.as_bytes()).map(|i| (i + 1) as u32));
        LineMap { line_starts }
    }

    /// Convert a byte offset to a 1-based location. Columns count chars.
    pub fn location(&self, offset: u32, source: &str) -> Location {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert_point) => insert_point.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line).copied().unwrap_or(0) as usize;
        let end = (offset as usize).min(source.len());
        let column = source
            .get(line_start.min(end)..end)
            .map(|slice| slice.chars().count())
            .unwrap_or(0);
        Location {
            line: line as u32 + 1,
            column: column as u32 + 1,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Starting offset of a 0-based line.
    pub fn line_start(&self, line: usize) -> Option<u32> {
        self.line_starts.get(line).copied()
    }

    pub fn line_starts(&self) -> &[u32] {
        &self.line_starts
    }
}

/// Number of `\n` characters in `text`.
pub fn count_newlines(text: &str) -> usize {
    memchr::memchr_iter(b'\n', text.as_bytes()).count()
}

#[cfg(test)]
mod position_tests {
    use super::*;

    #[test]
    fn test_line_map_simple() {
        let source = "line1\nline2\nline3";
        let map = LineMap::build(source);

        assert_eq!(map.line_count(), 3);
        assert_eq!(map.location(0, source), Location::new(1, 1));
        assert_eq!(map.location(4, source), Location::new(1, 5));
        assert_eq!(map.location(6, source), Location::new(2, 1));
        assert_eq!(map.location(12, source), Location::new(3, 1));
    }

    #[test]
    fn test_location_counts_chars_not_bytes() {
        let source = "const é = 1;\nx";
        // `=` sits after a two-byte character.
        let offset = source.find('=').unwrap() as u32;
        assert_eq!(Location::from_offset(source, offset), Location::new(1, 9));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let source = "ab\ncd";
        assert_eq!(Location::from_offset(source, 100), Location::new(2, 3));
    }

    #[test]
    fn test_count_newlines() {
        assert_eq!(count_newlines(""), 0);
        assert_eq!(count_newlines("a\nb\r\nc\n"), 3);
    }
}
