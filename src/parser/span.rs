//! Source positions inside a stylesheet, used for selector diagnostics.

use std::fmt;

/// A position in stylesheet text (byte offset, line, column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Byte offset from start of file
    pub offset: usize,
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, in characters not bytes)
    pub column: u32,
}

impl Location {
    pub fn new(offset: usize, line: u32, column: u32) -> Self {
        Self { offset, line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range in stylesheet text with resolved line/column ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start location (inclusive)
    pub start: Location,
    /// End location (exclusive)
    pub end: Location,
}

impl Span {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Create a span from byte offsets, calculating line/column from source.
    pub fn from_offsets(source: &str, start_offset: usize, end_offset: usize) -> Self {
        Self {
            start: offset_to_location(source, start_offset),
            end: offset_to_location(source, end_offset),
        }
    }

    /// Span covering the single character starting at `offset`.
    pub fn char_at(source: &str, offset: usize) -> Self {
        let width = source[offset.min(source.len())..]
            .chars()
            .next()
            .map(char::len_utf8)
            .unwrap_or(0);
        Self::from_offsets(source, offset, offset + width)
    }

    /// Byte length of the span.
    pub fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte range for slicing the source the span was computed from.
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start.line == self.end.line {
            write!(f, "{}:{}-{}", self.start.line, self.start.column, self.end.column)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start.offset, span.len()).into()
    }
}

/// Convert a byte offset to a Location (line/column).
pub fn offset_to_location(source: &str, offset: usize) -> Location {
    let offset = offset.min(source.len());
    let before = &source[..offset];

    let line = before.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
    let last_newline = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[last_newline..].chars().count() as u32 + 1;

    Location { offset, line, column }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_to_location() {
        let source = ":export {\n  a: b;\n}";

        assert_eq!(offset_to_location(source, 0), Location::new(0, 1, 1));
        assert_eq!(offset_to_location(source, 10), Location::new(10, 2, 1));
        assert_eq!(offset_to_location(source, 12), Location::new(12, 2, 3));
        assert_eq!(offset_to_location(source, 999).offset, source.len());
    }

    #[test]
    fn test_char_at_multibyte() {
        let source = ":export é.b";
        let span = Span::char_at(source, 8);

        assert_eq!(span.len(), 2);
        assert_eq!(span.start.column, 9);
    }

    #[test]
    fn test_into_source_span() {
        let source = ":export .nav {}";
        let span = Span::char_at(source, 8);
        let converted: miette::SourceSpan = span.into();

        assert_eq!(converted.offset(), 8);
        assert_eq!(converted.len(), 1);
    }
}
