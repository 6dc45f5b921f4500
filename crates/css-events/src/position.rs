//! Source positions: byte spans and 1-based line/column.

use text_size::{TextRange, TextSize};

/// A byte offset into a stylesheet.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)` in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: ByteOffset,
    /// The end byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates an empty span at the given offset.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns true if this span is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns a span covering both this span and another.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: std::cmp::min(self.start, other.start),
            end: std::cmp::max(self.end, other.end),
        }
    }

    /// The start offset as a `usize` index into the source.
    #[inline]
    pub fn start_index(&self) -> usize {
        u32::from(self.start) as usize
    }

    /// The end offset as a `usize` index into the source.
    #[inline]
    pub fn end_index(&self) -> usize {
        u32::from(self.end) as usize
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
        }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(
            TextSize::from(range.start as u32),
            TextSize::from(range.end as u32),
        )
    }
}

/// A 1-based line and column, as reported in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column, counted in characters.
    pub col: u32,
}

impl Position {
    /// Creates a new position.
    #[inline]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, col: 1 }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Converts byte offsets into [`Position`]s.
///
/// Stores the offset at which every line starts, so a lookup is a binary
/// search plus a character count within the line.
#[derive(Debug, Clone)]
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<ByteOffset>,
}

impl<'src> LineIndex<'src> {
    /// Builds the index for `source`.
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![TextSize::from(0)];
        for (offset, c) in source.char_indices() {
            if c == '\n' {
                line_starts.push(TextSize::from((offset + 1) as u32));
            }
        }
        Self {
            source,
            line_starts,
        }
    }

    /// Returns the number of lines in the source.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the position of `offset`. Offsets past the end clamp to the
    /// end of the source.
    pub fn position(&self, offset: ByteOffset) -> Position {
        let offset = std::cmp::min(offset, TextSize::from(self.source.len() as u32));
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        let line_start = u32::from(self.line_starts[line]) as usize;
        let end = u32::from(offset) as usize;
        let col = self
            .source
            .get(line_start..end)
            .map(|s| s.chars().count())
            .unwrap_or(end - line_start);

        Position {
            line: line as u32 + 1,
            col: col as u32 + 1,
        }
    }
}
