//! Byte spans.

use std::fmt;
use text_size::{TextRange, TextSize};

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: ByteOffset,
    pub end: ByteOffset,
}

impl Span {
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// An empty span at `offset`.
    #[inline]
    pub fn at(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self::new(offset, offset)
    }

    /// Builds a span from `usize` offsets as produced by `str` methods.
    ///
    /// Offsets past `u32::MAX` saturate.
    pub fn from_usize(start: usize, end: usize) -> Self {
        let clamp = |n: usize| TextSize::from(u32::try_from(n).unwrap_or(u32::MAX));
        Self::new(clamp(start), clamp(end))
    }

    #[inline]
    pub fn len(&self) -> TextSize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Moves the span forward by `base` bytes.
    ///
    /// Used to turn a span relative to an embedded block into a span relative
    /// to the enclosing file.
    #[inline]
    pub fn shift(self, base: ByteOffset) -> Span {
        Span::new(self.start + base, self.end + base)
    }

    /// Smallest span enclosing both `self` and `other`.
    #[inline]
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Returns the text this span covers, or `None` when it is out of bounds
    /// or does not fall on character boundaries.
    pub fn slice(self, text: &str) -> Option<&str> {
        text.get(usize::from(self.start)..usize::from(self.end))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", u32::from(self.start), u32::from(self.end))
    }
}

impl From<TextRange> for Span {
    fn from(range: TextRange) -> Self {
        Span::new(range.start(), range.end())
    }
}

impl From<Span> for TextRange {
    fn from(span: Span) -> Self {
        TextRange::new(span.start, span.end)
    }
}
