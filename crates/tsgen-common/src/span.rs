//! Source spans.
//!
//! A `Span` is a half-open byte-offset range `[start, end)` into a source
//! file's text. Spans are the only link between parsed structure and the
//! original text: type-expression nodes keep their span so the generator can
//! reproduce the author's spelling verbatim instead of re-printing types.

use serde::{Deserialize, Serialize};

/// A half-open byte range into source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: u32,
    /// End byte offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span.
    #[inline]
    pub fn new(start: u32, end: u32) -> Span {
        Span { start, end }
    }

    /// An empty span at the given position.
    #[inline]
    pub fn empty(pos: u32) -> Span {
        Span {
            start: pos,
            end: pos,
        }
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// True if the span covers no text.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// The smallest span covering both `self` and `other`.
    pub fn join(&self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Slice the spanned text out of `source`.
    ///
    /// Out-of-bounds or non-char-boundary spans yield an empty string rather
    /// than panicking; spans are produced by the scanner and are expected to
    /// be valid, but source text may have been replaced since.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        source
            .get(self.start as usize..self.end as usize)
            .unwrap_or("")
    }
}
