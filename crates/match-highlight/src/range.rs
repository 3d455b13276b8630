//! Half-open character ranges.

/// A half-open character-offset range (`from..to`) into a [`TextSnapshot`](crate::TextSnapshot).
///
/// Offsets count Unicode scalar values (`char`) from the start of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextRange {
    /// Start offset (inclusive).
    pub from: usize,
    /// End offset (exclusive).
    pub to: usize,
}

impl TextRange {
    /// Create a new range. `from` must not exceed `to`.
    pub fn new(from: usize, to: usize) -> Self {
        debug_assert!(from <= to, "inverted range {from}..{to}");
        Self { from, to }
    }

    /// An empty range anchored at `pos`.
    pub fn point(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.to.saturating_sub(self.from)
    }

    /// Returns `true` if the range covers no characters.
    pub fn is_empty(&self) -> bool {
        self.from >= self.to
    }

    /// Returns `true` if `pos` lies inside the range (`from <= pos < to`).
    pub fn contains(&self, pos: usize) -> bool {
        self.from <= pos && pos < self.to
    }

    /// Returns `true` if the two ranges share at least one character.
    ///
    /// An empty range overlaps a range that strictly contains its anchor.
    pub fn overlaps(&self, other: &TextRange) -> bool {
        if self.is_empty() {
            return other.from < self.from && self.from < other.to;
        }
        if other.is_empty() {
            return self.from < other.from && other.from < self.to;
        }
        self.from < other.to && other.from < self.to
    }

    /// Returns `true` if `other` lies entirely within `self`.
    pub fn covers(&self, other: &TextRange) -> bool {
        self.from <= other.from && other.to <= self.to
    }

    /// Clamp both ends to `0..=len`.
    pub fn clamp(self, len: usize) -> Self {
        let to = self.to.min(len);
        Self {
            from: self.from.min(to),
            to,
        }
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}
