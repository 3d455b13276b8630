//! Segmented text view.
//!
//! [`TextSnapshot`] wraps an immutable [`Rope`]: cloning is O(1), line lookup is O(log n) and
//! slicing is O(length of the slice). Scanners pull one line (or one char) at a time instead of
//! flattening the whole buffer into a single `String`.

use crate::range::TextRange;
use ropey::{Rope, RopeSlice};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

static NEXT_SNAPSHOT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a [`TextSnapshot`].
///
/// Every snapshot gets a fresh id at construction; clones share it. Caches key on this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnapshotId(u64);

/// Errors produced by the text view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    /// `from`/`to` fall outside `0..=len`, or `from > to`.
    #[error("range {from}..{to} is out of bounds for a document of {len} chars")]
    OutOfRange {
        /// Requested start offset.
        from: usize,
        /// Requested end offset.
        to: usize,
        /// Document length in chars.
        len: usize,
    },
}

/// A logical line. `to` excludes the line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// Zero-based line number.
    pub number: usize,
    /// Char offset of the first character of the line.
    pub from: usize,
    /// Char offset just past the last non-break character of the line.
    pub to: usize,
}

impl Line {
    /// Length of the line content in chars.
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Returns `true` for a line with no content.
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// The content range of the line.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.from, self.to)
    }
}

/// One line handed out by [`LineChunks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChunk {
    /// Position of the line in the snapshot.
    pub line: Line,
    /// Line content without the trailing line break.
    pub text: String,
}

/// Returns `true` for characters that belong to a word (alphanumeric or `_`).
pub fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

/// An immutable snapshot of the document text.
#[derive(Debug, Clone)]
pub struct TextSnapshot {
    rope: Rope,
    id: SnapshotId,
}

impl TextSnapshot {
    /// Build a snapshot from a string.
    pub fn new(text: &str) -> Self {
        Self::from_rope(Rope::from_str(text))
    }

    /// Wrap an existing rope. The rope is shared, not copied.
    pub fn from_rope(rope: Rope) -> Self {
        Self {
            rope,
            id: SnapshotId(NEXT_SNAPSHOT_ID.fetch_add(1, Ordering::Relaxed)),
        }
    }

    /// Snapshot identity.
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    /// The underlying rope.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Document length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` for an empty document.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Number of lines (an empty document has one line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Fails with [`TextError::OutOfRange`] unless `from <= to <= len`.
    pub fn check_range(&self, from: usize, to: usize) -> Result<(), TextError> {
        let len = self.len_chars();
        if from > to || to > len {
            return Err(TextError::OutOfRange { from, to, len });
        }
        Ok(())
    }

    /// Clamp a range to the document bounds.
    pub fn clamp_range(&self, range: TextRange) -> TextRange {
        range.clamp(self.len_chars())
    }

    /// The line containing `pos` (`pos == len` resolves to the last line).
    pub fn line_at(&self, pos: usize) -> Result<Line, TextError> {
        self.check_range(pos, pos)?;
        Ok(self.line_unchecked(self.rope.char_to_line(pos)))
    }

    /// Line by number, or `None` past the last line.
    pub fn line(&self, number: usize) -> Option<Line> {
        (number < self.rope.len_lines()).then(|| self.line_unchecked(number))
    }

    fn line_unchecked(&self, number: usize) -> Line {
        let from = self.rope.line_to_char(number);
        let slice = self.rope.line(number);
        let content = slice.len_chars() - line_break_len(slice);
        Line {
            number,
            from,
            to: from + content,
        }
    }

    /// Content of `line` (no line break).
    pub fn line_text(&self, line: &Line) -> String {
        self.rope.slice(line.from..line.to).to_string()
    }

    /// Copy `from..to` into a `String`.
    pub fn slice(&self, from: usize, to: usize) -> Result<String, TextError> {
        self.check_range(from, to)?;
        Ok(self.rope.slice(from..to).to_string())
    }

    /// The character at `pos`, if any.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        (pos < self.len_chars()).then(|| self.rope.char(pos))
    }

    /// Lazily iterate the chars of `from..to`.
    pub fn chars_between(&self, from: usize, to: usize) -> Result<ropey::iter::Chars<'_>, TextError> {
        self.check_range(from, to)?;
        Ok(self.rope.slice(from..to).chars())
    }

    /// Lazily iterate whole lines, starting with the line that contains `pos`.
    pub fn lines_from(&self, pos: usize) -> Result<LineChunks<'_>, TextError> {
        let first = self.line_at(pos)?;
        Ok(LineChunks {
            snapshot: self,
            next_line: first.number,
        })
    }

    /// The word touching `pos`, if any.
    ///
    /// Words follow Unicode word boundaries and must contain at least one word character. A
    /// position right after a word's last char still resolves to that word.
    pub fn word_at(&self, pos: usize) -> Option<TextRange> {
        let line = self.line_at(pos).ok()?;
        let text = self.line_text(&line);
        let column = pos - line.from;

        let mut char_start = 0usize;
        for (_, segment) in text.split_word_bound_indices() {
            let char_end = char_start + segment.chars().count();
            if char_start > column {
                break;
            }
            if column <= char_end && segment.chars().any(is_word_char) {
                return Some(TextRange::new(line.from + char_start, line.from + char_end));
            }
            char_start = char_end;
        }
        None
    }
}

/// Lazy line iterator returned by [`TextSnapshot::lines_from`].
#[derive(Debug, Clone)]
pub struct LineChunks<'a> {
    snapshot: &'a TextSnapshot,
    next_line: usize,
}

impl Iterator for LineChunks<'_> {
    type Item = LineChunk;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.snapshot.line(self.next_line)?;
        self.next_line += 1;
        Some(LineChunk {
            line,
            text: self.snapshot.line_text(&line),
        })
    }
}

fn line_break_len(line: RopeSlice<'_>) -> usize {
    let len = line.len_chars();
    if len == 0 {
        return 0;
    }
    match line.char(len - 1) {
        '\n' => {
            if len >= 2 && line.char(len - 2) == '\r' {
                2
            } else {
                1
            }
        }
        '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}' => 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_at() {
        let snapshot = TextSnapshot::new("ABC\nDEF\r\nGHI");
        assert_eq!(
            snapshot.line_at(0).unwrap(),
            Line {
                number: 0,
                from: 0,
                to: 3
            }
        );
        assert_eq!(snapshot.line_at(3).unwrap().number, 0);
        let second = snapshot.line_at(5).unwrap();
        assert_eq!((second.number, second.from, second.to), (1, 4, 7));
        let third = snapshot.line_at(snapshot.len_chars()).unwrap();
        assert_eq!((third.number, third.from, third.to), (2, 9, 12));
    }

    #[test]
    fn test_out_of_range() {
        let snapshot = TextSnapshot::new("abc");
        assert_eq!(
            snapshot.slice(1, 9),
            Err(TextError::OutOfRange {
                from: 1,
                to: 9,
                len: 3
            })
        );
        assert!(snapshot.line_at(4).is_err());
        assert!(snapshot.slice(2, 1).is_err());
    }

    #[test]
    fn test_lines_from() {
        let snapshot = TextSnapshot::new("one\ntwo\nthree\n");
        let lines: Vec<String> = snapshot.lines_from(5).unwrap().map(|c| c.text).collect();
        assert_eq!(lines, vec!["two", "three", ""]);
    }

    #[test]
    fn test_word_at() {
        let snapshot = TextSnapshot::new("let foo_bar = naïve;");
        assert_eq!(snapshot.word_at(5), Some(TextRange::new(4, 11)));
        // Right after the word.
        assert_eq!(snapshot.word_at(11), Some(TextRange::new(4, 11)));
        assert_eq!(snapshot.word_at(12), None);
        assert_eq!(snapshot.word_at(16), Some(TextRange::new(14, 19)));
    }

    #[test]
    fn test_snapshot_identity() {
        let a = TextSnapshot::new("same");
        let b = TextSnapshot::new("same");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }
}
