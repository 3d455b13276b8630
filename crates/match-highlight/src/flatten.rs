//! Flattened-window cache for multiline regex scans.
//!
//! Regex engines need a contiguous haystack, so multiline patterns run over a materialized slice
//! of the document. The cache keeps the last requested slice per snapshot. A scan's growing
//! window reuses the text it already has, while a scan over another range keeps only what it
//! shares with the cached one.

use crate::range::TextRange;
use crate::text_view::{SnapshotId, TextError, TextSnapshot};

/// A materialized slice of a snapshot starting at `from`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedWindow {
    from: usize,
    text: String,
    len_chars: usize,
}

impl FlattenedWindow {
    fn new(from: usize, text: String) -> Self {
        let len_chars = text.chars().count();
        Self {
            from,
            text,
            len_chars,
        }
    }

    /// Document offset of the first char of the window.
    pub fn from(&self) -> usize {
        self.from
    }

    /// Document offset just past the last char of the window.
    pub fn to(&self) -> usize {
        self.from + self.len_chars
    }

    /// The window text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the window in chars.
    pub fn len_chars(&self) -> usize {
        self.len_chars
    }

    /// The covered document range.
    pub fn range(&self) -> TextRange {
        TextRange::new(self.from, self.to())
    }

    /// Text of `from..to`; both ends must lie inside this window.
    fn sub_text(&self, from: usize, to: usize) -> &str {
        let start = byte_offset(&self.text, from - self.from);
        let end = start + byte_offset(&self.text[start..], to - from);
        &self.text[start..end]
    }

    fn sub(&self, from: usize, to: usize) -> Self {
        Self {
            from,
            text: self.sub_text(from, to).to_string(),
            len_chars: to - from,
        }
    }
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Single-entry cache of flattened document slices, keyed by snapshot identity.
///
/// A request inside the cached window is served from it. Any other request replaces the entry
/// with exactly the requested range, reusing the overlapping text, so the entry never grows
/// past the largest single request.
#[derive(Debug, Default)]
pub struct FlattenCache {
    entry: Option<(SnapshotId, FlattenedWindow)>,
}

impl FlattenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the flattened text of `from..to` for `snapshot`.
    pub fn window(
        &mut self,
        snapshot: &TextSnapshot,
        from: usize,
        to: usize,
    ) -> Result<FlattenedWindow, TextError> {
        snapshot.check_range(from, to)?;

        let id = snapshot.id();
        let cached = match self.entry.take() {
            Some((cached_id, cached))
                if cached_id == id && cached.from < to && cached.to() > from =>
            {
                cached
            }
            _ => {
                let window = FlattenedWindow::new(from, snapshot.slice(from, to)?);
                self.entry = Some((id, window.clone()));
                return Ok(window);
            }
        };

        if cached.from <= from && to <= cached.to() {
            let window = cached.sub(from, to);
            self.entry = Some((id, cached));
            return Ok(window);
        }

        let mut text = if from < cached.from {
            snapshot.slice(from, cached.from)?
        } else {
            String::new()
        };
        text.push_str(cached.sub_text(from.max(cached.from), to.min(cached.to())));
        if cached.to() < to {
            text.push_str(&snapshot.slice(cached.to(), to)?);
        }
        tracing::trace!(from, to, reused = ?cached.range(), "flattened window rebuilt");

        let window = FlattenedWindow {
            from,
            text,
            len_chars: to - from,
        };
        self.entry = Some((id, window.clone()));
        Ok(window)
    }

    /// Range currently held for `snapshot`, if any.
    pub fn cached_range(&self, snapshot: &TextSnapshot) -> Option<TextRange> {
        self.entry
            .as_ref()
            .filter(|(id, _)| *id == snapshot.id())
            .map(|(_, window)| window.range())
    }

    /// Drop the cached window unless it belongs to `snapshot`.
    pub fn retain_snapshot(&mut self, snapshot: &TextSnapshot) {
        if self
            .entry
            .as_ref()
            .is_some_and(|(id, _)| *id != snapshot.id())
        {
            self.entry = None;
        }
    }

    /// Drop the cached window.
    pub fn clear(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_grows_and_reuses() {
        let snapshot = TextSnapshot::new("0123456789abcdef");
        let mut cache = FlattenCache::new();

        let first = cache.window(&snapshot, 2, 6).unwrap();
        assert_eq!(first.text(), "2345");
        assert_eq!(cache.cached_range(&snapshot), Some(TextRange::new(2, 6)));

        let grown = cache.window(&snapshot, 2, 12).unwrap();
        assert_eq!(grown.text(), "23456789ab");
        assert_eq!(cache.cached_range(&snapshot), Some(TextRange::new(2, 12)));

        let inner = cache.window(&snapshot, 4, 8).unwrap();
        assert_eq!(inner.text(), "4567");
        assert_eq!(inner.range(), TextRange::new(4, 8));
        // Served from the larger window, which is kept.
        assert_eq!(cache.cached_range(&snapshot), Some(TextRange::new(2, 12)));

        let prefixed = cache.window(&snapshot, 0, 4).unwrap();
        assert_eq!(prefixed.text(), "0123");
        assert_eq!(cache.cached_range(&snapshot), Some(TextRange::new(0, 4)));

        let shifted = cache.window(&snapshot, 2, 14).unwrap();
        assert_eq!(shifted.text(), "23456789abcd");
        assert_eq!(cache.cached_range(&snapshot), Some(TextRange::new(2, 14)));
    }

    #[test]
    fn test_scrolling_keeps_entry_bounded() {
        let text = "0123456789".repeat(1000);
        let snapshot = TextSnapshot::new(&text);
        let mut cache = FlattenCache::new();

        for start in (0..9000).step_by(500) {
            let window = cache.window(&snapshot, start, start + 1000).unwrap();
            assert_eq!(window.text(), &text[start..start + 1000]);
            assert_eq!(
                cache.cached_range(&snapshot),
                Some(TextRange::new(start, start + 1000))
            );
        }
    }

    #[test]
    fn test_disjoint_and_new_snapshot_replace() {
        let snapshot = TextSnapshot::new("0123456789");
        let mut cache = FlattenCache::new();
        cache.window(&snapshot, 0, 3).unwrap();
        cache.window(&snapshot, 5, 9).unwrap();
        assert_eq!(cache.cached_range(&snapshot), Some(TextRange::new(5, 9)));

        let edited = TextSnapshot::new("abcdefghij");
        let window = cache.window(&edited, 5, 9).unwrap();
        assert_eq!(window.text(), "fghi");
        assert_eq!(cache.cached_range(&snapshot), None);

        cache.retain_snapshot(&snapshot);
        assert_eq!(cache.cached_range(&edited), None);
    }

    #[test]
    fn test_multibyte_sub_window() {
        let snapshot = TextSnapshot::new("αβγδεζ");
        let mut cache = FlattenCache::new();
        cache.window(&snapshot, 0, 6).unwrap();
        let inner = cache.window(&snapshot, 2, 4).unwrap();
        assert_eq!(inner.text(), "γδ");
        assert_eq!(inner.len_chars(), 2);
    }
}
