//! Host-supplied view state: viewport, selection and structural annotations.

use crate::range::TextRange;
use crate::text_view::TextSnapshot;

/// The visible parts of the document: ordered, disjoint ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Viewport {
    ranges: Vec<TextRange>,
}

impl Viewport {
    /// Build a viewport from visible ranges.
    ///
    /// Ranges are sorted; overlapping or touching ranges are merged and empty ranges dropped.
    pub fn new(ranges: impl IntoIterator<Item = TextRange>) -> Self {
        let mut sorted: Vec<TextRange> = ranges.into_iter().filter(|r| !r.is_empty()).collect();
        sorted.sort();

        let mut merged: Vec<TextRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if range.from <= last.to => last.to = last.to.max(range.to),
                _ => merged.push(range),
            }
        }
        Self { ranges: merged }
    }

    /// A viewport covering the whole snapshot.
    pub fn whole(snapshot: &TextSnapshot) -> Self {
        Self::new([TextRange::new(0, snapshot.len_chars())])
    }

    /// Visible ranges, in document order.
    pub fn ranges(&self) -> &[TextRange] {
        &self.ranges
    }

    /// Total number of visible chars.
    pub fn visible_len(&self) -> usize {
        self.ranges.iter().map(TextRange::len).sum()
    }
}

/// Selection state of the editor surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    ranges: Vec<TextRange>,
    main: usize,
}

impl SelectionState {
    /// A selection from explicit ranges; `main` indexes the primary range.
    ///
    /// An empty list becomes a caret at offset 0; an out-of-bounds `main` is clamped.
    pub fn new(ranges: Vec<TextRange>, main: usize) -> Self {
        let ranges = if ranges.is_empty() {
            vec![TextRange::point(0)]
        } else {
            ranges
        };
        let main = main.min(ranges.len() - 1);
        Self { ranges, main }
    }

    /// A single caret.
    pub fn cursor(pos: usize) -> Self {
        Self::single(TextRange::point(pos))
    }

    /// A single range selection.
    pub fn single(range: TextRange) -> Self {
        Self {
            ranges: vec![range],
            main: 0,
        }
    }

    /// All selection ranges.
    pub fn ranges(&self) -> &[TextRange] {
        &self.ranges
    }

    /// The primary range.
    pub fn main(&self) -> TextRange {
        self.ranges[self.main]
    }

    /// Returns `true` with more than one selection range.
    pub fn is_multiple(&self) -> bool {
        self.ranges.len() > 1
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::cursor(0)
    }
}

/// Structural annotations provided by the host (syntax tree, markdown parser, ...).
pub trait StructureLookup {
    /// Token category at `pos` (space-separated category names), if any.
    fn category_at(&self, pos: usize) -> Option<&str>;
}

/// A [`StructureLookup`] that knows nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStructure;

impl StructureLookup for NoStructure {
    fn category_at(&self, _pos: usize) -> Option<&str> {
        None
    }
}

static NO_STRUCTURE: NoStructure = NoStructure;

/// Everything a scan reads from the host, captured at execution time.
#[derive(Clone, Copy)]
pub struct HighlightView<'a> {
    /// Current document snapshot.
    pub snapshot: &'a TextSnapshot,
    /// Visible ranges.
    pub viewport: &'a Viewport,
    /// Current selection.
    pub selection: &'a SelectionState,
    /// Structural annotations.
    pub structure: &'a dyn StructureLookup,
    /// Path of the document, used to look up per-document search targets.
    pub path: Option<&'a str>,
}

impl<'a> HighlightView<'a> {
    /// A view without structural annotations or document path.
    pub fn new(
        snapshot: &'a TextSnapshot,
        viewport: &'a Viewport,
        selection: &'a SelectionState,
    ) -> Self {
        Self {
            snapshot,
            viewport,
            selection,
            structure: &NO_STRUCTURE,
            path: None,
        }
    }

    /// Attach a structural lookup.
    pub fn with_structure(mut self, structure: &'a dyn StructureLookup) -> Self {
        self.structure = structure;
        self
    }

    /// Attach the document path.
    pub fn with_path(mut self, path: &'a str) -> Self {
        self.path = Some(path);
        self
    }
}
