//! Decoration data model.
//!
//! Decorations are what the host renderer paints: inline marks over a range, line-level
//! classes, group marks over captured sub-ranges, and zero-width boundary widgets. Each kind
//! lives in its own sorted layer; layers stack in a fixed z-order
//! (line < group < mark < widget), so overlapping styles compose predictably.

use crate::range::TextRange;
use std::sync::Arc;

/// Which end of a match a boundary widget sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WidgetSide {
    /// At the match start.
    Start,
    /// At the match end.
    End,
}

/// The kind of a decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    /// Class applied to a whole line; anchored at the line start.
    LineMark,
    /// Mark over a captured regex group.
    GroupMark {
        /// Group index within the pattern.
        group: usize,
    },
    /// Mark over a whole match.
    InlineMark,
    /// Zero-width widget at a match boundary.
    Widget(WidgetSide),
}

impl DecorationKind {
    /// The rendering layer for this kind.
    pub fn layer(&self) -> DecorationLayer {
        match self {
            Self::LineMark => DecorationLayer::Line,
            Self::GroupMark { .. } => DecorationLayer::Group,
            Self::InlineMark => DecorationLayer::Mark,
            Self::Widget(_) => DecorationLayer::Widget,
        }
    }
}

/// Rendering layers, in bottom-to-top order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecorationLayer {
    /// Line classes.
    Line,
    /// Group marks.
    Group,
    /// Inline marks.
    Mark,
    /// Boundary widgets.
    Widget,
}

impl DecorationLayer {
    /// All layers, bottom to top.
    pub const ALL: [DecorationLayer; 4] = [Self::Line, Self::Group, Self::Mark, Self::Widget];

    fn slot(self) -> usize {
        match self {
            Self::Line => 0,
            Self::Group => 1,
            Self::Mark => 2,
            Self::Widget => 3,
        }
    }
}

/// A single decoration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    /// Anchor range (empty for line marks and widgets).
    pub range: TextRange,
    /// Decoration kind.
    pub kind: DecorationKind,
    /// CSS-style class name(s), space separated.
    pub class: String,
    /// Optional color attached by the rule.
    pub color: Option<String>,
    /// Trimmed matched text, for hosts that expose it as an attribute.
    pub contents: Option<String>,
}

impl Decoration {
    fn new(range: TextRange, kind: DecorationKind, class: impl Into<String>) -> Self {
        Self {
            range,
            kind,
            class: class.into(),
            color: None,
            contents: None,
        }
    }

    /// Inline mark over `range`.
    pub fn mark(range: TextRange, class: impl Into<String>) -> Self {
        Self::new(range, DecorationKind::InlineMark, class)
    }

    /// Line class anchored at `line_start`.
    pub fn line(line_start: usize, class: impl Into<String>) -> Self {
        Self::new(TextRange::point(line_start), DecorationKind::LineMark, class)
    }

    /// Mark over captured group `group`.
    pub fn group(range: TextRange, group: usize, class: impl Into<String>) -> Self {
        Self::new(range, DecorationKind::GroupMark { group }, class)
    }

    /// Zero-width widget at `pos`.
    pub fn widget(pos: usize, side: WidgetSide, class: impl Into<String>) -> Self {
        Self::new(TextRange::point(pos), DecorationKind::Widget(side), class)
    }

    /// Attach a color.
    pub fn with_color(mut self, color: Option<String>) -> Self {
        self.color = color;
        self
    }

    /// Attach matched text.
    pub fn with_contents(mut self, contents: impl Into<String>) -> Self {
        self.contents = Some(contents.into());
        self
    }
}

/// An immutable, sorted collection of decorations, one ordered slice per layer.
///
/// Within a layer decorations are ordered by `(from, to)`; ties keep insertion order. Sets are
/// built once per scan and replaced wholesale, never edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationSet {
    layers: [Arc<[Decoration]>; 4],
}

impl DecorationSet {
    /// A set with no decorations.
    pub fn empty() -> Self {
        Self {
            layers: std::array::from_fn(|_| Arc::from(Vec::new())),
        }
    }

    /// Decorations of one layer, sorted by `(from, to)`.
    pub fn layer(&self, layer: DecorationLayer) -> &[Decoration] {
        &self.layers[layer.slot()]
    }

    /// Line marks.
    pub fn lines(&self) -> &[Decoration] {
        self.layer(DecorationLayer::Line)
    }

    /// Group marks.
    pub fn groups(&self) -> &[Decoration] {
        self.layer(DecorationLayer::Group)
    }

    /// Inline marks.
    pub fn marks(&self) -> &[Decoration] {
        self.layer(DecorationLayer::Mark)
    }

    /// Boundary widgets.
    pub fn widgets(&self) -> &[Decoration] {
        self.layer(DecorationLayer::Widget)
    }

    /// Total number of decorations.
    pub fn len(&self) -> usize {
        self.layers.iter().map(|layer| layer.len()).sum()
    }

    /// Returns `true` if there are no decorations at all.
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|layer| layer.is_empty())
    }

    /// Iterate all decorations, bottom layer first.
    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.layers.iter().flat_map(|layer| layer.iter())
    }
}

impl Default for DecorationSet {
    fn default() -> Self {
        Self::empty()
    }
}

/// Accumulates decorations and sorts them into a [`DecorationSet`].
#[derive(Debug, Default)]
pub struct DecorationSetBuilder {
    buckets: [Vec<Decoration>; 4],
}

impl DecorationSetBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one decoration.
    pub fn push(&mut self, decoration: Decoration) {
        self.buckets[decoration.kind.layer().slot()].push(decoration);
    }

    /// Number of decorations pushed so far.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Returns `true` if nothing was pushed.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    /// Sort every layer and freeze the set.
    pub fn build(self) -> DecorationSet {
        let layers = self.buckets.map(|mut bucket| {
            bucket.sort_by_key(|decoration| (decoration.range.from, decoration.range.to));
            Arc::from(bucket)
        });
        DecorationSet { layers }
    }
}

impl Extend<Decoration> for DecorationSetBuilder {
    fn extend<T: IntoIterator<Item = Decoration>>(&mut self, iter: T) {
        for decoration in iter {
            self.push(decoration);
        }
    }
}

impl FromIterator<Decoration> for DecorationSet {
    fn from_iter<T: IntoIterator<Item = Decoration>>(iter: T) -> Self {
        let mut builder = DecorationSetBuilder::new();
        builder.extend(iter);
        builder.build()
    }
}
