#![warn(missing_docs)]
//! Match Highlight - Incremental, Viewport-Bounded Match Decoration Engine
//!
//! # Overview
//!
//! `match-highlight` finds literal and regular-expression matches inside a live document and turns
//! them into decorations for a host renderer. Only the visible ranges are ever scanned, so the
//! cost of a recompute is bounded by the viewport, not the document.
//!
//! # Core Features
//!
//! - **Rope Snapshots**: immutable `ropey` snapshots with O(log n) line lookup
//! - **Lazy Cursors**: pull-based literal and regex cursors bounded by a range
//! - **Multiline Regex**: lazily grown flattened windows, cached per snapshot
//! - **Layered Decorations**: line, group, mark and widget layers, each sorted
//! - **Selection Matches**: current-word and selected-text highlighting with backpressure
//! - **Debounced Scheduling**: leading+trailing debounce with explicit instants
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  HighlightSurface (config, schedulers)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Classifier / Selection highlighter         │  ← Decorations
//! ├─────────────────────────────────────────────┤
//! │  Literal cursor / Regex cursor              │  ← Matching
//! ├─────────────────────────────────────────────┤
//! │  Flatten cache                              │  ← Multiline windows
//! ├─────────────────────────────────────────────┤
//! │  TextSnapshot (Rope-based)                  │  ← Text Access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use match_highlight::{
//!     DecorationRule, HighlightConfig, HighlightRule, HighlightSurface, HighlightView,
//!     MarkTarget, MatchSpec, RuleSet, SelectionState, TextSnapshot, Viewport,
//! };
//!
//! let rules = RuleSet::compile([HighlightRule::new(
//!     "todo",
//!     MatchSpec::regex(r"TODO\((\w+)\)"),
//!     DecorationRule::new("hl-todo").with_targets([MarkTarget::Match, MarkTarget::Line]),
//! )])
//! .unwrap();
//!
//! let snapshot = TextSnapshot::new("fn main() {}\n// TODO(ana) tidy up\n");
//! let viewport = Viewport::whole(&snapshot);
//! let selection = SelectionState::cursor(0);
//! let view = HighlightView::new(&snapshot, &viewport, &selection);
//!
//! let surface = HighlightSurface::new(HighlightConfig::new(rules), &view);
//! let decorations = surface.rule_decorations();
//! assert_eq!(decorations.marks().len(), 1);
//! assert_eq!(decorations.marks()[0].contents.as_deref(), Some("TODO(ana)"));
//! assert_eq!(decorations.lines()[0].range.from, 13);
//! ```
//!
//! # Module Description
//!
//! - [`text_view`] - rope snapshots, lines and words
//! - [`literal`] - literal substring cursor
//! - [`regex_cursor`] - single-line and multiline regex cursor
//! - [`flatten`] - flattened window cache
//! - [`decoration`] - decoration model and sets
//! - [`rules`] / [`classifier`] - highlight rules and the rule classifier
//! - [`selection`] - selection match highlighting
//! - [`search`] - per-document search targets
//! - [`debounce`] / [`scheduler`] - recompute scheduling
//! - [`surface`] - per-surface facade

pub mod classifier;
pub mod config;
pub mod cursor;
pub mod debounce;
pub mod decoration;
pub mod flatten;
pub mod literal;
mod offsets;
pub mod range;
pub mod regex_cursor;
pub mod rules;
pub mod scheduler;
pub mod search;
pub mod selection;
pub mod surface;
pub mod text_view;
pub mod view;

pub use classifier::{ClassifyOptions, classify};
pub use config::HighlightConfig;
pub use cursor::{GroupMatch, MatchCursor, MatchResult};
pub use debounce::Debouncer;
pub use decoration::{
    Decoration, DecorationKind, DecorationLayer, DecorationSet, DecorationSetBuilder, WidgetSide,
};
pub use flatten::{FlattenCache, FlattenedWindow};
pub use literal::LiteralCursor;
pub use range::TextRange;
pub use regex_cursor::{
    MULTILINE_CHUNK, MULTILINE_DISCARD_MARGIN, PatternError, RegexCursor, RegexFlags, RegexQuery,
    ScanMode, needs_multiline, validate_pattern,
};
pub use rules::{DecorationRule, HighlightRule, MarkTarget, MatchSpec, RuleError, RuleSet};
pub use scheduler::{RecomputeScheduler, SchedulerState, Trigger};
pub use search::{SEARCH_TARGET_CLASS, SearchHighlights, SearchTarget};
pub use selection::{
    DEFAULT_STOP_WORDS, MAX_SELECTION_LENGTH, SelectionMatchKind, SelectionOptions,
    highlight_selection, parse_stop_words,
};
pub use surface::{
    DecorationProvider, HighlightSurface, ReconfigureEffect, SurfaceUpdate, reconfigure,
};
pub use text_view::{Line, LineChunk, SnapshotId, TextError, TextSnapshot, is_word_char};
pub use view::{HighlightView, NoStructure, SelectionState, StructureLookup, Viewport};
