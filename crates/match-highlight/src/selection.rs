//! Selection and current-word highlighting.
//!
//! With a caret, the word around it is searched for (whole words only); with a selection, the
//! trimmed selected text is. Every visible occurrence gets a mark, the one under the selection a
//! distinct "current" class.

use crate::cursor::MatchCursor;
use crate::decoration::{Decoration, DecorationSet, DecorationSetBuilder};
use crate::literal::LiteralCursor;
use crate::range::TextRange;
use crate::text_view::{TextSnapshot, is_word_char};
use crate::view::HighlightView;
use std::time::Duration;

/// Longest selection (in chars) that is still searched for.
pub const MAX_SELECTION_LENGTH: usize = 200;

/// Words never highlighted around the caret.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "myself", "our", "ours", "ourselves", "you", "your", "yours", "yourself", "yourselves", "him",
    "his", "himself", "she", "her", "hers", "herself", "its", "itself", "they", "them", "their",
    "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "these", "those",
    "are", "was", "were", "been", "being", "have", "has", "had", "having", "does", "did", "doing",
    "the", "and", "but", "because", "until", "while", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "from", "down",
    "out", "off", "over", "under", "again", "further", "then", "once", "here", "there", "when",
    "where", "why", "how", "all", "any", "both", "each", "few", "more", "most", "other", "some",
    "such", "nor", "not", "only", "own", "same", "than", "too", "very", "can", "will", "just",
    "don", "should", "now",
];

/// What is being matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionMatchKind {
    /// Word around an empty selection.
    Word,
    /// Non-empty selected text.
    String,
}

impl SelectionMatchKind {
    /// Class of the occurrence under the selection.
    pub fn current_class(&self) -> &'static str {
        match self {
            Self::Word => "current-word",
            Self::String => "current-string",
        }
    }

    /// Class of every other occurrence.
    pub fn matched_class(&self) -> &'static str {
        match self {
            Self::Word => "matched-word",
            Self::String => "matched-string",
        }
    }
}

/// Selection highlighting options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOptions {
    /// Highlight the word around an empty selection.
    pub highlight_word_around_cursor: bool,
    /// Highlight non-empty selected text.
    pub highlight_selected_text: bool,
    /// Shortest word or selection (in chars) that is highlighted.
    pub min_selection_length: usize,
    /// Occurrence ceiling; above it nothing is highlighted.
    pub max_matches: usize,
    /// Lowercased stop words.
    pub stop_words: Vec<String>,
    /// Debounce delay of the selection scheduler.
    pub highlight_delay: Duration,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            highlight_word_around_cursor: true,
            highlight_selected_text: true,
            min_selection_length: 3,
            max_matches: 100,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            highlight_delay: Duration::ZERO,
        }
    }
}

impl SelectionOptions {
    /// Replace the stop words with a comma separated list.
    pub fn with_stop_words(mut self, list: &str) -> Self {
        self.stop_words = parse_stop_words(list);
        self
    }

    /// Returns `true` if `word` is a stop word (case-insensitive).
    pub fn is_stop_word(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.stop_words.iter().any(|stop| *stop == word)
    }

    /// Merge two option sets: switches OR, limits and delay take the minimum, the first
    /// non-empty stop word list wins.
    pub fn combine(self, other: Self) -> Self {
        Self {
            highlight_word_around_cursor: self.highlight_word_around_cursor
                || other.highlight_word_around_cursor,
            highlight_selected_text: self.highlight_selected_text || other.highlight_selected_text,
            min_selection_length: self.min_selection_length.min(other.min_selection_length),
            max_matches: self.max_matches.min(other.max_matches),
            stop_words: if self.stop_words.is_empty() {
                other.stop_words
            } else {
                self.stop_words
            },
            highlight_delay: self.highlight_delay.min(other.highlight_delay),
        }
    }

    /// Fold several option sets with [`combine`](Self::combine); defaults when there are none.
    pub fn combine_all(options: impl IntoIterator<Item = Self>) -> Self {
        options.into_iter().reduce(Self::combine).unwrap_or_default()
    }
}

/// Split a comma separated stop word list, lowercasing and dropping blanks.
pub fn parse_stop_words(list: &str) -> Vec<String> {
    list.split(',')
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
}

struct SelectionQuery {
    kind: SelectionMatchKind,
    text: String,
    anchor: TextRange,
}

fn selection_query(options: &SelectionOptions, view: &HighlightView<'_>) -> Option<SelectionQuery> {
    let snapshot = view.snapshot;
    let range = snapshot.clamp_range(view.selection.main());

    if range.is_empty() {
        if !options.highlight_word_around_cursor {
            return None;
        }
        let word = snapshot.word_at(range.from)?;
        let text = snapshot.slice(word.from, word.to).ok()?;
        if word.len() < options.min_selection_length || options.is_stop_word(&text) {
            return None;
        }
        Some(SelectionQuery {
            kind: SelectionMatchKind::Word,
            text,
            anchor: word,
        })
    } else {
        if !options.highlight_selected_text {
            return None;
        }
        if range.len() < options.min_selection_length || range.len() > MAX_SELECTION_LENGTH {
            return None;
        }
        let text = snapshot.slice(range.from, range.to).ok()?.trim().to_string();
        if text.is_empty() {
            return None;
        }
        Some(SelectionQuery {
            kind: SelectionMatchKind::String,
            text,
            anchor: range,
        })
    }
}

fn is_whole_word(snapshot: &TextSnapshot, range: TextRange) -> bool {
    let before = range
        .from
        .checked_sub(1)
        .and_then(|pos| snapshot.char_at(pos));
    let after = snapshot.char_at(range.to);
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Compute selection decorations for the current view.
///
/// Returns an empty set when there are several selection ranges, when the query is too short,
/// too long or a stop word, when more than `max_matches` occurrences are visible, or when the
/// only occurrence is the selection itself.
pub fn highlight_selection(options: &SelectionOptions, view: &HighlightView<'_>) -> DecorationSet {
    if view.selection.is_multiple() {
        return DecorationSet::empty();
    }
    let Some(query) = selection_query(options, view) else {
        return DecorationSet::empty();
    };

    let snapshot = view.snapshot;
    let mut builder = DecorationSetBuilder::new();
    let mut others = 0usize;

    for part in view.viewport.ranges() {
        let part = snapshot.clamp_range(*part);
        let mut cursor = match LiteralCursor::new(snapshot, &query.text, part.from, part.to, true) {
            Ok(cursor) => cursor,
            Err(err) => {
                tracing::warn!(error = %err, "selection scan failed");
                return DecorationSet::empty();
            }
        };

        while cursor.advance() {
            let range = cursor.current().range;
            if query.kind == SelectionMatchKind::Word && !is_whole_word(snapshot, range) {
                continue;
            }
            let class = if range.overlaps(&query.anchor) {
                query.kind.current_class()
            } else {
                others += 1;
                query.kind.matched_class()
            };
            let contents = snapshot
                .slice(range.from, range.to)
                .map(|text| text.trim().to_string())
                .unwrap_or_default();
            builder.push(Decoration::mark(range, class).with_contents(contents));

            if builder.len() > options.max_matches {
                tracing::debug!(
                    max_matches = options.max_matches,
                    "too many selection matches, highlighting disabled"
                );
                return DecorationSet::empty();
            }
        }
    }

    if others == 0 {
        return DecorationSet::empty();
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{SelectionState, Viewport};

    fn run(text: &str, selection: SelectionState, options: &SelectionOptions) -> Vec<(usize, usize, String)> {
        let snapshot = TextSnapshot::new(text);
        let viewport = Viewport::whole(&snapshot);
        let view = HighlightView::new(&snapshot, &viewport, &selection);
        highlight_selection(options, &view)
            .marks()
            .iter()
            .map(|d| (d.range.from, d.range.to, d.class.clone()))
            .collect()
    }

    #[test]
    fn test_word_mode_requires_whole_words() {
        let marks = run(
            "alpha alphabet alpha",
            SelectionState::cursor(2),
            &SelectionOptions::default(),
        );
        assert_eq!(
            marks,
            vec![
                (0, 5, "current-word".to_string()),
                (15, 20, "matched-word".to_string()),
            ]
        );
    }

    #[test]
    fn test_stop_words_are_ignored() {
        let options = SelectionOptions::default();
        assert!(options.is_stop_word("The"));
        assert!(run("the cat and the hat", SelectionState::cursor(1), &options).is_empty());
    }

    #[test]
    fn test_single_occurrence_yields_nothing() {
        assert!(run("unique words", SelectionState::cursor(2), &SelectionOptions::default()).is_empty());
    }

    #[test]
    fn test_multiple_ranges_yield_nothing() {
        let selection = SelectionState::new(vec![TextRange::new(0, 3), TextRange::new(4, 7)], 0);
        assert!(run("abc abc abc", selection, &SelectionOptions::default()).is_empty());
    }

    #[test]
    fn test_long_selection_yields_nothing() {
        let text = "x".repeat(MAX_SELECTION_LENGTH + 1);
        let doc = format!("{text}\n{text}");
        let selection = SelectionState::single(TextRange::new(0, MAX_SELECTION_LENGTH + 1));
        assert!(run(&doc, selection, &SelectionOptions::default()).is_empty());
    }

    #[test]
    fn test_combine() {
        let a = SelectionOptions {
            highlight_word_around_cursor: false,
            min_selection_length: 5,
            highlight_delay: Duration::from_millis(50),
            ..SelectionOptions::default()
        };
        let b = SelectionOptions {
            highlight_word_around_cursor: true,
            max_matches: 20,
            stop_words: Vec::new(),
            highlight_delay: Duration::from_millis(10),
            ..SelectionOptions::default()
        };
        let combined = SelectionOptions::combine_all([a, b]);
        assert!(combined.highlight_word_around_cursor);
        assert_eq!(combined.min_selection_length, 3);
        assert_eq!(combined.max_matches, 20);
        assert_eq!(combined.highlight_delay, Duration::from_millis(10));
        assert!(!combined.stop_words.is_empty());
    }

    #[test]
    fn test_parse_stop_words() {
        assert_eq!(parse_stop_words(" Foo, bar,,BAZ "), vec!["foo", "bar", "baz"]);
    }
}
