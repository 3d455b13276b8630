use match_highlight::{DEFAULT_STOP_WORDS, MarkTarget, SelectionOptions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Persisted name of a [`MarkTarget`].
pub enum Mark {
    /// Whole match.
    Match,
    /// Line class.
    Line,
    /// Capture groups.
    Group,
    /// Widget at the match start.
    Start,
    /// Widget at the match end.
    End,
}

impl From<Mark> for MarkTarget {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::Match => MarkTarget::Match,
            Mark::Line => MarkTarget::Line,
            Mark::Group => MarkTarget::Group,
            Mark::Start => MarkTarget::Start,
            Mark::End => MarkTarget::End,
        }
    }
}

impl From<MarkTarget> for Mark {
    fn from(target: MarkTarget) -> Self {
        match target {
            MarkTarget::Match => Mark::Match,
            MarkTarget::Line => Mark::Line,
            MarkTarget::Group => Mark::Group,
            MarkTarget::Start => Mark::Start,
            MarkTarget::End => Mark::End,
        }
    }
}

fn default_applies_to() -> Vec<Mark> {
    vec![Mark::Match]
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// One persisted highlight rule.
pub struct RuleSettings {
    /// Unique rule name.
    pub name: String,

    /// Literal text or regex source.
    pub query: String,

    #[serde(default)]
    /// Treat `query` as a regular expression.
    pub is_regex: bool,

    #[serde(default)]
    /// Case-insensitive matching.
    pub case_insensitive: bool,

    #[serde(default)]
    /// Force multiline regex scanning (`.` matches line breaks).
    pub multiline: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Decoration class; derived from `name` when absent.
    pub class: Option<String>,

    #[serde(default)]
    /// Optional color.
    pub color: Option<String>,

    #[serde(default = "default_applies_to")]
    /// Decorated parts of each match.
    pub applies_to: Vec<Mark>,

    #[serde(default = "default_enabled")]
    /// Disabled rules are kept but not scanned.
    pub enabled: bool,
}

impl RuleSettings {
    /// A literal rule with defaults elsewhere.
    pub fn literal(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            is_regex: false,
            case_insensitive: false,
            multiline: false,
            class: None,
            color: None,
            applies_to: default_applies_to(),
            enabled: true,
        }
    }

    /// A regex rule with defaults elsewhere.
    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            is_regex: true,
            ..Self::literal(name, pattern)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// The persisted configuration document.
pub struct HighlightSettings {
    /// Rules, in evaluation order.
    pub rules: Vec<RuleSettings>,

    /// Debounce delay in milliseconds.
    pub highlight_delay: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Selection debounce delay in milliseconds; `highlightDelay` when absent.
    pub selection_delay: Option<u64>,

    /// Shortest selection or word that is highlighted.
    pub min_match_length: usize,

    /// Selection match ceiling.
    pub max_matches: usize,

    /// Comma separated stop words.
    pub stop_words: String,

    /// Highlight the word around an empty selection.
    pub highlight_word_around_cursor: bool,

    /// Highlight non-empty selected text.
    pub highlight_selected_text: bool,

    /// Structural categories never decorated by rules.
    pub excluded_categories: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Per-rule match ceiling.
    pub rule_match_limit: Option<usize>,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        let selection = SelectionOptions::default();
        Self {
            rules: Vec::new(),
            highlight_delay: selection.highlight_delay.as_millis() as u64,
            selection_delay: None,
            min_match_length: selection.min_selection_length,
            max_matches: selection.max_matches,
            stop_words: DEFAULT_STOP_WORDS.join(", "),
            highlight_word_around_cursor: selection.highlight_word_around_cursor,
            highlight_selected_text: selection.highlight_selected_text,
            excluded_categories: Vec::new(),
            rule_match_limit: None,
        }
    }
}
