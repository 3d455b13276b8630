//! Engine configuration and its merge rules.

use crate::classifier::ClassifyOptions;
use crate::rules::RuleSet;
use crate::search::SearchHighlights;
use crate::selection::SelectionOptions;
use std::time::Duration;

/// Everything a [`HighlightSurface`](crate::HighlightSurface) is configured with.
///
/// Equality is structural, so a surface can tell a real change from a re-sent identical config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HighlightConfig {
    /// Static rules, in evaluation order.
    pub rules: RuleSet,
    /// Selection highlighting options.
    pub selection: SelectionOptions,
    /// Per-document search targets.
    pub search: SearchHighlights,
    /// Debounce delay for rule and search highlighting.
    pub highlight_delay: Duration,
    /// Structural categories whose lines are never decorated by rules.
    pub excluded_categories: Vec<String>,
    /// Per-rule match ceiling for one scan.
    pub rule_match_limit: Option<usize>,
}

impl HighlightConfig {
    /// A config with `rules` and defaults elsewhere.
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Set the selection options.
    pub fn with_selection(mut self, selection: SelectionOptions) -> Self {
        self.selection = selection;
        self
    }

    /// Set the search targets.
    pub fn with_search(mut self, search: SearchHighlights) -> Self {
        self.search = search;
        self
    }

    /// Set the rule debounce delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.highlight_delay = delay;
        self
    }

    /// Set the excluded structural categories.
    pub fn with_excluded_categories<S: Into<String>>(
        mut self,
        categories: impl IntoIterator<Item = S>,
    ) -> Self {
        self.excluded_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-rule match ceiling.
    pub fn with_rule_match_limit(mut self, limit: Option<usize>) -> Self {
        self.rule_match_limit = limit;
        self
    }

    /// Options handed to the classifier.
    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            excluded_categories: self.excluded_categories.clone(),
            max_matches: self.rule_match_limit,
        }
    }

    /// Merge two configurations.
    ///
    /// The first non-empty rule list wins; selection options use
    /// [`SelectionOptions::combine`]; search targets are last writer wins per path; the delay
    /// and the match ceiling take the minimum; excluded categories are unioned.
    pub fn combine(self, other: Self) -> Self {
        let rules = if self.rules.is_empty() {
            other.rules
        } else {
            self.rules
        };
        let mut excluded_categories = self.excluded_categories;
        for category in other.excluded_categories {
            if !excluded_categories.contains(&category) {
                excluded_categories.push(category);
            }
        }
        Self {
            rules,
            selection: self.selection.combine(other.selection),
            search: self.search.combine(other.search),
            highlight_delay: self.highlight_delay.min(other.highlight_delay),
            excluded_categories,
            rule_match_limit: min_limit(self.rule_match_limit, other.rule_match_limit),
        }
    }

    /// Fold several configurations with [`combine`](Self::combine); defaults when there are none.
    pub fn combine_all(configs: impl IntoIterator<Item = Self>) -> Self {
        configs.into_iter().reduce(Self::combine).unwrap_or_default()
    }
}

fn min_limit(a: Option<usize>, b: Option<usize>) -> Option<usize> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
