//! Per-document search targets.
//!
//! A host can pin a list of search queries to a document path; every query is highlighted
//! case-insensitively with its own color. Targets are compiled into an ordinary [`RuleSet`] so
//! they go through the same classifier as static rules.

use crate::rules::{DecorationRule, HighlightRule, MatchSpec, RuleSet};
use std::collections::BTreeMap;

/// Class of every search-target mark.
pub const SEARCH_TARGET_CLASS: &str = "search-target";

/// One pinned search query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchTarget {
    /// Text to find (case-insensitive).
    pub query: String,
    /// Optional mark color.
    pub color: Option<String>,
}

impl SearchTarget {
    /// A target without a color.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            color: None,
        }
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone)]
struct PathTargets {
    targets: Vec<SearchTarget>,
    rules: RuleSet,
}

/// Search targets keyed by document path.
#[derive(Debug, Clone, Default)]
pub struct SearchHighlights {
    by_path: BTreeMap<String, PathTargets>,
}

impl SearchHighlights {
    /// No targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the targets of `path`. An empty list removes the path.
    pub fn set_targets(&mut self, path: impl Into<String>, targets: Vec<SearchTarget>) {
        let path = path.into();
        if targets.is_empty() {
            self.by_path.remove(&path);
            return;
        }
        let rules = compile_targets(&path, &targets);
        self.by_path.insert(path, PathTargets { targets, rules });
    }

    /// Builder form of [`set_targets`](Self::set_targets).
    pub fn with_targets(mut self, path: impl Into<String>, targets: Vec<SearchTarget>) -> Self {
        self.set_targets(path, targets);
        self
    }

    /// Drop the targets of `path`.
    pub fn clear(&mut self, path: &str) {
        self.by_path.remove(path);
    }

    /// Targets pinned to `path`.
    pub fn targets(&self, path: &str) -> &[SearchTarget] {
        self.by_path
            .get(path)
            .map(|entry| entry.targets.as_slice())
            .unwrap_or_default()
    }

    /// Compiled rules for `path`, if it has any targets.
    pub fn rules_for(&self, path: &str) -> Option<&RuleSet> {
        self.by_path.get(path).map(|entry| &entry.rules)
    }

    /// Paths with targets, sorted.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.by_path.keys().map(String::as_str)
    }

    /// Returns `true` if no path has targets.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Merge two configurations; for a path present in both, `other` wins.
    pub fn combine(mut self, other: Self) -> Self {
        self.by_path.extend(other.by_path);
        self
    }
}

impl PartialEq for SearchHighlights {
    fn eq(&self, other: &Self) -> bool {
        self.by_path.len() == other.by_path.len()
            && self
                .by_path
                .iter()
                .zip(&other.by_path)
                .all(|((a_path, a), (b_path, b))| a_path == b_path && a.targets == b.targets)
    }
}

impl Eq for SearchHighlights {}

fn compile_targets(path: &str, targets: &[SearchTarget]) -> RuleSet {
    let rules = targets
        .iter()
        .enumerate()
        .filter(|(_, target)| !target.query.is_empty())
        .map(|(index, target)| {
            let mut decoration = DecorationRule::new(SEARCH_TARGET_CLASS);
            decoration.color = target.color.clone();
            HighlightRule::new(
                format!("search:{path}#{index}"),
                MatchSpec::literal(target.query.clone()).case_insensitive(true),
                decoration,
            )
        });

    match RuleSet::compile(rules) {
        Ok(rules) => rules,
        Err(err) => {
            tracing::warn!(path, error = %err, "dropping search targets");
            RuleSet::empty()
        }
    }
}
