//! Pull-based match cursors.
//!
//! Both the literal and the regex cursor implement [`MatchCursor`]. A cursor is created for a
//! bounded range and is finite: it never reports a match that extends past the range end, and
//! once [`MatchCursor::advance`] returns `false` it keeps returning `false`.

use crate::range::TextRange;
use std::sync::Arc;

/// A captured regex group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMatch {
    /// Group index (`1` is the first explicit group).
    pub index: usize,
    /// Group name for `(?P<name>...)` groups.
    pub name: Option<Arc<str>>,
    /// Captured range in document char offsets.
    pub range: TextRange,
}

impl GroupMatch {
    /// The group name, or its index rendered as text.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.to_string(),
            None => self.index.to_string(),
        }
    }
}

/// A single match produced by a cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MatchResult {
    /// Range of the whole match.
    pub range: TextRange,
    /// Participating capture groups, in index order. Always empty for literal matches.
    pub groups: Vec<GroupMatch>,
}

impl MatchResult {
    /// A match without groups.
    pub fn new(range: TextRange) -> Self {
        Self {
            range,
            groups: Vec::new(),
        }
    }

    /// Match start.
    pub fn from(&self) -> usize {
        self.range.from
    }

    /// Match end.
    pub fn to(&self) -> usize {
        self.range.to
    }
}

/// A lazy, forward-only enumerator of matches inside a bounded range.
pub trait MatchCursor {
    /// Move to the next match. Returns `false` once the range is exhausted.
    fn advance(&mut self) -> bool;

    /// The match found by the last successful [`advance`](MatchCursor::advance).
    ///
    /// Before the first successful advance this is an empty match at offset 0.
    fn current(&self) -> &MatchResult;

    /// Returns `true` once the cursor has reached the end of its range.
    fn is_done(&self) -> bool;
}
