//! Case-folding substring cursor.
//!
//! The haystack is pulled char by char from the rope, so a query that contains line breaks
//! (a multi-line selection) matches across lines without flattening the document. Matches are
//! leftmost-first and never overlap.

use crate::cursor::{MatchCursor, MatchResult};
use crate::range::TextRange;
use crate::text_view::{TextError, TextSnapshot};

#[derive(Debug, Clone, Copy)]
struct Partial {
    start: usize,
    matched: usize,
}

/// Literal substring cursor over `from..to` of a snapshot.
///
/// With `case_fold` enabled both the query and the haystack are lowercased per char
/// ([`char::to_lowercase`]). A folded char may expand to several chars; matches still start and
/// end on source char boundaries.
pub struct LiteralCursor<'a> {
    chars: ropey::iter::Chars<'a>,
    pos: usize,
    query: Vec<char>,
    case_fold: bool,
    partials: Vec<Partial>,
    current: MatchResult,
    done: bool,
}

impl<'a> LiteralCursor<'a> {
    /// Create a cursor. Fails if `from..to` is outside the snapshot.
    ///
    /// An empty `query` produces a cursor that is immediately done.
    pub fn new(
        snapshot: &'a TextSnapshot,
        query: &str,
        from: usize,
        to: usize,
        case_fold: bool,
    ) -> Result<Self, TextError> {
        let chars = snapshot.chars_between(from, to)?;
        let query: Vec<char> = if case_fold {
            query.chars().flat_map(char::to_lowercase).collect()
        } else {
            query.chars().collect()
        };
        let done = query.is_empty();

        Ok(Self {
            chars,
            pos: from,
            query,
            case_fold,
            partials: Vec::new(),
            current: MatchResult::default(),
            done,
        })
    }

    /// Feed one haystack char; returns the start of a completed match, if any.
    fn feed(&mut self, ch: char, at: usize) -> Option<usize> {
        let Self {
            query,
            case_fold,
            partials,
            ..
        } = self;

        partials.push(Partial {
            start: at,
            matched: 0,
        });

        let mut completed = None;
        partials.retain_mut(|partial| {
            if completed.is_some() {
                return false;
            }
            match extend(query, partial.matched, ch, *case_fold) {
                Some(matched) if matched == query.len() => {
                    completed = Some(partial.start);
                    false
                }
                Some(matched) => {
                    partial.matched = matched;
                    true
                }
                None => false,
            }
        });
        completed
    }
}

fn extend(query: &[char], matched: usize, ch: char, case_fold: bool) -> Option<usize> {
    if case_fold {
        let mut next = matched;
        for lower in ch.to_lowercase() {
            if query.get(next) != Some(&lower) {
                return None;
            }
            next += 1;
        }
        Some(next)
    } else {
        (query.get(matched) == Some(&ch)).then_some(matched + 1)
    }
}

impl MatchCursor for LiteralCursor<'_> {
    fn advance(&mut self) -> bool {
        while !self.done {
            let Some(ch) = self.chars.next() else {
                self.done = true;
                break;
            };
            let at = self.pos;
            self.pos += 1;

            if let Some(start) = self.feed(ch, at) {
                self.partials.clear();
                self.current = MatchResult::new(TextRange::new(start, self.pos));
                return true;
            }
        }
        false
    }

    fn current(&self) -> &MatchResult {
        &self.current
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

impl Iterator for LiteralCursor<'_> {
    type Item = MatchResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().then(|| self.current.clone())
    }
}
