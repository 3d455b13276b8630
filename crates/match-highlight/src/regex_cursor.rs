//! Regular-expression cursor.
//!
//! Patterns are compiled once into a [`RegexQuery`]. The query picks a scan mode from the
//! pattern text:
//!
//! - **single-line**: the document is scanned one line at a time, so the common case never
//!   materializes more than a line;
//! - **multiline**: patterns that can match a line break (`\s`, `\W`, `\D`, `\n`, `\r`, negated
//!   classes, or the explicit multiline flag) run over a [`FlattenedWindow`] that grows by
//!   doubling.
//!
//! Both modes report char offsets and captured groups through [`MatchCursor`].

use crate::cursor::{GroupMatch, MatchCursor, MatchResult};
use crate::flatten::{FlattenCache, FlattenedWindow};
use crate::offsets::CharIndex;
use crate::range::TextRange;
use crate::text_view::{Line, TextError, TextSnapshot};
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use thiserror::Error;

/// Initial flattened chunk length (chars) for multiline scans.
pub const MULTILINE_CHUNK: usize = 5000;

/// A multiline match ending within this many chars of the end of an incomplete window is
/// discarded and the window regrown, since more context could extend it.
///
/// Empirically tuned; not a correctness bound.
pub const MULTILINE_DISCARD_MARGIN: usize = 10;

/// Chars of context kept before a multiline scan start, for `^` and `\b`.
const LOOKBEHIND: usize = 1;

/// Flags applied when compiling a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegexFlags {
    /// Case-insensitive matching.
    pub case_insensitive: bool,
    /// Force the multiline scan mode and let `.` match line breaks.
    pub multiline: bool,
}

/// A pattern failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pattern '{pattern}': {message}")]
pub struct PatternError {
    /// The rejected pattern.
    pub pattern: String,
    /// Compiler diagnostic.
    pub message: String,
}

/// How a [`RegexQuery`] scans the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// One line at a time.
    SingleLine,
    /// Over a growing flattened window.
    Multiline,
}

/// Returns `true` if `pattern` contains a construct that can match across a line break.
pub fn needs_multiline(pattern: &str) -> bool {
    if pattern.contains('\n') || pattern.contains('\r') || pattern.contains("[^") {
        return true;
    }
    pattern
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0] == b'\\' && matches!(pair[1], b's' | b'W' | b'D' | b'n' | b'r'))
}

/// Check that `pattern` compiles with `flags`.
pub fn validate_pattern(pattern: &str, flags: RegexFlags) -> Result<(), PatternError> {
    RegexQuery::new(pattern, flags).map(|_| ())
}

/// A compiled pattern plus its scan mode.
#[derive(Debug, Clone)]
pub struct RegexQuery {
    pattern: String,
    flags: RegexFlags,
    regex: Regex,
    mode: ScanMode,
    group_names: Arc<[Option<Arc<str>>]>,
}

impl RegexQuery {
    /// Compile `pattern`.
    ///
    /// `^` and `$` always match at line boundaries (`\r\n` aware).
    pub fn new(pattern: &str, flags: RegexFlags) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(flags.case_insensitive)
            .multi_line(true)
            .crlf(true)
            .dot_matches_new_line(flags.multiline)
            .build()
            .map_err(|err| PatternError {
                pattern: pattern.to_string(),
                message: err.to_string(),
            })?;

        let mode = if flags.multiline || needs_multiline(pattern) {
            ScanMode::Multiline
        } else {
            ScanMode::SingleLine
        };
        let group_names = regex
            .capture_names()
            .map(|name| name.map(Arc::from))
            .collect();

        Ok(Self {
            pattern: pattern.to_string(),
            flags,
            regex,
            mode,
            group_names,
        })
    }

    /// Source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Compile flags.
    pub fn flags(&self) -> RegexFlags {
        self.flags
    }

    /// Selected scan mode.
    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    /// Number of explicit capture groups.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Find the first match at or after byte `start` of `haystack`.
    ///
    /// Offsets in the result are chars relative to `haystack`, shifted by `base`.
    fn find(&self, haystack: &str, index: &CharIndex, start: usize, base: usize) -> Option<RawMatch> {
        if start > haystack.len() {
            return None;
        }
        let to_doc = |byte: usize| base + index.byte_to_char(byte);

        if self.group_count() == 0 {
            let m = self.regex.find_at(haystack, start)?;
            return Some(RawMatch {
                range: TextRange::new(to_doc(m.start()), to_doc(m.end())),
                groups: Vec::new(),
            });
        }

        let caps = self.regex.captures_at(haystack, start)?;
        let whole = caps.get(0)?;
        let groups = (1..caps.len())
            .filter_map(|index| {
                let group = caps.get(index)?;
                Some(GroupMatch {
                    index,
                    name: self.group_names.get(index).cloned().flatten(),
                    range: TextRange::new(to_doc(group.start()), to_doc(group.end())),
                })
            })
            .collect();
        Some(RawMatch {
            range: TextRange::new(to_doc(whole.start()), to_doc(whole.end())),
            groups,
        })
    }
}

impl PartialEq for RegexQuery {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.flags == other.flags
    }
}

impl Eq for RegexQuery {}

struct RawMatch {
    range: TextRange,
    groups: Vec<GroupMatch>,
}

impl RawMatch {
    fn into_result(self) -> MatchResult {
        MatchResult {
            range: self.range,
            groups: self.groups,
        }
    }
}

/// Line-at-a-time scan state.
struct LineScan<'a> {
    snapshot: &'a TextSnapshot,
    to: usize,
    line: Line,
    /// Full line content; matches past `to` are rejected, not cut.
    text: String,
    index: CharIndex,
    match_pos: usize,
    last_to: Option<usize>,
}

impl<'a> LineScan<'a> {
    fn new(snapshot: &'a TextSnapshot, from: usize, to: usize) -> Result<Self, TextError> {
        let line = snapshot.line_at(from)?;
        let mut scan = Self {
            snapshot,
            to,
            line,
            text: String::new(),
            index: CharIndex::new(""),
            match_pos: from,
            last_to: None,
        };
        scan.load_line();
        Ok(scan)
    }

    fn line_start(&self) -> usize {
        self.line.from
    }

    fn line_len(&self) -> usize {
        self.index.char_count()
    }

    fn load_line(&mut self) {
        self.text = self
            .snapshot
            .rope()
            .slice(self.line.from..self.line.to)
            .to_string();
        self.index = CharIndex::new(&self.text);
    }

    fn next_line(&mut self) {
        match self.snapshot.line(self.line.number + 1) {
            Some(next) if next.from <= self.to => {
                self.line = next;
                self.load_line();
            }
            _ => {
                // Past the range: an empty line beyond `to` ends the scan.
                self.line = Line {
                    number: self.line.number + 1,
                    from: self.to + 1,
                    to: self.to + 1,
                };
                self.text.clear();
                self.index = CharIndex::new("");
            }
        }
    }

    fn next_match(&mut self, query: &RegexQuery) -> Option<MatchResult> {
        let mut offset = self.match_pos.saturating_sub(self.line_start());
        loop {
            let found = if self.match_pos <= self.to {
                self.index.char_to_byte(offset).and_then(|start| {
                    query.find(&self.text, &self.index, start, self.line_start())
                })
            } else {
                None
            };

            match found {
                Some(raw) if raw.range.to > self.to => {
                    self.match_pos = self.to + 1;
                    return None;
                }
                Some(raw) => {
                    let TextRange { from, to } = raw.range;
                    self.match_pos = to + usize::from(from == to);
                    if from == self.line_start() + self.line_len() {
                        self.next_line();
                    }
                    // Suppress empty matches that touch the previous match.
                    if from < to || self.last_to.is_none_or(|last| from > last) {
                        self.last_to = Some(to);
                        return Some(raw.into_result());
                    }
                    offset = self.match_pos.saturating_sub(self.line_start());
                }
                None if self.line_start() + self.line_len() < self.to => {
                    self.next_line();
                    offset = 0;
                }
                None => return None,
            }
        }
    }
}

/// Flattened-window scan state.
struct FlatScan<'a> {
    snapshot: &'a TextSnapshot,
    cache: &'a mut FlattenCache,
    to: usize,
    /// End of the readable context past `to`.
    limit: usize,
    window: FlattenedWindow,
    index: CharIndex,
    match_pos: usize,
}

impl<'a> FlatScan<'a> {
    fn new(
        snapshot: &'a TextSnapshot,
        cache: &'a mut FlattenCache,
        from: usize,
        to: usize,
    ) -> Result<Self, TextError> {
        snapshot.check_range(from, to)?;
        let limit = context_end(snapshot, to)?;
        let end = chunk_end(snapshot, from.saturating_add(MULTILINE_CHUNK), limit)?;
        let window = cache.window(snapshot, from.saturating_sub(LOOKBEHIND), end)?;
        let index = CharIndex::new(window.text());
        Ok(Self {
            snapshot,
            cache,
            to,
            limit,
            window,
            index,
            match_pos: from,
        })
    }

    fn find_from(&self, query: &RegexQuery, char_offset: usize) -> Option<RawMatch> {
        let start = self.index.char_to_byte(char_offset)?;
        query.find(self.window.text(), &self.index, start, self.window.from())
    }

    /// Double the window, stopping at line ends and never past `cap`.
    fn grow(&mut self, cap: usize) -> Result<(), TextError> {
        let from = self.window.from();
        let wanted = from.saturating_add(self.window.len_chars().saturating_mul(2));
        let end = chunk_end(self.snapshot, wanted, cap)?.max((self.window.to() + 1).min(cap));
        tracing::trace!(from, to = end, "growing multiline regex window");
        self.window = self.cache.window(self.snapshot, from, end)?;
        self.index = CharIndex::new(self.window.text());
        Ok(())
    }

    fn next_match(&mut self, query: &RegexQuery) -> Result<Option<MatchResult>, TextError> {
        loop {
            let offset = self.match_pos.saturating_sub(self.window.from());
            let mut found = self.find_from(query, offset);

            // Skip an empty match sitting right at the previous match end.
            if found
                .as_ref()
                .is_some_and(|m| m.range.is_empty() && m.range.from == self.match_pos)
            {
                found = self.find_from(query, offset + 1);
            }

            let doc_end = self.snapshot.len_chars();
            match found {
                // Close to the end of the window more text could extend the match, and its full
                // extent decides whether it crosses `to`: regrow and retry.
                Some(raw)
                    if self.window.to() < doc_end
                        && raw.range.from <= self.to
                        && raw.range.to + MULTILINE_DISCARD_MARGIN > self.window.to() =>
                {
                    self.grow(doc_end)?
                }
                Some(raw) if raw.range.to > self.to => {
                    self.match_pos = self.to + 1;
                    return Ok(None);
                }
                Some(raw) => {
                    let TextRange { from, to } = raw.range;
                    self.match_pos = to + usize::from(from == to);
                    return Ok(Some(raw.into_result()));
                }
                None if self.window.to() < self.limit => self.grow(self.limit)?,
                None => return Ok(None),
            }
        }
    }
}

/// End of the text a scan bounded at `to` may read: the rest of the line holding `to` plus one
/// char of its line break.
fn context_end(snapshot: &TextSnapshot, to: usize) -> Result<usize, TextError> {
    let line_end = snapshot.line_at(to)?.to;
    Ok((line_end.max(to) + 1).min(snapshot.len_chars()))
}

fn chunk_end(snapshot: &TextSnapshot, pos: usize, to: usize) -> Result<usize, TextError> {
    if pos >= to {
        return Ok(to);
    }
    Ok(snapshot.line_at(pos)?.to.min(to))
}

enum Scan<'a> {
    Line(LineScan<'a>),
    Flat(FlatScan<'a>),
}

/// Regex cursor over `from..to` of a snapshot.
pub struct RegexCursor<'a> {
    query: &'a RegexQuery,
    scan: Scan<'a>,
    current: MatchResult,
    done: bool,
    error: Option<TextError>,
}

impl<'a> RegexCursor<'a> {
    /// Create a cursor for `query` over `from..to`.
    ///
    /// Matches never end past `to`, but the pattern sees the text around the range, so `^`, `$`
    /// and `\b` behave as in an unbounded scan. A match straddling `to` ends the scan.
    ///
    /// `cache` backs multiline scans; single-line scans leave it untouched.
    pub fn new(
        query: &'a RegexQuery,
        snapshot: &'a TextSnapshot,
        cache: &'a mut FlattenCache,
        from: usize,
        to: usize,
    ) -> Result<Self, TextError> {
        snapshot.check_range(from, to)?;
        let scan = match query.mode() {
            ScanMode::SingleLine => Scan::Line(LineScan::new(snapshot, from, to)?),
            ScanMode::Multiline => Scan::Flat(FlatScan::new(snapshot, cache, from, to)?),
        };
        Ok(Self {
            query,
            scan,
            current: MatchResult::default(),
            done: false,
            error: None,
        })
    }

    /// The scan mode in use.
    pub fn mode(&self) -> ScanMode {
        match self.scan {
            Scan::Line(_) => ScanMode::SingleLine,
            Scan::Flat(_) => ScanMode::Multiline,
        }
    }

    /// The error that stopped the scan early, if any.
    pub fn error(&self) -> Option<&TextError> {
        self.error.as_ref()
    }
}

impl MatchCursor for RegexCursor<'_> {
    fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        let next = match &mut self.scan {
            Scan::Line(scan) => Ok(scan.next_match(self.query)),
            Scan::Flat(scan) => scan.next_match(self.query),
        };
        match next {
            Ok(Some(found)) => {
                self.current = found;
                true
            }
            Ok(None) => {
                self.done = true;
                false
            }
            Err(err) => {
                self.error = Some(err);
                self.done = true;
                false
            }
        }
    }

    fn current(&self) -> &MatchResult {
        &self.current
    }

    fn is_done(&self) -> bool {
        self.done
    }
}

impl Iterator for RegexCursor<'_> {
    type Item = MatchResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.advance().then(|| self.current.clone())
    }
}
