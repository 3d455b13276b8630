//! Rule classifier: scans the visible ranges with every enabled rule and turns matches into
//! decorations.
//!
//! A rule that fails to scan, or that exceeds the match ceiling, contributes nothing; the other
//! rules are unaffected.

use crate::cursor::{MatchCursor, MatchResult};
use crate::decoration::{Decoration, DecorationSet, DecorationSetBuilder, WidgetSide};
use crate::flatten::FlattenCache;
use crate::literal::LiteralCursor;
use crate::regex_cursor::RegexCursor;
use crate::rules::{CompiledMatcher, CompiledRule, HighlightRule, MarkTarget, RuleSet};
use crate::text_view::{TextError, TextSnapshot};
use crate::view::{HighlightView, StructureLookup};
use std::collections::BTreeMap;

/// Filters and limits applied by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassifyOptions {
    /// Structural categories whose lines are never decorated (e.g. fenced code, front matter).
    pub excluded_categories: Vec<String>,
    /// Per-rule ceiling on matches in one pass; a rule that exceeds it is dropped entirely.
    pub max_matches: Option<usize>,
}

enum RuleScan {
    Matches(Vec<MatchResult>),
    TooMany,
}

struct ExclusionFilter<'a> {
    snapshot: &'a TextSnapshot,
    structure: &'a dyn StructureLookup,
    excluded: &'a [String],
    last_line: Option<(usize, bool)>,
}

impl<'a> ExclusionFilter<'a> {
    fn new(view: &HighlightView<'a>, excluded: &'a [String]) -> Self {
        Self {
            snapshot: view.snapshot,
            structure: view.structure,
            excluded,
            last_line: None,
        }
    }

    fn is_excluded(&mut self, pos: usize) -> bool {
        if self.excluded.is_empty() {
            return false;
        }
        let Ok(line) = self.snapshot.line_at(pos) else {
            return false;
        };
        if let Some((number, excluded)) = self.last_line {
            if number == line.number {
                return excluded;
            }
        }
        let excluded = self.structure.category_at(line.from).is_some_and(|categories| {
            categories
                .split_whitespace()
                .any(|category| self.excluded.iter().any(|e| e == category))
        });
        self.last_line = Some((line.number, excluded));
        excluded
    }
}

fn drain(
    cursor: &mut impl MatchCursor,
    out: &mut Vec<MatchResult>,
    filter: &mut ExclusionFilter<'_>,
    limit: Option<usize>,
) -> bool {
    while cursor.advance() {
        let found = cursor.current();
        if filter.is_excluded(found.from()) {
            continue;
        }
        out.push(found.clone());
        if limit.is_some_and(|max| out.len() > max) {
            return false;
        }
    }
    true
}

fn scan_rule(
    compiled: &CompiledRule,
    view: &HighlightView<'_>,
    cache: &mut FlattenCache,
    filter: &mut ExclusionFilter<'_>,
    limit: Option<usize>,
) -> Result<RuleScan, TextError> {
    let snapshot = view.snapshot;
    let mut matches = Vec::new();

    for part in view.viewport.ranges() {
        let part = snapshot.clamp_range(*part);
        let within_limit = match &compiled.matcher {
            CompiledMatcher::Literal { query, case_fold } => {
                let mut cursor = LiteralCursor::new(snapshot, query, part.from, part.to, *case_fold)?;
                drain(&mut cursor, &mut matches, filter, limit)
            }
            CompiledMatcher::Regex(query) => {
                let mut cursor = RegexCursor::new(query, snapshot, cache, part.from, part.to)?;
                let within_limit = drain(&mut cursor, &mut matches, filter, limit);
                if let Some(err) = cursor.error() {
                    return Err(err.clone());
                }
                within_limit
            }
        };
        if !within_limit {
            return Ok(RuleScan::TooMany);
        }
    }
    Ok(RuleScan::Matches(matches))
}

fn decorate(
    rule: &HighlightRule,
    matches: &[MatchResult],
    snapshot: &TextSnapshot,
    builder: &mut DecorationSetBuilder,
    line_classes: &mut BTreeMap<usize, Vec<String>>,
) {
    let deco = &rule.decoration;
    let class = deco.class.as_str();

    for found in matches {
        if deco.applies(MarkTarget::Match) && !found.range.is_empty() {
            let contents = snapshot
                .slice(found.from(), found.to())
                .map(|text| text.trim().to_string())
                .unwrap_or_default();
            builder.push(
                Decoration::mark(found.range, class)
                    .with_color(deco.color.clone())
                    .with_contents(contents),
            );
        }

        if deco.applies(MarkTarget::Line) {
            if let Ok(line) = snapshot.line_at(found.from()) {
                let classes = line_classes.entry(line.from).or_default();
                if !classes.iter().any(|c| c == class) {
                    classes.push(class.to_string());
                }
            }
        }

        if deco.applies(MarkTarget::Group) {
            for group in found.groups.iter().filter(|g| !g.range.is_empty()) {
                let group_class = format!("{class} {class}-group-{}", group.label());
                let contents = snapshot
                    .slice(group.range.from, group.range.to)
                    .unwrap_or_default();
                builder.push(
                    Decoration::group(group.range, group.index, group_class)
                        .with_color(deco.color.clone())
                        .with_contents(contents),
                );
            }
        }

        if deco.applies(MarkTarget::Start) {
            builder.push(
                Decoration::widget(found.from(), WidgetSide::Start, class)
                    .with_color(deco.color.clone()),
            );
        }

        if deco.applies(MarkTarget::End) {
            builder.push(
                Decoration::widget(found.to(), WidgetSide::End, class)
                    .with_color(deco.color.clone()),
            );
        }
    }
}

/// Scan the visible ranges with every enabled rule of `rule_sets` (in order) and build the
/// resulting decoration set.
pub fn classify<'r>(
    rule_sets: impl IntoIterator<Item = &'r RuleSet>,
    options: &ClassifyOptions,
    view: &HighlightView<'_>,
    cache: &mut FlattenCache,
) -> DecorationSet {
    let mut builder = DecorationSetBuilder::new();
    let mut line_classes: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    let mut filter = ExclusionFilter::new(view, &options.excluded_categories);

    for compiled in rule_sets.into_iter().flat_map(RuleSet::compiled) {
        let rule = &compiled.rule;
        match scan_rule(compiled, view, cache, &mut filter, options.max_matches) {
            Ok(RuleScan::Matches(matches)) => {
                tracing::trace!(rule = %rule.name, matches = matches.len(), "rule scanned");
                decorate(rule, &matches, view.snapshot, &mut builder, &mut line_classes);
            }
            Ok(RuleScan::TooMany) => {
                tracing::debug!(
                    rule = %rule.name,
                    max_matches = options.max_matches,
                    "match ceiling exceeded, rule dropped"
                );
            }
            Err(err) => {
                tracing::warn!(rule = %rule.name, error = %err, "skipping highlight rule");
            }
        }
    }

    builder.extend(
        line_classes
            .into_iter()
            .map(|(line_start, classes)| Decoration::line(line_start, classes.join(" "))),
    );
    builder.build()
}
