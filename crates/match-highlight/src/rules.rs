//! Highlight rules: what to match and which decorations each match produces.

use crate::regex_cursor::{PatternError, RegexFlags, RegexQuery};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

/// Parts of a match that a rule decorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MarkTarget {
    /// The whole match (inline mark).
    Match,
    /// The line containing the match start (line class).
    Line,
    /// Each captured group (group marks).
    Group,
    /// A widget at the match start.
    Start,
    /// A widget at the match end.
    End,
}

impl MarkTarget {
    /// All targets.
    pub const ALL: [MarkTarget; 5] = [Self::Match, Self::Line, Self::Group, Self::Start, Self::End];

    /// Lowercase name used in persisted settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Line => "line",
            Self::Group => "group",
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

/// How a rule's matches are turned into decorations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationRule {
    /// Class attached to every decoration of the rule.
    pub class: String,
    /// Optional color (host-interpreted).
    pub color: Option<String>,
    /// Which parts of a match are decorated.
    pub applies_to: BTreeSet<MarkTarget>,
}

impl DecorationRule {
    /// A rule that marks whole matches with `class`.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            color: None,
            applies_to: BTreeSet::from([MarkTarget::Match]),
        }
    }

    /// Set the color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Replace the decorated targets.
    pub fn with_targets(mut self, targets: impl IntoIterator<Item = MarkTarget>) -> Self {
        self.applies_to = targets.into_iter().collect();
        self
    }

    /// Returns `true` if the rule decorates `target`.
    pub fn applies(&self, target: MarkTarget) -> bool {
        self.applies_to.contains(&target)
    }
}

/// What a rule matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSpec {
    /// Plain substring.
    Literal {
        /// Substring to find.
        query: String,
        /// Fold case on both sides before comparing.
        case_insensitive: bool,
    },
    /// Regular expression.
    Regex {
        /// Pattern source.
        pattern: String,
        /// Case-insensitive matching.
        case_insensitive: bool,
        /// Force multiline scanning; `.` matches line breaks.
        multiline: bool,
    },
}

impl MatchSpec {
    /// Case-sensitive literal.
    pub fn literal(query: impl Into<String>) -> Self {
        Self::Literal {
            query: query.into(),
            case_insensitive: false,
        }
    }

    /// Single-line, case-sensitive regex.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex {
            pattern: pattern.into(),
            case_insensitive: false,
            multiline: false,
        }
    }

    /// Toggle case-insensitive matching.
    pub fn case_insensitive(mut self, value: bool) -> Self {
        match &mut self {
            Self::Literal {
                case_insensitive, ..
            }
            | Self::Regex {
                case_insensitive, ..
            } => *case_insensitive = value,
        }
        self
    }

    /// Check that the spec can be scanned. Literals always validate.
    pub fn validate(&self) -> Result<(), PatternError> {
        self.compile().map(|_| ())
    }

    fn compile(&self) -> Result<CompiledMatcher, PatternError> {
        Ok(match self {
            Self::Literal {
                query,
                case_insensitive,
            } => CompiledMatcher::Literal {
                query: query.clone(),
                case_fold: *case_insensitive,
            },
            Self::Regex {
                pattern,
                case_insensitive,
                multiline,
            } => CompiledMatcher::Regex(RegexQuery::new(
                pattern,
                RegexFlags {
                    case_insensitive: *case_insensitive,
                    multiline: *multiline,
                },
            )?),
        })
    }
}

/// A named highlight rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRule {
    /// Unique rule name.
    pub name: String,
    /// What to match.
    pub spec: MatchSpec,
    /// How matches are decorated.
    pub decoration: DecorationRule,
    /// Disabled rules are kept in the set but never scanned.
    pub enabled: bool,
}

impl HighlightRule {
    /// An enabled rule.
    pub fn new(name: impl Into<String>, spec: MatchSpec, decoration: DecorationRule) -> Self {
        Self {
            name: name.into(),
            spec,
            decoration,
            enabled: true,
        }
    }

    /// Enable or disable the rule.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Rule validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The rule's pattern does not compile.
    #[error("rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        /// Offending rule.
        rule: String,
        /// Compiler error.
        #[source]
        source: PatternError,
    },
    /// Two rules share a name.
    #[error("duplicate rule name '{0}'")]
    DuplicateName(String),
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledMatcher {
    Literal { query: String, case_fold: bool },
    Regex(RegexQuery),
}

#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    pub(crate) rule: HighlightRule,
    pub(crate) matcher: CompiledMatcher,
}

/// An ordered, validated list of rules.
///
/// Order matters: rules are evaluated (and their decorations inserted) in list order. Equality is
/// structural over the rule definitions and their order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    /// A set with no rules.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate and compile `rules`.
    pub fn compile(rules: impl IntoIterator<Item = HighlightRule>) -> Result<Self, RuleError> {
        let mut names = HashSet::new();
        let mut compiled = Vec::new();
        for rule in rules {
            if !names.insert(rule.name.clone()) {
                return Err(RuleError::DuplicateName(rule.name));
            }
            let matcher = rule
                .spec
                .compile()
                .map_err(|source| RuleError::InvalidPattern {
                    rule: rule.name.clone(),
                    source,
                })?;
            compiled.push(CompiledRule { rule, matcher });
        }
        Ok(Self { rules: compiled })
    }

    /// Number of rules (enabled or not).
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the set has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule definitions, in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &HighlightRule> {
        self.rules.iter().map(|compiled| &compiled.rule)
    }

    /// Look up a rule by name.
    pub fn get(&self, name: &str) -> Option<&HighlightRule> {
        self.rules().find(|rule| rule.name == name)
    }

    pub(crate) fn compiled(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter().filter(|compiled| compiled.rule.enabled)
    }
}

impl PartialEq for RuleSet {
    fn eq(&self, other: &Self) -> bool {
        self.rules.len() == other.rules.len() && self.rules().eq(other.rules())
    }
}

impl Eq for RuleSet {}
