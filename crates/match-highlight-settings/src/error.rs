use match_highlight::{PatternError, RuleError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// A problem with one persisted rule.
pub enum RuleIssue {
    #[error("rule '{rule}' has an invalid pattern: {source}")]
    /// The regex does not compile.
    InvalidPattern {
        /// Rule name.
        rule: String,
        /// Compiler error.
        source: PatternError,
    },

    #[error("rule '{0}' has an empty query")]
    /// The query is empty.
    EmptyQuery(String),

    #[error("rule name '{0}' is used more than once")]
    /// Two rules share a name.
    DuplicateName(String),

    #[error("rule '{0}' decorates nothing")]
    /// `appliesTo` is empty.
    NoTargets(String),

    #[error("rule '{0}' sets multiline on a literal query")]
    /// `multiline` only applies to regex rules.
    MultilineLiteral(String),
}

impl RuleIssue {
    /// Name of the offending rule.
    pub fn rule(&self) -> &str {
        match self {
            Self::InvalidPattern { rule, .. } => rule,
            Self::EmptyQuery(rule)
            | Self::DuplicateName(rule)
            | Self::NoTargets(rule)
            | Self::MultilineLiteral(rule) => rule,
        }
    }
}

#[derive(Debug, Error)]
/// Errors produced while loading or converting settings.
pub enum SettingsError {
    #[error("settings JSON error: {0}")]
    /// Malformed JSON or wrong shape.
    Json(#[from] serde_json::Error),

    #[error("{} invalid rule(s)", .0.len())]
    /// Validation found problems.
    Invalid(Vec<RuleIssue>),

    #[error("rule set rejected: {0}")]
    /// The engine refused the rule set.
    Rules(#[from] RuleError),
}
