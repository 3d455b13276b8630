use crate::error::{RuleIssue, SettingsError};
use crate::model::{HighlightSettings, Mark, RuleSettings};
use match_highlight::{
    DecorationRule, HighlightConfig, HighlightRule, MarkTarget, MatchSpec, RegexFlags, RuleSet,
    SelectionOptions, parse_stop_words, validate_pattern,
};
use std::collections::HashSet;
use std::time::Duration;

/// Class used when a rule name has no usable characters.
pub const FALLBACK_CLASS: &str = "highlight";

/// Derive a class name from a rule name: lowercase ASCII alphanumerics, runs of anything else
/// collapsed to `-`.
pub fn class_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        FALLBACK_CLASS.to_string()
    } else {
        slug
    }
}

impl RuleSettings {
    /// Effective decoration class.
    pub fn effective_class(&self) -> String {
        match self.class.as_deref().map(str::trim) {
            Some(class) if !class.is_empty() => class.to_string(),
            _ => class_slug(&self.name),
        }
    }

    /// The engine's match spec for this rule.
    pub fn match_spec(&self) -> MatchSpec {
        if self.is_regex {
            MatchSpec::Regex {
                pattern: self.query.clone(),
                case_insensitive: self.case_insensitive,
                multiline: self.multiline,
            }
        } else {
            MatchSpec::Literal {
                query: self.query.clone(),
                case_insensitive: self.case_insensitive,
            }
        }
    }

    /// Convert into an engine rule (unvalidated).
    pub fn to_rule(&self) -> HighlightRule {
        let mut decoration = DecorationRule::new(self.effective_class())
            .with_targets(self.applies_to.iter().copied().map(MarkTarget::from));
        decoration.color = self.color.clone();
        HighlightRule::new(self.name.clone(), self.match_spec(), decoration).enabled(self.enabled)
    }

    fn from_rule(rule: &HighlightRule) -> Self {
        let (query, is_regex, case_insensitive, multiline) = match &rule.spec {
            MatchSpec::Literal {
                query,
                case_insensitive,
            } => (query.clone(), false, *case_insensitive, false),
            MatchSpec::Regex {
                pattern,
                case_insensitive,
                multiline,
            } => (pattern.clone(), true, *case_insensitive, *multiline),
        };
        Self {
            name: rule.name.clone(),
            query,
            is_regex,
            case_insensitive,
            multiline,
            class: Some(rule.decoration.class.clone()),
            color: rule.decoration.color.clone(),
            applies_to: rule.decoration.applies_to.iter().copied().map(Mark::from).collect(),
            enabled: rule.enabled,
        }
    }
}

impl HighlightSettings {
    /// Parse a settings document.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every rule; returns all problems found, in rule order.
    pub fn validate(&self) -> Vec<RuleIssue> {
        let mut issues = Vec::new();
        let mut names = HashSet::new();
        for rule in &self.rules {
            if !names.insert(rule.name.as_str()) {
                issues.push(RuleIssue::DuplicateName(rule.name.clone()));
            }
            if rule.query.is_empty() {
                issues.push(RuleIssue::EmptyQuery(rule.name.clone()));
            } else if rule.is_regex {
                let flags = RegexFlags {
                    case_insensitive: rule.case_insensitive,
                    multiline: rule.multiline,
                };
                if let Err(source) = validate_pattern(&rule.query, flags) {
                    issues.push(RuleIssue::InvalidPattern {
                        rule: rule.name.clone(),
                        source,
                    });
                }
            }
            if rule.multiline && !rule.is_regex {
                issues.push(RuleIssue::MultilineLiteral(rule.name.clone()));
            }
            if rule.applies_to.is_empty() {
                issues.push(RuleIssue::NoTargets(rule.name.clone()));
            }
        }
        issues
    }

    /// Selection options described by the global parameters.
    pub fn selection_options(&self) -> SelectionOptions {
        SelectionOptions {
            highlight_word_around_cursor: self.highlight_word_around_cursor,
            highlight_selected_text: self.highlight_selected_text,
            min_selection_length: self.min_match_length,
            max_matches: self.max_matches,
            stop_words: parse_stop_words(&self.stop_words),
            highlight_delay: Duration::from_millis(
                self.selection_delay.unwrap_or(self.highlight_delay),
            ),
        }
    }

    /// Validate and convert into an engine configuration.
    ///
    /// `highlightDelay` drives the rule debouncer, and the selection debouncer too unless
    /// `selectionDelay` is set.
    pub fn into_config(self) -> Result<HighlightConfig, SettingsError> {
        let issues = self.validate();
        if !issues.is_empty() {
            for issue in &issues {
                tracing::warn!(rule = issue.rule(), %issue, "invalid highlight rule");
            }
            return Err(SettingsError::Invalid(issues));
        }

        let selection = self.selection_options();
        let rules = RuleSet::compile(self.rules.iter().map(RuleSettings::to_rule))?;
        Ok(HighlightConfig::new(rules)
            .with_selection(selection)
            .with_delay(Duration::from_millis(self.highlight_delay))
            .with_excluded_categories(self.excluded_categories)
            .with_rule_match_limit(self.rule_match_limit))
    }

    /// Settings describing `config` (search targets are not persisted).
    pub fn from_config(config: &HighlightConfig) -> Self {
        let selection = &config.selection;
        let highlight_delay = config.highlight_delay.as_millis() as u64;
        let selection_delay = selection.highlight_delay.as_millis() as u64;
        Self {
            rules: config.rules.rules().map(RuleSettings::from_rule).collect(),
            highlight_delay,
            selection_delay: (selection_delay != highlight_delay).then_some(selection_delay),
            min_match_length: selection.min_selection_length,
            max_matches: selection.max_matches,
            stop_words: selection.stop_words.join(", "),
            highlight_word_around_cursor: selection.highlight_word_around_cursor,
            highlight_selected_text: selection.highlight_selected_text,
            excluded_categories: config.excluded_categories.clone(),
            rule_match_limit: config.rule_match_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_slug() {
        assert_eq!(class_slug("My TODO items!"), "my-todo-items");
        assert_eq!(class_slug("  --a__b--  "), "a-b");
        assert_eq!(class_slug("日本"), FALLBACK_CLASS);
    }

    #[test]
    fn test_explicit_class_wins() {
        let mut rule = RuleSettings::literal("Some Rule", "x");
        assert_eq!(rule.effective_class(), "some-rule");
        rule.class = Some("  custom ".to_string());
        assert_eq!(rule.effective_class(), "custom");
    }
}
