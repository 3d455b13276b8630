use match_highlight::{MarkTarget, MatchSpec, SelectionOptions};
use match_highlight_settings::{HighlightSettings, Mark, RuleIssue, RuleSettings, SettingsError};
use pretty_assertions::assert_eq;
use std::time::Duration;

const SAVED: &str = r##"{
  "rules": [
    {
      "name": "Open tasks",
      "query": "TODO\\((\\w+)\\)",
      "isRegex": true,
      "color": "#ffcc00",
      "appliesTo": ["match", "group", "line"]
    },
    {
      "name": "people",
      "query": "alice",
      "caseInsensitive": true,
      "class": "person",
      "color": null,
      "enabled": false
    }
  ],
  "highlightDelay": 150,
  "maxMatches": 40,
  "stopWords": "Foo, bar",
  "excludedCategories": ["hmd-codeblock"]
}"##;

#[test]
fn test_missing_fields_take_defaults() {
    let settings = HighlightSettings::from_json(SAVED).unwrap();
    assert_eq!(settings.rules.len(), 2);
    assert_eq!(settings.min_match_length, 3);
    assert!(settings.highlight_word_around_cursor);
    assert_eq!(settings.rules[0].applies_to, vec![Mark::Match, Mark::Group, Mark::Line]);
    assert_eq!(settings.rules[1].applies_to, vec![Mark::Match]);
    assert!(!settings.rules[1].enabled);
    assert!(settings.rules[0].enabled);

    let empty = HighlightSettings::from_json("{}").unwrap();
    assert_eq!(empty, HighlightSettings::default());
}

#[test]
fn test_into_config() {
    let config = HighlightSettings::from_json(SAVED)
        .unwrap()
        .into_config()
        .unwrap();

    assert_eq!(config.rules.len(), 2);
    let tasks = config.rules.get("Open tasks").unwrap();
    assert_eq!(tasks.decoration.class, "open-tasks");
    assert!(tasks.decoration.applies(MarkTarget::Group));
    assert!(matches!(tasks.spec, MatchSpec::Regex { .. }));

    let people = config.rules.get("people").unwrap();
    assert_eq!(people.decoration.class, "person");
    assert!(!people.enabled);
    assert_eq!(
        people.spec,
        MatchSpec::Literal {
            query: "alice".to_string(),
            case_insensitive: true
        }
    );

    assert_eq!(config.highlight_delay, Duration::from_millis(150));
    assert_eq!(config.selection.highlight_delay, Duration::from_millis(150));
    assert_eq!(config.selection.max_matches, 40);
    assert_eq!(config.selection.stop_words, vec!["foo", "bar"]);
    assert_eq!(config.excluded_categories, vec!["hmd-codeblock"]);
}

#[test]
fn test_validate_reports_every_issue() {
    let settings = HighlightSettings {
        rules: vec![
            RuleSettings::regex("broken", "(unclosed"),
            RuleSettings::literal("empty", ""),
            RuleSettings::literal("dup", "a"),
            RuleSettings {
                applies_to: Vec::new(),
                ..RuleSettings::literal("dup", "b")
            },
        ],
        ..HighlightSettings::default()
    };

    let issues = settings.validate();
    let rules: Vec<_> = issues.iter().map(RuleIssue::rule).collect();
    assert_eq!(rules, vec!["broken", "empty", "dup", "dup"]);
    assert!(matches!(issues[0], RuleIssue::InvalidPattern { .. }));
    assert_eq!(issues[2], RuleIssue::DuplicateName("dup".to_string()));
    assert_eq!(issues[3], RuleIssue::NoTargets("dup".to_string()));

    let err = settings.into_config().unwrap_err();
    assert!(matches!(err, SettingsError::Invalid(ref found) if found.len() == 4));
}

#[test]
fn test_malformed_json_is_an_error() {
    let err = HighlightSettings::from_json(r#"{"rules": [{"name": 3}]}"#).unwrap_err();
    assert!(matches!(err, SettingsError::Json(_)));
}

#[test]
fn test_config_round_trip_preserves_rules() {
    let config = HighlightSettings::from_json(SAVED)
        .unwrap()
        .into_config()
        .unwrap();
    let json = HighlightSettings::from_config(&config).to_json().unwrap();
    let reloaded = HighlightSettings::from_json(&json)
        .unwrap()
        .into_config()
        .unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_defaults_match_engine_defaults() {
    let config = HighlightSettings::default().into_config().unwrap();
    assert_eq!(config.selection, SelectionOptions::default());
    assert!(config.rules.is_empty());
}

#[test]
fn test_separate_selection_delay_round_trips() {
    let config = HighlightSettings::from_json(SAVED)
        .unwrap()
        .into_config()
        .unwrap();
    let selection = SelectionOptions {
        highlight_delay: Duration::from_millis(20),
        ..config.selection.clone()
    };
    let config = config.with_selection(selection);

    let settings = HighlightSettings::from_config(&config);
    assert_eq!(settings.highlight_delay, 150);
    assert_eq!(settings.selection_delay, Some(20));

    let reloaded = HighlightSettings::from_json(&settings.to_json().unwrap())
        .unwrap()
        .into_config()
        .unwrap();
    assert_eq!(reloaded.highlight_delay, Duration::from_millis(150));
    assert_eq!(reloaded.selection.highlight_delay, Duration::from_millis(20));
    assert_eq!(reloaded, config);

    // Equal delays are stored once.
    let saved = HighlightSettings::from_json(SAVED)
        .unwrap()
        .into_config()
        .unwrap();
    let same = HighlightSettings::from_config(&saved);
    assert_eq!(same.selection_delay, None);
    assert!(!same.to_json().unwrap().contains("selectionDelay"));
}

#[test]
fn test_multiline_flag_on_literal_is_reported() {
    let settings = HighlightSettings {
        rules: vec![
            RuleSettings {
                multiline: true,
                ..RuleSettings::literal("plain", "a b")
            },
            RuleSettings {
                multiline: true,
                ..RuleSettings::regex("spanning", "a.b")
            },
        ],
        ..HighlightSettings::default()
    };
    assert_eq!(
        settings.validate(),
        vec![RuleIssue::MultilineLiteral("plain".to_string())]
    );
    assert!(matches!(
        settings.into_config(),
        Err(SettingsError::Invalid(ref issues)) if issues.len() == 1
    ));
}
