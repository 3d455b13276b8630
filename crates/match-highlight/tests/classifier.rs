use match_highlight::{
    ClassifyOptions, DecorationKind, DecorationRule, DecorationSet, FlattenCache, HighlightRule,
    HighlightView, MarkTarget, MatchSpec, RuleSet, SelectionState, StructureLookup, TextRange,
    TextSnapshot, Viewport, WidgetSide, classify,
};
use pretty_assertions::assert_eq;

fn classify_all(text: &str, rules: &RuleSet, options: &ClassifyOptions) -> DecorationSet {
    let snapshot = TextSnapshot::new(text);
    let viewport = Viewport::whole(&snapshot);
    let selection = SelectionState::default();
    let view = HighlightView::new(&snapshot, &viewport, &selection);
    classify([rules], options, &view, &mut FlattenCache::new())
}

fn task_rules() -> RuleSet {
    RuleSet::compile([
        HighlightRule::new(
            "task",
            MatchSpec::regex(r"(?P<marker>TODO|FIXME):\s*(\w+)"),
            DecorationRule::new("task")
                .with_color("#ffaa00")
                .with_targets(MarkTarget::ALL),
        ),
        HighlightRule::new(
            "name",
            MatchSpec::literal("alice").case_insensitive(true),
            DecorationRule::new("person").with_targets([MarkTarget::Match, MarkTarget::Line]),
        ),
    ])
    .unwrap()
}

const NOTES: &str = "TODO: call Alice\nnothing here\nFIXME:  ship it\nalice again";

#[test]
fn test_every_target_is_decorated() {
    let set = classify_all(NOTES, &task_rules(), &ClassifyOptions::default());

    let marks: Vec<_> = set
        .marks()
        .iter()
        .map(|d| (d.range.from, d.range.to, d.class.as_str(), d.contents.as_deref()))
        .collect();
    assert_eq!(
        marks,
        vec![
            (0, 10, "task", Some("TODO: call")),
            (11, 16, "person", Some("Alice")),
            (30, 42, "task", Some("FIXME:  ship")),
            (46, 51, "person", Some("alice")),
        ]
    );
    assert_eq!(set.marks()[0].color.as_deref(), Some("#ffaa00"));

    let lines: Vec<_> = set
        .lines()
        .iter()
        .map(|d| (d.range.from, d.class.as_str()))
        .collect();
    assert_eq!(lines, vec![(0, "task person"), (30, "task"), (46, "person")]);

    let groups: Vec<_> = set
        .groups()
        .iter()
        .map(|d| (d.range.from, d.range.to, d.kind, d.class.as_str()))
        .collect();
    assert_eq!(
        groups,
        vec![
            (0, 4, DecorationKind::GroupMark { group: 1 }, "task task-group-marker"),
            (6, 10, DecorationKind::GroupMark { group: 2 }, "task task-group-2"),
            (30, 35, DecorationKind::GroupMark { group: 1 }, "task task-group-marker"),
            (38, 42, DecorationKind::GroupMark { group: 2 }, "task task-group-2"),
        ]
    );

    let widgets: Vec<_> = set
        .widgets()
        .iter()
        .map(|d| (d.range.from, d.kind))
        .collect();
    assert_eq!(
        widgets,
        vec![
            (0, DecorationKind::Widget(WidgetSide::Start)),
            (10, DecorationKind::Widget(WidgetSide::End)),
            (30, DecorationKind::Widget(WidgetSide::Start)),
            (42, DecorationKind::Widget(WidgetSide::End)),
        ]
    );
}

#[test]
fn test_classification_is_idempotent() {
    let rules = task_rules();
    let snapshot = TextSnapshot::new(NOTES);
    let viewport = Viewport::whole(&snapshot);
    let selection = SelectionState::default();
    let view = HighlightView::new(&snapshot, &viewport, &selection);
    let mut cache = FlattenCache::new();

    let first = classify([&rules], &ClassifyOptions::default(), &view, &mut cache);
    let second = classify([&rules], &ClassifyOptions::default(), &view, &mut cache);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_match_ceiling_drops_rule_entirely() {
    let text = "x".repeat(10_000);
    let every_char = HighlightRule::new("any", MatchSpec::regex("."), DecorationRule::new("any"));
    let rules = RuleSet::compile([every_char]).unwrap();
    let options = ClassifyOptions {
        max_matches: Some(100),
        ..ClassifyOptions::default()
    };

    let set = classify_all(&text, &rules, &options);
    assert!(set.is_empty());
}

#[test]
fn test_match_ceiling_keeps_other_rules() {
    let text = format!("{} needle", "x".repeat(500));
    let rules = RuleSet::compile([
        HighlightRule::new("any", MatchSpec::literal("x"), DecorationRule::new("any")),
        HighlightRule::new("needle", MatchSpec::literal("needle"), DecorationRule::new("needle")),
    ])
    .unwrap();
    let options = ClassifyOptions {
        max_matches: Some(100),
        ..ClassifyOptions::default()
    };

    let set = classify_all(&text, &rules, &options);
    assert_eq!(set.len(), 1);
    assert_eq!(set.marks()[0].class, "needle");
}

#[test]
fn test_only_visible_ranges_are_scanned() {
    let text = "key\n".repeat(100);
    let rules = RuleSet::compile([HighlightRule::new(
        "key",
        MatchSpec::literal("key"),
        DecorationRule::new("k"),
    )])
    .unwrap();
    let snapshot = TextSnapshot::new(&text);
    let viewport = Viewport::new([TextRange::new(40, 60), TextRange::new(200, 208)]);
    let selection = SelectionState::default();
    let view = HighlightView::new(&snapshot, &viewport, &selection);

    let set = classify([&rules], &ClassifyOptions::default(), &view, &mut FlattenCache::new());
    let starts: Vec<_> = set.marks().iter().map(|d| d.range.from).collect();
    assert_eq!(starts, vec![40, 44, 48, 52, 56, 200, 204]);
}

struct FencedCode {
    fence: TextRange,
}

impl StructureLookup for FencedCode {
    fn category_at(&self, pos: usize) -> Option<&str> {
        self.fence.contains(pos).then_some("hmd-codeblock line-start")
    }
}

#[test]
fn test_excluded_categories_drop_matches() {
    let text = "TODO: outside\n```\nTODO: inside\n```\nTODO: after";
    let rules = task_rules();
    let snapshot = TextSnapshot::new(text);
    let viewport = Viewport::whole(&snapshot);
    let selection = SelectionState::default();
    let structure = FencedCode {
        fence: TextRange::new(14, 34),
    };
    let view = HighlightView::new(&snapshot, &viewport, &selection).with_structure(&structure);
    let options = ClassifyOptions {
        excluded_categories: vec!["hmd-codeblock".to_string()],
        ..ClassifyOptions::default()
    };

    let set = classify([&rules], &options, &view, &mut FlattenCache::new());
    let starts: Vec<_> = set.marks().iter().map(|d| d.range.from).collect();
    assert_eq!(starts, vec![0, 35]);
}

#[test]
fn test_disabled_rule_produces_nothing() {
    let rules = RuleSet::compile([HighlightRule::new(
        "off",
        MatchSpec::literal("a"),
        DecorationRule::new("off"),
    )
    .enabled(false)])
    .unwrap();
    assert!(classify_all("aaa", &rules, &ClassifyOptions::default()).is_empty());
}
