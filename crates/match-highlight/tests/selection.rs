use match_highlight::{
    HighlightView, SelectionOptions, SelectionState, TextRange, TextSnapshot, Viewport,
    highlight_selection,
};
use pretty_assertions::assert_eq;

fn fifty_lines() -> String {
    (0..50)
        .map(|i| {
            if i % 10 == 3 {
                format!("line {i:02} mentions the widget here")
            } else {
                format!("line {i:02} is plain filler")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn marks(
    text: &str,
    viewport: Option<Viewport>,
    selection: SelectionState,
    options: &SelectionOptions,
) -> Vec<(TextRange, String)> {
    let snapshot = TextSnapshot::new(text);
    let viewport = viewport.unwrap_or_else(|| Viewport::whole(&snapshot));
    let view = HighlightView::new(&snapshot, &viewport, &selection);
    highlight_selection(options, &view)
        .marks()
        .iter()
        .map(|d| (d.range, d.class.clone()))
        .collect()
}

fn widget_offsets(text: &str) -> Vec<usize> {
    text.match_indices("widget")
        .map(|(byte, _)| text[..byte].chars().count())
        .collect()
}

#[test]
fn test_two_char_selection_is_ignored() {
    let text = fifty_lines();
    let selection = SelectionState::single(TextRange::new(0, 2));
    assert!(marks(&text, None, selection, &SelectionOptions::default()).is_empty());
}

#[test]
fn test_selected_text_marks_every_occurrence() {
    let text = fifty_lines();
    let offsets = widget_offsets(&text);
    assert_eq!(offsets.len(), 5);

    let selected = TextRange::new(offsets[1], offsets[1] + "widget".len());
    let found = marks(
        &text,
        None,
        SelectionState::single(selected),
        &SelectionOptions::default(),
    );

    let expected: Vec<_> = offsets
        .iter()
        .map(|&from| {
            let range = TextRange::new(from, from + 6);
            let class = if range == selected {
                "current-string"
            } else {
                "matched-string"
            };
            (range, class.to_string())
        })
        .collect();
    assert_eq!(found, expected);
}

#[test]
fn test_word_around_cursor() {
    let text = fifty_lines();
    let offsets = widget_offsets(&text);
    let caret = SelectionState::cursor(offsets[0] + 3);
    let found = marks(&text, None, caret, &SelectionOptions::default());

    assert_eq!(found.len(), 5);
    assert_eq!(found[0].1, "current-word");
    assert!(found[1..].iter().all(|(_, class)| class == "matched-word"));
}

#[test]
fn test_word_mode_can_be_disabled() {
    let text = fifty_lines();
    let offsets = widget_offsets(&text);
    let options = SelectionOptions {
        highlight_word_around_cursor: false,
        ..SelectionOptions::default()
    };
    assert!(marks(&text, None, SelectionState::cursor(offsets[0]), &options).is_empty());
}

#[test]
fn test_match_ceiling_disables_highlighting() {
    let text = fifty_lines();
    // "plain" occurs on 45 lines.
    let caret = SelectionState::cursor(11);
    let options = SelectionOptions {
        max_matches: 10,
        ..SelectionOptions::default()
    };
    assert!(marks(&text, None, caret.clone(), &options).is_empty());
    assert_eq!(
        marks(&text, None, caret, &SelectionOptions::default()).len(),
        45
    );
}

#[test]
fn test_only_visible_occurrences_count() {
    let text = fifty_lines();
    let offsets = widget_offsets(&text);
    let snapshot = TextSnapshot::new(&text);
    let first_line = snapshot.line_at(offsets[0]).unwrap();
    let second_line = snapshot.line_at(offsets[1]).unwrap();
    let viewport = Viewport::new([first_line.range(), second_line.range()]);

    let caret = SelectionState::cursor(offsets[0]);
    let found = marks(&text, Some(viewport), caret, &SelectionOptions::default());
    assert_eq!(found.len(), 2);
}
