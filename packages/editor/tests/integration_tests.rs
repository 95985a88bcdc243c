//! Integration tests for the editing engine

use storykeep_editor::{
    Coordinate, Document, DocumentStore, EditorConfig, Engine, ManualClock, MemoryStore, Outcome,
    Placement, SkipReason, TagStyles, Tuple, TupleValue,
};
use std::collections::BTreeMap;

fn engine() -> Engine<ManualClock> {
    Engine::with_clock(EditorConfig::default(), ManualClock::new(1_000_000))
}

fn styled(source: &str, styles: &[(&str, &[Option<&str>])]) -> Document {
    let mut doc = Document::from_markdown(source).unwrap();
    for (tag, values) in styles {
        let array = values
            .iter()
            .map(|v| v.map(|v| Tuple::text(&[v])))
            .collect::<Vec<_>>();
        doc.payload.class_names_payload.0.insert(
            tag.to_string(),
            TagStyles {
                count: array.len(),
                overrides: BTreeMap::from([("mt".to_string(), array)]),
                ..TagStyles::default()
            },
        );
    }
    assert!(doc.check_invariants().is_empty(), "fixture for {:?}", source);
    doc
}

fn slots(doc: &Document, tag: &str) -> Vec<Option<String>> {
    doc.payload
        .class_names_payload
        .get(tag)
        .map(|styles| {
            styles.overrides["mt"]
                .iter()
                .map(|slot| match slot.as_ref().and_then(|t| t.0.first().cloned().flatten()) {
                    Some(TupleValue::Text(text)) => Some(text),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

fn some(values: &[&str]) -> Vec<Option<String>> {
    values.iter().map(|v| Some(v.to_string())).collect()
}

#[test]
fn test_moved_block_keeps_neighbour_overrides() {
    let mut store = MemoryStore::new();
    store.insert(
        "f",
        styled(
            "P0\n\nP1\n\n## H2",
            &[("p", &[Some("p0"), Some("p1")]), ("h2", &[Some("h2")])],
        ),
    );

    let outcome = engine()
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 1),
            &Coordinate::block("f", "pane", 2),
            Placement::After,
        )
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);

    let doc = store.current("f").unwrap();
    assert_eq!(doc.source, "P0\n\n## H2\n\nP1");
    // H2 is still the first h2 and keeps its value; P1 keeps its own
    assert_eq!(slots(doc, "h2"), some(&["h2"]));
    assert_eq!(slots(doc, "p"), some(&["p0", "p1"]));
    assert!(doc.check_invariants().is_empty());
}

#[test]
fn test_overrides_travel_past_same_tag() {
    let mut store = MemoryStore::new();
    store.insert(
        "f",
        styled("## A\n\ntext\n\n## B", &[("h2", &[Some("a"), Some("b")])]),
    );

    engine()
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 0),
            &Coordinate::block("f", "pane", 2),
            Placement::After,
        )
        .unwrap();

    let doc = store.current("f").unwrap();
    assert_eq!(doc.source, "text\n\n## B\n\n## A");
    assert_eq!(slots(doc, "h2"), some(&["b", "a"]));
}

#[test]
fn test_self_move_is_a_no_op() {
    let mut store = MemoryStore::new();
    store.insert("f", Document::from_markdown("a\n\nb\n\nc").unwrap());
    let engine = engine();

    // b is already right after a
    let outcome = engine
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 1),
            &Coordinate::block("f", "pane", 0),
            Placement::After,
        )
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::SelfMove));

    let same = Coordinate::item("f", "pane", 1, 0);
    let outcome = engine
        .move_element(&mut store, &same, &same, Placement::Before)
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::SelfMove));

    let field = store.fragments.get("f").unwrap();
    assert_eq!(field.current.source, "a\n\nb\n\nc");
    assert!(field.history.is_empty());
    assert!(!store.is_unsaved("pane"));
}

#[test]
fn test_move_there_and_back_restores_blocks() {
    let source = "a\n\nb\n\nc\n\nd";
    let original = styled(source, &[("p", &[Some("0"), Some("1"), Some("2"), Some("3")])]);
    let mut store = MemoryStore::new();
    store.insert("f", original.clone());
    let engine = engine();

    engine
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 0),
            &Coordinate::block("f", "pane", 2),
            Placement::After,
        )
        .unwrap();
    let moved = store.current("f").unwrap();
    assert_eq!(moved.source, "b\n\nc\n\na\n\nd");
    assert_eq!(slots(moved, "p"), some(&["1", "2", "0", "3"]));

    engine
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 2),
            &Coordinate::block("f", "pane", 0),
            Placement::Before,
        )
        .unwrap();
    let restored = store.current("f").unwrap();
    assert_eq!(restored.source, source);
    assert_eq!(restored.payload, original.payload);
}

#[test]
fn test_move_there_and_back_restores_list_items() {
    let original = styled("* a\n* b\n* c", &[("li", &[Some("a"), Some("b"), Some("c")])]);
    let mut store = MemoryStore::new();
    store.insert("f", original.clone());
    let engine = engine();

    engine
        .move_element(
            &mut store,
            &Coordinate::item("f", "pane", 0, 0),
            &Coordinate::item("f", "pane", 0, 2),
            Placement::After,
        )
        .unwrap();
    let moved = store.current("f").unwrap();
    assert_eq!(moved.source, "* b\n* c\n* a");
    assert_eq!(slots(moved, "li"), some(&["b", "c", "a"]));

    engine
        .move_element(
            &mut store,
            &Coordinate::item("f", "pane", 0, 2),
            &Coordinate::item("f", "pane", 0, 0),
            Placement::Before,
        )
        .unwrap();
    let restored = store.current("f").unwrap();
    assert_eq!(restored.source, "* a\n* b\n* c");
    assert_eq!(restored.payload, original.payload);
}

#[test]
fn test_undo_pops_then_restores_original() {
    let clock = ManualClock::new(1_000_000);
    let engine = Engine::with_clock(EditorConfig::default(), &clock);
    let mut store = MemoryStore::new();
    store.insert("f", Document::from_markdown("a\n\nb\n\nc").unwrap());

    engine
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 0),
            &Coordinate::block("f", "pane", 1),
            Placement::After,
        )
        .unwrap();
    assert_eq!(store.current("f").unwrap().source, "b\n\na\n\nc");

    clock.advance(7_000);
    engine
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 0),
            &Coordinate::block("f", "pane", 2),
            Placement::After,
        )
        .unwrap();
    assert_eq!(store.current("f").unwrap().source, "a\n\nc\n\nb");
    assert_eq!(store.fragments["f"].history.len(), 2);

    assert_eq!(engine.undo(&mut store, "f", "pane").unwrap(), Outcome::Applied);
    assert_eq!(store.current("f").unwrap().source, "b\n\na\n\nc");
    assert_eq!(store.fragments["f"].history.len(), 1);
    assert!(store.is_unsaved("pane"));

    assert_eq!(engine.undo(&mut store, "f", "pane").unwrap(), Outcome::Applied);
    assert_eq!(store.current("f").unwrap().source, "a\n\nb\n\nc");
    assert!(store.fragments["f"].history.is_empty());
    assert!(!store.is_unsaved("pane"));
}

#[test]
fn test_rapid_edits_undo_to_baseline() {
    let engine = engine();
    let mut store = MemoryStore::new();
    store.insert("f", Document::from_markdown("a\n\nb\n\nc").unwrap());

    for _ in 0..2 {
        engine
            .move_element(
                &mut store,
                &Coordinate::block("f", "pane", 0),
                &Coordinate::block("f", "pane", 2),
                Placement::After,
            )
            .unwrap();
    }
    assert_eq!(store.current("f").unwrap().source, "c\n\na\n\nb");
    assert_eq!(store.fragments["f"].history.len(), 1);

    engine.undo(&mut store, "f", "pane").unwrap();
    assert_eq!(store.current("f").unwrap().source, "a\n\nb\n\nc");
}

#[test]
fn test_cross_fragment_move_carries_button_payload() {
    let mut source = styled("[go](/x)\n\nstay", &[("p", &[Some("go"), Some("stay")])]);
    source.payload.buttons.insert(
        "/x".to_string(),
        serde_json::from_str(r#"{ "urlTarget": "/x", "callbackPayload": "(goto (url /x))" }"#).unwrap(),
    );
    let mut store = MemoryStore::new();
    store.insert("a", source);
    store.insert("b", Document::from_markdown("## target").unwrap());

    let outcome = engine()
        .move_element(
            &mut store,
            &Coordinate::block("a", "pane-a", 0),
            &Coordinate::block("b", "pane-b", 0),
            Placement::After,
        )
        .unwrap();
    assert!(outcome.is_applied());

    let a = store.current("a").unwrap();
    let b = store.current("b").unwrap();
    assert_eq!(a.source, "stay");
    assert_eq!(b.source, "## target\n\n[go](/x)");
    assert!(!a.payload.buttons.contains_key("/x"));
    assert_eq!(b.payload.buttons["/x"].callback_payload, "(goto (url /x))");

    assert_eq!(slots(a, "p"), some(&["stay"]));
    assert_eq!(slots(b, "p"), some(&["go"]));
    assert!(a.check_invariants().is_empty());
    assert!(b.check_invariants().is_empty());
    assert!(store.is_unsaved("pane-a"));
    assert!(store.is_unsaved("pane-b"));
}

#[test]
fn test_cross_fragment_list_item_becomes_paragraph() {
    let mut store = MemoryStore::new();
    store.insert(
        "a",
        styled(
            "* `youtube(a|b)`\n* second",
            &[("li", &[Some("y"), Some("s")]), ("code", &[Some("c")])],
        ),
    );
    store.insert("b", Document::from_markdown("text").unwrap());

    engine()
        .move_element(
            &mut store,
            &Coordinate::item("a", "pane-a", 0, 0),
            &Coordinate::block("b", "pane-b", 0),
            Placement::Before,
        )
        .unwrap();

    let a = store.current("a").unwrap();
    let b = store.current("b").unwrap();
    assert_eq!(a.source, "* second");
    assert_eq!(b.source, "`youtube(a|b)`\n\ntext");
    assert_eq!(slots(a, "li"), some(&["s"]));
    assert!(slots(a, "code").is_empty());
    // the item's override merges into the paragraph it became
    assert_eq!(slots(b, "p"), vec![Some("y".to_string()), None]);
    assert_eq!(slots(b, "code"), some(&["c"]));
    assert!(a.check_invariants().is_empty());
    assert!(b.check_invariants().is_empty());
}

#[test]
fn test_move_into_empty_fragment() {
    let mut store = MemoryStore::new();
    store.insert("a", Document::from_markdown("## moving\n\nrest").unwrap());
    store.insert("b", Document::from_markdown("").unwrap());

    engine()
        .move_element(
            &mut store,
            &Coordinate::block("a", "pane-a", 0),
            &Coordinate::block("b", "pane-b", 5),
            Placement::After,
        )
        .unwrap();

    assert_eq!(store.current("a").unwrap().source, "rest");
    assert_eq!(store.current("b").unwrap().source, "## moving");
}

#[test]
fn test_item_moves_out_of_list_within_document() {
    let mut store = MemoryStore::new();
    store.insert("f", Document::from_markdown("* a\n* b\n\nend").unwrap());

    engine()
        .move_element(
            &mut store,
            &Coordinate::item("f", "pane", 0, 1),
            &Coordinate::block("f", "pane", 1),
            Placement::After,
        )
        .unwrap();
    assert_eq!(store.current("f").unwrap().source, "* a\n\nend\n\nb");
}

#[test]
fn test_block_moves_into_list_within_document() {
    let mut store = MemoryStore::new();
    store.insert(
        "f",
        styled("x\n\n* a\n* b", &[("p", &[Some("x")]), ("li", &[Some("a"), Some("b")])]),
    );

    engine()
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 0),
            &Coordinate::item("f", "pane", 1, 0),
            Placement::After,
        )
        .unwrap();

    let doc = store.current("f").unwrap();
    assert_eq!(doc.source, "* a\n* x\n* b");
    assert_eq!(slots(doc, "li"), vec![Some("a".to_string()), Some("x".to_string()), Some("b".to_string())]);
    assert!(slots(doc, "p").is_empty());
    assert!(doc.check_invariants().is_empty());
}

#[test]
fn test_list_moves_into_list_under_a_fresh_item() {
    let mut store = MemoryStore::new();
    store.insert(
        "f",
        styled(
            "* a\n  * b\n\n1. o",
            &[
                ("li", &[Some("a"), Some("b"), Some("o")]),
                ("ul", &[Some("outer"), Some("inner")]),
            ],
        ),
    );

    let outcome = engine()
        .move_element(
            &mut store,
            &Coordinate::block("f", "pane", 0),
            &Coordinate::item("f", "pane", 1, 0),
            Placement::After,
        )
        .unwrap();
    assert_eq!(outcome, Outcome::Applied);

    let doc = store.current("f").unwrap();
    assert_eq!(doc.source, "1. o\n2. * a\n     * b");
    // the wrapping item is new; a and b stay on their own items
    assert_eq!(
        slots(doc, "li"),
        vec![Some("o".to_string()), None, Some("a".to_string()), Some("b".to_string())]
    );
    assert_eq!(slots(doc, "ul"), some(&["outer", "inner"]));
    assert!(doc.check_invariants().is_empty());
}

#[test]
fn test_item_with_nested_list_moves_to_top_level() {
    let mut store = MemoryStore::new();
    store.insert(
        "f",
        styled(
            "* a\n  * b\n* c\n\nend",
            &[
                ("li", &[Some("a"), Some("b"), Some("c")]),
                ("ul", &[Some("outer"), Some("inner")]),
                ("p", &[Some("end")]),
            ],
        ),
    );

    engine()
        .move_element(
            &mut store,
            &Coordinate::item("f", "pane", 0, 0),
            &Coordinate::block("f", "pane", 1),
            Placement::After,
        )
        .unwrap();

    let doc = store.current("f").unwrap();
    assert_eq!(doc.source, "* c\n\nend\n\n* a\n  * b");
    assert_eq!(slots(doc, "li"), some(&["c", "a", "b"]));
    // the list wrapping the moved item starts without overrides
    assert_eq!(
        slots(doc, "ul"),
        vec![Some("outer".to_string()), None, Some("inner".to_string())]
    );
    assert_eq!(slots(doc, "p"), some(&["end"]));
    assert!(doc.check_invariants().is_empty());
}

#[test]
fn test_cross_fragment_nested_list_keeps_item_overrides() {
    let mut store = MemoryStore::new();
    store.insert(
        "a",
        styled(
            "* a\n  * b\n\nrest",
            &[
                ("li", &[Some("a"), Some("b")]),
                ("ul", &[Some("outer"), Some("inner")]),
                ("p", &[Some("rest")]),
            ],
        ),
    );
    store.insert(
        "b",
        styled("## head\n\n* x", &[("li", &[Some("x")]), ("ul", &[Some("bx")])]),
    );

    engine()
        .move_element(
            &mut store,
            &Coordinate::block("a", "pane-a", 0),
            &Coordinate::block("b", "pane-b", 0),
            Placement::After,
        )
        .unwrap();

    let a = store.current("a").unwrap();
    let b = store.current("b").unwrap();
    assert_eq!(a.source, "rest");
    assert!(slots(a, "li").is_empty());
    assert!(slots(a, "ul").is_empty());
    assert_eq!(slots(a, "p"), some(&["rest"]));

    assert_eq!(b.source, "## head\n\n* a\n  * b\n\n- x");
    assert_eq!(slots(b, "li"), some(&["a", "b", "x"]));
    assert_eq!(slots(b, "ul"), some(&["outer", "inner", "bx"]));
    assert!(a.check_invariants().is_empty());
    assert!(b.check_invariants().is_empty());
}

#[test]
fn test_erase_only_item_removes_list_marker() {
    let mut store = MemoryStore::new();
    store.insert(
        "f",
        styled("intro\n\n* only\n\noutro", &[("li", &[Some("x")]), ("p", &[Some("i"), Some("o")])]),
    );

    engine()
        .erase_element(&mut store, &Coordinate::item("f", "pane", 1, 0))
        .unwrap();

    let doc = store.current("f").unwrap();
    assert_eq!(doc.source, "intro\n\noutro");
    assert!(!doc.source.contains("* "));
    assert_eq!(doc.render.len(), 2);
    assert!(slots(doc, "li").is_empty());
    assert_eq!(slots(doc, "p"), some(&["i", "o"]));
    assert!(doc.check_invariants().is_empty());
}

#[test]
fn test_missing_fragments_are_skipped() {
    let mut store = MemoryStore::new();
    store.insert("a", Document::from_markdown("x").unwrap());
    let engine = engine();

    let outcome = engine
        .move_element(
            &mut store,
            &Coordinate::block("a", "pane-a", 0),
            &Coordinate::block("nowhere", "pane-b", 0),
            Placement::After,
        )
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::MissingFragment("nowhere".to_string())));

    let outcome = engine
        .move_element(
            &mut store,
            &Coordinate::block("a", "pane-a", 4),
            &Coordinate::block("a", "pane-a", 0),
            Placement::After,
        )
        .unwrap();
    assert_eq!(outcome, Outcome::Skipped(SkipReason::MissingSource));
    assert_eq!(store.current("a").unwrap().source, "x");
}
