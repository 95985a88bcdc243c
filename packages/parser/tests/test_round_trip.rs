use storykeep_parser::{parse, serialize, Node, ParseError};

#[test]
fn test_pane_fragment_round_trip() {
    let source = "## Welcome\n\nIntro with *emphasis*.\n\n* ![Descriptive title](filename)\n* `belief(BeliefTag|likert|prompt)`\n\n1. `identifyAs(BeliefTag|TARGET_VALUE|prompt)`\n2. `toggle(BeliefTag|prompt)`";
    let root = parse(source).unwrap();
    assert_eq!(root.children.len(), 4);
    assert_eq!(serialize(&root), source);
}

#[test]
fn test_json_shape_of_tree() {
    let root = parse("### subtitle").unwrap();
    let json = serde_json::to_value(&root).unwrap();
    assert_eq!(json["children"][0]["type"], "heading");
    assert_eq!(json["children"][0]["depth"], 3);

    let back: storykeep_parser::Root = serde_json::from_value(json).unwrap();
    assert_eq!(back, root);
}

#[test]
fn test_deep_nesting_is_rejected() {
    let source: String = (0..18)
        .map(|level| format!("{}1. x\n", "   ".repeat(level)))
        .collect();
    match parse(&source) {
        Err(ParseError::NestingTooDeep { limit, .. }) => assert_eq!(limit, 16),
        other => panic!("Expected nesting error, got {:?}", other),
    }
}

#[test]
fn test_list_item_children_are_blocks() {
    let root = parse("* one\n* two").unwrap();
    for item in root.children[0].children().unwrap() {
        assert!(matches!(item, Node::ListItem { .. }));
        assert!(item.children().unwrap().iter().all(Node::is_block));
    }
}
