/// Tests that canonical markup survives parse/serialize unchanged
use crate::*;

#[test]
fn test_canonical_sources_are_stable() {
    let sources = vec![
        "## title",
        "### subtitle\n\n#### section title",
        "First **strong** and *em* text",
        "* `signup(Major Updates Only|Keep in touch!|false)`",
        "* `youtube(tag|title)`\n* `bunny(id|title)`",
        "1. one\n2. two\n3. three",
        "1. one\n\n2. two",
        "* ![Descriptive title](filename)",
        "[Read more](https://example.com \"Docs\") now",
        "line one\\\nline two",
        "* outer\n  * inner\n  * inner two\n* last",
        "1. item\n\n   continued paragraph\n\n2. next",
    ];

    for source in sources {
        let root = parse(source).unwrap_or_else(|e| panic!("Failed to parse {:?}: {}", source, e));
        let serialized = serialize(&root);
        assert_eq!(serialized, source, "canonical form changed");
    }
}

#[test]
fn test_reparse_preserves_tree() {
    let source = "# Welcome\n\n- dash bullet\n+ plus bullet\n\nsome \\*escaped\\* text\n\n3) three\n4) four";
    let root = parse(source).unwrap();
    let reparsed = parse(&serialize(&root)).unwrap();
    assert_eq!(root, reparsed);
}

#[test]
fn test_escaped_link_destination() {
    let root = Root::new(vec![Node::paragraph(vec![Node::Link {
        url: "https://example.com/a_(b)".to_string(),
        title: None,
        children: vec![Node::text("x")],
    }])]);
    let serialized = serialize(&root);
    assert_eq!(serialized, "[x](https://example.com/a_(b\\))");
    assert_eq!(parse(&serialized).unwrap(), root);
}

#[test]
fn test_text_with_markup_characters() {
    let root = Root::new(vec![Node::paragraph(vec![Node::text(
        "2 * 3 = [six] `maybe`",
    )])]);
    let reparsed = parse(&serialize(&root)).unwrap();
    assert_eq!(reparsed, root);
}
