/// Ordinal lookup over nested lists and mixed tags
use crate::*;
use storykeep_parser::parse;

fn lookup_for(source: &str) -> OrdinalLookup {
    let tree = derive_render_tree(&parse(source).unwrap()).unwrap();
    OrdinalLookup::build(&tree)
}

#[test]
fn test_nested_list_items_share_li_sequence() {
    let lookup = lookup_for("1. a\n   * a1\n   * a2\n2. b");
    // pre-order: [0,0], [0,0,1,0], [0,0,1,1], [0,1]
    assert_eq!(lookup.count("li"), 4);
    assert_eq!(lookup.ordinal_of(&[0, 1]), Some(3));
    assert_eq!(lookup.count("ol"), 1);
    assert_eq!(lookup.count("ul"), 1);
    assert_eq!(lookup.list_items().len(), 4);
}

#[test]
fn test_global_nth_for_list_items_and_blocks() {
    let lookup = lookup_for("intro\n\n* `youtube(a|b)`\n* ![pic](x.png)\n\n## h\n\n* `bunny(c|d)`");

    assert_eq!(lookup.global_nth("li", Some(1), 1), Some(1));
    assert_eq!(lookup.global_nth("li", Some(0), 3), Some(2));
    assert_eq!(lookup.global_nth("code", Some(0), 3), Some(1));
    assert_eq!(lookup.global_nth("img", Some(1), 1), Some(0));
    assert_eq!(lookup.global_nth("h2", None, 2), Some(0));
    assert_eq!(lookup.global_nth("p", None, 0), Some(0));
    assert_eq!(lookup.global_nth("h2", None, 0), None);
}

#[test]
fn test_global_nth_falls_back_to_top_level_element() {
    let lookup = lookup_for("first\n\nsecond");
    assert_eq!(lookup.global_nth("p", Some(4), 1), Some(1));
}

#[test]
fn test_ranges_within_subtree() {
    let lookup = lookup_for("p0\n\n* one\n* two\n\np1");
    let ranges = lookup.ranges_within(&[1]);
    assert_eq!(ranges.get("ul"), Some(&(0..1)));
    assert_eq!(ranges.get("li"), Some(&(0..2)));
    assert!(ranges.get("p").is_none());

    let ranges = lookup.ranges_within(&[2]);
    assert_eq!(ranges.get("p"), Some(&(1..2)));
}

#[test]
fn test_links_by_target() {
    let lookup = lookup_for("[a](https://x.test) and [b](https://x.test)\n\n* [c](/y)");
    assert_eq!(lookup.links("https://x.test").len(), 2);
    assert_eq!(lookup.links("/y"), &[vec![1, 0, 0]]);
    assert_eq!(lookup.link_targets().count(), 2);
}

#[test]
fn test_inline_tags_are_not_counted() {
    let lookup = lookup_for("**bold** *em* [a](b)");
    let counts = lookup.counts();
    assert_eq!(counts.get("p"), Some(&1));
    assert!(counts.get("strong").is_none());
    assert!(counts.get("a").is_none());
}
