//! Tree surgery shared by the operations: removal paths, subtree removal
//! with style slot cleanup, and re-shaping of render nodes between block and
//! list-item positions.

use crate::document::Document;
use crate::errors::EditorError;
use std::collections::BTreeMap;
use storykeep_evaluator::{Evaluator, VNode};
use storykeep_parser::ast::{Node, Root};

/// Kind and looseness of a list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ListShape {
    pub ordered: bool,
    pub spread: bool,
}

pub(crate) fn list_shape(root: &Root, outer: usize) -> Option<ListShape> {
    match root.children.get(outer)? {
        Node::List {
            ordered, spread, ..
        } => Some(ListShape {
            ordered: *ordered,
            spread: *spread,
        }),
        _ => None,
    }
}

/// Path that leaves the tree with the element at `(outer, idx)`: the sole
/// item of a list takes the list with it
pub(crate) fn removal_path(root: &Root, outer: usize, idx: Option<usize>) -> Option<Vec<usize>> {
    match idx {
        Some(idx) => match root.children.get(outer)? {
            Node::List { children, .. } if idx < children.len() => {
                if children.len() == 1 {
                    Some(vec![outer])
                } else {
                    Some(vec![outer, idx])
                }
            }
            _ => None,
        },
        None => (outer < root.children.len()).then(|| vec![outer]),
    }
}

/// Detach the subtree at `path` from both trees and drop the style slots of
/// every occurrence inside it
pub(crate) fn remove_subtree(doc: &mut Document, path: &[usize]) -> Option<(Node, VNode)> {
    doc.semantic.node_at(path)?;
    doc.render.node_at(path)?;

    let lookup = doc.lookup();
    let removed: Vec<(String, usize)> = lookup
        .occurrences_within(path)
        .into_iter()
        .map(|o| (o.tag.clone(), o.ordinal))
        .collect();

    let semantic = doc.semantic.remove_at(path)?;
    let render = doc.render.remove_at(path)?;

    // reverse pre-order keeps lower ordinals valid
    let payload = &mut doc.payload.class_names_payload;
    for (tag, ordinal) in removed.iter().rev() {
        payload.remove_slot(tag, *ordinal);
    }
    Some((semantic, render))
}

/// Open an empty style slot for every occurrence inside the subtree at `path`
pub(crate) fn open_slots(doc: &mut Document, path: &[usize]) {
    let lookup = doc.lookup();
    let empty = BTreeMap::new();
    for occurrence in lookup.occurrences_within(path) {
        let count = lookup.count(&occurrence.tag);
        doc.payload
            .class_names_payload
            .insert_slot(&occurrence.tag, occurrence.ordinal, &empty, count);
    }
}

/// The single child of a list, or the list itself
pub(crate) fn unwrap_sole_item(list: Node) -> Node {
    match list {
        Node::List { mut children, .. } if children.len() == 1 => children.remove(0),
        other => other,
    }
}

pub(crate) fn unwrap_sole_child(node: VNode) -> VNode {
    match node {
        VNode::Element { mut children, .. } if children.len() == 1 => children.remove(0),
        other => other,
    }
}

fn into_children(node: VNode) -> Vec<VNode> {
    match node {
        VNode::Element { children, .. } => children,
        VNode::Text { .. } => Vec::new(),
    }
}

/// Split an `li` into one render node per semantic block
fn item_blocks(blocks: &[Node], li: VNode, spread: bool) -> Vec<VNode> {
    let mut rendered = into_children(li).into_iter();
    let mut out = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            Node::Paragraph { children } if !spread => {
                let inline: Vec<VNode> = rendered.by_ref().take(children.len()).collect();
                out.push(VNode::element("p").with_children(inline));
            }
            _ => {
                if let Some(node) = rendered.next() {
                    out.push(node);
                }
            }
        }
    }
    out
}

/// Assemble an `li` from per-block render nodes
fn item_render(blocks: &[Node], rendered: Vec<VNode>, spread: bool) -> VNode {
    let mut children = Vec::new();
    for (block, node) in blocks.iter().zip(rendered) {
        match block {
            Node::Paragraph { .. } if !spread => children.extend(into_children(node)),
            _ => children.push(node),
        }
    }
    VNode::element("li").with_children(children)
}

/// How the occurrences of a re-shaped element relate to the ones it was
/// extracted with; paths are relative to the element root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Reshape {
    /// Wrapper or paragraph nodes that did not exist before
    pub created: Vec<Vec<usize>>,
    /// Extracted nodes that no longer exist
    pub dropped: Vec<Vec<usize>>,
    /// The root kept its identity under a different tag
    pub retag_root: bool,
}

impl Reshape {
    fn created(path: Vec<usize>) -> Self {
        Reshape {
            created: vec![path],
            ..Reshape::default()
        }
    }

    fn dropped(path: Vec<usize>) -> Self {
        Reshape {
            dropped: vec![path],
            ..Reshape::default()
        }
    }

    fn retagged() -> Self {
        Reshape {
            retag_root: true,
            ..Reshape::default()
        }
    }
}

/// Positions of the paragraph blocks among an item's children
fn paragraph_slots(blocks: &[Node]) -> Vec<Vec<usize>> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| matches!(block, Node::Paragraph { .. }))
        .map(|(i, _)| vec![i])
        .collect()
}

/// Re-shape a moved element for a top-level position
///
/// A list item with one block becomes that block; an item with several (or
/// no) blocks is wrapped in a fresh single-item list of the source's kind.
/// Render nodes are reused whenever their shape still fits.
pub(crate) fn as_block(
    semantic: Node,
    render: VNode,
    source_list: Option<ListShape>,
) -> Result<(Node, VNode, Reshape), EditorError> {
    let shape = source_list.unwrap_or(ListShape {
        ordered: false,
        spread: false,
    });
    let (node, vnode, reshape) = match semantic {
        Node::ListItem { mut children } if children.len() == 1 => {
            // a tight paragraph was rendered into the li itself
            let reshape = match &children[0] {
                Node::Paragraph { .. } if !shape.spread => Reshape::retagged(),
                _ => Reshape::dropped(Vec::new()),
            };
            let rendered = item_blocks(&children, render, shape.spread);
            let block = children.remove(0);
            let vnode = match rendered.into_iter().next() {
                Some(vnode) => vnode,
                None => Evaluator::new().evaluate_block_node(&block)?,
            };
            (block, vnode, reshape)
        }
        Node::ListItem { children } => {
            let tag = if shape.ordered { "ol" } else { "ul" };
            let list = Node::List {
                ordered: shape.ordered,
                start: shape.ordered.then_some(1),
                spread: shape.spread,
                children: vec![Node::ListItem { children }],
            };
            (
                list,
                VNode::element(tag).with_child(render),
                Reshape::created(Vec::new()),
            )
        }
        block => (block, render, Reshape::default()),
    };

    let derived = Evaluator::new().evaluate_block_node(&node)?;
    if vnode.same_shape(&derived) {
        Ok((node, vnode, reshape))
    } else {
        Ok((node, derived, reshape))
    }
}

/// Re-shape a moved element for a position inside a list of looseness `spread`
pub(crate) fn as_item(
    semantic: Node,
    render: VNode,
    source_list: Option<ListShape>,
    spread: bool,
) -> Result<(Node, VNode, Reshape), EditorError> {
    let (item, vnode, reshape) = match semantic {
        Node::ListItem { children } => {
            let source_spread = source_list.map_or(false, |shape| shape.spread);
            let reshape = match (source_spread, spread) {
                (false, true) => Reshape {
                    created: paragraph_slots(&children),
                    ..Reshape::default()
                },
                (true, false) => Reshape {
                    dropped: paragraph_slots(&children),
                    ..Reshape::default()
                },
                _ => Reshape::default(),
            };
            let rendered = item_blocks(&children, render, source_spread);
            let li = item_render(&children, rendered, spread);
            (Node::ListItem { children }, li, reshape)
        }
        block => {
            let reshape = match &block {
                Node::Paragraph { .. } if !spread => Reshape::retagged(),
                _ => Reshape::created(Vec::new()),
            };
            let li = item_render(std::slice::from_ref(&block), vec![render], spread);
            (Node::list_item(vec![block]), li, reshape)
        }
    };

    let derived = Evaluator::new().evaluate_list_item(&item, spread)?;
    if vnode.same_shape(&derived) {
        Ok((item, vnode, reshape))
    } else {
        Ok((item, derived, reshape))
    }
}

/// Render node of a freshly inserted block
pub(crate) fn render_block(block: &Node) -> Result<VNode, EditorError> {
    Ok(Evaluator::new().evaluate_block_node(block)?)
}

/// Render node of a freshly inserted list item
pub(crate) fn render_item(item: &Node, spread: bool) -> Result<VNode, EditorError> {
    Ok(Evaluator::new().evaluate_list_item(item, spread)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removal_path_takes_sole_item_list() {
        let doc = Document::from_markdown("* a\n\n- b\n- c\n\nd").unwrap();
        assert_eq!(removal_path(&doc.semantic, 0, Some(0)), Some(vec![0]));
        assert_eq!(removal_path(&doc.semantic, 1, Some(1)), Some(vec![1, 1]));
        assert_eq!(removal_path(&doc.semantic, 2, None), Some(vec![2]));
        assert_eq!(removal_path(&doc.semantic, 2, Some(0)), None);
        assert_eq!(removal_path(&doc.semantic, 3, None), None);
    }

    #[test]
    fn test_tight_item_becomes_paragraph_keeping_link_attributes() {
        let doc = Document::from_markdown("* see [docs](/docs \"Docs\")").unwrap();
        let item = doc.semantic.node_at(&[0, 0]).unwrap().clone();
        let li = doc.render.node_at(&[0, 0]).unwrap().clone();

        let (block, vnode, reshape) = as_block(item, li, list_shape(&doc.semantic, 0)).unwrap();
        assert!(matches!(block, Node::Paragraph { .. }));
        assert!(reshape.retag_root);
        assert_eq!(vnode.tag(), Some("p"));
        assert_eq!(vnode.children()[1].attr("title"), Some("Docs"));
    }

    #[test]
    fn test_multi_block_item_is_wrapped_in_a_list() {
        let doc = Document::from_markdown("1. one\n\n   two").unwrap();
        let item = doc.semantic.node_at(&[0, 0]).unwrap().clone();
        let li = doc.render.node_at(&[0, 0]).unwrap().clone();

        let (block, vnode, reshape) = as_block(item, li, list_shape(&doc.semantic, 0)).unwrap();
        assert!(matches!(block, Node::List { ordered: true, .. }));
        assert_eq!(reshape.created, vec![Vec::<usize>::new()]);
        assert_eq!(vnode.tag(), Some("ol"));
    }

    #[test]
    fn test_block_into_loose_list_keeps_paragraph() {
        let block = Node::paragraph(vec![Node::text("x")]);
        let p = render_block(&block).unwrap();

        let (_, tight, reshape) = as_item(block.clone(), p.clone(), None, false).unwrap();
        assert!(reshape.retag_root);
        assert_eq!(tight.children(), &[VNode::text("x")]);
        let (_, loose, reshape) = as_item(block, p, None, true).unwrap();
        assert_eq!(reshape.created, vec![Vec::<usize>::new()]);
        assert_eq!(loose.children()[0].tag(), Some("p"));
    }

    #[test]
    fn test_list_into_list_gets_a_fresh_wrapper_item() {
        let doc = Document::from_markdown("* a\n  * b").unwrap();
        let list = doc.semantic.children[0].clone();
        let ul = doc.render.nodes[0].clone();

        let (item, li, reshape) = as_item(list, ul, None, false).unwrap();
        assert!(item.is_list_item());
        assert_eq!(li.children()[0].tag(), Some("ul"));
        assert_eq!(reshape.created, vec![Vec::<usize>::new()]);
        assert!(!reshape.retag_root);
    }

    #[test]
    fn test_tightening_an_item_drops_its_paragraphs() {
        let doc = Document::from_markdown("* one\n\n  two\n\n* three").unwrap();
        let item = doc.semantic.node_at(&[0, 0]).unwrap().clone();
        let li = doc.render.node_at(&[0, 0]).unwrap().clone();

        let (_, tight, reshape) = as_item(item, li, list_shape(&doc.semantic, 0), false).unwrap();
        assert_eq!(tight.children(), &[VNode::text("one"), VNode::text("two")]);
        assert_eq!(reshape.dropped, vec![vec![0], vec![1]]);
    }
}
