//! Ordinal lookup over a render tree.
//!
//! Style overrides are stored per tag in arrays indexed by occurrence
//! ordinal. The lookup is a non-owning index rebuilt from the tree whenever
//! the tree changes: it maps child-index paths to `(tag, ordinal)` and keeps
//! per-tag occurrence lists in pre-order.

use crate::vdom::{RenderTree, VNode};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

/// Tags that own style override arrays
pub const STYLEABLE_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "img", "code",
];

pub fn is_styleable(tag: &str) -> bool {
    STYLEABLE_TAGS.contains(&tag)
}

/// Child-index path of a render node, starting at the top level
pub type NodeRef = Vec<usize>;

/// One styleable element, in tree pre-order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub path: NodeRef,
    pub tag: String,
    pub ordinal: usize,
}

#[derive(Debug, Clone, Default)]
pub struct OrdinalLookup {
    /// Tag of each top-level element
    nth_tag: Vec<String>,
    /// Styleable occurrences per tag, in pre-order
    nth_tag_lookup: BTreeMap<String, Vec<NodeRef>>,
    list_items: Vec<NodeRef>,
    links_by_target: BTreeMap<String, Vec<NodeRef>>,
    /// Every styleable occurrence in pre-order
    order: Vec<Occurrence>,
    by_path: HashMap<NodeRef, usize>,
}

impl OrdinalLookup {
    pub fn build(tree: &RenderTree) -> Self {
        let mut lookup = OrdinalLookup::default();
        let mut path = Vec::new();

        for (i, node) in tree.nodes.iter().enumerate() {
            lookup
                .nth_tag
                .push(node.tag().unwrap_or_default().to_string());
            path.push(i);
            lookup.visit(node, &mut path);
            path.pop();
        }

        lookup
    }

    fn visit(&mut self, node: &VNode, path: &mut Vec<usize>) {
        let VNode::Element { tag, children, .. } = node else {
            return;
        };

        if is_styleable(tag) {
            let bucket = self.nth_tag_lookup.entry(tag.clone()).or_default();
            let ordinal = bucket.len();
            bucket.push(path.clone());
            self.by_path.insert(path.clone(), self.order.len());
            self.order.push(Occurrence {
                path: path.clone(),
                tag: tag.clone(),
                ordinal,
            });
        }
        if tag == "li" {
            self.list_items.push(path.clone());
        }
        if tag == "a" {
            if let Some(href) = node.attr("href") {
                self.links_by_target
                    .entry(href.to_string())
                    .or_default()
                    .push(path.clone());
            }
        }

        for (i, child) in children.iter().enumerate() {
            path.push(i);
            self.visit(child, path);
            path.pop();
        }
    }

    /// Tag of the top-level element at `outer`
    pub fn nth_tag(&self, outer: usize) -> Option<&str> {
        self.nth_tag.get(outer).map(String::as_str)
    }

    pub fn top_level_len(&self) -> usize {
        self.nth_tag.len()
    }

    pub fn occurrences_of(&self, tag: &str) -> &[NodeRef] {
        self.nth_tag_lookup
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn count(&self, tag: &str) -> usize {
        self.occurrences_of(tag).len()
    }

    /// Occurrence count of every styleable tag present
    pub fn counts(&self) -> BTreeMap<String, usize> {
        self.nth_tag_lookup
            .iter()
            .map(|(tag, refs)| (tag.clone(), refs.len()))
            .collect()
    }

    pub fn list_items(&self) -> &[NodeRef] {
        &self.list_items
    }

    pub fn links(&self, href: &str) -> &[NodeRef] {
        self.links_by_target
            .get(href)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn link_targets(&self) -> impl Iterator<Item = &str> {
        self.links_by_target.keys().map(String::as_str)
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.order
    }

    pub fn occurrence_at(&self, path: &[usize]) -> Option<&Occurrence> {
        self.by_path.get(path).map(|&i| &self.order[i])
    }

    pub fn ordinal_of(&self, path: &[usize]) -> Option<usize> {
        self.occurrence_at(path).map(|o| o.ordinal)
    }

    /// Occurrences inside the subtree at `path` (itself included), in pre-order
    pub fn occurrences_within(&self, path: &[usize]) -> Vec<&Occurrence> {
        self.order
            .iter()
            .filter(|o| o.path.starts_with(path))
            .collect()
    }

    /// Global ordinal of `tag` for the element at `[outer, local]`
    ///
    /// Nested occurrences share one ordinal sequence with top-level ones, so
    /// this finds the first occurrence of `tag` at or under `[outer, local]`.
    /// Without a local index, or when nothing matches under it, the top-level
    /// element `[outer]` is used when it carries `tag`, then its subtree.
    pub fn global_nth(&self, tag: &str, local: Option<usize>, outer: usize) -> Option<usize> {
        let refs = self.occurrences_of(tag);

        if let Some(local) = local {
            let base = [outer, local];
            if let Some(ordinal) = refs.iter().position(|r| r.starts_with(&base)) {
                return Some(ordinal);
            }
        }

        if let Some(ordinal) = refs.iter().position(|r| r.as_slice() == [outer]) {
            return Some(ordinal);
        }
        refs.iter().position(|r| r.first() == Some(&outer))
    }

    /// Per tag, the contiguous ordinal range of occurrences inside `path`
    pub fn ranges_within(&self, path: &[usize]) -> BTreeMap<String, Range<usize>> {
        let mut ranges: BTreeMap<String, Range<usize>> = BTreeMap::new();
        for occurrence in self.order.iter().filter(|o| o.path.starts_with(path)) {
            ranges
                .entry(occurrence.tag.clone())
                .and_modify(|r| r.end = occurrence.ordinal + 1)
                .or_insert(occurrence.ordinal..occurrence.ordinal + 1);
        }
        ranges
    }

    /// Ordinal a new occurrence of `tag` at `path` would take
    pub fn insertion_ordinal(&self, tag: &str, path: &[usize]) -> usize {
        self.occurrences_of(tag)
            .iter()
            .take_while(|r| r.as_slice() < path)
            .count()
    }
}
