use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Render tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attributes: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<VNode>,
    },

    /// Text node
    Text { content: String },
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            VNode::Element { tag, .. } => Some(tag),
            VNode::Text { .. } => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            VNode::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            VNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[VNode] {
        match self {
            VNode::Element { children, .. } => children,
            VNode::Text { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<VNode>> {
        match self {
            VNode::Element { children, .. } => Some(children),
            VNode::Text { .. } => None,
        }
    }

    /// Visit this node and every descendant in pre-order
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a VNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Same tags, text and nesting; attributes are ignored
    pub fn same_shape(&self, other: &VNode) -> bool {
        match (self, other) {
            (VNode::Text { content: a }, VNode::Text { content: b }) => a == b,
            (
                VNode::Element {
                    tag: a, children: ac, ..
                },
                VNode::Element {
                    tag: b, children: bc, ..
                },
            ) => a == b && ac.len() == bc.len() && ac.iter().zip(bc).all(|(x, y)| x.same_shape(y)),
            _ => false,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            VNode::Text { content } => out.push_str(&escape_html(content)),
            VNode::Element {
                tag,
                attributes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (key, value) in attributes {
                    out.push_str(&format!(" {}=\"{}\"", key, escape_html(value)));
                }
                if matches!(tag.as_str(), "img" | "br") {
                    out.push_str(" />");
                    return;
                }
                out.push('>');
                for child in children {
                    child.write_html(out);
                }
                out.push_str(&format!("</{}>", tag));
            }
        }
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render tree of one pane document; `nodes` align with the semantic root's children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderTree {
    pub nodes: Vec<VNode>,
}

impl RenderTree {
    pub fn new(nodes: Vec<VNode>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find a node by child-index path
    pub fn node_at(&self, path: &[usize]) -> Option<&VNode> {
        let (first, rest) = path.split_first()?;
        let mut current = self.nodes.get(*first)?;
        for idx in rest {
            current = current.children().get(*idx)?;
        }
        Some(current)
    }

    /// Mutable children of the container at `path` (empty path = top level)
    pub fn children_at_mut(&mut self, path: &[usize]) -> Option<&mut Vec<VNode>> {
        let mut children = &mut self.nodes;
        for idx in path {
            children = children.get_mut(*idx)?.children_mut()?;
        }
        Some(children)
    }

    /// Detach the node at `path`
    pub fn remove_at(&mut self, path: &[usize]) -> Option<VNode> {
        let (last, parent) = path.split_last()?;
        let children = self.children_at_mut(parent)?;
        if *last < children.len() {
            Some(children.remove(*last))
        } else {
            None
        }
    }

    /// Insert into the container at `parent`, clamping the index
    pub fn insert_at(&mut self, parent: &[usize], index: usize, node: VNode) -> bool {
        match self.children_at_mut(parent) {
            Some(children) => {
                let index = index.min(children.len());
                children.insert(index, node);
                true
            }
            None => false,
        }
    }

    pub fn same_shape(&self, other: &RenderTree) -> bool {
        self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .zip(&other.nodes)
                .all(|(a, b)| a.same_shape(b))
    }

    /// Serialize to an HTML fragment
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
            out.push('\n');
        }
        out
    }
}
