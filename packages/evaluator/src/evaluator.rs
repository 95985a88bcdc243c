//! # Storykeep Evaluator
//!
//! Derives the render tree of a pane document from its semantic tree.
//!
//! ## Determinism Contract
//!
//! Derivation is a pure function of the semantic tree: the same tree always
//! yields the same render tree, with top-level render nodes index-aligned with
//! the semantic root's children. Attribute maps are ordered so serialized
//! render trees are byte-for-byte stable.
//!
//! ## Mapping
//!
//! | semantic | render |
//! |---|---|
//! | heading | `h1`..`h6` |
//! | paragraph | `p` |
//! | list | `ul` / `ol` (`start` when > 1) |
//! | list item | `li`; a paragraph inside a tight list is unwrapped into the `li` |
//! | strong / emphasis / inline code | `strong` / `em` / `code` |
//! | link / image / break | `a[href,title]` / `img[src,alt,title]` / `br` |
//!
//! Malformed trees (a list item outside a list, a block inside inline
//! content) are reported as errors rather than rendered partially.

use crate::vdom::{RenderTree, VNode};
use storykeep_parser::ast::{Node, Root};
use thiserror::Error;
use tracing::{debug, instrument};

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unexpected {found} node in {context} at {path:?}")]
    UnexpectedNode {
        found: String,
        context: &'static str,
        path: Vec<usize>,
    },

    #[error("Heading depth {depth} out of range at {path:?}")]
    InvalidHeadingDepth { depth: u8, path: Vec<usize> },
}

fn node_kind(node: &Node) -> String {
    node.html_tag().unwrap_or_else(|| "text".to_string())
}

/// Render tree evaluator
pub struct Evaluator {
    path: Vec<usize>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Derive the render tree for a whole document
    #[instrument(skip(self, root), fields(blocks = root.children.len()))]
    pub fn evaluate(&mut self, root: &Root) -> EvalResult<RenderTree> {
        self.path.clear();
        let mut nodes = Vec::with_capacity(root.children.len());

        for (i, block) in root.children.iter().enumerate() {
            self.path.push(i);
            nodes.push(self.evaluate_block(block)?);
            self.path.pop();
        }

        debug!(nodes = nodes.len(), "Render tree derived");
        Ok(RenderTree::new(nodes))
    }

    /// Derive the render node of one top-level block
    pub fn evaluate_block_node(&mut self, block: &Node) -> EvalResult<VNode> {
        self.path.clear();
        self.evaluate_block(block)
    }

    /// Derive the `li` of an item placed in a list of the given looseness
    pub fn evaluate_list_item(&mut self, item: &Node, spread: bool) -> EvalResult<VNode> {
        self.path.clear();
        match item {
            Node::ListItem { children } => self.evaluate_item(children, spread),
            other => Err(self.unexpected(other, "list")),
        }
    }

    fn unexpected(&self, node: &Node, context: &'static str) -> EvalError {
        EvalError::UnexpectedNode {
            found: node_kind(node),
            context,
            path: self.path.clone(),
        }
    }

    fn evaluate_block(&mut self, node: &Node) -> EvalResult<VNode> {
        match node {
            Node::Heading { depth, children } => {
                if !(1..=6).contains(depth) {
                    return Err(EvalError::InvalidHeadingDepth {
                        depth: *depth,
                        path: self.path.clone(),
                    });
                }
                let children = self.evaluate_inlines(children)?;
                Ok(VNode::element(format!("h{}", depth)).with_children(children))
            }
            Node::Paragraph { children } => {
                let children = self.evaluate_inlines(children)?;
                Ok(VNode::element("p").with_children(children))
            }
            Node::List {
                ordered,
                start,
                spread,
                children,
            } => {
                let mut list = VNode::element(if *ordered { "ol" } else { "ul" });
                if let Some(start) = start.filter(|s| *ordered && *s > 1) {
                    list = list.with_attr("start", start.to_string());
                }

                let mut items = Vec::with_capacity(children.len());
                for (i, item) in children.iter().enumerate() {
                    self.path.push(i);
                    let rendered = match item {
                        Node::ListItem { children } => self.evaluate_item(children, *spread),
                        other => Err(self.unexpected(other, "list")),
                    };
                    self.path.pop();
                    items.push(rendered?);
                }
                Ok(list.with_children(items))
            }
            other => Err(self.unexpected(other, "block position")),
        }
    }

    fn evaluate_item(&mut self, blocks: &[Node], spread: bool) -> EvalResult<VNode> {
        let mut children = Vec::new();
        for (i, block) in blocks.iter().enumerate() {
            self.path.push(i);
            let rendered = match block {
                Node::Paragraph { children: inline } if !spread => self.evaluate_inlines(inline),
                other => self.evaluate_block(other).map(|node| vec![node]),
            };
            self.path.pop();
            children.extend(rendered?);
        }
        Ok(VNode::element("li").with_children(children))
    }

    fn evaluate_inlines(&mut self, nodes: &[Node]) -> EvalResult<Vec<VNode>> {
        let mut out = Vec::with_capacity(nodes.len());
        for (i, node) in nodes.iter().enumerate() {
            self.path.push(i);
            let rendered = self.evaluate_inline(node);
            self.path.pop();
            out.push(rendered?);
        }
        Ok(out)
    }

    fn evaluate_inline(&mut self, node: &Node) -> EvalResult<VNode> {
        match node {
            Node::Text { value } => Ok(VNode::text(value.clone())),
            Node::Strong { children } => {
                let children = self.evaluate_inlines(children)?;
                Ok(VNode::element("strong").with_children(children))
            }
            Node::Emphasis { children } => {
                let children = self.evaluate_inlines(children)?;
                Ok(VNode::element("em").with_children(children))
            }
            Node::InlineCode { value } => {
                Ok(VNode::element("code").with_child(VNode::text(value.clone())))
            }
            Node::Link {
                url,
                title,
                children,
            } => {
                let mut link = VNode::element("a").with_attr("href", url.clone());
                if let Some(title) = title {
                    link = link.with_attr("title", title.clone());
                }
                let children = self.evaluate_inlines(children)?;
                Ok(link.with_children(children))
            }
            Node::Image { url, alt, title } => {
                let mut image = VNode::element("img")
                    .with_attr("src", url.clone())
                    .with_attr("alt", alt.clone());
                if let Some(title) = title {
                    image = image.with_attr("title", title.clone());
                }
                Ok(image)
            }
            Node::Break => Ok(VNode::element("br")),
            other => Err(self.unexpected(other, "inline content")),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive the render tree of a semantic tree
pub fn derive_render_tree(root: &Root) -> EvalResult<RenderTree> {
    Evaluator::new().evaluate(root)
}
