use serde::{Deserialize, Serialize};

/// Root of the semantic tree for one pane document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub children: Vec<Node>,
}

/// Semantic node (structure-first representation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    /// ATX heading, depth 1..=6
    Heading { depth: u8, children: Vec<Node> },

    /// Paragraph of inline content
    Paragraph { children: Vec<Node> },

    /// Bullet or ordered list; children are always `ListItem`
    List {
        ordered: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<u32>,
        /// Loose list (blank lines between items)
        #[serde(default)]
        spread: bool,
        children: Vec<Node>,
    },

    /// List item; children are blocks
    ListItem { children: Vec<Node> },

    /// Plain text run
    Text { value: String },

    /// `**strong**`
    Strong { children: Vec<Node> },

    /// `*emphasis*`
    Emphasis { children: Vec<Node> },

    /// `` `code` ``, also used for inline widgets such as `youtube(id|title)`
    InlineCode { value: String },

    /// `[text](url "title")`
    Link {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        children: Vec<Node>,
    },

    /// `![alt](url "title")`
    Image {
        url: String,
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },

    /// Hard line break
    Break,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Node::ListItem { children }
    }

    pub fn list(ordered: bool, children: Vec<Node>) -> Self {
        Node::List {
            ordered,
            start: if ordered { Some(1) } else { None },
            spread: false,
            children,
        }
    }

    /// Get children (if this node can have them)
    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::List { children, .. }
            | Node::ListItem { children }
            | Node::Strong { children }
            | Node::Emphasis { children }
            | Node::Link { children, .. } => Some(children),
            Node::Text { .. } | Node::InlineCode { .. } | Node::Image { .. } | Node::Break => None,
        }
    }

    /// Get mutable children (if this node can have them)
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::List { children, .. }
            | Node::ListItem { children }
            | Node::Strong { children }
            | Node::Emphasis { children }
            | Node::Link { children, .. } => Some(children),
            Node::Text { .. } | Node::InlineCode { .. } | Node::Image { .. } | Node::Break => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Node::List { .. })
    }

    pub fn is_list_item(&self) -> bool {
        matches!(self, Node::ListItem { .. })
    }

    /// Block-level nodes may appear directly under the root or a list item
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Node::Heading { .. } | Node::Paragraph { .. } | Node::List { .. }
        )
    }

    /// HTML tag this node renders to; `None` for text
    pub fn html_tag(&self) -> Option<String> {
        let tag = match self {
            Node::Heading { depth, .. } => return Some(format!("h{}", depth)),
            Node::Paragraph { .. } => "p",
            Node::List { ordered: true, .. } => "ol",
            Node::List { ordered: false, .. } => "ul",
            Node::ListItem { .. } => "li",
            Node::Strong { .. } => "strong",
            Node::Emphasis { .. } => "em",
            Node::InlineCode { .. } => "code",
            Node::Link { .. } => "a",
            Node::Image { .. } => "img",
            Node::Break => "br",
            Node::Text { .. } => return None,
        };
        Some(tag.to_string())
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text { value } | Node::InlineCode { value } => out.push_str(value),
            Node::Image { alt, .. } => out.push_str(alt),
            Node::Break => out.push('\n'),
            _ => {
                if let Some(children) = self.children() {
                    for child in children {
                        child.collect_text(out);
                    }
                }
            }
        }
    }
}

impl Root {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }

    /// Find a node by child-index path
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut current = self.children.get(*first)?;
        for idx in rest {
            current = current.children()?.get(*idx)?;
        }
        Some(current)
    }

    /// Children vector of the container at `path` (empty path = root)
    pub fn children_at(&self, path: &[usize]) -> Option<&Vec<Node>> {
        if path.is_empty() {
            return Some(&self.children);
        }
        self.node_at(path)?.children()
    }

    /// Mutable children vector of the container at `path` (empty path = root)
    pub fn children_at_mut(&mut self, path: &[usize]) -> Option<&mut Vec<Node>> {
        let mut children = &mut self.children;
        for idx in path {
            children = children.get_mut(*idx)?.children_mut()?;
        }
        Some(children)
    }

    /// Detach the node at `path`
    pub fn remove_at(&mut self, path: &[usize]) -> Option<Node> {
        let (last, parent) = path.split_last()?;
        let children = self.children_at_mut(parent)?;
        if *last < children.len() {
            Some(children.remove(*last))
        } else {
            None
        }
    }

    /// Insert a node into the container at `parent`, clamping the index
    pub fn insert_at(&mut self, parent: &[usize], index: usize, node: Node) -> bool {
        match self.children_at_mut(parent) {
            Some(children) => {
                let index = index.min(children.len());
                children.insert(index, node);
                true
            }
            None => false,
        }
    }

    /// True when the top-level block at `outer` is a list holding item `idx`
    pub fn is_list_item_at(&self, outer: usize, idx: usize) -> bool {
        matches!(
            self.children.get(outer),
            Some(Node::List { children, .. }) if idx < children.len()
        )
    }
}
