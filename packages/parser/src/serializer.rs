use crate::ast::*;
use crate::parser::{heading, list_marker};

/// Serializer converts a semantic tree back to canonical markup
///
/// Output is canonical rather than lossless: bullets are `*`, ordered
/// markers count up from the list start, blocks are separated by one blank
/// line and list item continuation lines are indented to the marker width.
/// Parsing the output yields the same tree.
pub struct Serializer {
    bullets: [char; 2],
    delimiters: [char; 2],
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            bullets: ['*', '-'],
            delimiters: ['.', ')'],
        }
    }

    /// Serialize a document to markup
    pub fn serialize(&self, root: &Root) -> String {
        self.serialize_blocks(&root.children, "\n\n")
    }

    fn serialize_blocks(&self, blocks: &[Node], separator: &str) -> String {
        let mut parts = Vec::with_capacity(blocks.len());
        // Adjacent lists of the same kind alternate markers so they stay separate
        let mut previous_list: Option<(bool, usize)> = None;

        for block in blocks {
            match block {
                Node::List { ordered, .. } => {
                    let variant = match previous_list {
                        Some((prev_ordered, prev_variant)) if prev_ordered == *ordered => {
                            1 - prev_variant
                        }
                        _ => 0,
                    };
                    parts.push(self.serialize_list(block, variant));
                    previous_list = Some((*ordered, variant));
                }
                other => {
                    parts.push(self.serialize_block(other));
                    previous_list = None;
                }
            }
        }

        parts.join(separator)
    }

    fn serialize_block(&self, node: &Node) -> String {
        match node {
            Node::Heading { depth, children } => {
                let hashes = "#".repeat((*depth).clamp(1, 6) as usize);
                let content = serialize_inline(children);
                if content.is_empty() {
                    hashes
                } else {
                    format!("{} {}", hashes, content.replace('\n', " "))
                }
            }
            Node::Paragraph { children } => escape_line_starts(&serialize_inline(children)),
            Node::List { .. } => self.serialize_list(node, 0),
            Node::ListItem { children } => self.serialize_blocks(children, "\n\n"),
            inline => escape_line_starts(&serialize_inline(std::slice::from_ref(inline))),
        }
    }

    fn serialize_list(&self, node: &Node, variant: usize) -> String {
        let (ordered, start, spread, items) = match node {
            Node::List {
                ordered,
                start,
                spread,
                children,
            } => (*ordered, start.unwrap_or(1), *spread, children),
            _ => return String::new(),
        };

        let separator = if spread { "\n\n" } else { "\n" };
        let mut rendered = Vec::with_capacity(items.len());

        for (i, item) in items.iter().enumerate() {
            let marker = if ordered {
                format!("{}{}", start as usize + i, self.delimiters[variant])
            } else {
                self.bullets[variant].to_string()
            };

            let body = match item {
                Node::ListItem { children } => self.serialize_blocks(children, separator),
                other => self.serialize_block(other),
            };

            rendered.push(indent_item(&marker, &body));
        }

        rendered.join(separator)
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefix the first line with the marker and indent the rest to its width
fn indent_item(marker: &str, body: &str) -> String {
    if body.is_empty() {
        return marker.to_string();
    }

    let padding = " ".repeat(marker.len() + 1);
    let mut out = String::new();
    for (i, line) in body.split('\n').enumerate() {
        if i == 0 {
            out.push_str(marker);
            out.push(' ');
            out.push_str(line);
        } else {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&padding);
                out.push_str(line);
            }
        }
    }
    out
}

pub(crate) fn serialize_inline(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_inline(node, &mut out);
    }
    out
}

fn write_inline(node: &Node, out: &mut String) {
    match node {
        Node::Text { value } => out.push_str(&escape_text(value)),
        Node::Strong { children } => {
            out.push_str("**");
            out.push_str(&serialize_inline(children));
            out.push_str("**");
        }
        Node::Emphasis { children } => {
            out.push('*');
            out.push_str(&serialize_inline(children));
            out.push('*');
        }
        Node::InlineCode { value } => {
            out.push('`');
            out.push_str(value);
            out.push('`');
        }
        Node::Link {
            url,
            title,
            children,
        } => {
            out.push('[');
            out.push_str(&serialize_inline(children));
            out.push_str("](");
            write_destination(url, title.as_deref(), out);
        }
        Node::Image { url, alt, title } => {
            out.push_str("![");
            out.push_str(&escape_text(alt));
            out.push_str("](");
            write_destination(url, title.as_deref(), out);
        }
        Node::Break => out.push_str("\\\n"),
        // Block nodes nested in inline position degrade to their text
        block => out.push_str(&escape_text(&block.text_content())),
    }
}

fn write_destination(url: &str, title: Option<&str>, out: &mut String) {
    for ch in url.chars() {
        if matches!(ch, '\\' | ')') {
            out.push('\\');
        }
        out.push(ch);
    }
    if let Some(title) = title {
        out.push_str(" \"");
        out.push_str(title);
        out.push('"');
    }
    out.push(')');
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '*' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape line starts that would otherwise parse as a heading or list marker
fn escape_line_starts(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if heading(line).is_some() {
                let at = line.len() - line.trim_start_matches(' ').len();
                format!("{}\\{}", &line[..at], &line[at..])
            } else if let Some(marker) = list_marker(line) {
                // escape the bullet itself, or the delimiter after the digits
                let at = marker.width - 2;
                format!("{}\\{}", &line[..at], &line[at..])
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serialize a document to canonical markup
pub fn serialize(root: &Root) -> String {
    Serializer::new().serialize(root)
}
