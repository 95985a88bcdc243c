use crate::ast::*;
use crate::error::{ParseError, ParseResult, MAX_NESTING_DEPTH};
use crate::tokenizer::{tokenize, Token};

/// One physical source line, possibly dedented out of a list item
#[derive(Debug, Clone)]
struct SourceLine {
    text: String,
    number: usize,
    offset: usize,
}

impl SourceLine {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    fn indent(&self) -> usize {
        leading_spaces(&self.text)
    }

    fn dedent(&self, width: usize) -> SourceLine {
        let strip = self.indent().min(width);
        SourceLine {
            text: self.text[strip..].to_string(),
            number: self.number,
            offset: self.offset + strip,
        }
    }

    /// Line content after a list marker of `width` columns
    fn after_marker(&self, width: usize) -> SourceLine {
        let strip = width.min(self.text.len());
        SourceLine {
            text: self.text.get(strip..).unwrap_or_default().to_string(),
            number: self.number,
            offset: self.offset + strip,
        }
    }
}

/// List marker found at the start of a line
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ListMarker {
    pub indent: usize,
    /// Column where item content starts
    pub width: usize,
    pub ordered: bool,
    pub number: Option<u32>,
    /// `*`, `-`, `+` for bullets; `.` or `)` for ordered markers
    pub delimiter: char,
}

fn leading_spaces(text: &str) -> usize {
    text.len() - text.trim_start_matches(' ').len()
}

/// Detect a list marker (`* `, `- `, `+ `, `1. `, `1) `)
pub(crate) fn list_marker(text: &str) -> Option<ListMarker> {
    let indent = leading_spaces(text);
    let rest = &text[indent..];
    let mut chars = rest.char_indices();
    let (_, first) = chars.next()?;

    let (marker_len, ordered, number, delimiter) = if matches!(first, '*' | '-' | '+') {
        (1, false, None, first)
    } else if first.is_ascii_digit() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 9 {
            return None;
        }
        let delimiter = rest[digits..].chars().next()?;
        if delimiter != '.' && delimiter != ')' {
            return None;
        }
        let number = rest[..digits].parse::<u32>().ok()?;
        (digits + 1, true, Some(number), delimiter)
    } else {
        return None;
    };

    let after = &rest[marker_len..];
    if !after.is_empty() && !after.starts_with(' ') {
        return None;
    }

    Some(ListMarker {
        indent,
        width: indent + marker_len + 1,
        ordered,
        number,
        delimiter,
    })
}

/// Detect an ATX heading; returns depth and content
pub(crate) fn heading(text: &str) -> Option<(u8, &str)> {
    let trimmed = text.trim_start_matches(' ');
    if leading_spaces(text) > 3 {
        return None;
    }
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &trimmed[hashes..];
    if rest.is_empty() {
        return Some((hashes as u8, ""));
    }
    if !rest.starts_with(' ') {
        return None;
    }
    Some((hashes as u8, rest.trim()))
}

/// Parser for the pane markup dialect
pub struct Parser {
    lines: Vec<SourceLine>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for (number, raw) in source.split('\n').enumerate() {
            let text = raw.strip_suffix('\r').unwrap_or(raw);
            lines.push(SourceLine {
                text: text.to_string(),
                number: number + 1,
                offset,
            });
            offset += raw.len() + 1;
        }
        Self { lines }
    }

    /// Parse a complete document
    pub fn parse_document(&mut self) -> ParseResult<Root> {
        let (children, _) = parse_blocks(&self.lines, 0)?;
        Ok(Root { children })
    }
}

/// Parse a run of lines into blocks. The flag reports whether blank lines
/// separated any two blocks (used for list looseness).
fn parse_blocks(lines: &[SourceLine], depth: usize) -> ParseResult<(Vec<Node>, bool)> {
    let mut blocks = Vec::new();
    let mut separated = false;
    let mut pending_gap = false;
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];

        if line.is_blank() {
            if !blocks.is_empty() {
                pending_gap = true;
            }
            i += 1;
            continue;
        }

        if pending_gap {
            separated = true;
            pending_gap = false;
        }

        if let Some((level, content)) = heading(&line.text) {
            blocks.push(Node::Heading {
                depth: level,
                children: parse_inline(content),
            });
            i += 1;
        } else if list_marker(&line.text).is_some() {
            let (list, next) = parse_list(lines, i, depth)?;
            blocks.push(list);
            i = next;
        } else {
            let mut content = String::new();
            while i < lines.len() {
                let current = &lines[i];
                if current.is_blank()
                    || (!content.is_empty()
                        && (heading(&current.text).is_some()
                            || list_marker(&current.text).is_some()))
                {
                    break;
                }
                if !content.is_empty() {
                    content.push('\n');
                }
                content.push_str(current.text.trim_start());
                i += 1;
            }
            blocks.push(Node::Paragraph {
                children: parse_inline(&content),
            });
        }
    }

    Ok((blocks, separated))
}

fn parse_list(lines: &[SourceLine], start: usize, depth: usize) -> ParseResult<(Node, usize)> {
    let first_line = &lines[start];
    if depth >= MAX_NESTING_DEPTH {
        return Err(ParseError::nesting_too_deep(first_line.number, first_line.offset));
    }

    let first = match list_marker(&first_line.text) {
        Some(marker) => marker,
        None => return Ok((Node::list(false, vec![]), start + 1)),
    };

    let mut items = Vec::new();
    let mut spread = false;
    let mut i = start;

    loop {
        let marker = match list_marker(&lines[i].text) {
            Some(marker) => marker,
            None => break,
        };

        let mut item_lines = vec![lines[i].after_marker(marker.width)];
        let mut j = i + 1;

        while j < lines.len() {
            let line = &lines[j];
            if line.is_blank() {
                let next = (j..lines.len()).find(|&k| !lines[k].is_blank());
                match next {
                    Some(k) if lines[k].indent() >= marker.width => {
                        for blank in &lines[j..k] {
                            item_lines.push(blank.dedent(marker.width));
                        }
                        j = k;
                    }
                    _ => break,
                }
            } else if line.indent() >= marker.width {
                item_lines.push(line.dedent(marker.width));
                j += 1;
            } else if list_marker(&line.text).is_some() || heading(&line.text).is_some() {
                break;
            } else if item_lines.last().map(|l| !l.is_blank()).unwrap_or(false) {
                // lazy paragraph continuation
                item_lines.push(line.dedent(line.indent()));
                j += 1;
            } else {
                break;
            }
        }

        let (children, separated) = parse_blocks(&item_lines, depth + 1)?;
        if separated {
            spread = true;
        }
        items.push(Node::ListItem { children });
        i = j;

        // Next sibling: same kind and delimiter, shallower than the item content
        let next = (i..lines.len()).find(|&k| !lines[k].is_blank());
        match next {
            Some(k) => {
                let sibling = list_marker(&lines[k].text).filter(|m| {
                    m.ordered == first.ordered
                        && m.delimiter == first.delimiter
                        && m.indent < first.width
                });
                if sibling.is_none() {
                    break;
                }
                if k > i {
                    spread = true;
                }
                i = k;
            }
            None => break,
        }
    }

    let list = Node::List {
        ordered: first.ordered,
        start: first.number,
        spread,
        children: items,
    };
    Ok((list, i))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stop {
    DoubleStar,
    Star,
    Bracket,
}

/// Recursive-descent inline parser over the token stream
struct InlineParser<'src> {
    tokens: Vec<(Token<'src>, std::ops::Range<usize>)>,
    pos: usize,
}

impl<'src> InlineParser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            tokens: tokenize(source),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn eat(&mut self, expected: &Token<'src>) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn is_stop(token: &Token<'src>, stops: &[Stop]) -> bool {
        stops.iter().any(|stop| match stop {
            Stop::DoubleStar => *token == Token::DoubleStar,
            Stop::Star => *token == Token::Star,
            Stop::Bracket => matches!(token, Token::BracketClose | Token::LinkSeparator),
        })
    }

    fn parse_sequence(&mut self, stops: &[Stop]) -> Vec<Node> {
        let mut out = Vec::new();

        while let Some(token) = self.peek().cloned() {
            if Self::is_stop(&token, stops) {
                break;
            }
            self.pos += 1;

            match token {
                Token::Text(s) | Token::Escaped(s) => push_text(&mut out, s),
                Token::Newline => push_text(&mut out, "\n"),
                Token::HardBreak => out.push(Node::Break),
                Token::Code(s) => out.push(Node::InlineCode {
                    value: s.to_string(),
                }),
                Token::DoubleStar => {
                    match self.parse_delimited(stops, Stop::DoubleStar, Token::DoubleStar) {
                        Some(children) => out.push(Node::Strong { children }),
                        None => push_text(&mut out, "**"),
                    }
                }
                Token::Star => match self.parse_delimited(stops, Stop::Star, Token::Star) {
                    Some(children) => out.push(Node::Emphasis { children }),
                    None => push_text(&mut out, "*"),
                },
                Token::BracketOpen => match self.parse_link(stops) {
                    Some(link) => out.push(link),
                    None => push_text(&mut out, "["),
                },
                Token::ImageOpen => match self.parse_image(stops) {
                    Some(image) => out.push(image),
                    None => push_text(&mut out, "!["),
                },
                other => push_text(&mut out, other.literal()),
            }
        }

        out
    }

    /// Parse up to a closing delimiter; restores position on failure
    fn parse_delimited(&mut self, stops: &[Stop], own: Stop, closer: Token<'src>) -> Option<Vec<Node>> {
        let save = self.pos;
        let mut inner_stops = stops.to_vec();
        inner_stops.push(own);

        let children = self.parse_sequence(&inner_stops);
        if !children.is_empty() && self.eat(&closer) {
            Some(children)
        } else {
            self.pos = save;
            None
        }
    }

    fn parse_label(&mut self, stops: &[Stop]) -> Option<Vec<Node>> {
        let mut inner_stops = stops.to_vec();
        inner_stops.push(Stop::Bracket);
        let children = self.parse_sequence(&inner_stops);
        if self.eat(&Token::LinkSeparator) {
            Some(children)
        } else {
            None
        }
    }

    /// Destination after `](`: raw text up to `)`, split into url and title
    fn parse_destination(&mut self) -> Option<(String, Option<String>)> {
        let mut raw = String::new();
        loop {
            let token = self.peek()?.clone();
            self.pos += 1;
            match token {
                Token::ParenClose => break,
                Token::Newline | Token::HardBreak => return None,
                Token::Code(s) => {
                    raw.push('`');
                    raw.push_str(s);
                    raw.push('`');
                }
                other => raw.push_str(other.literal()),
            }
        }

        let raw = raw.trim();
        if let Some(stripped) = raw.strip_suffix('"') {
            if let Some(split) = stripped.find(" \"") {
                let url = stripped[..split].trim_end().to_string();
                let title = stripped[split + 2..].to_string();
                return Some((url, Some(title)));
            }
        }
        Some((raw.to_string(), None))
    }

    fn parse_link(&mut self, stops: &[Stop]) -> Option<Node> {
        let save = self.pos;
        let parsed = self
            .parse_label(stops)
            .and_then(|children| self.parse_destination().map(|dest| (children, dest)));

        match parsed {
            Some((children, (url, title))) => Some(Node::Link { url, title, children }),
            None => {
                self.pos = save;
                None
            }
        }
    }

    fn parse_image(&mut self, stops: &[Stop]) -> Option<Node> {
        let save = self.pos;
        let parsed = self
            .parse_label(stops)
            .and_then(|children| self.parse_destination().map(|dest| (children, dest)));

        match parsed {
            Some((children, (url, title))) => {
                let alt = children.iter().map(Node::text_content).collect::<String>();
                Some(Node::Image { url, alt, title })
            }
            None => {
                self.pos = save;
                None
            }
        }
    }
}

fn push_text(out: &mut Vec<Node>, value: &str) {
    if let Some(Node::Text { value: last }) = out.last_mut() {
        last.push_str(value);
    } else {
        out.push(Node::text(value));
    }
}

/// Parse inline content (paragraph or heading body)
pub fn parse_inline(source: &str) -> Vec<Node> {
    if source.is_empty() {
        return Vec::new();
    }
    // With no stop tokens the top-level sequence consumes every token;
    // stray closers fall through as literal text.
    InlineParser::new(source).parse_sequence(&[])
}

/// Parse a document
pub fn parse(source: &str) -> ParseResult<Root> {
    Parser::new(source).parse_document()
}
