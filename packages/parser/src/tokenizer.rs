use logos::{Lexer, Logos};
use std::fmt;

/// Inline token types for the markup dialect
///
/// Block structure is line based and handled by the parser directly;
/// only the content of a paragraph or heading goes through this lexer.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[token("**")]
    DoubleStar,

    #[token("*")]
    Star,

    #[token("![")]
    ImageOpen,

    #[token("[")]
    BracketOpen,

    #[token("](")]
    LinkSeparator,

    #[token("]")]
    BracketClose,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("!")]
    Bang,

    #[token("\"")]
    Quote,

    // Inline code keeps its raw body
    #[regex(r"`[^`\n]*`", strip_backticks)]
    Code(&'src str),

    #[token("\\\n")]
    HardBreak,

    #[regex(r"\\[^\n]", |lex| &lex.slice()[1..])]
    Escaped(&'src str),

    #[token("\n")]
    Newline,

    #[regex(r#"[^*\[\]()!"`\\\n]+"#, |lex| lex.slice())]
    Text(&'src str),
}

fn strip_backticks<'src>(lex: &mut Lexer<'src, Token<'src>>) -> &'src str {
    let slice = lex.slice();
    &slice[1..slice.len() - 1]
}

impl<'src> Token<'src> {
    /// Literal source text of a token that is being treated as plain text
    pub fn literal(&self) -> &'src str {
        match self {
            Token::DoubleStar => "**",
            Token::Star => "*",
            Token::ImageOpen => "![",
            Token::BracketOpen => "[",
            Token::LinkSeparator => "](",
            Token::BracketClose => "]",
            Token::ParenOpen => "(",
            Token::ParenClose => ")",
            Token::Bang => "!",
            Token::Quote => "\"",
            Token::HardBreak => "\n",
            Token::Newline => "\n",
            Token::Code(s) | Token::Escaped(s) | Token::Text(s) => s,
        }
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Code(s) => write!(f, "`{}`", s),
            Token::Escaped(s) => write!(f, "\\{}", s),
            Token::HardBreak => write!(f, "\\n"),
            Token::Newline => write!(f, "newline"),
            other => write!(f, "{}", other.literal()),
        }
    }
}

/// Tokenize inline source; unrecognized input (a lone trailing backslash)
/// becomes a text token so the lexer never fails.
pub fn tokenize(source: &str) -> Vec<(Token<'_>, std::ops::Range<usize>)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(_) => tokens.push((Token::Text(&source[span.clone()]), span)),
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        tokenize(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(kinds("hello world"), vec![Token::Text("hello world")]);
    }

    #[test]
    fn test_emphasis_delimiters() {
        assert_eq!(
            kinds("**bold** *it*"),
            vec![
                Token::DoubleStar,
                Token::Text("bold"),
                Token::DoubleStar,
                Token::Text(" "),
                Token::Star,
                Token::Text("it"),
                Token::Star,
            ]
        );
    }

    #[test]
    fn test_link_and_image() {
        assert_eq!(
            kinds("[a](b)"),
            vec![
                Token::BracketOpen,
                Token::Text("a"),
                Token::LinkSeparator,
                Token::Text("b"),
                Token::ParenClose,
            ]
        );
        assert_eq!(kinds("![")[0], Token::ImageOpen);
    }

    #[test]
    fn test_code_and_escapes() {
        assert_eq!(
            kinds("`youtube(x|y)` \\*"),
            vec![Token::Code("youtube(x|y)"), Token::Text(" "), Token::Escaped("*")]
        );
        assert_eq!(kinds("a\\\nb")[1], Token::HardBreak);
    }

    #[test]
    fn test_lone_backslash_is_text() {
        assert_eq!(kinds("end\\"), vec![Token::Text("end"), Token::Text("\\")]);
    }
}
