pub mod ast;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

#[cfg(test)]
mod tests_serializer;

pub use ast::{Node, Root};
pub use error::{ParseError, ParseResult, MAX_NESTING_DEPTH};
pub use parser::{parse, parse_inline, Parser};
pub use serializer::{serialize, Serializer};
pub use tokenizer::{tokenize, Token};

#[cfg(feature = "pretty-errors")]
pub use error::format_error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serialize_basic() {
        let source = "## title\n\n...";
        let root = parse(source).unwrap();
        assert_eq!(serialize(&root), source);
    }
}
