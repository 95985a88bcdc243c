use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum list nesting accepted by the parser
pub const MAX_NESTING_DEPTH: usize = 16;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Lists nested deeper than {limit} levels at line {line}")]
    NestingTooDeep { line: usize, offset: usize, limit: usize },
}

impl ParseError {
    pub fn nesting_too_deep(line: usize, offset: usize) -> Self {
        Self::NestingTooDeep {
            line,
            offset,
            limit: MAX_NESTING_DEPTH,
        }
    }

    /// Byte offset of the error in the source (if known)
    pub fn offset(&self) -> usize {
        match self {
            ParseError::NestingTooDeep { offset, .. } => *offset,
        }
    }
}

/// Pretty-print an error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let start = error.offset().min(source.len().saturating_sub(1));
    let end = source[start..]
        .find('\n')
        .map(|i| start + i)
        .unwrap_or(source.len())
        .max(start + 1)
        .min(source.len().max(start + 1));

    let mut output = Vec::new();
    let report = Report::build(ReportKind::Error, filename, start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, start..end))
                .with_color(Color::Red)
                .with_message(match error {
                    ParseError::NestingTooDeep { limit, .. } => {
                        format!("list nesting exceeds {}", limit)
                    }
                }),
        )
        .finish();

    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}
