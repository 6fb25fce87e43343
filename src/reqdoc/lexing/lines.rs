//! Line grouping
//!
//! Groups the flat token stream into numbered source lines. A line's span covers
//! its text but not its terminating newline, so `source[line.span]` is exactly
//! the line as written.

use crate::reqdoc::lexing::tokens::{tokenize, Token};
use std::ops::Range;

/// One line of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// The line content without its newline (a trailing `\r` is kept)
    pub text: &'a str,
    /// Byte range of `text` in the source
    pub span: Range<usize>,
}

impl SourceLine<'_> {
    /// True if the line contains nothing but whitespace
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Split source text into numbered lines.
///
/// A trailing newline does not produce an extra empty line, so `"a\n"` and `"a"`
/// both yield one line, while `"\n"` yields a single empty line.
pub fn split_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut lines = Vec::new();
    let mut pending: Option<Range<usize>> = None;
    let mut line_start = 0;

    for (token, span) in tokenize(source) {
        match token {
            Token::Text => pending = Some(span),
            Token::Newline => {
                let range = pending.take().unwrap_or(line_start..line_start);
                lines.push(SourceLine {
                    number: lines.len() + 1,
                    text: &source[range.clone()],
                    span: range,
                });
                line_start = span.end;
            }
        }
    }

    if let Some(range) = pending {
        lines.push(SourceLine {
            number: lines.len() + 1,
            text: &source[range.clone()],
            span: range,
        });
    }

    lines
}
