//! Line cursor
//!
//! A forward-only position over the lexed lines of one source. The parser and
//! the combinators share a single cursor, so whatever a combinator consumes is
//! gone for the caller.

use crate::reqdoc::lexing::{split_lines, SourceLine};

#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<SourceLine<'a>>,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lines: split_lines(source),
            pos: 0,
        }
    }

    pub fn peek(&self) -> Option<&SourceLine<'a>> {
        self.lines.get(self.pos)
    }

    /// Consume and return the current line
    pub fn advance(&mut self) -> Option<SourceLine<'a>> {
        let line = self.lines.get(self.pos).cloned();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Number of lines not yet consumed
    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_until_end() {
        let mut cursor = LineCursor::new("a\nb\n");
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.peek().map(|l| l.text), Some("a"));
        assert_eq!(cursor.advance().map(|l| l.number), Some(1));
        assert_eq!(cursor.advance().map(|l| l.text), Some("b"));
        assert!(cursor.is_at_end());
        assert!(cursor.advance().is_none());
        assert_eq!(cursor.remaining(), 0);
    }
}
