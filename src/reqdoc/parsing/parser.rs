//! Line state machine parser
//!
//! At the top level the parser is always between blocks: blank lines are
//! skipped, a stray end marker is reported and skipped, and any other line
//! opens a block. The block's shape for the document kind then decides which
//! body combinator reads up to its end marker.

use crate::reqdoc::ast::{Block, Document, DocumentKind};
use crate::reqdoc::error::SyntaxError;
use crate::reqdoc::grammar::{self, BlockShape};
use crate::reqdoc::lexing::{classify_line, LineClass};
use crate::reqdoc::parsing::combinators::{block_name, multimap_body, raw_body, skip_blank_lines};
use crate::reqdoc::parsing::LineCursor;
use tracing::{debug, trace, warn};

pub struct Parser<'a> {
    source: &'a str,
    kind: DocumentKind,
    cursor: LineCursor<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, kind: DocumentKind) -> Self {
        Self {
            source,
            kind,
            cursor: LineCursor::new(source),
        }
    }

    pub fn parse(mut self) -> Result<Document, SyntaxError> {
        let mut document = Document::new(self.kind);

        loop {
            skip_blank_lines(&mut self.cursor);
            let Some(line) = self.cursor.advance() else {
                break;
            };

            // Classify the trimmed text so an indented `/name` is a marker too
            match classify_line(block_name(line.text)) {
                LineClass::Blank => {}
                LineClass::EndMarker(name) => {
                    warn!(
                        kind = %self.kind,
                        line = line.number,
                        marker = name,
                        "skipping end marker with no open block"
                    );
                }
                LineClass::Content(name) => {
                    let block = self.block(name, line.number)?;
                    document.push_block(block);
                }
            }
        }

        debug!(
            kind = %self.kind,
            blocks = document.blocks.len(),
            "parsed document"
        );
        Ok(document)
    }

    fn block(&mut self, name: &str, begin_line: usize) -> Result<Block, SyntaxError> {
        if grammar::is_recognized(self.kind, name) {
            trace!(block = name, line = begin_line, "reading block");
        } else {
            debug!(
                kind = %self.kind,
                block = name,
                line = begin_line,
                "passing through unrecognized block"
            );
        }

        match grammar::shape_of(self.kind, name) {
            BlockShape::Multimap => {
                let pairs = multimap_body(&mut self.cursor, self.kind, name, begin_line)?;
                Ok(Block::multimap(name, pairs))
            }
            BlockShape::Raw => {
                let text = raw_body(&mut self.cursor, self.source, name, begin_line)?;
                Ok(Block::raw(name, text))
            }
        }
    }
}
