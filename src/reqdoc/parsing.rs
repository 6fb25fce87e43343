//! Parsing module for the reqdoc format
//!
//! Source text goes through two stages:
//! 1. **Lexing**: logos tokens grouped into numbered [`SourceLine`]s
//!    (see [lexing](crate::reqdoc::lexing))
//! 2. **Parsing**: a line state machine that reads blocks off a [`LineCursor`],
//!    using the small composable functions in [`combinators`]
//!
//! The grammar is the same for every document kind. The kind only decides which
//! block names are interpreted (and with which body shape); everything else is
//! passed through as a raw block.
//!
//! ## Error policy
//!
//! The only fatal condition is an unterminated block, reported as a
//! [`SyntaxError`] with the block name and the 1-based line of its begin
//! marker. Stray end markers, pair lines without a separator and unknown
//! blocks are all accepted.
//!
//! [`SourceLine`]: crate::reqdoc::lexing::SourceLine

pub mod combinators;
pub mod cursor;
pub mod parser;

pub use cursor::LineCursor;
pub use parser::Parser;

use crate::reqdoc::ast::{Document, DocumentKind};
use crate::reqdoc::error::SyntaxError;

/// Parse source text as a document of the given kind
pub fn parse_document(source: &str, kind: DocumentKind) -> Result<Document, SyntaxError> {
    Parser::new(source, kind).parse()
}

/// Parse a request file
pub fn parse_request(source: &str) -> Result<Document, SyntaxError> {
    parse_document(source, DocumentKind::Request)
}

/// Parse a folder settings file
pub fn parse_folder(source: &str) -> Result<Document, SyntaxError> {
    parse_document(source, DocumentKind::Folder)
}

/// Parse a collection root file
pub fn parse_collection_root(source: &str) -> Result<Document, SyntaxError> {
    parse_document(source, DocumentKind::CollectionRoot)
}

/// Parse an environment file
pub fn parse_environment(source: &str) -> Result<Document, SyntaxError> {
    parse_document(source, DocumentKind::Environment)
}
