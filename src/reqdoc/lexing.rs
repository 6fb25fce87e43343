//! Lexer
//!
//! This module turns source text into the indexed line stream the parser works on.
//!
//! Structure:
//!     Tokenization is done by the logos lexer. The format is line oriented, so the
//! token set is tiny: newlines and runs of anything else. Those tokens are then
//! grouped into [`SourceLine`]s that keep their 1-based line number and the exact
//! byte span they cover, which is what lets raw blocks be sliced out of the
//! source unmodified.
//!
//! The pipeline consists of:
//! 1. Core tokenization using logos ./tokens.rs
//! 2. Line grouping (tokens -> numbered lines with spans) ./lines.rs
//! 3. Line classification (blank / end marker / content, pair splitting)
//!    ./line_classification.rs
//!
//! Classification is context free on purpose: whether a content line is a block
//! name, a pair or raw text depends on where the parser is, so that decision is
//! left to the parser.

pub mod line_classification;
pub mod lines;
pub mod tokens;

pub use line_classification::{classify_line, split_pair, LineClass, PairLine};
pub use lines::{split_lines, SourceLine};
pub use tokens::{tokenize, Token};
