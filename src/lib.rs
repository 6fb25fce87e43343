//! # reqdoc
//!
//! Parser, serializer and background worker pool for the reqdoc format, the
//! block-structured text files that describe requests, folders, collections
//! and environments.
//!
//! A document is a sequence of named blocks:
//!
//! ```text
//! headers
//! content-type: application/json
//! //x-debug: 1
//! /headers
//! ```
//!
//! Parsing keeps block and pair order, disabled pairs and unknown blocks;
//! serializing emits canonical text. See [`reqdoc::parsing`] and
//! [`reqdoc::formats`] for the synchronous API and [`reqdoc::pool`] for the
//! off-thread one.
//!
//! ## Testing
//!
//! Sample documents live in `docs/samples/` and are available through
//! [`reqdoc::testing::Samples`].

pub mod reqdoc;

pub use reqdoc::ast::{Block, BlockBody, Document, DocumentKind, Pair};
pub use reqdoc::error::{SyntaxError, TaskError, TransformError};
pub use reqdoc::formats::{serialize_document, try_serialize_document};
pub use reqdoc::parsing::parse_document;
pub use reqdoc::pool::{TaskHandle, WorkerPool};
