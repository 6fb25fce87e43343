//! Document model
//!
//! The in-memory representation shared by the parser and the serializer:
//!
//! - [`Document`]: a document kind plus an ordered list of blocks
//! - [`Block`]: a named section, either a multimap of [`Pair`]s or raw text
//! - [`Pair`]: key, value and an enabled flag
//!
//! All types are plain data (serde serializable), which is what crosses the
//! boundary between callers and the worker pool.

pub mod elements;
pub mod summary;

pub use elements::block::{Block, BlockBody};
pub use elements::document::{Document, DocumentBuilder, DocumentKind};
pub use elements::pair::Pair;
pub use summary::{RequestSummary, RequestType};
