//! Element types of the document model

pub mod block;
pub mod document;
pub mod pair;
