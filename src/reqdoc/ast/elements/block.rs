//! Block element
//!
//!     A block is a named, delimited section of a document. Its body is either a
//!     multimap (ordered pairs) or raw text kept byte for byte. Which shape a
//!     name gets is decided by the grammar for the document kind; the model
//!     itself does not enforce it.

use crate::reqdoc::ast::Pair;
use crate::reqdoc::grammar::BlockShape;
use serde::{Deserialize, Serialize};

/// Body of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockBody {
    Multimap(Vec<Pair>),
    Raw(String),
}

/// A named section of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub body: BlockBody,
}

impl Block {
    pub fn multimap(name: impl Into<String>, pairs: Vec<Pair>) -> Self {
        Self {
            name: name.into(),
            body: BlockBody::Multimap(pairs),
        }
    }

    pub fn raw(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: BlockBody::Raw(text.into()),
        }
    }

    pub fn shape(&self) -> BlockShape {
        match self.body {
            BlockBody::Multimap(_) => BlockShape::Multimap,
            BlockBody::Raw(_) => BlockShape::Raw,
        }
    }

    /// Pairs of a multimap block, `None` for raw blocks
    pub fn pairs(&self) -> Option<&[Pair]> {
        match &self.body {
            BlockBody::Multimap(pairs) => Some(pairs),
            BlockBody::Raw(_) => None,
        }
    }

    pub fn pairs_mut(&mut self) -> Option<&mut Vec<Pair>> {
        match &mut self.body {
            BlockBody::Multimap(pairs) => Some(pairs),
            BlockBody::Raw(_) => None,
        }
    }

    /// Text of a raw block, `None` for multimap blocks
    pub fn text(&self) -> Option<&str> {
        match &self.body {
            BlockBody::Raw(text) => Some(text),
            BlockBody::Multimap(_) => None,
        }
    }

    /// Value of the first enabled pair with this key
    pub fn value(&self, key: &str) -> Option<&str> {
        self.pairs()?
            .iter()
            .find(|pair| pair.enabled && pair.key == key)
            .map(|pair| pair.value.as_str())
    }

    /// True if the block has no pairs or no text
    pub fn is_empty(&self) -> bool {
        match &self.body {
            BlockBody::Multimap(pairs) => pairs.is_empty(),
            BlockBody::Raw(text) => text.is_empty(),
        }
    }
}
