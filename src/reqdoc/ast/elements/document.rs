//! Document element
//!
//!     The parsed representation of one reqdoc file. Blocks are kept in the
//!     order they were read; the serializer applies the canonical order for the
//!     kind when writing text back out, which is why equality that ignores
//!     block order is offered separately as [`Document::semantically_eq`].

use crate::reqdoc::ast::{Block, Pair};
use crate::reqdoc::grammar;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Which kind of file a document represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Request,
    Folder,
    CollectionRoot,
    Environment,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Request,
        DocumentKind::Folder,
        DocumentKind::CollectionRoot,
        DocumentKind::Environment,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Request => "request",
            DocumentKind::Folder => "folder",
            DocumentKind::CollectionRoot => "collection-root",
            DocumentKind::Environment => "environment",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "request" => Ok(DocumentKind::Request),
            "folder" => Ok(DocumentKind::Folder),
            "collection" | "collection-root" => Ok(DocumentKind::CollectionRoot),
            "environment" | "env" => Ok(DocumentKind::Environment),
            other => Err(format!("unknown document kind '{other}'")),
        }
    }
}

/// A parsed (or programmatically built) document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub blocks: Vec<Block>,
}

impl Document {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(kind: DocumentKind, blocks: Vec<Block>) -> Self {
        Self { kind, blocks }
    }

    pub fn builder(kind: DocumentKind) -> DocumentBuilder {
        DocumentBuilder {
            document: Self::new(kind),
        }
    }

    /// First block with this name
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.name == name)
    }

    pub fn block_mut(&mut self, name: &str) -> Option<&mut Block> {
        self.blocks.iter_mut().find(|block| block.name == name)
    }

    /// Every block with this name, in document order
    pub fn blocks_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Block> + 'a {
        self.blocks.iter().filter(move |block| block.name == name)
    }

    /// Pairs of the first block with this name, if it is a multimap
    pub fn pairs(&self, name: &str) -> Option<&[Pair]> {
        self.block(name)?.pairs()
    }

    /// Text of the first block with this name, if it is raw
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.block(name)?.text()
    }

    /// Value of the first enabled `key` in the first block named `block`
    pub fn value(&self, block: &str, key: &str) -> Option<&str> {
        self.block(block)?.value(key)
    }

    /// The `seq` field of the `meta` block, uninterpreted
    pub fn sequence_hint(&self) -> Option<&str> {
        self.value("meta", "seq")
    }

    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Remove every block with this name, returning how many were removed
    pub fn remove_blocks(&mut self, name: &str) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|block| block.name != name);
        before - self.blocks.len()
    }

    /// Blocks in canonical order for this document's kind.
    ///
    /// The sort is stable: blocks of equal rank (repeated names, unrecognized
    /// names) keep their document order.
    pub fn canonical_blocks(&self) -> Vec<&Block> {
        self.canonical_blocks_for(self.kind)
    }

    /// Blocks in canonical order for another kind, as used by `stringify_*`
    pub fn canonical_blocks_for(&self, kind: DocumentKind) -> Vec<&Block> {
        let mut blocks: Vec<&Block> = self.blocks.iter().collect();
        sort_canonical(kind, &mut blocks);
        blocks
    }

    /// Reorder blocks into canonical order
    pub fn into_canonical(mut self) -> Self {
        sort_canonical(self.kind, &mut self.blocks);
        self
    }

    /// Equality that ignores source block order.
    ///
    /// Kinds, block names, pairs (including order and enabled flags) and raw
    /// text must all match once both documents are in canonical order.
    pub fn semantically_eq(&self, other: &Document) -> bool {
        self.kind == other.kind && self.canonical_blocks() == other.canonical_blocks()
    }
}

// Stable, so blocks of equal rank keep their relative order
fn sort_canonical<B: Borrow<Block>>(kind: DocumentKind, blocks: &mut [B]) {
    blocks.sort_by_key(|block| grammar::canonical_rank(kind, &block.borrow().name));
}

/// Builder for documents constructed in code rather than parsed
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn block(mut self, block: Block) -> Self {
        self.document.blocks.push(block);
        self
    }

    pub fn multimap(self, name: impl Into<String>, pairs: Vec<Pair>) -> Self {
        self.block(Block::multimap(name, pairs))
    }

    pub fn raw(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.block(Block::raw(name, text))
    }

    /// Add a multimap block only if it has pairs.
    ///
    /// Mirrors how collaborators drop empty sections when writing a document.
    pub fn multimap_if_any(self, name: impl Into<String>, pairs: Vec<Pair>) -> Self {
        if pairs.is_empty() {
            self
        } else {
            self.multimap(name, pairs)
        }
    }

    /// Add a raw block only if it has text
    pub fn raw_if_any(self, name: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        if text.is_empty() {
            self
        } else {
            self.raw(name, text)
        }
    }

    pub fn build(self) -> Document {
        self.document
    }
}

impl From<DocumentBuilder> for Document {
    fn from(builder: DocumentBuilder) -> Self {
        builder.build()
    }
}

impl Extend<Block> for Document {
    fn extend<T: IntoIterator<Item = Block>>(&mut self, iter: T) {
        self.blocks.extend(iter);
    }
}
