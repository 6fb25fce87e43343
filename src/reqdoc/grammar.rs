//! Grammar of the reqdoc format
//!
//! ```text
//! document   = { blank-line | block }
//! block      = begin-line body end-line
//! begin-line = <name> [trailing whitespace]
//! end-line   = "/" <name> [trailing whitespace]
//! body       = { pair-line } | raw-text
//! pair-line  = ["//"] key [":" value]
//! ```
//!
//! Which names are recognized, and whether their body is a multimap or raw
//! text, depends on the document kind. The per-kind tables below also define the
//! canonical block order used by the serializer: a block's rank is its index in
//! the table, and unrecognized blocks rank after every recognized one.

use crate::reqdoc::ast::DocumentKind;
use serde::{Deserialize, Serialize};

/// Prefix that marks a pair as present but disabled
pub const DISABLE_MARKER: &str = "//";

/// Prefix of an end marker line
pub const END_MARKER_PREFIX: char = '/';

/// Separator between key and value in a pair line
pub const PAIR_SEPARATOR: char = ':';

/// How a block body is read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockShape {
    /// Ordered key/value lines
    Multimap,
    /// Verbatim text up to the end marker
    Raw,
}

/// A recognized block name and its body shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpec {
    pub name: &'static str,
    pub shape: BlockShape,
}

const fn multimap(name: &'static str) -> BlockSpec {
    BlockSpec {
        name,
        shape: BlockShape::Multimap,
    }
}

const fn raw(name: &'static str) -> BlockSpec {
    BlockSpec {
        name,
        shape: BlockShape::Raw,
    }
}

/// Method blocks carry `url`, `body` and `auth` of a request
pub const HTTP_METHOD_BLOCKS: &[&str] = &[
    "get", "post", "put", "delete", "patch", "options", "head", "connect", "trace",
];

const REQUEST_BLOCKS: &[BlockSpec] = &[
    multimap("meta"),
    multimap("get"),
    multimap("post"),
    multimap("put"),
    multimap("delete"),
    multimap("patch"),
    multimap("options"),
    multimap("head"),
    multimap("connect"),
    multimap("trace"),
    multimap("params"),
    multimap("params:query"),
    multimap("params:path"),
    multimap("headers"),
    multimap("auth"),
    multimap("auth:awsv4"),
    multimap("auth:basic"),
    multimap("auth:bearer"),
    multimap("auth:digest"),
    multimap("auth:ntlm"),
    multimap("auth:oauth1"),
    multimap("auth:oauth2"),
    multimap("auth:wsse"),
    multimap("auth:apikey"),
    raw("body"),
    raw("body:json"),
    raw("body:text"),
    raw("body:xml"),
    raw("body:sparql"),
    raw("body:graphql"),
    raw("body:graphql:vars"),
    multimap("body:form-urlencoded"),
    multimap("body:multipart-form"),
    multimap("body:file"),
    multimap("vars:pre-request"),
    raw("script:pre-request"),
    multimap("assert"),
    raw("tests"),
    raw("script:post-response"),
    multimap("vars:post-response"),
    multimap("settings"),
    raw("docs"),
];

const FOLDER_BLOCKS: &[BlockSpec] = &[
    multimap("meta"),
    multimap("headers"),
    multimap("auth"),
    multimap("auth:awsv4"),
    multimap("auth:basic"),
    multimap("auth:bearer"),
    multimap("auth:digest"),
    multimap("auth:ntlm"),
    multimap("auth:oauth1"),
    multimap("auth:oauth2"),
    multimap("auth:wsse"),
    multimap("auth:apikey"),
    multimap("vars:pre-request"),
    raw("script:pre-request"),
    raw("tests"),
    raw("script:post-response"),
    multimap("vars:post-response"),
    multimap("settings"),
    raw("docs"),
];

// Same as a folder, minus `meta`: a collection root has no name of its own
const COLLECTION_ROOT_BLOCKS: &[BlockSpec] = &[
    multimap("headers"),
    multimap("auth"),
    multimap("auth:awsv4"),
    multimap("auth:basic"),
    multimap("auth:bearer"),
    multimap("auth:digest"),
    multimap("auth:ntlm"),
    multimap("auth:oauth1"),
    multimap("auth:oauth2"),
    multimap("auth:wsse"),
    multimap("auth:apikey"),
    multimap("vars:pre-request"),
    raw("script:pre-request"),
    raw("tests"),
    raw("script:post-response"),
    multimap("vars:post-response"),
    multimap("settings"),
    raw("docs"),
];

const ENVIRONMENT_BLOCKS: &[BlockSpec] = &[multimap("vars"), multimap("vars:secret")];

/// Recognized blocks for a document kind, in canonical order
pub fn block_specs(kind: DocumentKind) -> &'static [BlockSpec] {
    match kind {
        DocumentKind::Request => REQUEST_BLOCKS,
        DocumentKind::Folder => FOLDER_BLOCKS,
        DocumentKind::CollectionRoot => COLLECTION_ROOT_BLOCKS,
        DocumentKind::Environment => ENVIRONMENT_BLOCKS,
    }
}

/// Look up a recognized block, returning its canonical rank and spec
pub fn lookup(kind: DocumentKind, name: &str) -> Option<(usize, BlockSpec)> {
    block_specs(kind)
        .iter()
        .enumerate()
        .find(|(_, spec)| spec.name == name)
        .map(|(rank, spec)| (rank, *spec))
}

/// True if `name` is special-cased for this document kind
pub fn is_recognized(kind: DocumentKind, name: &str) -> bool {
    lookup(kind, name).is_some()
}

/// True if any document kind recognizes `name`
pub fn is_known_block(name: &str) -> bool {
    DocumentKind::ALL
        .iter()
        .any(|kind| is_recognized(*kind, name))
}

/// Body shape of a block. Unrecognized blocks are always raw.
pub fn shape_of(kind: DocumentKind, name: &str) -> BlockShape {
    lookup(kind, name)
        .map(|(_, spec)| spec.shape)
        .unwrap_or(BlockShape::Raw)
}

/// Canonical position of a block; unrecognized names share the last rank
pub fn canonical_rank(kind: DocumentKind, name: &str) -> usize {
    lookup(kind, name)
        .map(|(rank, _)| rank)
        .unwrap_or(block_specs(kind).len())
}

/// The end marker line for a block name
pub fn end_marker(name: &str) -> String {
    format!("{END_MARKER_PREFIX}{name}")
}

/// True if `line` closes the block `name` (trailing whitespace tolerated)
pub fn is_end_marker_of(line: &str, name: &str) -> bool {
    line.trim_end()
        .strip_prefix(END_MARKER_PREFIX)
        .is_some_and(|rest| rest == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_canonical_order_follows_table() {
        let order: Vec<_> = ["meta", "params", "headers", "auth", "body", "vars:pre-request"]
            .iter()
            .map(|name| canonical_rank(DocumentKind::Request, name))
            .collect();
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(order, sorted);

        let tail: Vec<_> = [
            "script:pre-request",
            "assert",
            "tests",
            "script:post-response",
            "vars:post-response",
            "settings",
        ]
        .iter()
        .map(|name| canonical_rank(DocumentKind::Request, name))
        .collect();
        let mut sorted = tail.clone();
        sorted.sort();
        assert_eq!(tail, sorted);
    }

    #[test]
    fn test_unknown_blocks_rank_last_and_are_raw() {
        let kind = DocumentKind::Request;
        assert_eq!(canonical_rank(kind, "x-custom"), REQUEST_BLOCKS.len());
        assert_eq!(shape_of(kind, "x-custom"), BlockShape::Raw);
        assert!(!is_recognized(kind, "x-custom"));
    }

    #[test]
    fn test_interpretation_differs_per_kind() {
        assert_eq!(shape_of(DocumentKind::Folder, "meta"), BlockShape::Multimap);
        assert_eq!(
            shape_of(DocumentKind::CollectionRoot, "meta"),
            BlockShape::Raw
        );
        assert!(is_recognized(DocumentKind::Environment, "vars:secret"));
        assert!(!is_recognized(DocumentKind::Request, "vars:secret"));
        assert!(is_known_block("vars:secret"));
    }

    #[test]
    fn test_oauth1_sits_with_the_auth_blocks() {
        for kind in [DocumentKind::Request, DocumentKind::Folder, DocumentKind::CollectionRoot] {
            assert_eq!(shape_of(kind, "auth:oauth1"), BlockShape::Multimap);
            let rank = canonical_rank(kind, "auth:oauth1");
            assert!(canonical_rank(kind, "auth:ntlm") < rank);
            assert!(rank < canonical_rank(kind, "auth:oauth2"));
        }
    }

    #[test]
    fn test_body_shapes() {
        let kind = DocumentKind::Request;
        assert_eq!(shape_of(kind, "body:json"), BlockShape::Raw);
        assert_eq!(shape_of(kind, "body:form-urlencoded"), BlockShape::Multimap);
        assert_eq!(shape_of(kind, "tests"), BlockShape::Raw);
    }

    #[test]
    fn test_end_markers() {
        assert_eq!(end_marker("headers"), "/headers");
        assert!(is_end_marker_of("/headers", "headers"));
        assert!(is_end_marker_of("/headers \t", "headers"));
        assert!(is_end_marker_of("/headers\r", "headers"));
        assert!(!is_end_marker_of(" /headers", "headers"));
        assert!(!is_end_marker_of("/header", "headers"));
        assert!(!is_end_marker_of("//headers", "headers"));
    }
}
