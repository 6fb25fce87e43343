//! Canonical text serializer
//!
//! Writes a [`Document`] back out as reqdoc text:
//!
//! ```text
//! meta
//! name: Get user
//! /meta
//!
//! headers
//! accept: application/json
//! //x-debug:
//! /headers
//! ```
//!
//! Blocks come out in the canonical order for the kind, separated by one blank
//! line, each ending with a newline. Pairs keep model order. Raw bodies are
//! written byte for byte.
//!
//! [`serialize_document`] trusts its input: anything produced by the parser is
//! written so that parsing it again yields a semantically equal document.
//! Documents built in code can hold things the text format cannot express (a
//! key with a `:` in it, a raw body containing its own end marker);
//! [`try_serialize_document`] checks for those first.

use crate::reqdoc::ast::{Block, BlockBody, Document, DocumentKind, Pair};
use crate::reqdoc::error::TransformError;
use crate::reqdoc::grammar::{self, DISABLE_MARKER, END_MARKER_PREFIX, PAIR_SEPARATOR};
use crate::reqdoc::lexing::{classify_line, LineClass};

/// Serialize a document in the canonical order of its own kind
pub fn serialize_document(doc: &Document) -> String {
    serialize_as(doc, doc.kind)
}

/// Validate, then serialize
pub fn try_serialize_document(doc: &Document) -> Result<String, TransformError> {
    validate_document(doc)?;
    Ok(serialize_document(doc))
}

pub fn stringify_request(doc: &Document) -> String {
    serialize_as(doc, DocumentKind::Request)
}

pub fn stringify_folder(doc: &Document) -> String {
    serialize_as(doc, DocumentKind::Folder)
}

pub fn stringify_collection_root(doc: &Document) -> String {
    serialize_as(doc, DocumentKind::CollectionRoot)
}

pub fn stringify_environment(doc: &Document) -> String {
    serialize_as(doc, DocumentKind::Environment)
}

fn serialize_as(doc: &Document, kind: DocumentKind) -> String {
    let mut out = String::new();
    for (index, block) in doc.canonical_blocks_for(kind).into_iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        write_block(&mut out, block);
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    out.push_str(&block.name);
    out.push('\n');

    match &block.body {
        BlockBody::Multimap(pairs) => {
            for pair in pairs {
                write_pair(out, pair);
                out.push('\n');
            }
        }
        BlockBody::Raw(text) => {
            if !text.is_empty() {
                out.push_str(text);
                out.push('\n');
            }
        }
    }

    out.push(END_MARKER_PREFIX);
    out.push_str(&block.name);
    out.push('\n');
}

fn write_pair(out: &mut String, pair: &Pair) {
    if !pair.enabled {
        out.push_str(DISABLE_MARKER);
    }
    out.push_str(&pair.key);
    out.push(PAIR_SEPARATOR);
    if !pair.value.is_empty() {
        out.push(' ');
        out.push_str(&pair.value);
    }
}

/// Check that a document can be written as text and read back unchanged
pub fn validate_document(doc: &Document) -> Result<(), TransformError> {
    for block in &doc.blocks {
        validate_block(doc.kind, block)?;
    }
    Ok(())
}

fn validate_block(kind: DocumentKind, block: &Block) -> Result<(), TransformError> {
    let name = block.name.as_str();
    if name.is_empty() {
        return Err(TransformError::new("block name is empty"));
    }
    if is_multiline(name) {
        return Err(TransformError::new(format!(
            "block name `{}` spans more than one line",
            name.escape_debug()
        )));
    }
    if name.trim() != name {
        return Err(TransformError::new(format!(
            "block name `{name}` has surrounding whitespace"
        )));
    }
    // `//note` and `/` open blocks; `/note` would read back as a stray end marker
    if let LineClass::EndMarker(_) = classify_line(name) {
        return Err(TransformError::new(format!(
            "block name `{name}` reads as an end marker"
        )));
    }

    let expected = grammar::shape_of(kind, name);
    if block.shape() != expected {
        return Err(TransformError::new(format!(
            "block `{name}` must be {expected:?} in a {kind} document, found {:?}",
            block.shape()
        )));
    }

    match &block.body {
        BlockBody::Multimap(pairs) => pairs
            .iter()
            .try_for_each(|pair| validate_pair(name, pair)),
        BlockBody::Raw(text) => {
            if text.lines().any(|line| grammar::is_end_marker_of(line, name)) {
                return Err(TransformError::new(format!(
                    "raw body of `{name}` contains its own end marker"
                )));
            }
            Ok(())
        }
    }
}

fn validate_pair(block: &str, pair: &Pair) -> Result<(), TransformError> {
    let key = pair.key.as_str();
    let problem = if is_multiline(key) {
        Some("key spans more than one line")
    } else if key.contains(PAIR_SEPARATOR) {
        Some("key contains the pair separator")
    } else if pair.enabled && key.starts_with(DISABLE_MARKER) {
        Some("enabled key starts with the disable marker")
    } else if key.trim() != key {
        Some("key has surrounding whitespace")
    } else if is_multiline(&pair.value) {
        Some("value spans more than one line")
    } else if pair.value.trim() != pair.value {
        Some("value has surrounding whitespace")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(TransformError::new(format!(
            "pair `{}` in block `{block}`: {problem}",
            key.escape_debug()
        ))),
        None => Ok(()),
    }
}

// A lone `\r` is ordinary text to the line splitter
fn is_multiline(text: &str) -> bool {
    text.contains('\n')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_forms() {
        let doc = Document::builder(DocumentKind::Request)
            .multimap(
                "headers",
                vec![
                    Pair::new("accept", "application/json"),
                    Pair::new("x-empty", ""),
                    Pair::disabled("x", "y"),
                ],
            )
            .build();
        assert_eq!(
            serialize_document(&doc),
            "headers\naccept: application/json\nx-empty:\n//x: y\n/headers\n"
        );
    }

    #[test]
    fn test_raw_and_empty_blocks() {
        let doc = Document::builder(DocumentKind::Request)
            .raw("docs", "")
            .multimap("headers", vec![])
            .raw("body:json", "{\n  \"a\": 1\n}")
            .build();
        assert_eq!(
            serialize_document(&doc),
            "headers\n/headers\n\nbody:json\n{\n  \"a\": 1\n}\n/body:json\n\ndocs\n/docs\n"
        );
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(serialize_document(&Document::new(DocumentKind::Folder)), "");
    }

    #[test]
    fn test_stringify_uses_requested_kind_order() {
        let doc = Document::builder(DocumentKind::Request)
            .multimap("vars:secret", vec![Pair::new("token", "")])
            .multimap("vars", vec![Pair::new("host", "localhost")])
            .build();
        assert_eq!(
            stringify_environment(&doc),
            "vars\nhost: localhost\n/vars\n\nvars:secret\ntoken:\n/vars:secret\n"
        );
        // Both names are unknown to a request, so model order is kept
        assert!(stringify_request(&doc).starts_with("vars:secret\n"));
    }

    #[test]
    fn test_validation_rejects_unwritable_documents() {
        let bad = [
            Block::multimap("", vec![]),
            Block::multimap("two\nlines", vec![]),
            Block::raw("/docs", ""),
            Block::raw(" docs", ""),
            Block::raw("headers", ""),
            Block::multimap("docs", vec![]),
            Block::multimap("headers", vec![Pair::new("a:b", "1")]),
            Block::multimap("headers", vec![Pair::new("//a", "1")]),
            Block::multimap("headers", vec![Pair::new("a", "1\n2")]),
            Block::multimap("headers", vec![Pair::new("a", " 1")]),
            Block::raw("docs", "text\n/docs\nmore"),
        ];
        for block in bad {
            let doc = Document::with_blocks(DocumentKind::Request, vec![block.clone()]);
            assert!(
                try_serialize_document(&doc).is_err(),
                "expected rejection of {block:?}"
            );
        }
    }

    #[test]
    fn test_validation_accepts_what_the_parser_produces() {
        let doc = Document::builder(DocumentKind::Request)
            .multimap(
                "headers",
                vec![
                    Pair::disabled("//x", "1"),
                    Pair::new("a\rb", "1"),
                    Pair::new("/x", "c\rd"),
                ],
            )
            .raw("//note", "hello")
            .raw("/", "")
            .build();
        let text = try_serialize_document(&doc).unwrap();
        assert!(text.contains("////x: 1\n"));
        assert!(text.contains("//note\nhello\n///note\n"));
    }

    #[test]
    fn test_validation_accepts_unusual_but_writable_content() {
        let doc = Document::builder(DocumentKind::Request)
            .multimap("headers", vec![Pair::new("", "orphan"), Pair::new("@local", "1")])
            .raw("docs", "/doc\n  /docs-but-indented\n//docs")
            .raw("x-custom", "")
            .build();
        assert!(try_serialize_document(&doc).is_ok());
    }
}
