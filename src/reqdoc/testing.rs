//! Sample documents for tests
//!
//! Tests should read reqdoc text from the curated files in `docs/samples/`
//! rather than inlining it, so that when the format changes there is one place
//! to update. Every sample is written in canonical form: serializing its parse
//! reproduces the file exactly.
//!
//! ```rust-example
//! use reqdoc::reqdoc::testing::Samples;
//!
//! let source = Samples::get_string("request-basic.reqdoc")?;
//! let doc = Samples::parse("request-basic.reqdoc")?;
//! ```

use crate::reqdoc::ast::{Document, DocumentKind};
use crate::reqdoc::error::SyntaxError;
use crate::reqdoc::parsing::parse_document;
use thiserror::Error;

/// A curated sample document
#[derive(Debug, Clone, Copy)]
pub struct Sample {
    pub name: &'static str,
    pub kind: DocumentKind,
    pub source: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        name: "request-basic.reqdoc",
        kind: DocumentKind::Request,
        source: include_str!("../../docs/samples/request-basic.reqdoc"),
    },
    Sample {
        name: "request-full.reqdoc",
        kind: DocumentKind::Request,
        source: include_str!("../../docs/samples/request-full.reqdoc"),
    },
    Sample {
        name: "folder.reqdoc",
        kind: DocumentKind::Folder,
        source: include_str!("../../docs/samples/folder.reqdoc"),
    },
    Sample {
        name: "collection.reqdoc",
        kind: DocumentKind::CollectionRoot,
        source: include_str!("../../docs/samples/collection.reqdoc"),
    },
    Sample {
        name: "environment.reqdoc",
        kind: DocumentKind::Environment,
        source: include_str!("../../docs/samples/environment.reqdoc"),
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("Sample '{0}' is not available")]
    NotFound(String),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// Main interface for accessing sample files
pub struct Samples;

impl Samples {
    pub fn get(name: &str) -> Result<&'static Sample, SampleError> {
        SAMPLES
            .iter()
            .find(|sample| sample.name == name)
            .ok_or_else(|| SampleError::NotFound(name.to_string()))
    }

    /// Sample content as a string
    pub fn get_string(name: &str) -> Result<String, SampleError> {
        Self::get(name).map(|sample| sample.source.to_string())
    }

    /// Parse a sample as its own document kind
    pub fn parse(name: &str) -> Result<Document, SampleError> {
        let sample = Self::get(name)?;
        Ok(parse_document(sample.source, sample.kind)?)
    }

    pub fn list_samples() -> Vec<&'static str> {
        SAMPLES.iter().map(|sample| sample.name).collect()
    }

    pub fn all() -> &'static [Sample] {
        SAMPLES
    }
}
