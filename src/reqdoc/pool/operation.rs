//! Operation kinds
//!
//! Each (direction, document kind) pair is its own operation kind and gets its
//! own queue and worker.

use crate::reqdoc::ast::DocumentKind;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    ParseRequest,
    StringifyRequest,
    ParseFolder,
    StringifyFolder,
    ParseCollectionRoot,
    StringifyCollectionRoot,
    ParseEnvironment,
    StringifyEnvironment,
}

impl OperationKind {
    pub const ALL: [OperationKind; 8] = [
        OperationKind::ParseRequest,
        OperationKind::StringifyRequest,
        OperationKind::ParseFolder,
        OperationKind::StringifyFolder,
        OperationKind::ParseCollectionRoot,
        OperationKind::StringifyCollectionRoot,
        OperationKind::ParseEnvironment,
        OperationKind::StringifyEnvironment,
    ];

    pub fn parse(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Request => OperationKind::ParseRequest,
            DocumentKind::Folder => OperationKind::ParseFolder,
            DocumentKind::CollectionRoot => OperationKind::ParseCollectionRoot,
            DocumentKind::Environment => OperationKind::ParseEnvironment,
        }
    }

    pub fn stringify(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Request => OperationKind::StringifyRequest,
            DocumentKind::Folder => OperationKind::StringifyFolder,
            DocumentKind::CollectionRoot => OperationKind::StringifyCollectionRoot,
            DocumentKind::Environment => OperationKind::StringifyEnvironment,
        }
    }

    pub fn document_kind(self) -> DocumentKind {
        match self {
            OperationKind::ParseRequest | OperationKind::StringifyRequest => DocumentKind::Request,
            OperationKind::ParseFolder | OperationKind::StringifyFolder => DocumentKind::Folder,
            OperationKind::ParseCollectionRoot | OperationKind::StringifyCollectionRoot => {
                DocumentKind::CollectionRoot
            }
            OperationKind::ParseEnvironment | OperationKind::StringifyEnvironment => {
                DocumentKind::Environment
            }
        }
    }

    pub fn is_parse(self) -> bool {
        matches!(
            self,
            OperationKind::ParseRequest
                | OperationKind::ParseFolder
                | OperationKind::ParseCollectionRoot
                | OperationKind::ParseEnvironment
        )
    }

    /// Position in [`OperationKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::ParseRequest => "parse-request",
            OperationKind::StringifyRequest => "stringify-request",
            OperationKind::ParseFolder => "parse-folder",
            OperationKind::StringifyFolder => "stringify-folder",
            OperationKind::ParseCollectionRoot => "parse-collection-root",
            OperationKind::StringifyCollectionRoot => "stringify-collection-root",
            OperationKind::ParseEnvironment => "parse-environment",
            OperationKind::StringifyEnvironment => "stringify-environment",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
