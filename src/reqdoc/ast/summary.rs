//! Consumer-facing view of a request document
//!
//! Collaborators such as a sidebar or a CLI listing rarely want blocks and
//! pairs; they want the request's name, method and URL. [`RequestSummary`]
//! reads those out of a parsed [`Document`] without failing: anything missing
//! is left empty or defaulted.

use crate::reqdoc::ast::Document;
use crate::reqdoc::grammar::HTTP_METHOD_BLOCKS;
use serde::{Deserialize, Serialize};

/// Protocol family declared by `meta.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestType {
    #[default]
    Http,
    Graphql,
}

impl RequestType {
    fn from_meta(value: Option<&str>) -> Self {
        match value {
            Some("graphql") => RequestType::Graphql,
            _ => RequestType::Http,
        }
    }
}

/// Summary of a request document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSummary {
    pub name: Option<String>,
    pub request_type: RequestType,
    /// Upper-cased name of the first method block
    pub method: Option<String>,
    pub url: Option<String>,
    pub body_mode: String,
    pub auth_mode: String,
    pub tags: Vec<String>,
    /// Raw `meta.seq`, left for the consumer to interpret
    pub seq: Option<String>,
}

impl RequestSummary {
    pub fn from_document(doc: &Document) -> Self {
        let method_block = doc
            .blocks
            .iter()
            .find(|block| HTTP_METHOD_BLOCKS.contains(&block.name.as_str()));

        let mode = |key: &str| {
            method_block
                .and_then(|block| block.value(key))
                .filter(|value| !value.is_empty())
                .unwrap_or("none")
                .to_string()
        };

        let tags = doc
            .value("meta", "tags")
            .map(|tags| {
                tags.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        RequestSummary {
            name: doc.value("meta", "name").map(String::from),
            request_type: RequestType::from_meta(doc.value("meta", "type")),
            method: method_block.map(|block| block.name.to_uppercase()),
            url: method_block
                .and_then(|block| block.value("url"))
                .map(String::from),
            body_mode: mode("body"),
            auth_mode: mode("auth"),
            tags,
            seq: doc.sequence_hint().map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reqdoc::ast::{DocumentKind, Pair};

    #[test]
    fn test_summary_of_full_request() {
        let doc = Document::builder(DocumentKind::Request)
            .multimap(
                "meta",
                vec![
                    Pair::new("name", "Create user"),
                    Pair::new("type", "graphql"),
                    Pair::new("seq", "2"),
                    Pair::new("tags", "smoke, regression,,"),
                ],
            )
            .multimap(
                "post",
                vec![
                    Pair::new("url", "https://api.example.com/users"),
                    Pair::new("body", "json"),
                    Pair::new("auth", "bearer"),
                ],
            )
            .build();

        let summary = RequestSummary::from_document(&doc);
        assert_eq!(summary.name.as_deref(), Some("Create user"));
        assert_eq!(summary.request_type, RequestType::Graphql);
        assert_eq!(summary.method.as_deref(), Some("POST"));
        assert_eq!(summary.url.as_deref(), Some("https://api.example.com/users"));
        assert_eq!(summary.body_mode, "json");
        assert_eq!(summary.auth_mode, "bearer");
        assert_eq!(summary.tags, vec!["smoke", "regression"]);
        assert_eq!(summary.seq.as_deref(), Some("2"));
    }

    #[test]
    fn test_summary_defaults() {
        let doc = Document::new(DocumentKind::Request);
        let summary = RequestSummary::from_document(&doc);
        assert_eq!(summary.name, None);
        assert_eq!(summary.request_type, RequestType::Http);
        assert_eq!(summary.method, None);
        assert_eq!(summary.body_mode, "none");
        assert_eq!(summary.auth_mode, "none");
        assert!(summary.tags.is_empty());
    }
}
