//! Line Classification
//!
//! Context-free classification of source lines and the pair-line splitter.

use crate::reqdoc::grammar::{DISABLE_MARKER, END_MARKER_PREFIX, PAIR_SEPARATOR};

/// Coarse classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Empty or whitespace only
    Blank,
    /// `/<name>` with optional trailing whitespace; carries `name`
    EndMarker(&'a str),
    /// Anything else
    Content(&'a str),
}

/// Classify a line.
///
/// End markers tolerate trailing whitespace only. A line starting with the
/// disable marker (`//`) is never an end marker.
pub fn classify_line(text: &str) -> LineClass<'_> {
    if text.trim().is_empty() {
        return LineClass::Blank;
    }

    let trimmed = text.trim_end();
    if !trimmed.starts_with(DISABLE_MARKER) {
        if let Some(name) = trimmed.strip_prefix(END_MARKER_PREFIX) {
            if !name.is_empty() {
                return LineClass::EndMarker(name);
            }
        }
    }

    LineClass::Content(text)
}

/// A multimap line split into its parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairLine<'a> {
    pub key: &'a str,
    pub value: &'a str,
    pub enabled: bool,
}

/// Split a multimap line `[//]key[:value]`.
///
/// The split happens at the first separator, so values may contain `:`. A line
/// without a separator is a key with an empty value. Key and value are trimmed.
pub fn split_pair(text: &str) -> PairLine<'_> {
    let trimmed = text.trim();
    let (enabled, rest) = match trimmed.strip_prefix(DISABLE_MARKER) {
        Some(rest) => (false, rest),
        None => (true, trimmed),
    };

    let (key, value) = rest.split_once(PAIR_SEPARATOR).unwrap_or((rest, ""));

    PairLine {
        key: key.trim(),
        value: value.trim(),
        enabled,
    }
}
