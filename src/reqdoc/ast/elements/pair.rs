//! Pair element
//!
//!     A pair is one line of a multimap block: `key: value`, optionally
//!     prefixed with the disable marker. Keys are not unique within a block
//!     and pairs keep insertion order.

use serde::{Deserialize, Serialize};

fn enabled_by_default() -> bool {
    true
}

/// A key/value line inside a multimap block
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    pub value: String,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl Pair {
    /// An enabled pair
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }

    /// A pair that is present but disabled
    pub fn disabled(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            enabled: false,
            ..Self::new(key, value)
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}
