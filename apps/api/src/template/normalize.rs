//! Header text normalization for fuzzy anchor matching.
//!
//! Two texts are fuzzy-equal when their keys are equal and one fuzzy-contains
//! the other when its key is a substring of the other's key.

use std::fmt;

use serde::Serialize;

/// Canonical comparison key: all whitespace removed, lower-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    /// True when `other` is a substring of this key.
    /// The empty key is contained in every key, so callers guard against it.
    pub fn contains(&self, other: &NormalizedKey) -> bool {
        self.0.contains(other.as_str())
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strips every whitespace character and lower-cases the rest.
///
/// `"Focus:   Business Section"` → `"focus:businesssection"`
pub fn normalize(text: &str) -> NormalizedKey {
    let stripped: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    NormalizedKey(stripped.to_lowercase())
}
