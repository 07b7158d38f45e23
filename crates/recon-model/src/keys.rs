//! Typed keys for the two aggregate views.
//!
//! `StoreKey` ordering is the canonical store order used wherever the engine
//! needs a deterministic sequence of stores (remainder assignment during
//! redistribution, view iteration, summaries): numeric keys ascending by
//! value first, then non-numeric keys case-insensitively.

use std::cmp::Ordering;
use std::fmt;

/// Key of a store in the aggregate views.
///
/// Matched stores use the canonical dictionary id rendered as a string;
/// unmatched stores keep the trimmed raw token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StoreKey(String);

impl StoreKey {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self(value.trim().to_string())
    }

    pub fn from_id(id: u32) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric store id when the key is a canonical id.
    pub fn as_id(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl Ord for StoreKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_id(), other.as_id()) {
            (Some(left), Some(right)) => left.cmp(&right).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self
                .0
                .to_lowercase()
                .cmp(&other.0.to_lowercase())
                .then_with(|| self.0.cmp(&other.0)),
        }
    }
}

impl PartialOrd for StoreKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key of an item in the aggregate views: the canonical item number for
/// matched items, the trimmed raw token otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ItemKey(String);

impl ItemKey {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self(value.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for ItemKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .to_uppercase()
            .cmp(&other.0.to_uppercase())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for ItemKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
