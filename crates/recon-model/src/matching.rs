//! Match results produced by the entity matcher.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How strongly a raw token was resolved to a dictionary entity.
///
/// Variants are declared weakest first so comparisons read naturally:
/// anything below `Exact` is worth a diagnostic warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchConfidence {
    /// Resolved by similarity or keyword overlap; verify before trusting.
    Fuzzy,
    /// Resolved by prefix or substring; usually correct.
    Partial,
    /// Resolved by a canonical identifier; safe to use without review.
    Exact,
}

impl MatchConfidence {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchConfidence::Exact => "exact",
            MatchConfidence::Partial => "partial",
            MatchConfidence::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which matching rule fired for a lookup, in the order the matcher tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchRule {
    ItemNumber,
    ItemSku,
    ItemNumberPrefix,
    ItemDescription,
    StoreId,
    StoreName,
    StoreNameContains,
    StoreKeywords,
}

impl MatchRule {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchRule::ItemNumber => "item-number",
            MatchRule::ItemSku => "item-sku",
            MatchRule::ItemNumberPrefix => "item-number-prefix",
            MatchRule::ItemDescription => "item-description",
            MatchRule::StoreId => "store-id",
            MatchRule::StoreName => "store-name",
            MatchRule::StoreNameContains => "store-name-contains",
            MatchRule::StoreKeywords => "store-keywords",
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a single dictionary lookup. Produced per query, never persisted.
#[derive(Debug, Clone)]
pub struct MatchResult<T> {
    pub entity: T,
    pub confidence: MatchConfidence,
    pub rule: MatchRule,
    /// Similarity or overlap score for fuzzy results, used to rank ties.
    pub score: Option<f64>,
}

impl<T> MatchResult<T> {
    pub fn exact(entity: T, rule: MatchRule) -> Self {
        Self {
            entity,
            confidence: MatchConfidence::Exact,
            rule,
            score: None,
        }
    }

    pub fn partial(entity: T, rule: MatchRule) -> Self {
        Self {
            entity,
            confidence: MatchConfidence::Partial,
            rule,
            score: None,
        }
    }

    pub fn fuzzy(entity: T, rule: MatchRule, score: f64) -> Self {
        Self {
            entity,
            confidence: MatchConfidence::Fuzzy,
            rule,
            score: Some(score),
        }
    }

    pub fn is_exact(&self) -> bool {
        self.confidence == MatchConfidence::Exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_orders_by_strength() {
        assert!(MatchConfidence::Fuzzy < MatchConfidence::Partial);
        assert!(MatchConfidence::Partial < MatchConfidence::Exact);
    }

    #[test]
    fn rule_tags_serialize_kebab_case() {
        let json = serde_json::to_string(&MatchRule::ItemNumberPrefix).expect("serialize");
        assert_eq!(json, "\"item-number-prefix\"");
        assert_eq!(MatchRule::StoreKeywords.as_str(), "store-keywords");
    }
}
