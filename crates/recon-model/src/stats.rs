//! Matching statistics and diagnostic warnings produced by aggregation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::matching::{MatchConfidence, MatchRule};

/// What a warning is about. Inexact warnings are diagnostics, not failures;
/// ingestion always proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    ItemUnmatched,
    StoreUnmatched,
    ItemFuzzy,
    StoreFuzzy,
}

impl WarningKind {
    pub fn as_str(self) -> &'static str {
        match self {
            WarningKind::ItemUnmatched => "item-unmatched",
            WarningKind::StoreUnmatched => "store-unmatched",
            WarningKind::ItemFuzzy => "item-fuzzy",
            WarningKind::StoreFuzzy => "store-fuzzy",
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single matching diagnostic attached to an ingested row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchWarning {
    /// 1-based data row number in the input table.
    pub row: usize,
    pub kind: WarningKind,
    /// The raw token as it appeared in the input.
    pub input: String,
    /// Display value of the matched entity, when one was found.
    pub matched: Option<String>,
    pub rule: Option<MatchRule>,
    pub confidence: Option<MatchConfidence>,
}

/// Counters and warnings from one aggregation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestStats {
    pub rows_ingested: usize,
    /// Rows dropped for a missing or non-positive quantity.
    pub rows_dropped: usize,
    pub items_matched: usize,
    pub items_unmatched: usize,
    pub stores_matched: usize,
    pub stores_unmatched: usize,
    pub warnings: Vec<MatchWarning>,
}

impl IngestStats {
    pub fn unmatched_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| {
                matches!(
                    warning.kind,
                    WarningKind::ItemUnmatched | WarningKind::StoreUnmatched
                )
            })
            .count()
    }

    pub fn inexact_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|warning| {
                matches!(warning.kind, WarningKind::ItemFuzzy | WarningKind::StoreFuzzy)
            })
            .count()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
