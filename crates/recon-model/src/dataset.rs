//! The reconciled allocation dataset and its two aggregate views.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::dictionary::StoreRank;
use crate::keys::{ItemKey, StoreKey};
use crate::matching::MatchConfidence;

/// One raw input record, parsed once at the ingestion boundary.
///
/// `raw` keeps the original header → value record so every aggregate entry
/// can be traced back to its source line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRow {
    pub store_token: String,
    pub item_token: String,
    pub quantity: u64,
    pub raw: BTreeMap<String, String>,
}

/// Parses a quantity cell into whole units.
///
/// Accepts thousands separators and a zero-valued decimal tail (`"1,200"`,
/// `"8.00"`). Returns `None` for empty, negative, fractional, or
/// non-numeric input, and for zero: rows without positive quantity are
/// dropped at ingestion.
pub fn parse_quantity(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let compact: String = trimmed.chars().filter(|ch| *ch != ',').collect();
    let whole = match compact.split_once('.') {
        Some((whole, frac)) => {
            if !frac.chars().all(|ch| ch == '0') {
                return None;
            }
            whole
        }
        None => compact.as_str(),
    };
    let value = whole.parse::<u64>().ok()?;
    (value > 0).then_some(value)
}

/// An item line under a store in the by-store view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub item: ItemKey,
    /// Description of the matched dictionary item, if the item resolved.
    pub description: Option<String>,
    pub skus: Vec<String>,
    pub quantity: u64,
    /// Confidence of the item match; `None` when the item token is unmatched.
    pub confidence: Option<MatchConfidence>,
}

/// A store line under an item in the by-item view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub store: StoreKey,
    /// Name of the matched dictionary store, if the store resolved.
    pub name: Option<String>,
    pub rank: Option<StoreRank>,
    pub quantity: u64,
    /// Confidence of the store match; `None` when the store token is unmatched.
    pub confidence: Option<MatchConfidence>,
}

/// Two redundant groupings of the same allocation rows.
///
/// Invariant: the quantity summed over `by_store` equals the quantity summed
/// over `by_item` equals the sum of all retained input quantities. The maps
/// are always rebuilt wholesale, never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationDataset {
    pub by_store: BTreeMap<StoreKey, Vec<StoreEntry>>,
    pub by_item: BTreeMap<ItemKey, Vec<ItemEntry>>,
}

impl AllocationDataset {
    pub fn is_empty(&self) -> bool {
        self.by_store.is_empty() && self.by_item.is_empty()
    }

    pub fn store_count(&self) -> usize {
        self.by_store.len()
    }

    pub fn item_count(&self) -> usize {
        self.by_item.len()
    }

    /// Total quantity allocated to a single store.
    pub fn store_total(&self, key: &StoreKey) -> u64 {
        self.by_store
            .get(key)
            .map(|entries| entries.iter().map(|entry| entry.quantity).sum())
            .unwrap_or(0)
    }

    /// Total quantity allocated for a single item.
    pub fn item_total(&self, key: &ItemKey) -> u64 {
        self.by_item
            .get(key)
            .map(|entries| entries.iter().map(|entry| entry.quantity).sum())
            .unwrap_or(0)
    }

    pub fn total_by_store(&self) -> u64 {
        self.by_store
            .values()
            .flat_map(|entries| entries.iter().map(|entry| entry.quantity))
            .sum()
    }

    pub fn total_by_item(&self) -> u64 {
        self.by_item
            .values()
            .flat_map(|entries| entries.iter().map(|entry| entry.quantity))
            .sum()
    }
}

/// The full mutable engine state: dataset plus exclusion and redistribution
/// markers. This is the unit that history snapshots and archives copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineState {
    pub dataset: AllocationDataset,
    pub excluded: BTreeSet<StoreKey>,
    pub redistributed: BTreeSet<ItemKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_entry(item: &str, quantity: u64) -> StoreEntry {
        StoreEntry {
            item: ItemKey::new(item),
            description: None,
            skus: Vec::new(),
            quantity,
            confidence: None,
        }
    }

    fn item_entry(store: &str, quantity: u64) -> ItemEntry {
        ItemEntry {
            store: StoreKey::new(store),
            name: None,
            rank: None,
            quantity,
            confidence: None,
        }
    }

    #[test]
    fn totals_sum_both_views() {
        let mut dataset = AllocationDataset::default();
        dataset
            .by_store
            .insert(StoreKey::new("101"), vec![store_entry("GLD-1", 5)]);
        dataset
            .by_store
            .insert(StoreKey::new("102"), vec![store_entry("GLD-1", 3)]);
        dataset.by_item.insert(
            ItemKey::new("GLD-1"),
            vec![item_entry("101", 5), item_entry("102", 3)],
        );

        assert_eq!(dataset.total_by_store(), 8);
        assert_eq!(dataset.total_by_item(), 8);
        assert_eq!(dataset.store_total(&StoreKey::new("101")), 5);
        assert_eq!(dataset.item_total(&ItemKey::new("GLD-1")), 8);
        assert_eq!(dataset.item_total(&ItemKey::new("MISSING")), 0);
    }

    #[test]
    fn quantities_parse_spreadsheet_formats() {
        assert_eq!(parse_quantity("5"), Some(5));
        assert_eq!(parse_quantity(" 8.00 "), Some(8));
        assert_eq!(parse_quantity("1,200"), Some(1200));
        assert_eq!(parse_quantity("3."), Some(3));
    }

    #[test]
    fn quantities_reject_non_positive_and_fractional() {
        assert_eq!(parse_quantity(""), None);
        assert_eq!(parse_quantity("0"), None);
        assert_eq!(parse_quantity("0.00"), None);
        assert_eq!(parse_quantity("-3"), None);
        assert_eq!(parse_quantity("3.5"), None);
        assert_eq!(parse_quantity("five"), None);
    }
}
