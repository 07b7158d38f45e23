//! Reference dictionary of known items and stores.
//!
//! The dictionary is loaded once and then mutated only through the explicit
//! add/edit/delete operations below, each of which validates uniqueness.
//! Callers that keep derived lookup structures (the matcher index) must
//! rebuild them after every successful mutation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ReconError, Result};

/// Store priority band used by rank-weighted redistribution.
///
/// Variants are declared top rank first; `weight` maps them onto positive
/// integer weights (A=3, B=2, C=1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StoreRank {
    A,
    B,
    C,
}

impl StoreRank {
    pub fn weight(self) -> u64 {
        match self {
            StoreRank::A => 3,
            StoreRank::B => 2,
            StoreRank::C => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StoreRank::A => "A",
            StoreRank::B => "B",
            StoreRank::C => "C",
        }
    }
}

impl fmt::Display for StoreRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreRank {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(StoreRank::A),
            "B" => Ok(StoreRank::B),
            "C" => Ok(StoreRank::C),
            other => Err(format!("unknown store rank: {other}")),
        }
    }
}

/// A known item: canonical number, display description, alternate SKU codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryItem {
    pub number: String,
    pub description: String,
    #[serde(default)]
    pub skus: Vec<String>,
}

/// A known store: unique integer id, unique name, optional priority rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryStore {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub rank: Option<StoreRank>,
}

/// The reference dictionary consumed by the matcher.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionary {
    #[serde(default)]
    pub items: Vec<DictionaryItem>,
    #[serde(default)]
    pub stores: Vec<DictionaryStore>,
}

impl Dictionary {
    pub fn new(items: Vec<DictionaryItem>, stores: Vec<DictionaryStore>) -> Self {
        Self { items, stores }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.stores.is_empty()
    }

    /// Item with the given canonical number (case-insensitive).
    pub fn find_item(&self, number: &str) -> Option<&DictionaryItem> {
        let wanted = number.trim();
        self.items
            .iter()
            .find(|item| item.number.eq_ignore_ascii_case(wanted))
    }

    pub fn find_store(&self, id: u32) -> Option<&DictionaryStore> {
        self.stores.iter().find(|store| store.id == id)
    }

    /// Store with the given name (case-insensitive).
    pub fn find_store_named(&self, name: &str) -> Option<&DictionaryStore> {
        let wanted = name.trim();
        self.stores
            .iter()
            .find(|store| store.name.eq_ignore_ascii_case(wanted))
    }

    /// Inclusive id range of known stores, used by the column detector to
    /// recognize store-id-like numeric columns.
    pub fn store_id_range(&self) -> Option<(u32, u32)> {
        let mut ids = self.stores.iter().map(|store| store.id);
        let first = ids.next()?;
        let (min, max) = ids.fold((first, first), |(min, max), id| {
            (min.min(id), max.max(id))
        });
        Some((min, max))
    }

    pub fn add_item(&mut self, item: DictionaryItem) -> Result<()> {
        let number = item.number.trim();
        if number.is_empty() {
            return Err(ReconError::EmptyItemNumber);
        }
        if self.find_item(number).is_some() {
            return Err(ReconError::DuplicateItemNumber(number.to_string()));
        }
        self.items.push(item);
        Ok(())
    }

    /// Replace the item currently numbered `number` with `item`.
    ///
    /// Renumbering is allowed as long as the new number stays unique.
    pub fn edit_item(&mut self, number: &str, item: DictionaryItem) -> Result<()> {
        let replacement = item.number.trim();
        if replacement.is_empty() {
            return Err(ReconError::EmptyItemNumber);
        }
        let index = self
            .items
            .iter()
            .position(|existing| existing.number.eq_ignore_ascii_case(number.trim()))
            .ok_or_else(|| ReconError::UnknownItemNumber(number.trim().to_string()))?;
        let collision = self.items.iter().enumerate().any(|(other, existing)| {
            other != index && existing.number.eq_ignore_ascii_case(replacement)
        });
        if collision {
            return Err(ReconError::DuplicateItemNumber(replacement.to_string()));
        }
        self.items[index] = item;
        Ok(())
    }

    pub fn delete_item(&mut self, number: &str) -> Result<()> {
        let wanted = number.trim();
        let index = self
            .items
            .iter()
            .position(|existing| existing.number.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ReconError::UnknownItemNumber(wanted.to_string()))?;
        self.items.remove(index);
        Ok(())
    }

    pub fn add_store(&mut self, store: DictionaryStore) -> Result<()> {
        let name = store.name.trim();
        if name.is_empty() {
            return Err(ReconError::EmptyStoreName);
        }
        if self.find_store(store.id).is_some() {
            return Err(ReconError::DuplicateStoreId(store.id));
        }
        if self.find_store_named(name).is_some() {
            return Err(ReconError::DuplicateStoreName(name.to_string()));
        }
        self.stores.push(store);
        Ok(())
    }

    /// Replace the store currently identified by `id` with `store`.
    pub fn edit_store(&mut self, id: u32, store: DictionaryStore) -> Result<()> {
        let name = store.name.trim();
        if name.is_empty() {
            return Err(ReconError::EmptyStoreName);
        }
        let index = self
            .stores
            .iter()
            .position(|existing| existing.id == id)
            .ok_or(ReconError::UnknownStoreId(id))?;
        let id_collision = self
            .stores
            .iter()
            .enumerate()
            .any(|(other, existing)| other != index && existing.id == store.id);
        if id_collision {
            return Err(ReconError::DuplicateStoreId(store.id));
        }
        let name_collision = self.stores.iter().enumerate().any(|(other, existing)| {
            other != index && existing.name.eq_ignore_ascii_case(name)
        });
        if name_collision {
            return Err(ReconError::DuplicateStoreName(name.to_string()));
        }
        self.stores[index] = store;
        Ok(())
    }

    pub fn delete_store(&mut self, id: u32) -> Result<()> {
        let index = self
            .stores
            .iter()
            .position(|existing| existing.id == id)
            .ok_or(ReconError::UnknownStoreId(id))?;
        self.stores.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(number: &str, description: &str) -> DictionaryItem {
        DictionaryItem {
            number: number.to_string(),
            description: description.to_string(),
            skus: Vec::new(),
        }
    }

    fn store(id: u32, name: &str, rank: Option<StoreRank>) -> DictionaryStore {
        DictionaryStore {
            id,
            name: name.to_string(),
            rank,
        }
    }

    #[test]
    fn item_numbers_are_unique_case_insensitively() {
        let mut dict = Dictionary::default();
        dict.add_item(item("GLD-1", "Glide Widget")).expect("add");
        let duplicate = dict.add_item(item("gld-1", "Other"));
        assert_eq!(
            duplicate,
            Err(ReconError::DuplicateItemNumber("gld-1".to_string()))
        );
    }

    #[test]
    fn edit_item_allows_renumbering_without_collisions() {
        let mut dict = Dictionary::default();
        dict.add_item(item("GLD-1", "Glide Widget")).expect("add");
        dict.add_item(item("GLD-2", "Glide Widget XL")).expect("add");

        dict.edit_item("GLD-1", item("GLD-10", "Glide Widget"))
            .expect("renumber");
        assert!(dict.find_item("GLD-10").is_some());
        assert!(dict.find_item("GLD-1").is_none());

        let collision = dict.edit_item("GLD-10", item("gld-2", "Glide Widget"));
        assert_eq!(
            collision,
            Err(ReconError::DuplicateItemNumber("gld-2".to_string()))
        );
    }

    #[test]
    fn store_names_are_unique_case_insensitively() {
        let mut dict = Dictionary::default();
        dict.add_store(store(101, "WATERLOO 1", Some(StoreRank::A)))
            .expect("add");
        let duplicate = dict.add_store(store(102, "waterloo 1", None));
        assert_eq!(
            duplicate,
            Err(ReconError::DuplicateStoreName("waterloo 1".to_string()))
        );
    }

    #[test]
    fn delete_missing_store_reports_unknown_id() {
        let mut dict = Dictionary::default();
        assert_eq!(dict.delete_store(7), Err(ReconError::UnknownStoreId(7)));
    }

    #[test]
    fn store_id_range_covers_all_ids() {
        let mut dict = Dictionary::default();
        assert_eq!(dict.store_id_range(), None);
        dict.add_store(store(105, "A STORE", None)).expect("add");
        dict.add_store(store(101, "B STORE", None)).expect("add");
        dict.add_store(store(112, "C STORE", None)).expect("add");
        assert_eq!(dict.store_id_range(), Some((101, 112)));
    }

    #[test]
    fn rank_parses_and_orders_weights() {
        assert_eq!("a".parse::<StoreRank>(), Ok(StoreRank::A));
        assert!("D".parse::<StoreRank>().is_err());
        assert!(StoreRank::A.weight() > StoreRank::B.weight());
        assert!(StoreRank::B.weight() > StoreRank::C.weight());
    }
}
