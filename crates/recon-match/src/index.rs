//! Lookup tables derived from the dictionary.
//!
//! The index is a pure value built by [`MatcherIndex::build`]; it is never
//! patched in place. Components that mutate the dictionary must rebuild the
//! index before the next lookup (the catalog enforces this).

use std::collections::BTreeMap;

use recon_model::Dictionary;

/// Derived lookup tables over a dictionary snapshot.
///
/// Entity values are addressed by their position in the dictionary's item and
/// store lists, so "first-indexed wins" tie-breaking falls out of iteration
/// order.
#[derive(Debug, Clone, Default)]
pub struct MatcherIndex {
    item_by_number: BTreeMap<String, usize>,
    item_by_sku: BTreeMap<String, usize>,
    store_by_id: BTreeMap<u32, usize>,
    store_by_name: BTreeMap<String, usize>,
    store_words: BTreeMap<String, Vec<usize>>,
    id_range: Option<(u32, u32)>,
}

impl MatcherIndex {
    /// Builds the full index from a dictionary. Pure; the dictionary is not
    /// touched.
    pub fn build(dictionary: &Dictionary) -> Self {
        let mut index = MatcherIndex {
            id_range: dictionary.store_id_range(),
            ..MatcherIndex::default()
        };
        for (position, item) in dictionary.items.iter().enumerate() {
            let number = item.number.trim().to_uppercase();
            if !number.is_empty() {
                index.item_by_number.entry(number).or_insert(position);
            }
            for sku in &item.skus {
                let sku = sku.trim().to_uppercase();
                if !sku.is_empty() {
                    index.item_by_sku.entry(sku).or_insert(position);
                }
            }
        }
        for (position, store) in dictionary.stores.iter().enumerate() {
            index.store_by_id.entry(store.id).or_insert(position);
            let name = store.name.trim().to_uppercase();
            if !name.is_empty() {
                index.store_by_name.entry(name).or_insert(position);
            }
            for word in split_words(&store.name) {
                let entries = index.store_words.entry(word).or_default();
                if !entries.contains(&position) {
                    entries.push(position);
                }
            }
        }
        index
    }

    pub fn item_by_number(&self, number_upper: &str) -> Option<usize> {
        self.item_by_number.get(number_upper).copied()
    }

    pub fn item_by_sku(&self, sku_upper: &str) -> Option<usize> {
        self.item_by_sku.get(sku_upper).copied()
    }

    pub fn store_by_id(&self, id: u32) -> Option<usize> {
        self.store_by_id.get(&id).copied()
    }

    pub fn store_by_name(&self, name_upper: &str) -> Option<usize> {
        self.store_by_name.get(name_upper).copied()
    }

    /// Stores whose name contains the given word, in dictionary order.
    pub fn stores_with_word(&self, word_upper: &str) -> &[usize] {
        self.store_words
            .get(word_upper)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Inclusive id range of all indexed stores.
    pub fn store_id_range(&self) -> Option<(u32, u32)> {
        self.id_range
    }
}

/// Uppercased words of a store name, split at non-alphanumeric boundaries.
pub fn split_words(raw: &str) -> Vec<String> {
    raw.to_uppercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}
