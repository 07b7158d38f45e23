//! Confidence-tiered resolution of raw tokens against the dictionary.

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;

use recon_model::{
    Dictionary, DictionaryItem, DictionaryStore, MatchResult, MatchRule, parse_quantity,
};

use crate::index::{MatcherIndex, split_words};

/// Tokens shorter than this never match inexactly; a bare rank letter or a
/// stray "1" must not resolve to an entity. Exact store id and name lookups
/// are exempt, since single-digit store ids are legitimate.
pub const MIN_TOKEN_LEN: usize = 3;

const DEFAULT_FUZZY_THRESHOLD: f64 = 0.85;

/// Tuning knobs for the matcher.
///
/// Fuzzy description matching is indexed but disabled by default: item
/// descriptions overlap too much across variants ("Glide Widget" vs "Glide
/// Widget XL") for similarity alone to be trustworthy. Callers that want it
/// opt in and get results tagged [`MatchRule::ItemDescription`] with a score.
#[derive(Debug, Clone, Copy)]
pub struct MatcherOptions {
    pub fuzzy_descriptions: bool,
    pub fuzzy_threshold: f64,
}

impl Default for MatcherOptions {
    fn default() -> Self {
        Self {
            fuzzy_descriptions: false,
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
        }
    }
}

/// Resolves store and item tokens to dictionary entries.
///
/// All lookups are pure queries over the owned dictionary snapshot and its
/// [`MatcherIndex`]; nothing here mutates the dictionary.
#[derive(Debug, Clone)]
pub struct EntityMatcher {
    dictionary: Dictionary,
    index: MatcherIndex,
    options: MatcherOptions,
}

impl EntityMatcher {
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_options(dictionary, MatcherOptions::default())
    }

    pub fn with_options(dictionary: Dictionary, options: MatcherOptions) -> Self {
        let index = MatcherIndex::build(&dictionary);
        Self {
            dictionary,
            index,
            options,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Inclusive id range of known stores, for store-id-band checks.
    pub fn store_id_range(&self) -> Option<(u32, u32)> {
        self.index.store_id_range()
    }

    /// Resolves an item token. Rules in order, first hit wins: exact
    /// canonical number, exact SKU, number-starts-with-token (partial),
    /// then fuzzy description similarity when enabled.
    #[must_use]
    pub fn match_item(&self, token: &str) -> Option<MatchResult<DictionaryItem>> {
        let token = token.trim();
        if token.chars().count() < MIN_TOKEN_LEN {
            return None;
        }
        let upper = token.to_uppercase();
        if let Some(position) = self.index.item_by_number(&upper) {
            return Some(MatchResult::exact(
                self.dictionary.items[position].clone(),
                MatchRule::ItemNumber,
            ));
        }
        if let Some(position) = self.index.item_by_sku(&upper) {
            return Some(MatchResult::exact(
                self.dictionary.items[position].clone(),
                MatchRule::ItemSku,
            ));
        }
        if let Some(item) = self
            .dictionary
            .items
            .iter()
            .find(|item| item.number.to_uppercase().starts_with(&upper))
        {
            return Some(MatchResult::partial(
                item.clone(),
                MatchRule::ItemNumberPrefix,
            ));
        }
        if self.options.fuzzy_descriptions {
            return self.fuzzy_item_by_description(token);
        }
        None
    }

    /// Resolves a store token. Rules in order: exact numeric id, exact full
    /// name, name-contains-token (partial), keyword overlap (fuzzy, scored by
    /// matching word count, ties to the first-indexed store).
    #[must_use]
    pub fn match_store(&self, token: &str) -> Option<MatchResult<DictionaryStore>> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        if let Some(id) = parse_store_id(token)
            && let Some(position) = self.index.store_by_id(id)
        {
            return Some(MatchResult::exact(
                self.dictionary.stores[position].clone(),
                MatchRule::StoreId,
            ));
        }
        let upper = token.to_uppercase();
        if let Some(position) = self.index.store_by_name(&upper) {
            return Some(MatchResult::exact(
                self.dictionary.stores[position].clone(),
                MatchRule::StoreName,
            ));
        }
        if token.chars().count() < MIN_TOKEN_LEN {
            return None;
        }
        if let Some(store) = self
            .dictionary
            .stores
            .iter()
            .find(|store| store.name.to_uppercase().contains(&upper))
        {
            return Some(MatchResult::partial(
                store.clone(),
                MatchRule::StoreNameContains,
            ));
        }
        self.store_by_keyword_overlap(&upper)
    }

    fn fuzzy_item_by_description(&self, token: &str) -> Option<MatchResult<DictionaryItem>> {
        let wanted = token.to_lowercase();
        let mut best: Option<(usize, f64)> = None;
        for (position, item) in self.dictionary.items.iter().enumerate() {
            let score = jaro_similarity(
                wanted.chars(),
                item.description.to_lowercase().chars(),
            );
            if score < self.options.fuzzy_threshold {
                continue;
            }
            if best.is_none_or(|(_, current)| score > current) {
                best = Some((position, score));
            }
        }
        best.map(|(position, score)| {
            MatchResult::fuzzy(
                self.dictionary.items[position].clone(),
                MatchRule::ItemDescription,
                score,
            )
        })
    }

    fn store_by_keyword_overlap(&self, token_upper: &str) -> Option<MatchResult<DictionaryStore>> {
        let words = split_words(token_upper);
        if words.is_empty() {
            return None;
        }
        let mut overlaps: Vec<usize> = vec![0; self.dictionary.stores.len()];
        for word in &words {
            for &position in self.index.stores_with_word(word) {
                overlaps[position] += 1;
            }
        }
        let mut best: Option<(usize, usize)> = None;
        for (position, &count) in overlaps.iter().enumerate() {
            if count == 0 {
                continue;
            }
            if best.is_none_or(|(_, current)| count > current) {
                best = Some((position, count));
            }
        }
        best.map(|(position, count)| {
            MatchResult::fuzzy(
                self.dictionary.stores[position].clone(),
                MatchRule::StoreKeywords,
                count as f64,
            )
        })
    }
}

/// Numeric store id in a token, tolerating spreadsheet renderings such as
/// `"101.0"` or `"1,015"`.
fn parse_store_id(token: &str) -> Option<u32> {
    if let Ok(id) = token.parse::<u32>() {
        return Some(id);
    }
    parse_quantity(token).and_then(|value| u32::try_from(value).ok())
}
