//! Owner of the live dictionary and its derived matcher.
//!
//! Every mutation is validated by the dictionary itself and, on success,
//! followed by a full matcher rebuild, so lookups can never see a stale
//! index. A failed mutation leaves both dictionary and matcher untouched.

use recon_model::{Dictionary, DictionaryItem, DictionaryStore, Result};

use crate::matcher::{EntityMatcher, MatcherOptions};

#[derive(Debug, Clone)]
pub struct DictionaryCatalog {
    matcher: EntityMatcher,
    options: MatcherOptions,
}

impl DictionaryCatalog {
    pub fn new(dictionary: Dictionary) -> Self {
        Self::with_options(dictionary, MatcherOptions::default())
    }

    pub fn with_options(dictionary: Dictionary, options: MatcherOptions) -> Self {
        Self {
            matcher: EntityMatcher::with_options(dictionary, options),
            options,
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        self.matcher.dictionary()
    }

    pub fn matcher(&self) -> &EntityMatcher {
        &self.matcher
    }

    pub fn add_item(&mut self, item: DictionaryItem) -> Result<()> {
        self.mutate(|dictionary| dictionary.add_item(item))
    }

    pub fn edit_item(&mut self, number: &str, item: DictionaryItem) -> Result<()> {
        self.mutate(|dictionary| dictionary.edit_item(number, item))
    }

    pub fn delete_item(&mut self, number: &str) -> Result<()> {
        self.mutate(|dictionary| dictionary.delete_item(number))
    }

    pub fn add_store(&mut self, store: DictionaryStore) -> Result<()> {
        self.mutate(|dictionary| dictionary.add_store(store))
    }

    pub fn edit_store(&mut self, id: u32, store: DictionaryStore) -> Result<()> {
        self.mutate(|dictionary| dictionary.edit_store(id, store))
    }

    pub fn delete_store(&mut self, id: u32) -> Result<()> {
        self.mutate(|dictionary| dictionary.delete_store(id))
    }

    fn mutate(&mut self, op: impl FnOnce(&mut Dictionary) -> Result<()>) -> Result<()> {
        let mut dictionary = self.matcher.dictionary().clone();
        op(&mut dictionary)?;
        self.matcher = EntityMatcher::with_options(dictionary, self.options);
        Ok(())
    }
}
