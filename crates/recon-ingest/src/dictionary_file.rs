//! Reference dictionary files.
//!
//! A dictionary is a single JSON document:
//!
//! ```json
//! {
//!   "items": [{ "number": "GLD-1", "description": "Glide Widget", "skus": [] }],
//!   "stores": [{ "id": 101, "name": "WATERLOO 1", "rank": "A" }]
//! }
//! ```
//!
//! Loading re-applies every entry through the dictionary's own mutation
//! operations, so duplicate numbers, ids, or names in the file surface as
//! errors here instead of as stale lookups later.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use recon_model::Dictionary;

pub fn load_dictionary(path: &Path) -> Result<Dictionary> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read dictionary: {}", path.display()))?;
    let parsed: Dictionary = serde_json::from_str(&contents)
        .with_context(|| format!("parse dictionary: {}", path.display()))?;
    let dictionary = validate(parsed)
        .with_context(|| format!("validate dictionary: {}", path.display()))?;
    debug!(
        path = %path.display(),
        items = dictionary.items.len(),
        stores = dictionary.stores.len(),
        "dictionary loaded"
    );
    Ok(dictionary)
}

fn validate(parsed: Dictionary) -> Result<Dictionary> {
    let mut dictionary = Dictionary::default();
    for item in parsed.items {
        dictionary.add_item(item)?;
    }
    for store in parsed.stores {
        dictionary.add_store(store)?;
    }
    Ok(dictionary)
}
