//! Best-effort detection of which input columns mean store, item, quantity.
//!
//! Exports disagree wildly about column order and header wording, so the
//! detector reads a sample of rows through the entity matcher and lets the
//! content vote. Header names are only consulted when the content is
//! inconclusive, and column position is the final fallback. Detection never
//! fails on malformed input; it degrades.

use std::collections::BTreeSet;

use recon_model::{ColumnHint, RawTable, parse_quantity};

use crate::matcher::EntityMatcher;

const SAMPLE_ROWS: usize = 10;

const STORE_SYNONYMS: [&str; 6] = ["store", "shop", "location", "branch", "site", "loc"];
const ITEM_SYNONYMS: [&str; 6] = ["item", "product", "sku", "article", "style", "part"];
const QUANTITY_SYNONYMS: [&str; 6] = ["qty", "quantity", "amount", "units", "count", "pieces"];

/// The detected column role assignment, as indices into the table's headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRoles {
    pub store: usize,
    pub item: usize,
    pub quantity: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct ColumnTally {
    sampled: usize,
    empty: usize,
    numeric: usize,
    in_band: usize,
    store_hits: usize,
    item_hits: usize,
}

impl ColumnTally {
    fn non_empty(self) -> usize {
        self.sampled - self.empty
    }

    /// True when most sampled values are numbers inside the dictionary's
    /// store id range, the signature of an unlabeled store id column.
    fn looks_like_store_ids(self) -> bool {
        self.in_band > 0 && self.in_band * 2 > self.non_empty()
    }
}

/// Per-column shape summary over the whole table, index-aligned with
/// `table.headers`.
pub fn column_hints(table: &RawTable) -> Vec<ColumnHint> {
    let row_count = table.rows.len();
    let mut hints = Vec::with_capacity(table.headers.len());
    for column in 0..table.headers.len() {
        let mut non_null = 0usize;
        let mut numeric = 0usize;
        let mut uniques = BTreeSet::new();
        for row in &table.rows {
            let value = row.get(column).map(String::as_str).unwrap_or("");
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }
            non_null += 1;
            uniques.insert(trimmed.to_string());
            if is_numeric(trimmed) {
                numeric += 1;
            }
        }
        let null_ratio = if row_count == 0 {
            1.0
        } else {
            (row_count.saturating_sub(non_null)) as f64 / row_count as f64
        };
        let unique_ratio = if non_null == 0 {
            0.0
        } else {
            uniques.len() as f64 / non_null as f64
        };
        hints.push(ColumnHint {
            is_numeric: non_null > 0 && numeric == non_null,
            unique_ratio,
            null_ratio,
        });
    }
    hints
}

/// Infers the store, item, and quantity columns of a raw table.
///
/// Returns `None` only for a table with no columns at all. Repeated header
/// rows inside the data are ignored while sampling; every undetermined role
/// degrades through header-name synonyms to a positional default.
pub fn detect_columns(table: &RawTable, matcher: &EntityMatcher) -> Option<ColumnRoles> {
    if table.headers.is_empty() {
        return None;
    }
    let sample = sample_rows(table);
    let tallies = tally_columns(table, matcher, &sample);
    let hints = column_hints(table);

    let mut store = pick_store(&tallies, &hints);
    let mut item = argmax_positive(tallies.iter().map(|tally| tally.item_hits));
    if store.is_some() && store == item {
        store = None;
        item = None;
    }

    let mut taken = BTreeSet::new();
    let store = resolve(table, &mut taken, store, &STORE_SYNONYMS, 0);
    let item = resolve(table, &mut taken, item, &ITEM_SYNONYMS, 1);
    let quantity_pick = pick_quantity(&tallies, &hints, &taken);
    let quantity = resolve(table, &mut taken, quantity_pick, &QUANTITY_SYNONYMS, 2);

    Some(ColumnRoles {
        store,
        item,
        quantity,
    })
}

fn sample_rows(table: &RawTable) -> Vec<usize> {
    let mut picked = Vec::new();
    for row in 0..table.rows.len() {
        if table.row_echoes_header(row) {
            continue;
        }
        picked.push(row);
        if picked.len() == SAMPLE_ROWS {
            break;
        }
    }
    picked
}

fn tally_columns(table: &RawTable, matcher: &EntityMatcher, sample: &[usize]) -> Vec<ColumnTally> {
    let mut tallies = vec![ColumnTally::default(); table.headers.len()];
    let band = matcher.store_id_range();
    for &row in sample {
        for (column, tally) in tallies.iter_mut().enumerate() {
            let value = table.rows[row]
                .get(column)
                .map(String::as_str)
                .unwrap_or("")
                .trim();
            tally.sampled += 1;
            if value.is_empty() {
                tally.empty += 1;
                continue;
            }
            if is_numeric(value) {
                tally.numeric += 1;
                if in_band(value, band) {
                    tally.in_band += 1;
                }
            }
            if matcher.match_store(value).is_some() {
                tally.store_hits += 1;
            }
            if matcher.match_item(value).is_some() {
                tally.item_hits += 1;
            }
        }
    }
    tallies
}

fn pick_store(tallies: &[ColumnTally], hints: &[ColumnHint]) -> Option<usize> {
    if let Some(column) = argmax_positive(tallies.iter().map(|tally| tally.store_hits)) {
        return Some(column);
    }
    // No value resolved as a store; a fully numeric column sitting in the
    // dictionary's id band is the next best guess.
    let mut best: Option<(usize, usize)> = None;
    for (column, tally) in tallies.iter().enumerate() {
        if !hints.get(column).is_some_and(|hint| hint.is_numeric) {
            continue;
        }
        if !tally.looks_like_store_ids() {
            continue;
        }
        if best.is_none_or(|(_, current)| tally.in_band > current) {
            best = Some((column, tally.in_band));
        }
    }
    best.map(|(column, _)| column)
}

fn pick_quantity(
    tallies: &[ColumnTally],
    hints: &[ColumnHint],
    taken: &BTreeSet<usize>,
) -> Option<usize> {
    let candidate = |column: usize, tally: &ColumnTally| {
        !taken.contains(&column)
            && (tally.numeric > 0 || hints.get(column).is_some_and(|hint| hint.is_numeric))
    };
    let mut best: Option<(usize, usize)> = None;
    let mut best_id_looking: Option<(usize, usize)> = None;
    for (column, tally) in tallies.iter().enumerate() {
        if !candidate(column, tally) {
            continue;
        }
        let slot = if tally.looks_like_store_ids() {
            &mut best_id_looking
        } else {
            &mut best
        };
        if slot.is_none_or(|(_, current)| tally.numeric > current) {
            *slot = Some((column, tally.numeric));
        }
    }
    // Columns full of store-id-like numbers only win when nothing else is
    // numeric.
    best.or(best_id_looking).map(|(column, _)| column)
}

fn resolve(
    table: &RawTable,
    taken: &mut BTreeSet<usize>,
    picked: Option<usize>,
    synonyms: &[&str],
    preferred: usize,
) -> usize {
    let column = picked
        .filter(|column| !taken.contains(column))
        .or_else(|| column_named(table, synonyms, taken))
        .unwrap_or_else(|| fallback_position(preferred, table.headers.len(), taken));
    taken.insert(column);
    column
}

fn column_named(table: &RawTable, synonyms: &[&str], taken: &BTreeSet<usize>) -> Option<usize> {
    for synonym in synonyms {
        for (column, header) in table.headers.iter().enumerate() {
            if taken.contains(&column) {
                continue;
            }
            if header.to_lowercase().contains(synonym) {
                return Some(column);
            }
        }
    }
    None
}

fn fallback_position(preferred: usize, columns: usize, taken: &BTreeSet<usize>) -> usize {
    let preferred = preferred.min(columns.saturating_sub(1));
    if !taken.contains(&preferred) {
        return preferred;
    }
    (0..columns)
        .find(|column| !taken.contains(column))
        .unwrap_or(preferred)
}

fn argmax_positive(values: impl Iterator<Item = usize>) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (column, value) in values.enumerate() {
        if value == 0 {
            continue;
        }
        if best.is_none_or(|(_, current)| value > current) {
            best = Some((column, value));
        }
    }
    best.map(|(column, _)| column)
}

fn is_numeric(value: &str) -> bool {
    value.parse::<f64>().is_ok() || parse_quantity(value).is_some()
}

fn in_band(value: &str, band: Option<(u32, u32)>) -> bool {
    let Some((min, max)) = band else {
        return false;
    };
    let id = value
        .parse::<u32>()
        .ok()
        .or_else(|| parse_quantity(value).and_then(|q| u32::try_from(q).ok()));
    id.is_some_and(|id| id >= min && id <= max)
}
