//! Builds the dual aggregate views by running the matchers over raw rows.

use tracing::debug;

use recon_match::{ColumnRoles, EntityMatcher};
use recon_model::{
    AllocationDataset, AllocationRow, DictionaryItem, DictionaryStore, IngestStats, ItemEntry,
    ItemKey, MatchConfidence, MatchResult, MatchWarning, RawTable, StoreEntry, StoreKey,
    WarningKind, parse_quantity,
};

/// Everything one aggregation pass produces: the retained rows, the dataset
/// built from them, and the matching statistics.
#[derive(Debug, Clone)]
pub struct AggregateOutput {
    pub rows: Vec<AllocationRow>,
    pub dataset: AllocationDataset,
    pub stats: IngestStats,
}

/// Runs both matchers over every retained row and builds the two views.
///
/// Matched tokens aggregate under the canonical dictionary key, unmatched
/// tokens under their trimmed raw value. Rows without a positive quantity
/// and repeated header rows are dropped and counted. Every unmatched or
/// non-exact resolution leaves a warning in the statistics; aggregation
/// itself never fails.
pub fn aggregate(table: &RawTable, roles: ColumnRoles, matcher: &EntityMatcher) -> AggregateOutput {
    let mut output = AggregateOutput {
        rows: Vec::new(),
        dataset: AllocationDataset::default(),
        stats: IngestStats::default(),
    };
    for index in 0..table.rows.len() {
        if table.row_echoes_header(index) {
            output.stats.rows_dropped += 1;
            continue;
        }
        let cells = &table.rows[index];
        let Some(quantity) = parse_quantity(cell(cells, roles.quantity)) else {
            output.stats.rows_dropped += 1;
            continue;
        };
        let row = AllocationRow {
            store_token: cell(cells, roles.store).trim().to_string(),
            item_token: cell(cells, roles.item).trim().to_string(),
            quantity,
            raw: table.record(index),
        };
        ingest_row(&mut output, index + 1, &row, matcher);
        output.rows.push(row);
        output.stats.rows_ingested += 1;
    }
    debug!(
        rows = output.stats.rows_ingested,
        dropped = output.stats.rows_dropped,
        stores = output.dataset.store_count(),
        items = output.dataset.item_count(),
        warnings = output.stats.warnings.len(),
        "aggregation complete"
    );
    output
}

fn cell(cells: &[String], index: usize) -> &str {
    cells.get(index).map(String::as_str).unwrap_or("")
}

fn ingest_row(
    output: &mut AggregateOutput,
    row_number: usize,
    row: &AllocationRow,
    matcher: &EntityMatcher,
) {
    let item_match = matcher.match_item(&row.item_token);
    let store_match = matcher.match_store(&row.store_token);

    let item_key = match &item_match {
        Some(result) => ItemKey::new(&result.entity.number),
        None => ItemKey::new(&row.item_token),
    };
    let store_key = match &store_match {
        Some(result) => StoreKey::from_id(result.entity.id),
        None => StoreKey::new(&row.store_token),
    };

    record_item_outcome(&mut output.stats, row_number, row, item_match.as_ref());
    record_store_outcome(&mut output.stats, row_number, row, store_match.as_ref());

    let store_line = StoreEntry {
        item: item_key.clone(),
        description: item_match
            .as_ref()
            .map(|result| result.entity.description.clone()),
        skus: item_match
            .as_ref()
            .map(|result| result.entity.skus.clone())
            .unwrap_or_default(),
        quantity: row.quantity,
        confidence: item_match.as_ref().map(|result| result.confidence),
    };
    merge_store_line(
        output.dataset.by_store.entry(store_key.clone()).or_default(),
        store_line,
    );

    let item_line = ItemEntry {
        store: store_key,
        name: store_match.as_ref().map(|result| result.entity.name.clone()),
        rank: store_match.as_ref().and_then(|result| result.entity.rank),
        quantity: row.quantity,
        confidence: store_match.as_ref().map(|result| result.confidence),
    };
    merge_item_line(
        output.dataset.by_item.entry(item_key).or_default(),
        item_line,
    );
}

fn record_item_outcome(
    stats: &mut IngestStats,
    row: usize,
    source: &AllocationRow,
    outcome: Option<&MatchResult<DictionaryItem>>,
) {
    match outcome {
        Some(result) => {
            stats.items_matched += 1;
            if !result.is_exact() {
                stats.warnings.push(MatchWarning {
                    row,
                    kind: WarningKind::ItemFuzzy,
                    input: source.item_token.clone(),
                    matched: Some(result.entity.number.clone()),
                    rule: Some(result.rule),
                    confidence: Some(result.confidence),
                });
            }
        }
        None => {
            stats.items_unmatched += 1;
            stats.warnings.push(MatchWarning {
                row,
                kind: WarningKind::ItemUnmatched,
                input: source.item_token.clone(),
                matched: None,
                rule: None,
                confidence: None,
            });
        }
    }
}

fn record_store_outcome(
    stats: &mut IngestStats,
    row: usize,
    source: &AllocationRow,
    outcome: Option<&MatchResult<DictionaryStore>>,
) {
    match outcome {
        Some(result) => {
            stats.stores_matched += 1;
            if !result.is_exact() {
                stats.warnings.push(MatchWarning {
                    row,
                    kind: WarningKind::StoreFuzzy,
                    input: source.store_token.clone(),
                    matched: Some(result.entity.name.clone()),
                    rule: Some(result.rule),
                    confidence: Some(result.confidence),
                });
            }
        }
        None => {
            stats.stores_unmatched += 1;
            stats.warnings.push(MatchWarning {
                row,
                kind: WarningKind::StoreUnmatched,
                input: source.store_token.clone(),
                matched: None,
                rule: None,
                confidence: None,
            });
        }
    }
}

fn merge_store_line(lines: &mut Vec<StoreEntry>, incoming: StoreEntry) {
    if let Some(existing) = lines.iter_mut().find(|line| line.item == incoming.item) {
        existing.quantity += incoming.quantity;
        existing.confidence = weaker(existing.confidence, incoming.confidence);
        return;
    }
    lines.push(incoming);
}

fn merge_item_line(lines: &mut Vec<ItemEntry>, incoming: ItemEntry) {
    if let Some(existing) = lines.iter_mut().find(|line| line.store == incoming.store) {
        existing.quantity += incoming.quantity;
        existing.confidence = weaker(existing.confidence, incoming.confidence);
        return;
    }
    lines.push(incoming);
}

/// Lines merge only under the same key, so both sides are either matched or
/// raw. The merged line keeps the weaker tier: a pair flagged for review
/// stays flagged.
fn weaker(
    left: Option<MatchConfidence>,
    right: Option<MatchConfidence>,
) -> Option<MatchConfidence> {
    match (left, right) {
        (Some(left), Some(right)) => Some(left.min(right)),
        _ => None,
    }
}
