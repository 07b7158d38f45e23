use std::collections::BTreeMap;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recon_core::RedistributionPlan;
use recon_model::{
    AllocationDataset, IngestStats, ItemKey, MatchConfidence, MatchRule, StoreKey, StoreRank,
    WarningKind,
};

use crate::pipeline::ReconcileOutcome;

pub fn print_reconcile_summary(outcome: &ReconcileOutcome, show_warnings: bool) {
    println!("Export: {}", outcome.export.display());
    if let Some(roles) = outcome.engine.roles() {
        println!(
            "Columns: store={} item={} quantity={}",
            column_label(&outcome.headers, roles.store),
            column_label(&outcome.headers, roles.item),
            column_label(&outcome.headers, roles.quantity),
        );
    }
    print_store_table(outcome);
    print_item_table(outcome);
    let stats = outcome.engine.stats();
    println!(
        "Rows: {} aggregated, {} dropped",
        stats.rows_ingested, stats.rows_dropped
    );
    println!(
        "Matched: {}/{} items, {}/{} stores",
        stats.items_matched,
        stats.items_matched + stats.items_unmatched,
        stats.stores_matched,
        stats.stores_matched + stats.stores_unmatched
    );
    if let Some(plan) = &outcome.plan {
        print_plan_table(plan);
    }
    if let Some(path) = &outcome.archived_to {
        println!("Archived: {}", path.display());
    }
    print_warnings(stats, show_warnings);
}

fn print_store_table(outcome: &ReconcileOutcome) {
    let engine = &outcome.engine;
    let dataset = engine.dataset();
    let labels = store_labels(dataset);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Store"),
        header_cell("Name"),
        header_cell("Rank"),
        header_cell("Items"),
        header_cell("Units"),
        header_cell("Excluded"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Center);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Center);
    let mut total_units = 0u64;
    for (store, entries) in &dataset.by_store {
        let excluded = engine.excluded().contains(store);
        let units: u64 = entries.iter().map(|entry| entry.quantity).sum();
        total_units += units;
        let (name, rank) = labels.get(store).cloned().unwrap_or((None, None));
        table.add_row(vec![
            store_cell(store, excluded),
            Cell::new(name.unwrap_or_else(|| "-".to_string())),
            rank_cell(rank),
            Cell::new(entries.len()),
            Cell::new(units),
            flag_cell(excluded, "yes", Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All stores")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        Cell::new(total_units).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn print_item_table(outcome: &ReconcileOutcome) {
    let engine = &outcome.engine;
    let dataset = engine.dataset();
    let descriptions = item_descriptions(dataset);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Item"),
        header_cell("Description"),
        header_cell("Stores"),
        header_cell("Units"),
        header_cell("Redistributed"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    let mut total_units = 0u64;
    for (item, entries) in &dataset.by_item {
        let units: u64 = entries.iter().map(|entry| entry.quantity).sum();
        total_units += units;
        let description = descriptions.get(item).cloned().flatten();
        table.add_row(vec![
            Cell::new(item.as_str())
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(description.unwrap_or_else(|| "-".to_string())),
            Cell::new(entries.len()),
            Cell::new(units),
            flag_cell(engine.redistributed().contains(item), "✓", Color::Green),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("All items")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_units).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn print_plan_table(plan: &RedistributionPlan) {
    println!();
    println!("Redistributed {} units ({}):", plan.moved_total, plan.mode);
    if plan.additions.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Item"),
        header_cell("Store"),
        header_cell("Units"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for (item, shares) in &plan.additions {
        for (store, units) in shares {
            table.add_row(vec![
                Cell::new(item.as_str()),
                Cell::new(store.as_str()),
                Cell::new(*units),
            ]);
        }
    }
    println!("{table}");
}

fn print_warnings(stats: &IngestStats, show_warnings: bool) {
    if stats.warnings.is_empty() {
        return;
    }
    if !show_warnings {
        println!(
            "Warnings: {} (rerun with --show-warnings to list)",
            stats.warnings.len()
        );
        return;
    }
    println!();
    println!("Warnings:");
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Kind"),
        header_cell("Input"),
        header_cell("Matched"),
        header_cell("Rule"),
        header_cell("Confidence"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Center);
    align_column(&mut table, 5, CellAlignment::Center);
    for warning in &stats.warnings {
        table.add_row(vec![
            Cell::new(warning.row),
            kind_cell(warning.kind),
            Cell::new(warning.input.clone()),
            Cell::new(warning.matched.clone().unwrap_or_else(|| "-".to_string())),
            rule_cell(warning.rule),
            confidence_cell(warning.confidence),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// First-seen store name and rank per store, harvested from the by-item view.
fn store_labels(
    dataset: &AllocationDataset,
) -> BTreeMap<StoreKey, (Option<String>, Option<StoreRank>)> {
    let mut labels = BTreeMap::new();
    for entries in dataset.by_item.values() {
        for entry in entries {
            labels
                .entry(entry.store.clone())
                .or_insert_with(|| (entry.name.clone(), entry.rank));
        }
    }
    labels
}

/// First-seen item description per item, harvested from the by-store view.
fn item_descriptions(dataset: &AllocationDataset) -> BTreeMap<ItemKey, Option<String>> {
    let mut descriptions = BTreeMap::new();
    for entries in dataset.by_store.values() {
        for entry in entries {
            descriptions
                .entry(entry.item.clone())
                .or_insert_with(|| entry.description.clone());
        }
    }
    descriptions
}

fn column_label(headers: &[String], index: usize) -> String {
    match headers.get(index) {
        Some(header) if !header.trim().is_empty() => header.clone(),
        _ => format!("column {index}"),
    }
}

fn store_cell(store: &StoreKey, excluded: bool) -> Cell {
    if excluded {
        Cell::new(store.as_str()).fg(Color::DarkGrey)
    } else {
        Cell::new(store.as_str())
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    }
}

fn rank_cell(rank: Option<StoreRank>) -> Cell {
    match rank {
        Some(rank) => Cell::new(rank.as_str()),
        None => dim_cell("-"),
    }
}

fn flag_cell(set: bool, label: &str, color: Color) -> Cell {
    if set {
        Cell::new(label).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn kind_cell(kind: WarningKind) -> Cell {
    match kind {
        WarningKind::ItemUnmatched | WarningKind::StoreUnmatched => {
            Cell::new(kind.as_str()).fg(Color::Red)
        }
        WarningKind::ItemFuzzy | WarningKind::StoreFuzzy => {
            Cell::new(kind.as_str()).fg(Color::Yellow)
        }
    }
}

fn rule_cell(rule: Option<MatchRule>) -> Cell {
    match rule {
        Some(rule) => Cell::new(rule.as_str()),
        None => dim_cell("-"),
    }
}

fn confidence_cell(confidence: Option<MatchConfidence>) -> Cell {
    match confidence {
        Some(value) => Cell::new(value.as_str()),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
