use recon_core::{RedistributeMode, ReconEngine};
use recon_model::{
    Dictionary, DictionaryItem, DictionaryStore, ItemKey, RawTable, ReconError, StoreKey,
    StoreRank, WarningKind,
};

fn dictionary() -> Dictionary {
    Dictionary::new(
        vec![
            DictionaryItem {
                number: "GLD-1".to_string(),
                description: "Glide Widget".to_string(),
                skus: vec!["410021982504".to_string()],
            },
            DictionaryItem {
                number: "SLV-2".to_string(),
                description: "Sleeve Pack".to_string(),
                skus: Vec::new(),
            },
        ],
        vec![
            DictionaryStore {
                id: 101,
                name: "WATERLOO 1".to_string(),
                rank: Some(StoreRank::A),
            },
            DictionaryStore {
                id: 102,
                name: "WATERLOO 2".to_string(),
                rank: Some(StoreRank::B),
            },
            DictionaryStore {
                id: 205,
                name: "ST JACOBS MARKET".to_string(),
                rank: Some(StoreRank::C),
            },
            DictionaryStore {
                id: 300,
                name: "KING STREET".to_string(),
                rank: None,
            },
        ],
    )
}

fn table(rows: &[(&str, &str, &str)]) -> RawTable {
    RawTable::new(
        vec!["Store".to_string(), "Item".to_string(), "Qty".to_string()],
        rows.iter()
            .map(|(store, item, qty)| vec![store.to_string(), item.to_string(), qty.to_string()])
            .collect(),
    )
}

fn loaded_engine(rows: &[(&str, &str, &str)]) -> ReconEngine {
    let mut engine = ReconEngine::new(dictionary());
    engine.load(&table(rows)).expect("load");
    engine
}

fn retained_total(engine: &ReconEngine) -> u64 {
    engine.rows().iter().map(|row| row.quantity).sum()
}

#[test]
fn end_to_end_exclusion_and_equal_redistribution() {
    let mut engine = loaded_engine(&[("101", "GLD-1", "5"), ("102", "GLD-1", "3")]);

    let item = ItemKey::new("GLD-1");
    assert_eq!(engine.dataset().by_item[&item].len(), 2);
    assert_eq!(engine.dataset().item_total(&item), 8);

    assert!(engine.toggle_exclusion(&StoreKey::new("101")));
    assert_eq!(engine.views().excluded.total_by_store(), 5);
    assert_eq!(engine.views().included.total_by_store(), 3);

    let plan = engine.redistribute(RedistributeMode::Equal).expect("redistribute");
    assert_eq!(plan.moved_total, 5);

    assert_eq!(engine.dataset().store_total(&StoreKey::new("102")), 8);
    assert!(!engine.dataset().by_store.contains_key(&StoreKey::new("101")));
    assert!(engine.redistributed().contains(&item));
    assert!(engine.excluded().is_empty());
    assert_eq!(engine.dataset().item_total(&item), 8);
}

#[test]
fn totals_stay_conserved_through_toggle_and_redistribution() {
    let mut engine = loaded_engine(&[
        ("101", "GLD-1", "5"),
        ("102", "GLD-1", "3"),
        ("205", "SLV-2", "7"),
        ("MAIN ST", "XYZ-9", "4"),
    ]);
    let total = retained_total(&engine);
    assert_eq!(engine.dataset().total_by_store(), total);
    assert_eq!(engine.dataset().total_by_item(), total);

    engine.toggle_exclusion(&StoreKey::new("205"));
    assert_eq!(
        engine.views().included.total_by_store() + engine.views().excluded.total_by_store(),
        total
    );

    engine.redistribute(RedistributeMode::Equal).expect("redistribute");
    assert_eq!(engine.dataset().total_by_store(), total);
    assert_eq!(engine.dataset().total_by_item(), total);
}

#[test]
fn undo_and_redo_round_trip_the_exact_state() {
    let mut engine = loaded_engine(&[("101", "GLD-1", "5"), ("102", "GLD-1", "3")]);
    let before_toggle = engine.state().clone();

    engine.toggle_exclusion(&StoreKey::new("101"));
    let after_toggle = engine.state().clone();
    assert_ne!(before_toggle, after_toggle);

    let undone = engine.undo().expect("undo");
    assert_eq!(undone, "Excluded store 101");
    assert_eq!(engine.state(), &before_toggle);
    assert!(engine.views().excluded.is_empty());

    let redone = engine.redo().expect("redo");
    assert_eq!(redone, "Excluded store 101");
    assert_eq!(engine.state(), &after_toggle);
    assert_eq!(engine.views().excluded.total_by_store(), 5);
}

#[test]
fn undo_steps_back_through_redistribution_and_load() {
    let mut engine = loaded_engine(&[("101", "GLD-1", "5"), ("102", "GLD-1", "3")]);
    let loaded = engine.state().clone();

    engine.toggle_exclusion(&StoreKey::new("101"));
    let excluded = engine.state().clone();
    engine.redistribute(RedistributeMode::Equal).expect("redistribute");

    assert_eq!(engine.undo().as_deref(), Some("Redistributed 5 units (equal)"));
    assert_eq!(engine.state(), &excluded);
    assert_eq!(engine.undo().as_deref(), Some("Excluded store 101"));
    assert_eq!(engine.state(), &loaded);
    assert_eq!(engine.undo().as_deref(), Some("Loaded allocation export"));
    assert!(engine.dataset().is_empty());
    assert_eq!(engine.undo(), None);
}

#[test]
fn load_failures_surface_structural_errors() {
    let mut engine = ReconEngine::new(dictionary());

    let no_columns = engine.load(&RawTable::default());
    assert!(matches!(no_columns, Err(ReconError::NoColumns)));

    let all_dropped = engine.load(&table(&[("101", "GLD-1", "0"), ("102", "GLD-1", "")]));
    assert!(matches!(all_dropped, Err(ReconError::EmptyDataset)));
    assert!(!engine.can_undo());
}

#[test]
fn reload_replaces_dataset_and_clears_exclusions() {
    let mut engine = loaded_engine(&[("101", "GLD-1", "5")]);
    engine.toggle_exclusion(&StoreKey::new("101"));

    engine.load(&table(&[("102", "SLV-2", "2")])).expect("reload");

    assert!(engine.excluded().is_empty());
    assert!(engine.redistributed().is_empty());
    assert_eq!(engine.dataset().store_total(&StoreKey::new("102")), 2);
    assert!(!engine.dataset().by_store.contains_key(&StoreKey::new("101")));
}

#[test]
fn redistribution_preconditions_are_checked() {
    let mut engine = loaded_engine(&[("101", "GLD-1", "5"), ("102", "GLD-1", "3")]);

    let nothing = engine.redistribute(RedistributeMode::Equal);
    assert!(matches!(nothing, Err(ReconError::NothingExcluded)));

    engine.toggle_exclusion(&StoreKey::new("101"));
    engine.toggle_exclusion(&StoreKey::new("102"));
    let no_recipients = engine.redistribute(RedistributeMode::Equal);
    assert!(matches!(no_recipients, Err(ReconError::NoIncludedStores)));

    // Failed attempts must not consume the exclusion set.
    assert_eq!(engine.excluded().len(), 2);
}

#[test]
fn excluding_an_unknown_store_moves_nothing() {
    let mut engine = loaded_engine(&[("101", "GLD-1", "5")]);

    assert!(engine.toggle_exclusion(&StoreKey::new("999")));
    assert_eq!(engine.views().included.total_by_store(), 5);
    assert!(engine.views().excluded.is_empty());

    let plan = engine.redistribute(RedistributeMode::Equal).expect("redistribute");
    assert!(plan.is_empty());
    assert_eq!(engine.dataset().store_total(&StoreKey::new("101")), 5);
    assert!(engine.excluded().is_empty());
    assert!(engine.redistributed().is_empty());
}

#[test]
fn rank_redistribution_weights_recipients_by_rank() {
    let mut engine = loaded_engine(&[
        ("300", "GLD-1", "11"),
        ("101", "GLD-1", "1"),
        ("102", "GLD-1", "1"),
        ("205", "GLD-1", "1"),
    ]);

    engine.toggle_exclusion(&StoreKey::new("300"));
    let plan = engine.redistribute(RedistributeMode::Rank).expect("redistribute");

    // Weights 3/2/1: floors 5/3/1 of 11, leftover 2 to the heaviest two.
    let shares = &plan.additions[&ItemKey::new("GLD-1")];
    assert_eq!(shares[&StoreKey::new("101")], 6);
    assert_eq!(shares[&StoreKey::new("102")], 4);
    assert_eq!(shares[&StoreKey::new("205")], 1);

    assert_eq!(engine.dataset().store_total(&StoreKey::new("101")), 7);
    assert_eq!(engine.dataset().store_total(&StoreKey::new("102")), 5);
    assert_eq!(engine.dataset().store_total(&StoreKey::new("205")), 2);
    assert_eq!(engine.dataset().item_total(&ItemKey::new("GLD-1")), 14);
}

#[test]
fn redistribution_creates_entries_for_stores_missing_the_item() {
    let mut engine = loaded_engine(&[
        ("101", "GLD-1", "6"),
        ("102", "SLV-2", "1"),
        ("205", "SLV-2", "1"),
    ]);

    engine.toggle_exclusion(&StoreKey::new("101"));
    engine.redistribute(RedistributeMode::Equal).expect("redistribute");

    let item = ItemKey::new("GLD-1");
    assert_eq!(engine.dataset().item_total(&item), 6);
    let entries = &engine.dataset().by_item[&item];
    assert_eq!(entries.len(), 2);
    // New entries carry the matched store's display attributes.
    assert!(entries.iter().any(|entry| entry.store == StoreKey::new("102")
        && entry.name.as_deref() == Some("WATERLOO 2")));

    let lines = &engine.dataset().by_store[&StoreKey::new("205")];
    let line = lines
        .iter()
        .find(|line| line.item == item)
        .expect("new store line");
    assert_eq!(line.description.as_deref(), Some("Glide Widget"));
    assert_eq!(line.quantity, 3);
}

#[test]
fn archive_snapshots_round_trip_the_whole_session() {
    let mut engine = loaded_engine(&[("101", "GLD-1", "5"), ("102", "GLD-1", "3")]);
    engine.toggle_exclusion(&StoreKey::new("101"));

    let snapshot = engine
        .to_snapshot("AUGUST")
        .with_description("before redistribution");
    assert_eq!(snapshot.meta.name, "AUGUST");
    assert_eq!(
        snapshot.meta.description.as_deref(),
        Some("before redistribution")
    );
    assert_eq!(&snapshot.state, engine.state());

    engine
        .redistribute(RedistributeMode::Equal)
        .expect("redistribute");
    let modified = engine.state().clone();

    engine.restore_snapshot(snapshot.clone());
    assert_eq!(engine.state(), &snapshot.state);

    assert_eq!(engine.undo().as_deref(), Some("Loaded archive AUGUST"));
    assert_eq!(engine.state(), &modified);
}

#[test]
fn warnings_surface_fuzzy_and_unmatched_rows() {
    let engine = loaded_engine(&[
        ("101", "GLD-1", "5"),
        ("MARKET AT ST JACOBS", "GLD", "2"),
        ("777", "NOPE-1", "1"),
    ]);

    let stats = engine.stats();
    assert_eq!(stats.rows_ingested, 3);
    assert_eq!(stats.stores_matched, 2);
    assert_eq!(stats.stores_unmatched, 1);
    assert_eq!(stats.items_matched, 2);
    assert_eq!(stats.items_unmatched, 1);

    let fuzzy_store = stats
        .warnings
        .iter()
        .find(|warning| warning.kind == WarningKind::StoreFuzzy)
        .expect("fuzzy store warning");
    assert_eq!(fuzzy_store.matched.as_deref(), Some("ST JACOBS MARKET"));

    let unmatched_rows: Vec<usize> = stats
        .warnings
        .iter()
        .filter(|warning| {
            matches!(
                warning.kind,
                WarningKind::ItemUnmatched | WarningKind::StoreUnmatched
            )
        })
        .map(|warning| warning.row)
        .collect();
    assert_eq!(unmatched_rows, vec![3, 3]);
}
