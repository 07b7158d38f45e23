//! The live reconciliation session: load, exclusion, redistribution, undo.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use recon_match::{ColumnRoles, EntityMatcher, detect_columns};
use recon_model::{
    AllocationDataset, AllocationRow, Dictionary, EngineState, IngestStats, ItemEntry, ItemKey,
    RawTable, ReconError, Result, StoreEntry, StoreKey,
};

use crate::aggregate::aggregate;
use crate::archive::ArchiveSnapshot;
use crate::history::History;
use crate::partition::{PartitionedViews, partition};
use crate::redistribute::{RedistributeMode, RedistributionPlan, plan_redistribution};

/// Owns the current reconciliation state, its derived partitioned views, and
/// the undo history.
///
/// Every mutating operation snapshots the prior state, applies the change,
/// and refreshes the views before returning, so callers always observe
/// dataset, views, and history as a consistent trio.
#[derive(Debug)]
pub struct ReconEngine {
    matcher: EntityMatcher,
    state: EngineState,
    views: PartitionedViews,
    history: History,
    roles: Option<ColumnRoles>,
    rows: Vec<AllocationRow>,
    stats: IngestStats,
}

impl ReconEngine {
    pub fn new(dictionary: Dictionary) -> Self {
        Self {
            matcher: EntityMatcher::new(dictionary),
            state: EngineState::default(),
            views: PartitionedViews::default(),
            history: History::default(),
            roles: None,
            rows: Vec::new(),
            stats: IngestStats::default(),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        self.matcher.dictionary()
    }

    pub fn matcher(&self) -> &EntityMatcher {
        &self.matcher
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn dataset(&self) -> &AllocationDataset {
        &self.state.dataset
    }

    pub fn views(&self) -> &PartitionedViews {
        &self.views
    }

    pub fn excluded(&self) -> &BTreeSet<StoreKey> {
        &self.state.excluded
    }

    pub fn redistributed(&self) -> &BTreeSet<ItemKey> {
        &self.state.redistributed
    }

    /// Column roles detected by the most recent load.
    pub fn roles(&self) -> Option<ColumnRoles> {
        self.roles
    }

    /// Rows retained by the most recent load, for traceability.
    pub fn rows(&self) -> &[AllocationRow] {
        &self.rows
    }

    /// Matching statistics from the most recent load.
    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Detects columns, aggregates the table, and replaces the live dataset.
    /// The previous state stays one undo step away; [`Self::stats`] and
    /// [`Self::roles`] report on the new load afterwards.
    pub fn load(&mut self, table: &RawTable) -> Result<()> {
        let Some(roles) = detect_columns(table, &self.matcher) else {
            return Err(ReconError::NoColumns);
        };
        let output = aggregate(table, roles, &self.matcher);
        if output.dataset.is_empty() {
            return Err(ReconError::EmptyDataset);
        }
        let before = std::mem::take(&mut self.state);
        self.state.dataset = output.dataset;
        self.roles = Some(roles);
        self.rows = output.rows;
        self.stats = output.stats;
        self.history.record(before, "Loaded allocation export");
        self.refresh_views();
        debug!(
            stores = self.state.dataset.store_count(),
            items = self.state.dataset.item_count(),
            rows = self.stats.rows_ingested,
            "allocation export loaded"
        );
        Ok(())
    }

    /// Flips a store in or out of the exclusion set and returns whether it
    /// is now excluded. Keys absent from the dataset may be excluded; they
    /// simply partition nothing.
    pub fn toggle_exclusion(&mut self, store: &StoreKey) -> bool {
        let before = self.state.clone();
        let now_excluded = if self.state.excluded.remove(store) {
            false
        } else {
            self.state.excluded.insert(store.clone());
            true
        };
        let action = if now_excluded { "Excluded" } else { "Included" };
        self.history.record(before, format!("{action} store {store}"));
        self.refresh_views();
        debug!(store = %store, excluded = now_excluded, "exclusion toggled");
        now_excluded
    }

    /// Plans and applies redistribution of all excluded quantity under
    /// `mode`. On success the exclusion set is consumed and every item that
    /// moved is marked redistributed.
    pub fn redistribute(&mut self, mode: RedistributeMode) -> Result<RedistributionPlan> {
        if self.state.excluded.is_empty() {
            return Err(ReconError::NothingExcluded);
        }
        let plan = plan_redistribution(&self.views, mode)?;
        let before = self.state.clone();
        self.apply_plan(&plan);
        self.history.record(
            before,
            format!("Redistributed {} units ({})", plan.moved_total, plan.mode),
        );
        self.refresh_views();
        debug!(
            moved = plan.moved_total,
            items = plan.additions.len(),
            mode = %plan.mode,
            "redistribution applied"
        );
        Ok(plan)
    }

    /// Undoes the most recent action, returning its description.
    pub fn undo(&mut self) -> Option<String> {
        let description = self.history.undo(&mut self.state)?;
        self.refresh_views();
        Some(description)
    }

    /// Re-applies the most recently undone action, returning its description.
    pub fn redo(&mut self) -> Option<String> {
        let description = self.history.redo(&mut self.state)?;
        self.refresh_views();
        Some(description)
    }

    /// Replaces the live state wholesale. The replaced state stays one undo
    /// step away.
    pub fn restore(&mut self, state: EngineState, description: impl Into<String>) {
        let before = std::mem::replace(&mut self.state, state);
        self.history.record(before, description);
        self.refresh_views();
    }

    /// Packages the live state for archiving under `name`.
    pub fn to_snapshot(&self, name: impl Into<String>) -> ArchiveSnapshot {
        ArchiveSnapshot::new(name, self.state.clone())
    }

    /// Replaces the live state with an archived snapshot.
    pub fn restore_snapshot(&mut self, snapshot: ArchiveSnapshot) {
        let description = format!("Loaded archive {}", snapshot.meta.name);
        self.restore(snapshot.state, description);
    }

    fn refresh_views(&mut self) {
        self.views = partition(&self.state.dataset, &self.state.excluded);
    }

    fn apply_plan(&mut self, plan: &RedistributionPlan) {
        let enrichment = Enrichment::harvest(&self.state.dataset);
        let mut dataset = partition(&self.state.dataset, &self.state.excluded).included;
        for (item, shares) in &plan.additions {
            for (store, quantity) in shares {
                enrichment.add(&mut dataset, store, item, *quantity);
            }
            self.state.redistributed.insert(item.clone());
        }
        self.state.dataset = dataset;
        self.state.excluded.clear();
    }
}

/// Display attributes per known key, captured from the full dataset before
/// the excluded partition is dropped, so redistribution can create complete
/// entries in stores that never carried the item.
struct Enrichment {
    items: BTreeMap<ItemKey, StoreEntry>,
    stores: BTreeMap<StoreKey, ItemEntry>,
}

impl Enrichment {
    fn harvest(dataset: &AllocationDataset) -> Self {
        let mut items = BTreeMap::new();
        for lines in dataset.by_store.values() {
            for line in lines {
                items.entry(line.item.clone()).or_insert_with(|| line.clone());
            }
        }
        let mut stores = BTreeMap::new();
        for lines in dataset.by_item.values() {
            for line in lines {
                stores.entry(line.store.clone()).or_insert_with(|| line.clone());
            }
        }
        Self { items, stores }
    }

    fn add(&self, dataset: &mut AllocationDataset, store: &StoreKey, item: &ItemKey, quantity: u64) {
        let lines = dataset.by_store.entry(store.clone()).or_default();
        if let Some(line) = lines.iter_mut().find(|line| line.item == *item) {
            line.quantity += quantity;
        } else {
            let mut line = self.items.get(item).cloned().unwrap_or_else(|| StoreEntry {
                item: item.clone(),
                description: None,
                skus: Vec::new(),
                quantity: 0,
                confidence: None,
            });
            line.quantity = quantity;
            lines.push(line);
        }

        let lines = dataset.by_item.entry(item.clone()).or_default();
        if let Some(line) = lines.iter_mut().find(|line| line.store == *store) {
            line.quantity += quantity;
        } else {
            let mut line = self.stores.get(store).cloned().unwrap_or_else(|| ItemEntry {
                store: store.clone(),
                name: None,
                rank: None,
                quantity: 0,
                confidence: None,
            });
            line.quantity = quantity;
            lines.push(line);
        }
    }
}
