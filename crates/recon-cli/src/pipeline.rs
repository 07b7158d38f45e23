//! Reconciliation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the dictionary and the allocation export
//! 2. **Reconcile**: detect column roles and aggregate rows into the views
//! 3. **Exclude**: apply requested store exclusions
//! 4. **Redistribute**: move excluded quantity onto the remaining stores
//! 5. **Archive**: optionally save the resulting session snapshot
//!
//! Structural failures (unusable export, no retained rows) abort the run;
//! matching issues are carried as warnings in the outcome.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use recon_archive::JsonArchive;
use recon_core::{ArchiveStore, ReconEngine, RedistributeMode, RedistributionPlan};
use recon_ingest::{load_dictionary, read_export_table};
use recon_model::StoreKey;

/// Everything one `reconcile` invocation asks for.
#[derive(Debug, Clone)]
pub struct ReconcileRequest {
    pub export: PathBuf,
    pub dictionary: PathBuf,
    /// Store keys to exclude; duplicates collapse to a single exclusion.
    pub exclude: Vec<String>,
    pub redistribute: Option<RedistributeMode>,
    pub archive_dir: Option<PathBuf>,
    pub save_as: Option<String>,
}

/// The reconciled session plus everything the summary needs to render it.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub export: PathBuf,
    pub engine: ReconEngine,
    /// Header row of the export, for naming the detected columns.
    pub headers: Vec<String>,
    pub plan: Option<RedistributionPlan>,
    pub archived_to: Option<PathBuf>,
}

pub fn run_reconcile(request: &ReconcileRequest) -> Result<ReconcileOutcome> {
    let ingest_span = info_span!("ingest", export = %request.export.display());
    let ingest_start = Instant::now();
    let (dictionary, table) = ingest_span.in_scope(|| -> Result<_> {
        let dictionary = load_dictionary(&request.dictionary)?;
        let table = read_export_table(&request.export)?;
        Ok((dictionary, table))
    })?;
    info!(
        items = dictionary.items.len(),
        stores = dictionary.stores.len(),
        rows = table.rows.len(),
        duration_ms = ingest_start.elapsed().as_millis(),
        "ingest complete"
    );

    let mut engine = ReconEngine::new(dictionary);
    let reconcile_span = info_span!("reconcile", export = %request.export.display());
    let reconcile_start = Instant::now();
    reconcile_span
        .in_scope(|| engine.load(&table))
        .with_context(|| format!("reconcile {}", request.export.display()))?;
    info!(
        stores = engine.dataset().store_count(),
        items = engine.dataset().item_count(),
        rows = engine.stats().rows_ingested,
        warnings = engine.stats().warnings.len(),
        duration_ms = reconcile_start.elapsed().as_millis(),
        "reconcile complete"
    );

    let requested: BTreeSet<StoreKey> = request.exclude.iter().map(StoreKey::new).collect();
    for store in &requested {
        if !engine.dataset().by_store.contains_key(store) {
            warn!(store = %store, "excluded store not present in the export");
        }
        engine.toggle_exclusion(store);
    }

    let plan = match request.redistribute {
        Some(mode) => {
            let span = info_span!("redistribute", mode = %mode);
            let start = Instant::now();
            let plan = span
                .in_scope(|| engine.redistribute(mode))
                .context("redistribute excluded stores")?;
            info!(
                moved = plan.moved_total,
                items = plan.additions.len(),
                duration_ms = start.elapsed().as_millis(),
                "redistribution complete"
            );
            Some(plan)
        }
        None => None,
    };

    let archived_to = match (&request.archive_dir, &request.save_as) {
        (Some(dir), Some(name)) => {
            let archive = JsonArchive::new(dir)?;
            archive.save(&engine.to_snapshot(name.clone()))?;
            let path = archive.snapshot_path(name);
            info!(path = %path.display(), "session archived");
            Some(path)
        }
        _ => None,
    };

    Ok(ReconcileOutcome {
        export: request.export.clone(),
        headers: table.headers.clone(),
        engine,
        plan,
        archived_to,
    })
}
