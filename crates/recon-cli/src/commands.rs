use anyhow::Result;
use comfy_table::Table;

use recon_archive::JsonArchive;
use recon_core::{ArchiveStore, RedistributeMode};
use recon_ingest::load_dictionary;
use recon_match::DictionaryCatalog;
use recon_model::{DictionaryItem, DictionaryStore};

use crate::cli::{ArchivesArgs, DictionaryArgs, ReconcileArgs, RedistributeArg};
use crate::pipeline::{ReconcileOutcome, ReconcileRequest, run_reconcile};
use crate::summary::apply_table_style;

pub fn run_reconcile_command(args: &ReconcileArgs) -> Result<ReconcileOutcome> {
    let request = ReconcileRequest {
        export: args.export.clone(),
        dictionary: args.dictionary.clone(),
        exclude: args.exclude.clone(),
        redistribute: args.redistribute.map(redistribute_mode),
        archive_dir: args.archive_dir.clone(),
        save_as: args.save_as.clone(),
    };
    run_reconcile(&request)
}

pub fn run_dictionary(args: &DictionaryArgs) -> Result<()> {
    let dictionary = load_dictionary(&args.file)?;
    // Building the catalog proves the file is usable by the matcher.
    let catalog = DictionaryCatalog::new(dictionary);
    let dictionary = catalog.dictionary();
    println!("Dictionary: {}", args.file.display());

    let mut ordered_items: Vec<&DictionaryItem> = dictionary.items.iter().collect();
    ordered_items.sort_by(|a, b| a.number.cmp(&b.number));
    let mut items = Table::new();
    items.set_header(vec!["Item", "Description", "SKUs"]);
    apply_table_style(&mut items);
    for item in ordered_items {
        items.add_row(vec![
            item.number.clone(),
            item.description.clone(),
            item.skus.join(", "),
        ]);
    }
    println!("{items}");

    let mut ordered_stores: Vec<&DictionaryStore> = dictionary.stores.iter().collect();
    ordered_stores.sort_by_key(|store| store.id);
    let mut stores = Table::new();
    stores.set_header(vec!["Store", "Name", "Rank"]);
    apply_table_style(&mut stores);
    for store in ordered_stores {
        stores.add_row(vec![
            store.id.to_string(),
            store.name.clone(),
            store
                .rank
                .map(|rank| rank.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{stores}");
    println!(
        "{} items, {} stores",
        dictionary.items.len(),
        dictionary.stores.len()
    );
    Ok(())
}

pub fn run_archives(args: &ArchivesArgs) -> Result<()> {
    let archive = JsonArchive::new(&args.dir)?;
    if let Some(name) = &args.delete {
        if archive.delete(name)? {
            println!("Deleted {name}");
        } else {
            println!("No snapshot named {name}");
        }
        return Ok(());
    }
    let snapshots = archive.list()?;
    println!("Archive: {}", args.dir.display());
    if snapshots.is_empty() {
        println!("No snapshots");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Name", "Saved", "Description"]);
    apply_table_style(&mut table);
    for meta in snapshots {
        table.add_row(vec![
            meta.name,
            meta.saved_at,
            meta.description.unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn redistribute_mode(arg: RedistributeArg) -> RedistributeMode {
    match arg {
        RedistributeArg::Equal => RedistributeMode::Equal,
        RedistributeArg::Rank => RedistributeMode::Rank,
    }
}
