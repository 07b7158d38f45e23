use std::fs;
use std::path::PathBuf;

use recon_archive::JsonArchive;
use recon_core::{ArchiveSnapshot, ArchiveStore};
use recon_model::{EngineState, ItemEntry, ItemKey, MatchConfidence, StoreEntry, StoreKey};

fn temp_archive_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    dir.push(format!("recon_archive_{stamp}"));
    dir
}

fn cleanup_dir(dir: &PathBuf) {
    let _ = fs::remove_dir_all(dir);
}

fn sample_state() -> EngineState {
    let mut state = EngineState::default();
    state.dataset.by_store.insert(
        StoreKey::new("101"),
        vec![StoreEntry {
            item: ItemKey::new("GLD-1"),
            description: Some("Glide Widget".to_string()),
            skus: vec!["410021982504".to_string()],
            quantity: 5,
            confidence: Some(MatchConfidence::Exact),
        }],
    );
    state.dataset.by_item.insert(
        ItemKey::new("GLD-1"),
        vec![ItemEntry {
            store: StoreKey::new("101"),
            name: Some("WATERLOO 1".to_string()),
            rank: None,
            quantity: 5,
            confidence: Some(MatchConfidence::Exact),
        }],
    );
    state.excluded.insert(StoreKey::new("102"));
    state.redistributed.insert(ItemKey::new("GLD-1"));
    state
}

#[test]
fn archive_save_and_load() {
    let dir = temp_archive_dir();
    let archive = JsonArchive::new(&dir).expect("create archive");

    let snapshot = ArchiveSnapshot::new("AUGUST", sample_state());
    archive.save(&snapshot).expect("save snapshot");

    let path = archive.snapshot_path("AUGUST");
    assert!(path.exists());
    assert!(path.to_string_lossy().ends_with("AUGUST.json"));

    let loaded = archive
        .load("AUGUST")
        .expect("load snapshot")
        .expect("snapshot should exist");

    assert_eq!(loaded.meta.name, "AUGUST");
    assert_eq!(loaded.state, snapshot.state);
    assert!(!loaded.meta.saved_at.is_empty());

    cleanup_dir(&dir);
}

#[test]
fn archive_load_nonexistent() {
    let dir = temp_archive_dir();
    let archive = JsonArchive::new(&dir).expect("create archive");

    let loaded = archive.load("NOEXIST").expect("load attempt");
    assert!(loaded.is_none());

    cleanup_dir(&dir);
}

#[test]
fn archive_exists_check() {
    let dir = temp_archive_dir();
    let archive = JsonArchive::new(&dir).expect("create archive");

    assert!(!archive.exists("AUGUST"));

    archive
        .save(&ArchiveSnapshot::new("AUGUST", sample_state()))
        .expect("save snapshot");

    assert!(archive.exists("AUGUST"));
    assert!(!archive.exists("SEPTEMBER"));

    cleanup_dir(&dir);
}

#[test]
fn archive_overwrites_same_name() {
    let dir = temp_archive_dir();
    let archive = JsonArchive::new(&dir).expect("create archive");

    archive
        .save(&ArchiveSnapshot::new("AUGUST", EngineState::default()))
        .expect("save empty");
    archive
        .save(&ArchiveSnapshot::new("AUGUST", sample_state()))
        .expect("save replacement");

    let loaded = archive.load("AUGUST").expect("load").expect("exists");
    assert_eq!(loaded.state, sample_state());
    assert_eq!(archive.list().expect("list").len(), 1);

    cleanup_dir(&dir);
}

#[test]
fn archive_delete() {
    let dir = temp_archive_dir();
    let archive = JsonArchive::new(&dir).expect("create archive");

    archive
        .save(&ArchiveSnapshot::new("AUGUST", sample_state()))
        .expect("save snapshot");

    assert!(archive.exists("AUGUST"));

    let deleted = archive.delete("AUGUST").expect("delete");
    assert!(deleted);
    assert!(!archive.exists("AUGUST"));

    let deleted_again = archive.delete("AUGUST").expect("delete again");
    assert!(!deleted_again);

    cleanup_dir(&dir);
}

#[test]
fn archive_list_sorts_by_name() {
    let dir = temp_archive_dir();
    let archive = JsonArchive::new(&dir).expect("create archive");

    archive
        .save(&ArchiveSnapshot::new("WEEK 2", sample_state()))
        .expect("save");
    archive
        .save(&ArchiveSnapshot::new("WEEK 1", sample_state()).with_description("baseline"))
        .expect("save");
    archive
        .save(&ArchiveSnapshot::new("AUGUST", sample_state()))
        .expect("save");

    let list = archive.list().expect("list snapshots");
    assert_eq!(list.len(), 3);
    assert_eq!(list[0].name, "AUGUST");
    assert_eq!(list[1].name, "WEEK 1");
    assert_eq!(list[2].name, "WEEK 2");
    assert_eq!(list[1].description.as_deref(), Some("baseline"));

    cleanup_dir(&dir);
}

#[test]
fn archive_list_skips_unparsable_files() {
    let dir = temp_archive_dir();
    let archive = JsonArchive::new(&dir).expect("create archive");

    archive
        .save(&ArchiveSnapshot::new("AUGUST", sample_state()))
        .expect("save");
    fs::write(dir.join("broken.json"), "not json").expect("write broken file");
    fs::write(dir.join("notes.txt"), "ignore me").expect("write stray file");

    let list = archive.list().expect("list snapshots");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "AUGUST");

    cleanup_dir(&dir);
}

#[test]
fn normalize_special_characters_in_names() {
    let dir = temp_archive_dir();
    let archive = JsonArchive::new(&dir).expect("create archive");

    archive
        .save(&ArchiveSnapshot::new("week 33 / retry", sample_state()))
        .expect("save");

    // Stored as WEEK_33___RETRY.json, loadable under the original name.
    let loaded = archive
        .load("week 33 / retry")
        .expect("load")
        .expect("exists");
    assert_eq!(loaded.meta.name, "week 33 / retry");
    assert!(archive.snapshot_path("week 33 / retry").exists());

    cleanup_dir(&dir);
}
