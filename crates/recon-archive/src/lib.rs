//! JSON-file archive for reconciliation snapshots.
//!
//! Snapshots are stored one per file in a flat directory, named
//! `{NORMALIZED_NAME}.json` and pretty-printed so archives stay diffable
//! and hand-inspectable.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use recon_core::{ArchiveMeta, ArchiveSnapshot, ArchiveStore};

/// Directory of JSON snapshot files implementing [`ArchiveStore`].
#[derive(Debug, Clone)]
pub struct JsonArchive {
    /// Base directory holding the snapshot files.
    base_dir: PathBuf,
}

impl JsonArchive {
    /// Opens an archive at `base_dir`, creating the directory if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create archive directory: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    /// Base directory of this archive.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The file a snapshot of `name` lives at.
    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", normalize_name(name)))
    }

    /// Whether a snapshot of `name` is stored.
    pub fn exists(&self, name: &str) -> bool {
        self.snapshot_path(name).exists()
    }
}

impl ArchiveStore for JsonArchive {
    fn save(&self, snapshot: &ArchiveSnapshot) -> Result<()> {
        let path = self.snapshot_path(&snapshot.meta.name);
        let json = serde_json::to_string_pretty(snapshot)
            .with_context(|| format!("Failed to serialize snapshot {}", snapshot.meta.name))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<ArchiveMeta>> {
        let mut metadata = Vec::new();

        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read archive: {}", self.base_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let filename = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
            if !filename.ends_with(".json") {
                continue;
            }

            // Unparsable files are skipped rather than failing the listing.
            let contents = fs::read_to_string(&path)?;
            if let Ok(snapshot) = serde_json::from_str::<ArchiveSnapshot>(&contents) {
                metadata.push(snapshot.meta);
            }
        }

        metadata.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(metadata)
    }

    fn load(&self, name: &str) -> Result<Option<ArchiveSnapshot>> {
        let path = self.snapshot_path(name);
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot from {}", path.display()))?;
        let snapshot: ArchiveSnapshot = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot from {}", path.display()))?;
        Ok(Some(snapshot))
    }

    fn delete(&self, name: &str) -> Result<bool> {
        let path = self.snapshot_path(name);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete snapshot: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

/// Normalize a snapshot name for use in filenames.
fn normalize_name(name: &str) -> String {
    name.trim()
        .to_uppercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
