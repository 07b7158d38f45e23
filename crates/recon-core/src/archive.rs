//! Archive contract for saving and restoring reconciliation sessions.
//!
//! The engine never touches the filesystem itself. Anything that can hold
//! named [`ArchiveSnapshot`]s behind this contract works as a backing
//! store; `recon-archive` ships the JSON-directory implementation.

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use recon_model::EngineState;

/// Metadata describing a stored snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveMeta {
    /// Name the snapshot was saved under.
    pub name: String,
    /// Optional free-form note.
    pub description: Option<String>,
    /// When the snapshot was saved (RFC 3339).
    pub saved_at: String,
}

/// A complete session under a name: the dataset, the exclusion set and the
/// redistributed markers travel together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveSnapshot {
    pub meta: ArchiveMeta,
    pub state: EngineState,
}

impl ArchiveSnapshot {
    /// Wraps `state` under `name`, stamped with the current time.
    pub fn new(name: impl Into<String>, state: EngineState) -> Self {
        Self {
            meta: ArchiveMeta {
                name: name.into(),
                description: None,
                saved_at: Utc::now().to_rfc3339(),
            },
            state,
        }
    }

    /// Adds a free-form note to the metadata.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta.description = Some(description.into());
        self
    }
}

/// Storage contract for named snapshots.
///
/// Lookups go by [`ArchiveMeta::name`]; how names map to storage locations
/// is the implementation's business.
pub trait ArchiveStore {
    /// Persists a snapshot under its metadata name, replacing any previous
    /// snapshot of the same name.
    fn save(&self, snapshot: &ArchiveSnapshot) -> Result<()>;

    /// Metadata for every stored snapshot, sorted by name.
    fn list(&self) -> Result<Vec<ArchiveMeta>>;

    /// Loads a snapshot by name. `None` when no such snapshot exists.
    fn load(&self, name: &str) -> Result<Option<ArchiveSnapshot>>;

    /// Deletes a snapshot by name, reporting whether one existed.
    fn delete(&self, name: &str) -> Result<bool>;
}
