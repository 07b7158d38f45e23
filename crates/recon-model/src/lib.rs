pub mod dataset;
pub mod dictionary;
pub mod error;
pub mod keys;
pub mod matching;
pub mod stats;
pub mod table;

pub use dataset::{AllocationDataset, AllocationRow, EngineState, ItemEntry, StoreEntry, parse_quantity};
pub use dictionary::{Dictionary, DictionaryItem, DictionaryStore, StoreRank};
pub use error::{ReconError, Result};
pub use keys::{ItemKey, StoreKey};
pub use matching::{MatchConfidence, MatchResult, MatchRule};
pub use stats::{IngestStats, MatchWarning, WarningKind};
pub use table::{ColumnHint, RawTable};
