pub mod aggregate;
pub mod archive;
pub mod engine;
pub mod history;
pub mod partition;
pub mod redistribute;

pub use aggregate::{AggregateOutput, aggregate};
pub use archive::{ArchiveMeta, ArchiveSnapshot, ArchiveStore};
pub use engine::ReconEngine;
pub use history::{HISTORY_CAPACITY, History, HistorySnapshot};
pub use partition::{PartitionedViews, partition};
pub use redistribute::{RedistributeMode, RedistributionPlan, plan_redistribution};
