//! CLI library components for the allocation reconciler.

pub mod logging;
pub mod pipeline;
