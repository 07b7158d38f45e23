//! Included/excluded split of the aggregate views.

use std::collections::BTreeSet;

use recon_model::{AllocationDataset, StoreKey};

/// The dataset split by the exclusion set.
///
/// Store keys are disjoint between the two sides and their union
/// reconstructs the full dataset. Always rebuilt wholesale after a state
/// change, never patched in place.
#[derive(Debug, Clone, Default)]
pub struct PartitionedViews {
    pub included: AllocationDataset,
    pub excluded: AllocationDataset,
}

/// Splits `dataset` by store-key membership in `excluded`.
///
/// `by_store` partitions directly; each `by_item` entry follows its store.
/// An item whose entries all sit on one side disappears from the other
/// side's `by_item` map entirely.
pub fn partition(dataset: &AllocationDataset, excluded: &BTreeSet<StoreKey>) -> PartitionedViews {
    let mut views = PartitionedViews::default();
    for (store, entries) in &dataset.by_store {
        let side = if excluded.contains(store) {
            &mut views.excluded
        } else {
            &mut views.included
        };
        side.by_store.insert(store.clone(), entries.clone());
    }
    for (item, entries) in &dataset.by_item {
        for entry in entries {
            let side = if excluded.contains(&entry.store) {
                &mut views.excluded
            } else {
                &mut views.included
            };
            side.by_item
                .entry(item.clone())
                .or_default()
                .push(entry.clone());
        }
    }
    views
}
