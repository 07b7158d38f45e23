//! Deterministic redistribution of quantity held by excluded stores.

use std::collections::BTreeMap;
use std::fmt;

use recon_model::{ItemKey, ReconError, Result, StoreKey};

use crate::partition::PartitionedViews;

/// Allocation policy for quantity taken from excluded stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedistributeMode {
    /// Even split across included stores, remainder one unit at a time to
    /// the first stores in canonical key order.
    Equal,
    /// Split proportional to store rank weight; unranked stores weigh 1.
    Rank,
}

impl RedistributeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RedistributeMode::Equal => "equal",
            RedistributeMode::Rank => "rank",
        }
    }
}

impl fmt::Display for RedistributeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Planned whole-unit additions per item, per receiving store.
///
/// For every item the planned additions sum exactly to that item's excluded
/// total; nothing is lost to rounding. Stores planned zero units are left
/// out of the map but still participate in the weight calculation. The plan
/// is transient: computed, applied once, discarded.
#[derive(Debug, Clone)]
pub struct RedistributionPlan {
    pub mode: RedistributeMode,
    pub additions: BTreeMap<ItemKey, BTreeMap<StoreKey, u64>>,
    pub moved_total: u64,
}

impl RedistributionPlan {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty()
    }

    /// Total planned for one item across all receiving stores.
    pub fn item_total(&self, item: &ItemKey) -> u64 {
        self.additions
            .get(item)
            .map(|shares| shares.values().sum())
            .unwrap_or(0)
    }
}

/// Computes the per-item, per-store additions that move every excluded
/// item's quantity onto the included stores under `mode`.
///
/// Fails with [`ReconError::NoIncludedStores`] when there is no store left
/// to receive quantity. An exclusion set that holds no quantity yields an
/// empty plan.
pub fn plan_redistribution(
    views: &PartitionedViews,
    mode: RedistributeMode,
) -> Result<RedistributionPlan> {
    let recipients: Vec<StoreKey> = views.included.by_store.keys().cloned().collect();
    if recipients.is_empty() {
        return Err(ReconError::NoIncludedStores);
    }
    let weights = match mode {
        RedistributeMode::Equal => BTreeMap::new(),
        RedistributeMode::Rank => store_weights(views),
    };

    let mut additions = BTreeMap::new();
    let mut moved_total = 0u64;
    for (item, entries) in &views.excluded.by_item {
        let total: u64 = entries.iter().map(|entry| entry.quantity).sum();
        if total == 0 {
            continue;
        }
        let shares = match mode {
            RedistributeMode::Equal => equal_shares(total, &recipients),
            RedistributeMode::Rank => rank_shares(total, &recipients, &weights),
        };
        moved_total += total;
        additions.insert(item.clone(), shares);
    }
    Ok(RedistributionPlan {
        mode,
        additions,
        moved_total,
    })
}

fn equal_shares(total: u64, recipients: &[StoreKey]) -> BTreeMap<StoreKey, u64> {
    let count = recipients.len() as u64;
    let base = total / count;
    let remainder = (total % count) as usize;
    let mut shares = BTreeMap::new();
    for (position, store) in recipients.iter().enumerate() {
        let share = base + u64::from(position < remainder);
        if share > 0 {
            shares.insert(store.clone(), share);
        }
    }
    shares
}

fn rank_shares(
    total: u64,
    recipients: &[StoreKey],
    weights: &BTreeMap<StoreKey, u64>,
) -> BTreeMap<StoreKey, u64> {
    let total_weight: u64 = recipients
        .iter()
        .map(|store| store_weight(weights, store))
        .sum();

    let mut shares = BTreeMap::new();
    let mut assigned = 0u64;
    for store in recipients {
        let share = total * store_weight(weights, store) / total_weight;
        assigned += share;
        if share > 0 {
            shares.insert(store.clone(), share);
        }
    }

    // The flooring leftover is strictly less than the recipient count, so a
    // single pass hands it out: one unit each, highest weight first, with
    // canonical key order breaking weight ties.
    let mut leftover = total - assigned;
    if leftover > 0 {
        let mut order: Vec<&StoreKey> = recipients.iter().collect();
        order.sort_by_key(|store| std::cmp::Reverse(store_weight(weights, store)));
        for store in order {
            if leftover == 0 {
                break;
            }
            *shares.entry((*store).clone()).or_insert(0) += 1;
            leftover -= 1;
        }
    }
    shares
}

fn store_weight(weights: &BTreeMap<StoreKey, u64>, store: &StoreKey) -> u64 {
    weights.get(store).copied().unwrap_or(1)
}

/// Rank weights of the included stores, read off the included view's
/// by-item entries. Stores that never matched a ranked dictionary store
/// fall back to weight 1.
fn store_weights(views: &PartitionedViews) -> BTreeMap<StoreKey, u64> {
    let mut weights = BTreeMap::new();
    for entries in views.included.by_item.values() {
        for entry in entries {
            if let Some(rank) = entry.rank {
                weights.insert(entry.store.clone(), rank.weight());
            }
        }
    }
    weights
}
