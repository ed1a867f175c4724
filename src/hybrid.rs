use tracing::debug;

use crate::dhp::{Dhp, DhpConfig};
use crate::error::ConfigError;
use crate::fp::FpGrowth;
use crate::itemset::{Item, Itemset};

/// Runs the hash-pruned level search up to `max_k`, hands its reduced
/// working set to the tree miner for everything larger, and concatenates
/// the two result lists.
///
/// Sizes up to `max_k` come only from the level search and sizes beyond it
/// only from the tree miner, so no itemset is reported twice.
pub fn hybrid_mine(
    min_support: u64,
    hash_table_size: usize,
    transactions: Vec<Vec<Item>>,
    large_bucket_threshold: usize,
    max_k: usize,
) -> Result<Vec<(Itemset, u64)>, ConfigError> {
    let config = DhpConfig {
        min_support,
        hash_table_size,
        large_bucket_threshold,
        max_itemset_size: Some(max_k),
    };
    let mut dhp = Dhp::new(config, transactions)?;
    let mut results = dhp.run();
    let remaining = dhp.into_transactions();
    debug!(
        found = results.len(),
        remaining = remaining.len(),
        "level search handed off"
    );

    let miner = FpGrowth::with_min_result_size(min_support, remaining, max_k + 1)?;
    results.extend(miner.run());
    Ok(results)
}
