use rustc_hash::FxHashSet;

use crate::itemset::Item;

/// Deterministic itemset hash: the i-th smallest item (1-based) is weighted
/// by i, the weighted values are summed, and the sum is reduced modulo the
/// table size. `items` must be sorted ascending.
pub fn bucket_index(items: &[Item], table_size: usize) -> usize {
    debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
    let sum = items
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &item)| {
            acc.wrapping_add((i as u64 + 1).wrapping_mul(item))
        });
    (sum % table_size as u64) as usize
}

/// Occurrence counts per hash bucket, accumulated over every k-subset of
/// every transaction.
///
/// Distinct itemsets may share a bucket, so a frequent bucket admits false
/// positives but never false negatives: any itemset whose true support
/// meets the threshold hashes into a bucket counted at least that often.
/// Exact support is always recomputed for surviving candidates.
#[derive(Debug, Clone)]
pub struct BucketTable {
    counts: Vec<u64>,
}

impl BucketTable {
    pub fn new(table_size: usize) -> Self {
        Self {
            counts: vec![0; table_size],
        }
    }

    /// Counts one occurrence of a sorted itemset.
    pub fn add(&mut self, items: &[Item]) {
        let bucket = bucket_index(items, self.counts.len());
        self.counts[bucket] += 1;
    }

    /// Buckets whose accumulated count meets the support threshold.
    pub fn frequent_buckets(&self, min_support: u64) -> FxHashSet<usize> {
        self.counts
            .iter()
            .enumerate()
            .filter_map(|(bucket, &count)| (count >= min_support).then_some(bucket))
            .collect()
    }
}
