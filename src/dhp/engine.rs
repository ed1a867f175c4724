use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use super::buckets::{bucket_index, BucketTable};
use crate::combinations::for_each_combination;
use crate::error::ConfigError;
use crate::itemset::{Item, Itemset};

/// Run parameters for the hash-pruned level search.
#[derive(Debug, Clone)]
pub struct DhpConfig {
    /// Absolute support threshold, a transaction count rather than a
    /// fraction.
    pub min_support: u64,
    /// Number of buckets in the candidate-prefilter hash table. A size of
    /// 1 collapses every candidate into one bucket; correct, just
    /// unselective.
    pub hash_table_size: usize,
    /// Hashing is abandoned once fewer than this many buckets are
    /// frequent, since the prefilter stops rejecting enough candidates to
    /// pay for itself.
    pub large_bucket_threshold: usize,
    /// Stop as soon as itemsets of this size have been collected. Used by
    /// the hybrid driver to hand the reduced transactions to the tree
    /// miner.
    pub max_itemset_size: Option<usize>,
}

impl DhpConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_support == 0 {
            return Err(ConfigError::ZeroMinSupport);
        }
        if self.hash_table_size == 0 {
            return Err(ConfigError::ZeroHashTableSize);
        }
        if self.max_itemset_size == Some(0) {
            return Err(ConfigError::ZeroMaxItemsetSize);
        }
        Ok(())
    }
}

/// Level-wise frequent-itemset search with bucket-hash candidate pruning
/// and progressive transaction shrinking (DHP).
///
/// The engine owns its working copy of the transactions and replaces it
/// with a smaller filtered copy at every level; after [`Dhp::run`] the
/// remainder can be taken with [`Dhp::into_transactions`].
#[derive(Debug)]
pub struct Dhp {
    config: DhpConfig,
    transactions: Vec<Vec<Item>>,
}

impl Dhp {
    pub fn new(config: DhpConfig, transactions: Vec<Vec<Item>>) -> Result<Self, ConfigError> {
        config.validate()?;
        let transactions = transactions
            .into_iter()
            .map(|mut transaction| {
                transaction.sort_unstable();
                transaction.dedup();
                transaction
            })
            .collect();
        Ok(Self {
            config,
            transactions,
        })
    }

    /// The working set left behind by [`Dhp::run`], shrunk level by level.
    pub fn into_transactions(self) -> Vec<Vec<Item>> {
        self.transactions
    }

    /// Discovers every frequent itemset reachable before the configured
    /// size cutoff, with its exact support.
    pub fn run(&mut self) -> Vec<(Itemset, u64)> {
        let mut results = Vec::new();

        // Level 1: plain item counting, no hashing needed.
        let mut item_counts: FxHashMap<Item, u64> = FxHashMap::default();
        for transaction in &self.transactions {
            for &item in transaction {
                *item_counts.entry(item).or_insert(0) += 1;
            }
        }

        let mut prev_frequent: Vec<Itemset> = item_counts
            .iter()
            .filter(|&(_, &count)| count >= self.config.min_support)
            .map(|(&item, _)| Itemset::single(item))
            .collect();
        // Join order over the previous level is by itemset content, which
        // makes candidate generation deterministic across runs.
        prev_frequent.sort_unstable();

        for itemset in &prev_frequent {
            results.push((itemset.clone(), item_counts[&itemset.items()[0]]));
        }
        debug!(frequent = prev_frequent.len(), "level 1 complete");

        if prev_frequent.is_empty() || self.reached_cutoff(1) {
            return results;
        }

        let mut k = 2;
        let mut frequent_buckets = self.build_initial_buckets(k);

        // Hashed phase: a candidate must land in a frequent bucket before
        // it is worth exact counting.
        while frequent_buckets.len() >= self.config.large_bucket_threshold {
            let candidates = self.generate_candidates(&prev_frequent, k, Some(&frequent_buckets));
            if candidates.is_empty() {
                break;
            }

            let support = self.count_support_and_shrink(&candidates, k);
            let frequent_k = keep_frequent(&candidates, &support, self.config.min_support);
            if frequent_k.is_empty() {
                break;
            }

            debug!(
                k,
                candidates = candidates.len(),
                frequent = frequent_k.len(),
                transactions = self.transactions.len(),
                "hashed level complete"
            );

            for itemset in &frequent_k {
                results.push((itemset.clone(), support[itemset]));
            }

            if self.reached_cutoff(k) || self.transactions.is_empty() {
                return results;
            }

            frequent_buckets = self.rebuild_buckets(&frequent_k, k);
            prev_frequent = frequent_k;
            k += 1;
        }

        // Unhashed phase: too few frequent buckets remain for the
        // prefilter to earn its scans, so continue on Apriori pruning
        // alone.
        loop {
            let candidates = self.generate_candidates(&prev_frequent, k, None);
            if candidates.is_empty() {
                break;
            }

            let support = self.count_support_and_shrink(&candidates, k);
            let frequent_k = keep_frequent(&candidates, &support, self.config.min_support);
            if frequent_k.is_empty() {
                break;
            }

            debug!(
                k,
                candidates = candidates.len(),
                frequent = frequent_k.len(),
                transactions = self.transactions.len(),
                "unhashed level complete"
            );

            for itemset in &frequent_k {
                results.push((itemset.clone(), support[itemset]));
            }

            if self.reached_cutoff(k) || self.transactions.is_empty() {
                return results;
            }

            prev_frequent = frequent_k;
            k += 1;
        }

        results
    }

    fn reached_cutoff(&self, k: usize) -> bool {
        self.config.max_itemset_size.is_some_and(|max_k| k >= max_k)
    }

    /// Bucket table over every k-subset of every transaction.
    fn build_initial_buckets(&self, k: usize) -> FxHashSet<usize> {
        let mut table = BucketTable::new(self.config.hash_table_size);
        for transaction in &self.transactions {
            for_each_combination(transaction, k, &mut |subset| table.add(subset));
        }
        table.frequent_buckets(self.config.min_support)
    }

    /// Joins pairs of previous-level frequent itemsets into k-sized
    /// candidates, keeping only those that pass the bucket prefilter (when
    /// hashing) and whose every (k-1)-subset is itself frequent.
    fn generate_candidates(
        &self,
        prev_frequent: &[Itemset],
        k: usize,
        frequent_buckets: Option<&FxHashSet<usize>>,
    ) -> Vec<Itemset> {
        let prev_set: FxHashSet<&Itemset> = prev_frequent.iter().collect();
        let mut seen: FxHashSet<Itemset> = FxHashSet::default();
        let mut candidates = Vec::new();

        for i in 0..prev_frequent.len() {
            for j in (i + 1)..prev_frequent.len() {
                let union = prev_frequent[i].union(&prev_frequent[j]);
                if union.len() != k || seen.contains(&union) {
                    continue;
                }
                if let Some(buckets) = frequent_buckets {
                    let bucket = bucket_index(union.items(), self.config.hash_table_size);
                    if !buckets.contains(&bucket) {
                        continue;
                    }
                }
                if union.drop_one_subsets().all(|subset| prev_set.contains(&subset)) {
                    seen.insert(union.clone());
                    candidates.push(union);
                }
            }
        }

        candidates.sort_unstable();
        candidates
    }

    /// Exact support counting by full transaction scan. While scanning,
    /// each transaction is shrunk to the items that participate in at
    /// least k matching candidates; a shrunk transaction with no more than
    /// k items cannot support any (k+1)-itemset and is dropped.
    fn count_support_and_shrink(
        &mut self,
        candidates: &[Itemset],
        k: usize,
    ) -> FxHashMap<Itemset, u64> {
        let mut support: FxHashMap<Itemset, u64> = FxHashMap::default();
        let mut reduced = Vec::with_capacity(self.transactions.len());
        let mut hits: FxHashMap<Item, usize> = FxHashMap::default();

        for transaction in &self.transactions {
            hits.clear();
            for candidate in candidates {
                if candidate.is_contained_in(transaction) {
                    *support.entry(candidate.clone()).or_insert(0) += 1;
                    for &item in candidate.items() {
                        *hits.entry(item).or_insert(0) += 1;
                    }
                }
            }

            let shrunk: Vec<Item> = transaction
                .iter()
                .copied()
                .filter(|item| hits.get(item).is_some_and(|&count| count >= k))
                .collect();
            if shrunk.len() > k {
                reduced.push(shrunk);
            }
        }

        self.transactions = reduced;
        support
    }

    /// Bucket table for level k+1, fed only by (k+1)-subsets all of whose
    /// k-subsets are frequent. Transactions shrink again as a side effect:
    /// items outside every surviving subset are dropped, as are
    /// transactions too small to hold a (k+1)-subset at all.
    fn rebuild_buckets(&mut self, frequent_k: &[Itemset], k: usize) -> FxHashSet<usize> {
        let frequent_set: FxHashSet<&Itemset> = frequent_k.iter().collect();
        let mut table = BucketTable::new(self.config.hash_table_size);
        let mut reduced = Vec::with_capacity(self.transactions.len());
        let mut kept_items: FxHashSet<Item> = FxHashSet::default();

        for transaction in &self.transactions {
            if transaction.len() <= k {
                continue;
            }
            kept_items.clear();
            for_each_combination(transaction, k + 1, &mut |subset| {
                if all_k_subsets_frequent(subset, &frequent_set) {
                    table.add(subset);
                    kept_items.extend(subset.iter().copied());
                }
            });

            let shrunk: Vec<Item> = transaction
                .iter()
                .copied()
                .filter(|item| kept_items.contains(item))
                .collect();
            if !shrunk.is_empty() {
                reduced.push(shrunk);
            }
        }

        self.transactions = reduced;
        table.frequent_buckets(self.config.min_support)
    }
}

fn all_k_subsets_frequent(subset: &[Item], frequent: &FxHashSet<&Itemset>) -> bool {
    for skip in 0..subset.len() {
        let sub: Itemset = subset
            .iter()
            .enumerate()
            .filter_map(|(i, &item)| (i != skip).then_some(item))
            .collect();
        if !frequent.contains(&sub) {
            return false;
        }
    }
    true
}

fn keep_frequent(
    candidates: &[Itemset],
    support: &FxHashMap<Itemset, u64>,
    min_support: u64,
) -> Vec<Itemset> {
    candidates
        .iter()
        .filter(|candidate| {
            support
                .get(candidate)
                .is_some_and(|&count| count >= min_support)
        })
        .cloned()
        .collect()
}
