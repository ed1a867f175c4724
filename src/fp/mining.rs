use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use super::tree::FpTree;
use crate::combinations::for_each_combination;
use crate::error::ConfigError;
use crate::itemset::{Item, Itemset};

/// One immutable frequency-rank snapshot per run: descending total
/// frequency, ties broken by first appearance in the counting scan.
///
/// The same snapshot sorts the initial transactions and every conditional
/// pattern base; sorting conditional paths by any other order would break
/// prefix sharing in the conditional trees.
#[derive(Debug)]
struct ItemOrder {
    rank: FxHashMap<Item, usize>,
}

impl ItemOrder {
    fn from_counts(counts: &FxHashMap<Item, u64>, first_seen: &[Item]) -> Self {
        let mut ordered = first_seen.to_vec();
        // Stable sort keeps first-seen order among equal counts.
        ordered.sort_by(|a, b| counts[b].cmp(&counts[a]));
        let rank = ordered
            .iter()
            .enumerate()
            .map(|(position, &item)| (item, position))
            .collect();
        Self { rank }
    }

    fn sort(&self, items: &mut [Item]) {
        items.sort_by_key(|item| self.rank[item]);
    }
}

/// Recursive frequent-itemset miner over a compressed prefix tree
/// (FP-Growth).
///
/// Builds one top-level tree from the frequency-ordered transactions, then
/// mines it through conditional pattern bases, growing suffixes bottom-up
/// from the least frequent items. Only itemsets of at least
/// `min_result_size` items are reported, which lets the hybrid driver skip
/// sizes the level search already covered.
#[derive(Debug)]
pub struct FpGrowth {
    min_support: u64,
    min_result_size: usize,
    transactions: Vec<Vec<Item>>,
}

impl FpGrowth {
    pub fn new(min_support: u64, transactions: Vec<Vec<Item>>) -> Result<Self, ConfigError> {
        Self::with_min_result_size(min_support, transactions, 1)
    }

    pub fn with_min_result_size(
        min_support: u64,
        transactions: Vec<Vec<Item>>,
        min_result_size: usize,
    ) -> Result<Self, ConfigError> {
        if min_support == 0 {
            return Err(ConfigError::ZeroMinSupport);
        }
        if min_result_size == 0 {
            return Err(ConfigError::ZeroMinResultSize);
        }
        let transactions = transactions
            .into_iter()
            .map(|mut transaction| {
                transaction.sort_unstable();
                transaction.dedup();
                transaction
            })
            .collect();
        Ok(Self {
            min_support,
            min_result_size,
            transactions,
        })
    }

    /// Mines every frequent itemset of at least `min_result_size` items,
    /// deduplicated by itemset identity.
    pub fn run(&self) -> Vec<(Itemset, u64)> {
        // Counting scan; first-seen order doubles as the tie-break for the
        // frequency ranking.
        let mut counts: FxHashMap<Item, u64> = FxHashMap::default();
        let mut first_seen: Vec<Item> = Vec::new();
        for transaction in &self.transactions {
            for &item in transaction {
                let entry = counts.entry(item).or_insert(0);
                if *entry == 0 {
                    first_seen.push(item);
                }
                *entry += 1;
            }
        }
        let order = ItemOrder::from_counts(&counts, &first_seen);

        let mut tree = FpTree::new();
        for transaction in &self.transactions {
            let mut filtered: Vec<Item> = transaction
                .iter()
                .copied()
                .filter(|item| counts[item] >= self.min_support)
                .collect();
            if filtered.is_empty() {
                continue;
            }
            order.sort(&mut filtered);
            tree.insert_sequence(&filtered, 1);
        }

        debug!(
            items = counts.len(),
            nodes = tree.nodes.len(),
            "top-level tree built"
        );

        let mut patterns = Vec::new();
        self.mine_tree(&tree, &[], &order, &mut patterns);

        // Different branches can reach the same itemset; the first support
        // emitted wins.
        let mut seen: FxHashMap<Itemset, u64> = FxHashMap::default();
        let mut deduped = Vec::with_capacity(patterns.len());
        for (itemset, support) in patterns {
            if !seen.contains_key(&itemset) {
                seen.insert(itemset.clone(), support);
                deduped.push((itemset, support));
            }
        }
        deduped
    }

    fn mine_tree(
        &self,
        tree: &FpTree,
        suffix: &[Item],
        order: &ItemOrder,
        out: &mut Vec<(Itemset, u64)>,
    ) {
        if tree.is_single_chain() {
            let chain = tree.chain_items();
            for size in 1..=chain.len() {
                for_each_combination(&chain, size, &mut |combo: &[(Item, u64)]| {
                    if combo.len() + suffix.len() < self.min_result_size {
                        return;
                    }
                    let support = combo
                        .iter()
                        .map(|&(_, count)| count)
                        .min()
                        .unwrap_or(0);
                    let mut items: Vec<Item> = combo.iter().map(|&(item, _)| item).collect();
                    items.extend_from_slice(suffix);
                    out.push((Itemset::new(items), support));
                });
            }
            return;
        }

        // Least frequent first, so suffixes grow bottom-up; ties broken by
        // item id for deterministic output.
        let mut header_items: Vec<(Item, u64)> = tree
            .header_table
            .keys()
            .map(|&item| (item, tree.item_support(item)))
            .collect();
        header_items.sort_unstable_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

        for (item, support) in header_items {
            let mut new_suffix = Vec::with_capacity(suffix.len() + 1);
            new_suffix.push(item);
            new_suffix.extend_from_slice(suffix);

            if new_suffix.len() >= self.min_result_size {
                out.push((Itemset::new(new_suffix.clone()), support));
            }

            let pattern_base = tree.prefix_paths(item);
            if pattern_base.is_empty() {
                continue;
            }

            // Aggregate per-item counts across the base, keep the frequent
            // ones, rewrite each path against the global order.
            let mut base_counts: FxHashMap<Item, u64> = FxHashMap::default();
            for (path, count) in &pattern_base {
                for &path_item in path {
                    *base_counts.entry(path_item).or_insert(0) += count;
                }
            }

            let mut conditional = FpTree::new();
            let mut inserted_any = false;
            for (path, count) in &pattern_base {
                let mut rewritten: Vec<Item> = path
                    .iter()
                    .copied()
                    .filter(|path_item| base_counts[path_item] >= self.min_support)
                    .collect();
                if rewritten.is_empty() {
                    continue;
                }
                order.sort(&mut rewritten);
                conditional.insert_sequence(&rewritten, *count);
                inserted_any = true;
            }

            if inserted_any {
                trace!(item, suffix_len = new_suffix.len(), "mining conditional tree");
                self.mine_tree(&conditional, &new_suffix, order, out);
            }
        }
    }
}
