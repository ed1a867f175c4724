use std::collections::HashMap;

use freqmine::dhp::buckets::{bucket_index, BucketTable};
use freqmine::{extract_rules, hybrid_mine, Dhp, DhpConfig, FpGrowth, Itemset};

/// Reproducible market-basket style dataset: ten items with popularity
/// falling off by id, forty transactions.
fn dataset() -> Vec<Vec<u64>> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut transactions = Vec::new();

    for _ in 0..40 {
        let mut transaction = Vec::new();
        for item in 0..10u64 {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let popularity = 7u64.saturating_sub(item / 2);
            if (state >> 33) % 10 < popularity {
                transaction.push(item);
            }
        }
        if !transaction.is_empty() {
            transactions.push(transaction);
        }
    }

    transactions
}

const MIN_SUPPORT: u64 = 10;

fn run_dhp(config: DhpConfig) -> HashMap<Itemset, u64> {
    let mut dhp = Dhp::new(config, dataset()).unwrap();
    dhp.run().into_iter().collect()
}

fn unhashed_config() -> DhpConfig {
    // A single bucket plus an unreachable bucket threshold forces the
    // level search straight into its unhashed phase.
    DhpConfig {
        min_support: MIN_SUPPORT,
        hash_table_size: 1,
        large_bucket_threshold: usize::MAX,
        max_itemset_size: None,
    }
}

fn hashed_config() -> DhpConfig {
    DhpConfig {
        min_support: MIN_SUPPORT,
        hash_table_size: 101,
        large_bucket_threshold: 1,
        max_itemset_size: None,
    }
}

#[test]
fn level_search_and_tree_miner_agree() {
    let from_dhp = run_dhp(unhashed_config());
    let from_fp: HashMap<Itemset, u64> = FpGrowth::new(MIN_SUPPORT, dataset())
        .unwrap()
        .run()
        .into_iter()
        .collect();

    assert!(!from_dhp.is_empty());
    assert_eq!(from_dhp, from_fp);
}

#[test]
fn hashed_and_unhashed_searches_agree() {
    assert_eq!(run_dhp(hashed_config()), run_dhp(unhashed_config()));
}

#[test]
fn bucket_hashing_never_rejects_a_frequent_pair() {
    let transactions: Vec<Vec<u64>> = dataset()
        .into_iter()
        .map(|mut t| {
            t.sort_unstable();
            t.dedup();
            t
        })
        .collect();

    let table_size = 101;
    let mut table = BucketTable::new(table_size);
    let mut true_support: HashMap<Itemset, u64> = HashMap::new();

    for transaction in &transactions {
        for i in 0..transaction.len() {
            for j in (i + 1)..transaction.len() {
                let pair = [transaction[i], transaction[j]];
                table.add(&pair);
                *true_support.entry(Itemset::new(pair.to_vec())).or_insert(0) += 1;
            }
        }
    }

    let frequent_buckets = table.frequent_buckets(MIN_SUPPORT);
    for (pair, &support) in &true_support {
        if support >= MIN_SUPPORT {
            let bucket = bucket_index(pair.items(), table_size);
            assert!(
                frequent_buckets.contains(&bucket),
                "frequent pair {:?} hashed into a non-frequent bucket",
                pair
            );
        }
    }
}

#[test]
fn hybrid_output_splits_cleanly_at_the_cutoff() {
    let max_k = 2;
    let hybrid: HashMap<Itemset, u64> =
        hybrid_mine(MIN_SUPPORT, 101, dataset(), 1, max_k)
            .unwrap()
            .into_iter()
            .collect();

    let mut dhp = Dhp::new(
        DhpConfig {
            max_itemset_size: Some(max_k),
            ..hashed_config()
        },
        dataset(),
    )
    .unwrap();
    let small: HashMap<Itemset, u64> = dhp.run().into_iter().collect();
    let large: HashMap<Itemset, u64> =
        FpGrowth::with_min_result_size(MIN_SUPPORT, dhp.into_transactions(), max_k + 1)
            .unwrap()
            .run()
            .into_iter()
            .collect();

    let hybrid_small: HashMap<Itemset, u64> = hybrid
        .iter()
        .filter(|(itemset, _)| itemset.len() <= max_k)
        .map(|(itemset, &support)| (itemset.clone(), support))
        .collect();
    let hybrid_large: HashMap<Itemset, u64> = hybrid
        .iter()
        .filter(|(itemset, _)| itemset.len() > max_k)
        .map(|(itemset, &support)| (itemset.clone(), support))
        .collect();

    assert_eq!(hybrid_small, small);
    assert_eq!(hybrid_large, large);
    assert!(small.keys().all(|itemset| itemset.len() <= max_k));
    assert!(large.keys().all(|itemset| itemset.len() > max_k));
}

#[test]
fn hybrid_rejects_a_zero_cutoff_instead_of_double_reporting() {
    let transactions = vec![
        vec![1, 2, 3],
        vec![1, 2],
        vec![1, 3],
        vec![2, 3],
        vec![1, 2, 3],
    ];

    // A cutoff of 0 would make the level search stop right after level 1
    // and the tree miner re-emit every frequent 1-itemset.
    assert_eq!(
        hybrid_mine(3, 17, transactions, 1, 0).unwrap_err(),
        freqmine::ConfigError::ZeroMaxItemsetSize
    );
}

#[test]
fn hybrid_reports_no_itemset_twice() {
    for max_k in 1..=4 {
        let results = hybrid_mine(MIN_SUPPORT, 101, dataset(), 1, max_k).unwrap();
        let mut keys: Vec<&Itemset> = results.iter().map(|(itemset, _)| itemset).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), results.len(), "duplicates at max_k = {}", max_k);
    }
}

#[test]
fn hybrid_output_supports_rule_extraction() {
    let frequent = hybrid_mine(MIN_SUPPORT, 101, dataset(), 1, 2).unwrap();

    // Every antecedent subset must be present in the table, so extraction
    // succeeds rather than reporting a downward-closure violation.
    let rules = extract_rules(&frequent, 0.6).unwrap();
    for rule in &rules {
        assert!(rule.confidence >= 0.6 && rule.confidence <= 1.0);
        assert!(!rule.antecedent.is_empty());
        assert!(!rule.consequent.is_empty());
        let whole = rule.antecedent.union(&rule.consequent);
        assert!(frequent.iter().any(|(itemset, _)| *itemset == whole));
    }
}
