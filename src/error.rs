use thiserror::Error;

use crate::itemset::Itemset;

/// Rejected run configuration. Caught at engine construction so a bad
/// threshold can never produce silently wrong results mid-run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("min_support must be a positive transaction count")]
    ZeroMinSupport,
    #[error("hash_table_size must be at least 1")]
    ZeroHashTableSize,
    #[error("max_itemset_size must be at least 1 when set")]
    ZeroMaxItemsetSize,
    #[error("min_result_size must be at least 1")]
    ZeroMinResultSize,
}

/// Failure during association-rule extraction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// An antecedent of a frequent itemset has no entry in the support
    /// table. Downward closure guarantees every such subset was counted,
    /// so a missing entry is a defect in the table handed in, not a
    /// low-confidence rule.
    #[error("support for antecedent {antecedent:?} missing from the frequent-itemset table")]
    MissingAntecedent { antecedent: Itemset },
}
