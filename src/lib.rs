//! Frequent-itemset mining over transactional data.
//!
//! Two complementary engines share one itemset model: a hash-pruned
//! level-wise search ([`Dhp`]) and a compressed-prefix-tree recursive miner
//! ([`FpGrowth`]), plus a hybrid driver ([`hybrid_mine`]) that runs the
//! level search up to a size cutoff and hands its reduced transactions to
//! the tree miner for everything larger.

pub mod combinations;
pub mod dhp;
pub mod error;
pub mod fp;
pub mod hybrid;
pub mod itemset;
pub mod rules;

pub use dhp::{Dhp, DhpConfig};
pub use error::{ConfigError, RuleError};
pub use fp::{FpGrowth, FpNode, FpTree};
pub use hybrid::hybrid_mine;
pub use itemset::{Item, Itemset};
pub use rules::{extract_rules, Rule};
