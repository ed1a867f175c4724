pub mod mining;
pub mod tree;

pub use mining::FpGrowth;
pub use tree::{FpNode, FpTree};
