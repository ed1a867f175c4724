pub mod buckets;
pub mod engine;

pub use buckets::BucketTable;
pub use engine::{Dhp, DhpConfig};
