// Module declarations
pub mod assignment;
pub mod types;

pub use types::*;

pub use assignment::{cluster_articles, find_similar_articles};

/// Smallest group that counts as a cluster
pub const MIN_CLUSTER_SIZE: usize = 2;
