//! Leaf-node statistics for regression trees.
//!
//! [`LeafStats`] keeps the running mean of the target vectors that reached a
//! leaf. It can be built and maintained in several ways, all of which yield
//! the same mean for the same set of samples:
//!
//! - [`LeafStats::aggregate`]: from a batch of samples
//! - [`LeafStats::fuse`]: by merging partial statistics (count-weighted)
//! - [`LeafStats::update`]: one sample at a time
//!
//! Leaves of different trees are combined with [`LeafStats::average`], which
//! gives every leaf the same weight.

mod stats;

pub use stats::LeafStats;
