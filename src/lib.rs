//! regforest: leaf-node statistics for multi-target regression forests.
//!
//! Each regression tree leaf stores the mean of the target vectors that
//! reached it. This crate provides that running-mean estimator and keeps it
//! consistent across every way a forest builds and uses it: batch training,
//! parallel partial accumulation, online updates, forest-level averaging,
//! alternating regression passes and model persistence.
//!
//! # Key Types
//!
//! - [`LeafStats`] - Mean target vector and sample count of one leaf
//! - [`ForestConfig`] - Target dimensionality and runtime settings
//! - [`LabelledSample`] / [`RegressionLabel`] - Training samples
//! - [`SampleSet`] / [`DataSet`] - Sample collections reaching a leaf
//!
//! # Example
//!
//! ```
//! use regforest::{ForestConfig, LabelledSample, LeafStats};
//!
//! let config = ForestConfig::with_targets(2).unwrap();
//! let samples: Vec<LabelledSample> = [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]
//!     .iter()
//!     .map(|t| LabelledSample::from_target(t.to_vec()))
//!     .collect();
//!
//! let mut leaf = LeafStats::new(&config);
//! leaf.aggregate(&samples, false).unwrap();
//! assert_eq!(leaf.num_samples(), 3);
//! assert_eq!(leaf.prediction().to_vec(), vec![3.0, 4.0]);
//! ```

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod config;
pub mod data;
pub mod error;
pub mod leaf;
pub mod persist;
pub mod testing;
pub mod utils;

// =============================================================================
// Convenience Re-exports
// =============================================================================

pub use config::{ConfigError, ForestConfig};
pub use data::{DataSet, LabelledSample, RegressionLabel, SampleSet};
pub use error::LeafStatsError;
pub use leaf::LeafStats;
pub use utils::Parallelism;
