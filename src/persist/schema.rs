//! Schema types for JSON serialization.
//!
//! Schema types are kept separate from runtime types so the stored format
//! can evolve independently and is validated on conversion back.

use serde::{Deserialize, Serialize};

/// Stored form of one leaf's statistics.
///
/// JSON cannot represent NaN or infinities; leaves holding such values
/// should use the text format instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafStatsSchema {
    /// Number of samples folded into the prediction.
    pub num_samples: u64,
    /// Mean target vector.
    pub prediction: Vec<f64>,
}

/// A sequence of leaf statistics, e.g. all leaves of one tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LeafTableSchema {
    /// Target dimensionality shared by all leaves.
    pub num_target_variables: usize,
    pub leaves: Vec<LeafStatsSchema>,
}
