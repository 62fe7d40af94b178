//! Testing utilities for regforest.
//!
//! This module provides common assertion helpers and sample builders
//! that can be used in both unit tests and integration tests.
//!
//! ```ignore
//! use regforest::testing::{assert_prediction_eq, samples_from_targets, DEFAULT_TOLERANCE_F64};
//! ```

use approx::AbsDiffEq;

use crate::data::LabelledSample;
use crate::leaf::LeafStats;

// =============================================================================
// Constants
// =============================================================================

/// Default tolerance for floating point comparisons of leaf predictions.
pub const DEFAULT_TOLERANCE_F64: f64 = 1e-9;

// =============================================================================
// Floating Point Assertions
// =============================================================================

/// Assert that two f64 values are approximately equal.
///
/// Uses absolute difference comparison with the given tolerance.
///
/// # Examples
///
/// ```
/// # use regforest::assert_approx_eq_f64;
/// assert_approx_eq_f64!(1.0f64, 1.0001f64, 0.001);
/// ```
#[macro_export]
macro_rules! assert_approx_eq_f64 {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let left_val: f64 = $left;
        let right_val: f64 = $right;
        let tol: f64 = $tolerance;
        let diff = (left_val - right_val).abs();
        if diff > tol {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > tolerance `{:?}`",
                left_val, right_val, diff, tol
            );
        }
    }};
}

/// Assert that two slices of f64 values are approximately equal element-wise.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than tolerance.
pub fn assert_slice_approx_eq_f64(actual: &[f64], expected: &[f64], tolerance: f64, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            a.abs_diff_eq(e, tolerance),
            "{context}[{i}]: {a} ≠ {e} (diff={}, tolerance={tolerance})",
            (a - e).abs()
        );
    }
}

/// Assert that a leaf's prediction matches `expected` element-wise.
pub fn assert_prediction_eq(stats: &LeafStats, expected: &[f64], tolerance: f64) {
    let actual = stats.prediction().to_vec();
    assert_slice_approx_eq_f64(&actual, expected, tolerance, "prediction");
}

// =============================================================================
// Sample Builders
// =============================================================================

/// Build feature-less samples, one per target vector.
pub fn samples_from_targets<T: AsRef<[f64]>>(targets: &[T]) -> Vec<LabelledSample> {
    targets
        .iter()
        .map(|t| LabelledSample::from_target(t.as_ref().to_vec()))
        .collect()
}

/// Element-wise arithmetic mean of the given target vectors.
///
/// Reference implementation for tests.
///
/// # Panics
///
/// Panics if `targets` is empty.
pub fn mean_of<T: AsRef<[f64]>>(targets: &[T]) -> Vec<f64> {
    assert!(!targets.is_empty(), "mean_of needs at least one target");
    let dim = targets[0].as_ref().len();
    let mut sum = vec![0.0; dim];
    for t in targets {
        for (s, v) in sum.iter_mut().zip(t.as_ref()) {
            *s += v;
        }
    }
    sum.iter().map(|s| s / targets.len() as f64).collect()
}
