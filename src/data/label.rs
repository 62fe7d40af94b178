//! Regression labels with separate working and ground-truth targets.

use ndarray::{Array1, ArrayView1};

use crate::error::LeafStatsError;

/// Multi-dimensional regression label.
///
/// `regr_target` is the target the forest is currently fitting. Alternating
/// regression passes overwrite it with pseudo targets, so the original value
/// is kept separately in `regr_target_gt` for residual computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionLabel {
    regr_target: Array1<f64>,
    regr_target_gt: Array1<f64>,
}

impl RegressionLabel {
    /// Create a label whose working target equals its ground truth.
    pub fn new(target: Array1<f64>) -> Self {
        Self {
            regr_target_gt: target.clone(),
            regr_target: target,
        }
    }

    /// Number of target dimensions.
    #[inline]
    pub fn dim(&self) -> usize {
        self.regr_target_gt.len()
    }

    /// Working target (possibly a pseudo target).
    #[inline]
    pub fn regr_target(&self) -> ArrayView1<'_, f64> {
        self.regr_target.view()
    }

    /// Ground-truth target.
    #[inline]
    pub fn regr_target_gt(&self) -> ArrayView1<'_, f64> {
        self.regr_target_gt.view()
    }

    /// Replace the working target with a pseudo target.
    ///
    /// # Errors
    ///
    /// Returns [`LeafStatsError::DimensionMismatch`] if `target` does not
    /// match the ground-truth dimensionality.
    pub fn set_pseudo_target(&mut self, target: Array1<f64>) -> Result<(), LeafStatsError> {
        LeafStatsError::check_dim("pseudo target", self.dim(), target.len())?;
        self.regr_target = target;
        Ok(())
    }

    /// Restore the working target to the ground truth.
    pub fn reset_target(&mut self) {
        self.regr_target.assign(&self.regr_target_gt);
    }
}

impl From<Vec<f64>> for RegressionLabel {
    fn from(target: Vec<f64>) -> Self {
        Self::new(Array1::from(target))
    }
}
