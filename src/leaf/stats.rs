//! Running-mean leaf statistics.

use ndarray::{Array1, ArrayView1};
use tracing::{debug, warn};

use crate::config::ForestConfig;
use crate::data::{LabelledSample, RegressionLabel, SampleSet};
use crate::error::LeafStatsError;
use crate::utils::{chunk_ranges, Parallelism};

/// Minimum number of samples per worker in [`LeafStats::aggregate_with`].
const PARALLEL_CHUNK_SIZE: usize = 1024;

/// Mean target vector and sample count stored at a regression tree leaf.
///
/// Whenever `num_samples > 0`, `prediction` is the arithmetic mean of the
/// targets of exactly `num_samples` samples, no matter whether they arrived
/// through [`aggregate`](Self::aggregate), [`fuse`](Self::fuse) or
/// [`update`](Self::update). A leaf with no samples predicts the zero vector;
/// the only exception is the result of [`average`](Self::average), which
/// carries a mean of means with a zero count.
#[derive(Debug, Clone, PartialEq)]
pub struct LeafStats {
    prediction: Array1<f64>,
    num_samples: u64,
}

impl LeafStats {
    /// Empty statistics with the configured target dimensionality.
    pub fn new(config: &ForestConfig) -> Self {
        Self::zeros(config.num_target_variables())
    }

    fn zeros(dim: usize) -> Self {
        Self {
            prediction: Array1::zeros(dim),
            num_samples: 0,
        }
    }

    /// Build statistics from an explicit prediction and sample count.
    ///
    /// # Errors
    ///
    /// Returns [`LeafStatsError::ZeroDimension`] if `prediction` is empty.
    pub fn from_parts(prediction: Array1<f64>, num_samples: u64) -> Result<Self, LeafStatsError> {
        if prediction.is_empty() {
            return Err(LeafStatsError::ZeroDimension);
        }
        Ok(Self {
            prediction,
            num_samples,
        })
    }

    /// Current mean target estimate.
    #[inline]
    pub fn prediction(&self) -> ArrayView1<'_, f64> {
        self.prediction.view()
    }

    /// Number of samples folded into the prediction.
    #[inline]
    pub fn num_samples(&self) -> u64 {
        self.num_samples
    }

    /// Target dimensionality.
    #[inline]
    pub fn dim(&self) -> usize {
        self.prediction.len()
    }

    // =========================================================================
    // Aggregation from samples
    // =========================================================================

    /// Recompute the statistics as the mean target of `samples`.
    ///
    /// A final leaf is left untouched: its statistics were computed while it
    /// was still an intermediate leaf, and at finalization time the samples
    /// may carry pseudo targets from an alternating regression pass.
    ///
    /// An empty collection yields a zero prediction with zero samples.
    ///
    /// # Errors
    ///
    /// Returns [`LeafStatsError::DimensionMismatch`] if any sample's target
    /// has the wrong length. The statistics are unchanged in that case.
    pub fn aggregate<S>(&mut self, samples: &S, is_final_leaf: bool) -> Result<(), LeafStatsError>
    where
        S: SampleSet + ?Sized,
    {
        if is_final_leaf {
            return Ok(());
        }
        self.aggregate_range(samples, 0..samples.len())?;
        debug!(
            num_samples = self.num_samples,
            dim = self.dim(),
            "aggregated leaf statistics"
        );
        Ok(())
    }

    /// Like [`aggregate`](Self::aggregate), but splits large sample sets
    /// across rayon workers and fuses the partial statistics.
    ///
    /// The result equals `aggregate` up to floating-point rounding.
    pub fn aggregate_with<S>(
        &mut self,
        samples: &S,
        is_final_leaf: bool,
        parallelism: Parallelism,
    ) -> Result<(), LeafStatsError>
    where
        S: SampleSet + Sync + ?Sized,
    {
        if is_final_leaf {
            return Ok(());
        }
        if !parallelism.is_parallel() || samples.len() <= PARALLEL_CHUNK_SIZE {
            return self.aggregate(samples, false);
        }

        let dim = self.dim();
        let ranges = chunk_ranges(samples.len(), PARALLEL_CHUNK_SIZE);
        let n_chunks = ranges.len();
        let partials = parallelism.maybe_par_map(ranges, |range| {
            let mut partial = LeafStats::zeros(dim);
            partial.aggregate_range(samples, range)?;
            Ok::<_, LeafStatsError>(partial)
        });

        let mut combined = LeafStats::zeros(dim);
        for partial in partials {
            combined.fuse(&partial?)?;
        }
        *self = combined;

        debug!(
            num_samples = self.num_samples,
            n_chunks, "aggregated leaf statistics in parallel"
        );
        Ok(())
    }

    fn aggregate_range<S>(
        &mut self,
        samples: &S,
        range: std::ops::Range<usize>,
    ) -> Result<(), LeafStatsError>
    where
        S: SampleSet + ?Sized,
    {
        let dim = self.dim();
        for i in range.clone() {
            let target = samples.get(i).label().regr_target();
            LeafStatsError::check_dim("aggregate", dim, target.len())?;
        }

        self.prediction.fill(0.0);
        self.num_samples = range.len() as u64;
        for i in range {
            self.prediction += &samples.get(i).label().regr_target();
        }
        if self.num_samples > 0 {
            self.prediction /= self.num_samples as f64;
        }
        Ok(())
    }

    // =========================================================================
    // Combination
    // =========================================================================

    /// Merge statistics computed over a disjoint set of samples of the same
    /// leaf, weighting each side by its sample count.
    ///
    /// Fusing is commutative and associative up to rounding, so partial
    /// statistics can be combined in any order.
    ///
    /// # Errors
    ///
    /// - [`LeafStatsError::DimensionMismatch`] if the dimensionalities differ
    /// - [`LeafStatsError::SampleCountOverflow`] if the combined count does
    ///   not fit in a `u64`
    ///
    /// The statistics are unchanged on error.
    pub fn fuse(&mut self, other: &LeafStats) -> Result<(), LeafStatsError> {
        LeafStatsError::check_dim("fuse", self.dim(), other.dim())?;
        let total = LeafStatsError::add_counts("fuse", self.num_samples, other.num_samples)?;

        if self.num_samples == 0 {
            self.prediction.fill(0.0);
        }
        if total == 0 {
            return Ok(());
        }

        self.prediction *= self.num_samples as f64;
        self.prediction
            .scaled_add(other.num_samples as f64, &other.prediction);
        self.prediction /= total as f64;
        self.num_samples = total;
        Ok(())
    }

    /// Unweighted mean of the leaves' predictions, one vote per leaf.
    ///
    /// This combines leaves of different trees; unlike [`fuse`](Self::fuse)
    /// the sample counts are ignored. The result has `num_samples == 0`.
    ///
    /// # Errors
    ///
    /// - [`LeafStatsError::EmptyAverage`] if `leaves` is empty
    /// - [`LeafStatsError::DimensionMismatch`] if a leaf does not match the
    ///   configured dimensionality
    pub fn average<'a, I>(leaves: I, config: &ForestConfig) -> Result<LeafStats, LeafStatsError>
    where
        I: IntoIterator<Item = &'a LeafStats>,
    {
        let mut ret = LeafStats::new(config);
        let mut n_leaves = 0usize;
        for leaf in leaves {
            LeafStatsError::check_dim("average", ret.dim(), leaf.dim())?;
            ret.prediction += &leaf.prediction;
            n_leaves += 1;
        }
        if n_leaves == 0 {
            return Err(LeafStatsError::EmptyAverage);
        }
        ret.prediction /= n_leaves as f64;

        debug!(n_leaves, "averaged leaf statistics");
        Ok(ret)
    }

    /// Add `other`'s prediction element-wise, without any normalization.
    ///
    /// The sample count is unchanged. Used by additive correction schemes
    /// that manage weighting themselves.
    pub fn add_target(&mut self, other: &LeafStats) -> Result<(), LeafStatsError> {
        LeafStatsError::check_dim("add_target", self.dim(), other.dim())?;
        self.prediction += &other.prediction;
        Ok(())
    }

    // =========================================================================
    // Online update
    // =========================================================================

    /// Fold one more sample into the running mean.
    ///
    /// Equivalent, up to rounding, to re-aggregating over all samples seen
    /// so far. A leaf without samples is initialized from the sample.
    ///
    /// # Errors
    ///
    /// - [`LeafStatsError::DimensionMismatch`] if the sample's target has the
    ///   wrong length
    /// - [`LeafStatsError::SampleCountOverflow`] if the leaf already holds
    ///   `u64::MAX` samples
    ///
    /// The statistics are unchanged on error.
    pub fn update(&mut self, sample: &LabelledSample) -> Result<(), LeafStatsError> {
        let target = sample.label().regr_target();
        LeafStatsError::check_dim("update", self.dim(), target.len())?;

        if self.num_samples == 0 {
            warn!("online update on a leaf without samples, initializing from the sample");
            self.prediction.assign(&target);
            self.num_samples = 1;
            return Ok(());
        }

        let total = LeafStatsError::add_counts("update", self.num_samples, 1)?;
        self.prediction *= self.num_samples as f64;
        self.prediction += &target;
        self.num_samples = total;
        self.prediction /= total as f64;
        Ok(())
    }

    // =========================================================================
    // Targets
    // =========================================================================

    /// Map a prediction in standardized target space back to the original
    /// scale.
    ///
    /// Not implemented: always returns [`LeafStatsError::NotImplemented`]
    /// and leaves the statistics unchanged.
    pub fn denormalize_target_variables(
        &mut self,
        _mean: ArrayView1<'_, f64>,
        _std: ArrayView1<'_, f64>,
    ) -> Result<(), LeafStatsError> {
        Err(LeafStatsError::NotImplemented(
            "LeafStats::denormalize_target_variables",
        ))
    }

    /// Per-dimension residual `prediction - ground_truth`.
    pub fn residual(&self, label: &RegressionLabel) -> Result<Vec<f64>, LeafStatsError> {
        let gt = label.regr_target_gt();
        LeafStatsError::check_dim("residual", self.dim(), gt.len())?;
        Ok(self
            .prediction
            .iter()
            .zip(gt.iter())
            .map(|(p, g)| p - g)
            .collect())
    }
}
