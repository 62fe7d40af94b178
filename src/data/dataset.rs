//! Labelled samples and borrowed sample subsets.

use ndarray::Array1;

use super::{RegressionLabel, SampleSet};

/// A feature vector paired with its regression label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelledSample {
    features: Array1<f32>,
    label: RegressionLabel,
}

impl LabelledSample {
    pub fn new(features: Array1<f32>, label: RegressionLabel) -> Self {
        Self { features, label }
    }

    /// Sample with no features, only a target. Handy when only the label
    /// matters (e.g. leaf statistics).
    pub fn from_target(target: impl Into<RegressionLabel>) -> Self {
        Self::new(Array1::zeros(0), target.into())
    }

    #[inline]
    pub fn features(&self) -> &Array1<f32> {
        &self.features
    }

    #[inline]
    pub fn label(&self) -> &RegressionLabel {
        &self.label
    }

    #[inline]
    pub fn label_mut(&mut self) -> &mut RegressionLabel {
        &mut self.label
    }
}

/// The samples routed to one node, held by reference.
///
/// Tree growing partitions a training set into many small subsets; holding
/// references avoids copying feature vectors for each node.
#[derive(Debug, Clone, Default)]
pub struct DataSet<'a> {
    samples: Vec<&'a LabelledSample>,
}

impl<'a> DataSet<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: &'a LabelledSample) {
        self.samples.push(sample);
    }

    /// Select the samples at `indices` from `source`, in the given order.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn from_indices(source: &'a [LabelledSample], indices: &[usize]) -> Self {
        indices.iter().map(|&i| &source[i]).collect()
    }
}

impl<'a> FromIterator<&'a LabelledSample> for DataSet<'a> {
    fn from_iter<I: IntoIterator<Item = &'a LabelledSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

impl<'a> Extend<&'a LabelledSample> for DataSet<'a> {
    fn extend<I: IntoIterator<Item = &'a LabelledSample>>(&mut self, iter: I) {
        self.samples.extend(iter);
    }
}

impl SampleSet for DataSet<'_> {
    #[inline]
    fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    fn get(&self, index: usize) -> &LabelledSample {
        self.samples[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<LabelledSample> {
        (0..4)
            .map(|i| LabelledSample::from_target(vec![i as f64]))
            .collect()
    }

    #[test]
    fn from_indices_preserves_order() {
        let all = samples();
        let subset = DataSet::from_indices(&all, &[3, 1]);
        assert_eq!(subset.len(), 2);
        assert_eq!(subset.get(0).label().regr_target()[0], 3.0);
        assert_eq!(subset.get(1).label().regr_target()[0], 1.0);
    }

    #[test]
    fn samples_visits_all_in_order() {
        let all = samples();
        let mut subset = DataSet::new();
        subset.extend(all.iter().rev());
        let targets: Vec<f64> = subset
            .samples()
            .map(|s| s.label().regr_target()[0])
            .collect();
        assert_eq!(targets, vec![3.0, 2.0, 1.0, 0.0]);
    }

    #[test]
    fn slices_and_vecs_are_sample_sets() {
        let all = samples();
        assert_eq!(SampleSet::len(&all), 4);
        assert_eq!(SampleSet::len(all.as_slice()), 4);

        let refs: Vec<&LabelledSample> = all.iter().collect();
        assert_eq!(SampleSet::get(&refs, 2).label().regr_target()[0], 2.0);

        let empty: Vec<LabelledSample> = Vec::new();
        assert!(SampleSet::is_empty(&empty));
    }

    #[test]
    fn vec_keeps_slice_iterator_with_trait_in_scope() {
        let all = samples();
        // Double-ended and exact-size: the slice iterator, not the trait's.
        let iter = all.iter();
        assert_eq!(iter.len(), 4);
        let last = all.iter().next_back().unwrap();
        assert_eq!(last.label().regr_target()[0], 3.0);

        let via_trait: Vec<f64> = SampleSet::samples(&all)
            .map(|s| s.label().regr_target()[0])
            .collect();
        assert_eq!(via_trait, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
