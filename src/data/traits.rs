//! Core trait for sample collection access.

use super::LabelledSample;

/// Ordered, indexable, sized collection of labelled samples.
///
/// Leaf statistics only need to know how many samples were routed to a leaf
/// and to visit each of them in order. Storage is up to the caller: a slice
/// of owned samples for a full training set, or a [`DataSet`](super::DataSet)
/// of references for the subset that reached one leaf.
pub trait SampleSet {
    /// Number of samples in the collection.
    fn len(&self) -> usize;

    /// Get sample `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    fn get(&self, index: usize) -> &LabelledSample;

    /// Returns `true` if the collection holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the samples in order.
    fn samples(&self) -> impl Iterator<Item = &LabelledSample> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl SampleSet for [LabelledSample] {
    #[inline]
    fn len(&self) -> usize {
        <[LabelledSample]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> &LabelledSample {
        &self[index]
    }
}

impl SampleSet for [&LabelledSample] {
    #[inline]
    fn len(&self) -> usize {
        <[&LabelledSample]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> &LabelledSample {
        self[index]
    }
}

impl<T> SampleSet for Vec<T>
where
    [T]: SampleSet,
{
    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn get(&self, index: usize) -> &LabelledSample {
        SampleSet::get(self.as_slice(), index)
    }
}
