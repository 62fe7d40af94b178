//! Labelled sample abstractions.
//!
//! - [`RegressionLabel`]: working target plus ground truth
//! - [`LabelledSample`]: features and label
//! - [`SampleSet`]: ordered, sized, indexable sample collection
//! - [`DataSet`]: borrowed subset of samples (e.g. those reaching one leaf)

mod dataset;
mod label;
mod traits;

pub use dataset::{DataSet, LabelledSample};
pub use label::RegressionLabel;
pub use traits::SampleSet;
