//! Property-based tests for leaf statistics.
//!
//! These tests use proptest to generate arbitrary target sets and verify that
//! every construction path agrees on the mean, and that persistence
//! round-trips exactly.

use std::io::Cursor;

use ndarray::Array1;
use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use regforest::persist::{read_text_records, write_text_records};
use regforest::testing::{mean_of, samples_from_targets};
use regforest::{ForestConfig, LeafStats, LeafStatsError};

// =============================================================================
// Strategies
// =============================================================================

/// Strategy for target values of moderate magnitude.
fn arb_value() -> impl Strategy<Value = f64> + Clone {
    -1e3f64..1e3
}

/// Target vectors sharing one dimensionality, at least one sample.
fn arb_targets() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (1usize..5).prop_flat_map(|dim| prop_vec(prop_vec(arb_value(), dim), 1..60))
}

/// Targets plus a set of cut points partitioning them.
fn arb_partitioned_targets() -> impl Strategy<Value = (Vec<Vec<f64>>, Vec<usize>)> {
    arb_targets().prop_flat_map(|targets| {
        let n = targets.len();
        (Just(targets), prop_vec(0..=n, 0..6))
    })
}

/// Any finite f64, including subnormals and extremes.
fn arb_finite_f64() -> impl Strategy<Value = f64> {
    prop::num::f64::ANY.prop_filter("must be finite", |x| x.is_finite())
}

fn arb_leaf() -> impl Strategy<Value = LeafStats> {
    (prop_vec(arb_finite_f64(), 1..8), 0u64..u64::MAX).prop_map(|(prediction, n)| {
        LeafStats::from_parts(Array1::from(prediction), n).unwrap()
    })
}

/// Sample counts clustered at both ends of the `u64` range.
fn arb_count() -> impl Strategy<Value = u64> + Clone {
    prop_oneof![
        0u64..1_000,
        (u64::MAX - 1_000)..=u64::MAX,
        any::<u64>(),
    ]
}

/// Two leaves of the same dimensionality.
fn arb_leaf_pair() -> impl Strategy<Value = (LeafStats, LeafStats)> {
    (1usize..5).prop_flat_map(|dim| {
        let leaf = (prop_vec(arb_value(), dim), arb_count()).prop_map(|(prediction, n)| {
            LeafStats::from_parts(Array1::from(prediction), n).unwrap()
        });
        (leaf.clone(), leaf)
    })
}

fn config_for(targets: &[Vec<f64>]) -> ForestConfig {
    ForestConfig::with_targets(targets[0].len()).unwrap()
}

fn close(a: &LeafStats, b: &[f64]) -> bool {
    a.prediction()
        .iter()
        .zip(b)
        .all(|(x, y)| (x - y).abs() <= 1e-8 * (1.0 + y.abs()))
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Batch aggregation yields the arithmetic mean.
    #[test]
    fn aggregate_is_mean(targets in arb_targets()) {
        let samples = samples_from_targets(&targets);
        let mut leaf = LeafStats::new(&config_for(&targets));
        leaf.aggregate(&samples, false).unwrap();

        prop_assert_eq!(leaf.num_samples(), targets.len() as u64);
        prop_assert!(close(&leaf, &mean_of(&targets)));

        // A final-leaf pass leaves everything as is.
        let before = leaf.clone();
        leaf.aggregate(&samples[..1], true).unwrap();
        prop_assert_eq!(leaf, before);
    }

    /// Fusing partials of any partition, in either order, equals the full
    /// aggregate.
    #[test]
    fn fuse_partition_equivalence((targets, mut cuts) in arb_partitioned_targets()) {
        let samples = samples_from_targets(&targets);
        let config = config_for(&targets);

        cuts.push(0);
        cuts.push(samples.len());
        cuts.sort_unstable();
        cuts.dedup();

        let partials: Vec<LeafStats> = cuts
            .windows(2)
            .map(|w| {
                let mut partial = LeafStats::new(&config);
                partial.aggregate(&samples[w[0]..w[1]], false).unwrap();
                partial
            })
            .collect();

        let mut forward = LeafStats::new(&config);
        for p in &partials {
            forward.fuse(p).unwrap();
        }
        let mut backward = LeafStats::new(&config);
        for p in partials.iter().rev() {
            backward.fuse(p).unwrap();
        }

        let expected = mean_of(&targets);
        prop_assert_eq!(forward.num_samples(), targets.len() as u64);
        prop_assert_eq!(backward.num_samples(), targets.len() as u64);
        prop_assert!(close(&forward, &expected));
        prop_assert!(close(&backward, &expected));
    }

    /// Fusing either sums the counts or reports an overflow and leaves the
    /// receiver as it was.
    #[test]
    fn fuse_counts_add_or_overflow((a, b) in arb_leaf_pair()) {
        let mut fused = a.clone();
        match a.num_samples().checked_add(b.num_samples()) {
            Some(total) => {
                fused.fuse(&b).unwrap();
                prop_assert_eq!(fused.num_samples(), total);
            }
            None => {
                let err = fused.fuse(&b).unwrap_err();
                let is_overflow = matches!(err, LeafStatsError::SampleCountOverflow { .. });
                prop_assert!(is_overflow);
                prop_assert_eq!(fused, a);
            }
        }
    }

    /// Folding samples one at a time matches batch aggregation.
    #[test]
    fn online_update_equivalence(targets in arb_targets()) {
        let samples = samples_from_targets(&targets);
        let config = config_for(&targets);

        let mut online = LeafStats::new(&config);
        for sample in &samples {
            online.update(sample).unwrap();
        }
        let mut batch = LeafStats::new(&config);
        batch.aggregate(&samples, false).unwrap();

        prop_assert_eq!(online.num_samples(), batch.num_samples());
        prop_assert!(close(&online, &batch.prediction().to_vec()));
    }

    /// Averaging ignores sample counts.
    #[test]
    fn average_is_unweighted(
        targets in arb_targets(),
        counts in prop_vec(0u64..1_000_000, 60),
    ) {
        let config = config_for(&targets);
        let leaves: Vec<LeafStats> = targets
            .iter()
            .zip(&counts)
            .map(|(t, &n)| LeafStats::from_parts(Array1::from(t.clone()), n).unwrap())
            .collect();

        let avg = LeafStats::average(&leaves, &config).unwrap();
        prop_assert_eq!(avg.num_samples(), 0);
        prop_assert!(close(&avg, &mean_of(&targets)));
    }

    /// Text records reproduce counts and predictions bit for bit.
    #[test]
    fn text_roundtrip(leaves in prop_vec(arb_leaf(), 1..10)) {
        let mut buf = Vec::new();
        write_text_records(&mut buf, &leaves).unwrap();
        let loaded = read_text_records(&mut Cursor::new(&buf), leaves.len()).unwrap();

        prop_assert_eq!(loaded.len(), leaves.len());
        for (a, b) in leaves.iter().zip(&loaded) {
            prop_assert_eq!(a.num_samples(), b.num_samples());
            prop_assert_eq!(a.dim(), b.dim());
            for (x, y) in a.prediction().iter().zip(b.prediction().iter()) {
                prop_assert_eq!(x.to_bits(), y.to_bits());
            }
        }
    }

    /// JSON reproduces finite predictions exactly.
    #[test]
    fn json_roundtrip(leaf in arb_leaf()) {
        let mut buf = Vec::new();
        leaf.write_json(&mut buf).unwrap();
        let loaded = LeafStats::read_json(buf.as_slice()).unwrap();
        prop_assert_eq!(loaded, leaf);
    }
}
