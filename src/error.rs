//! Error types for leaf statistics operations.

use thiserror::Error;

/// Errors raised by [`LeafStats`](crate::LeafStats) operations and their
/// persistence formats.
#[derive(Debug, Error)]
pub enum LeafStatsError {
    /// The operation exists in the interface but has no implementation.
    /// Permanent; retrying will not help.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Two vectors that must share the target dimensionality do not.
    #[error("dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    /// Averaging requires at least one leaf.
    #[error("cannot average an empty collection of leaf statistics")]
    EmptyAverage,

    /// A leaf must have at least one target dimension.
    #[error("leaf statistics must have at least one target dimension")]
    ZeroDimension,

    /// Combining two sample counts would exceed `u64::MAX`.
    #[error("sample count overflow in {context}: {left} + {right} exceeds u64::MAX")]
    SampleCountOverflow {
        context: &'static str,
        left: u64,
        right: u64,
    },

    #[error("invalid value for {context}: {message}")]
    Parse {
        context: &'static str,
        message: String,
    },

    #[error("unexpected end of input while parsing {context}")]
    UnexpectedEnd { context: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LeafStatsError {
    /// Check that `got` matches `expected`, producing a
    /// [`DimensionMismatch`](Self::DimensionMismatch) otherwise.
    #[inline]
    pub(crate) fn check_dim(
        context: &'static str,
        expected: usize,
        got: usize,
    ) -> Result<(), LeafStatsError> {
        if expected == got {
            Ok(())
        } else {
            Err(LeafStatsError::DimensionMismatch {
                context,
                expected,
                got,
            })
        }
    }

    /// Add two sample counts, producing a
    /// [`SampleCountOverflow`](Self::SampleCountOverflow) on overflow.
    #[inline]
    pub(crate) fn add_counts(
        context: &'static str,
        left: u64,
        right: u64,
    ) -> Result<u64, LeafStatsError> {
        left.checked_add(right)
            .ok_or(LeafStatsError::SampleCountOverflow {
                context,
                left,
                right,
            })
    }
}
