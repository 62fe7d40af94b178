//! Conversion between runtime leaf statistics and their schema types.

use std::io::{Read, Write};

use ndarray::Array1;

use super::schema::{LeafStatsSchema, LeafTableSchema};
use crate::config::ForestConfig;
use crate::error::LeafStatsError;
use crate::leaf::LeafStats;

impl From<&LeafStats> for LeafStatsSchema {
    fn from(leaf: &LeafStats) -> Self {
        Self {
            num_samples: leaf.num_samples(),
            prediction: leaf.prediction().to_vec(),
        }
    }
}

impl TryFrom<LeafStatsSchema> for LeafStats {
    type Error = LeafStatsError;

    fn try_from(schema: LeafStatsSchema) -> Result<Self, Self::Error> {
        LeafStats::from_parts(Array1::from(schema.prediction), schema.num_samples)
    }
}

impl LeafTableSchema {
    /// Build a table from leaves sharing the configured dimensionality.
    pub fn from_leaves<'a, I>(leaves: I, config: &ForestConfig) -> Result<Self, LeafStatsError>
    where
        I: IntoIterator<Item = &'a LeafStats>,
    {
        let num_target_variables = config.num_target_variables();
        let leaves = leaves
            .into_iter()
            .map(|leaf| {
                LeafStatsError::check_dim("leaf table", num_target_variables, leaf.dim())?;
                Ok(LeafStatsSchema::from(leaf))
            })
            .collect::<Result<Vec<_>, LeafStatsError>>()?;
        Ok(Self {
            num_target_variables,
            leaves,
        })
    }

    /// Convert back to runtime leaves, checking every dimension against the
    /// table header.
    pub fn into_leaves(self) -> Result<Vec<LeafStats>, LeafStatsError> {
        let dim = self.num_target_variables;
        self.leaves
            .into_iter()
            .map(|schema| {
                LeafStatsError::check_dim("leaf table", dim, schema.prediction.len())?;
                LeafStats::try_from(schema)
            })
            .collect()
    }
}

impl LeafStats {
    /// Serialize as a JSON object `{"num_samples": .., "prediction": [..]}`.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), LeafStatsError> {
        serde_json::to_writer(writer, &LeafStatsSchema::from(self))?;
        Ok(())
    }

    /// Deserialize from the JSON produced by [`write_json`](Self::write_json).
    pub fn read_json<R: Read>(reader: R) -> Result<Self, LeafStatsError> {
        let schema: LeafStatsSchema = serde_json::from_reader(reader)?;
        LeafStats::try_from(schema)
    }
}
