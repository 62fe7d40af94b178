//! Forest-wide configuration shared by all leaf statistics.
//!
//! [`ForestConfig`] carries the settings that leaf statistics read at
//! construction time, most importantly the target dimensionality. It is
//! passed explicitly by reference; there is no global configuration.
//!
//! # Example
//!
//! ```
//! use regforest::ForestConfig;
//!
//! // All defaults: a single target variable
//! let config = ForestConfig::builder().build().unwrap();
//! assert_eq!(config.num_target_variables(), 1);
//!
//! // Multi-target regression
//! let config = ForestConfig::builder()
//!     .num_target_variables(3)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.num_target_variables(), 3);
//! ```

use std::num::NonZeroUsize;

use bon::Builder;

use crate::utils::Parallelism;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Number of target variables must be at least 1.
    InvalidNumTargetVariables(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumTargetVariables(v) => {
                write!(f, "num_target_variables must be at least 1, got {}", v)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// ForestConfig
// =============================================================================

/// Configuration consumed by leaf statistics.
#[derive(Debug, Clone, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct ForestConfig {
    /// Dimensionality of the regression target vector. Default: 1.
    #[builder(default = 1)]
    num_target_variables: usize,

    /// Number of threads for parallel accumulation. `None` uses the
    /// current rayon pool.
    n_threads: Option<NonZeroUsize>,
}

/// Custom finishing function that validates the config.
impl<S: forest_config_builder::IsComplete> ForestConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `num_target_variables == 0`.
    pub fn build(self) -> Result<ForestConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl ForestConfig {
    /// Shorthand for a config with the given target dimensionality and
    /// defaults everywhere else.
    pub fn with_targets(num_target_variables: usize) -> Result<Self, ConfigError> {
        Self::builder()
            .num_target_variables(num_target_variables)
            .build()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.num_target_variables == 0 {
            return Err(ConfigError::InvalidNumTargetVariables(
                self.num_target_variables,
            ));
        }
        Ok(())
    }

    /// Dimensionality of the regression target vector.
    #[inline]
    pub fn num_target_variables(&self) -> usize {
        self.num_target_variables
    }

    /// Configured thread count, if any.
    pub fn n_threads(&self) -> Option<NonZeroUsize> {
        self.n_threads
    }

    /// Parallelism implied by the thread count.
    pub fn parallelism(&self) -> Parallelism {
        Parallelism::from_threads(self.n_threads.map_or(0, NonZeroUsize::get))
    }
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            num_target_variables: 1,
            n_threads: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_one_target() {
        let config = ForestConfig::builder().build().unwrap();
        assert_eq!(config.num_target_variables(), 1);
        assert!(config.n_threads().is_none());
    }

    #[test]
    fn zero_targets_rejected() {
        let err = ForestConfig::builder()
            .num_target_variables(0)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidNumTargetVariables(0));
        assert!(err.to_string().contains("num_target_variables"));
    }

    #[test]
    fn with_targets_shorthand() {
        let config = ForestConfig::with_targets(4).unwrap();
        assert_eq!(config.num_target_variables(), 4);
        assert!(ForestConfig::with_targets(0).is_err());
    }

    #[test]
    fn single_thread_is_sequential() {
        let config = ForestConfig::builder()
            .n_threads(NonZeroUsize::new(1).unwrap())
            .build()
            .unwrap();
        assert_eq!(config.parallelism(), Parallelism::Sequential);

        let config = ForestConfig::builder()
            .n_threads(NonZeroUsize::new(4).unwrap())
            .build()
            .unwrap();
        assert_eq!(config.parallelism(), Parallelism::Parallel);
    }
}
