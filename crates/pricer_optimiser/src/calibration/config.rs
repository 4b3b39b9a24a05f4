//! Calibration configuration.
//!
//! [`CalibrationConfig`] is a typed configuration with documented defaults.
//! The numeric options can be loaded from TOML; the randomness source and
//! the optimiser are programmatic overrides only.
//!
//! # TOML Keys
//!
//! | key | default |
//! |---|---|
//! | `number_of_paths` | 2000 |
//! | `seed` | 31415 |
//! | `max_iterations` | 400 |
//! | `parameter_step` | 1e-4 |
//! | `accuracy` | 1e-7 |
//! | `valuation_threads` | absent (inline) |
//!
//! Absent and unknown keys fall back to the defaults.

use std::sync::Arc;

use pricer_core::math::solvers::OptimizerFactory;
use pricer_pricing::mc::{BrownianMotion, MAX_PATHS};
use serde::Deserialize;

use super::error::CalibrationError;

/// Default number of simulated paths.
pub const DEFAULT_NUMBER_OF_PATHS: usize = 2000;
/// Default seed of the Brownian motion.
pub const DEFAULT_SEED: u64 = 31415;
/// Default optimiser iteration cap.
pub const DEFAULT_MAX_ITERATIONS: usize = 400;
/// Default finite-difference step per parameter.
pub const DEFAULT_PARAMETER_STEP: f64 = 1e-4;
/// Default convergence accuracy.
pub const DEFAULT_ACCURACY: f64 = 1e-7;
/// Jacobian worker threads of the default optimiser.
pub const DEFAULT_OPTIMIZER_THREADS: usize = 2;

/// Configuration of a calibration run.
///
/// # Examples
///
/// ```
/// use pricer_optimiser::calibration::CalibrationConfig;
///
/// let config = CalibrationConfig::default();
/// assert_eq!(config.number_of_paths, 2000);
/// assert_eq!(config.seed, 31415);
///
/// let config = CalibrationConfig::from_toml_str("seed = 7\nvaluation_threads = 4").unwrap();
/// assert_eq!(config.seed, 7);
/// assert_eq!(config.valuation_threads, Some(4));
/// assert_eq!(config.max_iterations, 400);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Paths of the simulation built for every objective evaluation.
    pub number_of_paths: usize,
    /// Seed of the Brownian motion.
    pub seed: u64,
    /// Optimiser iteration cap.
    pub max_iterations: usize,
    /// Finite-difference step per parameter.
    pub parameter_step: f64,
    /// Convergence accuracy.
    pub accuracy: f64,
    /// Valuation worker threads; `None` or `0` values products inline.
    pub valuation_threads: Option<usize>,
    /// Randomness source reused across all iterations.
    ///
    /// Built from `seed` and `number_of_paths` when absent.
    #[serde(skip)]
    pub brownian_motion: Option<Arc<BrownianMotion>>,
    /// Optimiser implementation.
    ///
    /// Levenberg-Marquardt with two Jacobian threads when absent.
    #[serde(skip)]
    pub optimizer_factory: Option<Arc<dyn OptimizerFactory>>,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            number_of_paths: DEFAULT_NUMBER_OF_PATHS,
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            parameter_step: DEFAULT_PARAMETER_STEP,
            accuracy: DEFAULT_ACCURACY,
            valuation_threads: None,
            brownian_motion: None,
            optimizer_factory: None,
        }
    }
}

impl CalibrationConfig {
    /// Parse a configuration from TOML.
    ///
    /// # Errors
    ///
    /// `CalibrationError::InvalidConfig` for malformed TOML or mistyped values.
    pub fn from_toml_str(source: &str) -> Result<Self, CalibrationError> {
        toml::from_str(source).map_err(|e| CalibrationError::InvalidConfig(e.to_string()))
    }

    /// Check the numeric options.
    ///
    /// # Errors
    ///
    /// `CalibrationError::InvalidConfig` naming the first offending option.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.number_of_paths == 0 || self.number_of_paths > MAX_PATHS {
            return Err(CalibrationError::InvalidConfig(format!(
                "number_of_paths must be in [1, {}], got {}",
                MAX_PATHS, self.number_of_paths
            )));
        }
        if !(self.parameter_step.is_finite() && self.parameter_step > 0.0) {
            return Err(CalibrationError::InvalidConfig(format!(
                "parameter_step must be positive, got {}",
                self.parameter_step
            )));
        }
        if !(self.accuracy.is_finite() && self.accuracy >= 0.0) {
            return Err(CalibrationError::InvalidConfig(format!(
                "accuracy must be non-negative, got {}",
                self.accuracy
            )));
        }
        Ok(())
    }

    /// Set the number of paths.
    pub fn with_number_of_paths(mut self, number_of_paths: usize) -> Self {
        self.number_of_paths = number_of_paths;
        self
    }

    /// Set the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the finite-difference step.
    pub fn with_parameter_step(mut self, parameter_step: f64) -> Self {
        self.parameter_step = parameter_step;
        self
    }

    /// Set the convergence accuracy.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Set the valuation worker threads.
    pub fn with_valuation_threads(mut self, threads: Option<usize>) -> Self {
        self.valuation_threads = threads;
        self
    }

    /// Reuse `brownian_motion` for every iteration.
    pub fn with_brownian_motion(mut self, brownian_motion: Arc<BrownianMotion>) -> Self {
        self.brownian_motion = Some(brownian_motion);
        self
    }

    /// Use `factory` to create the optimiser.
    pub fn with_optimizer_factory(mut self, factory: Arc<dyn OptimizerFactory>) -> Self {
        self.optimizer_factory = Some(factory);
        self
    }
}
