//! Brownian increments shared across re-simulations.
//!
//! A [`BrownianMotion`] fixes the random numbers of a simulation. It is
//! created once per calibration and handed to every trial simulation, so
//! residual differences between iterations stem from parameter changes only.

use std::fmt;
use std::sync::OnceLock;

use pricer_core::types::TimeDiscretization;

use super::error::ConfigError;
use crate::rng::PricerRng;

/// Maximum supported number of paths.
pub const MAX_PATHS: usize = 10_000_000;

/// Lazily generated Brownian increments `ΔW(t_i)` on a time grid.
///
/// Increments are drawn on first access, from a [`PricerRng`] seeded with
/// `seed`, in the order time step, factor, path. Generation happens at most
/// once even under concurrent access.
///
/// # Example
///
/// ```
/// use pricer_core::types::TimeDiscretization;
/// use pricer_pricing::mc::BrownianMotion;
///
/// let grid = TimeDiscretization::from_uniform(0.0, 4, 0.25).unwrap();
/// let brownian = BrownianMotion::new(grid, 1, 1000, 31415).unwrap();
///
/// let dw = brownian.increment(0, 0);
/// assert_eq!(dw.len(), 1000);
/// ```
pub struct BrownianMotion {
    time_discretization: TimeDiscretization,
    number_of_factors: usize,
    number_of_paths: usize,
    seed: u64,
    increments: OnceLock<Vec<f64>>,
}

impl BrownianMotion {
    /// Create a Brownian motion; no random numbers are drawn yet.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidFactorCount`] for zero factors
    /// - [`ConfigError::InvalidPathCount`] for a path count outside [1, 10_000_000]
    pub fn new(
        time_discretization: TimeDiscretization,
        number_of_factors: usize,
        number_of_paths: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if number_of_factors == 0 {
            return Err(ConfigError::InvalidFactorCount(number_of_factors));
        }
        if number_of_paths == 0 || number_of_paths > MAX_PATHS {
            return Err(ConfigError::InvalidPathCount(number_of_paths));
        }
        Ok(Self {
            time_discretization,
            number_of_factors,
            number_of_paths,
            seed,
            increments: OnceLock::new(),
        })
    }

    /// Time grid of the increments.
    #[inline]
    pub fn time_discretization(&self) -> &TimeDiscretization {
        &self.time_discretization
    }

    /// Number of independent factors.
    #[inline]
    pub fn number_of_factors(&self) -> usize {
        self.number_of_factors
    }

    /// Number of paths.
    #[inline]
    pub fn number_of_paths(&self) -> usize {
        self.number_of_paths
    }

    /// Seed of the generator.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Increments `W(t_{i+1}) - W(t_i)` of `factor`, one per path.
    ///
    /// # Panics
    ///
    /// Panics if `time_index` is not a step of the grid or `factor` is out
    /// of range.
    pub fn increment(&self, time_index: usize, factor: usize) -> &[f64] {
        assert!(factor < self.number_of_factors, "factor out of range");
        assert!(
            time_index < self.time_discretization.number_of_time_steps(),
            "time index out of range"
        );
        let start = (time_index * self.number_of_factors + factor) * self.number_of_paths;
        &self.increments()[start..start + self.number_of_paths]
    }

    fn increments(&self) -> &[f64] {
        self.increments.get_or_init(|| self.generate())
    }

    fn generate(&self) -> Vec<f64> {
        let steps = self.time_discretization.number_of_time_steps();
        let block = self.number_of_factors * self.number_of_paths;
        let mut increments = vec![0.0; steps * block];
        let mut rng = PricerRng::from_seed(self.seed);

        for (time_index, chunk) in increments.chunks_mut(block).enumerate() {
            rng.fill_normal(chunk);
            let sqrt_dt = self.time_discretization.time_step(time_index).sqrt();
            for dw in chunk.iter_mut() {
                *dw *= sqrt_dt;
            }
        }
        increments
    }
}

impl fmt::Debug for BrownianMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrownianMotion")
            .field("time_discretization", &self.time_discretization)
            .field("number_of_factors", &self.number_of_factors)
            .field("number_of_paths", &self.number_of_paths)
            .field("seed", &self.seed)
            .field("generated", &self.increments.get().is_some())
            .finish()
    }
}
