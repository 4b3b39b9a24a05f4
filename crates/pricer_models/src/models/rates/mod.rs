//! Interest rate stochastic models.
//!
//! This module provides stochastic models for interest rate processes:
//! - [`ShortRateModel`]: Interface consumed by the short-rate simulation
//! - [`HullWhiteModel`]: Hull-White one-factor model for short rate dynamics
//!
//! # Models
//!
//! ## Hull-White 1F
//!
//! The Hull-White model describes short rate dynamics with mean reversion:
//! ```text
//! dr(t) = -a * (r(t) - r(0)) * dt + sigma(t) * dW(t)
//! ```
//! with `sigma(t)` taken from a calibrated volatility model.

pub mod hull_white;

// Re-export main types
pub use hull_white::HullWhiteModel;

use pricer_core::types::TimeDiscretization;

/// One-factor Gaussian short-rate dynamics on a simulation grid.
///
/// `r(t) = r(0) + x(t)` with `dx = -a x dt + σ_i dW` on `[t_i, t_{i+1})`.
pub trait ShortRateModel: Send + Sync {
    /// Simulation time grid.
    fn time_discretization(&self) -> &TimeDiscretization;

    /// Initial short rate r(0).
    fn initial_short_rate(&self) -> f64;

    /// Mean reversion speed a.
    fn mean_reversion(&self) -> f64;

    /// Short-rate volatility σ_i on the interval `[t_i, t_{i+1})`.
    ///
    /// # Panics
    ///
    /// Panics if `time_index` is not a valid step of the simulation grid.
    fn short_rate_volatility(&self, time_index: usize) -> f64;
}
