//! Parametric volatility models for short-rate simulations.
//!
//! A volatility model maps a grid cell `(time index i, tenor index j)` to the
//! instantaneous volatility used on the simulation interval `[t_i, t_{i+1})`
//! for the tenor period ending at `T_j`.
//!
//! ## Immutability
//!
//! Models are immutable values shared through [`Arc`]. Calibration never
//! mutates a model: [`ParametricVolatilityModel::with_parameters`] returns a
//! new instance, or the receiver itself when the model is not calibrateable.
//!
//! ## Models
//!
//! - [`FourParameterExponentialVolatility`]: instantaneous volatilities
//!   bootstrapped from an abcd caplet volatility curve
//! - [`ConstantVolatility`]: a single flat volatility
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::types::TimeDiscretization;
//! use pricer_models::models::volatility::{
//!     FourParameterExponentialVolatility, ParametricVolatilityModel, VolatilityModel,
//! };
//!
//! let times = TimeDiscretization::from_uniform(0.0, 10, 0.5).unwrap();
//! let tenors = TimeDiscretization::from_uniform(0.0, 10, 0.5).unwrap();
//! let model = Arc::new(FourParameterExponentialVolatility::new(
//!     times, tenors, 0.2, 0.0, 0.0, 0.0, true,
//! ));
//!
//! assert_eq!(model.parameters(), Some(vec![0.2, 0.0, 0.0, 0.0]));
//! assert!((model.volatility(0, 4) - 0.2).abs() < 1e-12);
//!
//! let bumped = model.clone().with_parameters(&[0.3, 0.0, 0.0, 0.0]);
//! assert!((bumped.volatility(0, 4) - 0.3).abs() < 1e-12);
//! ```

mod constant;
mod four_parameter_exponential;

pub use constant::ConstantVolatility;
pub use four_parameter_exponential::{instantaneous_volatility, FourParameterExponentialVolatility};

use std::fmt;
use std::sync::Arc;

use pricer_core::types::TimeDiscretization;

/// Volatility structure on a simulation time grid and a tenor grid.
pub trait VolatilityModel: Send + Sync + fmt::Debug {
    /// Simulation time grid `t_0 < ... < t_n`.
    fn time_discretization(&self) -> &TimeDiscretization;

    /// Tenor grid `T_0 < ... < T_m`.
    fn tenor_discretization(&self) -> &TimeDiscretization;

    /// Instantaneous volatility on `[t_i, t_{i+1})` for the tenor ending at `T_j`.
    ///
    /// Deterministic and never negative.
    ///
    /// # Panics
    ///
    /// Panics if `time_index >= number_of_time_steps()` of the time grid or
    /// `tenor_index >= len()` of the tenor grid.
    fn volatility(&self, time_index: usize, tenor_index: usize) -> f64;
}

/// A volatility model identified by a parameter vector.
pub trait ParametricVolatilityModel: VolatilityModel + Sized {
    /// Whether the parameters are exposed for calibration.
    fn is_calibrateable(&self) -> bool;

    /// Current parameters, or `None` if the model is not calibrateable.
    fn parameters(&self) -> Option<Vec<f64>>;

    /// Model with the same grids and the given parameters.
    ///
    /// Returns `self` unchanged when the model is not calibrateable or the
    /// parameters equal the current ones.
    fn with_parameters(self: Arc<Self>, parameters: &[f64]) -> Arc<Self>;
}

/// A model whose volatility structure can be replaced.
///
/// Implemented by short-rate models so that a calibration can rebuild the
/// model around each trial volatility model.
pub trait VolatilityModelSubstitution<V>: Send + Sync {
    /// Copy of `self` using `volatility_model`; the receiver is untouched.
    fn with_volatility_model(&self, volatility_model: Arc<V>) -> Self
    where
        Self: Sized;
}

/// Overwrite the leading entries of `current` with `parameters`.
///
/// Returns `None` when nothing changes.
fn merge_parameters<const N: usize>(current: [f64; N], parameters: &[f64]) -> Option<[f64; N]> {
    debug_assert_eq!(parameters.len(), N, "parameter vector has wrong length");
    let mut merged = current;
    for (slot, value) in merged.iter_mut().zip(parameters) {
        *slot = *value;
    }
    (merged != current).then_some(merged)
}
