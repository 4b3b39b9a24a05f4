//! Hull-White one-factor interest rate model.
//!
//! The Hull-White model is a short-rate model described by:
//! ```text
//! r(t) = r(0) + x(t)
//! dx(t) = -a * x(t) * dt + sigma(t) * dW(t),   x(0) = 0
//! ```
//! where:
//! - r(0) = initial short rate, the level of a flat initial curve
//! - a = mean reversion speed (non-negative)
//! - sigma(t) = piecewise constant volatility read from a [`VolatilityModel`]
//! - dW(t) = Wiener process increment
//!
//! ## Volatility Mapping
//!
//! On the simulation interval `[t_i, t_{i+1})` the short rate uses the
//! volatility of the shortest unexpired tenor period, i.e. cell `(i, j)` with
//! `j` the first tenor index whose time lies strictly after `t_i` (the last
//! tenor if all have expired).
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use pricer_core::market_data::curves::FlatCurve;
//! use pricer_core::types::TimeDiscretization;
//! use pricer_models::models::rates::{HullWhiteModel, ShortRateModel};
//! use pricer_models::models::volatility::ConstantVolatility;
//!
//! let grid = TimeDiscretization::from_uniform(0.0, 8, 0.25).unwrap();
//! let volatility = Arc::new(ConstantVolatility::new(grid.clone(), grid, 0.01, true));
//! let model = HullWhiteModel::new(FlatCurve::new(0.03), 0.05, volatility).unwrap();
//!
//! assert!((model.initial_short_rate() - 0.03).abs() < 1e-12);
//! assert!((model.short_rate_volatility(3) - 0.01).abs() < 1e-12);
//! ```

use std::fmt;
use std::sync::Arc;

use pricer_core::market_data::curves::FlatCurve;
use pricer_core::types::{PricingError, TimeDiscretization};

use super::ShortRateModel;
use crate::models::volatility::{VolatilityModel, VolatilityModelSubstitution};

/// Hull-White one-factor model for short rate dynamics.
///
/// # Type Parameters
///
/// * `V` - Volatility model supplying the short-rate volatility
///
/// # Fields
///
/// * `initial_curve` - Flat initial yield curve giving r(0)
/// * `mean_reversion` - Mean reversion speed (a)
/// * `volatility_model` - Shared volatility structure
pub struct HullWhiteModel<V> {
    initial_curve: FlatCurve,
    mean_reversion: f64,
    volatility_model: Arc<V>,
}

impl<V: VolatilityModel> HullWhiteModel<V> {
    /// Create a new Hull-White model with validation.
    ///
    /// # Arguments
    ///
    /// * `initial_curve` - Flat initial yield curve
    /// * `mean_reversion` - Mean reversion speed (finite, non-negative)
    /// * `volatility_model` - Volatility structure on the simulation grid
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` for a negative or non-finite mean reversion.
    pub fn new(
        initial_curve: FlatCurve,
        mean_reversion: f64,
        volatility_model: Arc<V>,
    ) -> Result<Self, PricingError> {
        if !mean_reversion.is_finite() || mean_reversion < 0.0 {
            return Err(PricingError::InvalidInput(format!(
                "mean reversion must be finite and non-negative, got {}",
                mean_reversion
            )));
        }

        Ok(Self {
            initial_curve,
            mean_reversion,
            volatility_model,
        })
    }

    /// Initial yield curve.
    #[inline]
    pub fn initial_curve(&self) -> &FlatCurve {
        &self.initial_curve
    }

    /// The volatility model.
    #[inline]
    pub fn volatility_model(&self) -> &Arc<V> {
        &self.volatility_model
    }
}

impl<V: VolatilityModel> ShortRateModel for HullWhiteModel<V> {
    fn time_discretization(&self) -> &TimeDiscretization {
        self.volatility_model.time_discretization()
    }

    fn initial_short_rate(&self) -> f64 {
        self.initial_curve.rate()
    }

    fn mean_reversion(&self) -> f64 {
        self.mean_reversion
    }

    fn short_rate_volatility(&self, time_index: usize) -> f64 {
        let t = self.time_discretization().time(time_index);
        let tenors = self.volatility_model.tenor_discretization();
        let tenor_index = tenors.index_after(t).unwrap_or(tenors.len() - 1);
        self.volatility_model.volatility(time_index, tenor_index)
    }
}

impl<V: VolatilityModel> VolatilityModelSubstitution<V> for HullWhiteModel<V> {
    fn with_volatility_model(&self, volatility_model: Arc<V>) -> Self {
        Self {
            initial_curve: self.initial_curve,
            mean_reversion: self.mean_reversion,
            volatility_model,
        }
    }
}

impl<V> Clone for HullWhiteModel<V> {
    fn clone(&self) -> Self {
        Self {
            initial_curve: self.initial_curve,
            mean_reversion: self.mean_reversion,
            volatility_model: Arc::clone(&self.volatility_model),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for HullWhiteModel<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HullWhiteModel")
            .field("initial_curve", &self.initial_curve)
            .field("mean_reversion", &self.mean_reversion)
            .field("volatility_model", &self.volatility_model)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::volatility::{FourParameterExponentialVolatility, ConstantVolatility};
    use approx::assert_relative_eq;

    fn humped_volatility() -> Arc<FourParameterExponentialVolatility> {
        let times = TimeDiscretization::from_uniform(0.0, 8, 0.5).unwrap();
        let tenors = TimeDiscretization::from_uniform(0.0, 4, 1.0).unwrap();
        Arc::new(FourParameterExponentialVolatility::new(
            times, tenors, 0.1, 0.05, 0.8, 0.12, true,
        ))
    }

    #[test]
    fn test_new_valid() {
        let model = HullWhiteModel::new(FlatCurve::new(0.02), 0.1, humped_volatility()).unwrap();
        assert_relative_eq!(model.initial_short_rate(), 0.02);
        assert_relative_eq!(model.mean_reversion(), 0.1);
        assert_eq!(model.time_discretization().number_of_time_steps(), 8);
    }

    #[test]
    fn test_new_invalid_mean_reversion() {
        assert!(HullWhiteModel::new(FlatCurve::new(0.02), -0.1, humped_volatility()).is_err());
        assert!(HullWhiteModel::new(FlatCurve::new(0.02), f64::NAN, humped_volatility()).is_err());
    }

    #[test]
    fn test_short_rate_volatility_uses_next_tenor() {
        let volatility = humped_volatility();
        let model = HullWhiteModel::new(FlatCurve::new(0.02), 0.1, volatility.clone()).unwrap();

        // t_0 = 0.0 -> T_1 = 1.0, t_2 = 1.0 -> T_2 = 2.0, t_3 = 1.5 -> T_2 = 2.0
        assert_relative_eq!(model.short_rate_volatility(0), volatility.volatility(0, 1));
        assert_relative_eq!(model.short_rate_volatility(2), volatility.volatility(2, 2));
        assert_relative_eq!(model.short_rate_volatility(3), volatility.volatility(3, 2));
    }

    #[test]
    fn test_short_rate_volatility_after_last_tenor() {
        let times = TimeDiscretization::from_uniform(0.0, 4, 1.0).unwrap();
        let tenors = TimeDiscretization::new(vec![0.0, 1.0]).unwrap();
        let volatility = Arc::new(ConstantVolatility::new(times, tenors, 0.01, true));
        let model = HullWhiteModel::new(FlatCurve::new(0.02), 0.1, volatility).unwrap();
        assert_relative_eq!(model.short_rate_volatility(3), 0.01);
    }

    #[test]
    fn test_with_volatility_model_leaves_receiver_untouched() {
        let original = humped_volatility();
        let model = HullWhiteModel::new(FlatCurve::new(0.02), 0.1, original.clone()).unwrap();

        let replacement = Arc::new(FourParameterExponentialVolatility::new(
            original.time_discretization().clone(),
            original.tenor_discretization().clone(),
            0.2,
            0.0,
            0.0,
            0.0,
            true,
        ));
        let substituted = model.with_volatility_model(replacement.clone());

        assert!(Arc::ptr_eq(model.volatility_model(), &original));
        assert!(Arc::ptr_eq(substituted.volatility_model(), &replacement));
        assert_relative_eq!(substituted.mean_reversion(), model.mean_reversion());
        assert_relative_eq!(substituted.short_rate_volatility(0), 0.2, max_relative = 1e-10);
    }
}
