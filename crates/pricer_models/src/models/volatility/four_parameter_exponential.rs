//! Four-parameter exponential volatility model.
//!
//! The parameters `(a, b, c, d)` define a caplet (Black-76) volatility curve
//! `σ_Black(τ)`; see [`ParametricCapletVolatilities`]. The instantaneous
//! volatility on the simulation interval `[t_i, t_{i+1})` for the tenor
//! ending at `T_j` is recovered by differencing the integrated variance:
//!
//! ```text
//! v(i, j) = (σ_Black(T_j - t_i)² (T_j - t_i) - σ_Black(T_j - t_{i+1})² (T_j - t_{i+1})) / (t_{i+1} - t_i)
//! σ(i, j) = sqrt(max(v(i, j), 0))
//! ```

use std::fmt;
use std::sync::Arc;

use pricer_core::market_data::surfaces::ParametricCapletVolatilities;
use pricer_core::types::TimeDiscretization;

use super::{merge_parameters, ParametricVolatilityModel, VolatilityModel};

/// Instantaneous volatility from integrated variances at the start and end
/// of an interval of length `dt`.
///
/// The differenced variance is floored at zero before taking the root, so the
/// result is never negative (and never NaN for finite inputs).
///
/// # Example
///
/// ```
/// use pricer_models::models::volatility::instantaneous_volatility;
///
/// assert!((instantaneous_volatility(0.09, 0.05, 1.0) - 0.2).abs() < 1e-12);
/// assert_eq!(instantaneous_volatility(0.05, 0.05 + 1e-17, 0.5), 0.0);
/// ```
#[inline]
pub fn instantaneous_volatility(var_start: f64, var_end: f64, dt: f64) -> f64 {
    let variance = (var_start - var_end) / dt;
    variance.max(0.0).sqrt()
}

/// Volatility model bootstrapped from a four-parameter caplet curve.
#[derive(Debug, Clone, PartialEq)]
pub struct FourParameterExponentialVolatility {
    time_discretization: TimeDiscretization,
    tenor_discretization: TimeDiscretization,
    caplet: ParametricCapletVolatilities,
    is_calibrateable: bool,
}

impl FourParameterExponentialVolatility {
    /// Create the model.
    ///
    /// # Arguments
    ///
    /// * `time_discretization` - Simulation time grid
    /// * `tenor_discretization` - Tenor (period end) grid
    /// * `a`, `b`, `c`, `d` - Caplet curve parameters
    /// * `is_calibrateable` - Whether the parameters are exposed for calibration
    pub fn new(
        time_discretization: TimeDiscretization,
        tenor_discretization: TimeDiscretization,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
        is_calibrateable: bool,
    ) -> Self {
        Self {
            time_discretization,
            tenor_discretization,
            caplet: ParametricCapletVolatilities::new(a, b, c, d),
            is_calibrateable,
        }
    }

    /// The underlying caplet volatility curve.
    pub fn caplet_volatilities(&self) -> &ParametricCapletVolatilities {
        &self.caplet
    }
}

impl VolatilityModel for FourParameterExponentialVolatility {
    fn time_discretization(&self) -> &TimeDiscretization {
        &self.time_discretization
    }

    fn tenor_discretization(&self) -> &TimeDiscretization {
        &self.tenor_discretization
    }

    fn volatility(&self, time_index: usize, tenor_index: usize) -> f64 {
        let time_start = self.time_discretization.time(time_index);
        let time_end = self.time_discretization.time(time_index + 1);
        let maturity = self.tenor_discretization.time(tenor_index);

        let tau_start = maturity - time_start;
        let tau_end = maturity - time_end;

        let vol_start = self.caplet.volatility(tau_start);
        let vol_end = self.caplet.volatility(tau_end);

        instantaneous_volatility(
            vol_start * vol_start * tau_start,
            vol_end * vol_end * tau_end,
            time_end - time_start,
        )
    }
}

impl ParametricVolatilityModel for FourParameterExponentialVolatility {
    fn is_calibrateable(&self) -> bool {
        self.is_calibrateable
    }

    fn parameters(&self) -> Option<Vec<f64>> {
        self.is_calibrateable
            .then(|| self.caplet.parameters().to_vec())
    }

    fn with_parameters(self: Arc<Self>, parameters: &[f64]) -> Arc<Self> {
        if !self.is_calibrateable {
            return self;
        }
        match merge_parameters(self.caplet.parameters(), parameters) {
            Some([a, b, c, d]) => Arc::new(Self {
                time_discretization: self.time_discretization.clone(),
                tenor_discretization: self.tenor_discretization.clone(),
                caplet: ParametricCapletVolatilities::new(a, b, c, d),
                is_calibrateable: true,
            }),
            None => self,
        }
    }
}

impl fmt::Display for FourParameterExponentialVolatility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FourParameterExponentialVolatility [parameters={:?}]",
            self.caplet.parameters()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn grids() -> (TimeDiscretization, TimeDiscretization) {
        (
            TimeDiscretization::from_uniform(0.0, 20, 0.25).unwrap(),
            TimeDiscretization::from_uniform(0.0, 10, 0.5).unwrap(),
        )
    }

    fn model(a: f64, b: f64, c: f64, d: f64, is_calibrateable: bool) -> Arc<FourParameterExponentialVolatility> {
        let (times, tenors) = grids();
        Arc::new(FourParameterExponentialVolatility::new(
            times,
            tenors,
            a,
            b,
            c,
            d,
            is_calibrateable,
        ))
    }

    /// All cells whose tenor ends no earlier than the simulation interval.
    fn live_cells(m: &FourParameterExponentialVolatility) -> Vec<(usize, usize)> {
        let times = m.time_discretization();
        let tenors = m.tenor_discretization();
        let mut cells = Vec::new();
        for i in 0..times.number_of_time_steps() {
            for j in 0..tenors.len() {
                if tenors.time(j) >= times.time(i + 1) {
                    cells.push((i, j));
                }
            }
        }
        cells
    }

    // ========================================
    // Instantaneous Volatility Tests
    // ========================================

    #[test]
    fn test_instantaneous_volatility_positive() {
        assert_relative_eq!(instantaneous_volatility(0.5, 0.1, 4.0), 0.1_f64.sqrt(), epsilon = 1e-15);
    }

    #[test]
    fn test_instantaneous_volatility_clamps_negative_variance() {
        assert_eq!(instantaneous_volatility(0.1, 0.1 + 1e-16, 0.25), 0.0);
        assert_eq!(instantaneous_volatility(0.0, 1.0, 1.0), 0.0);
    }

    // ========================================
    // Volatility Tests
    // ========================================

    #[test]
    fn test_flat_curve_reproduction() {
        let sigma = 0.25;
        let m = model(sigma, 0.0, 0.0, 0.0, true);
        for (i, j) in live_cells(&m) {
            assert_relative_eq!(m.volatility(i, j), sigma, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_flat_level_reproduction() {
        // a = 0, d = σ is the same flat curve through the long-term level
        let m = model(0.0, 0.0, 1.5, 0.3, true);
        for (i, j) in live_cells(&m) {
            assert_relative_eq!(m.volatility(i, j), 0.3, max_relative = 1e-10);
        }
    }

    #[test]
    fn test_expired_tenor_has_zero_volatility() {
        let m = model(0.1, 0.05, 0.8, 0.12, true);
        // Tenor T_1 = 0.5 has expired before the interval [1.0, 1.25)
        assert_eq!(m.volatility(4, 1), 0.0);
    }

    #[test]
    fn test_matches_instantaneous_curve_on_fine_grid() {
        // On a fine grid the differenced variance approaches σ(T_j - t_i)²
        let times = TimeDiscretization::from_uniform(0.0, 1000, 0.001).unwrap();
        let tenors = TimeDiscretization::new(vec![1.0]).unwrap();
        let m = FourParameterExponentialVolatility::new(times, tenors, 0.1, 0.05, 0.8, 0.12, true);

        let expected = m.caplet_volatilities().instantaneous_volatility(1.0 - 0.0005);
        assert_relative_eq!(m.volatility(0, 0), expected, max_relative = 1e-5);
    }

    #[test]
    fn test_humped_volatility_is_positive() {
        let m = model(0.1, 0.05, 0.8, 0.12, true);
        for (i, j) in live_cells(&m) {
            assert!(m.volatility(i, j) > 0.0);
        }
    }

    // ========================================
    // Parameter Tests
    // ========================================

    #[test]
    fn test_parameters_calibrateable() {
        let m = model(0.1, 0.2, 0.3, 0.4, true);
        assert!(m.is_calibrateable());
        assert_eq!(m.parameters(), Some(vec![0.1, 0.2, 0.3, 0.4]));
    }

    #[test]
    fn test_parameters_not_calibrateable() {
        let m = model(0.1, 0.2, 0.3, 0.4, false);
        assert!(!m.is_calibrateable());
        assert_eq!(m.parameters(), None);
    }

    #[test]
    fn test_non_calibrateable_clone_is_identity() {
        let m = model(0.1, 0.2, 0.3, 0.4, false);
        let cloned = m.clone().with_parameters(&[1.0, 1.0, 1.0, 1.0]);
        assert!(Arc::ptr_eq(&m, &cloned));
    }

    #[test]
    fn test_equal_parameters_clone_is_identity() {
        let m = model(0.1, 0.2, 0.3, 0.4, true);
        let cloned = m.clone().with_parameters(&[0.1, 0.2, 0.3, 0.4]);
        assert!(Arc::ptr_eq(&m, &cloned));
    }

    #[test]
    fn test_clone_with_modified_parameters() {
        let m = model(0.1, 0.2, 0.3, 0.4, true);
        let cloned = m.clone().with_parameters(&[0.2, 0.2, 0.3, 0.4]);

        assert!(!Arc::ptr_eq(&m, &cloned));
        assert_eq!(cloned.parameters(), Some(vec![0.2, 0.2, 0.3, 0.4]));
        assert_eq!(cloned.time_discretization(), m.time_discretization());
        assert_eq!(cloned.tenor_discretization(), m.tenor_discretization());
        // Receiver untouched
        assert_eq!(m.parameters(), Some(vec![0.1, 0.2, 0.3, 0.4]));
    }

    #[test]
    fn test_display() {
        let m = model(0.1, 0.2, 0.3, 0.4, true);
        assert_eq!(
            m.to_string(),
            "FourParameterExponentialVolatility [parameters=[0.1, 0.2, 0.3, 0.4]]"
        );
    }

    // ========================================
    // Property Tests
    // ========================================

    proptest! {
        #[test]
        fn prop_volatility_non_negative(
            a in -0.5..0.5_f64,
            b in -0.5..0.5_f64,
            c in 0.0..3.0_f64,
            d in -0.2..0.5_f64,
        ) {
            let m = model(a, b, c, d, true);
            let times = m.time_discretization();
            let tenors = m.tenor_discretization();
            for i in 0..times.number_of_time_steps() {
                for j in 0..tenors.len() {
                    let vol = m.volatility(i, j);
                    prop_assert!(vol >= 0.0);
                    prop_assert!(!vol.is_nan());
                }
            }
        }

        #[test]
        fn prop_clone_with_own_parameters_is_equivalent(
            a in 0.0..0.5_f64,
            b in -0.2..0.2_f64,
            c in 0.0..3.0_f64,
            d in 0.0..0.3_f64,
        ) {
            let m = model(a, b, c, d, true);
            let parameters = m.parameters().unwrap_or_default();
            let cloned = m.clone().with_parameters(&parameters);
            for (i, j) in live_cells(&m) {
                prop_assert!((cloned.volatility(i, j) - m.volatility(i, j)).abs() <= 1e-14);
            }
        }
    }
}
