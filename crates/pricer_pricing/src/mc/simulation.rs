//! Monte Carlo simulation of the Hull-White short rate.
//!
//! The deviation `x = r - r(0)` is an Ornstein-Uhlenbeck process with
//! piecewise constant volatility and is stepped exactly:
//!
//! ```text
//! x(t_{i+1}) = x(t_i) e^{-a Δt} + σ_i sqrt((1 - e^{-2 a Δt}) / (2a)) Z_i
//! ```
//!
//! The pathwise discount factor `exp(-∫ r dt)` integrates the short rate with
//! the trapezoidal rule.

use pricer_core::types::{PricingError, TimeDiscretization};
use pricer_models::models::rates::ShortRateModel;

use super::brownian::BrownianMotion;
use super::random_variable::RandomVariable;

/// Below this value of `a Δt` the variance factor uses its small-`a` limit `Δt`.
const SMALL_DECAY: f64 = 1e-8;

/// Simulated short rates and discount factors on the model time grid.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::market_data::curves::FlatCurve;
/// use pricer_core::types::TimeDiscretization;
/// use pricer_models::models::{ConstantVolatility, HullWhiteModel};
/// use pricer_pricing::mc::{BrownianMotion, ShortRateSimulation};
///
/// let grid = TimeDiscretization::from_uniform(0.0, 4, 0.25).unwrap();
/// let volatility = Arc::new(ConstantVolatility::new(grid.clone(), grid.clone(), 0.0, true));
/// let model = HullWhiteModel::new(FlatCurve::new(0.04), 0.1, volatility).unwrap();
/// let brownian = BrownianMotion::new(grid, 1, 100, 31415).unwrap();
///
/// let simulation = ShortRateSimulation::new(&model, &brownian).unwrap();
/// let df = simulation.discount_factor(4).average();
/// assert!((df - (-0.04_f64).exp()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct ShortRateSimulation {
    time_discretization: TimeDiscretization,
    number_of_paths: usize,
    short_rates: Vec<RandomVariable>,
    discount_factors: Vec<RandomVariable>,
}

impl ShortRateSimulation {
    /// Simulate `model` with the increments of `brownian`.
    ///
    /// Only the first Brownian factor is used.
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidInput` if the Brownian motion lives on a different
    /// time grid than the model.
    pub fn new<M: ShortRateModel + ?Sized>(
        model: &M,
        brownian: &BrownianMotion,
    ) -> Result<Self, PricingError> {
        let time_discretization = model.time_discretization().clone();
        if brownian.time_discretization() != &time_discretization {
            return Err(PricingError::InvalidInput(
                "Brownian motion and model use different time grids".to_string(),
            ));
        }

        let paths = brownian.number_of_paths();
        let steps = time_discretization.number_of_time_steps();
        let a = model.mean_reversion();
        let r0 = model.initial_short_rate();

        let mut short_rates = Vec::with_capacity(steps + 1);
        let mut discount_factors = Vec::with_capacity(steps + 1);

        let mut x = vec![0.0; paths];
        let mut integral = vec![0.0; paths];
        short_rates.push(RandomVariable::constant(r0, paths));
        discount_factors.push(RandomVariable::constant(1.0, paths));

        for time_index in 0..steps {
            let dt = time_discretization.time_step(time_index);
            let sigma = model.short_rate_volatility(time_index);
            let decay = (-a * dt).exp();
            let variance_factor = if a * dt < SMALL_DECAY {
                dt
            } else {
                (1.0 - (-2.0 * a * dt).exp()) / (2.0 * a)
            };
            // ΔW = sqrt(Δt) Z
            let scale = sigma * (variance_factor / dt).sqrt();
            let dw = brownian.increment(time_index, 0);

            for path in 0..paths {
                let r_start = r0 + x[path];
                x[path] = x[path] * decay + scale * dw[path];
                let r_end = r0 + x[path];
                integral[path] += 0.5 * (r_start + r_end) * dt;
            }

            short_rates.push(RandomVariable::new(x.iter().map(|xi| r0 + xi).collect()));
            discount_factors.push(RandomVariable::new(
                integral.iter().map(|i| (-i).exp()).collect(),
            ));
        }

        Ok(Self {
            time_discretization,
            number_of_paths: paths,
            short_rates,
            discount_factors,
        })
    }

    /// Simulation time grid.
    #[inline]
    pub fn time_discretization(&self) -> &TimeDiscretization {
        &self.time_discretization
    }

    /// Number of paths.
    #[inline]
    pub fn number_of_paths(&self) -> usize {
        self.number_of_paths
    }

    /// Short rate `r(t_i)`.
    ///
    /// # Panics
    ///
    /// Panics if `time_index` is outside the grid.
    #[inline]
    pub fn short_rate(&self, time_index: usize) -> &RandomVariable {
        &self.short_rates[time_index]
    }

    /// Discount factor `exp(-∫₀^{t_i} r dt)`.
    ///
    /// # Panics
    ///
    /// Panics if `time_index` is outside the grid.
    #[inline]
    pub fn discount_factor(&self, time_index: usize) -> &RandomVariable {
        &self.discount_factors[time_index]
    }

    /// Grid index of time `t`, if `t` is a grid point.
    #[inline]
    pub fn time_index(&self, t: f64) -> Option<usize> {
        self.time_discretization.time_index(t)
    }
}
