//! Option on the short rate.

use pricer_core::types::PricingError;

use super::{maturity_index, Valuable};
use crate::mc::{RandomVariable, ShortRateSimulation};

/// Pays `max(r(T) - K, 0)` at `T = maturity`.
///
/// Unlike the zero-coupon bond its value is sensitive to the short-rate
/// volatility, which makes it a useful calibration instrument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShortRateOption {
    maturity: f64,
    strike: f64,
}

impl ShortRateOption {
    /// Create an option maturing at `maturity` with strike `strike`.
    pub fn new(maturity: f64, strike: f64) -> Self {
        Self { maturity, strike }
    }

    /// Maturity time.
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Strike rate.
    pub fn strike(&self) -> f64 {
        self.strike
    }
}

impl Valuable for ShortRateOption {
    fn value(
        &self,
        evaluation_time: f64,
        simulation: &ShortRateSimulation,
    ) -> Result<RandomVariable, PricingError> {
        let index = maturity_index(evaluation_time, self.maturity, simulation)?;
        let strike = self.strike;
        let payoff = simulation.short_rate(index).map(|r| (r - strike).max(0.0));
        Ok(payoff.mult(simulation.discount_factor(index)))
    }
}
