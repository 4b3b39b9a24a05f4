//! Products valued on a short-rate simulation.
//!
//! Every product implements [`Valuable`]: given an evaluation time and a
//! simulation it returns the pathwise discounted value, or a
//! [`PricingError`] when it cannot be valued on that simulation.
//!
//! - [`ZeroCouponBond`]: pays 1 at maturity
//! - [`ShortRateOption`]: pays `max(r(T) - K, 0)` at maturity

mod short_rate_option;
mod zero_coupon_bond;

pub use short_rate_option::ShortRateOption;
pub use zero_coupon_bond::ZeroCouponBond;

use pricer_core::types::{PricingError, TIME_TOLERANCE};

use crate::mc::{RandomVariable, ShortRateSimulation};

/// A product that can be valued on a [`ShortRateSimulation`].
pub trait Valuable: Send + Sync {
    /// Pathwise value at `evaluation_time`, discounted to that time.
    ///
    /// # Errors
    ///
    /// `PricingError` if the product cannot be valued on `simulation`.
    fn value(
        &self,
        evaluation_time: f64,
        simulation: &ShortRateSimulation,
    ) -> Result<RandomVariable, PricingError>;
}

/// Grid index of `maturity`, checking that valuation happens at time zero.
fn maturity_index(
    evaluation_time: f64,
    maturity: f64,
    simulation: &ShortRateSimulation,
) -> Result<usize, PricingError> {
    if evaluation_time.abs() > TIME_TOLERANCE {
        return Err(PricingError::InvalidInput(format!(
            "evaluation time must be 0, got {}",
            evaluation_time
        )));
    }
    simulation.time_index(maturity).ok_or_else(|| {
        PricingError::InvalidInput(format!(
            "maturity {} is not on the simulation time grid",
            maturity
        ))
    })
}
