//! Zero-coupon bond.

use pricer_core::types::PricingError;

use super::{maturity_index, Valuable};
use crate::mc::{RandomVariable, ShortRateSimulation};

/// Pays one unit of currency at `maturity`.
///
/// # Example
///
/// ```
/// use pricer_pricing::products::ZeroCouponBond;
///
/// let bond = ZeroCouponBond::new(2.0);
/// assert_eq!(bond.maturity(), 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroCouponBond {
    maturity: f64,
}

impl ZeroCouponBond {
    /// Create a bond maturing at `maturity`.
    pub fn new(maturity: f64) -> Self {
        Self { maturity }
    }

    /// Maturity time.
    pub fn maturity(&self) -> f64 {
        self.maturity
    }
}

impl Valuable for ZeroCouponBond {
    fn value(
        &self,
        evaluation_time: f64,
        simulation: &ShortRateSimulation,
    ) -> Result<RandomVariable, PricingError> {
        let index = maturity_index(evaluation_time, self.maturity, simulation)?;
        Ok(simulation.discount_factor(index).clone())
    }
}
