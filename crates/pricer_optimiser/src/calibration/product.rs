//! Calibration products.

use std::fmt;
use std::sync::Arc;

use pricer_pricing::products::Valuable;

/// A market instrument with a target value and a weight.
///
/// Its residual is `weight * (model value - target value)`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pricer_optimiser::calibration::CalibrationProduct;
/// use pricer_pricing::products::ZeroCouponBond;
///
/// let product = CalibrationProduct::new(Arc::new(ZeroCouponBond::new(1.0)), 0.97, 1.0);
/// assert_eq!(product.target_value(), 0.97);
/// ```
#[derive(Clone)]
pub struct CalibrationProduct {
    product: Arc<dyn Valuable>,
    target_value: f64,
    weight: f64,
}

impl CalibrationProduct {
    /// Create a calibration product.
    ///
    /// # Arguments
    ///
    /// * `product` - Product valued on each trial simulation
    /// * `target_value` - Market value to reproduce
    /// * `weight` - Non-negative residual weight, checked when calibrating
    pub fn new(product: Arc<dyn Valuable>, target_value: f64, weight: f64) -> Self {
        Self {
            product,
            target_value,
            weight,
        }
    }

    /// The product to value.
    pub fn product(&self) -> &dyn Valuable {
        self.product.as_ref()
    }

    /// Target value.
    pub fn target_value(&self) -> f64 {
        self.target_value
    }

    /// Residual weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl fmt::Debug for CalibrationProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalibrationProduct")
            .field("target_value", &self.target_value)
            .field("weight", &self.weight)
            .finish_non_exhaustive()
    }
}
