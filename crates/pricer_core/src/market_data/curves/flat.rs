//! Flat yield curve implementation.

use super::YieldCurve;
use crate::market_data::error::MarketDataError;

/// Flat yield curve with constant continuously compounded rate.
///
/// Anchors the short-rate models used during calibration.
///
/// # Example
///
/// ```
/// use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
///
/// let curve = FlatCurve::new(0.03);
/// assert_eq!(curve.rate(), 0.03);
/// assert_eq!(curve.zero_rate(5.0).unwrap(), 0.03);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatCurve {
    rate: f64,
}

impl FlatCurve {
    /// Construct a flat curve with the given constant rate.
    #[inline]
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Return the constant rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl YieldCurve for FlatCurve {
    /// `D(t) = exp(-r * t)`.
    fn discount_factor(&self, t: f64) -> Result<f64, MarketDataError> {
        if t < 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok((-self.rate * t).exp())
    }

    fn zero_rate(&self, t: f64) -> Result<f64, MarketDataError> {
        if t <= 0.0 {
            return Err(MarketDataError::InvalidMaturity { t });
        }
        Ok(self.rate)
    }

    fn forward_rate(&self, t1: f64, t2: f64) -> Result<f64, MarketDataError> {
        if t2 <= t1 {
            return Err(MarketDataError::InvalidMaturity { t: t2 - t1 });
        }
        Ok(self.rate)
    }
}
