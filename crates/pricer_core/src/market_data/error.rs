//! Market data error types.
//!
//! This module provides structured error handling for market data operations
//! including yield curve lookups and time grid construction.

use crate::types::PricingError;
use thiserror::Error;

/// Market data operation errors.
///
/// # Variants
///
/// - `InvalidMaturity`: Negative time to maturity
/// - `InvalidTimeGrid`: Time grid is not finite and strictly increasing
/// - `InsufficientData`: Not enough data points for construction
///
/// # Examples
///
/// ```
/// use pricer_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (negative time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Invalid time grid.
    #[error("Invalid time grid at index {index}: {reason}")]
    InvalidTimeGrid {
        /// Index of the first offending time
        index: usize,
        /// Description of the violation
        reason: String,
    },

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },
}

impl From<MarketDataError> for PricingError {
    fn from(err: MarketDataError) -> Self {
        PricingError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_time_grid_display() {
        let err = MarketDataError::InvalidTimeGrid {
            index: 3,
            reason: "times must be strictly increasing".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("index 3"));
        assert!(msg.contains("strictly increasing"));
    }

    #[test]
    fn test_into_pricing_error() {
        let err: PricingError = MarketDataError::InvalidMaturity { t: -0.5 }.into();
        assert!(matches!(err, PricingError::InvalidInput(_)));
    }
}
