//! Market data structures for interest-rate model calibration.
//!
//! # Components
//!
//! - [`curves`]: Yield curve trait and the flat curve used to anchor short-rate models
//! - [`surfaces`]: Parametric caplet (Black-76) volatility curve
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use pricer_core::market_data::curves::{YieldCurve, FlatCurve};
//! use pricer_core::market_data::surfaces::ParametricCapletVolatilities;
//!
//! let curve = FlatCurve::new(0.05);
//! let df = curve.discount_factor(1.0).unwrap();
//! assert!((df - 0.951229).abs() < 1e-5);
//!
//! let caplet = ParametricCapletVolatilities::new(0.20, 0.0, 0.0, 0.0);
//! assert!((caplet.volatility(5.0) - 0.20).abs() < 1e-12);
//! ```

pub mod curves;
pub mod error;
pub mod surfaces;

// Re-export commonly used types
pub use curves::{FlatCurve, YieldCurve};
pub use error::MarketDataError;
pub use surfaces::ParametricCapletVolatilities;
