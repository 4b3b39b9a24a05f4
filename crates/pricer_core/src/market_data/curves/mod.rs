//! Curve abstractions for interest rate calculations.
//!
//! This module provides:
//! - [`YieldCurve`]: Trait for discount factor and rate calculations
//! - [`FlatCurve`]: Constant rate yield curve implementation

mod flat;
mod traits;

pub use flat::FlatCurve;
pub use traits::YieldCurve;
