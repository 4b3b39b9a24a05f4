//! Volatility curve abstractions.
//!
//! This module provides:
//! - [`ParametricCapletVolatilities`]: Four-parameter Black-76 caplet volatility curve

mod caplet;

pub use caplet::ParametricCapletVolatilities;
