//! Stochastic rate models and their volatility structures.
//!
//! This module provides:
//! - `volatility`: Parametric volatility models with clone-on-modify semantics
//! - `rates`: The Hull-White short-rate model
//!
//! ## Design Philosophy
//!
//! All models are immutable. Volatility models are shared through `Arc` and
//! replaced, never mutated, when a calibration proposes new parameters.

pub mod rates;
pub mod volatility;

// Re-export core trait types
pub use volatility::{ParametricVolatilityModel, VolatilityModel, VolatilityModelSubstitution};

// Re-export concrete models
pub use rates::{HullWhiteModel, ShortRateModel};
pub use volatility::{ConstantVolatility, FourParameterExponentialVolatility};
