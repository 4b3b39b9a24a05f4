//! # Pricer Pricing (Layer 3: Simulation Engine)
//!
//! ## Layer 3 Role
//!
//! pricer_pricing simulates the short-rate models of `pricer_models` and
//! values products on the simulated paths:
//! - Seeded random number generation (`rng`)
//! - Shared Brownian increments and the short-rate simulation (`mc`)
//! - Valuation products behind the [`Valuable`](products::Valuable) trait (`products`)
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pricer_core::market_data::curves::FlatCurve;
//! use pricer_core::types::TimeDiscretization;
//! use pricer_models::models::{FourParameterExponentialVolatility, HullWhiteModel};
//! use pricer_pricing::mc::{BrownianMotion, ShortRateSimulation};
//! use pricer_pricing::products::{ShortRateOption, Valuable};
//!
//! let grid = TimeDiscretization::from_uniform(0.0, 8, 0.25).unwrap();
//! let volatility = Arc::new(FourParameterExponentialVolatility::new(
//!     grid.clone(), grid.clone(), 0.01, 0.0, 0.0, 0.0, true,
//! ));
//! let model = HullWhiteModel::new(FlatCurve::new(0.03), 0.1, volatility).unwrap();
//! let brownian = BrownianMotion::new(grid, 1, 2000, 31415).unwrap();
//!
//! let simulation = ShortRateSimulation::new(&model, &brownian).unwrap();
//! let value = ShortRateOption::new(2.0, 0.03).value(0.0, &simulation).unwrap();
//! assert!(value.average() > 0.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod mc;
pub mod products;
pub mod rng;
