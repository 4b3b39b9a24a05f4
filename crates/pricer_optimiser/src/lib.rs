//! # pricer_optimiser
//!
//! Volatility model calibration for Neutryx.
//!
//! This crate sits on top of Models (L2) and Pricing (L3), solving the
//! inverse problem of finding volatility parameters that reproduce market
//! values.
//!
//! ## Architecture Position
//!
//! Layer 2.5 in the **P**ricer layer of the architecture.
//! Depends on `pricer_core` (L1), `pricer_models` (L2) and `pricer_pricing` (L3).
//!
//! ## Modules
//!
//! - `calibration`: Objective function, valuation executor and calibration engine
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use pricer_core::market_data::curves::FlatCurve;
//! use pricer_core::types::TimeDiscretization;
//! use pricer_models::models::{ConstantVolatility, HullWhiteModel};
//! use pricer_optimiser::calibration::{calibrate, CalibrationConfig, CalibrationProduct};
//! use pricer_pricing::products::ShortRateOption;
//!
//! let grid = TimeDiscretization::from_uniform(0.0, 8, 0.25).unwrap();
//! let volatility = Arc::new(ConstantVolatility::new(grid.clone(), grid, 0.005, true));
//! let model = HullWhiteModel::new(FlatCurve::new(0.03), 0.1, volatility.clone()).unwrap();
//!
//! let products = vec![CalibrationProduct::new(Arc::new(ShortRateOption::new(2.0, 0.03)), 0.004, 1.0)];
//! let config = CalibrationConfig::default().with_number_of_paths(500);
//! let result = calibrate(&volatility, &model, &products, &config).unwrap();
//! assert!(result.model.sigma() > 0.005);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod calibration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::calibration::*;
}
