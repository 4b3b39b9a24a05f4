//! # pricer_core: Mathematical Foundation for Model Calibration
//!
//! ## Layer 1 (Foundation) Role
//!
//! pricer_core serves as the bottom layer of the calibration stack, providing:
//! - Time grids: [`TimeDiscretization`](types::TimeDiscretization) (`types::time`)
//! - Error types: `PricingError`, `SolverError` (`types::error`)
//! - Market data: flat yield curve and parametric caplet volatilities (`market_data`)
//! - The optimiser contract and a Levenberg-Marquardt solver (`math::solvers`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other pricer_* crates, with minimal external dependencies:
//! - thiserror: Error derivation
//! - rayon: Parallel Jacobian evaluation
//! - tracing: Solver diagnostics
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use pricer_core::market_data::surfaces::ParametricCapletVolatilities;
//! use pricer_core::types::TimeDiscretization;
//!
//! // Uniform simulation grid 0.0, 0.5, ..., 5.0
//! let grid = TimeDiscretization::from_uniform(0.0, 10, 0.5).unwrap();
//! assert_eq!(grid.number_of_time_steps(), 10);
//!
//! // Caplet volatility implied by the abcd curve
//! let caplets = ParametricCapletVolatilities::new(0.10, 0.05, 0.8, 0.12);
//! assert!(caplets.volatility(grid.time(10)) > 0.12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for solver errors

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
