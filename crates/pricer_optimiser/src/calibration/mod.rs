//! Volatility model calibration.
//!
//! # Components
//!
//! - [`CalibrationProduct`]: Instrument with target value and weight
//! - [`CalibrationConfig`]: Typed configuration with defaults and TOML loading
//! - [`ValuationExecutor`]: Parallel or inline product valuation
//! - [`CalibrationObjective`]: Parameters to weighted residuals
//! - [`CalibrationEngine`] / [`calibrate`]: The calibration run
//! - [`CalibrationResult`]: Best-fit parameters and calibrated model
//! - [`CalibrationError`]: The single failure type of a calibration

mod config;
mod engine;
mod error;
mod executor;
mod objective;
mod product;
mod result;

pub use config::{
    CalibrationConfig, DEFAULT_ACCURACY, DEFAULT_MAX_ITERATIONS, DEFAULT_NUMBER_OF_PATHS,
    DEFAULT_OPTIMIZER_THREADS, DEFAULT_PARAMETER_STEP, DEFAULT_SEED,
};
pub use engine::{calibrate, CalibrationEngine};
pub use error::CalibrationError;
pub use executor::{ValuationExecutor, ValuationTaskError};
pub use objective::CalibrationObjective;
pub use product::CalibrationProduct;
pub use result::CalibrationResult;
