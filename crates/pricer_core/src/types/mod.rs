//! Core time and error types.
//!
//! This module provides:
//! - `time`: [`TimeDiscretization`] for simulation and tenor grids
//! - `error`: Structured error types for pricing and solver operations

pub mod error;
pub mod time;

// Re-export commonly used types at module level
pub use error::{PricingError, SolverError};
pub use time::{TimeDiscretization, TIME_TOLERANCE};
