//! Calibration error types.
//!
//! A failed calibration surfaces exactly one error type,
//! [`CalibrationError`], whichever layer failed underneath.

use pricer_core::types::SolverError;
use thiserror::Error;

/// Calibration error type.
///
/// # Variants
///
/// - `Solver`: The optimiser failed; carries the underlying cause
/// - `ExecutorBuild`: The valuation worker pool could not be created
/// - `InvalidConfig`: The configuration could not be parsed or is inconsistent
///
/// # Examples
///
/// ```
/// use pricer_core::types::SolverError;
/// use pricer_optimiser::calibration::CalibrationError;
///
/// let err: CalibrationError = SolverError::ObjectiveFailure("task panicked".to_string()).into();
/// assert!(format!("{}", err).contains("task panicked"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Optimiser failure.
    #[error("Calibration failed: {0}")]
    Solver(#[from] SolverError),

    /// Valuation worker pool could not be built.
    #[error("Valuation executor could not be built: {0}")]
    ExecutorBuild(String),

    /// Invalid calibration configuration.
    #[error("Invalid calibration configuration: {0}")]
    InvalidConfig(String),
}
