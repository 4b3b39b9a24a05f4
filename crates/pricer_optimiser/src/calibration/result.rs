//! Calibration result types.

use std::fmt;
use std::sync::Arc;

/// Outcome of a successful calibration.
///
/// `root_mean_squared_error` is the optimiser's final weighted residual RMS,
/// and NaN when no optimisation ran because the model is not calibrateable.
pub struct CalibrationResult<V> {
    /// Best-fit parameters (empty for a non-calibrateable model).
    pub parameters: Vec<f64>,
    /// Optimiser iterations performed.
    pub iterations: usize,
    /// Root mean squared residual at the best-fit parameters.
    pub root_mean_squared_error: f64,
    /// The calibrated volatility model.
    pub model: Arc<V>,
}

impl<V> CalibrationResult<V> {
    /// Result for a model returned unchanged.
    pub fn unchanged(model: Arc<V>) -> Self {
        Self {
            parameters: Vec::new(),
            iterations: 0,
            root_mean_squared_error: f64::NAN,
            model,
        }
    }
}

impl<V> Clone for CalibrationResult<V> {
    fn clone(&self) -> Self {
        Self {
            parameters: self.parameters.clone(),
            iterations: self.iterations,
            root_mean_squared_error: self.root_mean_squared_error,
            model: Arc::clone(&self.model),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for CalibrationResult<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalibrationResult")
            .field("parameters", &self.parameters)
            .field("iterations", &self.iterations)
            .field("root_mean_squared_error", &self.root_mean_squared_error)
            .field("model", &self.model)
            .finish()
    }
}
