//! Optimiser contract used by calibrations.
//!
//! A calibration hands an [`ObjectiveFunction`] together with an initial
//! guess, box bounds, finite-difference steps and a target vector to an
//! [`OptimizerFactory`]. The resulting [`Optimizer`] drives
//! `objective(p) - target` towards zero.

use std::fmt;

use crate::types::SolverError;

/// Vector-valued function whose values are fitted to a target vector.
///
/// Implementations must be `Sync`: an optimiser may evaluate several trial
/// parameter vectors concurrently.
pub trait ObjectiveFunction: Sync {
    /// Evaluate the function at `parameters`.
    ///
    /// # Errors
    ///
    /// Any error aborts the optimisation.
    fn values(&self, parameters: &[f64]) -> Result<Vec<f64>, SolverError>;
}

impl<F> ObjectiveFunction for F
where
    F: Fn(&[f64]) -> Result<Vec<f64>, SolverError> + Sync,
{
    fn values(&self, parameters: &[f64]) -> Result<Vec<f64>, SolverError> {
        self(parameters)
    }
}

/// Least-squares problem handed to an [`OptimizerFactory`].
pub struct OptimizationProblem<'a> {
    /// Function to fit.
    pub objective: &'a dyn ObjectiveFunction,
    /// Starting point.
    pub initial_parameters: Vec<f64>,
    /// Lower bound per parameter (may be `-inf`).
    pub lower_bound: Vec<f64>,
    /// Upper bound per parameter (may be `+inf`).
    pub upper_bound: Vec<f64>,
    /// Finite-difference step per parameter.
    pub parameter_step: Vec<f64>,
    /// Values the objective should attain.
    pub target_values: Vec<f64>,
}

impl<'a> OptimizationProblem<'a> {
    /// Unconstrained problem with a uniform finite-difference step.
    pub fn unconstrained(
        objective: &'a dyn ObjectiveFunction,
        initial_parameters: Vec<f64>,
        parameter_step: f64,
        target_values: Vec<f64>,
    ) -> Self {
        let n = initial_parameters.len();
        Self {
            objective,
            initial_parameters,
            lower_bound: vec![f64::NEG_INFINITY; n],
            upper_bound: vec![f64::INFINITY; n],
            parameter_step: vec![parameter_step; n],
            target_values,
        }
    }

    /// Check that bounds and steps match the parameter dimension.
    pub fn validate(&self) -> Result<(), SolverError> {
        let expected = self.initial_parameters.len();
        for (name, got) in [
            ("lower_bound", self.lower_bound.len()),
            ("upper_bound", self.upper_bound.len()),
            ("parameter_step", self.parameter_step.len()),
        ] {
            if got != expected {
                return Err(SolverError::DimensionMismatch {
                    name,
                    expected,
                    got,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for OptimizationProblem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptimizationProblem")
            .field("initial_parameters", &self.initial_parameters)
            .field("lower_bound", &self.lower_bound)
            .field("upper_bound", &self.upper_bound)
            .field("parameter_step", &self.parameter_step)
            .field("target_values", &self.target_values)
            .finish_non_exhaustive()
    }
}

/// An iterative least-squares optimiser.
pub trait Optimizer {
    /// Run the optimisation to completion.
    ///
    /// Exhausting the iteration budget is not an error; the best parameters
    /// found so far remain available.
    fn run(&mut self) -> Result<(), SolverError>;

    /// Best parameters found.
    fn best_fit_parameters(&self) -> &[f64];

    /// Number of iterations performed.
    fn iterations(&self) -> usize;

    /// Root mean squared deviation from the target at the best parameters.
    fn root_mean_squared_error(&self) -> f64;
}

/// Creates optimisers for a given problem.
pub trait OptimizerFactory: Send + Sync + fmt::Debug {
    /// Build an optimiser for `problem`.
    ///
    /// # Errors
    ///
    /// `SolverError::DimensionMismatch` for inconsistent problem vectors.
    fn optimizer<'a>(
        &self,
        problem: OptimizationProblem<'a>,
    ) -> Result<Box<dyn Optimizer + 'a>, SolverError>;
}
