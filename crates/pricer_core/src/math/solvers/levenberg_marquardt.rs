//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! This module provides the [`LevenbergMarquardtSolver`] for solving nonlinear
//! least-squares problems commonly encountered in model calibration, and the
//! [`LevenbergMarquardtFactory`] that plugs it into calibrations through the
//! [`OptimizerFactory`] contract.
//!
//! # Algorithm
//!
//! The Levenberg-Marquardt algorithm combines Gauss-Newton and gradient descent:
//!
//! ```text
//! (J^T J + λI) δ = -J^T r
//! p_{n+1} = Π(p_n + δ)
//! ```
//!
//! where:
//! - `J` is the finite-difference Jacobian of the residuals
//! - `r = f(p) - target` is the residual vector
//! - `λ` is the damping factor (adjusted during iteration)
//! - `Π` projects onto the parameter bounds
//!
//! Jacobian columns are independent objective evaluations and run on a
//! dedicated pool of `threads` workers.
//!
//! # Example
//!
//! ```
//! use pricer_core::math::solvers::{
//!     LMConfig, LevenbergMarquardtSolver, OptimizationProblem, Optimizer,
//! };
//! use pricer_core::types::SolverError;
//!
//! // Fit y = a * exp(-b * x) to data
//! let x_data = [0.0, 1.0, 2.0, 3.0];
//! let objective = |p: &[f64]| -> Result<Vec<f64>, SolverError> {
//!     Ok(x_data.iter().map(|&x| p[0] * (-p[1] * x).exp()).collect())
//! };
//! let targets: Vec<f64> = x_data.iter().map(|&x| 2.0 * (-0.5 * x).exp()).collect();
//!
//! let problem = OptimizationProblem::unconstrained(&objective, vec![1.0, 1.0], 1e-7, targets);
//! let mut solver = LevenbergMarquardtSolver::new(problem, LMConfig::default()).unwrap();
//! solver.run().unwrap();
//!
//! let best = solver.best_fit_parameters();
//! assert!((best[0] - 2.0).abs() < 1e-5);
//! assert!((best[1] - 0.5).abs() < 1e-5);
//! ```

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::trace;

use super::optimizer::{OptimizationProblem, Optimizer, OptimizerFactory};
use crate::types::SolverError;

/// Configuration for Levenberg-Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMConfig {
    /// Convergence tolerance on the root mean squared residual and on its
    /// improvement per accepted step.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor to increase lambda on rejected step.
    pub lambda_up: f64,
    /// Factor to decrease lambda on accepted step.
    pub lambda_down: f64,
    /// Minimum damping factor.
    pub min_lambda: f64,
    /// Maximum damping factor; reaching it ends the iteration.
    pub max_lambda: f64,
    /// Tolerance for parameter change convergence.
    pub param_tolerance: f64,
    /// Worker threads for Jacobian evaluation (1 = sequential).
    pub threads: usize,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 100,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-10,
            max_lambda: 1e10,
            param_tolerance: 1e-10,
            threads: 2,
        }
    }
}

impl LMConfig {
    /// Create a new LM configuration.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }

    /// Set the number of Jacobian worker threads.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }
}

/// Result of Levenberg-Marquardt optimization.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult {
    /// Final optimized parameters.
    pub params: Vec<f64>,
    /// Final residual sum of squares.
    pub residual_ss: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether convergence was achieved.
    pub converged: bool,
    /// Final lambda value.
    pub final_lambda: f64,
}

impl LMResult {
    /// Create a new LM result.
    pub fn new(
        params: Vec<f64>,
        residual_ss: f64,
        iterations: usize,
        converged: bool,
        final_lambda: f64,
    ) -> Self {
        Self {
            params,
            residual_ss,
            iterations,
            converged,
            final_lambda,
        }
    }
}

/// Levenberg-Marquardt nonlinear least-squares solver.
///
/// Solves problems of the form:
/// ```text
/// min_{lower <= p <= upper} ||f(p) - target||^2
/// ```
///
/// An empty parameter or target vector converges immediately at the
/// initial parameters. Running out of iterations is not an error.
pub struct LevenbergMarquardtSolver<'a> {
    config: LMConfig,
    problem: OptimizationProblem<'a>,
    pool: Option<ThreadPool>,
    result: LMResult,
}

impl<'a> LevenbergMarquardtSolver<'a> {
    /// Create a solver for `problem`.
    ///
    /// # Errors
    ///
    /// - `SolverError::DimensionMismatch` for inconsistent problem vectors
    /// - `SolverError::ExecutionFailure` if the worker pool cannot be built
    pub fn new(problem: OptimizationProblem<'a>, config: LMConfig) -> Result<Self, SolverError> {
        problem.validate()?;

        let pool = if config.threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(config.threads)
                .thread_name(|i| format!("lm-jacobian-{i}"))
                .build()
                .map_err(|e| SolverError::ExecutionFailure(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        let initial = project(&problem, &problem.initial_parameters);
        let result = LMResult::new(initial, f64::NAN, 0, false, config.initial_lambda);

        Ok(Self {
            config,
            problem,
            pool,
            result,
        })
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Summary of the last run.
    pub fn result(&self) -> &LMResult {
        &self.result
    }

    fn rmse(&self, ss: f64) -> f64 {
        match self.problem.target_values.len() {
            0 => 0.0,
            n => (ss / n as f64).sqrt(),
        }
    }

    fn jacobian(&self, params: &[f64], r0: &[f64]) -> Result<Vec<Vec<f64>>, SolverError> {
        compute_jacobian(&self.problem, self.pool.as_ref(), params, r0)
    }
}

impl Optimizer for LevenbergMarquardtSolver<'_> {
    fn run(&mut self) -> Result<(), SolverError> {
        let n_params = self.problem.initial_parameters.len();
        let n_residuals = self.problem.target_values.len();
        let mut params = self.result.params.clone();

        if n_params == 0 || n_residuals == 0 {
            let ss = if n_residuals == 0 {
                0.0
            } else {
                sum_of_squares(&residuals(&self.problem, &params)?)
            };
            self.result = LMResult::new(params, ss, 0, true, self.config.initial_lambda);
            return Ok(());
        }

        let mut r = residuals(&self.problem, &params)?;
        if r.iter().any(|x| !x.is_finite()) {
            return Err(SolverError::NumericalInstability(
                "objective is not finite at the initial parameters".to_string(),
            ));
        }
        let mut ss = sum_of_squares(&r);
        let mut lambda = self.config.initial_lambda;
        let mut jacobian: Option<Vec<Vec<f64>>> = None;
        let mut converged = false;
        let mut iterations = 0;

        while iterations < self.config.max_iterations {
            // Check convergence on residual
            if self.rmse(ss) < self.config.tolerance {
                converged = true;
                break;
            }
            iterations += 1;

            // Only recompute the Jacobian after the parameters moved
            let j = match jacobian.take() {
                Some(j) => j,
                None => self.jacobian(&params, &r)?,
            };

            let delta = solve_normal_equations(&j, &r, lambda, n_params);
            jacobian = Some(j);
            let delta = match delta {
                Some(d) => d,
                None => {
                    lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
                    if lambda >= self.config.max_lambda {
                        break;
                    }
                    continue;
                }
            };

            // Check for parameter change convergence
            let param_change = delta.iter().map(|d| d * d).sum::<f64>().sqrt();
            let param_norm = params.iter().map(|p| p * p).sum::<f64>().sqrt().max(1.0);
            if param_change / param_norm < self.config.param_tolerance {
                converged = true;
                break;
            }

            // Trial update
            let stepped: Vec<f64> = params.iter().zip(&delta).map(|(p, d)| p + d).collect();
            let trial = project(&self.problem, &stepped);
            let trial_r = residuals(&self.problem, &trial)?;
            let trial_ss = sum_of_squares(&trial_r);

            if trial_ss.is_finite() && trial_ss < ss {
                // Accept step
                let improvement = self.rmse(ss) - self.rmse(trial_ss);
                params = trial;
                r = trial_r;
                ss = trial_ss;
                jacobian = None;
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
                trace!(iterations, rmse = self.rmse(ss), lambda, "step accepted");

                if improvement < self.config.tolerance {
                    converged = true;
                    break;
                }
            } else {
                // Reject step, increase lambda
                lambda = (lambda * self.config.lambda_up).min(self.config.max_lambda);
                trace!(iterations, lambda, "step rejected");
                if lambda >= self.config.max_lambda {
                    break;
                }
            }
        }

        self.result = LMResult::new(params, ss, iterations, converged, lambda);
        Ok(())
    }

    fn best_fit_parameters(&self) -> &[f64] {
        &self.result.params
    }

    fn iterations(&self) -> usize {
        self.result.iterations
    }

    fn root_mean_squared_error(&self) -> f64 {
        self.rmse(self.result.residual_ss)
    }
}

/// Creates [`LevenbergMarquardtSolver`]s with a fixed configuration.
///
/// # Example
///
/// ```
/// use pricer_core::math::solvers::{LevenbergMarquardtFactory, OptimizationProblem, OptimizerFactory};
/// use pricer_core::types::SolverError;
///
/// let objective = |p: &[f64]| -> Result<Vec<f64>, SolverError> { Ok(vec![p[0] * p[0]]) };
/// let factory = LevenbergMarquardtFactory::new(400, 1e-7, 2);
/// let problem = OptimizationProblem::unconstrained(&objective, vec![1.0], 1e-6, vec![4.0]);
///
/// let mut optimizer = factory.optimizer(problem).unwrap();
/// optimizer.run().unwrap();
/// assert!((optimizer.best_fit_parameters()[0] - 2.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevenbergMarquardtFactory {
    config: LMConfig,
}

impl LevenbergMarquardtFactory {
    /// Factory with the given iteration cap, accuracy and Jacobian threads.
    pub fn new(max_iterations: usize, accuracy: f64, threads: usize) -> Self {
        Self {
            config: LMConfig::new(accuracy, max_iterations).with_threads(threads),
        }
    }

    /// Factory with a full solver configuration.
    pub fn with_config(config: LMConfig) -> Self {
        Self { config }
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }
}

impl OptimizerFactory for LevenbergMarquardtFactory {
    fn optimizer<'a>(
        &self,
        problem: OptimizationProblem<'a>,
    ) -> Result<Box<dyn Optimizer + 'a>, SolverError> {
        Ok(Box::new(LevenbergMarquardtSolver::new(problem, self.config)?))
    }
}

/// Evaluate `f(p) - target`.
fn residuals(problem: &OptimizationProblem<'_>, params: &[f64]) -> Result<Vec<f64>, SolverError> {
    let values = problem.objective.values(params)?;
    if values.len() != problem.target_values.len() {
        return Err(SolverError::DimensionMismatch {
            name: "objective values",
            expected: problem.target_values.len(),
            got: values.len(),
        });
    }
    Ok(values
        .iter()
        .zip(&problem.target_values)
        .map(|(v, t)| v - t)
        .collect())
}

/// Clamp parameters into `[lower, upper]`.
fn project(problem: &OptimizationProblem<'_>, params: &[f64]) -> Vec<f64> {
    params
        .iter()
        .zip(problem.lower_bound.iter().zip(&problem.upper_bound))
        .map(|(&p, (&lo, &hi))| p.max(lo).min(hi))
        .collect()
}

/// Compute the Jacobian matrix (rows = residuals) by forward differences.
///
/// A step that would leave the upper bound is taken backwards instead.
/// Non-finite difference quotients are recorded as zero sensitivity.
fn compute_jacobian(
    problem: &OptimizationProblem<'_>,
    pool: Option<&ThreadPool>,
    params: &[f64],
    r0: &[f64],
) -> Result<Vec<Vec<f64>>, SolverError> {
    let n_params = params.len();
    let n_residuals = r0.len();

    let column = |j: usize| -> Result<Vec<f64>, SolverError> {
        let mut h = problem.parameter_step[j];
        if h <= 0.0 || !h.is_finite() {
            h = 1e-8 * params[j].abs().max(1.0);
        }
        if params[j] + h > problem.upper_bound[j] {
            h = -h;
        }

        let mut params_shifted = params.to_vec();
        params_shifted[j] += h;
        let r_shifted = residuals(problem, &params_shifted)?;

        Ok(r_shifted
            .iter()
            .zip(r0)
            .map(|(rs, r)| {
                let derivative = (rs - r) / h;
                if derivative.is_finite() {
                    derivative
                } else {
                    0.0
                }
            })
            .collect())
    };

    let columns: Vec<Vec<f64>> = match pool {
        Some(pool) => pool.install(|| {
            (0..n_params)
                .into_par_iter()
                .map(column)
                .collect::<Result<Vec<_>, _>>()
        })?,
        None => (0..n_params).map(column).collect::<Result<Vec<_>, _>>()?,
    };

    let mut jacobian = vec![vec![0.0; n_params]; n_residuals];
    for (j, col) in columns.iter().enumerate() {
        for i in 0..n_residuals {
            jacobian[i][j] = col[i];
        }
    }
    Ok(jacobian)
}

/// Solve the normal equations (J^T J + λI) δ = -J^T r
fn solve_normal_equations(
    jacobian: &[Vec<f64>],
    residuals: &[f64],
    lambda: f64,
    n_params: usize,
) -> Option<Vec<f64>> {
    let n_residuals = residuals.len();

    // Compute J^T J
    let mut jtj = vec![vec![0.0; n_params]; n_params];
    for i in 0..n_params {
        for j in 0..n_params {
            let mut sum = 0.0;
            for k in 0..n_residuals {
                sum += jacobian[k][i] * jacobian[k][j];
            }
            jtj[i][j] = sum;
        }
    }

    // Add λI to diagonal
    for (i, row) in jtj.iter_mut().enumerate() {
        row[i] += lambda;
    }

    // Compute -J^T r
    let mut jtr = vec![0.0; n_params];
    for (i, value) in jtr.iter_mut().enumerate() {
        let mut sum = 0.0;
        for k in 0..n_residuals {
            sum += jacobian[k][i] * residuals[k];
        }
        *value = -sum;
    }

    // Solve using Cholesky decomposition (since J^T J + λI is positive definite)
    solve_cholesky(&jtj, &jtr)
}

/// Compute sum of squares of a vector.
#[inline]
fn sum_of_squares(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}

/// Solve Ax = b using Cholesky decomposition.
fn solve_cholesky(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // Cholesky decomposition: A = L L^T
    let mut l = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }

            if i == j {
                if sum <= 0.0 || !sum.is_finite() {
                    return None; // Not positive definite
                }
                l[i][j] = sum.sqrt();
            } else {
                if l[j][j].abs() < 1e-30 {
                    return None;
                }
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Solve L y = b (forward substitution)
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Solve L^T x = y (backward substitution)
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
