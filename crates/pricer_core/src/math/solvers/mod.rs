//! Optimisation solvers for model calibration.
//!
//! ## Contract
//!
//! Calibrations talk to optimisers only through the traits in this module:
//!
//! - [`ObjectiveFunction`]: vector-valued function to fit
//! - [`OptimizationProblem`]: objective, initial guess, bounds, steps and targets
//! - [`Optimizer`]: runs the fit and reports the best parameters
//! - [`OptimizerFactory`]: builds an optimiser for a problem
//!
//! ## Available Solvers
//!
//! - [`LevenbergMarquardtSolver`]: Nonlinear least-squares with a parallel
//!   finite-difference Jacobian, created by [`LevenbergMarquardtFactory`]
//!
//! ## Examples
//!
//! ```
//! use pricer_core::math::solvers::{
//!     LevenbergMarquardtFactory, OptimizationProblem, OptimizerFactory,
//! };
//! use pricer_core::types::SolverError;
//!
//! // Fit p0 + p1 to 3 and p0 - p1 to 1
//! let objective = |p: &[f64]| -> Result<Vec<f64>, SolverError> {
//!     Ok(vec![p[0] + p[1], p[0] - p[1]])
//! };
//! let problem = OptimizationProblem::unconstrained(&objective, vec![0.0, 0.0], 1e-6, vec![3.0, 1.0]);
//!
//! let mut optimizer = LevenbergMarquardtFactory::new(100, 1e-10, 1)
//!     .optimizer(problem)
//!     .unwrap();
//! optimizer.run().unwrap();
//!
//! let best = optimizer.best_fit_parameters();
//! assert!((best[0] - 2.0).abs() < 1e-6);
//! assert!((best[1] - 1.0).abs() < 1e-6);
//! ```

mod levenberg_marquardt;
mod optimizer;

pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtFactory, LevenbergMarquardtSolver};
pub use optimizer::{ObjectiveFunction, OptimizationProblem, Optimizer, OptimizerFactory};
