//! Numerical methods.
//!
//! - [`solvers`]: Optimiser contract and the Levenberg-Marquardt solver

pub mod solvers;
