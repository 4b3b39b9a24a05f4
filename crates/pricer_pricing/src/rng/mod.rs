//! # Random Number Generation Infrastructure
//!
//! This module provides seeded random number generation for Monte Carlo
//! simulations.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: All generators are seeded for deterministic sequences
//! - **Efficiency**: Zero-allocation batch operations via `&mut [f64]` slices
//!
//! ## Module Structure
//!
//! - [`prng`]: Pseudo-random number generator wrapper with seed management
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut rng = PricerRng::from_seed(12345);
//! let mut normals = vec![0.0; 1000];
//! rng.fill_normal(&mut normals);
//! ```

pub mod prng;

pub use prng::PricerRng;
