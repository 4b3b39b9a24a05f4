//! Monte Carlo simulation of the short rate.
//!
//! # Architecture
//!
//! ```text
//! ShortRateSimulation
//! ├── HullWhiteModel<V>  (mean reversion, r(0), volatility model)
//! └── BrownianMotion     (seeded, lazily generated increments)
//!     └── PricerRng
//! ```
//!
//! A [`BrownianMotion`] is built once and shared; every call to
//! [`ShortRateSimulation::new`] re-simulates the model on the same increments.

pub mod brownian;
pub mod error;
pub mod random_variable;
pub mod simulation;

pub use brownian::{BrownianMotion, MAX_PATHS};
pub use error::ConfigError;
pub use random_variable::RandomVariable;
pub use simulation::ShortRateSimulation;
