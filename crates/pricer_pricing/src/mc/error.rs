//! Error types for Monte Carlo simulation setup.

use std::fmt;

/// Configuration error for Monte Carlo simulations.
///
/// These errors occur during construction when invalid parameters are provided.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Path count outside valid range [1, 10_000_000].
    InvalidPathCount(usize),
    /// Factor count of zero.
    InvalidFactorCount(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPathCount(count) => {
                write!(
                    f,
                    "Invalid path count {}: must be in range [1, 10_000_000]",
                    count
                )
            }
            Self::InvalidFactorCount(count) => {
                write!(f, "Invalid factor count {}: must be at least 1", count)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
