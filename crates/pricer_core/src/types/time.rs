//! Time discretisations for simulation and tenor grids.
//!
//! A [`TimeDiscretization`] is an immutable, strictly increasing vector of
//! year fractions. It is reference counted so that the many model instances
//! created during a calibration share one allocation.

use std::sync::Arc;

use crate::market_data::MarketDataError;

/// Tolerance used when matching a time against a grid point.
pub const TIME_TOLERANCE: f64 = 1e-12;

/// Strictly increasing sequence of times `t_0 < t_1 < ... < t_n`.
///
/// # Example
///
/// ```
/// use pricer_core::types::TimeDiscretization;
///
/// let grid = TimeDiscretization::from_uniform(0.0, 4, 0.5).unwrap();
/// assert_eq!(grid.len(), 5);
/// assert_eq!(grid.number_of_time_steps(), 4);
/// assert_eq!(grid.time(4), 2.0);
/// assert_eq!(grid.time_index(1.5), Some(3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeDiscretization {
    times: Arc<[f64]>,
}

impl TimeDiscretization {
    /// Create a discretisation from explicit times.
    ///
    /// # Errors
    ///
    /// Returns [`MarketDataError::InsufficientData`] for an empty vector and
    /// [`MarketDataError::InvalidTimeGrid`] if a time is not finite or the
    /// sequence is not strictly increasing.
    pub fn new(times: Vec<f64>) -> Result<Self, MarketDataError> {
        if times.is_empty() {
            return Err(MarketDataError::InsufficientData { got: 0, need: 1 });
        }
        for (index, t) in times.iter().enumerate() {
            if !t.is_finite() {
                return Err(MarketDataError::InvalidTimeGrid {
                    index,
                    reason: "time is not finite".to_string(),
                });
            }
            if index > 0 && *t <= times[index - 1] {
                return Err(MarketDataError::InvalidTimeGrid {
                    index,
                    reason: "times must be strictly increasing".to_string(),
                });
            }
        }
        Ok(Self {
            times: times.into(),
        })
    }

    /// Create `steps + 1` equidistant times starting at `start`.
    pub fn from_uniform(start: f64, steps: usize, dt: f64) -> Result<Self, MarketDataError> {
        Self::new((0..=steps).map(|i| start + i as f64 * dt).collect())
    }

    /// Number of time points.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false: construction rejects empty grids.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of intervals `[t_i, t_{i+1})`.
    #[inline]
    pub fn number_of_time_steps(&self) -> usize {
        self.times.len() - 1
    }

    /// The `index`-th time.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn time(&self, index: usize) -> f64 {
        self.times[index]
    }

    /// Length of the interval `[t_index, t_{index+1})`.
    #[inline]
    pub fn time_step(&self, index: usize) -> f64 {
        self.times[index + 1] - self.times[index]
    }

    /// All times as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.times
    }

    /// Index of the grid point equal to `t`, if any.
    pub fn time_index(&self, t: f64) -> Option<usize> {
        let index = self.index_not_after(t)?;
        ((self.times[index] - t).abs() <= TIME_TOLERANCE).then_some(index)
    }

    /// Index of the last grid point `t_i <= t`, if any.
    pub fn index_not_after(&self, t: f64) -> Option<usize> {
        let upper = self.times.partition_point(|&s| s <= t + TIME_TOLERANCE);
        upper.checked_sub(1)
    }

    /// Index of the first grid point strictly after `t`, if any.
    pub fn index_after(&self, t: f64) -> Option<usize> {
        let index = self.times.partition_point(|&s| s <= t + TIME_TOLERANCE);
        (index < self.times.len()).then_some(index)
    }
}
