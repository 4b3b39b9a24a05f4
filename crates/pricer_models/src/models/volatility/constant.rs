//! Constant volatility model.

use std::sync::Arc;

use pricer_core::types::TimeDiscretization;

use super::{merge_parameters, ParametricVolatilityModel, VolatilityModel};

/// The same volatility `sigma` on every grid cell.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::types::TimeDiscretization;
/// use pricer_models::models::volatility::{ConstantVolatility, ParametricVolatilityModel, VolatilityModel};
///
/// let grid = TimeDiscretization::from_uniform(0.0, 4, 0.25).unwrap();
/// let model = Arc::new(ConstantVolatility::new(grid.clone(), grid, 0.01, true));
/// assert_eq!(model.volatility(2, 3), 0.01);
/// assert_eq!(model.parameters(), Some(vec![0.01]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantVolatility {
    time_discretization: TimeDiscretization,
    tenor_discretization: TimeDiscretization,
    sigma: f64,
    is_calibrateable: bool,
}

impl ConstantVolatility {
    /// Create the model.
    pub fn new(
        time_discretization: TimeDiscretization,
        tenor_discretization: TimeDiscretization,
        sigma: f64,
        is_calibrateable: bool,
    ) -> Self {
        Self {
            time_discretization,
            tenor_discretization,
            sigma,
            is_calibrateable,
        }
    }

    /// The volatility level.
    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl VolatilityModel for ConstantVolatility {
    fn time_discretization(&self) -> &TimeDiscretization {
        &self.time_discretization
    }

    fn tenor_discretization(&self) -> &TimeDiscretization {
        &self.tenor_discretization
    }

    fn volatility(&self, _time_index: usize, _tenor_index: usize) -> f64 {
        self.sigma.max(0.0)
    }
}

impl ParametricVolatilityModel for ConstantVolatility {
    fn is_calibrateable(&self) -> bool {
        self.is_calibrateable
    }

    fn parameters(&self) -> Option<Vec<f64>> {
        self.is_calibrateable.then(|| vec![self.sigma])
    }

    fn with_parameters(self: Arc<Self>, parameters: &[f64]) -> Arc<Self> {
        if !self.is_calibrateable {
            return self;
        }
        match merge_parameters([self.sigma], parameters) {
            Some([sigma]) => Arc::new(Self {
                sigma,
                ..(*self).clone()
            }),
            None => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(is_calibrateable: bool) -> Arc<ConstantVolatility> {
        let grid = TimeDiscretization::from_uniform(0.0, 4, 0.5).unwrap();
        Arc::new(ConstantVolatility::new(grid.clone(), grid, 0.02, is_calibrateable))
    }

    #[test]
    fn test_volatility_is_flat() {
        let m = model(true);
        assert_eq!(m.volatility(0, 0), 0.02);
        assert_eq!(m.volatility(3, 4), 0.02);
    }

    #[test]
    fn test_negative_sigma_floored() {
        let grid = TimeDiscretization::from_uniform(0.0, 2, 0.5).unwrap();
        let m = ConstantVolatility::new(grid.clone(), grid, -0.01, true);
        assert_eq!(m.volatility(0, 0), 0.0);
    }

    #[test]
    fn test_with_parameters() {
        let m = model(true);
        let bumped = m.clone().with_parameters(&[0.03]);
        assert_eq!(bumped.sigma(), 0.03);
        assert_eq!(m.sigma(), 0.02);
        assert!(Arc::ptr_eq(&m, &m.clone().with_parameters(&[0.02])));
    }

    #[test]
    fn test_not_calibrateable() {
        let m = model(false);
        assert_eq!(m.parameters(), None);
        assert!(Arc::ptr_eq(&m, &m.clone().with_parameters(&[0.5])));
    }
}
