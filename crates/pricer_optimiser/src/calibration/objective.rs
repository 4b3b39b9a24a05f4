//! Objective function of a volatility calibration.
//!
//! Each evaluation rebuilds the volatility model from the trial parameters,
//! substitutes it into the short-rate model, re-simulates on the shared
//! Brownian motion and values every calibration product:
//!
//! ```text
//! residual_k = weight_k * (E[value_k] - target_k)
//! ```
//!
//! A product whose valuation fails, by error or by panic, contributes a zero
//! residual. A valuation task that does not complete fails the whole
//! evaluation.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use pricer_core::math::solvers::ObjectiveFunction;
use pricer_core::types::{PricingError, SolverError};
use pricer_models::models::rates::ShortRateModel;
use pricer_models::models::volatility::{ParametricVolatilityModel, VolatilityModelSubstitution};
use pricer_pricing::mc::{BrownianMotion, ShortRateSimulation};
use tracing::{debug, warn};

use super::executor::{panic_message, ValuationExecutor};
use super::product::CalibrationProduct;

/// Products are valued at time zero.
const EVALUATION_TIME: f64 = 0.0;

/// Residuals of calibration products as a function of volatility parameters.
pub struct CalibrationObjective<'a, V, M> {
    volatility_model: &'a Arc<V>,
    model: &'a M,
    products: &'a [CalibrationProduct],
    brownian_motion: &'a BrownianMotion,
    executor: &'a ValuationExecutor,
}

impl<'a, V, M> CalibrationObjective<'a, V, M>
where
    V: ParametricVolatilityModel,
    M: VolatilityModelSubstitution<V> + ShortRateModel,
{
    /// Create the objective.
    ///
    /// # Arguments
    ///
    /// * `volatility_model` - Model cloned with every trial parameter vector
    /// * `model` - Short-rate model receiving the trial volatility model
    /// * `products` - Calibration products, in residual order
    /// * `brownian_motion` - Randomness shared by all evaluations
    /// * `executor` - Strategy for valuing the products
    pub fn new(
        volatility_model: &'a Arc<V>,
        model: &'a M,
        products: &'a [CalibrationProduct],
        brownian_motion: &'a BrownianMotion,
        executor: &'a ValuationExecutor,
    ) -> Self {
        Self {
            volatility_model,
            model,
            products,
            brownian_motion,
            executor,
        }
    }

    /// Residual vector for `parameters`, one entry per product in input order.
    ///
    /// # Errors
    ///
    /// `SolverError::ObjectiveFailure` if the trial model cannot be simulated
    /// or the executor loses a valuation task.
    pub fn residuals(&self, parameters: &[f64]) -> Result<Vec<f64>, SolverError> {
        let volatility_model = Arc::clone(self.volatility_model).with_parameters(parameters);
        let model = self.model.with_volatility_model(volatility_model);
        let simulation = ShortRateSimulation::new(&model, self.brownian_motion)
            .map_err(|e| SolverError::ObjectiveFailure(e.to_string()))?;

        let outcomes = self
            .executor
            .execute(self.products.len(), |index| {
                let product = &self.products[index];
                panic::catch_unwind(AssertUnwindSafe(|| {
                    product.product().value(EVALUATION_TIME, &simulation)
                }))
                .map_err(|payload| {
                    PricingError::ModelFailure(format!(
                        "valuation panicked: {}",
                        panic_message(payload.as_ref())
                    ))
                })
                .and_then(|outcome| outcome)
                .map(|value| product.weight() * (value.average() - product.target_value()))
            })
            .map_err(|e| SolverError::ObjectiveFailure(e.to_string()))?;

        let mut failed = 0;
        let residuals = outcomes
            .into_iter()
            .enumerate()
            .map(|(index, outcome)| match outcome {
                Ok(residual) => residual,
                Err(error) => {
                    failed += 1;
                    warn!(product = index, %error, "valuation failed, residual set to zero");
                    0.0
                }
            })
            .collect();

        debug!(products = self.products.len(), failed, ?parameters, "objective evaluated");
        Ok(residuals)
    }
}

impl<V, M> ObjectiveFunction for CalibrationObjective<'_, V, M>
where
    V: ParametricVolatilityModel,
    M: VolatilityModelSubstitution<V> + ShortRateModel,
{
    fn values(&self, parameters: &[f64]) -> Result<Vec<f64>, SolverError> {
        self.residuals(parameters)
    }
}
