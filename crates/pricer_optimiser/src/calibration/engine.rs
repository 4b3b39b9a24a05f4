//! Calibration engine.
//!
//! Fits the parameters of a volatility model so that a short-rate model
//! using it reproduces the target values of a set of calibration products.
//!
//! # Algorithm
//!
//! 1. Read the initial parameters; a non-calibrateable model is returned as is
//! 2. Build unconstrained bounds, the finite-difference steps and a zero
//!    target vector (targets are folded into the residuals)
//! 3. Let the optimiser drive the [`CalibrationObjective`] residuals to zero
//! 4. Clone the volatility model with the best-fit parameters
//!
//! The valuation worker pool lives for the duration of one call and is shut
//! down on every exit path.

use std::sync::Arc;

use pricer_core::math::solvers::{LevenbergMarquardtFactory, OptimizationProblem, OptimizerFactory};
use pricer_models::models::rates::ShortRateModel;
use pricer_models::models::volatility::{ParametricVolatilityModel, VolatilityModelSubstitution};
use pricer_pricing::mc::BrownianMotion;
use tracing::info;

use super::config::{CalibrationConfig, DEFAULT_OPTIMIZER_THREADS};
use super::error::CalibrationError;
use super::executor::ValuationExecutor;
use super::objective::CalibrationObjective;
use super::product::CalibrationProduct;
use super::result::CalibrationResult;

/// Volatility model calibration engine.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pricer_core::market_data::curves::FlatCurve;
/// use pricer_core::types::TimeDiscretization;
/// use pricer_models::models::{FourParameterExponentialVolatility, HullWhiteModel};
/// use pricer_optimiser::calibration::{CalibrationConfig, CalibrationEngine};
///
/// let grid = TimeDiscretization::from_uniform(0.0, 4, 0.5).unwrap();
/// let volatility = Arc::new(FourParameterExponentialVolatility::new(
///     grid.clone(), grid, 0.01, 0.0, 0.0, 0.0, true,
/// ));
/// let model = HullWhiteModel::new(FlatCurve::new(0.03), 0.1, volatility.clone()).unwrap();
///
/// // Without products the initial parameters are already optimal
/// let engine = CalibrationEngine::new(CalibrationConfig::default().with_number_of_paths(100));
/// let result = engine.calibrate(&volatility, &model, &[]).unwrap();
/// assert_eq!(result.iterations, 0);
/// assert_eq!(result.parameters, vec![0.01, 0.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CalibrationEngine {
    config: CalibrationConfig,
}

impl CalibrationEngine {
    /// Create an engine.
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Create an engine with the default configuration.
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Get the configuration.
    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    /// Calibrate `volatility_model` inside `model` to `products`.
    ///
    /// # Arguments
    ///
    /// * `volatility_model` - Model whose parameters are fitted
    /// * `model` - Short-rate model the trial volatility models are substituted into
    /// * `products` - Calibration products
    ///
    /// # Returns
    ///
    /// The best-fit parameters, the iteration count and the calibrated model.
    /// A non-calibrateable model is returned as the same `Arc` without running
    /// the optimiser.
    ///
    /// # Errors
    ///
    /// - `CalibrationError::InvalidConfig` for an inconsistent configuration or
    ///   a negative or non-finite product weight
    /// - `CalibrationError::ExecutorBuild` if the worker pool cannot be created
    /// - `CalibrationError::Solver` if the optimiser fails
    pub fn calibrate<V, M>(
        &self,
        volatility_model: &Arc<V>,
        model: &M,
        products: &[CalibrationProduct],
    ) -> Result<CalibrationResult<V>, CalibrationError>
    where
        V: ParametricVolatilityModel,
        M: VolatilityModelSubstitution<V> + ShortRateModel,
    {
        let config = &self.config;

        let Some(initial_parameters) = volatility_model.parameters() else {
            info!("volatility model is not calibrateable, returned unchanged");
            return Ok(CalibrationResult::unchanged(Arc::clone(volatility_model)));
        };
        config.validate()?;
        if let Some((index, product)) = products
            .iter()
            .enumerate()
            .find(|(_, product)| !(product.weight().is_finite() && product.weight() >= 0.0))
        {
            return Err(CalibrationError::InvalidConfig(format!(
                "weight of product {} must be finite and non-negative, got {}",
                index,
                product.weight()
            )));
        }

        let brownian_motion = match &config.brownian_motion {
            Some(brownian_motion) => Arc::clone(brownian_motion),
            None => Arc::new(
                BrownianMotion::new(
                    model.time_discretization().clone(),
                    1,
                    config.number_of_paths,
                    config.seed,
                )
                .map_err(|e| CalibrationError::InvalidConfig(e.to_string()))?,
            ),
        };
        if brownian_motion.time_discretization() != model.time_discretization() {
            return Err(CalibrationError::InvalidConfig(
                "Brownian motion time grid differs from the model time grid".to_string(),
            ));
        }

        let executor = ValuationExecutor::from_threads(config.valuation_threads)
            .map_err(|e| CalibrationError::ExecutorBuild(e.to_string()))?;
        let objective = CalibrationObjective::new(
            volatility_model,
            model,
            products,
            &brownian_motion,
            &executor,
        );

        let factory: Arc<dyn OptimizerFactory> = match &config.optimizer_factory {
            Some(factory) => Arc::clone(factory),
            None => Arc::new(LevenbergMarquardtFactory::new(
                config.max_iterations,
                config.accuracy,
                DEFAULT_OPTIMIZER_THREADS,
            )),
        };

        let n = initial_parameters.len();
        let problem = OptimizationProblem {
            objective: &objective,
            initial_parameters,
            lower_bound: vec![f64::NEG_INFINITY; n],
            upper_bound: vec![f64::INFINITY; n],
            parameter_step: vec![config.parameter_step; n],
            target_values: vec![0.0; products.len()],
        };

        let mut optimizer = factory.optimizer(problem)?;
        optimizer.run()?;

        let parameters = optimizer.best_fit_parameters().to_vec();
        let iterations = optimizer.iterations();
        let root_mean_squared_error = optimizer.root_mean_squared_error();
        let calibrated = Arc::clone(volatility_model).with_parameters(&parameters);

        info!(
            iterations,
            root_mean_squared_error,
            ?parameters,
            "calibration finished"
        );

        Ok(CalibrationResult {
            parameters,
            iterations,
            root_mean_squared_error,
            model: calibrated,
        })
    }
}

/// Calibrate with an explicit configuration.
///
/// Shorthand for `CalibrationEngine::new(config.clone()).calibrate(..)`.
///
/// # Errors
///
/// See [`CalibrationEngine::calibrate`].
pub fn calibrate<V, M>(
    volatility_model: &Arc<V>,
    model: &M,
    products: &[CalibrationProduct],
    config: &CalibrationConfig,
) -> Result<CalibrationResult<V>, CalibrationError>
where
    V: ParametricVolatilityModel,
    M: VolatilityModelSubstitution<V> + ShortRateModel,
{
    CalibrationEngine::new(config.clone()).calibrate(volatility_model, model, products)
}
