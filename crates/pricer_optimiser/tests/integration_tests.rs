//! Integration tests for volatility model calibration.
//!
//! Targets are produced by valuing the products under a known volatility on
//! the same Brownian motion the calibration uses, so the true parameters
//! reproduce them exactly.

use std::sync::Arc;

use approx::assert_relative_eq;
use pricer_core::market_data::curves::FlatCurve;
use pricer_core::math::solvers::{OptimizationProblem, Optimizer, OptimizerFactory};
use pricer_core::types::{PricingError, SolverError, TimeDiscretization};
use pricer_models::models::{
    ConstantVolatility, FourParameterExponentialVolatility, HullWhiteModel,
};
use pricer_optimiser::calibration::{
    calibrate, CalibrationConfig, CalibrationEngine, CalibrationError, CalibrationObjective,
    CalibrationProduct, ValuationExecutor,
};
use pricer_pricing::mc::{BrownianMotion, RandomVariable, ShortRateSimulation};
use pricer_pricing::products::{ShortRateOption, Valuable, ZeroCouponBond};

const PATHS: usize = 1000;
const SEED: u64 = 2718;
const STRIKE: f64 = 0.03;

fn grid() -> TimeDiscretization {
    TimeDiscretization::from_uniform(0.0, 12, 0.25).unwrap()
}

fn brownian_motion() -> BrownianMotion {
    BrownianMotion::new(grid(), 1, PATHS, SEED).unwrap()
}

fn config() -> CalibrationConfig {
    CalibrationConfig::default()
        .with_number_of_paths(PATHS)
        .with_seed(SEED)
}

fn constant(sigma: f64, is_calibrateable: bool) -> Arc<ConstantVolatility> {
    Arc::new(ConstantVolatility::new(grid(), grid(), sigma, is_calibrateable))
}

fn hull_white<V>(volatility: &Arc<V>) -> HullWhiteModel<V>
where
    V: pricer_models::models::VolatilityModel,
{
    HullWhiteModel::new(FlatCurve::new(0.03), 0.1, Arc::clone(volatility)).unwrap()
}

fn options() -> Vec<Arc<dyn Valuable>> {
    [1.0, 2.0, 3.0]
        .into_iter()
        .map(|t| Arc::new(ShortRateOption::new(t, STRIKE)) as Arc<dyn Valuable>)
        .collect()
}

/// Price `products` under `model` and use the prices as targets.
fn products_priced_by<V>(model: &HullWhiteModel<V>, products: Vec<Arc<dyn Valuable>>) -> Vec<CalibrationProduct>
where
    V: pricer_models::models::VolatilityModel,
{
    let simulation = ShortRateSimulation::new(model, &brownian_motion()).unwrap();
    products
        .into_iter()
        .map(|product| {
            let target = product.value(0.0, &simulation).unwrap().average();
            CalibrationProduct::new(product, target, 1.0)
        })
        .collect()
}

#[derive(Debug)]
struct FailingFactory;

impl OptimizerFactory for FailingFactory {
    fn optimizer<'a>(
        &self,
        _problem: OptimizationProblem<'a>,
    ) -> Result<Box<dyn Optimizer + 'a>, SolverError> {
        Err(SolverError::ExecutionFailure("no optimiser available".to_string()))
    }
}

/// Reads past the end of the simulation grid, which panics.
struct BeyondGridProduct;

impl Valuable for BeyondGridProduct {
    fn value(
        &self,
        _evaluation_time: f64,
        simulation: &ShortRateSimulation,
    ) -> Result<RandomVariable, PricingError> {
        Ok(simulation.discount_factor(10_000).clone())
    }
}

// ============================================================================
// End-to-End Calibration
// ============================================================================

#[test]
fn test_recovers_constant_volatility() {
    let truth = constant(0.01, true);
    let products = products_priced_by(&hull_white(&truth), options());

    let initial = constant(0.005, true);
    let result = calibrate(&initial, &hull_white(&initial), &products, &config()).unwrap();

    assert!(result.iterations > 0);
    assert_relative_eq!(result.model.sigma(), 0.01, max_relative = 1e-3);
    assert_eq!(result.parameters, vec![result.model.sigma()]);
    assert!(result.root_mean_squared_error < 1e-6);
    // The input model is untouched
    assert_eq!(initial.sigma(), 0.005);
}

#[test]
fn test_four_parameter_model_improves_fit() {
    let truth = Arc::new(FourParameterExponentialVolatility::new(
        grid(),
        grid(),
        0.01,
        0.0,
        0.0,
        0.0,
        true,
    ));
    let products = products_priced_by(&hull_white(&truth), options());

    let initial = Arc::new(FourParameterExponentialVolatility::new(
        grid(),
        grid(),
        0.006,
        0.0,
        0.0,
        0.0,
        true,
    ));
    let model = hull_white(&initial);

    let brownian = brownian_motion();
    let executor = ValuationExecutor::inline();
    let objective = CalibrationObjective::new(&initial, &model, &products, &brownian, &executor);
    let start = objective.residuals(&[0.006, 0.0, 0.0, 0.0]).unwrap();
    let start_rmse = (start.iter().map(|r| r * r).sum::<f64>() / start.len() as f64).sqrt();

    let result = calibrate(&initial, &model, &products, &config()).unwrap();

    assert_eq!(result.parameters.len(), 4);
    assert!(result.root_mean_squared_error < start_rmse);
    assert!(!Arc::ptr_eq(&result.model, &initial));
}

#[test]
fn test_no_products_returns_initial_parameters() {
    let initial = constant(0.02, true);
    let result = calibrate(&initial, &hull_white(&initial), &[], &config()).unwrap();

    assert_eq!(result.iterations, 0);
    assert_eq!(result.parameters, vec![0.02]);
    assert_eq!(result.model.sigma(), 0.02);
}

#[test]
fn test_non_calibrateable_model_is_returned_unchanged() {
    let initial = constant(0.02, false);
    let products = products_priced_by(&hull_white(&constant(0.01, true)), options());

    let result = calibrate(&initial, &hull_white(&initial), &products, &config()).unwrap();

    assert!(Arc::ptr_eq(&result.model, &initial));
    assert_eq!(result.iterations, 0);
    assert!(result.parameters.is_empty());
    assert!(result.root_mean_squared_error.is_nan());
}

// ============================================================================
// Fault Tolerance
// ============================================================================

#[test]
fn test_failing_product_contributes_zero_residual() {
    let truth = constant(0.01, true);
    let mut products = products_priced_by(&hull_white(&truth), options());
    // 1.1 is not on the quarterly grid
    products.insert(
        1,
        CalibrationProduct::new(Arc::new(ShortRateOption::new(1.1, STRIKE)), 0.5, 1.0),
    );

    let initial = constant(0.005, true);
    let model = hull_white(&initial);
    let brownian = brownian_motion();
    let executor = ValuationExecutor::inline();
    let objective = CalibrationObjective::new(&initial, &model, &products, &brownian, &executor);

    let residuals = objective.residuals(&[0.005]).unwrap();
    assert_eq!(residuals.len(), 4);
    assert_eq!(residuals[1], 0.0);
    assert!(residuals[0] < 0.0);

    let result = calibrate(&initial, &model, &products, &config()).unwrap();
    assert_relative_eq!(result.model.sigma(), 0.01, max_relative = 1e-3);

    // Zero at the best fit and away from it
    let bumped = vec![result.parameters[0] + 0.003];
    for parameters in [result.parameters.clone(), bumped] {
        let residuals = objective.residuals(&parameters).unwrap();
        assert_eq!(residuals[1], 0.0);
        assert!(residuals.iter().all(|r| r.is_finite()));
    }
}

#[test]
fn test_panicking_product_contributes_zero_residual() {
    let truth = constant(0.01, true);
    let mut products = products_priced_by(&hull_white(&truth), options());
    products.insert(1, CalibrationProduct::new(Arc::new(BeyondGridProduct), 0.02, 1.0));

    let initial = constant(0.005, true);
    let model = hull_white(&initial);
    let brownian = brownian_motion();

    for executor in [ValuationExecutor::inline(), ValuationExecutor::parallel(2).unwrap()] {
        let objective = CalibrationObjective::new(&initial, &model, &products, &brownian, &executor);
        for parameters in [[0.005], [0.02]] {
            let residuals = objective.residuals(&parameters).unwrap();
            assert_eq!(residuals.len(), 4);
            assert_eq!(residuals[1], 0.0);
        }
    }

    let result = calibrate(&initial, &model, &products, &config()).unwrap();
    assert_relative_eq!(result.model.sigma(), 0.01, max_relative = 1e-3);

    let parallel = calibrate(
        &initial,
        &model,
        &products,
        &config().with_valuation_threads(Some(3)),
    )
    .unwrap();
    assert_eq!(parallel.parameters, result.parameters);
}

#[test]
fn test_optimizer_failure_is_reported() {
    let initial = constant(0.01, true);
    let products = products_priced_by(&hull_white(&initial), options());
    let config = config().with_optimizer_factory(Arc::new(FailingFactory));

    let result = calibrate(&initial, &hull_white(&initial), &products, &config);

    assert!(matches!(
        result,
        Err(CalibrationError::Solver(SolverError::ExecutionFailure(_)))
    ));
}

#[test]
fn test_invalid_config_is_rejected() {
    let initial = constant(0.01, true);
    let products = products_priced_by(&hull_white(&initial), options());
    let config = config().with_number_of_paths(0);

    let result = calibrate(&initial, &hull_white(&initial), &products, &config);

    assert!(matches!(result, Err(CalibrationError::InvalidConfig(_))));
}

#[test]
fn test_invalid_weight_is_rejected() {
    let initial = constant(0.01, true);
    let option: Arc<dyn Valuable> = Arc::new(ShortRateOption::new(2.0, STRIKE));

    for weight in [-1.0, f64::NAN, f64::INFINITY] {
        let products = vec![
            CalibrationProduct::new(Arc::clone(&option), 0.003, 1.0),
            CalibrationProduct::new(Arc::clone(&option), 0.003, weight),
        ];
        let result = calibrate(&initial, &hull_white(&initial), &products, &config());
        match result {
            Err(CalibrationError::InvalidConfig(message)) => assert!(message.contains("product 1")),
            other => panic!("expected an invalid weight, got {:?}", other.map(|r| r.parameters)),
        }
    }
}

#[test]
fn test_brownian_motion_on_other_grid_is_rejected() {
    let initial = constant(0.01, true);
    let other_grid = TimeDiscretization::from_uniform(0.0, 6, 0.5).unwrap();
    let config = config().with_brownian_motion(Arc::new(
        BrownianMotion::new(other_grid, 1, PATHS, SEED).unwrap(),
    ));

    let result = calibrate(&initial, &hull_white(&initial), &[], &config);

    assert!(matches!(result, Err(CalibrationError::InvalidConfig(_))));
}

// ============================================================================
// Execution Strategy
// ============================================================================

#[test]
fn test_parallel_and_inline_valuation_agree() {
    let truth = constant(0.012, true);
    let mut targets = options();
    targets.push(Arc::new(ZeroCouponBond::new(2.0)));
    let products = products_priced_by(&hull_white(&truth), targets);

    let initial = constant(0.008, true);
    let model = hull_white(&initial);

    let inline = calibrate(&initial, &model, &products, &config()).unwrap();
    let parallel = calibrate(
        &initial,
        &model,
        &products,
        &config().with_valuation_threads(Some(4)),
    )
    .unwrap();

    assert_eq!(inline.parameters, parallel.parameters);
    assert_eq!(inline.iterations, parallel.iterations);
}

#[test]
fn test_shared_brownian_motion_matches_generated_one() {
    let truth = constant(0.01, true);
    let products = products_priced_by(&hull_white(&truth), options());
    let initial = constant(0.005, true);
    let model = hull_white(&initial);

    let generated = calibrate(&initial, &model, &products, &config()).unwrap();
    let shared = calibrate(
        &initial,
        &model,
        &products,
        &config().with_brownian_motion(Arc::new(brownian_motion())),
    )
    .unwrap();

    assert_eq!(generated.parameters, shared.parameters);
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_engine_from_toml_config() -> anyhow::Result<()> {
    let config = CalibrationConfig::from_toml_str(
        r#"
        number_of_paths = 1000
        seed = 2718
        max_iterations = 50
        valuation_threads = 2
        "#,
    )?;
    let engine = CalibrationEngine::new(config);
    assert_eq!(engine.config().max_iterations, 50);

    let truth = constant(0.01, true);
    let products = products_priced_by(&hull_white(&truth), options());
    let initial = constant(0.005, true);
    let model = HullWhiteModel::new(FlatCurve::new(0.03), 0.1, Arc::clone(&initial))?;

    let result = engine.calibrate(&initial, &model, &products)?;
    assert!(result.iterations <= 50);
    assert_relative_eq!(result.model.sigma(), 0.01, max_relative = 1e-3);
    Ok(())
}

#[test]
fn test_weights_scale_residuals() {
    let initial = constant(0.005, true);
    let model = hull_white(&initial);
    let option: Arc<dyn Valuable> = Arc::new(ShortRateOption::new(2.0, STRIKE));
    let products = vec![
        CalibrationProduct::new(Arc::clone(&option), 0.01, 1.0),
        CalibrationProduct::new(option, 0.01, 3.0),
    ];
    let brownian = brownian_motion();
    let executor = ValuationExecutor::inline();
    let objective = CalibrationObjective::new(&initial, &model, &products, &brownian, &executor);

    let residuals = objective.residuals(&[0.005]).unwrap();
    assert_relative_eq!(residuals[1], 3.0 * residuals[0], max_relative = 1e-12);
}
