//! Parametric caplet volatility curve.
//!
//! The curve is generated by the instantaneous volatility
//! ```text
//! σ(τ) = (a + b τ) exp(-c τ) + d
//! ```
//! as a function of time to maturity τ. The terminal (Black-76, lognormal
//! quoting) caplet volatility is the root mean square of σ over [0, τ]:
//! ```text
//! σ_Black(τ)² τ = ∫₀^τ σ(s)² ds
//! ```
//! The integral is evaluated in closed form.

/// Below this value of `k τ` the exponential moments are summed as a Taylor
/// series; the closed form loses digits to cancellation there.
const SERIES_THRESHOLD: f64 = 0.1;

/// Number of Taylor terms used below [`SERIES_THRESHOLD`].
const SERIES_TERMS: usize = 10;

/// Four-parameter caplet volatility curve.
///
/// # Parameters
///
/// - `a`: initial volatility level
/// - `b`: slope at the short end
/// - `c`: exponential decay in time to maturity
/// - `d`: long term level (if c > 0)
///
/// # Example
///
/// ```
/// use pricer_core::market_data::surfaces::ParametricCapletVolatilities;
///
/// let curve = ParametricCapletVolatilities::new(0.25, 0.0, 0.0, 0.0);
/// assert!((curve.volatility(3.0) - 0.25).abs() < 1e-14);
/// assert!((curve.integrated_variance(2.0) - 0.125).abs() < 1e-14);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParametricCapletVolatilities {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl ParametricCapletVolatilities {
    /// Create the curve from its four parameters.
    #[inline]
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Parameters as `[a, b, c, d]`.
    #[inline]
    pub fn parameters(&self) -> [f64; 4] {
        [self.a, self.b, self.c, self.d]
    }

    /// Instantaneous volatility `σ(τ)` at time to maturity `tau`.
    #[inline]
    pub fn instantaneous_volatility(&self, tau: f64) -> f64 {
        (self.a + self.b * tau) * (-self.c * tau).exp() + self.d
    }

    /// Integrated variance `∫₀^τ σ(s)² ds`; zero for `tau <= 0`.
    pub fn integrated_variance(&self, tau: f64) -> f64 {
        if tau <= 0.0 {
            return 0.0;
        }
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);

        // (a + b s)² e^{-2cs} + 2d (a + b s) e^{-cs} + d²
        let variance = a * a * exponential_moment(0, 2.0 * c, tau)
            + 2.0 * a * b * exponential_moment(1, 2.0 * c, tau)
            + b * b * exponential_moment(2, 2.0 * c, tau)
            + 2.0 * d * (a * exponential_moment(0, c, tau) + b * exponential_moment(1, c, tau))
            + d * d * tau;

        variance.max(0.0)
    }

    /// Black-76 caplet volatility for time to maturity `tau`; zero for `tau <= 0`.
    pub fn volatility(&self, tau: f64) -> f64 {
        if tau <= 0.0 {
            return 0.0;
        }
        (self.integrated_variance(tau) / tau).sqrt()
    }
}

/// `∫₀^τ sⁿ exp(-k s) ds` for `n ∈ {0, 1, 2}`.
fn exponential_moment(n: u32, k: f64, tau: f64) -> f64 {
    let x = k * tau;
    if x.abs() < SERIES_THRESHOLD {
        // τ^{n+1} Σ_m (-x)^m / (m! (n + m + 1))
        let mut sum = 0.0;
        let mut coefficient = 1.0;
        for m in 0..SERIES_TERMS {
            sum += coefficient / (n as usize + m + 1) as f64;
            coefficient *= -x / (m + 1) as f64;
        }
        return sum * tau.powi(n as i32 + 1);
    }

    let decay = (-x).exp();
    match n {
        0 => (1.0 - decay) / k,
        1 => (1.0 - decay * (1.0 + x)) / (k * k),
        _ => (2.0 - decay * (x * x + 2.0 * x + 2.0)) / (k * k * k),
    }
}
