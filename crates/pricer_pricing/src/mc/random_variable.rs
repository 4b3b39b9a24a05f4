//! Pathwise random variables.

/// Values of a random quantity, one per simulated path.
///
/// # Example
///
/// ```
/// use pricer_pricing::mc::RandomVariable;
///
/// let x = RandomVariable::new(vec![1.0, 2.0, 3.0, 6.0]);
/// assert_eq!(x.average(), 3.0);
/// assert_eq!(x.map(|v| v * 2.0).average(), 6.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RandomVariable {
    values: Vec<f64>,
}

impl RandomVariable {
    /// Wrap pathwise values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// The same value on `number_of_paths` paths.
    pub fn constant(value: f64, number_of_paths: usize) -> Self {
        Self::new(vec![value; number_of_paths])
    }

    /// Number of paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Pathwise values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Sample mean; zero when empty.
    pub fn average(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    /// Sample variance (population); zero when empty.
    pub fn variance(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let mean = self.average();
        self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / self.values.len() as f64
    }

    /// Standard error of the sample mean.
    pub fn standard_error(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        (self.variance() / self.values.len() as f64).sqrt()
    }

    /// Apply `f` pathwise.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(self.values.iter().map(|&v| f(v)).collect())
    }

    /// Combine two random variables pathwise.
    ///
    /// # Panics
    ///
    /// Panics if the path counts differ.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        assert_eq!(self.len(), other.len(), "path counts differ");
        Self::new(
            self.values
                .iter()
                .zip(&other.values)
                .map(|(&x, &y)| f(x, y))
                .collect(),
        )
    }

    /// Pathwise product.
    pub fn mult(&self, other: &Self) -> Self {
        self.zip_with(other, |x, y| x * y)
    }
}

impl From<Vec<f64>> for RandomVariable {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}
