/*!
Target densities that a driver can evaluate on behalf of an ask–tell sampler.

The samplers in this crate never call these traits themselves; a driver such as
[`crate::chain::AskTellChain`] evaluates the asked point and feeds the result back.
Any closed-form, finite-difference or autodiff implementation can stand behind the
traits.

# Examples

```rust
use langevin_mcmc::distributions::{Gaussian2D, GradientLogDensity, LogDensity};

let gauss = Gaussian2D::new([0.0, 0.0], [[1.0, 0.0], [0.0, 1.0]]).unwrap();
let (log_pdf, gradient) = gauss.log_pdf_and_gradient(&[0.5, -0.5]);
assert_eq!(log_pdf, gauss.log_pdf(&[0.5, -0.5]));
assert_eq!(gradient, vec![-0.5, 0.5]);
```
*/

use num_traits::Float;

use crate::error::SamplerError;

/// An (unnormalised) log-density over an `n_parameters`-dimensional space.
pub trait LogDensity<T> {
    /// Dimension of the parameter space, `None` if the density accepts points of
    /// any dimension.
    fn n_parameters(&self) -> Option<usize>;

    /// Returns the log of the unnormalised density at `theta`.
    fn log_pdf(&self, theta: &[T]) -> T;
}

/// A log-density that can also report its gradient with respect to the parameters.
pub trait GradientLogDensity<T>: LogDensity<T> {
    /// Returns the log-density at `theta` together with its gradient.
    fn log_pdf_and_gradient(&self, theta: &[T]) -> (T, Vec<T>);
}

/**
An isotropic Gaussian centred at the origin with standard deviation `std` in every
dimension. The dimension is taken from the evaluated point.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotropicGaussian<T> {
    pub std: T,
    dim: Option<usize>,
}

impl<T: Float> IsotropicGaussian<T> {
    /// Creates an isotropic Gaussian of any dimension.
    pub fn new(std: T) -> Self {
        Self { std, dim: None }
    }

    /// Fixes the dimension reported by [`LogDensity::n_parameters`].
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = Some(dim);
        self
    }
}

impl<T: Float> LogDensity<T> for IsotropicGaussian<T> {
    fn n_parameters(&self) -> Option<usize> {
        self.dim
    }

    fn log_pdf(&self, theta: &[T]) -> T {
        let half = T::one() / (T::one() + T::one());
        let sum = theta.iter().fold(T::zero(), |acc, &x| acc + x * x);
        -half * sum / (self.std * self.std)
    }
}

impl<T: Float> GradientLogDensity<T> for IsotropicGaussian<T> {
    fn log_pdf_and_gradient(&self, theta: &[T]) -> (T, Vec<T>) {
        let var = self.std * self.std;
        let gradient = theta.iter().map(|&x| -x / var).collect();
        (self.log_pdf(theta), gradient)
    }
}

/**
A 2D Gaussian distribution parameterized by a mean vector and a 2×2 covariance matrix.

The precision matrix is computed once at construction.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian2D<T> {
    pub mean: [T; 2],
    cov: [[T; 2]; 2],
    precision: [[T; 2]; 2],
}

impl<T: Float> Gaussian2D<T> {
    /// Creates the distribution, failing unless `cov` is symmetric positive-definite.
    pub fn new(mean: [T; 2], cov: [[T; 2]; 2]) -> Result<Self, SamplerError> {
        let [[a, b], [c, d]] = cov;
        let det = a * d - b * c;
        if b != c || !(a > T::zero()) || !(det > T::zero()) {
            return Err(SamplerError::InvalidArgument(
                "covariance must be symmetric positive-definite".to_string(),
            ));
        }
        let precision = [[d / det, -b / det], [-c / det, a / det]];
        Ok(Self {
            mean,
            cov,
            precision,
        })
    }

    pub fn cov(&self) -> [[T; 2]; 2] {
        self.cov
    }

    fn precision_times_diff(&self, theta: &[T]) -> ([T; 2], [T; 2]) {
        let diff = [theta[0] - self.mean[0], theta[1] - self.mean[1]];
        let p = self.precision;
        let pd = [
            p[0][0] * diff[0] + p[0][1] * diff[1],
            p[1][0] * diff[0] + p[1][1] * diff[1],
        ];
        (diff, pd)
    }
}

impl<T: Float> LogDensity<T> for Gaussian2D<T> {
    fn n_parameters(&self) -> Option<usize> {
        Some(2)
    }

    fn log_pdf(&self, theta: &[T]) -> T {
        let (diff, pd) = self.precision_times_diff(theta);
        let half = T::one() / (T::one() + T::one());
        -half * (diff[0] * pd[0] + diff[1] * pd[1])
    }
}

impl<T: Float> GradientLogDensity<T> for Gaussian2D<T> {
    fn log_pdf_and_gradient(&self, theta: &[T]) -> (T, Vec<T>) {
        let (diff, pd) = self.precision_times_diff(theta);
        let half = T::one() / (T::one() + T::one());
        let log_pdf = -half * (diff[0] * pd[0] + diff[1] * pd[1]);
        (log_pdf, vec![-pd[0], -pd[1]])
    }
}

/**
The 2D Rosenbrock banana, `-((a - x)^2 + b (y - x^2)^2)`, scaled by `1 / temperature`.

A common stress test for gradient-based samplers: the mass concentrates along a
curved ridge.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rosenbrock2D<T> {
    pub a: T,
    pub b: T,
    pub temperature: T,
}

impl<T: Float> LogDensity<T> for Rosenbrock2D<T> {
    fn n_parameters(&self) -> Option<usize> {
        Some(2)
    }

    fn log_pdf(&self, theta: &[T]) -> T {
        let (x, y) = (theta[0], theta[1]);
        let r = y - x * x;
        -((self.a - x) * (self.a - x) + self.b * r * r) / self.temperature
    }
}

impl<T: Float> GradientLogDensity<T> for Rosenbrock2D<T> {
    fn log_pdf_and_gradient(&self, theta: &[T]) -> (T, Vec<T>) {
        let (x, y) = (theta[0], theta[1]);
        let two = T::one() + T::one();
        let r = y - x * x;
        let dx = (two * (self.a - x) + two * two * self.b * x * r) / self.temperature;
        let dy = -(two * self.b * r) / self.temperature;
        (self.log_pdf(theta), vec![dx, dy])
    }
}
