//! Boundaries on a parameter space.
//!
//! A driver checks every asked point against its boundaries and answers
//! out-of-bounds points with [`Evaluation::rejected`](crate::sampler::Evaluation::rejected)
//! instead of evaluating the target there.

use std::fmt::Debug;

use num_traits::Float;
use rand::Rng;
use rand_distr::uniform::SampleUniform;

use crate::distributions::LogDensity;
use crate::error::SamplerError;

/// A region of parameter space.
pub trait Boundaries<T> {
    /// Returns `true` if and only if `parameters` lies within the boundaries.
    fn check(&self, parameters: &[T]) -> bool;

    /// Dimension of the parameter space the boundaries are defined on, `None` if
    /// points of any dimension can be checked.
    fn n_parameters(&self) -> Option<usize>;

    /// Draws `n` points from within the boundaries, if supported.
    fn sample(&self, _n: usize, _rng: &mut dyn rand::RngCore) -> Option<Vec<Vec<T>>> {
        None
    }
}

/// Independent lower and upper bounds per parameter. A point `x` is within the
/// boundaries iff `lower <= x < upper` component-wise.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangularBoundaries<T> {
    lower: Vec<T>,
    upper: Vec<T>,
}

impl<T: Float + Debug> RectangularBoundaries<T> {
    pub fn new(lower: &[T], upper: &[T]) -> Result<Self, SamplerError> {
        if lower.len() != upper.len() {
            return Err(SamplerError::InvalidArgument(
                "lower and upper bounds must have same length".to_string(),
            ));
        }
        if lower.is_empty() {
            return Err(SamplerError::InvalidArgument(
                "the parameter space must have a dimension > 0".to_string(),
            ));
        }
        if lower.iter().zip(upper).any(|(&l, &u)| !(u > l)) {
            return Err(SamplerError::InvalidArgument(format!(
                "upper bounds must exceed lower bounds, got {lower:?} and {upper:?}"
            )));
        }
        Ok(Self {
            lower: lower.to_vec(),
            upper: upper.to_vec(),
        })
    }

    pub fn lower(&self) -> &[T] {
        &self.lower
    }

    pub fn upper(&self) -> &[T] {
        &self.upper
    }

    /// The size of the box, `upper - lower`.
    pub fn range(&self) -> Vec<T> {
        self.upper
            .iter()
            .zip(&self.lower)
            .map(|(&u, &l)| u - l)
            .collect()
    }
}

impl<T: Float + SampleUniform> Boundaries<T> for RectangularBoundaries<T> {
    fn check(&self, parameters: &[T]) -> bool {
        parameters.len() == self.lower.len()
            && parameters
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(&x, (&l, &u))| x >= l && x < u)
    }

    fn n_parameters(&self) -> Option<usize> {
        Some(self.lower.len())
    }

    fn sample(&self, n: usize, rng: &mut dyn rand::RngCore) -> Option<Vec<Vec<T>>> {
        let points = (0..n)
            .map(|_| {
                self.lower
                    .iter()
                    .zip(&self.upper)
                    .map(|(&l, &u)| rng.gen_range(l..u))
                    .collect()
            })
            .collect();
        Some(points)
    }
}

/// Uses a log-density as boundaries: a point is within bounds iff its log-density
/// exceeds `threshold`.
#[derive(Debug, Clone)]
pub struct LogPdfBoundaries<D, T> {
    log_pdf: D,
    threshold: T,
}

impl<D: LogDensity<T>, T: Float> LogPdfBoundaries<D, T> {
    /// Bounds at `threshold = -inf`, i.e. every point with non-zero density.
    pub fn new(log_pdf: D) -> Self {
        Self::with_threshold(log_pdf, T::neg_infinity())
    }

    pub fn with_threshold(log_pdf: D, threshold: T) -> Self {
        Self {
            log_pdf,
            threshold,
        }
    }
}

impl<D: LogDensity<T>, T: Float> Boundaries<T> for LogPdfBoundaries<D, T> {
    fn check(&self, parameters: &[T]) -> bool {
        self.log_pdf.log_pdf(parameters) > self.threshold
    }

    fn n_parameters(&self) -> Option<usize> {
        self.log_pdf.n_parameters()
    }
}
