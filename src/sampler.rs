/*!
# Ask–tell sampler protocol

A single-chain sampler never evaluates the target density itself. An external
driver repeatedly

1. calls [`AskTellSampler::ask`] to get the next point to score,
2. evaluates the log-density there (and its gradient, if
   [`AskTellSampler::needs_sensitivities`] says so),
3. hands the result back through [`AskTellSampler::tell`], which advances the
   chain and returns its current point.

The first `ask` hands out the user-supplied starting point. Calling `ask` again
before `tell` returns the same pending point. Calling `tell` without a pending
point is a [`SamplerError::InvalidCall`].

```rust
use langevin_mcmc::distributions::{GradientLogDensity, IsotropicGaussian};
use langevin_mcmc::mala::Mala;
use langevin_mcmc::sampler::{AskTellSampler, Evaluation};

let target = IsotropicGaussian::new(1.0);
let mut sampler = Mala::new(&[0.5, -0.5], None).unwrap().set_seed(7);
for _ in 0..100 {
    let (log_pdf, gradient) = target.log_pdf_and_gradient(sampler.ask());
    let current = sampler
        .tell(Evaluation::with_gradient(log_pdf, gradient))
        .unwrap();
    assert!(current.is_some());
}
assert_eq!(sampler.iterations(), 100);
```
*/

use num_traits::Float;

use crate::error::SamplerError;

/// The externally computed score for the most recently asked point.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation<T> {
    /// Log-density of the target at the asked point.
    pub log_pdf: T,
    /// Gradient of the log-density at the asked point, if computed.
    pub gradient: Option<Vec<T>>,
}

impl<T> Evaluation<T> {
    /// A bare score, for samplers that do not need sensitivities.
    pub fn new(log_pdf: T) -> Self {
        Self {
            log_pdf,
            gradient: None,
        }
    }

    /// A score together with the gradient of the log-density.
    pub fn with_gradient(log_pdf: T, gradient: Vec<T>) -> Self {
        Self {
            log_pdf,
            gradient: Some(gradient),
        }
    }
}

impl<T: Float> Evaluation<T> {
    /// A zero-probability reply for a point the driver refused to evaluate,
    /// e.g. because it lies outside the parameter boundaries.
    pub fn rejected(n_parameters: usize) -> Self {
        Self::with_gradient(T::neg_infinity(), vec![T::zero(); n_parameters])
    }
}

/// The lifecycle every single-chain sampler obeys.
pub trait AskTellSampler<T> {
    /// Returns the point the driver should evaluate next.
    ///
    /// Repeated calls without an intervening [`tell`](Self::tell) return the
    /// same point.
    fn ask(&mut self) -> &[T];

    /// Feeds back the evaluation of the point returned by the last `ask`.
    ///
    /// Returns the chain's current point, or `None` if the sampler produced no
    /// sample on this iteration.
    fn tell(&mut self, reply: Evaluation<T>) -> Result<Option<&[T]>, SamplerError>;

    /// Whether `tell` expects a gradient alongside the score.
    fn needs_sensitivities(&self) -> bool;

    /// A human-readable name of the algorithm.
    fn name(&self) -> &'static str;

    /// Dimension of the parameter space, fixed at construction.
    fn n_parameters(&self) -> usize;

    /// The chain's current point, `None` before the first `tell`.
    fn current(&self) -> Option<&[T]>;

    /// Log-density of the current point, `None` before the first `tell`.
    fn current_log_pdf(&self) -> Option<T>;
}

/// Introspection hook for tabular progress output.
pub trait Loggable {
    /// Column names with their current values.
    fn log_fields(&self) -> Vec<(&'static str, f64)>;
}

/// Renders [`Loggable::log_fields`] as a single display line.
pub fn format_log_fields<L: Loggable + ?Sized>(item: &L) -> String {
    item.log_fields()
        .iter()
        .map(|(name, value)| format!("{name} {value:.3}"))
        .collect::<Vec<_>>()
        .join(" | ")
}
