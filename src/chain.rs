/*!
# Driving ask–tell samplers

[`AskTellChain`] is the simplest driver for an [`AskTellSampler`]: it evaluates
every asked point on a [`GradientLogDensity`] in the calling thread and feeds the
result straight back. Points outside the optional [`Boundaries`] are rejected
without evaluating the target.

[`MalaChains`] owns several independent MALA chains over a shared target so that
[`ChainRunner`](crate::core::ChainRunner) can run them in parallel. Each chain owns
its own random number generator; chain `i` is seeded with `seed + i`.

```rust
use langevin_mcmc::chain::MalaChains;
use langevin_mcmc::core::ChainRunner;
use langevin_mcmc::distributions::Gaussian2D;

let target = Gaussian2D::new([0.0, 0.0], [[1.0, 0.0], [0.0, 1.0]]).unwrap();
let mut chains = MalaChains::new(target, &[0.0, 0.0], None, 4)
    .unwrap()
    .set_seed(42);
chains.set_step_size(0.9).unwrap();

let samples = chains.run(500).unwrap();
assert_eq!(samples.len(), 4);
assert_eq!(samples[0].shape(), &[500, 2]);
```
*/

use std::fmt::Debug;

use log::debug;
use ndarray::Array2;
use num_traits::Float;
use rand_distr::{Distribution, StandardNormal};

use crate::boundaries::Boundaries;
use crate::core::{HasChains, MarkovChain};
use crate::distributions::GradientLogDensity;
use crate::error::SamplerError;
use crate::mala::Mala;
use crate::sampler::{AskTellSampler, Evaluation, Loggable};

/// A single chain that evaluates its sampler's requests in-line.
pub struct AskTellChain<S, D, T> {
    sampler: S,
    target: D,
    boundaries: Option<Box<dyn Boundaries<T> + Send>>,
    current: Vec<T>,
    out_of_bounds: u64,
}

impl<S, D, T> AskTellChain<S, D, T>
where
    S: AskTellSampler<T>,
    D: GradientLogDensity<T>,
    T: Float + Debug,
{
    /// Pairs `sampler` with `target`. The chain's state before the first step is
    /// the sampler's current point, or its starting point if it has not been told
    /// anything yet.
    ///
    /// Fails if `target` has a fixed dimension other than the sampler's.
    pub fn new(mut sampler: S, target: D) -> Result<Self, SamplerError> {
        check_dimension("target", target.n_parameters(), sampler.n_parameters())?;
        let current = match sampler.current().map(<[T]>::to_vec) {
            Some(current) => current,
            None => sampler.ask().to_vec(),
        };
        Ok(Self {
            sampler,
            target,
            boundaries: None,
            current,
            out_of_bounds: 0,
        })
    }

    /// Rejects every asked point outside `boundaries` without evaluating the target.
    ///
    /// Fails if `boundaries` have a fixed dimension other than the sampler's.
    pub fn with_boundaries<B>(mut self, boundaries: B) -> Result<Self, SamplerError>
    where
        B: Boundaries<T> + Send + 'static,
    {
        check_dimension(
            "boundaries",
            boundaries.n_parameters(),
            self.sampler.n_parameters(),
        )?;
        self.boundaries = Some(Box::new(boundaries));
        Ok(self)
    }

    pub fn sampler(&self) -> &S {
        &self.sampler
    }

    pub fn sampler_mut(&mut self) -> &mut S {
        &mut self.sampler
    }

    pub fn target(&self) -> &D {
        &self.target
    }

    /// Number of asked points rejected for lying outside the boundaries.
    pub fn out_of_bounds(&self) -> u64 {
        self.out_of_bounds
    }
}

fn check_dimension(what: &str, fixed: Option<usize>, expected: usize) -> Result<(), SamplerError> {
    match fixed {
        Some(n) if n != expected => Err(SamplerError::InvalidArgument(format!(
            "{what} has dimension {n}, but the sampler has {expected} parameters"
        ))),
        _ => Ok(()),
    }
}

impl<S, D, T> MarkovChain<T> for AskTellChain<S, D, T>
where
    S: AskTellSampler<T> + Loggable,
    D: GradientLogDensity<T>,
    T: Float + Debug,
{
    fn step(&mut self) -> Result<&[T], SamplerError> {
        let n_parameters = self.sampler.n_parameters();
        let needs_sensitivities = self.sampler.needs_sensitivities();
        let x = self.sampler.ask();

        let reply = match &self.boundaries {
            Some(boundaries) if !boundaries.check(x) => {
                debug!("point {x:?} is out of bounds, rejecting");
                self.out_of_bounds += 1;
                Evaluation::rejected(n_parameters)
            }
            _ if needs_sensitivities => {
                let (log_pdf, gradient) = self.target.log_pdf_and_gradient(x);
                Evaluation::with_gradient(log_pdf, gradient)
            }
            _ => Evaluation::new(self.target.log_pdf(x)),
        };

        if let Some(point) = self.sampler.tell(reply)? {
            self.current.clear();
            self.current.extend_from_slice(point);
        }
        Ok(&self.current)
    }

    fn current_state(&self) -> &[T] {
        &self.current
    }
}

impl<S: Loggable, D, T> Loggable for AskTellChain<S, D, T> {
    fn log_fields(&self) -> Vec<(&'static str, f64)> {
        self.sampler.log_fields()
    }
}

/// Independent MALA chains sharing one starting point and target.
pub struct MalaChains<D, T> {
    /// The chains, each with its own sampler and copy of the target.
    pub chains: Vec<AskTellChain<Mala<T>, D, T>>,
    /// The global random seed.
    pub seed: u64,
}

impl<D, T> MalaChains<D, T>
where
    D: GradientLogDensity<T> + Clone,
    T: Float + Debug,
    StandardNormal: Distribution<T>,
    rand_distr::Standard: Distribution<T>,
{
    /// Builds `n_chains` chains starting at `x0`, each with preconditioner `sigma0`.
    pub fn new(
        target: D,
        x0: &[T],
        sigma0: Option<Array2<T>>,
        n_chains: usize,
    ) -> Result<Self, SamplerError> {
        let sampler = Mala::new(x0, sigma0)?;
        let seed = sampler.seed();
        let chains = (0..n_chains)
            .map(|i| {
                let mut sampler = sampler.clone();
                sampler.reseed(seed.wrapping_add(i as u64));
                AskTellChain::new(sampler, target.clone())
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { chains, seed })
    }

    /// Sets a new global seed; chain `i` is reseeded with `seed + i`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        for (i, chain) in self.chains.iter_mut().enumerate() {
            chain.sampler_mut().reseed(seed.wrapping_add(i as u64));
        }
        self
    }

    /// Sets the scalar step size of every chain.
    pub fn set_step_size(&mut self, step_size: T) -> Result<(), SamplerError> {
        self.chains
            .iter_mut()
            .try_for_each(|chain| chain.sampler_mut().set_step_size(step_size))
    }

    /// Applies a copy of `boundaries` to every chain.
    pub fn with_boundaries<B>(mut self, boundaries: B) -> Result<Self, SamplerError>
    where
        B: Boundaries<T> + Clone + Send + 'static,
    {
        self.chains = self
            .chains
            .into_iter()
            .map(|chain| chain.with_boundaries(boundaries.clone()))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Per-chain acceptance rates.
    pub fn acceptance_rates(&self) -> Vec<f64> {
        self.chains
            .iter()
            .map(|chain| chain.sampler().acceptance_rate())
            .collect()
    }
}

impl<D, T> HasChains<T> for MalaChains<D, T>
where
    D: GradientLogDensity<T> + Send,
    T: Float + Debug + Send,
    StandardNormal: Distribution<T>,
    rand_distr::Standard: Distribution<T>,
{
    type Chain = AskTellChain<Mala<T>, D, T>;

    fn chains_mut(&mut self) -> &mut Vec<Self::Chain> {
        &mut self.chains
    }
}
