//! Chain-level abstractions: stepping a chain, collecting its samples, and running
//! several independent chains in parallel.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ndarray::Array2;
use num_traits::Zero;
use rayon::prelude::*;

use crate::error::SamplerError;
use crate::sampler::{format_log_fields, Loggable};

pub trait MarkovChain<S>: Loggable {
    /// Does one iteration of the chain, returning the new current state.
    fn step(&mut self) -> Result<&[S], SamplerError>;

    /// Get the current state without stepping.
    fn current_state(&self) -> &[S];
}

/// Runs `chain` for `n_steps` and returns the visited states as rows of a
/// `[n_steps, dim]` matrix.
pub fn run_chain<S, M>(chain: &mut M, n_steps: usize) -> Result<Array2<S>, SamplerError>
where
    M: MarkovChain<S>,
    S: Clone + Zero,
{
    let dim = chain.current_state().len();
    let mut out = Array2::<S>::zeros((n_steps, dim));

    for mut row in out.rows_mut() {
        let state = chain.step()?;
        row.iter_mut().zip(state).for_each(|(o, s)| *o = s.clone());
    }

    Ok(out)
}

/// Like [`run_chain`], but advances `pb` after each step and shows the chain's
/// [`Loggable`] fields as the progress message.
pub fn run_chain_with_progress<S, M>(
    chain: &mut M,
    n_steps: usize,
    pb: &ProgressBar,
) -> Result<Array2<S>, SamplerError>
where
    M: MarkovChain<S>,
    S: Clone + Zero,
{
    let dim = chain.current_state().len();
    let mut out = Array2::<S>::zeros((n_steps, dim));

    pb.set_length(n_steps as u64);

    for (i, mut row) in out.rows_mut().into_iter().enumerate() {
        let state = chain.step()?;
        row.iter_mut().zip(state).for_each(|(o, s)| *o = s.clone());

        if i % 50 == 0 || i + 1 == n_steps {
            pb.set_message(format_log_fields(&*chain));
        }
        pb.inc(1);
    }

    Ok(out)
}

/// A trait for "anything that owns multiple MarkovChains".
/// - `S` is the state element type (e.g. f64).
/// - `Chain` is the MarkovChain type stored by this struct.
pub trait HasChains<S> {
    type Chain: MarkovChain<S> + std::marker::Send;

    /// Returns a mutable reference to the vector of chains.
    fn chains_mut(&mut self) -> &mut Vec<Self::Chain>;
}

pub trait ChainRunner<S>: HasChains<S>
where
    S: Clone + Zero + Send,
{
    /// Runs the chains in parallel, returning one `[n_steps, dim]` matrix per chain.
    fn run(&mut self, n_steps: usize) -> Result<Vec<Array2<S>>, SamplerError> {
        self.chains_mut()
            .par_iter_mut()
            .map(|chain| run_chain(chain, n_steps))
            .collect()
    }

    /// Runs the chains in parallel, with one progress bar per chain.
    fn run_with_progress(&mut self, n_steps: usize) -> Result<Vec<Array2<S>>, SamplerError> {
        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        self.chains_mut()
            .par_iter_mut()
            .enumerate()
            .map(|(i, chain)| {
                let pb = multi.add(ProgressBar::new(n_steps as u64));
                pb.set_prefix(format!("Chain {i}"));
                pb.set_style(pb_style.clone());

                let samples = run_chain_with_progress(chain, n_steps, &pb);

                pb.finish();
                samples
            })
            .collect()
    }
}

impl<S: Clone + Zero + Send, T: HasChains<S>> ChainRunner<S> for T {}
