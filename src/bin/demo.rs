//! A small MCMC demo running several MALA chains on the Rosenbrock banana and
//! printing summary statistics.

use langevin_mcmc::boundaries::RectangularBoundaries;
use langevin_mcmc::chain::MalaChains;
use langevin_mcmc::core::ChainRunner;
use langevin_mcmc::distributions::Rosenbrock2D;
use ndarray::{concatenate, Axis};
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const ITERATIONS: usize = 20_000;
    const N_CHAINS: usize = 4;
    const SEED: u64 = 42;

    let target = Rosenbrock2D {
        a: 1.0,
        b: 100.0,
        temperature: 20.0,
    };
    let bounds = RectangularBoundaries::new(&[-5.0, -5.0], &[5.0, 30.0])?;

    let mut chains = MalaChains::new(target, &[0.0, 0.0], None, N_CHAINS)?
        .set_seed(SEED)
        .with_boundaries(bounds)?;
    chains.set_step_size(0.15)?;

    let samples = chains.run_with_progress(ITERATIONS)?;
    let views: Vec<_> = samples.iter().map(|s| s.view()).collect();
    let stacked = concatenate(Axis(0), &views)?;
    println!("Generated {} samples", stacked.nrows());

    if let Some(mean) = stacked.mean_axis(Axis(0)) {
        println!("Mean: ({:.2}, {:.2})", mean[0], mean[1]);
    }
    for (i, rate) in chains.acceptance_rates().iter().enumerate() {
        println!("Chain {i}: acceptance rate {rate:.3}");
    }
    Ok(())
}
