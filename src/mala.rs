/*!
# Metropolis-Adjusted Langevin Algorithm (MALA)

MALA simulates the Langevin diffusion

\[
d\Theta_t = \tfrac{1}{2} \nabla \log \pi(\Theta_t)\,dt + dW_t
\]

whose stationary distribution is the target \(\pi\), using a first-order Euler
step from the current point \(\theta_t\):

\[
\theta^* = \theta_t + \tfrac{\epsilon^2}{2} \nabla \log \pi(\theta_t) + \epsilon z,
\qquad z \sim \mathcal{N}(0, I).
\]

The discretisation error is corrected with a Metropolis–Hastings step using the
asymmetric proposal densities \(q(\theta^* \mid \theta_t)\) and
\(q(\theta_t \mid \theta^*)\):

\[
\log \alpha = \left[\log \pi(\theta^*) + \log q(\theta_t \mid \theta^*)\right]
            - \left[\log \pi(\theta_t) + \log q(\theta^* \mid \theta_t)\right].
\]

The step size \(\epsilon\) is a per-dimension vector: a scalar step size multiplied
by the diagonal of the preconditioning matrix `sigma0`.

See Girolami & Calderhead (2011), *Riemann manifold Langevin and Hamiltonian Monte
Carlo methods*, JRSS B 73(2).

The sampler never evaluates the target itself; it is driven through
[`AskTellSampler`]. See [`crate::sampler`] for the protocol.
*/

use std::f64::consts::PI;
use std::fmt::Debug;

use log::{debug, trace};
use ndarray::Array2;
use num_traits::Float;
use rand::prelude::*;
use rand_distr::StandardNormal;

use crate::error::SamplerError;
use crate::sampler::{AskTellSampler, Evaluation, Loggable};

/// Scalar step size used until [`Mala::set_step_size`] is called.
pub const DEFAULT_STEP_SIZE: f64 = 0.1;

fn cast<T: Float>(x: f64) -> T {
    T::from(x).expect("Expecting an f64 constant to be representable as a float.")
}

/// The last accepted point together with its score and gradient.
#[derive(Debug, Clone, PartialEq)]
struct Anchor<T> {
    position: Vec<T>,
    log_pdf: T,
    gradient: Vec<T>,
}

/// A candidate awaiting its score, with the log-density it was drawn with.
#[derive(Debug, Clone, PartialEq)]
struct Proposal<T> {
    position: Vec<T>,
    forward_q: T,
}

#[derive(Debug, Clone, PartialEq)]
enum State<T> {
    /// Nothing has been asked yet.
    Uninitialised,
    /// The starting point has been handed out and awaits its score.
    InitialPending,
    /// A current point exists and no proposal is outstanding.
    HasCurrent(Anchor<T>),
    /// A proposal has been handed out and awaits its score.
    ProposalPending {
        current: Anchor<T>,
        proposal: Proposal<T>,
    },
}

/// Mean of the Langevin proposal from `position`: `position + eps^2 / 2 * gradient`.
fn langevin_mean<T: Float>(position: &[T], gradient: &[T], step_size: &[T]) -> Vec<T> {
    let half: T = cast(0.5);
    position
        .iter()
        .zip(gradient)
        .zip(step_size)
        .map(|((&x, &g), &eps)| x + half * eps * eps * g)
        .collect()
}

/// Log-density of `x` under a normal with the given mean and diagonal standard deviations.
pub fn diagonal_normal_log_pdf<T: Float>(x: &[T], mean: &[T], std: &[T]) -> T {
    let half: T = cast(0.5);
    let log_two_pi: T = cast((2.0 * PI).ln());
    x.iter()
        .zip(mean)
        .zip(std)
        .fold(T::zero(), |acc, ((&xi, &mi), &si)| {
            let z = (xi - mi) / si;
            acc - half * z * z - si.ln() - half * log_two_pi
        })
}

/**
A single-chain MALA sampler.

# Examples

```rust
use langevin_mcmc::mala::Mala;
use langevin_mcmc::sampler::{AskTellSampler, Evaluation};

let mut mala = Mala::new(&[0.0], None).unwrap().set_seed(42);
assert_eq!(mala.ask(), &[0.0]);

let current = mala.tell(Evaluation::with_gradient(-0.5, vec![0.2])).unwrap();
assert_eq!(current, Some(&[0.0][..]));
assert_eq!(mala.acceptance_rate(), 1.0);

mala.ask();
let current = mala
    .tell(Evaluation::with_gradient(f64::NEG_INFINITY, vec![0.0]))
    .unwrap();
assert_eq!(current, Some(&[0.0][..]));
assert_eq!(mala.acceptance_rate(), 0.5);
```
*/
#[derive(Debug, Clone)]
pub struct Mala<T> {
    x0: Vec<T>,
    sigma0: Array2<T>,
    base_step_size: T,
    step_size: Vec<T>,
    state: State<T>,
    iterations: u64,
    acceptance: f64,
    seed: u64,
    rng: SmallRng,
}

impl<T> Mala<T>
where
    T: Float + Debug,
    StandardNormal: Distribution<T>,
    rand_distr::Standard: Distribution<T>,
{
    /**
    Creates a sampler starting at `x0`.

    `sigma0` is a symmetric positive-definite `n × n` preconditioning matrix whose
    diagonal scales the step size per dimension; it defaults to the identity.

    # Errors

    [`SamplerError::InvalidArgument`] if `x0` is empty or non-finite, or if `sigma0`
    does not have shape `n × n`, is not symmetric, or has a non-positive diagonal.
    */
    pub fn new(x0: &[T], sigma0: Option<Array2<T>>) -> Result<Self, SamplerError> {
        let n = x0.len();
        if n == 0 {
            return Err(SamplerError::InvalidArgument(
                "the parameter space must have a dimension > 0".to_string(),
            ));
        }
        if x0.iter().any(|x| !x.is_finite()) {
            return Err(SamplerError::InvalidArgument(format!(
                "initial point must be finite, got {x0:?}"
            )));
        }
        let sigma0 = match sigma0 {
            Some(sigma0) => {
                check_preconditioner(&sigma0, n)?;
                sigma0
            }
            None => Array2::eye(n),
        };

        let seed = thread_rng().gen::<u64>();
        let mut mala = Self {
            x0: x0.to_vec(),
            sigma0,
            base_step_size: T::zero(),
            step_size: Vec::new(),
            state: State::Uninitialised,
            iterations: 0,
            acceptance: 0.0,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        };
        mala.set_step_size(cast(DEFAULT_STEP_SIZE))?;
        Ok(mala)
    }

    /// Creates a sampler with a diagonal preconditioner built from `diagonal`.
    pub fn with_diagonal(x0: &[T], diagonal: &[T]) -> Result<Self, SamplerError> {
        if diagonal.len() != x0.len() {
            return Err(SamplerError::InvalidArgument(format!(
                "preconditioner diagonal has length {}, expected {}",
                diagonal.len(),
                x0.len()
            )));
        }
        let mut sigma0 = Array2::zeros((x0.len(), x0.len()));
        sigma0.diag_mut().iter_mut().zip(diagonal).for_each(|(d, &v)| *d = v);
        Self::new(x0, Some(sigma0))
    }

    /// Reseeds the sampler's random number generator.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.reseed(seed);
        self
    }

    /// In-place form of [`set_seed`](Self::set_seed).
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// The seed the random number generator was last seeded with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /**
    Sets the scalar step size. The per-dimension step size becomes
    `step_size * diag(sigma0)`.

    # Errors

    [`SamplerError::InvalidArgument`] unless `step_size` is finite and strictly positive.
    */
    pub fn set_step_size(&mut self, step_size: T) -> Result<(), SamplerError> {
        if !(step_size > T::zero()) || !step_size.is_finite() {
            return Err(SamplerError::InvalidArgument(format!(
                "step size must exceed 0, got {step_size:?}"
            )));
        }
        self.base_step_size = step_size;
        self.step_size = self.sigma0.diag().iter().map(|&d| step_size * d).collect();
        debug!("MALA step size set to {:?}", self.step_size);
        Ok(())
    }

    /// The per-dimension step size.
    pub fn step_size(&self) -> &[T] {
        &self.step_size
    }

    /// The scalar step size last passed to [`set_step_size`](Self::set_step_size).
    pub fn base_step_size(&self) -> T {
        self.base_step_size
    }

    /// The preconditioning matrix.
    pub fn preconditioner(&self) -> &Array2<T> {
        &self.sigma0
    }

    /// Running fraction of accepted proposals, in `[0, 1]`.
    pub fn acceptance_rate(&self) -> f64 {
        self.acceptance
    }

    /// Number of completed `tell` calls.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// The last accepted point, `None` before the first `tell`.
    pub fn current(&self) -> Option<&[T]> {
        match &self.state {
            State::HasCurrent(current) | State::ProposalPending { current, .. } => {
                Some(&current.position)
            }
            State::Uninitialised | State::InitialPending => None,
        }
    }

    /// Whether a point has been handed out and awaits `tell`.
    pub fn is_pending(&self) -> bool {
        matches!(
            self.state,
            State::InitialPending | State::ProposalPending { .. }
        )
    }

    fn propose(&mut self, current: &Anchor<T>) -> Proposal<T> {
        let forward_mean = langevin_mean(&current.position, &current.gradient, &self.step_size);
        let rng = &mut self.rng;
        let position: Vec<T> = forward_mean
            .iter()
            .zip(&self.step_size)
            .map(|(&mu, &eps)| mu + eps * rng.sample::<T, _>(StandardNormal))
            .collect();
        let forward_q = diagonal_normal_log_pdf(&position, &forward_mean, &self.step_size);
        Proposal {
            position,
            forward_q,
        }
    }

    fn log_acceptance_ratio(
        &self,
        current: &Anchor<T>,
        proposal: &Proposal<T>,
        log_pdf: T,
        gradient: &[T],
    ) -> T {
        let backward_mean = langevin_mean(&proposal.position, gradient, &self.step_size);
        let backward_q = diagonal_normal_log_pdf(&current.position, &backward_mean, &self.step_size);
        (log_pdf + backward_q) - (current.log_pdf + proposal.forward_q)
    }

    fn checked_gradient(&self, gradient: Option<Vec<T>>) -> Result<Vec<T>, SamplerError> {
        let gradient = gradient.ok_or_else(|| {
            SamplerError::InvalidArgument("MALA needs the log-pdf gradient in tell".to_string())
        })?;
        if gradient.len() != self.x0.len() {
            return Err(SamplerError::InvalidArgument(format!(
                "gradient has length {}, expected {}",
                gradient.len(),
                self.x0.len()
            )));
        }
        Ok(gradient)
    }

    fn record(&mut self, accepted: bool) {
        let n = self.iterations as f64;
        self.acceptance = (n * self.acceptance + if accepted { 1.0 } else { 0.0 }) / (n + 1.0);
        self.iterations += 1;
    }
}

fn check_preconditioner<T: Float + Debug>(sigma0: &Array2<T>, n: usize) -> Result<(), SamplerError> {
    if sigma0.dim() != (n, n) {
        return Err(SamplerError::InvalidArgument(format!(
            "preconditioner has shape {:?}, expected ({n}, {n})",
            sigma0.dim()
        )));
    }
    if sigma0.iter().any(|x| !x.is_finite()) {
        return Err(SamplerError::InvalidArgument(
            "preconditioner must be finite".to_string(),
        ));
    }
    if sigma0.diag().iter().any(|&d| d <= T::zero()) {
        return Err(SamplerError::InvalidArgument(format!(
            "preconditioner diagonal must be strictly positive, got {:?}",
            sigma0.diag()
        )));
    }
    let scale = sigma0.iter().fold(T::zero(), |m, &x| m.max(x.abs()));
    let tolerance = cast::<T>(4.0 * n as f64) * T::epsilon() * scale;
    for i in 0..n {
        for j in (i + 1)..n {
            if (sigma0[[i, j]] - sigma0[[j, i]]).abs() > tolerance {
                return Err(SamplerError::InvalidArgument(format!(
                    "preconditioner must be symmetric, entries ({i}, {j}) and ({j}, {i}) differ"
                )));
            }
        }
    }
    Ok(())
}

impl<T> AskTellSampler<T> for Mala<T>
where
    T: Float + Debug,
    StandardNormal: Distribution<T>,
    rand_distr::Standard: Distribution<T>,
{
    fn ask(&mut self) -> &[T] {
        match std::mem::replace(&mut self.state, State::Uninitialised) {
            State::Uninitialised => {
                debug!("{}: proposing initial point {:?}", self.name(), self.x0);
                self.state = State::InitialPending;
            }
            State::HasCurrent(current) => {
                let proposal = self.propose(&current);
                self.state = State::ProposalPending { current, proposal };
            }
            pending => self.state = pending,
        }
        match &self.state {
            State::ProposalPending { proposal, .. } => &proposal.position,
            _ => &self.x0,
        }
    }

    fn tell(&mut self, reply: Evaluation<T>) -> Result<Option<&[T]>, SamplerError> {
        let initial = match &self.state {
            State::InitialPending => true,
            State::ProposalPending { .. } => false,
            State::Uninitialised | State::HasCurrent(_) => return Err(SamplerError::InvalidCall),
        };
        let log_pdf = reply.log_pdf;
        let gradient = self.checked_gradient(reply.gradient)?;

        if initial {
            if !log_pdf.is_finite() {
                return Err(SamplerError::InvalidInitialPoint(format!(
                    "log_pdf = {log_pdf:?}"
                )));
            }
            if gradient.iter().any(|g| !g.is_finite()) {
                return Err(SamplerError::InvalidInitialPoint(format!(
                    "gradient = {gradient:?}"
                )));
            }
            debug!("{}: chain started with log_pdf {log_pdf:?}", self.name());
            self.state = State::HasCurrent(Anchor {
                position: self.x0.clone(),
                log_pdf,
                gradient,
            });
            self.record(true);
            return Ok(self.current());
        }

        let State::ProposalPending { current, proposal } =
            std::mem::replace(&mut self.state, State::Uninitialised)
        else {
            return Err(SamplerError::InvalidCall);
        };

        let accepted = if log_pdf.is_finite() {
            let log_alpha = self.log_acceptance_ratio(&current, &proposal, log_pdf, &gradient);
            let u: T = self.rng.gen();
            trace!("iteration {}: log alpha = {log_alpha:?}", self.iterations);
            u.ln() < log_alpha
        } else {
            trace!("iteration {}: non-finite log_pdf, rejecting", self.iterations);
            false
        };

        self.state = State::HasCurrent(if accepted {
            Anchor {
                position: proposal.position,
                log_pdf,
                gradient,
            }
        } else {
            current
        });
        self.record(accepted);
        Ok(self.current())
    }

    fn needs_sensitivities(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Metropolis-Adjusted Langevin Algorithm (MALA)"
    }

    fn n_parameters(&self) -> usize {
        self.x0.len()
    }

    fn current(&self) -> Option<&[T]> {
        Mala::current(self)
    }

    fn current_log_pdf(&self) -> Option<T> {
        match &self.state {
            State::HasCurrent(current) | State::ProposalPending { current, .. } => {
                Some(current.log_pdf)
            }
            State::Uninitialised | State::InitialPending => None,
        }
    }
}

impl<T> Loggable for Mala<T> {
    fn log_fields(&self) -> Vec<(&'static str, f64)> {
        vec![("Accept.", self.acceptance)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;

    fn standard_normal(x: &[f64]) -> Evaluation<f64> {
        let log_pdf = -0.5 * x.iter().map(|v| v * v).sum::<f64>();
        Evaluation::with_gradient(log_pdf, x.iter().map(|v| -v).collect())
    }

    #[test]
    fn one_dimensional_scenario() {
        let mut mala = Mala::new(&[0.0], None).unwrap().set_seed(42);
        assert_eq!(mala.ask(), &[0.0]);

        let current = mala
            .tell(Evaluation::with_gradient(-0.5, vec![0.2]))
            .unwrap()
            .map(|p| p.to_vec());
        assert_eq!(current, Some(vec![0.0]));
        assert_eq!(mala.acceptance_rate(), 1.0);
        assert_eq!(mala.iterations(), 1);
        assert_eq!(mala.current_log_pdf(), Some(-0.5));

        // Mean is 0.0 + 0.1^2 / 2 * 0.2, standard deviation 0.1.
        let candidate = mala.ask()[0];
        assert!((candidate - 0.001).abs() < 1.0, "candidate {candidate}");

        let current = mala
            .tell(Evaluation::with_gradient(f64::NEG_INFINITY, vec![0.0]))
            .unwrap()
            .map(|p| p.to_vec());
        assert_eq!(current, Some(vec![0.0]));
        assert_eq!(mala.acceptance_rate(), 0.5);
        assert_eq!(mala.iterations(), 2);
    }

    #[test]
    fn non_finite_initial_score_is_fatal() {
        for bad in [f64::NEG_INFINITY, f64::INFINITY, f64::NAN] {
            let mut mala = Mala::new(&[1.0, 2.0], None).unwrap();
            mala.ask();
            let err = mala
                .tell(Evaluation::with_gradient(bad, vec![0.0, 0.0]))
                .unwrap_err();
            assert!(matches!(err, SamplerError::InvalidInitialPoint(_)));
            assert_eq!(mala.iterations(), 0);
        }
    }

    #[test]
    fn non_finite_initial_gradient_is_fatal() {
        let mut mala = Mala::new(&[1.0], None).unwrap();
        mala.ask();
        let err = mala
            .tell(Evaluation::with_gradient(-1.0, vec![f64::NAN]))
            .unwrap_err();
        assert!(matches!(err, SamplerError::InvalidInitialPoint(_)));
    }

    #[test]
    fn tell_without_ask_is_invalid() {
        let mut mala = Mala::new(&[0.0], None).unwrap();
        assert_eq!(
            mala.tell(Evaluation::with_gradient(0.0, vec![0.0])),
            Err(SamplerError::InvalidCall)
        );
    }

    #[test]
    fn double_tell_is_invalid() {
        let mut mala = Mala::new(&[0.0], None).unwrap();
        mala.ask();
        mala.tell(standard_normal(&[0.0])).unwrap();
        assert_eq!(
            mala.tell(standard_normal(&[0.0])),
            Err(SamplerError::InvalidCall)
        );

        let x = mala.ask().to_vec();
        mala.tell(standard_normal(&x)).unwrap();
        assert_eq!(
            mala.tell(standard_normal(&x)),
            Err(SamplerError::InvalidCall)
        );
    }

    #[test]
    fn repeated_ask_returns_cached_point() {
        let mut mala = Mala::new(&[0.3, -0.2], None).unwrap().set_seed(1);
        let first = mala.ask().to_vec();
        assert_eq!(mala.ask(), first.as_slice());
        mala.tell(standard_normal(&first)).unwrap();

        let proposal = mala.ask().to_vec();
        assert_ne!(proposal, first);
        assert_eq!(mala.ask(), proposal.as_slice());
        assert_eq!(mala.ask(), proposal.as_slice());
    }

    #[test]
    fn missing_gradient_keeps_proposal_pending() {
        let mut mala = Mala::new(&[0.0], None).unwrap();
        mala.ask();
        let err = mala.tell(Evaluation::new(-1.0)).unwrap_err();
        assert!(matches!(err, SamplerError::InvalidArgument(_)));
        assert!(mala.is_pending());
        assert!(mala.tell(standard_normal(&[0.0])).is_ok());
    }

    #[test]
    fn wrong_gradient_length_is_rejected() {
        let mut mala = Mala::new(&[0.0, 0.0], None).unwrap();
        mala.ask();
        let err = mala
            .tell(Evaluation::with_gradient(-1.0, vec![0.0]))
            .unwrap_err();
        assert!(matches!(err, SamplerError::InvalidArgument(_)));
    }

    #[test]
    fn step_size_must_be_positive() {
        let mut mala = Mala::new(&[0.0], None).unwrap();
        for bad in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                mala.set_step_size(bad),
                Err(SamplerError::InvalidArgument(_))
            ));
        }
        assert_eq!(mala.base_step_size(), DEFAULT_STEP_SIZE);
    }

    #[test]
    fn step_size_scales_with_preconditioner_diagonal() {
        let sigma0 = arr2(&[[2.0, 0.5, 0.0], [0.5, 3.0, 0.0], [0.0, 0.0, 0.5]]);
        let mut mala = Mala::new(&[0.0, 0.0, 0.0], Some(sigma0)).unwrap();
        assert_abs_diff_eq!(mala.step_size()[0], 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(mala.step_size()[1], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(mala.step_size()[2], 0.05, epsilon = 1e-12);

        mala.set_step_size(2.0).unwrap();
        assert_eq!(mala.step_size(), &[4.0, 6.0, 1.0]);
        assert_eq!(mala.base_step_size(), 2.0);
    }

    #[test]
    fn preconditioner_dimension_mismatch() {
        let err = Mala::new(&[0.0, 0.0], Some(Array2::<f64>::eye(3))).unwrap_err();
        assert!(matches!(err, SamplerError::InvalidArgument(_)));
    }

    #[test]
    fn preconditioner_must_be_symmetric_with_positive_diagonal() {
        let asymmetric = arr2(&[[1.0, 0.2], [0.1, 1.0]]);
        assert!(Mala::new(&[0.0, 0.0], Some(asymmetric)).is_err());
        let negative = arr2(&[[1.0, 0.0], [0.0, -1.0]]);
        assert!(Mala::new(&[0.0, 0.0], Some(negative)).is_err());
        assert!(Mala::with_diagonal(&[0.0, 0.0], &[1.0]).is_err());
        assert!(Mala::<f64>::new(&[], None).is_err());
    }

    #[test]
    fn symmetry_tolerance_scales_with_matrix() {
        let rounded = arr2(&[[1.0, 1e-17], [0.0, 2.0]]);
        assert!(Mala::new(&[0.0, 0.0], Some(rounded)).is_ok());
        let large = arr2(&[[1e6, 3.0 + 1e-10], [3.0, 1e6]]);
        assert!(Mala::new(&[0.0, 0.0], Some(large)).is_ok());
        let skewed = arr2(&[[1.0, 1e-6], [0.0, 1.0]]);
        assert!(Mala::new(&[0.0, 0.0], Some(skewed)).is_err());
    }

    #[test]
    fn diagonal_preconditioner() {
        let mala = Mala::with_diagonal(&[0.0, 0.0], &[1.0, 4.0]).unwrap();
        assert_eq!(mala.preconditioner(), &arr2(&[[1.0, 0.0], [0.0, 4.0]]));
        assert_abs_diff_eq!(mala.step_size()[1], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let run = |seed: u64| {
            let mut mala = Mala::new(&[1.0, -1.0], None).unwrap().set_seed(seed);
            let mut trace = Vec::new();
            for _ in 0..200 {
                let reply = standard_normal(mala.ask());
                trace.push(mala.tell(reply).unwrap().unwrap().to_vec());
            }
            trace
        };
        assert_eq!(run(3), run(3));
        assert_ne!(run(3), run(4));
    }

    #[test]
    fn returned_point_is_proposal_or_previous() {
        let mut mala = Mala::new(&[2.0], None).unwrap().set_seed(11);
        let mut previous = mala.ask().to_vec();
        mala.tell(standard_normal(&previous)).unwrap();
        let mut accepted = 1u64;
        for _ in 0..500 {
            let proposal = mala.ask().to_vec();
            let current = mala.tell(standard_normal(&proposal)).unwrap().unwrap().to_vec();
            assert!(current == proposal || current == previous);
            if current == proposal {
                accepted += 1;
            }
            previous = current;
        }
        assert_abs_diff_eq!(
            mala.acceptance_rate(),
            accepted as f64 / 501.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn acceptance_ratio_matches_reference_formula() {
        let mut mala = Mala::new(&[0.5], None).unwrap().set_seed(5);
        mala.set_step_size(0.7).unwrap();
        mala.ask();
        mala.tell(standard_normal(&[0.5])).unwrap();
        mala.ask();

        let State::ProposalPending { current, proposal } = mala.state.clone() else {
            panic!("expected a pending proposal");
        };
        let y = proposal.position[0];
        let eps: f64 = 0.7;
        let log_q = |to: f64, from: f64| {
            let mu = from + 0.5 * eps * eps * (-from);
            -0.5 * ((to - mu) / eps).powi(2) - eps.ln() - 0.5 * (2.0 * PI).ln()
        };
        let expected = (-0.5 * y * y + log_q(0.5, y)) - (-0.125 + log_q(y, 0.5));
        assert_abs_diff_eq!(proposal.forward_q, log_q(y, 0.5), epsilon = 1e-12);
        let ratio = mala.log_acceptance_ratio(&current, &proposal, -0.5 * y * y, &[-y]);
        assert_abs_diff_eq!(ratio, expected, epsilon = 1e-12);
    }

    #[test]
    fn normal_kernel_log_density() {
        assert_abs_diff_eq!(
            diagonal_normal_log_pdf(&[0.0], &[0.0], &[1.0]),
            -0.918_938_533_204_672_7,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            diagonal_normal_log_pdf(&[1.0, 2.0], &[0.0, 0.0], &[1.0, 2.0]),
            -1.0 - 2.0f64.ln() - (2.0 * PI).ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn single_precision_sampler() {
        let mut mala = Mala::<f32>::new(&[0.0, 1.0], None).unwrap().set_seed(9);
        mala.ask();
        mala.tell(Evaluation::with_gradient(-0.5, vec![0.0, -1.0]))
            .unwrap();
        let x = mala.ask().to_vec();
        assert_eq!(x.len(), 2);
        assert!(x.iter().all(|v| v.is_finite()));
        assert_eq!(mala.log_fields(), vec![("Accept.", 1.0)]);
    }
}
