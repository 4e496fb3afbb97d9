//! Error type shared by the samplers, boundaries and chain drivers.

use thiserror::Error;

/// Fatal conditions raised by a sampler or its driver.
///
/// A non-finite score on any step after the first is *not* an error: the
/// sampler treats it as a rejected proposal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplerError {
    /// `tell` was called without a pending proposal (before `ask`, or twice in a row).
    #[error("tell called before a proposal was set")]
    InvalidCall,

    /// The first point handed to the chain has a non-finite log-pdf or gradient.
    #[error("initial point for MCMC must have a finite log-pdf: {0}")]
    InvalidInitialPoint(String),

    /// A constructor, setter or `tell` argument is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
