pub mod boundaries;
pub mod chain;
pub mod core;
pub mod distributions;
pub mod error;
pub mod mala;
pub mod sampler;

pub use error::SamplerError;
