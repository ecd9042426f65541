//! LAR / L2 model construction.
//!
//! Models are plain term lists so that the solver and the sampler can stay
//! generic over the model kind.

pub mod builder;
pub mod defaults;

pub use builder::*;
pub use defaults::*;
