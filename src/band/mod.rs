//! Level-band computation, one stage per module:
//!
//! solve -> sample -> filter_gaps -> extrapolate -> calibrate
//!
//! Every stage returns a fresh `CurveSeries` with aligned sequences.

pub mod calibrate;
pub mod extrapolate;
pub mod filter;
pub mod sampler;
pub mod solver;

pub use calibrate::*;
pub use extrapolate::*;
pub use filter::*;
pub use sampler::*;
pub use solver::*;
