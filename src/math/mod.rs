//! Numerical building blocks: membership function, cubic spline, root bracketing.

pub mod membership;
pub mod roots;
pub mod spline;

pub use membership::*;
pub use roots::*;
pub use spline::*;
