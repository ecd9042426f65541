//! Logistic membership function used by the LAR model.
//!
//! The model defines
//!
//! - `mu(x) = 1 - 1 / (1 + exp(-delta * (x - xmu)))`
//!
//! which simplifies to `1 / (1 + exp(delta * (x - xmu)))`. The second form never
//! produces `inf / inf`: for large positive `z` the exponential overflows to
//! `inf` and the result is exactly `0`, for large negative `z` it is exactly `1`.

/// Evaluate `mu(x)` for the given scale parameters.
pub fn membership(x: f64, delta: f64, xmu: f64) -> f64 {
    let z = delta * (x - xmu);
    1.0 / (1.0 + z.exp())
}
