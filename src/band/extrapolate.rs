//! Filling the full argument grid from the surviving points.
//!
//! Each arc gets its own not-a-knot cubic spline; the end cubics are continued
//! outside the fitted range, so the output always covers the whole grid.

use crate::domain::{CurveSeries, SamplingConfig};
use crate::error::LevelError;
use crate::math::{CubicSpline, MIN_SPLINE_POINTS, SplineError};

/// Fit both arcs and resample them on `sampling`.
pub fn extrapolate(series: &CurveSeries, sampling: &SamplingConfig) -> Result<CurveSeries, LevelError> {
    series.check_aligned()?;
    sampling.validate()?;

    let negative = fit(&series.args, &series.negative)?;
    let positive = fit(&series.args, &series.positive)?;

    let args = sampling.args();
    let negative_out = args.iter().map(|&x| negative.value(x)).collect();
    let positive_out = args.iter().map(|&x| positive.value(x)).collect();

    CurveSeries::new(args, negative_out, positive_out)
}

fn fit(x: &[f64], y: &[f64]) -> Result<CubicSpline, LevelError> {
    CubicSpline::not_a_knot(x, y).map_err(|e| match e {
        SplineError::TooFewPoints { available } => LevelError::InsufficientData {
            available,
            required: MIN_SPLINE_POINTS,
        },
        other => LevelError::FitAborted(other.to_string()),
    })
}
