//! Removing undefined grid points.

use crate::domain::CurveSeries;
use crate::error::LevelError;

/// Drop every index where either arc is not a finite number.
///
/// Single forward pass into fresh buffers; the relative order of the kept
/// points is unchanged.
pub fn filter_gaps(series: &CurveSeries) -> Result<CurveSeries, LevelError> {
    series.check_aligned()?;

    let mut out = CurveSeries {
        args: Vec::with_capacity(series.len()),
        negative: Vec::with_capacity(series.len()),
        positive: Vec::with_capacity(series.len()),
    };
    for (arg, negative, positive) in series.points() {
        if negative.is_finite() && positive.is_finite() {
            out.args.push(arg);
            out.negative.push(negative);
            out.positive.push(positive);
        }
    }

    log::debug!("gap filter: kept {} of {} points", out.len(), series.len());
    Ok(out)
}
