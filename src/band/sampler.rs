//! Sampling solution branches over the argument grid.

use crate::band::solver::SolutionBranches;
use crate::domain::{CurveSeries, SamplingConfig};
use crate::error::LevelError;

/// Evaluate the negative/positive branch pair at every grid argument.
///
/// Undefined points stay NaN; the gap filter removes them. With fewer than two
/// branches there is no band and the result is an empty series.
pub fn sample(branches: &SolutionBranches, sampling: &SamplingConfig) -> Result<CurveSeries, LevelError> {
    sampling.validate()?;

    let Some((negative_branch, positive_branch)) = branches.pair() else {
        log::debug!("sample: {} branch(es), no band to sample", branches.len());
        return Ok(CurveSeries::empty());
    };

    let args = sampling.args();
    let negative: Vec<f64> = args.iter().map(|&x| negative_branch.eval(x)).collect();
    let positive: Vec<f64> = args.iter().map(|&x| positive_branch.eval(x)).collect();

    CurveSeries::new(args, negative, positive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::band::solver::solve;
    use crate::domain::{ModelKind, ModelSpec};
    use crate::models::build;

    fn circle() -> SolutionBranches {
        let expr = build(&ModelSpec {
            kind: ModelKind::L2,
            coefficients: vec![0.0, 0.0, 0.0, -1.0, 0.0, -1.0],
            membership: None,
        })
        .unwrap();
        solve(&expr, (-0.25_f64).exp()).unwrap()
    }

    #[test]
    fn samples_full_grid_with_nan_outside_domain() {
        let sampling = SamplingConfig { lo: -10, hi: 10, scale: 10 };
        let series = sample(&circle(), &sampling).unwrap();

        assert_eq!(series.len(), 20);
        assert_eq!(series.args[0], -1.0);
        // |x1| > 0.5 is outside the circle.
        assert!(series.negative[0].is_nan());
        assert!(series.positive[0].is_nan());
        // x1 = 0 -> ±0.5
        assert!((series.negative[10] + 0.5).abs() < 1e-12);
        assert!((series.positive[10] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn single_branch_gives_empty_series() {
        let expr = build(&ModelSpec {
            kind: ModelKind::L2,
            coefficients: vec![1.0, 0.0, 2.0, 0.0, 0.0, 0.0],
            membership: None,
        })
        .unwrap();
        let branches = solve(&expr, 3.0).unwrap();
        let series = sample(&branches, &SamplingConfig::default()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn invalid_grid_is_rejected() {
        let err = sample(&circle(), &SamplingConfig { lo: 0, hi: 10, scale: 0 }).unwrap_err();
        assert!(matches!(err, LevelError::InvalidSampling(_)));
    }
}
