//! Shared level pipeline used by every `lvl` subcommand.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! request resolution -> model build -> per-level bands -> chart table
//!
//! The subcommands can then focus on presentation (JSON, tables, plots).

use rayon::prelude::*;

use crate::band::{calibrate, extrapolate, filter_gaps, sample, solve_with};
use crate::domain::{ChartResponse, LevelConfig, ModelKind, ModelRequest, ValueResult};
use crate::error::LevelError;
use crate::models::{DefaultParameters, ModelExpression, build, resolve_spec};
use crate::report::assemble;

/// All computed outputs of a single request.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub kind: ModelKind,
    pub expression: ModelExpression,
    /// One entry per requested value, in request order.
    pub results: Vec<ValueResult>,
    pub chart: ChartResponse,
}

/// Resolve the request's model and build its expression.
pub fn build_expression(request: &ModelRequest, defaults: &DefaultParameters) -> Result<ModelExpression, LevelError> {
    let kind: ModelKind = request.model.parse()?;
    let spec = resolve_spec(kind, &request.parameters, defaults)?;
    build(&spec)
}

/// Execute the full pipeline for one request.
///
/// Request-level problems (model kind, parameters, grid, any invalid value)
/// abort before any level is computed. Fit failures of a single level only
/// empty that level's band.
pub fn run_request(
    request: &ModelRequest,
    defaults: &DefaultParameters,
    config: &LevelConfig,
) -> Result<RunOutput, LevelError> {
    let expression = build_expression(request, defaults)?;
    config.validate()?;
    if let Some(&bad) = request.values.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
        return Err(LevelError::InvalidTargetValue(bad));
    }

    log::debug!(
        "{} model: F(x1, x2) = {expression}; {} level(s)",
        expression.kind(),
        request.values.len()
    );

    // Levels are independent; rayon keeps the collected order.
    let results = request
        .values
        .par_iter()
        .map(|&value| compute_level(&expression, value, config))
        .collect::<Result<Vec<_>, _>>()?;

    let chart = assemble(&results);

    Ok(RunOutput {
        kind: expression.kind(),
        expression,
        results,
        chart,
    })
}

/// Compute the calibrated band for one level.
pub fn compute_level(expression: &ModelExpression, value: f64, config: &LevelConfig) -> Result<ValueResult, LevelError> {
    let branches = solve_with(expression, value, config.roots)?;
    log::debug!(
        "level {value}: {} branch(es) via {}",
        branches.len(),
        branches.method_name()
    );
    if branches.pair().is_none() {
        return Ok(ValueResult::empty(value));
    }

    let sampled = sample(&branches, &config.sampling)?;
    let filtered = filter_gaps(&sampled)?;
    log::debug!("level {value}: {} of {} points defined", filtered.len(), sampled.len());

    let extended = match extrapolate(&filtered, &config.sampling) {
        Ok(series) => series,
        Err(err) if err.is_per_level() => {
            log::warn!("level {value}: no band ({err})");
            return Ok(ValueResult::empty(value));
        }
        Err(err) => return Err(err),
    };

    let series = calibrate(extended)?;
    log::debug!("level {value}: {} calibrated points", series.len());

    Ok(ValueResult { value, series })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartTable, Parameters, SamplingConfig};

    fn request(model: &str, values: Vec<f64>) -> ModelRequest {
        ModelRequest {
            model: model.to_string(),
            parameters: Parameters::default_named(),
            values,
        }
    }

    fn run(model: &str, values: Vec<f64>) -> Result<RunOutput, LevelError> {
        run_request(&request(model, values), &DefaultParameters::builtin(), &LevelConfig::default())
    }

    #[test]
    fn default_l2_produces_bands_inside_grid() {
        let out = run("L2", vec![1000.0, 2000.0]).unwrap();
        assert_eq!(out.kind, ModelKind::L2);
        assert_eq!(out.results.len(), 2);
        assert_eq!(out.results[0].value, 1000.0);
        assert_eq!(out.results[1].value, 2000.0);

        let (lo, hi) = LevelConfig::default().sampling.bounds();
        for r in &out.results {
            assert!(!r.series.is_empty(), "level {}", r.value);
            for (arg, negative, positive) in r.series.points() {
                assert!(arg >= lo && arg <= hi);
                assert!(negative <= positive);
            }
        }

        // Higher level sits inside the lower one.
        assert!(out.results[1].series.len() < out.results[0].series.len());

        assert_eq!(out.chart.values, vec!["1000+", "1000-", "2000+", "2000-"]);
        for row in &out.chart.data {
            assert!(row.name >= lo && row.name <= hi);
        }
    }

    #[test]
    fn default_lar_produces_a_band() {
        let out = run("LAR", vec![1000.0]).unwrap();
        assert_eq!(out.kind, ModelKind::Lar);
        let series = &out.results[0].series;
        assert!(!series.is_empty());
        for (_, negative, positive) in series.points() {
            assert!(negative <= positive);
        }
    }

    #[test]
    fn level_above_the_peak_is_empty() {
        // ln(1e6) ≈ 13.8 lies far above the default L2 maximum.
        let out = run("L2", vec![1e6]).unwrap();
        assert!(out.results[0].series.is_empty());
        assert!(out.chart.data.is_empty());
        assert!(out.chart.values.is_empty());
    }

    #[test]
    fn failed_level_does_not_drop_its_neighbours() {
        let out = run("L2", vec![1000.0, 1e6, 2000.0]).unwrap();
        assert_eq!(out.results.len(), 3);
        assert!(!out.results[0].series.is_empty());
        assert!(out.results[1].series.is_empty());
        assert!(!out.results[2].series.is_empty());
        assert_eq!(out.results[1].value, 1e6);
        assert_eq!(out.chart.values, vec!["1000+", "1000-", "2000+", "2000-"]);
    }

    #[test]
    fn too_few_defined_points_empty_only_that_level() {
        // A grid of three points cannot carry a cubic fit.
        let config = LevelConfig {
            sampling: SamplingConfig { lo: -1, hi: 2, scale: 10 },
            ..LevelConfig::default()
        };
        let expr = build_expression(&request("L2", vec![]), &DefaultParameters::builtin()).unwrap();
        let result = compute_level(&expr, 1000.0, &config).unwrap();
        assert_eq!(result, ValueResult::empty(1000.0));
    }

    #[test]
    fn request_level_errors_abort() {
        assert_eq!(
            run("L3", vec![1000.0]).unwrap_err(),
            LevelError::UnknownModelKind("L3".to_string())
        );
        assert_eq!(
            run("L2", vec![1000.0, -1.0]).unwrap_err(),
            LevelError::InvalidTargetValue(-1.0)
        );

        let mut req = request("L2", vec![1000.0]);
        req.parameters = Parameters::Values(vec![1.0; 5]);
        let err = run_request(&req, &DefaultParameters::builtin(), &LevelConfig::default()).unwrap_err();
        assert!(matches!(err, LevelError::ModelConfiguration(_)));
    }

    #[test]
    fn calibrated_output_is_stable_under_recalibration() {
        let out = run("L2", vec![1000.0]).unwrap();
        let series = out.results[0].series.clone();
        assert_eq!(calibrate(series.clone()).unwrap(), series);
    }

    #[test]
    fn empty_request_yields_empty_chart() {
        let out = run("L2", Vec::new()).unwrap();
        assert!(out.results.is_empty());
        assert_eq!(out.chart, ChartTable::default());
    }
}
