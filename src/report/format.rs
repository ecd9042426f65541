//! Formatted terminal output for level runs.
//!
//! We keep formatting code in one place so:
//! - the numerical code stays clean and testable
//! - output changes are localized

use crate::band::SolutionBranches;
use crate::domain::{CurveSeries, LevelConfig, ValueResult};
use crate::models::ModelExpression;

/// Summary numbers for one calibrated band.
#[derive(Debug, Clone, PartialEq)]
pub struct BandStats {
    pub points: usize,
    pub arg_min: f64,
    pub arg_max: f64,
    pub x2_min: f64,
    pub x2_max: f64,
    /// Largest `positive - negative` gap.
    pub max_width: f64,
}

/// Stats for a non-empty band.
pub fn band_stats(series: &CurveSeries) -> Option<BandStats> {
    if series.is_empty() {
        return None;
    }
    let mut stats = BandStats {
        points: series.len(),
        arg_min: f64::INFINITY,
        arg_max: f64::NEG_INFINITY,
        x2_min: f64::INFINITY,
        x2_max: f64::NEG_INFINITY,
        max_width: 0.0,
    };
    for (arg, negative, positive) in series.points() {
        stats.arg_min = stats.arg_min.min(arg);
        stats.arg_max = stats.arg_max.max(arg);
        stats.x2_min = stats.x2_min.min(negative);
        stats.x2_max = stats.x2_max.max(positive);
        stats.max_width = stats.max_width.max(positive - negative);
    }
    Some(stats)
}

/// Full run summary: model, grid and one line per level.
pub fn format_run_summary(expression: &ModelExpression, results: &[ValueResult], config: &LevelConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== lvl - level bands ({}) ===\n", expression.kind()));
    out.push_str(&format!("Model: F(x1, x2) = {expression}\n"));

    let (lo, hi) = config.sampling.bounds();
    out.push_str(&format!(
        "Grid: x1=[{lo:.3}, {hi:.3}] | step={:.4} | n={}\n",
        1.0 / f64::from(config.sampling.scale),
        config.sampling.len()
    ));

    out.push_str("\nLevels:\n");
    out.push_str(&format!(
        "  {:<12} {:>6}  {:>18}  {:>18}  {:>9}\n",
        "value", "points", "x1 range", "x2 range", "max width"
    ));

    for result in results {
        match band_stats(&result.series) {
            Some(s) => out.push_str(&format!(
                "  {:<12} {:>6}  {:>18}  {:>18}  {:>9.4}\n",
                result.value,
                s.points,
                format!("[{:.3}, {:.3}]", s.arg_min, s.arg_max),
                format!("[{:.3}, {:.3}]", s.x2_min, s.x2_max),
                s.max_width
            )),
            None => out.push_str(&format!("  {:<12} {:>6}  (no band)\n", result.value, 0)),
        }
    }

    out
}

/// Model description for `lvl describe`.
pub fn format_model_description(expression: &ModelExpression, branches: &SolutionBranches, config: &LevelConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!("Model: {}\n", expression.kind()));
    out.push_str(&format!("F(x1, x2) = {expression}\n"));
    if let Some(m) = expression.membership() {
        out.push_str(&format!(
            "mu(x) = 1/(1 + exp({}·(x - {})))\n",
            m.delta, m.xmu
        ));
    }
    out.push_str(&format!(
        "Solve for x2: {} branch(es), {}",
        branches.len(),
        branches.method_name()
    ));
    if branches.method_name() == "bracketed roots" {
        out.push_str(&format!(
            " in [{}, {}] over {} steps",
            config.roots.lo, config.roots.hi, config.roots.steps
        ));
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelKind, ModelSpec};
    use crate::models::build;

    #[test]
    fn stats_cover_band_extent() {
        let series = CurveSeries::new(
            vec![-0.5, 0.0, 0.5],
            vec![-0.1, -0.4, -0.2],
            vec![0.1, 0.5, 0.2],
        )
        .unwrap();
        let s = band_stats(&series).unwrap();
        assert_eq!(s.points, 3);
        assert_eq!((s.arg_min, s.arg_max), (-0.5, 0.5));
        assert_eq!((s.x2_min, s.x2_max), (-0.4, 0.5));
        assert!((s.max_width - 0.9).abs() < 1e-12);
        assert!(band_stats(&CurveSeries::empty()).is_none());
    }

    #[test]
    fn summary_lists_every_level() {
        let expr = build(&ModelSpec {
            kind: ModelKind::L2,
            coefficients: vec![1.0, 0.0, 0.0, -1.0, 0.0, -1.0],
            membership: None,
        })
        .unwrap();
        let results = vec![
            ValueResult {
                value: 1000.0,
                series: CurveSeries::new(vec![0.0], vec![-1.0], vec![1.0]).unwrap(),
            },
            ValueResult::empty(2000.0),
        ];
        let txt = format_run_summary(&expr, &results, &LevelConfig::default());
        assert!(txt.contains("Model: F(x1, x2) = 1 - 1·x1² - 1·x2²"));
        assert!(txt.contains("n=200"));
        assert!(txt.lines().any(|l| l.trim_start().starts_with("1000 ")));
        assert!(txt.lines().any(|l| l.contains("2000") && l.contains("(no band)")));
    }
}
