//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between pipeline stages in-memory
//! - read from request JSON
//! - exported to JSON/CSV and reloaded later for plotting

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::LevelError;

/// Supported model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ModelKind {
    /// Logistic-mixture quadratic model (18 coefficients + membership scale).
    #[serde(rename = "LAR")]
    #[value(name = "lar", alias = "LAR")]
    Lar,
    /// Plain quadratic model (6 coefficients).
    #[serde(rename = "L2")]
    #[value(name = "l2", alias = "L2")]
    L2,
}

impl ModelKind {
    /// Label used on the wire and in terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ModelKind::Lar => "LAR",
            ModelKind::L2 => "L2",
        }
    }

    /// Number of linear coefficients the model expects.
    pub fn coefficient_len(self) -> usize {
        match self {
            ModelKind::Lar => 18,
            ModelKind::L2 => 6,
        }
    }

    /// Length of a custom parameter list in a request.
    ///
    /// LAR lists carry `delta` and `xmu` after the coefficients.
    pub fn parameter_len(self) -> usize {
        match self {
            ModelKind::Lar => self.coefficient_len() + 2,
            ModelKind::L2 => self.coefficient_len(),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelKind {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LAR" => Ok(ModelKind::Lar),
            "L2" => Ok(ModelKind::L2),
            other => Err(LevelError::UnknownModelKind(other.to_string())),
        }
    }
}

/// Scale parameters of the LAR membership function `mu`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    /// Steepness of the logistic transition.
    pub delta: f64,
    /// Location of the transition (where `mu = 0.5`).
    pub xmu: f64,
}

/// Model family plus its parameters, ready for `models::build`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSpec {
    pub kind: ModelKind,
    pub coefficients: Vec<f64>,
    /// Required for `ModelKind::Lar`, ignored for `ModelKind::L2`.
    pub membership: Option<Membership>,
}

/// Request parameters: the literal string `"default"` or an explicit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Parameters {
    Named(String),
    Values(Vec<f64>),
}

impl Parameters {
    pub const DEFAULT: &'static str = "default";

    pub fn default_named() -> Self {
        Parameters::Named(Self::DEFAULT.to_string())
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Parameters::default_named()
    }
}

/// A level-curve request as handed over by the caller.
///
/// The model kind stays a string here so unknown kinds surface as
/// `LevelError::UnknownModelKind` during resolution rather than as a JSON error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    #[serde(alias = "modelKind")]
    pub model: String,
    #[serde(default)]
    pub parameters: Parameters,
    pub values: Vec<f64>,
}

/// Three index-aligned sequences: `args[i]` pairs with `negative[i]` and `positive[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveSeries {
    pub args: Vec<f64>,
    /// Lower arc.
    pub negative: Vec<f64>,
    /// Upper arc.
    pub positive: Vec<f64>,
}

impl CurveSeries {
    /// Build a series, rejecting sequences of unequal length.
    pub fn new(args: Vec<f64>, negative: Vec<f64>, positive: Vec<f64>) -> Result<Self, LevelError> {
        let series = Self {
            args,
            negative,
            positive,
        };
        series.check_aligned()?;
        Ok(series)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn check_aligned(&self) -> Result<(), LevelError> {
        if self.args.len() == self.negative.len() && self.negative.len() == self.positive.len() {
            Ok(())
        } else {
            Err(LevelError::MisalignedSeries {
                args: self.args.len(),
                negative: self.negative.len(),
                positive: self.positive.len(),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Iterate `(arg, negative, positive)` triples.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.args
            .iter()
            .zip(&self.negative)
            .zip(&self.positive)
            .map(|((&a, &n), &p)| (a, n, p))
    }
}

/// Band computed for one requested level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueResult {
    pub value: f64,
    pub series: CurveSeries,
}

impl ValueResult {
    pub fn empty(value: f64) -> Self {
        Self {
            value,
            series: CurveSeries::empty(),
        }
    }
}

/// Uniform argument grid `{ i / scale : i in [lo, hi) }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingConfig {
    pub lo: i64,
    pub hi: i64,
    pub scale: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            lo: -100,
            hi: 100,
            scale: 100,
        }
    }
}

impl SamplingConfig {
    /// Largest grid accepted by `validate`.
    pub const MAX_POINTS: usize = 10_000_000;

    pub fn validate(&self) -> Result<(), LevelError> {
        if self.scale == 0 {
            return Err(LevelError::InvalidSampling("scale must be > 0.".to_string()));
        }
        if self.hi <= self.lo {
            return Err(LevelError::InvalidSampling(format!(
                "empty grid range [{}, {}).",
                self.lo, self.hi
            )));
        }
        if self.len() > Self::MAX_POINTS {
            return Err(LevelError::InvalidSampling(format!(
                "grid [{}, {}) has more than {} points.",
                self.lo,
                self.hi,
                Self::MAX_POINTS
            )));
        }
        Ok(())
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        if self.hi > self.lo {
            usize::try_from(self.hi.abs_diff(self.lo)).unwrap_or(usize::MAX)
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Grid arguments in increasing order.
    ///
    /// Every stage derives its arguments from here so that equal grid points
    /// compare equal bit-for-bit across levels.
    pub fn args(&self) -> Vec<f64> {
        let scale = f64::from(self.scale);
        (self.lo..self.hi).map(|i| i as f64 / scale).collect()
    }

    /// Argument range covered by the grid (first and last point).
    pub fn bounds(&self) -> (f64, f64) {
        let scale = f64::from(self.scale);
        (self.lo as f64 / scale, self.hi.saturating_sub(1) as f64 / scale)
    }
}

/// Bracketing window for the numeric `x2` root search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootSearch {
    pub lo: f64,
    pub hi: f64,
    /// Number of scan intervals between `lo` and `hi`.
    pub steps: usize,
}

impl Default for RootSearch {
    fn default() -> Self {
        Self {
            lo: -10.0,
            hi: 10.0,
            steps: 400,
        }
    }
}

impl RootSearch {
    pub fn validate(&self) -> Result<(), LevelError> {
        if !(self.lo.is_finite() && self.hi.is_finite() && self.hi > self.lo) {
            return Err(LevelError::InvalidSampling(format!(
                "root window [{}, {}] must be finite with hi > lo.",
                self.lo, self.hi
            )));
        }
        if self.steps < 2 {
            return Err(LevelError::InvalidSampling(
                "root scan steps must be >= 2.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything the per-level pipeline needs besides the model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub sampling: SamplingConfig,
    pub roots: RootSearch,
}

impl LevelConfig {
    pub fn validate(&self) -> Result<(), LevelError> {
        self.sampling.validate()?;
        self.roots.validate()
    }
}

/// One chart row: the argument plus sparse `label -> value` cells.
///
/// Serialized as a flat object, `{"name": 0.5, "1000+": 0.7, "1000-": -0.7}`,
/// with cells in emission order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawChartRow")]
pub struct ChartRow {
    pub name: f64,
    pub cells: Vec<(String, f64)>,
}

impl ChartRow {
    pub fn new(name: f64) -> Self {
        Self {
            name,
            cells: Vec::new(),
        }
    }

    /// Set a cell, replacing an existing cell with the same label in place.
    pub fn insert(&mut self, label: String, value: f64) {
        match self.cells.iter_mut().find(|(l, _)| *l == label) {
            Some(cell) => cell.1 = value,
            None => self.cells.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|(l, _)| l == label)
            .map(|&(_, v)| v)
    }
}

impl Serialize for ChartRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len() + 1))?;
        map.serialize_entry("name", &self.name)?;
        for (label, value) in &self.cells {
            map.serialize_entry(label, value)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct RawChartRow {
    name: f64,
    #[serde(flatten)]
    cells: BTreeMap<String, f64>,
}

impl From<RawChartRow> for ChartRow {
    fn from(raw: RawChartRow) -> Self {
        Self {
            name: raw.name,
            cells: raw.cells.into_iter().collect(),
        }
    }
}

/// Chart-ready table: rows keyed by argument plus the list of series labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartTable {
    pub data: Vec<ChartRow>,
    pub values: Vec<String>,
}

/// The `{data, values}` payload handed to the response layer.
pub type ChartResponse = ChartTable;

/// A saved chart file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub model: ModelKind,
    pub levels: Vec<f64>,
    pub sampling: SamplingConfig,
    pub chart: ChartTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_kind_parses_wire_names() {
        assert_eq!("LAR".parse::<ModelKind>().unwrap(), ModelKind::Lar);
        assert_eq!("L2".parse::<ModelKind>().unwrap(), ModelKind::L2);
        assert_eq!(
            "L3".parse::<ModelKind>().unwrap_err(),
            LevelError::UnknownModelKind("L3".to_string())
        );
        for loose in ["lar", "l2", " LAR", "L2 "] {
            assert_eq!(
                loose.parse::<ModelKind>().unwrap_err(),
                LevelError::UnknownModelKind(loose.to_string()),
                "{loose:?}"
            );
        }
    }

    #[test]
    fn series_rejects_unequal_lengths() {
        let err = CurveSeries::new(vec![0.0, 1.0], vec![1.0], vec![2.0, 3.0]).unwrap_err();
        assert!(matches!(err, LevelError::MisalignedSeries { args: 2, negative: 1, positive: 2 }));
    }

    #[test]
    fn sampling_grid_matches_scaled_range() {
        let grid = SamplingConfig { lo: -3, hi: 4, scale: 1 };
        assert_eq!(grid.args(), vec![-3.0, -2.0, -1.0, 0.0, 1.0, 2.0, 3.0]);
        assert_eq!(grid.bounds(), (-3.0, 3.0));

        let default = SamplingConfig::default();
        assert_eq!(default.len(), 200);
        assert_eq!(default.args()[0], -1.0);
        assert!((default.args()[199] - 0.99).abs() < 1e-12);
    }

    #[test]
    fn sampling_validation() {
        assert!(SamplingConfig { lo: 0, hi: 10, scale: 0 }.validate().is_err());
        assert!(SamplingConfig { lo: 5, hi: 5, scale: 1 }.validate().is_err());
        assert!(RootSearch { lo: 1.0, hi: -1.0, steps: 10 }.validate().is_err());
    }

    #[test]
    fn extreme_grid_bounds_are_rejected_without_overflow() {
        let huge = SamplingConfig { lo: i64::MIN, hi: i64::MAX, scale: 1 };
        assert_eq!(huge.len(), usize::try_from(u64::MAX).unwrap_or(usize::MAX));
        assert!(matches!(huge.validate(), Err(LevelError::InvalidSampling(_))));

        let limit = SamplingConfig::MAX_POINTS as i64;
        assert!(SamplingConfig { lo: 0, hi: limit, scale: 1 }.validate().is_ok());
        assert!(SamplingConfig { lo: 0, hi: limit + 1, scale: 1 }.validate().is_err());
    }

    #[test]
    fn request_accepts_default_and_explicit_parameters() {
        let req: ModelRequest =
            serde_json::from_str(r#"{"model": "L2", "parameters": "default", "values": [1000]}"#).unwrap();
        assert_eq!(req.parameters, Parameters::default_named());

        let req: ModelRequest = serde_json::from_str(
            r#"{"modelKind": "L2", "parameters": [1, 2, 3, 4, 5, 6], "values": [1000, 2000]}"#,
        )
        .unwrap();
        assert_eq!(req.model, "L2");
        assert_eq!(req.parameters, Parameters::Values(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
        assert_eq!(req.values, vec![1000.0, 2000.0]);
    }

    #[test]
    fn chart_row_serializes_flat_in_order() {
        let row = ChartRow {
            name: 0.5,
            cells: vec![("1000+".to_string(), 2.0), ("1000-".to_string(), 1.0)],
        };
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"name":0.5,"1000+":2.0,"1000-":1.0}"#);

        let back: ChartRow = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, 0.5);
        assert_eq!(back.get("1000-"), Some(1.0));
        assert_eq!(back.get("2000+"), None);
    }
}
