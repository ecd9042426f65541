//! Command-line parsing for the level-curve tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the numerical code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{LevelConfig, ModelKind, RootSearch, SamplingConfig};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "lvl", version, about = "Level-curve bands for LAR / L2 models")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a JSON request (file or stdin) and print the chart response.
    Chart(ChartArgs),
    /// Compute bands for a model and print a per-level summary.
    Levels(LevelsArgs),
    /// Plot a previously exported chart JSON.
    Plot(PlotArgs),
    /// Print the built model expression and how it is solved.
    Describe(DescribeArgs),
}

/// Argument grid and root window.
#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    /// First grid index (argument = index / scale).
    #[arg(long, default_value_t = -100, allow_hyphen_values = true)]
    pub lo: i64,

    /// End grid index (exclusive).
    #[arg(long, default_value_t = 100, allow_hyphen_values = true)]
    pub hi: i64,

    /// Grid indices per unit of argument.
    #[arg(long, default_value_t = 100)]
    pub scale: u32,

    /// Lower end of the numeric root window for x2.
    #[arg(long, default_value_t = -10.0, allow_hyphen_values = true)]
    pub root_lo: f64,

    /// Upper end of the numeric root window for x2.
    #[arg(long, default_value_t = 10.0, allow_hyphen_values = true)]
    pub root_hi: f64,

    /// Scan intervals inside the root window.
    #[arg(long, default_value_t = 400)]
    pub root_steps: usize,
}

impl GridArgs {
    pub fn level_config(&self) -> LevelConfig {
        LevelConfig {
            sampling: SamplingConfig {
                lo: self.lo,
                hi: self.hi,
                scale: self.scale,
            },
            roots: RootSearch {
                lo: self.root_lo,
                hi: self.root_hi,
                steps: self.root_steps,
            },
        }
    }
}

/// Model selection shared by `levels` and `describe`.
#[derive(Debug, Args, Clone)]
pub struct ModelArgs {
    /// Model family.
    #[arg(short = 'm', long, value_enum, default_value_t = ModelKind::L2)]
    pub model: ModelKind,

    /// Explicit parameters, comma-separated (6 for L2; 18 + delta + xmu for LAR).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub params: Option<Vec<f64>>,

    /// Defaults JSON (overrides $LEVELS_DEFAULTS).
    #[arg(long, value_name = "JSON")]
    pub defaults: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ChartArgs {
    /// Request JSON file; read from stdin when absent.
    #[arg(long, value_name = "JSON")]
    pub request: Option<PathBuf>,

    /// Defaults JSON (overrides $LEVELS_DEFAULTS).
    #[arg(long, value_name = "JSON")]
    pub defaults: Option<PathBuf>,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Print single-line JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,

    /// Also write the chart to a JSON file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct LevelsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Level values (repeatable).
    #[arg(short = 'v', long = "value", default_values_t = vec![1000.0, 2000.0])]
    pub values: Vec<f64>,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Render an ASCII plot of the bands.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export bands to CSV (value,arg,negative,positive).
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Export the chart to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for plotting a saved chart.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Chart JSON file produced by `lvl levels --export` or `lvl chart --export`.
    #[arg(long, value_name = "JSON")]
    pub chart: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct DescribeArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub grid: GridArgs,
}
