//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads default parameters
//! - runs the level pipeline
//! - prints JSON, summaries and plots
//! - writes optional exports

use std::path::Path;

use clap::Parser;

use crate::cli::{ChartArgs, Command, DescribeArgs, LevelsArgs, ModelArgs, PlotArgs};
use crate::domain::{ChartFile, LevelConfig, ModelRequest, Parameters};
use crate::error::AppError;
use crate::models::DefaultParameters;

pub mod pipeline;

/// Entry point for the `lvl` binary.
pub fn run() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // We want `lvl` and `lvl -m LAR` to behave like `lvl levels ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Chart(args) => handle_chart(args),
        Command::Levels(args) => handle_levels(args),
        Command::Plot(args) => handle_plot(args),
        Command::Describe(args) => handle_describe(args),
    }
}

fn handle_chart(args: ChartArgs) -> Result<(), AppError> {
    let request = crate::io::read_request(args.request.as_deref())?;
    let defaults = DefaultParameters::load(args.defaults.as_deref())?;
    let config = args.grid.level_config();

    let run = pipeline::run_request(&request, &defaults, &config)?;

    let json = if args.compact {
        serde_json::to_string(&run.chart)
    } else {
        serde_json::to_string_pretty(&run.chart)
    }
    .map_err(|e| AppError::new(4, format!("Failed to serialize chart: {e}")))?;
    println!("{json}");

    if let Some(path) = &args.export {
        write_chart(path, &run, &request, &config)?;
    }
    Ok(())
}

fn handle_levels(args: LevelsArgs) -> Result<(), AppError> {
    let defaults = DefaultParameters::load(args.model.defaults.as_deref())?;
    let request = request_from_args(&args.model, args.values.clone());
    let config = args.grid.level_config();

    let run = pipeline::run_request(&request, &defaults, &config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.expression, &run.results, &config)
    );

    if args.plot {
        let plot = crate::plot::render_ascii_plot(&run.results, &config.sampling, args.width, args.height);
        println!("{plot}");
    }

    if let Some(path) = &args.export_csv {
        crate::io::write_bands_csv(path, &run.results)?;
    }
    if let Some(path) = &args.export {
        write_chart(path, &run, &request, &config)?;
    }
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let chart = crate::io::read_chart_json(&args.chart)?;
    let plot = crate::plot::render_ascii_plot_from_chart_file(&chart, args.width, args.height);
    println!("{plot}");
    Ok(())
}

fn handle_describe(args: DescribeArgs) -> Result<(), AppError> {
    let defaults = DefaultParameters::load(args.model.defaults.as_deref())?;
    let request = request_from_args(&args.model, Vec::new());
    let config = args.grid.level_config();
    config.validate()?;

    let expression = pipeline::build_expression(&request, &defaults)?;
    // Branch structure does not depend on the level; any positive value works.
    let branches = crate::band::solve_with(&expression, 1.0, config.roots)?;

    print!(
        "{}",
        crate::report::format_model_description(&expression, &branches, &config)
    );
    Ok(())
}

fn request_from_args(model: &ModelArgs, values: Vec<f64>) -> ModelRequest {
    ModelRequest {
        model: model.model.display_name().to_string(),
        parameters: model
            .params
            .clone()
            .map(Parameters::Values)
            .unwrap_or_default(),
        values,
    }
}

fn write_chart(
    path: &Path,
    run: &pipeline::RunOutput,
    request: &ModelRequest,
    config: &LevelConfig,
) -> Result<(), AppError> {
    let file = ChartFile {
        tool: "lvl".to_string(),
        generated: chrono::Utc::now(),
        model: run.kind,
        levels: request.values.clone(),
        sampling: config.sampling,
        chart: run.chart.clone(),
    };
    crate::io::write_chart_json(path, &file)
}

/// Rewrite argv so `lvl` defaults to `lvl levels`.
///
/// Rules:
/// - `lvl`                      -> `lvl levels`
/// - `lvl -m LAR ...`           -> `lvl levels -m LAR ...`
/// - `lvl --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("levels".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "chart" | "levels" | "plot" | "describe");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "levels flags".
    if arg1.starts_with('-') {
        argv.insert(1, "levels".to_string());
        return argv;
    }

    argv
}
