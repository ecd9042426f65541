//! Exports: chart JSON (portable, re-plottable) and per-level band CSV.
//!
//! The chart file schema is defined by `domain::ChartFile`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{ChartFile, ValueResult};
use crate::error::AppError;

/// Write a chart JSON file.
pub fn write_chart_json(path: &Path, chart: &ChartFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create chart JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, chart)
        .map_err(|e| AppError::new(2, format!("Failed to write chart JSON: {e}")))?;
    log::info!("wrote chart JSON to {}", path.display());
    Ok(())
}

/// Read a chart JSON file.
pub fn read_chart_json(path: &Path) -> Result<ChartFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open chart JSON '{}': {e}", path.display())))?;
    let chart: ChartFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid chart JSON: {e}")))?;
    Ok(chart)
}

/// Write every retained band point to a CSV file.
pub fn write_bands_csv(path: &Path, results: &[ValueResult]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "value,arg,negative,positive")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    let mut rows = 0usize;
    for r in results {
        for (arg, negative, positive) in r.series.points() {
            writeln!(file, "{},{},{:.10},{:.10}", r.value, arg, negative, positive)
                .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
            rows += 1;
        }
    }

    log::info!("wrote {rows} band rows to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChartRow, ChartTable, CurveSeries, ModelKind, SamplingConfig};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lvl-{}-{name}", std::process::id()))
    }

    #[test]
    fn chart_file_survives_write_and_read() {
        let mut row = ChartRow::new(0.5);
        row.insert("1000+".to_string(), 0.25);
        row.insert("1000-".to_string(), -0.25);
        let chart = ChartFile {
            tool: "lvl".to_string(),
            generated: chrono::Utc::now(),
            model: ModelKind::Lar,
            levels: vec![1000.0],
            sampling: SamplingConfig::default(),
            chart: ChartTable {
                data: vec![row],
                values: vec!["1000+".to_string(), "1000-".to_string()],
            },
        };

        let path = temp_path("chart.json");
        write_chart_json(&path, &chart).unwrap();
        let back = read_chart_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.model, ModelKind::Lar);
        assert_eq!(back.chart, chart.chart);
        assert_eq!(back.generated, chart.generated);
    }

    #[test]
    fn band_csv_has_one_row_per_point() {
        let results = vec![
            ValueResult {
                value: 1000.0,
                series: CurveSeries::new(vec![-0.5, 0.0], vec![-0.1, -0.2], vec![0.1, 0.2]).unwrap(),
            },
            ValueResult::empty(2000.0),
        ];
        let path = temp_path("bands.csv");
        write_bands_csv(&path, &results).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "value,arg,negative,positive");
        assert_eq!(lines[1], "1000,-0.5,-0.1000000000,0.1000000000");
    }

    #[test]
    fn missing_chart_file_is_reported() {
        let err = read_chart_json(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
