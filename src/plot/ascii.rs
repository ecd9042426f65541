//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each level gets one marker character; both arcs of its band are drawn as
//! connected lines with that marker.

use crate::domain::{ChartFile, SamplingConfig, ValueResult};

const MARKERS: [char; 8] = ['*', 'o', '+', '#', 'x', '%', '@', '='];

/// One polyline to draw.
struct Trace {
    marker: char,
    points: Vec<(f64, f64)>,
}

/// Render the bands of an in-memory run.
pub fn render_ascii_plot(results: &[ValueResult], sampling: &SamplingConfig, width: usize, height: usize) -> String {
    let mut traces = Vec::new();
    let mut legend = Vec::new();
    for (i, r) in results.iter().enumerate() {
        let marker = MARKERS[i % MARKERS.len()];
        legend.push(format!("{marker} {}", r.value));
        if r.series.is_empty() {
            continue;
        }
        let negative = r.series.points().map(|(a, n, _)| (a, n)).collect();
        let positive = r.series.points().map(|(a, _, p)| (a, p)).collect();
        traces.push(Trace { marker, points: negative });
        traces.push(Trace { marker, points: positive });
    }

    let (x_min, x_max) = sampling.bounds();
    render_plot(&traces, &legend, x_min, x_max, width, height)
}

/// Render a plot from a saved chart JSON file.
///
/// Each label becomes its own trace; the `+` / `-` pair of a level shares a marker.
pub fn render_ascii_plot_from_chart_file(chart: &ChartFile, width: usize, height: usize) -> String {
    let mut traces = Vec::new();
    let mut legend = Vec::new();
    let mut levels: Vec<&str> = Vec::new();

    for label in &chart.chart.values {
        let level = label.trim_end_matches(['+', '-']);
        let idx = match levels.iter().position(|l| *l == level) {
            Some(idx) => idx,
            None => {
                levels.push(level);
                legend.push(format!("{} {level}", MARKERS[(levels.len() - 1) % MARKERS.len()]));
                levels.len() - 1
            }
        };
        let points = chart
            .chart
            .data
            .iter()
            .filter_map(|row| row.get(label).map(|v| (row.name, v)))
            .collect();
        traces.push(Trace {
            marker: MARKERS[idx % MARKERS.len()],
            points,
        });
    }

    let (x_min, x_max) = chart.sampling.bounds();
    render_plot(&traces, &legend, x_min, x_max, width, height)
}

fn render_plot(traces: &[Trace], legend: &[String], x_min: f64, x_max: f64, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (y_min, y_max) = y_range(traces).unwrap_or((-1.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    for trace in traces {
        draw_trace(&mut grid, trace, x_min, x_max, y_min, y_max);
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: x1=[{x_min:.3}, {x_max:.3}] | x2=[{y_min:.3}, {y_max:.3}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    if !legend.is_empty() {
        out.push_str(&format!("Levels: {}\n", legend.join("  ")));
    }
    out
}

fn y_range(traces: &[Trace]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in traces.iter().flat_map(|t| &t.points) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_trace(grid: &mut [Vec<char>], trace: &Trace, x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in &trace.points {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        match prev {
            Some((c0, r0)) => draw_line(grid, c0, r0, col, row, trace.marker),
            None => grid[row][col] = trace.marker,
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
