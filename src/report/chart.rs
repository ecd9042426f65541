//! Reshaping per-level bands into one chart table.
//!
//! Charting front ends want one row per x-tick with a column per series, so
//! every level contributes two columns: `"{value}+"` (upper arc) and
//! `"{value}-"` (lower arc).
//!
//! Rows are keyed by the argument list of the longest band. Matching is exact:
//! all bands come from the same grid, so shared arguments are bit-identical.
//! Points of shorter bands that do not land on that axis are dropped.

use crate::domain::{ChartRow, ChartTable, ValueResult};

/// Column label for one arc of a level.
pub fn level_label(value: f64, upper: bool) -> String {
    format!("{value}{}", if upper { '+' } else { '-' })
}

pub fn assemble(results: &[ValueResult]) -> ChartTable {
    // First band of maximum length wins ties.
    let mut axis: &[f64] = &[];
    for result in results {
        if result.series.len() > axis.len() {
            axis = &result.series.args;
        }
    }

    let mut labels: Vec<String> = Vec::new();
    let mut data = Vec::with_capacity(axis.len());

    for &arg in axis {
        let mut row = ChartRow::new(arg);
        for result in results {
            let Some(ind) = result.series.args.iter().position(|&a| a == arg) else {
                continue;
            };
            let plus = level_label(result.value, true);
            let minus = level_label(result.value, false);
            row.insert(plus.clone(), result.series.positive[ind]);
            row.insert(minus.clone(), result.series.negative[ind]);
            for label in [plus, minus] {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        data.push(row);
    }

    ChartTable {
        data,
        values: labels,
    }
}
