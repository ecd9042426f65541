//! Reporting helpers: chart reshaping and terminal summaries.
//!
//! - `chart`: per-level bands -> `{data, values}` chart table
//! - `format`: human-readable run summaries

pub mod chart;
pub mod format;

pub use chart::*;
pub use format::*;
