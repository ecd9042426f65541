//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - model identity and parameters (`ModelKind`, `ModelSpec`, `Membership`)
//! - the request shape consumed by the pipeline (`ModelRequest`, `Parameters`)
//! - aligned curve data (`CurveSeries`, `ValueResult`)
//! - grid configuration (`SamplingConfig`, `RootSearch`, `LevelConfig`)
//! - chart outputs (`ChartRow`, `ChartTable`, `ChartFile`)

pub mod types;

pub use types::*;
