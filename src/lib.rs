//! `level-curves` library crate.
//!
//! The binary (`lvl`) is a thin wrapper around this library so that:
//!
//! - the numerical pipeline is testable without spawning processes
//! - the pipeline can sit behind other front ends (an HTTP handler, notebooks)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod band;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
