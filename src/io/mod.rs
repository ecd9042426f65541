//! Input/output helpers.
//!
//! - request JSON from a file or stdin (`request`)
//! - chart JSON and band CSV exports (`export`)

pub mod export;
pub mod request;

pub use export::*;
pub use request::*;
