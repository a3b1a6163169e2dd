//! # riskmap-cli: Risk Map Command-Line Interface
//!
//! Drives the core crates from files on disk. The map application's data
//! loader does the same job at runtime; this binary exists for data
//! preparation and CI checks.
//!
//! ## Subcommands
//!
//! - `validate`: Integrity report for a municipal geometry file
//! - `join`: Geometry/data join with alignment report
//! - `classify`: Choropleth breaks and per-municipality colors
//! - `layers`: Layer table and initial store statistics
//!
//! Handlers return the process exit code; argument parsing lives in
//! `main.rs`.

pub mod classify;
pub mod input;
pub mod join;
pub mod layers;
pub mod validate;
