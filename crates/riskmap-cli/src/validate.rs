//! # Validate Subcommand
//!
//! Runs the integrity validator over a geometry file against the built-in
//! catalog. Exit code 0 when the report is valid, 1 otherwise.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use riskmap_integrity::IntegrityValidator;

use crate::input::{load_geometry, write_json};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// GeoJSON feature collection of municipalities.
    #[arg(long)]
    pub geometry: PathBuf,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Write a copy with codes corrected from matching names.
    #[arg(long, value_name = "OUT")]
    pub corrected: Option<PathBuf>,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let collection = load_geometry(&args.geometry)?;
    let validator = IntegrityValidator::guanajuato();
    let report = validator.validate(&collection);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    if let Some(out) = &args.corrected {
        let outcome = validator.correct(&collection);
        for c in &outcome.corrections {
            eprintln!(
                "  corrected feature #{} {}: {} -> {}",
                c.feature_index,
                c.unit_name,
                c.previous_compact_code
                    .map_or_else(|| "none".to_string(), |p| p.to_string()),
                c.corrected_compact_code
            );
        }
        write_json(out, &outcome.collection)?;
        eprintln!(
            "{} correction(s) written to {}",
            outcome.corrections.len(),
            out.display()
        );
    }

    Ok(if report.is_valid { 0 } else { 1 })
}
