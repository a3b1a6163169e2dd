//! # Join Subcommand
//!
//! Joins a tabular dataset onto municipal geometry and prints the alignment
//! between the two code sets.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use riskmap_join::{join, JoinConfig, JoinResult};

use crate::input::{load_dataset, load_geometry, write_json};

/// Arguments shared by subcommands that need a joined dataset.
#[derive(Args, Debug, Clone)]
pub struct JoinInputArgs {
    /// GeoJSON feature collection of municipalities.
    #[arg(long)]
    pub geometry: PathBuf,

    /// Tabular dataset with a `records` array.
    #[arg(long)]
    pub data: PathBuf,

    /// Label stamped on enriched features. Defaults to the dataset's
    /// `source` field.
    #[arg(long)]
    pub source: Option<String>,

    /// Geometry property holding the join code.
    #[arg(long, default_value = "dataCode")]
    pub geometry_field: String,

    /// Record field holding the join code.
    #[arg(long, default_value = "municipio")]
    pub data_field: String,
}

impl JoinInputArgs {
    /// Load both files and join them.
    pub fn load_and_join(&self) -> Result<JoinResult> {
        let collection = load_geometry(&self.geometry)?;
        let dataset = load_dataset(&self.data)?;
        let source_name = self
            .source
            .clone()
            .or_else(|| dataset.source.clone())
            .unwrap_or_else(|| JoinConfig::default().source_name);
        let config = JoinConfig {
            geometry_code_field: self.geometry_field.clone(),
            data_code_field: self.data_field.clone(),
            source_name,
        };
        Ok(join(&collection, &dataset, &config))
    }
}

/// Arguments for the join subcommand.
#[derive(Args, Debug)]
pub struct JoinArgs {
    #[command(flatten)]
    pub input: JoinInputArgs,

    /// Write the enriched features and join metadata as JSON.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Execute the join subcommand.
pub fn run_join(args: &JoinArgs) -> Result<u8> {
    let result = args.input.load_and_join()?;
    let meta = &result.metadata;
    let alignment = &result.alignment;

    println!("Join: {} ({})", meta.data_source_name, meta.dataset_version);
    println!(
        "  features:        {} ({} with data)",
        meta.total_features, meta.features_with_data
    );
    println!("  alignment ratio: {:.3}", alignment.alignment_ratio);
    println!("  matched codes:   {}", alignment.matched_codes.len());
    print_codes("only in geometry", &alignment.codes_only_in_geometry);
    print_codes("only in data", &alignment.codes_only_in_data);
    print_codes("duplicate codes", &meta.duplicate_codes);
    if meta.records_without_code > 0 {
        println!("  records without code: {}", meta.records_without_code);
    }

    if let Some(out) = &args.output {
        write_json(out, &result)?;
    }
    Ok(0)
}

fn print_codes(label: &str, codes: &[String]) {
    if !codes.is_empty() {
        println!("  {label}: {}", codes.join(", "));
    }
}
