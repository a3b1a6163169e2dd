//! # Classify Subcommand
//!
//! Joins a dataset onto geometry, classifies one numeric field into a color
//! scale, and prints the breaks, a summary and the color of every
//! municipality.

use anyhow::{Context, Result};
use clap::Args;
use riskmap_classify::{classify, summarize, ClassificationMethod, ClassifyOptions};

use crate::join::JoinInputArgs;

/// Five-step sequential red palette.
pub const DEFAULT_PALETTE: &str = "#fee5d9,#fcae91,#fb6a4a,#de2d26,#a50f15";

/// Arguments for the classify subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    #[command(flatten)]
    pub input: JoinInputArgs,

    /// Numeric record field to classify.
    #[arg(long)]
    pub field: String,

    /// Break method: quantile or equal-interval.
    #[arg(long, default_value = "quantile")]
    pub method: ClassificationMethod,

    /// Comma-separated palette, lowest bin first.
    #[arg(long, value_delimiter = ',', default_value = DEFAULT_PALETTE)]
    pub colors: Vec<String>,

    /// Color for municipalities without a value.
    #[arg(long, default_value = "#cccccc")]
    pub no_data_color: String,
}

/// Execute the classify subcommand.
pub fn run_classify(args: &ClassifyArgs) -> Result<u8> {
    let result = args.input.load_and_join()?;
    let field = args.field.as_str();
    let extract = |f: &riskmap_join::EnrichedFeature| f.number(field);

    let options = ClassifyOptions {
        method: args.method,
        no_data_color: args.no_data_color.clone(),
        ..ClassifyOptions::default()
    };
    let scale = classify(&result.features, extract, &args.colors, &options)
        .context("classification failed")?;

    println!("Field: {field} ({:?})", args.method);
    match scale.breaks() {
        Some(breaks) => {
            let thresholds: Vec<String> = breaks.thresholds().iter().map(|t| format!("{t}")).collect();
            println!("  breaks: {}", thresholds.join(", "));
        }
        None => println!("  breaks: none (no values)"),
    }
    if let Some(summary) = summarize(&result.features, extract) {
        println!(
            "  n={} min={} max={} mean={:.2} median={} sd={:.2}",
            summary.count, summary.min, summary.max, summary.mean, summary.median, summary.std_dev
        );
    }

    let mut rows: Vec<_> = result.features.iter().filter(|f| !f.code.is_empty()).collect();
    rows.sort_by(|a, b| a.code.cmp(&b.code));
    println!();
    for feature in rows {
        let props = &feature.feature.properties;
        let name = props
            .canonical_name
            .as_deref()
            .or(props.raw_name.as_deref())
            .unwrap_or("?");
        let value = scale
            .value_of(&feature.code)
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        println!(
            "  {:<6} {:<28} {:>10}  {}",
            feature.code,
            name,
            value,
            scale.color_for_code(&feature.code)
        );
    }
    Ok(0)
}
