//! # Layers Subcommand
//!
//! Prints the layer table (built-in, or a YAML file) and the statistics of
//! a freshly initialised layer store.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use riskmap_layers::{LayerConfig, LayerStore};

/// Arguments for the layers subcommand.
#[derive(Args, Debug)]
pub struct LayersArgs {
    /// YAML layer table replacing the built-in one.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the initial layer snapshot as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the layers subcommand.
pub fn run_layers(args: &LayersArgs) -> Result<u8> {
    let config = match &args.config {
        Some(path) => LayerConfig::from_yaml_file(path)
            .with_context(|| format!("invalid layer table: {}", path.display()))?,
        None => LayerConfig::builtin(),
    };
    let store = LayerStore::new(config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&store.get_all())?);
        return Ok(0);
    }

    for layer in store.get_all() {
        let source = store
            .config()
            .get(&layer.id)
            .map_or("", |d| d.data_source.as_str());
        println!(
            "{} {:<22} {:<11} {:<32} {}",
            if layer.is_visible { "*" } else { " " },
            layer.id,
            layer.visualization_kind.as_str(),
            layer.display_name,
            source
        );
    }

    let stats = store.get_statistics();
    println!();
    println!("{} layers, {} visible", stats.total, stats.visible);
    for (kind, count) in &stats.by_visualization_kind {
        println!("  {kind}: {count}");
    }
    Ok(0)
}
