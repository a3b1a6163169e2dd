//! # riskmap CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use riskmap_cli::classify::{run_classify, ClassifyArgs};
use riskmap_cli::join::{run_join, JoinArgs};
use riskmap_cli::layers::{run_layers, LayersArgs};
use riskmap_cli::validate::{run_validate, ValidateArgs};

/// Municipal risk map toolchain.
///
/// Validates municipal geometry against the state catalog, joins tabular
/// datasets onto it, and derives choropleth color scales.
#[derive(Parser, Debug)]
#[command(name = "riskmap", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a geometry file against the municipal catalog.
    Validate(ValidateArgs),

    /// Join a dataset onto geometry and report code alignment.
    Join(JoinArgs),

    /// Classify a numeric field into a choropleth color scale.
    Classify(ClassifyArgs),

    /// Show the layer table.
    Layers(LayersArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Logs go to stderr so reports on stdout stay pipeable.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "riskmap CLI starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Join(args) => run_join(&args),
        Commands::Classify(args) => run_classify(&args),
        Commands::Layers(args) => run_layers(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskmap_classify::ClassificationMethod;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from(["riskmap", "validate", "--geometry", "gto.geojson"]).unwrap();
        if let Commands::Validate(args) = cli.command {
            assert_eq!(args.geometry, PathBuf::from("gto.geojson"));
            assert!(!args.json);
            assert!(args.corrected.is_none());
        } else {
            panic!("expected validate");
        }
    }

    #[test]
    fn cli_parse_validate_requires_geometry() {
        assert!(Cli::try_parse_from(["riskmap", "validate"]).is_err());
    }

    #[test]
    fn cli_parse_join_defaults() {
        let cli = Cli::try_parse_from([
            "riskmap", "join", "--geometry", "g.json", "--data", "d.json",
        ])
        .unwrap();
        if let Commands::Join(args) = cli.command {
            assert_eq!(args.input.geometry_field, "dataCode");
            assert_eq!(args.input.data_field, "municipio");
            assert!(args.input.source.is_none());
            assert!(args.output.is_none());
        } else {
            panic!("expected join");
        }
    }

    #[test]
    fn cli_parse_classify_palette_and_method() {
        let cli = Cli::try_parse_from([
            "riskmap",
            "-vv",
            "classify",
            "--geometry",
            "g.json",
            "--data",
            "d.json",
            "--field",
            "tasa",
            "--method",
            "equal-interval",
            "--colors",
            "#fff,#888,#000",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        if let Commands::Classify(args) = cli.command {
            assert_eq!(args.field, "tasa");
            assert_eq!(args.method, ClassificationMethod::EqualInterval);
            assert_eq!(args.colors, vec!["#fff", "#888", "#000"]);
            assert_eq!(args.no_data_color, "#cccccc");
        } else {
            panic!("expected classify");
        }
    }

    #[test]
    fn cli_parse_classify_default_palette() {
        let cli = Cli::try_parse_from([
            "riskmap", "classify", "--geometry", "g", "--data", "d", "--field", "x",
        ])
        .unwrap();
        if let Commands::Classify(args) = cli.command {
            assert_eq!(args.colors.len(), 5);
            assert_eq!(args.method, ClassificationMethod::Quantile);
        } else {
            panic!("expected classify");
        }
    }

    #[test]
    fn cli_parse_rejects_unknown_method() {
        let parsed = Cli::try_parse_from([
            "riskmap", "classify", "--geometry", "g", "--data", "d", "--field", "x", "--method",
            "jenks",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_parse_layers() {
        let cli = Cli::try_parse_from(["riskmap", "layers", "--json"]).unwrap();
        if let Commands::Layers(args) = cli.command {
            assert!(args.json);
            assert!(args.config.is_none());
        } else {
            panic!("expected layers");
        }
    }
}
