//! Subcommand handlers run end to end against files in a temp directory.

use std::path::{Path, PathBuf};

use riskmap_classify::ClassificationMethod;
use riskmap_cli::classify::{run_classify, ClassifyArgs, DEFAULT_PALETTE};
use riskmap_cli::join::{run_join, JoinArgs, JoinInputArgs};
use riskmap_cli::layers::{run_layers, LayersArgs};
use riskmap_cli::validate::{run_validate, ValidateArgs};
use riskmap_core::Catalog;
use serde_json::{json, Value};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string(value).unwrap()).unwrap();
    path
}

fn geometry(renumber: &[(u16, u16)]) -> Value {
    let features: Vec<Value> = Catalog::guanajuato()
        .units()
        .iter()
        .map(|unit| {
            let compact = unit.compact_code.get();
            let code = renumber
                .iter()
                .find(|(c, _)| *c == compact)
                .map_or(compact, |(_, to)| *to);
            json!({
                "type": "Feature",
                "properties": {"stateCode": 11, "compactCode": code, "rawName": unit.official_name},
                "geometry": {"type": "Polygon", "coordinates": [[[-101.0, 21.0], [-100.9, 21.1], [-101.0, 21.0]]]}
            })
        })
        .collect();
    json!({"type": "FeatureCollection", "features": features})
}

fn dataset(count: u16) -> Value {
    let records: Vec<Value> = (1..=count)
        .map(|c| json!({"municipio": format!("11{c:03}"), "tasa": f64::from(c) * 1.5}))
        .collect();
    json!({"version": "2024.2", "source": "fiscalia", "records": records})
}

fn join_input(dir: &TempDir, data_records: u16) -> JoinInputArgs {
    JoinInputArgs {
        geometry: write(dir.path(), "gto.geojson", &geometry(&[])),
        data: write(dir.path(), "tasa.json", &dataset(data_records)),
        source: None,
        geometry_field: "dataCode".into(),
        data_field: "municipio".into(),
    }
}

#[test]
fn test_validate_clean_geometry_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    let args = ValidateArgs {
        geometry: write(dir.path(), "gto.geojson", &geometry(&[])),
        json: true,
        corrected: None,
    };
    assert_eq!(run_validate(&args).unwrap(), 0);
}

#[test]
fn test_validate_swapped_codes_then_corrected() {
    let dir = tempfile::tempdir().unwrap();
    let corrected = dir.path().join("out").join("corrected.geojson");
    let args = ValidateArgs {
        geometry: write(dir.path(), "gto.geojson", &geometry(&[(37, 26), (26, 37)])),
        json: false,
        corrected: Some(corrected.clone()),
    };
    assert_eq!(run_validate(&args).unwrap(), 1);
    assert!(corrected.exists());

    let recheck = ValidateArgs {
        geometry: corrected,
        json: false,
        corrected: None,
    };
    assert_eq!(run_validate(&recheck).unwrap(), 0);
}

#[test]
fn test_validate_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let args = ValidateArgs {
        geometry: dir.path().join("absent.geojson"),
        json: false,
        corrected: None,
    };
    assert!(run_validate(&args).is_err());
}

#[test]
fn test_join_writes_enriched_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("joined.json");
    let args = JoinArgs {
        input: join_input(&dir, 40),
        output: Some(output.clone()),
    };
    assert_eq!(run_join(&args).unwrap(), 0);

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["features"].as_array().unwrap().len(), 46);
    assert_eq!(written["metadata"]["featuresWithData"], 40);
    assert_eq!(written["metadata"]["dataSourceName"], "fiscalia");
    assert_eq!(written["alignment"]["codesOnlyInGeometry"].as_array().unwrap().len(), 6);
}

#[test]
fn test_join_source_flag_overrides_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let mut input = join_input(&dir, 46);
    input.source = Some("SESNSP".into());
    let result = input.load_and_join().unwrap();
    assert_eq!(result.metadata.data_source_name, "SESNSP");
    assert_eq!(result.alignment.alignment_ratio, 1.0);
}

#[test]
fn test_classify_runs_over_joined_data() {
    let dir = tempfile::tempdir().unwrap();
    let args = ClassifyArgs {
        input: join_input(&dir, 46),
        field: "tasa".into(),
        method: ClassificationMethod::Quantile,
        colors: DEFAULT_PALETTE.split(',').map(String::from).collect(),
        no_data_color: "#cccccc".into(),
    };
    assert_eq!(run_classify(&args).unwrap(), 0);
}

#[test]
fn test_classify_empty_palette_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let args = ClassifyArgs {
        input: join_input(&dir, 10),
        field: "tasa".into(),
        method: ClassificationMethod::EqualInterval,
        colors: Vec::new(),
        no_data_color: "#cccccc".into(),
    };
    assert!(run_classify(&args).is_err());
}

#[test]
fn test_layers_builtin_and_yaml() {
    assert_eq!(run_layers(&LayersArgs { config: None, json: false }).unwrap(), 0);

    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("layers.yaml");
    std::fs::write(
        &good,
        "layers:\n  - {id: indice_riesgo, displayName: Riesgo, dataSource: r.json, defaultVisible: true}\n",
    )
    .unwrap();
    assert_eq!(run_layers(&LayersArgs { config: Some(good), json: true }).unwrap(), 0);

    let bad = dir.path().join("bad.yaml");
    std::fs::write(&bad, "layers:\n  - {id: a, displayName: A, dataSource: a}\n").unwrap();
    let err = run_layers(&LayersArgs { config: Some(bad), json: false }).unwrap_err();
    assert!(format!("{err:#}").contains("default-visible"));
}
