//! File loading and writing shared by the subcommands.

use std::path::Path;

use anyhow::{Context, Result};
use riskmap_core::{FeatureCollection, TabularDataset};
use serde::Serialize;
use serde_json::Value;

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Load a GeoJSON feature collection.
pub fn load_geometry(path: &Path) -> Result<FeatureCollection> {
    let collection = FeatureCollection::from_value(read_json(path)?)
        .with_context(|| format!("invalid feature collection: {}", path.display()))?;
    tracing::info!(path = %path.display(), features = collection.len(), "loaded geometry");
    Ok(collection)
}

/// Load a tabular dataset.
pub fn load_dataset(path: &Path) -> Result<TabularDataset> {
    let dataset = TabularDataset::from_value(read_json(path)?)
        .with_context(|| format!("invalid dataset: {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        records = dataset.len(),
        skipped = dataset.skipped_records,
        version = %dataset.version,
        "loaded dataset"
    );
    Ok(dataset)
}

/// Write `value` as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "wrote output");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_geometry_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.geojson");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_geometry(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.geojson"));

        let missing = load_dataset(&dir.path().join("absent.json")).unwrap_err();
        assert!(format!("{missing:#}").contains("failed to read"));
    }

    #[test]
    fn test_write_json_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("nested").join("value.json");
        write_json(&path, &serde_json::json!({"ok": true})).unwrap();
        let back: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back["ok"], true);
    }
}
