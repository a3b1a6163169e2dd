//! # Layer Configuration
//!
//! Static table of the layers the map knows about. The built-in table is
//! compiled in; a deployment can replace it with a YAML file of the same
//! shape:
//!
//! ```yaml
//! layers:
//!   - id: indice_riesgo
//!     displayName: Índice de riesgo municipal
//!     description: Índice compuesto de riesgo por municipio
//!     dataSource: data/indice_riesgo.json
//!     defaultVisible: true
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a layer is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationKind {
    /// Area fill per municipality.
    Choropleth,
    /// One symbol per point record.
    Markers,
    /// Kernel density surface.
    Heatmap,
    /// Outline only.
    Boundary,
}

impl VisualizationKind {
    /// Fixed id → kind table. Ids not in the table are choropleths.
    pub fn for_layer_id(id: &str) -> Self {
        match id {
            "fosas_clandestinas" | "colectivos_busqueda" => Self::Markers,
            "densidad_incidentes" => Self::Heatmap,
            "limites_municipales" => Self::Boundary,
            _ => Self::Choropleth,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Choropleth => "choropleth",
            Self::Markers => "markers",
            Self::Heatmap => "heatmap",
            Self::Boundary => "boundary",
        }
    }
}

impl std::fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the layer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDefinition {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// Where the external loader fetches the layer's dataset.
    pub data_source: String,
    #[serde(default)]
    pub default_visible: bool,
}

impl LayerDefinition {
    fn builtin(id: &str, display_name: &str, description: &str, default_visible: bool) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            data_source: format!("data/{id}.json"),
            default_visible,
        }
    }
}

/// Errors loading or validating a layer table.
#[derive(Error, Debug)]
pub enum LayerConfigError {
    #[error("layer table is empty")]
    Empty,

    #[error("duplicate layer id {0:?}")]
    DuplicateId(String),

    /// Exactly one layer must be visible by default; it is the layer
    /// `reset()` returns to.
    #[error("expected exactly one default-visible layer, found {0}")]
    PrimaryLayerCount(usize),

    #[error("invalid layer YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Deserialize)]
struct LayerConfigFile {
    layers: Vec<LayerDefinition>,
}

/// A validated layer table: unique ids, exactly one primary layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    layers: Vec<LayerDefinition>,
    primary: usize,
}

impl LayerConfig {
    /// Validate a layer table.
    pub fn new(layers: Vec<LayerDefinition>) -> Result<Self, LayerConfigError> {
        if layers.is_empty() {
            return Err(LayerConfigError::Empty);
        }
        let mut seen = HashSet::with_capacity(layers.len());
        for layer in &layers {
            if !seen.insert(layer.id.as_str()) {
                return Err(LayerConfigError::DuplicateId(layer.id.clone()));
            }
        }
        let visible: Vec<usize> = layers
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.default_visible.then_some(i))
            .collect();
        let &[primary] = visible.as_slice() else {
            return Err(LayerConfigError::PrimaryLayerCount(visible.len()));
        };
        Ok(Self { layers, primary })
    }

    /// The compiled-in layer table.
    pub fn builtin() -> Self {
        let layers = vec![
            LayerDefinition::builtin(
                "indice_riesgo",
                "Índice de riesgo municipal",
                "Índice compuesto de riesgo por municipio",
                true,
            ),
            LayerDefinition::builtin(
                "desapariciones",
                "Personas desaparecidas",
                "Personas desaparecidas y no localizadas por municipio",
                false,
            ),
            LayerDefinition::builtin(
                "homicidios",
                "Homicidios dolosos",
                "Víctimas de homicidio doloso por cada 100 mil habitantes",
                false,
            ),
            LayerDefinition::builtin(
                "fosas_clandestinas",
                "Fosas clandestinas",
                "Sitios de inhumación clandestina reportados",
                false,
            ),
            LayerDefinition::builtin(
                "colectivos_busqueda",
                "Colectivos de búsqueda",
                "Sedes de colectivos de familias buscadoras",
                false,
            ),
            LayerDefinition::builtin(
                "densidad_incidentes",
                "Densidad de incidentes",
                "Concentración espacial de incidentes de alto impacto",
                false,
            ),
            LayerDefinition::builtin(
                "limites_municipales",
                "Límites municipales",
                "Contorno de los 46 municipios",
                false,
            ),
        ];
        Self { layers, primary: 0 }
    }

    /// Parse and validate a YAML layer table.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, LayerConfigError> {
        let file: LayerConfigFile = serde_yaml::from_str(yaml)?;
        Self::new(file.layers)
    }

    /// Read, parse and validate a YAML layer table.
    pub fn from_yaml_file(path: &Path) -> Result<Self, LayerConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn layers(&self) -> &[LayerDefinition] {
        &self.layers
    }

    /// The single default-visible layer.
    pub fn primary(&self) -> &LayerDefinition {
        &self.layers[self.primary]
    }

    pub fn get(&self, id: &str) -> Option<&LayerDefinition> {
        self.layers.iter().find(|l| l.id == id)
    }
}
