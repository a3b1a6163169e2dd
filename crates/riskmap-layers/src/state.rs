//! Per-layer runtime state and aggregate counts.

use std::collections::BTreeMap;

use riskmap_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::config::{LayerDefinition, VisualizationKind};

/// Runtime state of one layer, as broadcast to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerState {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub is_visible: bool,
    pub is_loading: bool,
    pub has_data: bool,
    pub visualization_kind: VisualizationKind,
    /// Number of records the loader delivered, when it reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
    /// Time of the last loading or data change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<Timestamp>,
}

impl LayerState {
    /// Initial state for a configured layer.
    pub(crate) fn initial(definition: &LayerDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            display_name: definition.display_name.clone(),
            description: definition.description.clone(),
            is_visible: definition.default_visible,
            is_loading: false,
            has_data: false,
            visualization_kind: VisualizationKind::for_layer_id(&definition.id),
            record_count: None,
            last_updated: None,
        }
    }
}

/// Aggregate counts over a snapshot of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerStatistics {
    pub total: usize,
    pub visible: usize,
    pub with_data: usize,
    pub loading: usize,
    pub by_visualization_kind: BTreeMap<VisualizationKind, usize>,
}

impl LayerStatistics {
    pub fn from_states(states: &[LayerState]) -> Self {
        let mut stats = Self {
            total: states.len(),
            ..Self::default()
        };
        for state in states {
            stats.visible += usize::from(state.is_visible);
            stats.with_data += usize::from(state.has_data);
            stats.loading += usize::from(state.is_loading);
            *stats
                .by_visualization_kind
                .entry(state.visualization_kind)
                .or_default() += 1;
        }
        stats
    }
}
