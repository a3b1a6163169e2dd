//! # Code Crosswalk
//!
//! Relates the compact codes of geometry sources to the data codes of
//! tabular sources. The four point lookups live on [`Catalog`]; this module
//! adds the set-level alignment check and the annotation pass that attaches
//! `dataCode` and `canonicalName` to geometry properties.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CompactCode, DataCode};
use crate::geometry::FeatureCollection;

/// Outcome of checking a compact-code set against a data-code set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosswalkAlignment {
    /// Compact codes whose expected data code is present.
    pub matched: Vec<CompactCode>,
    /// Compact codes whose expected data code is absent, or that are not in
    /// the catalog at all.
    pub missing_in_data: Vec<CompactCode>,
    /// Data codes of known units whose compact code is absent.
    pub missing_in_geometry: Vec<DataCode>,
    /// Data codes (as given) that map to no catalog unit.
    pub unknown_data_codes: Vec<String>,
    /// `|matched| / max(|compact|, |data|)`; 1.0 when both sets are empty.
    pub alignment_ratio: f64,
}

impl CrosswalkAlignment {
    /// Whether every code on each side found its counterpart.
    pub fn is_fully_aligned(&self) -> bool {
        self.missing_in_data.is_empty()
            && self.missing_in_geometry.is_empty()
            && self.unknown_data_codes.is_empty()
    }
}

/// Check a set of compact codes against a set of data codes through the
/// catalog. Duplicates on either side are counted once.
pub fn validate_alignment<C, D, S>(catalog: &Catalog, compact_codes: C, data_codes: D) -> CrosswalkAlignment
where
    C: IntoIterator<Item = CompactCode>,
    D: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let compact: BTreeSet<CompactCode> = compact_codes.into_iter().collect();
    let data: BTreeSet<String> = data_codes
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .collect();

    let mut matched = Vec::new();
    let mut missing_in_data = Vec::new();
    for &code in &compact {
        match catalog.data_code_of(code) {
            Some(expected) if data.contains(expected.as_str()) => matched.push(code),
            _ => missing_in_data.push(code),
        }
    }

    let mut missing_in_geometry = Vec::new();
    let mut unknown_data_codes = Vec::new();
    for code in &data {
        match catalog.unit_by_data_code(code) {
            Some(unit) if compact.contains(&unit.compact_code) => {}
            Some(unit) => missing_in_geometry.push(unit.data_code.clone()),
            None => unknown_data_codes.push(code.clone()),
        }
    }

    let denominator = compact.len().max(data.len());
    let alignment_ratio = if denominator == 0 {
        1.0
    } else {
        matched.len() as f64 / denominator as f64
    };

    tracing::debug!(
        matched = matched.len(),
        missing_in_data = missing_in_data.len(),
        missing_in_geometry = missing_in_geometry.len(),
        unknown = unknown_data_codes.len(),
        alignment_ratio,
        "crosswalk alignment computed"
    );

    CrosswalkAlignment {
        matched,
        missing_in_data,
        missing_in_geometry,
        unknown_data_codes,
        alignment_ratio,
    }
}

/// Copy of `collection` with `dataCode` attached to every feature that has
/// both a state and a compact code, and `canonicalName` attached whenever
/// that data code resolves in the catalog.
pub fn annotate_collection(collection: &FeatureCollection, catalog: &Catalog) -> FeatureCollection {
    let mut annotated = collection.clone();
    for feature in &mut annotated.features {
        let Some(code) = feature.properties.synthesized_data_code() else {
            continue;
        };
        if let Some(unit) = catalog.unit_by_data_code(code.as_str()) {
            feature.properties.canonical_name = Some(unit.official_name.clone());
        }
        feature.properties.data_code = Some(code.to_string());
    }
    annotated
}
