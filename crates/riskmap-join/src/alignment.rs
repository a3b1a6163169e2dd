//! # Alignment Report
//!
//! Set comparison between the codes present in a geometry collection and
//! the codes present in a tabular dataset.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// How the geometry code set and the data code set overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentReport {
    /// Codes present on both sides, sorted.
    pub matched_codes: Vec<String>,
    /// Codes with geometry but no record, sorted.
    pub codes_only_in_geometry: Vec<String>,
    /// Codes with a record but no geometry, sorted.
    pub codes_only_in_data: Vec<String>,
    /// `|matched| / max(|geometry codes|, |data codes|)`.
    pub alignment_ratio: f64,
}

impl AlignmentReport {
    /// Compare two code sets. Two empty sets are identical and align fully.
    pub fn compute(geometry_codes: &BTreeSet<String>, data_codes: &BTreeSet<String>) -> Self {
        let matched_codes: Vec<String> = geometry_codes.intersection(data_codes).cloned().collect();
        let codes_only_in_geometry = geometry_codes.difference(data_codes).cloned().collect();
        let codes_only_in_data = data_codes.difference(geometry_codes).cloned().collect();

        let denominator = geometry_codes.len().max(data_codes.len());
        let alignment_ratio = if denominator == 0 {
            1.0
        } else {
            matched_codes.len() as f64 / denominator as f64
        };

        Self {
            matched_codes,
            codes_only_in_geometry,
            codes_only_in_data,
            alignment_ratio,
        }
    }

    /// Whether both code sets are identical.
    pub fn is_fully_aligned(&self) -> bool {
        self.codes_only_in_geometry.is_empty() && self.codes_only_in_data.is_empty()
    }
}
