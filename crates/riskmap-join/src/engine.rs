//! # Join Engine
//!
//! `join()` builds a code → record lookup from the dataset, walks the
//! geometry collection once, and emits an [`EnrichedFeature`] per feature.

use std::collections::{BTreeSet, HashMap};

use riskmap_core::{DataRecord, FeatureCollection, GeometryFeature, TabularDataset, Timestamp};
use serde::{Deserialize, Serialize};

use crate::alignment::AlignmentReport;

/// Which fields carry the join key on each side, and how to label the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinConfig {
    /// Geometry property holding the data code.
    pub geometry_code_field: String,
    /// Record field holding the data code.
    pub data_code_field: String,
    /// Label stamped on every enriched feature.
    pub source_name: String,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            geometry_code_field: "dataCode".to_string(),
            data_code_field: "municipio".to_string(),
            source_name: "unknown".to_string(),
        }
    }
}

impl JoinConfig {
    /// Default fields, labelled with `source_name`.
    pub fn for_source(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            ..Self::default()
        }
    }
}

/// A geometry feature with the record joined onto it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedFeature {
    #[serde(flatten)]
    pub feature: GeometryFeature,
    /// The join key read (or synthesized) for this feature; empty when the
    /// feature carries no usable code.
    pub code: String,
    /// The matched record.
    pub data: Option<DataRecord>,
    /// True iff `data` is present.
    pub has_data: bool,
    /// Label of the dataset this feature was joined against.
    pub data_source_name: String,
}

impl EnrichedFeature {
    fn new(feature: GeometryFeature, code: String, data: Option<DataRecord>, source: &str) -> Self {
        Self {
            feature,
            code,
            has_data: data.is_some(),
            data,
            data_source_name: source.to_string(),
        }
    }

    /// A numeric field of the joined record.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.data.as_ref()?.number(field)
    }
}

/// Summary of one join call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinMetadata {
    pub total_features: usize,
    pub features_with_data: usize,
    pub alignment_ratio: f64,
    /// Codes of features that found no record, sorted and deduplicated.
    pub missing_data_codes: Vec<String>,
    /// Codes that appeared on more than one record; the last one won.
    pub duplicate_codes: Vec<String>,
    /// Records dropped because they had no code.
    pub records_without_code: usize,
    pub data_source_name: String,
    pub dataset_version: String,
    pub joined_at: Timestamp,
}

/// Output of [`join`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResult {
    pub features: Vec<EnrichedFeature>,
    pub alignment: AlignmentReport,
    pub metadata: JoinMetadata,
}

impl JoinResult {
    /// First enriched feature carrying `code`.
    pub fn feature_by_code(&self, code: &str) -> Option<&EnrichedFeature> {
        self.features.iter().find(|f| f.code == code)
    }

    /// Features that found a record.
    pub fn with_data(&self) -> impl Iterator<Item = &EnrichedFeature> {
        self.features.iter().filter(|f| f.has_data)
    }
}

/// Join `dataset` onto `collection`.
///
/// The feature's code comes from `config.geometry_code_field`; when that
/// property is absent the code is synthesized as `state || pad3(compact)`.
/// The input collection is not modified.
pub fn join(collection: &FeatureCollection, dataset: &TabularDataset, config: &JoinConfig) -> JoinResult {
    let mut lookup: HashMap<String, &DataRecord> = HashMap::with_capacity(dataset.records.len());
    let mut duplicates: BTreeSet<String> = BTreeSet::new();
    let mut records_without_code = 0usize;

    for record in &dataset.records {
        let Some(code) = record.code_for(&config.data_code_field) else {
            records_without_code += 1;
            continue;
        };
        // Last write wins.
        if lookup.insert(code.clone(), record).is_some() {
            tracing::debug!(code = %code, source = %config.source_name, "duplicate record code, keeping later record");
            duplicates.insert(code);
        }
    }
    if records_without_code > 0 {
        tracing::warn!(
            count = records_without_code,
            field = %config.data_code_field,
            source = %config.source_name,
            "records without a code were not joined"
        );
    }

    let mut features = Vec::with_capacity(collection.features.len());
    let mut geometry_codes = BTreeSet::new();
    let mut missing = BTreeSet::new();

    for feature in &collection.features {
        let code = feature
            .properties
            .field_code(&config.geometry_code_field)
            .or_else(|| {
                feature
                    .properties
                    .synthesized_data_code()
                    .map(|c| c.to_string())
            })
            .unwrap_or_default();

        let data = if code.is_empty() {
            None
        } else {
            geometry_codes.insert(code.clone());
            lookup.get(&code).map(|r| (*r).clone())
        };
        if data.is_none() {
            missing.insert(code.clone());
        }
        features.push(EnrichedFeature::new(feature.clone(), code, data, &config.source_name));
    }

    let data_codes: BTreeSet<String> = lookup.into_keys().collect();
    let alignment = AlignmentReport::compute(&geometry_codes, &data_codes);
    let features_with_data = features.iter().filter(|f| f.has_data).count();

    tracing::debug!(
        source = %config.source_name,
        total = features.len(),
        with_data = features_with_data,
        alignment_ratio = alignment.alignment_ratio,
        "join complete"
    );

    let metadata = JoinMetadata {
        total_features: features.len(),
        features_with_data,
        alignment_ratio: alignment.alignment_ratio,
        missing_data_codes: missing.into_iter().filter(|c| !c.is_empty()).collect(),
        duplicate_codes: duplicates.into_iter().collect(),
        records_without_code,
        data_source_name: config.source_name.clone(),
        dataset_version: dataset.version.clone(),
        joined_at: Timestamp::now(),
    };

    JoinResult {
        features,
        alignment,
        metadata,
    }
}
