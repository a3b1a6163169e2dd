//! # Color Scale
//!
//! [`classify`] extracts one value per enriched feature, computes breaks and
//! returns a [`ColorScale`] that answers "which color is this code".

use std::collections::HashMap;

use riskmap_join::EnrichedFeature;
use serde::{Deserialize, Serialize};

use crate::breaks::{ClassificationBreaks, ClassificationMethod};
use crate::error::ClassifyError;

/// Knobs for [`classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassifyOptions {
    pub method: ClassificationMethod,
    /// Color for codes without data, or with no usable value.
    pub no_data_color: String,
    /// Placeholder value recorded for codes without data.
    pub missing_data_value: f64,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            method: ClassificationMethod::Quantile,
            no_data_color: "#cccccc".to_string(),
            missing_data_value: -1.0,
        }
    }
}

/// Code → color lookup derived from one classification call.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    breaks: Option<ClassificationBreaks>,
    colors: Vec<String>,
    values: HashMap<String, f64>,
    missing: HashMap<String, f64>,
    no_data_color: String,
}

impl ColorScale {
    /// The breaks, or `None` for a constant no-data scale.
    pub fn breaks(&self) -> Option<&ClassificationBreaks> {
        self.breaks.as_ref()
    }

    /// The palette, low to high.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Whether every code resolves to the no-data color.
    pub fn is_constant(&self) -> bool {
        self.breaks.is_none()
    }

    /// The classified value for `code`, if it had data.
    pub fn value_of(&self, code: &str) -> Option<f64> {
        self.values.get(code).copied()
    }

    /// The placeholder recorded for `code` if it had no data.
    pub fn missing_value_of(&self, code: &str) -> Option<f64> {
        self.missing.get(code).copied()
    }

    /// Color for a raw value. Values below the lowest threshold take the
    /// first color; the bin index is clamped to the palette.
    pub fn color_for_value(&self, value: f64) -> &str {
        let Some(breaks) = &self.breaks else {
            return &self.no_data_color;
        };
        if !value.is_finite() {
            return &self.no_data_color;
        }
        let bin = breaks.bin_for(value).unwrap_or(0);
        let last = self.colors.len().saturating_sub(1);
        self.colors
            .get(bin.min(last))
            .map_or(self.no_data_color.as_str(), String::as_str)
    }

    /// Color for a feature code. Codes without data, and codes the scale
    /// has never seen, take the no-data color.
    pub fn color_for_code(&self, code: &str) -> &str {
        match self.values.get(code) {
            Some(&value) => self.color_for_value(value),
            None => &self.no_data_color,
        }
    }

    /// Consume the scale into a plain lookup function.
    pub fn into_fn(self) -> impl Fn(&str) -> String {
        move |code: &str| self.color_for_code(code).to_string()
    }
}

/// Build a color scale over the features that carry data.
///
/// `extract` is called only for features with `has_data`; `None` or a
/// non-finite result leaves that code unclassified. With no values at all
/// the scale is constant and yields `options.no_data_color`.
pub fn classify<F, S>(
    features: &[EnrichedFeature],
    extract: F,
    colors: &[S],
    options: &ClassifyOptions,
) -> Result<ColorScale, ClassifyError>
where
    F: Fn(&EnrichedFeature) -> Option<f64>,
    S: AsRef<str>,
{
    if colors.is_empty() {
        return Err(ClassifyError::EmptyPalette);
    }
    let colors: Vec<String> = colors.iter().map(|c| c.as_ref().to_string()).collect();

    let mut values = HashMap::new();
    let mut missing = HashMap::new();
    for feature in features {
        let value = if feature.has_data {
            extract(feature).filter(|v| v.is_finite())
        } else {
            None
        };
        match value {
            Some(v) => {
                values.insert(feature.code.clone(), v);
            }
            None => {
                missing.insert(feature.code.clone(), options.missing_data_value);
            }
        }
    }

    let extracted: Vec<f64> = values.values().copied().collect();
    let breaks = ClassificationBreaks::compute(&extracted, options.method, colors.len());
    if breaks.is_none() {
        tracing::debug!(features = features.len(), "no values to classify, scale is constant");
    } else {
        tracing::debug!(
            classified = values.len(),
            without_data = missing.len(),
            method = ?options.method,
            "color scale built"
        );
    }

    Ok(ColorScale {
        breaks,
        colors,
        values,
        missing,
        no_data_color: options.no_data_color.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use riskmap_core::{DataRecord, FeatureCollection, FeatureProperties, GeometryFeature, TabularDataset};
    use riskmap_join::{join, JoinConfig};
    use serde_json::{json, Map};

    const PALETTE: [&str; 5] = ["#ffffb2", "#fecc5c", "#fd8d3c", "#f03b20", "#bd0026"];

    fn joined(values: &[(u16, Option<f64>)]) -> Vec<EnrichedFeature> {
        let features = values
            .iter()
            .map(|&(c, _)| {
                GeometryFeature::new(
                    FeatureProperties {
                        state_code: Some(11),
                        compact_code: Some(c),
                        ..FeatureProperties::default()
                    },
                    None,
                )
            })
            .collect();
        let records = values
            .iter()
            .filter_map(|&(c, v)| {
                let v = v?;
                let mut extra = Map::new();
                extra.insert("indice".into(), json!(v));
                Some(DataRecord::new(format!("11{c:03}"), extra))
            })
            .collect();
        join(
            &FeatureCollection::new(features),
            &TabularDataset::new("t", records),
            &JoinConfig::default(),
        )
        .features
    }

    fn indice(f: &EnrichedFeature) -> Option<f64> {
        f.number("indice")
    }

    #[test]
    fn test_empty_palette_rejected() {
        let features = joined(&[(1, Some(1.0))]);
        let empty: [&str; 0] = [];
        assert_eq!(
            classify(&features, indice, &empty, &ClassifyOptions::default()),
            Err(ClassifyError::EmptyPalette)
        );
    }

    #[test]
    fn test_no_values_gives_constant_scale() {
        let features = joined(&[(1, None), (2, None)]);
        let scale = classify(&features, indice, &PALETTE, &ClassifyOptions::default()).unwrap();
        assert!(scale.is_constant());
        assert_eq!(scale.color_for_code("11001"), "#cccccc");
        assert_eq!(scale.color_for_value(100.0), "#cccccc");
        assert_eq!(scale.missing_value_of("11002"), Some(-1.0));
    }

    #[test]
    fn test_features_without_data_never_binned() {
        let features = joined(&[(1, Some(10.0)), (2, Some(20.0)), (3, None)]);
        let options = ClassifyOptions {
            no_data_color: "#000000".into(),
            missing_data_value: 0.0,
            ..ClassifyOptions::default()
        };
        let scale = classify(&features, indice, &PALETTE, &options).unwrap();
        assert_eq!(scale.color_for_code("11003"), "#000000");
        assert_eq!(scale.missing_value_of("11003"), Some(0.0));
        assert_eq!(scale.value_of("11003"), None);
        assert_eq!(scale.color_for_code("11999"), "#000000");
    }

    #[test]
    fn test_extractor_miss_resolves_to_no_data() {
        let features = joined(&[(1, Some(10.0)), (2, Some(20.0))]);
        let scale = classify(
            &features,
            |f| if f.code == "11002" { None } else { f.number("indice") },
            &PALETTE,
            &ClassifyOptions::default(),
        )
        .unwrap();
        assert_eq!(scale.color_for_code("11002"), "#cccccc");
        assert_ne!(scale.color_for_code("11001"), "#cccccc");
    }

    #[test]
    fn test_value_below_lowest_threshold_takes_first_color() {
        let features = joined(&[(1, Some(10.0)), (2, Some(20.0))]);
        let scale = classify(&features, indice, &PALETTE, &ClassifyOptions::default()).unwrap();
        assert_eq!(scale.color_for_value(-5.0), PALETTE[0]);
        assert_eq!(scale.color_for_value(f64::NAN), "#cccccc");
    }

    #[test]
    fn test_equal_interval_maps_extremes_to_ends() {
        let features = joined(&[(1, Some(0.0)), (2, Some(50.0)), (3, Some(100.0))]);
        let options = ClassifyOptions {
            method: ClassificationMethod::EqualInterval,
            ..ClassifyOptions::default()
        };
        let scale = classify(&features, indice, &PALETTE, &options).unwrap();
        assert_eq!(scale.color_for_code("11001"), PALETTE[0]);
        assert_eq!(scale.color_for_code("11002"), PALETTE[2]);
        assert_eq!(scale.color_for_code("11003"), PALETTE[4]);
    }

    #[test]
    fn test_into_fn() {
        let features = joined(&[(1, Some(10.0))]);
        let f = classify(&features, indice, &PALETTE, &ClassifyOptions::default())
            .unwrap()
            .into_fn();
        assert_eq!(f("11001"), PALETTE[4]);
        assert_eq!(f("11002"), "#cccccc");
    }

    #[test]
    fn test_options_deserialize_kebab_method() {
        let o: ClassifyOptions = serde_json::from_value(json!({"method": "equal-interval"})).unwrap();
        assert_eq!(o.method, ClassificationMethod::EqualInterval);
        assert_eq!(o.no_data_color, "#cccccc");
    }
}
