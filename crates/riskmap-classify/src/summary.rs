//! Descriptive statistics over the values a classification would bin.

use std::collections::HashMap;

use riskmap_join::EnrichedFeature;
use serde::{Deserialize, Serialize};

/// Count, extremes, mean, median and population standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl ValueSummary {
    /// Summarize the finite entries of `values`; `None` if there are none.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let n = count as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };
        let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

/// Summarize the values `extract` yields for features with data, i.e. the
/// same set [`classify`](crate::classify) bins: one value per code, the
/// last feature carrying a code winning.
pub fn summarize<F>(features: &[EnrichedFeature], extract: F) -> Option<ValueSummary>
where
    F: Fn(&EnrichedFeature) -> Option<f64>,
{
    let mut by_code: HashMap<&str, f64> = HashMap::new();
    for feature in features.iter().filter(|f| f.has_data) {
        if let Some(v) = extract(feature).filter(|v| v.is_finite()) {
            by_code.insert(feature.code.as_str(), v);
        }
    }
    let values: Vec<f64> = by_code.into_values().collect();
    ValueSummary::from_values(&values)
}
