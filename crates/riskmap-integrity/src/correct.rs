//! # Geometry Correction
//!
//! Produces a corrected copy of a collection. Only one repair is made: a
//! feature whose name resolves to a catalog unit but whose compact code
//! does not match that unit gets the unit's compact code (and data code, if
//! it carries one). Features that match nothing are left as they are.

use riskmap_core::{Catalog, FeatureCollection};
use serde::{Deserialize, Serialize};

/// One rewritten feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Correction {
    pub feature_index: usize,
    pub unit_name: String,
    pub previous_compact_code: Option<u16>,
    pub corrected_compact_code: u16,
}

/// Corrected collection and the list of rewrites applied.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionOutcome {
    pub collection: FeatureCollection,
    pub corrections: Vec<Correction>,
}

impl CorrectionOutcome {
    /// Whether anything was rewritten.
    pub fn is_unchanged(&self) -> bool {
        self.corrections.is_empty()
    }
}

pub(crate) fn correct_collection(collection: &FeatureCollection, catalog: &Catalog) -> CorrectionOutcome {
    let mut corrected = collection.clone();
    let mut corrections = Vec::new();

    for (index, feature) in corrected.features.iter_mut().enumerate() {
        let props = &mut feature.properties;
        let Some(unit) = props.raw_name.as_deref().and_then(|n| catalog.unit_by_name(n)) else {
            continue;
        };
        let canonical = unit.compact_code.get();
        if props.compact_code == Some(canonical) {
            continue;
        }

        tracing::info!(
            feature = index,
            unit = %unit.official_name,
            from = ?props.compact_code,
            to = canonical,
            "correcting compact code"
        );
        corrections.push(Correction {
            feature_index: index,
            unit_name: unit.official_name.clone(),
            previous_compact_code: props.compact_code,
            corrected_compact_code: canonical,
        });
        props.compact_code = Some(canonical);
        if props.data_code.is_some() {
            props.data_code = Some(unit.data_code.to_string());
        }
    }

    CorrectionOutcome {
        collection: corrected,
        corrections,
    }
}

#[cfg(test)]
mod tests {
    use crate::IntegrityValidator;
    use riskmap_core::{FeatureCollection, FeatureProperties, GeometryFeature};

    fn feature(compact: Option<u16>, name: Option<&str>) -> GeometryFeature {
        GeometryFeature::new(
            FeatureProperties {
                state_code: Some(11),
                compact_code: compact,
                raw_name: name.map(str::to_string),
                ..FeatureProperties::default()
            },
            None,
        )
    }

    #[test]
    fn test_renumbered_feature_rewritten() {
        let mut wrong = feature(Some(15), Some("Irapuato"));
        wrong.properties.data_code = Some("11015".into());
        let input = FeatureCollection::new(vec![wrong, feature(Some(7), Some("Celaya"))]);

        let outcome = IntegrityValidator::guanajuato().correct(&input);

        assert_eq!(outcome.corrections.len(), 1);
        assert_eq!(outcome.corrections[0].feature_index, 0);
        assert_eq!(outcome.corrections[0].previous_compact_code, Some(15));
        let props = &outcome.collection.features[0].properties;
        assert_eq!(props.compact_code, Some(17));
        assert_eq!(props.data_code.as_deref(), Some("11017"));
        assert_eq!(outcome.collection.features[1], input.features[1]);
        // Input untouched.
        assert_eq!(input.features[0].properties.compact_code, Some(15));
    }

    #[test]
    fn test_missing_code_filled_from_name() {
        let input = FeatureCollection::new(vec![feature(None, Some("dolores hidalgo"))]);
        let outcome = IntegrityValidator::guanajuato().correct(&input);
        assert_eq!(outcome.collection.features[0].properties.compact_code, Some(14));
        assert!(outcome.collection.features[0].properties.data_code.is_none());
    }

    #[test]
    fn test_unmatched_features_unchanged() {
        let input = FeatureCollection::new(vec![
            feature(Some(20), Some("Leon")),
            feature(Some(99), Some("Atlantida")),
            feature(Some(3), None),
        ]);
        let outcome = IntegrityValidator::guanajuato().correct(&input);
        assert!(outcome.is_unchanged());
        assert_eq!(outcome.collection, input);
    }
}
