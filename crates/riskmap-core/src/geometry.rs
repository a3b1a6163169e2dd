//! # Geometry Model
//!
//! GeoJSON-shaped feature collections as handed over by the geometry
//! source. The core reads these and returns annotated copies; it never
//! mutates a caller's collection in place.
//!
//! Coordinates are kept as an untyped tree ([`CoordinateNode`]) so that
//! polygons, multipolygons and malformed payloads all decode. Every walk over
//! the tree uses an explicit stack, so nesting depth is bounded by heap, not
//! by the call stack.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::catalog::DataCode;
use crate::error::{json_type_name, CoreError, DatasetError};

// ─── Coordinates ────────────────────────────────────────────────────

/// One node of a GeoJSON coordinate array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateNode {
    /// A leaf `[x, y, ...]`. Fewer than two numbers is not a usable position.
    Position(Vec<f64>),
    /// Any level of nesting above a position (ring, polygon, multipolygon).
    Nested(Vec<CoordinateNode>),
}

impl Default for CoordinateNode {
    fn default() -> Self {
        Self::Nested(Vec::new())
    }
}

impl CoordinateNode {
    /// All usable `[x, y]` positions in document order.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        let mut out = Vec::new();
        let mut stack: Vec<&CoordinateNode> = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Position(p) if p.len() >= 2 => out.push([p[0], p[1]]),
                Self::Position(_) => {}
                Self::Nested(children) => stack.extend(children.iter().rev()),
            }
        }
        out
    }

    /// Whether the tree holds at least one usable position.
    pub fn has_positions(&self) -> bool {
        let mut stack: Vec<&CoordinateNode> = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Position(p) if p.len() >= 2 => return true,
                Self::Position(_) => {}
                Self::Nested(children) => stack.extend(children.iter()),
            }
        }
        false
    }

    /// Bounding box of all usable positions.
    pub fn bounds(&self) -> Option<Bounds> {
        let mut bounds: Option<Bounds> = None;
        let mut stack: Vec<&CoordinateNode> = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                Self::Position(p) if p.len() >= 2 => {
                    let point = Bounds::point(p[0], p[1]);
                    bounds = Some(match bounds {
                        Some(b) => b.union(&point),
                        None => point,
                    });
                }
                Self::Position(_) => {}
                Self::Nested(children) => stack.extend(children.iter()),
            }
        }
        bounds
    }
}

/// Axis-aligned bounding box in source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Degenerate box around a single point.
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }
}

// ─── Geometry ───────────────────────────────────────────────────────

/// GeoJSON geometry type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Polygon,
    MultiPolygon,
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    #[serde(other)]
    Other,
}

/// A feature's geometry: a type tag and its coordinate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    #[serde(default)]
    pub coordinates: CoordinateNode,
}

impl Geometry {
    /// Whether the coordinate tree is non-empty.
    pub fn is_structurally_present(&self) -> bool {
        self.coordinates.has_positions()
    }

    /// Bounding box of the geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        self.coordinates.bounds()
    }
}

// ─── Properties ─────────────────────────────────────────────────────

/// Feature properties: the fields the core reads or writes, plus every
/// other property carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureProperties {
    /// State prefix (expected 11).
    #[serde(default, deserialize_with = "lenient_u16", skip_serializing_if = "Option::is_none")]
    pub state_code: Option<u16>,
    /// Compact code (1..=46).
    #[serde(default, deserialize_with = "lenient_u16", skip_serializing_if = "Option::is_none")]
    pub compact_code: Option<u16>,
    /// Name as spelled by the geometry source.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub raw_name: Option<String>,
    /// Reconstructed data code, attached by the crosswalk.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub data_code: Option<String>,
    /// Catalog name, attached by the crosswalk.
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub canonical_name: Option<String>,
    /// All other properties.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FeatureProperties {
    /// Read a property as a code string. Known fields are addressed by their
    /// serialized name; anything else is looked up in the extension map,
    /// where integers are rendered in decimal.
    pub fn field_code(&self, field: &str) -> Option<String> {
        let code = match field {
            "dataCode" => self.data_code.clone(),
            "compactCode" => self.compact_code.map(|c| c.to_string()),
            "stateCode" => self.state_code.map(|c| c.to_string()),
            "rawName" => self.raw_name.clone(),
            "canonicalName" => self.canonical_name.clone(),
            other => match self.extra.get(other)? {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => n.as_u64().map(|n| n.to_string()),
                _ => None,
            },
        }?;
        (!code.is_empty()).then_some(code)
    }

    /// `state || pad3(compact)` when both parts are present.
    pub fn synthesized_data_code(&self) -> Option<DataCode> {
        Some(DataCode::compose(self.state_code?, self.compact_code?))
    }
}

fn lenient_u16<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Strings pass through; any other JSON type reads as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ─── Features ───────────────────────────────────────────────────────

fn feature_tag() -> String {
    "Feature".to_string()
}

fn collection_tag() -> String {
    "FeatureCollection".to_string()
}

/// One administrative unit's polygon and properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryFeature {
    #[serde(rename = "type", default = "feature_tag")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: FeatureProperties,
}

impl GeometryFeature {
    /// A feature with the given properties and geometry.
    pub fn new(properties: FeatureProperties, geometry: Option<Geometry>) -> Self {
        Self {
            kind: feature_tag(),
            id: None,
            geometry,
            properties,
        }
    }
}

/// A GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type", default = "collection_tag")]
    pub kind: String,
    pub features: Vec<GeometryFeature>,
}

impl FeatureCollection {
    /// Wrap a list of features.
    pub fn new(features: Vec<GeometryFeature>) -> Self {
        Self {
            kind: collection_tag(),
            features,
        }
    }

    /// Decode a collection from parsed JSON.
    ///
    /// A root that is not an object, or has no `features` array, is an error.
    /// Every array element yields exactly one feature, so that a damaged
    /// unit is still seen (and flagged) by validation and joins:
    /// properties that fail to decode read as absent, an undecodable
    /// geometry reads as no geometry, and a non-object element becomes an
    /// empty feature.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let Value::Object(mut root) = value else {
            return Err(DatasetError::NotAnObject {
                found: json_type_name(&value),
            }
            .into());
        };
        let Some(Value::Array(raw)) = root.remove("features") else {
            return Err(DatasetError::MissingCollection { member: "features" }.into());
        };
        let features = raw
            .into_iter()
            .enumerate()
            .map(|(index, item)| decode_feature(index, item))
            .collect();
        Ok(Self::new(features))
    }

    /// Number of features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounding box over every feature's geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref()?.bounds())
            .reduce(|a, b| a.union(&b))
    }
}

fn decode_feature(index: usize, item: Value) -> GeometryFeature {
    let Value::Object(mut object) = item else {
        tracing::warn!(index, found = json_type_name(&item), "feature is not an object, keeping an empty feature");
        return GeometryFeature::new(FeatureProperties::default(), None);
    };

    let properties = match object.remove("properties") {
        None | Some(Value::Null) => FeatureProperties::default(),
        Some(raw) => serde_json::from_value(raw).unwrap_or_else(|e| {
            tracing::warn!(index, error = %e, "undecodable feature properties, treating as empty");
            FeatureProperties::default()
        }),
    };
    let geometry = match object.remove("geometry") {
        None | Some(Value::Null) => None,
        Some(raw) => match serde_json::from_value::<Geometry>(raw) {
            Ok(geometry) => Some(geometry),
            Err(e) => {
                tracing::warn!(index, error = %e, "undecodable geometry, treating as absent");
                None
            }
        },
    };

    let mut feature = GeometryFeature::new(properties, geometry);
    feature.id = object.remove("id").filter(|id| !id.is_null());
    feature
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn square() -> Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[-101.0, 21.0], [-100.0, 21.0], [-100.0, 22.0], [-101.0, 21.0]]]
        })
    }

    #[test]
    fn test_polygon_decodes_and_has_positions() {
        let g: Geometry = serde_json::from_value(square()).unwrap();
        assert_eq!(g.kind, GeometryKind::Polygon);
        assert!(g.is_structurally_present());
        assert_eq!(g.coordinates.positions().len(), 4);
    }

    #[test]
    fn test_bounds_of_multipolygon() {
        let g: Geometry = serde_json::from_value(json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                [[[5.0, -2.0], [6.0, -2.0], [6.0, 3.0], [5.0, -2.0]]]
            ]
        }))
        .unwrap();
        let b = g.bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, -2.0, 6.0, 3.0));
    }

    #[test]
    fn test_empty_coordinate_tree_is_not_present() {
        let g: Geometry = serde_json::from_value(json!({"type": "Polygon", "coordinates": [[]]})).unwrap();
        assert!(!g.is_structurally_present());
        assert!(g.bounds().is_none());

        let g: Geometry = serde_json::from_value(json!({"type": "Polygon"})).unwrap();
        assert!(!g.is_structurally_present());
    }

    #[test]
    fn test_deep_nesting_walks_without_recursion() {
        let mut node = CoordinateNode::Position(vec![3.0, 4.0]);
        for _ in 0..10_000 {
            node = CoordinateNode::Nested(vec![node]);
        }
        assert!(node.has_positions());
        assert_eq!(node.positions(), vec![[3.0, 4.0]]);
        // Dropping a 10k-deep tree recurses in the generated Drop; leak it.
        std::mem::forget(node);
    }

    #[test]
    fn test_properties_accept_numeric_strings_and_keep_extras() {
        let props: FeatureProperties = serde_json::from_value(json!({
            "stateCode": "11",
            "compactCode": 20,
            "rawName": "León",
            "NOM_ENT": "Guanajuato"
        }))
        .unwrap();
        assert_eq!(props.state_code, Some(11));
        assert_eq!(props.compact_code, Some(20));
        assert_eq!(props.extra["NOM_ENT"], "Guanajuato");
        assert_eq!(props.synthesized_data_code().unwrap().as_str(), "11020");

        let back = serde_json::to_value(&props).unwrap();
        assert_eq!(back["NOM_ENT"], "Guanajuato");
        assert_eq!(back["compactCode"], 20);
    }

    #[test]
    fn test_field_code_reads_known_and_extension_fields() {
        let props: FeatureProperties = serde_json::from_value(json!({
            "compactCode": 7,
            "CVEGEO": "11007",
            "CVE_NUM": 11007
        }))
        .unwrap();
        assert_eq!(props.field_code("compactCode").as_deref(), Some("7"));
        assert_eq!(props.field_code("CVEGEO").as_deref(), Some("11007"));
        assert_eq!(props.field_code("CVE_NUM").as_deref(), Some("11007"));
        assert!(props.field_code("dataCode").is_none());
        assert!(props.synthesized_data_code().is_none());
    }

    #[test]
    fn test_collection_from_value_rejects_non_collections() {
        assert!(FeatureCollection::from_value(json!([1, 2])).is_err());
        assert!(FeatureCollection::from_value(json!({"type": "FeatureCollection"})).is_err());
    }

    #[test]
    fn test_collection_from_value_keeps_every_element() {
        let fc = FeatureCollection::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": square(), "properties": {"compactCode": 1}},
                "not a feature",
                {"type": "Feature", "properties": {"compactCode": 2}},
                {"type": "Feature", "geometry": null, "properties": null},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": "corrupt"},
                 "properties": {"stateCode": 11, "compactCode": 7, "rawName": 20}},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[-101.0, null]]]},
                 "properties": "corrupt", "id": 9}
            ]
        }))
        .unwrap();
        assert_eq!(fc.len(), 6);
        assert_eq!(fc.features[1], GeometryFeature::new(FeatureProperties::default(), None));
        assert!(fc.features[2].geometry.is_none());
        assert_eq!(fc.features[3].properties, FeatureProperties::default());

        let corrupt = &fc.features[4];
        assert!(corrupt.geometry.is_none());
        assert_eq!(corrupt.properties.compact_code, Some(7));
        assert_eq!(corrupt.properties.raw_name, None);

        assert!(fc.features[5].geometry.is_none());
        assert_eq!(fc.features[5].properties, FeatureProperties::default());
        assert_eq!(fc.features[5].id, Some(json!(9)));
        assert!(fc.bounds().is_some());
    }
}
