//! # Tabular Records
//!
//! One [`TabularDataset`] per named layer. Each record is keyed by a data
//! code in its `municipio` field and carries layer-specific numeric or
//! boolean fields, which stay in an open extension map so that new columns
//! published upstream pass through without a schema change.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{json_type_name, CoreError, DatasetError};

/// A flat record from a tabular source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRecord {
    /// Data code of the municipality. Publishers write it either as a
    /// string or as a bare integer; both decode to the string form.
    #[serde(
        rename = "municipio",
        default,
        deserialize_with = "lenient_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<String>,
    /// Municipality name as spelled by the publisher.
    #[serde(rename = "nombre", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Layer-specific fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataRecord {
    /// Record keyed by `code` with the given extra fields.
    pub fn new(code: impl Into<String>, extra: Map<String, Value>) -> Self {
        Self {
            code: Some(code.into()),
            name: None,
            extra,
        }
    }

    /// Read the record's code from `field`. `municipio` addresses the base
    /// code field; any other name is looked up in the extension map.
    pub fn code_for(&self, field: &str) -> Option<String> {
        let code = match field {
            "municipio" => self.code.clone(),
            other => value_as_code(self.extra.get(other)?),
        }?;
        (!code.is_empty()).then_some(code)
    }

    /// Raw value of a field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "municipio" | "nombre" => None,
            other => self.extra.get(other),
        }
    }

    /// A field as a finite number. Numeric strings are accepted, since
    /// several publishers quote every column.
    pub fn number(&self, name: &str) -> Option<f64> {
        let n = match self.field(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }?;
        n.is_finite().then_some(n)
    }

    /// A field as a boolean; `1`/`0` and `"si"`/`"no"` are accepted.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.field(name)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_f64().map(|n| n != 0.0),
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "si" | "sí" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

fn value_as_code(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        _ => None,
    }
}

fn lenient_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_code))
}

/// A versioned tabular payload for one layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularDataset {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    pub records: Vec<DataRecord>,
    /// Entries of `records` that were not objects and were dropped on load.
    #[serde(default, skip_serializing)]
    pub skipped_records: usize,
}

impl TabularDataset {
    /// Dataset with the given version and records.
    pub fn new(version: impl Into<String>, records: Vec<DataRecord>) -> Self {
        Self {
            version: version.into(),
            records,
            ..Self::default()
        }
    }

    /// Decode a dataset from parsed JSON.
    ///
    /// The payload must be an object with a `records` array; anything else is
    /// the one hard failure of the loading path. Inside the array, entries
    /// that are not objects are skipped with a warning and counted in
    /// [`TabularDataset::skipped_records`]. A missing `version` decodes as
    /// `"unversioned"`.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let Value::Object(mut root) = value else {
            return Err(DatasetError::NotAnObject {
                found: json_type_name(&value),
            }
            .into());
        };
        let Some(Value::Array(raw)) = root.remove("records") else {
            return Err(DatasetError::MissingCollection { member: "records" }.into());
        };

        let version = match root.remove("version") {
            Some(Value::String(v)) => v,
            Some(Value::Number(n)) => n.to_string(),
            _ => "unversioned".to_string(),
        };
        let source = take_string(&mut root, "source");
        let updated = take_string(&mut root, "updated");
        let metadata = match root.remove("metadata") {
            Some(Value::Object(m)) => Some(m),
            _ => None,
        };

        let mut records = Vec::with_capacity(raw.len());
        let mut skipped = 0usize;
        for (index, item) in raw.into_iter().enumerate() {
            if !item.is_object() {
                tracing::warn!(index, found = json_type_name(&item), "skipping non-object record");
                skipped += 1;
                continue;
            }
            match serde_json::from_value::<DataRecord>(item) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping undecodable record");
                    skipped += 1;
                }
            }
        }

        Ok(Self {
            version,
            source,
            updated,
            metadata,
            records,
            skipped_records: skipped,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn take_string(root: &mut Map<String, Value>, key: &str) -> Option<String> {
    match root.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}
