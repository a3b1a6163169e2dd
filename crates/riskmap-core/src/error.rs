//! # Error Types
//!
//! Structured error hierarchy for the core crate. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! Only malformed top-level input is an error. A feature without a record,
//! a code outside the catalog, or a renamed municipality is reported in the
//! result structures of the calling component instead.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The canonical catalog violates its bijection invariant.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// A tabular or geometry payload is structurally unusable.
    #[error("dataset error: {0}")]
    Dataset(#[from] DatasetError),

    /// Timestamp parsing failed.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Violation of the one-unit-per-code invariant of the catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Two units share a compact code.
    #[error("duplicate compact code {0}")]
    DuplicateCompactCode(u16),

    /// Two units share a data code.
    #[error("duplicate data code {0}")]
    DuplicateDataCode(String),

    /// A unit's data code is not `state || pad3(compact)`.
    #[error("data code {data_code} does not match compact code {compact_code} in state {state_code}")]
    InconsistentCodes {
        /// The compact code of the unit.
        compact_code: u16,
        /// The data code recorded for the unit.
        data_code: String,
        /// The state prefix the catalog was built for.
        state_code: u16,
    },

    /// A data code is not five ASCII digits.
    #[error("malformed data code {0:?}")]
    MalformedDataCode(String),
}

/// A payload that is not the collection it claims to be.
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The payload root is not a JSON object.
    #[error("expected a JSON object at the payload root, found {found}")]
    NotAnObject {
        /// JSON type name of what was found.
        found: &'static str,
    },

    /// The collection member is absent or not an array.
    #[error("payload has no '{member}' array")]
    MissingCollection {
        /// The member that was expected (`records` or `features`).
        member: &'static str,
    },

    /// A required top-level field could not be decoded.
    #[error("invalid field '{field}': {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// Decoder message.
        reason: String,
    },
}

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
