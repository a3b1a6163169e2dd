//! # riskmap-core: Foundational Types for the Municipal Risk Map
//!
//! Leaf crate of the workspace. Defines the canonical catalog of the 46
//! administrative units of the state of Guanajuato, the crosswalk between
//! the two coding schemes that refer to them, and the geometry and tabular
//! data models that the join, classification and validation crates consume.
//!
//! ## Coding Schemes
//!
//! Geometry sources identify a municipality by its **compact code**, an
//! integer in `1..=46`. Tabular sources identify the same municipality by its
//! **data code**, a five-digit string made of the two-digit state prefix and
//! the zero-padded compact code (`"11020"` is León). The [`Catalog`] is the
//! single authority over both schemes; the [`crosswalk`] module exposes the
//! lookups and the alignment check between two code sets.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `riskmap-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Lookups return `Option`; misalignment is data, not an error.

pub mod catalog;
pub mod crosswalk;
pub mod error;
pub mod geometry;
pub mod record;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use catalog::{AdministrativeUnit, Catalog, CompactCode, DataCode, CATALOG_VERSION, STATE_CODE};
pub use crosswalk::{annotate_collection, validate_alignment, CrosswalkAlignment};
pub use error::{CatalogError, CoreError, DatasetError};
pub use geometry::{Bounds, CoordinateNode, FeatureCollection, FeatureProperties, Geometry, GeometryFeature, GeometryKind};
pub use record::{DataRecord, TabularDataset};
pub use temporal::Timestamp;
