//! # riskmap-join: Join Engine
//!
//! Attaches one [`DataRecord`](riskmap_core::DataRecord) per geometry
//! feature by matching a code field on each side, and measures how well the
//! full code sets agree.
//!
//! ## Guarantees
//!
//! - One [`EnrichedFeature`] per input feature, in input order. The join
//!   never drops or duplicates geometry.
//! - `has_data` is true exactly when a record with the feature's code was
//!   found. A missing record is the common case, not an error.
//! - Duplicate record codes resolve last-write-wins.
//! - The [`AlignmentReport`] compares whole code sets, so a renumbered
//!   dataset shows up as a low ratio even when a few codes collide and join
//!   by accident.

pub mod alignment;
pub mod engine;

pub use alignment::AlignmentReport;
pub use engine::{join, EnrichedFeature, JoinConfig, JoinMetadata, JoinResult};
