//! # riskmap-integrity: Geometry Integrity Validation
//!
//! Checks that a geometry collection describes exactly the units of the
//! canonical catalog, under the right codes and names, with usable
//! polygons.
//!
//! ## Severity Policy
//!
//! - **Error**: the feature cannot be trusted to join (missing fields, wrong
//!   state, wrong code, unknown unit, empty geometry). Any error makes the
//!   report invalid.
//! - **Warning**: the feature joins correctly but something needs a human
//!   look (spelling differs from the catalog, a unit is absent or repeated).
//! - **Info**: context for the reader, never actionable on its own.
//!
//! Validation never fails; a malformed feature produces an issue and the
//! pass continues with the next one.

pub mod correct;
pub mod issue;
pub mod report;
pub mod validator;

pub use correct::{Correction, CorrectionOutcome};
pub use issue::{IssueKind, Severity, ValidationIssue};
pub use report::{SeveritySummary, ValidationReport};
pub use validator::IntegrityValidator;
