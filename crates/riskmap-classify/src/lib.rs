//! # riskmap-classify: Classification Engine
//!
//! Turns the numeric values of a join result into a color per
//! municipality for choropleth rendering.
//!
//! - [`breaks`]: threshold computation (quantile, equal interval).
//! - [`scale`]: the code → color lookup and its construction from enriched
//!   features.
//! - [`summary`]: count, extremes, mean, median and standard deviation of the
//!   same values.
//!
//! Features without data never enter a bin; they resolve to the no-data
//! color so a sparse dataset stays visually distinct from a low one.

pub mod breaks;
pub mod error;
pub mod scale;
pub mod summary;

pub use breaks::{ClassificationBreaks, ClassificationMethod};
pub use error::ClassifyError;
pub use scale::{classify, ClassifyOptions, ColorScale};
pub use summary::{summarize, ValueSummary};
