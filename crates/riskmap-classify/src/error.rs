//! Classification errors. An empty distribution is not one of them: it
//! degrades to a constant no-data scale.

use thiserror::Error;

/// Errors from building a color scale.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    /// No colors were supplied.
    #[error("color palette is empty")]
    EmptyPalette,

    /// Thresholds were not non-decreasing or not finite.
    #[error("breaks must be finite and non-decreasing; offending index {index}")]
    InvalidBreaks {
        /// First index where the sequence decreases or is not finite.
        index: usize,
    },
}
