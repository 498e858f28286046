//! Fatal error kinds for the detailing engine.
//!
//! Only conditions that make the whole computation meaningless are errors;
//! everything recoverable (infeasible segmentation, infeasible splice
//! locations) is reported through `DetailingResults::warnings` instead and
//! never aborts the call.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetailingError {
    /// Support/span cardinality mismatch, negative widths or non-finite
    /// dimensions.
    #[error("invalid beam geometry: {0}")]
    InvalidGeometry(String),

    /// Both longitudinal groups are empty after expansion.
    #[error("no longitudinal reinforcement configured")]
    NoReinforcement,
}
