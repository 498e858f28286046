//! Shared domain model for beam rebar detailing.
//!
//! This crate owns the value types every other crate speaks: bar marks and
//! material enums, the `compute_detailing` input schema, the detailing
//! result records (the canonical at-rest JSON form) and the fatal error
//! kinds. It contains no algorithms; geometry, planning and rendering live
//! in the crates that depend on this one.
//!
//! Conventions:
//! * Linear coordinates are meters; section dimensions are centimeters.
//! * Sum types over stringly-typed tags; serde `rename` keeps the wire
//!   form identical to the historical schema.
//! * `f64` everywhere; interval checks elsewhere use the shared 1e-3
//!   tolerance, never exact comparison.

pub mod error;
pub mod input;
pub mod marks;
pub mod results;

pub use error::DetailingError;
pub use input::{
    AxisSupport, BarGroup, DetailingInput, SegmentReinforcement, SpanGeometry, StirrupConfig,
    StirrupShape, parse_length_m,
};
pub use marks::{BarMark, ConcreteClass, EnergyClass, HookType, SteelGrade};
pub use results::{
    BarKind, BarPosition, CommercialCut, ContinuousBars, ContinuousSide, DetailingResults,
    MaterialItem, ProhibitedZone, RebarDetail, SpliceKind, SpliceRecord, StirrupSegment,
    StirrupSpanSpec, StirrupSummary, StirrupZone, ZoneKind,
};

/// Shared floating point tolerance (meters) for interval containment and
/// endpoint equality checks.
pub const EPSILON_M: f64 = 1e-3;
