//! Beam axis geometry: layout walk, interval math, forbidden zones.
//!
//! Leaf geometry crate for the detailing engine. Everything here is pure
//! and deterministic; coordinates come out rounded to 4 decimals and all
//! tolerance-sensitive checks go through the shared `EPSILON_M`.

pub mod interval;
pub mod layout;
pub mod zones;

pub use interval::{complement_segments, merge_segments};
pub use layout::{
    AxisMarker, CoordinateLayout, FaceInfo, SpanCenter, SpanInterval, SupportInterval,
    axis_labels, build_layout, preprocess_depth_m,
};
pub use zones::calculate_prohibited_zones;
