//! Detailing input records.
//!
//! The input mirrors the `compute_detailing` schema: span geometries,
//! supports, top/bottom bar groups, optional per-segment reinforcement and
//! the material parameters. Field defaults follow the commercial presets
//! (cover 4 cm, 12 m stock, 135° hooks, DES, 21 MPa, grade 60) so a minimal
//! JSON document describes a valid beam.
//!
//! The commercial stock length accepts either a plain number or a catalog
//! string such as `"12m"`; both deserialize to meters.

use crate::marks::{BarMark, ConcreteClass, EnergyClass, HookType, SteelGrade};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::OnceLock;

/// Clear span plus gross section dimensions for one span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanGeometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub clear_span_between_supports_m: f64,
    pub base_cm: f64,
    pub height_cm: f64,
}

/// One support of the axis; the layout interleaves support, span, support, …
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSupport {
    pub support_width_cm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A homogeneous group of longitudinal bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarGroup {
    pub diameter: BarMark,
    pub quantity: u32,
}

/// Extra reinforcement for specific spans, one side at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReinforcement {
    pub span_indexes: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_rebar: Option<BarGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_rebar: Option<BarGroup>,
}

/// Stirrup shape letter as drawn on the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StirrupShape {
    #[serde(rename = "C")]
    Closed,
    #[serde(rename = "S")]
    Single,
}

/// User-declared stirrup configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StirrupConfig {
    #[serde(default)]
    pub additional_branches: u32,
    #[serde(default = "default_stirrup_shape")]
    pub stirrup_type: StirrupShape,
}

fn default_stirrup_shape() -> StirrupShape {
    StirrupShape::Closed
}

/// Full input to `compute_detailing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailingInput {
    pub span_geometries: Vec<SpanGeometry>,
    pub axis_supports: Vec<AxisSupport>,
    pub top_bars_config: Vec<BarGroup>,
    pub bottom_bars_config: Vec<BarGroup>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segment_reinforcements: Vec<SegmentReinforcement>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stirrups_config: Vec<StirrupConfig>,
    /// Free-form axis numbering, split on `-`, `,` and whitespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis_numbering: Option<String>,
    #[serde(default = "default_cover_cm")]
    pub cover_cm: f64,
    /// Commercial stock length in meters; accepts `"12m"` catalog strings.
    #[serde(
        default = "default_max_rebar_length_m",
        deserialize_with = "de_commercial_length"
    )]
    pub max_rebar_length_m: f64,
    #[serde(default = "default_hook_type")]
    pub hook_type: HookType,
    #[serde(default = "default_energy_class")]
    pub energy_dissipation_class: EnergyClass,
    #[serde(default = "default_concrete")]
    pub concrete_strength: ConcreteClass,
    #[serde(default = "default_steel")]
    pub reinforcement: SteelGrade,
    #[serde(default = "default_lap_splice_min")]
    pub lap_splice_length_min_m: f64,
}

fn default_cover_cm() -> f64 {
    4.0
}

fn default_max_rebar_length_m() -> f64 {
    12.0
}

fn default_hook_type() -> HookType {
    HookType::Deg135
}

fn default_energy_class() -> EnergyClass {
    EnergyClass::Des
}

fn default_concrete() -> ConcreteClass {
    ConcreteClass::Fc21
}

fn default_steel() -> SteelGrade {
    SteelGrade::Grade60
}

fn default_lap_splice_min() -> f64 {
    0.75
}

/// Parse a catalog length string (`"12m"`, `"9,5 m"`) into meters.
pub fn parse_length_m(raw: &str) -> Option<f64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern =
        PATTERN.get_or_init(|| Regex::new(r"([0-9]+(?:[.,][0-9]+)?)").expect("static pattern"));
    let captured = pattern.captures(raw)?;
    captured.get(1)?.as_str().replace(',', ".").parse().ok()
}

fn de_commercial_length<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => parse_length_m(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("unparseable commercial length: {text:?}"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input_json() -> &'static str {
        r##"{
            "span_geometries": [
                {"label": "V1", "clear_span_between_supports_m": 4.0, "base_cm": 30, "height_cm": 45}
            ],
            "axis_supports": [
                {"support_width_cm": 30}, {"support_width_cm": 30}
            ],
            "top_bars_config": [{"diameter": "#6", "quantity": 2}],
            "bottom_bars_config": [{"diameter": "#6", "quantity": 2}]
        }"##
    }

    #[test]
    fn minimal_input_applies_presets() {
        let input: DetailingInput = serde_json::from_str(minimal_input_json()).unwrap();
        assert_eq!(input.cover_cm, 4.0);
        assert_eq!(input.max_rebar_length_m, 12.0);
        assert_eq!(input.hook_type, HookType::Deg135);
        assert_eq!(input.energy_dissipation_class, EnergyClass::Des);
        assert_eq!(input.concrete_strength, ConcreteClass::Fc21);
        assert_eq!(input.reinforcement, SteelGrade::Grade60);
        assert_eq!(input.lap_splice_length_min_m, 0.75);
    }

    #[test]
    fn commercial_length_accepts_catalog_strings() {
        let json = r##"{
            "span_geometries": [],
            "axis_supports": [],
            "top_bars_config": [],
            "bottom_bars_config": [],
            "max_rebar_length_m": "9m"
        }"##;
        let input: DetailingInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.max_rebar_length_m, 9.0);
    }

    #[test]
    fn parse_length_handles_decimal_comma() {
        assert_eq!(parse_length_m("9,5 m"), Some(9.5));
        assert_eq!(parse_length_m("12m"), Some(12.0));
        assert_eq!(parse_length_m("sin dato"), None);
    }
}
