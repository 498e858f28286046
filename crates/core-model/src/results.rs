//! Detailing result records: the canonical at-rest form.
//!
//! Every record here serializes with stable field names and stable map key
//! ordering (`BTreeMap`), so `deserialize(serialize(r)) == r` holds and two
//! runs over the same input produce byte-identical JSON.

use crate::marks::{BarMark, HookType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Face of the beam a bar belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarPosition {
    #[serde(rename = "top")]
    Top,
    #[serde(rename = "bottom")]
    Bottom,
}

impl BarPosition {
    /// Bar-id prefix letter.
    pub fn id_prefix(self) -> char {
        match self {
            BarPosition::Top => 'T',
            BarPosition::Bottom => 'B',
        }
    }
}

/// Structural role of a detailed bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKind {
    Continuous,
    Support,
    SupportAnchored,
    Span,
    Segment,
    Regular,
}

/// Why an axial interval forbids splices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    InsideSupport,
    BeforeFace,
    AfterFace,
}

/// Lap splice classification. NSR-10 beams in this regime always use
/// Class B laps; the enum keeps the wire tag extensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpliceKind {
    #[serde(rename = "lap_splice_class_b")]
    LapSpliceClassB,
}

/// One placed lap splice on a bar, in beam coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpliceRecord {
    pub start: f64,
    pub end: f64,
    pub length: f64,
    #[serde(rename = "type")]
    pub kind: SpliceKind,
    /// Stagger group when the bottom positional plan produced this splice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_group: Option<u32>,
    /// Offset factor applied by the fallback joint-shift plan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset_applied: Option<f64>,
    /// Set when the splice coordinator relocated this splice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted: Option<bool>,
    /// Center before the coordinator moved it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_center: Option<f64>,
}

impl SpliceRecord {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

/// One detailed longitudinal bar (or a group of identical bars).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebarDetail {
    pub id: String,
    pub diameter: BarMark,
    pub position: BarPosition,
    #[serde(rename = "type")]
    pub kind: BarKind,
    pub length_m: f64,
    pub start_m: f64,
    pub end_m: f64,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub splices: Option<Vec<SpliceRecord>>,
    pub hook_type: HookType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_length_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RebarDetail {
    pub fn splice_records(&self) -> &[SpliceRecord] {
        self.splices.as_deref().unwrap_or(&[])
    }
}

/// Axial interval where the code disallows lap splices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProhibitedZone {
    pub start_m: f64,
    pub end_m: f64,
    pub kind: ZoneKind,
    pub description: String,
    pub support_index: usize,
}

impl ProhibitedZone {
    /// Open-interval overlap against `[start, end]`.
    pub fn overlaps(&self, start: f64, end: f64) -> bool {
        start < self.end_m && end > self.start_m
    }

    pub fn contains(&self, position: f64) -> bool {
        self.start_m <= position && position <= self.end_m
    }
}

/// One commercial stock bar and the pieces cut from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommercialCut {
    pub commercial_length: f64,
    pub cut_lengths: Vec<f64>,
    pub num_bars: u32,
    pub waste_m: f64,
    pub efficiency: f64,
}

/// Aggregated material demand for one diameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialItem {
    pub diameter: BarMark,
    pub total_length_m: f64,
    pub pieces: u32,
    pub weight_kg: f64,
    pub commercial_lengths: Vec<CommercialCut>,
    pub waste_percentage: f64,
}

/// Continuous-bar selection for one face.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContinuousSide {
    pub diameters: Vec<BarMark>,
    pub count_per_diameter: BTreeMap<BarMark, u32>,
    pub total_continuous: u32,
}

/// Continuous-bar selection for both faces.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContinuousBars {
    pub top: ContinuousSide,
    pub bottom: ContinuousSide,
}

/// Stirrup zone classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StirrupZone {
    Confined,
    Unconfined,
}

/// Per-span stirrup geometry and spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StirrupSpanSpec {
    pub span_index: usize,
    pub label: String,
    pub base_cm: f64,
    pub height_cm: f64,
    pub cover_cm: f64,
    pub stirrup_width_cm: f64,
    pub stirrup_height_cm: f64,
    pub effective_depth_m: f64,
    pub spacing_confined_m: f64,
    pub spacing_unconfined_m: f64,
}

/// One classified sub-interval of the stirrup plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StirrupSegment {
    pub start_m: f64,
    pub end_m: f64,
    pub zone_type: StirrupZone,
    pub spacing_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_count: Option<u32>,
}

/// Transverse reinforcement plan over the whole beam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StirrupSummary {
    pub diameter: BarMark,
    pub hook_type: HookType,
    pub additional_branches_total: u32,
    pub span_specs: Vec<StirrupSpanSpec>,
    pub zone_segments: Vec<StirrupSegment>,
}

/// Complete detailing result: the canonical persisted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailingResults {
    pub top_bars: Vec<RebarDetail>,
    pub bottom_bars: Vec<RebarDetail>,
    pub prohibited_zones: Vec<ProhibitedZone>,
    pub material_list: Vec<MaterialItem>,
    pub continuous_bars: ContinuousBars,
    pub warnings: Vec<String>,
    pub validation_passed: bool,
    pub total_weight_kg: f64,
    pub total_bars_count: u32,
    pub optimization_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stirrups_summary: Option<StirrupSummary>,
}

impl DetailingResults {
    /// Top and bottom bars in result order.
    pub fn all_bars(&self) -> impl Iterator<Item = &RebarDetail> {
        self.top_bars.iter().chain(self.bottom_bars.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_center_is_interval_midpoint() {
        let splice = SpliceRecord {
            start: 2.0,
            end: 3.0,
            length: 1.0,
            kind: SpliceKind::LapSpliceClassB,
            offset_group: None,
            offset_applied: None,
            adjusted: None,
            original_center: None,
        };
        assert_eq!(splice.center(), 2.5);
    }

    #[test]
    fn zone_overlap_is_open_interval() {
        let zone = ProhibitedZone {
            start_m: 1.0,
            end_m: 2.0,
            kind: ZoneKind::AfterFace,
            description: "after".into(),
            support_index: 0,
        };
        assert!(zone.overlaps(1.5, 2.5));
        assert!(!zone.overlaps(2.0, 3.0));
        assert!(zone.contains(2.0));
    }

    #[test]
    fn bar_kind_uses_snake_case_tags() {
        let json = serde_json::to_string(&BarKind::SupportAnchored).unwrap();
        assert_eq!(json, "\"support_anchored\"");
    }

    #[test]
    fn continuous_map_keys_are_marks() {
        let mut side = ContinuousSide::default();
        side.diameters.push(BarMark::M8);
        side.count_per_diameter.insert(BarMark::M8, 2);
        side.total_continuous = 2;
        let json = serde_json::to_string(&side).unwrap();
        assert!(json.contains("\"#8\":2"), "{json}");
        let back: ContinuousSide = serde_json::from_str(&json).unwrap();
        assert_eq!(back, side);
    }
}
