//! Normalized drawing payload.
//!
//! The payload is the drawing engine's whole world: project metadata, the
//! geometry snapshot (supports, spans, axis markers), the rebar layout as
//! configured, the detailing results and the unit profile. It carries no
//! references back into the detailing engine.

use core_model::{
    BarMark, ConcreteClass, DetailingResults, EnergyClass, HookType, SteelGrade, StirrupConfig,
};
use core_templates::DrawingUnits;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamDrawingMetadata {
    pub project_name: String,
    pub beam_label: String,
    pub element_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_level: Option<f64>,
    #[serde(default = "default_quantity")]
    pub element_quantity: u32,
    #[serde(default)]
    pub axis_labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub concrete_strength: ConcreteClass,
    pub reinforcement: SteelGrade,
    pub energy_dissipation_class: EnergyClass,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingAxisMarker {
    pub index: usize,
    pub label: String,
    pub position_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSupport {
    pub index: usize,
    pub label: String,
    pub width_m: f64,
    pub start_m: f64,
    pub end_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingSpan {
    pub index: usize,
    pub label: String,
    pub start_support_index: usize,
    pub end_support_index: usize,
    pub clear_length_m: f64,
    pub start_m: f64,
    pub end_m: f64,
    pub section_width_cm: f64,
    pub section_height_cm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingGeometry {
    pub total_length_m: f64,
    pub spans: Vec<DrawingSpan>,
    pub supports: Vec<DrawingSupport>,
    #[serde(default)]
    pub axis_markers: Vec<DrawingAxisMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingRebarGroup {
    pub diameter: BarMark,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingRebarLayout {
    pub top_groups: Vec<DrawingRebarGroup>,
    pub bottom_groups: Vec<DrawingRebarGroup>,
    pub hook_type: HookType,
    pub cover_cm: f64,
    pub lap_splice_length_min_m: f64,
    pub max_rebar_length_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamDrawingPayload {
    pub metadata: BeamDrawingMetadata,
    pub geometry: DrawingGeometry,
    pub rebar_layout: DrawingRebarLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailing_results: Option<DetailingResults>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stirrups_config: Vec<StirrupConfig>,
    #[serde(default)]
    pub drawing_units: DrawingUnits,
}

/// Render options accompanying a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingRenderRequest {
    #[serde(default = "default_template_key")]
    pub template: String,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl Default for DrawingRenderRequest {
    fn default() -> Self {
        Self {
            template: default_template_key(),
            scale: default_scale(),
            locale: None,
        }
    }
}

fn default_template_key() -> String {
    "beam/default".to_string()
}

fn default_scale() -> f64 {
    50.0
}
