//! Payload builder: detailing input (+ results) → normalized drawing payload.
//!
//! Reuses the detailing axis walk so the drawing geometry is always the
//! same layout the engine planned against, rounded to 4 decimals.

use crate::schema::{
    BeamDrawingMetadata, BeamDrawingPayload, DrawingAxisMarker, DrawingGeometry,
    DrawingRebarGroup, DrawingRebarLayout, DrawingSpan, DrawingSupport,
};
use core_geometry::build_layout;
use core_model::{DetailingError, DetailingInput, DetailingResults};
use core_templates::DrawingUnits;

impl BeamDrawingMetadata {
    /// Metadata from the detailing input plus the project/beam labels the
    /// input schema does not carry.
    pub fn from_input(input: &DetailingInput, project_name: &str, beam_label: &str) -> Self {
        Self {
            project_name: project_name.to_string(),
            beam_label: beam_label.to_string(),
            element_identifier: beam_label.to_string(),
            element_level: None,
            element_quantity: 1,
            axis_labels: Vec::new(),
            notes: None,
            concrete_strength: input.concrete_strength,
            reinforcement: input.reinforcement,
            energy_dissipation_class: input.energy_dissipation_class,
        }
    }
}

/// Build the normalized payload for one beam.
pub fn build_payload(
    input: &DetailingInput,
    results: Option<DetailingResults>,
    mut metadata: BeamDrawingMetadata,
) -> Result<BeamDrawingPayload, DetailingError> {
    let layout = build_layout(input)?;

    let supports: Vec<DrawingSupport> = layout
        .supports
        .iter()
        .map(|support| DrawingSupport {
            index: support.index,
            label: support.label.clone(),
            width_m: support.width_m,
            start_m: support.start_m,
            end_m: support.end_m,
        })
        .collect();

    let spans: Vec<DrawingSpan> = layout
        .spans
        .iter()
        .map(|span| DrawingSpan {
            index: span.index,
            label: span.label.clone(),
            start_support_index: span.index,
            end_support_index: span.index + 1,
            clear_length_m: span.length_m,
            start_m: span.start_m,
            end_m: span.end_m,
            section_width_cm: span.base_cm,
            section_height_cm: span.height_cm,
        })
        .collect();

    let axis_markers: Vec<DrawingAxisMarker> = layout
        .axis_markers
        .iter()
        .map(|marker| DrawingAxisMarker {
            index: marker.index,
            label: marker.label.clone(),
            position_m: marker.position_m,
        })
        .collect();

    if metadata.axis_labels.is_empty() {
        metadata.axis_labels = axis_markers.iter().map(|m| m.label.clone()).collect();
    }

    let to_groups = |groups: &[core_model::BarGroup]| {
        groups
            .iter()
            .map(|group| DrawingRebarGroup {
                diameter: group.diameter,
                quantity: group.quantity,
            })
            .collect()
    };

    Ok(BeamDrawingPayload {
        metadata,
        geometry: DrawingGeometry {
            total_length_m: layout.total_length_m,
            spans,
            supports,
            axis_markers,
        },
        rebar_layout: DrawingRebarLayout {
            top_groups: to_groups(&input.top_bars_config),
            bottom_groups: to_groups(&input.bottom_bars_config),
            hook_type: input.hook_type,
            cover_cm: input.cover_cm,
            lap_splice_length_min_m: input.lap_splice_length_min_m,
            max_rebar_length_m: input.max_rebar_length_m,
        },
        detailing_results: results,
        stirrups_config: input.stirrups_config.clone(),
        drawing_units: DrawingUnits::default(),
    })
}
