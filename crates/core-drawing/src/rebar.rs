//! Rebar lanes: overlap-free horizontal rows of bar lines.
//!
//! Geometrically identical bars (same diameter, start, end, length, hook)
//! coalesce into one drawn segment with a summed quantity. Segments sort
//! by x-interval and greedily reuse the lowest lane whose last occupant
//! ended before the segment starts (1e-3 tolerance); lane 0 is the
//! outermost row on each face.

use crate::context::RenderContext;
use crate::document::{DrawingDocument, DrawingEntity, LineEntity, Metadata, TextEntity};
use crate::geometry::DEFAULT_TOLERANCE;
use core_model::{BarPosition, RebarDetail};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct RebarDrawer {
    top_line_offset_mm: f64,
    bottom_line_offset_mm: f64,
    lap_separation_mm: f64,
}

impl Default for RebarDrawer {
    fn default() -> Self {
        Self {
            top_line_offset_mm: 300.0,
            bottom_line_offset_mm: 300.0,
            lap_separation_mm: 90.0,
        }
    }
}

/// One coalesced drawn segment.
#[derive(Debug, Clone)]
struct PreparedBar {
    bar: RebarDetail,
    start_x: f64,
    end_x: f64,
    quantity: u32,
}

impl RebarDrawer {
    pub fn draw(&self, document: &mut DrawingDocument, context: &RenderContext<'_>) {
        let Some(results) = context.payload.detailing_results.as_ref() else {
            return;
        };

        let lane_spacing = self.lane_spacing(context);
        let top_segments = self.prepare_segments(&results.top_bars, context);
        let bottom_segments = self.prepare_segments(&results.bottom_bars, context);

        self.draw_face(
            document,
            context,
            &top_segments,
            self.base_line_y(context, BarPosition::Top),
            -1.0,
            lane_spacing,
            BarPosition::Top,
        );
        self.draw_face(
            document,
            context,
            &bottom_segments,
            self.base_line_y(context, BarPosition::Bottom),
            1.0,
            lane_spacing,
            BarPosition::Bottom,
        );
    }

    fn prepare_segments(
        &self,
        bars: &[RebarDetail],
        context: &RenderContext<'_>,
    ) -> Vec<PreparedBar> {
        // Coalesce by geometric identity; key is rounded to 4 decimals so
        // equal placements group regardless of float noise.
        let mut grouped: BTreeMap<(String, i64, i64, i64, String), PreparedBar> = BTreeMap::new();
        for bar in bars {
            let mut start_x = context.origin.0 + context.space.from_m(bar.start_m);
            let mut end_x = context.origin.0 + context.space.from_m(bar.end_m);
            if end_x < start_x {
                std::mem::swap(&mut start_x, &mut end_x);
            }
            let round4 = |value: f64| (value * 10_000.0).round() as i64;
            let key = (
                bar.diameter.to_string(),
                round4(bar.start_m),
                round4(bar.end_m),
                round4(bar.length_m),
                bar.hook_type.to_string(),
            );
            grouped
                .entry(key)
                .and_modify(|existing| existing.quantity += bar.quantity.max(1))
                .or_insert_with(|| PreparedBar {
                    bar: bar.clone(),
                    start_x,
                    end_x,
                    quantity: bar.quantity.max(1),
                });
        }

        let mut prepared: Vec<PreparedBar> = grouped.into_values().collect();
        prepared.sort_by(|a, b| {
            a.start_x
                .total_cmp(&b.start_x)
                .then(a.end_x.total_cmp(&b.end_x))
        });
        prepared
    }

    /// Greedy interval partition: the first lane whose end cleared the
    /// segment start takes it.
    fn assign_lanes(&self, segments: &[PreparedBar]) -> Vec<usize> {
        let mut lane_ends: Vec<f64> = Vec::new();
        let mut assignments = Vec::with_capacity(segments.len());
        for segment in segments {
            let lane = lane_ends
                .iter()
                .position(|&end| segment.start_x >= end - DEFAULT_TOLERANCE);
            match lane {
                Some(index) => {
                    lane_ends[index] = segment.end_x;
                    assignments.push(index);
                }
                None => {
                    lane_ends.push(segment.end_x);
                    assignments.push(lane_ends.len() - 1);
                }
            }
        }
        assignments
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_face(
        &self,
        document: &mut DrawingDocument,
        context: &RenderContext<'_>,
        segments: &[PreparedBar],
        base_y: f64,
        direction: f64,
        lane_spacing: f64,
        position: BarPosition,
    ) {
        if segments.is_empty() {
            return;
        }

        let layer = context.layer("rebar_main");
        let layer_style = context.layer_style("rebar_main");
        let text_layer = context.layer("text");
        let text_style = context.text_style("labels", None);
        let text_offset = match position {
            BarPosition::Top => 12.0,
            BarPosition::Bottom => -18.0,
        } * context.vertical_scale();

        let assignments = self.assign_lanes(segments);
        for (segment, lane) in segments.iter().zip(assignments) {
            let y = base_y + direction * lane_spacing * lane as f64;
            document.add_entity(DrawingEntity::Line(LineEntity {
                layer: layer.clone(),
                metadata: Metadata::new(),
                start: (segment.start_x, y),
                end: (segment.end_x, y),
                color: layer_style.map(|style| style.color),
                lineweight: None,
            }));
            document.add_entity(DrawingEntity::Text(TextEntity {
                layer: text_layer.clone(),
                metadata: Metadata::new(),
                content: format!(
                    "{}Φ{} L={:.2}m",
                    segment.quantity, segment.bar.diameter, segment.bar.length_m
                ),
                insert: (segment.start_x, y + text_offset),
                height: context.text_height_mm(),
                rotation: 0.0,
                style: text_style.name.clone(),
            }));
        }
    }

    fn lane_spacing(&self, context: &RenderContext<'_>) -> f64 {
        (self.lap_separation_mm * context.vertical_scale().max(1.0)).max(1.0)
    }

    fn base_line_y(&self, context: &RenderContext<'_>, position: BarPosition) -> f64 {
        let scale = context.vertical_scale().max(1.0);
        match position {
            BarPosition::Top => {
                context.origin.1 + context.beam_height_mm - self.top_line_offset_mm * scale
            }
            BarPosition::Bottom => context.origin.1 + self.bottom_line_offset_mm * scale,
        }
    }
}
