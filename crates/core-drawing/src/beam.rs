//! Beam outline, supports and axis markers.

use crate::context::RenderContext;
use crate::document::{DrawingDocument, DrawingEntity, HatchEntity, PolylineEntity, TextEntity};
use crate::geometry::rectangle;

#[derive(Debug, Clone)]
pub struct BeamRenderer {
    hatch_pattern: &'static str,
    hatch_scale: f64,
    axis_extension_top_mm: f64,
    axis_extension_bottom_mm: f64,
    axis_label_offset_mm: f64,
}

impl Default for BeamRenderer {
    fn default() -> Self {
        Self {
            hatch_pattern: "ANSI31",
            hatch_scale: 75.0,
            axis_extension_top_mm: 25.0,
            axis_extension_bottom_mm: 35.0,
            axis_label_offset_mm: 10.0,
        }
    }
}

impl BeamRenderer {
    pub fn draw(&self, document: &mut DrawingDocument, context: &RenderContext<'_>) {
        let outline_style = context.layer_style("beam_outline");
        document.add_entity(DrawingEntity::Polyline(PolylineEntity {
            layer: context.layer("beam_outline"),
            points: rectangle(
                context.origin,
                context.total_length_mm(),
                context.beam_height_mm,
            ),
            closed: true,
            color: outline_style.map(|style| style.color),
            lineweight: outline_style.map(|style| style.lineweight),
            ..PolylineEntity::default()
        }));

        self.draw_supports(document, context);
        self.draw_axis_markers(document, context);
    }

    fn draw_supports(&self, document: &mut DrawingDocument, context: &RenderContext<'_>) {
        let layer = context.layer("supports");
        let style = context.layer_style("supports");
        for support in &context.payload.geometry.supports {
            if support.width_m <= 0.0 {
                continue;
            }
            let start = context.space.from_m(support.start_m);
            let width = context.space.from_m(support.width_m);
            let points = rectangle(
                (context.origin.0 + start, context.origin.1),
                width,
                context.beam_height_mm,
            );
            document.add_entity(DrawingEntity::Polyline(PolylineEntity {
                layer: layer.clone(),
                points: points.clone(),
                closed: true,
                color: style.map(|s| s.color),
                lineweight: style.map(|s| s.lineweight),
                ..PolylineEntity::default()
            }));
            document.add_entity(DrawingEntity::Hatch(HatchEntity {
                layer: context.layer("beam_hatch"),
                metadata: Default::default(),
                boundary: points,
                pattern: self.hatch_pattern.to_string(),
                scale: self.hatch_scale,
                rotation: 0.0,
            }));
        }
    }

    fn draw_axis_markers(&self, document: &mut DrawingDocument, context: &RenderContext<'_>) {
        let axis_layer = context.layer("axes");
        let style = context.layer_style("axes");
        let text_style = context.text_style("labels", None);
        let vertical_scale = context.vertical_scale();
        let extension_top = self.axis_extension_top_mm * vertical_scale;
        let extension_bottom = self.axis_extension_bottom_mm * vertical_scale;
        let label_offset = self.axis_label_offset_mm * vertical_scale;

        for marker in &context.payload.geometry.axis_markers {
            let x = context.origin.0 + context.space.from_m(marker.position_m);
            let top = context.origin.1 + context.beam_height_mm + extension_top;
            let bottom = context.origin.1 - extension_bottom;
            document.add_entity(DrawingEntity::Polyline(PolylineEntity {
                layer: axis_layer.clone(),
                points: vec![(x, bottom), (x, top)],
                closed: false,
                color: style.map(|s| s.color),
                lineweight: style.map(|s| s.lineweight),
                ..PolylineEntity::default()
            }));
            document.add_entity(DrawingEntity::Text(TextEntity {
                layer: context.layer("text"),
                metadata: Default::default(),
                content: marker.label.clone(),
                insert: (x - 5.0, top + label_offset),
                height: context.text_height_mm(),
                rotation: 0.0,
                style: text_style.name.clone(),
            }));
        }
    }
}
