//! Dimension registers around the beam.
//!
//! Below the beam, three registers at decreasing y-offsets: (1) total
//! length, (2) span clear lengths and support widths, (3) axis-to-axis
//! spacings. A mirror register above the beam repeats the axis-to-axis
//! dimensions. Every dimension carries the context text height in its
//! metadata so the exporters render annotation text at the right size.

use crate::context::RenderContext;
use crate::document::{DimensionEntity, DrawingDocument, DrawingEntity, Metadata, TextEntity};
use serde_json::json;

#[derive(Debug, Clone)]
pub struct DimensionRenderer {
    offset_total_mm: f64,
    offset_spans_mm: f64,
    offset_axes_mm: f64,
    offset_top_mm: f64,
}

impl Default for DimensionRenderer {
    fn default() -> Self {
        Self {
            offset_total_mm: 60.0,
            offset_spans_mm: 90.0,
            offset_axes_mm: 120.0,
            offset_top_mm: 60.0,
        }
    }
}

impl DimensionRenderer {
    fn dimension_metadata(&self, context: &RenderContext<'_>) -> Metadata {
        Metadata::from([("text_height".to_string(), json!(context.text_height_mm()))])
    }

    pub fn draw(&self, document: &mut DrawingDocument, context: &RenderContext<'_>) {
        let vertical_scale = context.vertical_scale().max(1.0);
        let dim_layer = context.layer("dimensions");
        let text_style = context.text_style("dimensions", Some("labels"));
        let geometry = &context.payload.geometry;
        let metadata = self.dimension_metadata(context);

        // Register 1: total length.
        let base_y = context.origin.1 - self.offset_total_mm * vertical_scale;
        document.add_entity(DrawingEntity::Dimension(DimensionEntity {
            layer: dim_layer.clone(),
            metadata: metadata.clone(),
            start: (context.origin.0, base_y),
            end: (context.origin.0 + context.total_length_mm(), base_y),
            offset: 25.0,
            text_override: Some(format!("{:.2} m", geometry.total_length_m)),
        }));
        document.add_entity(DrawingEntity::Text(TextEntity {
            layer: context.layer("text"),
            metadata: Metadata::new(),
            content: "Longitud total".to_string(),
            insert: (context.origin.0, base_y - 10.0 * vertical_scale),
            height: text_style.height * context.scale,
            rotation: 0.0,
            style: text_style.name.clone(),
        }));

        // Register 2: spans and support widths.
        let span_y = context.origin.1 - self.offset_spans_mm * vertical_scale;
        for span in &geometry.spans {
            let start_x = context.origin.0 + context.space.from_m(span.start_m);
            let end_x = context.origin.0 + context.space.from_m(span.end_m);
            document.add_entity(DrawingEntity::Dimension(DimensionEntity {
                layer: dim_layer.clone(),
                metadata: metadata.clone(),
                start: (start_x, span_y),
                end: (end_x, span_y),
                offset: 20.0,
                text_override: Some(format!("{:.2} m", span.clear_length_m)),
            }));
            document.add_entity(DrawingEntity::Text(TextEntity {
                layer: context.layer("text"),
                metadata: Metadata::new(),
                content: span.label.clone(),
                insert: (start_x, span_y - 12.0 * vertical_scale),
                height: text_style.height * context.scale,
                rotation: 0.0,
                style: text_style.name.clone(),
            }));
        }
        for support in &geometry.supports {
            if support.width_m <= 0.0 {
                continue;
            }
            let start_x = context.origin.0 + context.space.from_m(support.start_m);
            let end_x = context.origin.0 + context.space.from_m(support.end_m);
            document.add_entity(DrawingEntity::Dimension(DimensionEntity {
                layer: dim_layer.clone(),
                metadata: metadata.clone(),
                start: (start_x, span_y),
                end: (end_x, span_y),
                offset: 20.0,
                text_override: Some(format!("{:.2}", support.width_m)),
            }));
        }

        // Register 3 below and the mirror register above: axis-to-axis.
        let axes_y = context.origin.1 - self.offset_axes_mm * vertical_scale;
        let top_y =
            context.origin.1 + context.beam_height_mm + self.offset_top_mm * vertical_scale;
        for pair in geometry.axis_markers.windows(2) {
            let start_x = context.origin.0 + context.space.from_m(pair[0].position_m);
            let end_x = context.origin.0 + context.space.from_m(pair[1].position_m);
            let spacing = pair[1].position_m - pair[0].position_m;
            for y in [axes_y, top_y] {
                document.add_entity(DrawingEntity::Dimension(DimensionEntity {
                    layer: dim_layer.clone(),
                    metadata: metadata.clone(),
                    start: (start_x, y),
                    end: (end_x, y),
                    offset: 20.0,
                    text_override: Some(format!("{spacing:.2} m")),
                }));
            }
        }
    }
}
