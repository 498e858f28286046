//! Title block (left end) and right info box with the section schematic.
//!
//! Both boxes are rounded-corner polylines hugging a beam end, with an
//! inner offset outline and centered text stacks. The right box also
//! hosts the beam section schematic: instantiated from the external DXF
//! template when available, otherwise drawn as the legacy hand-made
//! schematic (outer rectangle, dashed stirrup loop, corner bars).

use crate::context::RenderContext;
use crate::document::{DrawingDocument, DrawingEntity, Metadata, PolylineEntity, TextEntity};
use crate::geometry::{arc_points, rounded_rect_points};
use core_model::BarMark;
use core_templates::{SectionEntity, SectionTemplate};
use serde_json::json;
use std::collections::HashMap;
use tracing::debug;

fn centered_text_metadata(insert: (f64, f64)) -> Metadata {
    Metadata::from([
        ("halign".to_string(), json!(1)),
        ("align_point".to_string(), json!([insert.0, insert.1])),
    ])
}

fn gauge_text(mark: BarMark) -> String {
    match mark {
        BarMark::M3 => "Ø3/8\"".to_string(),
        BarMark::M4 => "Ø1/2\"".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct TitleBlockRenderer {
    width_mm: f64,
    corner_radius_mm: f64,
    inner_offset_mm: f64,
}

impl Default for TitleBlockRenderer {
    fn default() -> Self {
        Self {
            width_mm: 2400.0,
            corner_radius_mm: 150.0,
            inner_offset_mm: 70.0,
        }
    }
}

impl TitleBlockRenderer {
    pub fn draw(&self, document: &mut DrawingDocument, context: &RenderContext<'_>) {
        let layer = context.layer("title_block");
        let style = context.layer_style("title_block");
        let text_style = context.text_style("title", None);
        let scale = context.vertical_scale().max(1.0);

        let height = context.beam_height_mm;
        if height <= 0.0 {
            return;
        }
        let width = self.width_mm * scale;
        let radius = self.corner_radius_mm * scale;
        let right = context.origin.0;
        let left = right - width;
        let bottom = context.origin.1;
        let top = bottom + height;

        // Outline with rounded corners on the outer (left) side only.
        let mut points = vec![
            (left + radius, bottom),
            (right, bottom),
            (right, top),
            (left + radius, top),
        ];
        points.extend(
            arc_points((left + radius, top - radius), radius, 90.0, 180.0, 4)
                .into_iter()
                .skip(1),
        );
        points.push((left, bottom + radius));
        points.extend(
            arc_points((left + radius, bottom + radius), radius, 180.0, 270.0, 4)
                .into_iter()
                .skip(1),
        );
        document.add_entity(DrawingEntity::Polyline(PolylineEntity {
            layer: layer.clone(),
            points,
            closed: true,
            color: style.map(|s| s.color),
            lineweight: style.map(|s| s.lineweight),
            ..PolylineEntity::default()
        }));
        draw_inner_outline(
            document,
            &layer,
            style.map(|s| (s.color, s.lineweight)),
            left,
            bottom,
            width,
            height,
            radius,
            self.inner_offset_mm * scale,
        );

        let metadata = &context.payload.metadata;
        let section_text = context
            .payload
            .geometry
            .spans
            .first()
            .map(|span| {
                format!(
                    "b={:.2} h={:.2}",
                    span.section_width_cm / 100.0,
                    span.section_height_cm / 100.0
                )
            })
            .unwrap_or_else(|| "Sección: N/D".to_string());
        let level_text = metadata
            .element_level
            .map(|level| format!("Nivel: {level:.2}"))
            .unwrap_or_else(|| "Nivel: N/A".to_string());

        let lines = [
            metadata.beam_label.clone(),
            level_text,
            section_text,
            format!("Cantidad: {}", metadata.element_quantity),
        ];

        let padding_y = 220.0 * scale;
        let line_spacing = 400.0 * scale;
        let center_x = left + width / 2.0;
        let mut positions: Vec<(String, f64)> = Vec::with_capacity(lines.len());
        for (index, line) in lines[..2].iter().enumerate() {
            positions.push((
                line.clone(),
                top - padding_y - index as f64 * line_spacing - 100.0 * scale,
            ));
        }
        let quantity_y = bottom + 250.0 * scale;
        let section_y = quantity_y + 250.0 * scale;
        positions.push((lines[2].clone(), section_y));
        positions.push((lines[3].clone(), quantity_y));

        for (content, y) in positions {
            let insert = (center_x, y);
            document.add_entity(DrawingEntity::Text(TextEntity {
                layer: context.layer("text"),
                metadata: centered_text_metadata(insert),
                content,
                insert,
                height: context.text_height_mm(),
                rotation: 0.0,
                style: text_style.name.clone(),
            }));
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RightInfoBoxRenderer {
    config: RightInfoBoxConfig,
    /// Injected section template; `None` falls back to the shared
    /// memoized template, then to the legacy schematic.
    pub section_template: Option<SectionTemplate>,
}

#[derive(Debug, Clone)]
pub struct RightInfoBoxConfig {
    pub width_mm: f64,
    pub corner_radius_mm: f64,
    pub bottom_padding_mm: f64,
    pub line_spacing_mm: f64,
    pub inner_offset_mm: f64,
}

impl Default for RightInfoBoxConfig {
    fn default() -> Self {
        Self {
            width_mm: 2600.0,
            corner_radius_mm: 150.0,
            bottom_padding_mm: 170.0,
            line_spacing_mm: 170.0,
            inner_offset_mm: 70.0,
        }
    }
}

impl RightInfoBoxRenderer {
    pub fn with_template(section_template: Option<SectionTemplate>) -> Self {
        Self {
            config: RightInfoBoxConfig::default(),
            section_template,
        }
    }

    pub fn draw(&self, document: &mut DrawingDocument, context: &RenderContext<'_>) {
        let layer = context.layer("title_block");
        let style = context.layer_style("title_block");
        let text_style = context.text_style("title", None);
        let text_layer = context.layer("text");
        let scale = context.vertical_scale().max(1.0);

        let height = context.beam_height_mm;
        if height <= 0.0 {
            return;
        }
        let width = self.config.width_mm * scale;
        let radius = self.config.corner_radius_mm * scale;
        let left = context.origin.0 + context.total_length_mm();
        let right = left + width;
        let bottom = context.origin.1;
        let top = bottom + height;

        // Outline rounded on the outer (right) side.
        let mut points = vec![(left, bottom), (right - radius, bottom)];
        points.extend(
            arc_points((right - radius, bottom + radius), radius, 270.0, 360.0, 4)
                .into_iter()
                .skip(1),
        );
        points.push((right, top - radius));
        points.extend(
            arc_points((right - radius, top - radius), radius, 0.0, 90.0, 4)
                .into_iter()
                .skip(1),
        );
        points.push((right - radius, top));
        points.push((left, top));
        document.add_entity(DrawingEntity::Polyline(PolylineEntity {
            layer: layer.clone(),
            points,
            closed: true,
            color: style.map(|s| s.color),
            lineweight: style.map(|s| s.lineweight),
            ..PolylineEntity::default()
        }));
        draw_inner_outline(
            document,
            &layer,
            style.map(|s| (s.color, s.lineweight)),
            left,
            bottom,
            width,
            height,
            radius,
            self.config.inner_offset_mm * scale,
        );

        // Three stacked centered lines from the bottom up: steel grade,
        // concrete class, stirrup summary.
        let center_x = left + width / 2.0;
        let line_spacing = self.config.line_spacing_mm * scale;
        let steel_insert = (center_x, bottom + self.config.bottom_padding_mm * scale);
        let concrete_insert = (center_x, steel_insert.1 + line_spacing);
        let summary_insert = (center_x, concrete_insert.1 + line_spacing);
        let lines = [
            (steel_insert, self.steel_text(context), 0.85),
            (concrete_insert, self.concrete_text(context), 0.85),
            (summary_insert, self.stirrup_summary_text(context), 1.0),
        ];
        for (insert, content, height_factor) in lines {
            document.add_entity(DrawingEntity::Text(TextEntity {
                layer: text_layer.clone(),
                metadata: centered_text_metadata(insert),
                content,
                insert,
                height: context.text_height_mm() * height_factor,
                rotation: 0.0,
                style: text_style.name.clone(),
            }));
        }

        self.draw_section_schematic(
            document,
            context,
            (left, bottom),
            width,
            height,
            summary_insert.1,
            scale,
        );
    }

    /// Target box for the schematic: 70 % of the inner width, the height
    /// left above the text stack.
    #[allow(clippy::too_many_arguments)]
    fn draw_section_schematic(
        &self,
        document: &mut DrawingDocument,
        context: &RenderContext<'_>,
        box_origin: (f64, f64),
        box_width: f64,
        box_height: f64,
        text_top_y: f64,
        scale: f64,
    ) {
        let inner = self.config.inner_offset_mm * scale;
        let available_width = (box_width - 2.0 * inner) * 0.7;
        let bottom = text_top_y + self.config.line_spacing_mm * scale;
        let available_height = box_origin.1 + box_height - inner - bottom;
        if available_width <= 0.0 || available_height <= 0.0 {
            return;
        }

        let template = self
            .section_template
            .as_ref()
            .or(core_templates::get_section_template());

        match template {
            Some(template) if template.width() > 0.0 && template.height() > 0.0 => {
                let fit = (available_width / template.width())
                    .min(available_height / template.height());
                let target_x = box_origin.0
                    + (box_width - template.width() * fit) / 2.0
                    - template.min_x * fit;
                let target_y = bottom - template.min_y * fit;
                let replacements = self.placeholder_values(context);
                let entities = template.instantiate(
                    fit,
                    (target_x, target_y),
                    &context.layer("title_block"),
                    &context.layer("text"),
                    &replacements,
                );
                for entity in entities {
                    document.add_entity(section_entity_to_drawing(
                        entity,
                        &context.text_style("labels", None).name,
                    ));
                }
            }
            _ => {
                debug!("section template unavailable; drawing legacy schematic");
                self.draw_legacy_schematic(
                    document,
                    context,
                    box_origin,
                    box_width,
                    bottom,
                    available_width,
                    available_height,
                );
            }
        }
    }

    /// Hand-made schematic: section rectangle, dashed stirrup loop inset
    /// by the cover, one bar circle per corner.
    #[allow(clippy::too_many_arguments)]
    fn draw_legacy_schematic(
        &self,
        document: &mut DrawingDocument,
        context: &RenderContext<'_>,
        box_origin: (f64, f64),
        box_width: f64,
        bottom: f64,
        available_width: f64,
        available_height: f64,
    ) {
        let Some(span) = context.payload.geometry.spans.first() else {
            return;
        };
        let base_mm = context.space.from_cm(span.section_width_cm);
        let height_mm = context.space.from_cm(span.section_height_cm);
        if base_mm <= 0.0 || height_mm <= 0.0 {
            return;
        }
        let fit = (available_width / base_mm).min(available_height / height_mm);
        let width = base_mm * fit;
        let height = height_mm * fit;
        let origin_x = box_origin.0 + (box_width - width) / 2.0;
        let layer = context.layer("title_block");

        document.add_entity(DrawingEntity::Polyline(PolylineEntity {
            layer: layer.clone(),
            points: crate::geometry::rectangle((origin_x, bottom), width, height),
            closed: true,
            ..PolylineEntity::default()
        }));

        let cover = context.cover_mm * fit;
        if width > 2.0 * cover && height > 2.0 * cover {
            document.add_entity(DrawingEntity::Polyline(PolylineEntity {
                layer: context.layer("rebar_stirrups"),
                metadata: Metadata::from([("linetype".to_string(), json!("DASHED"))]),
                points: crate::geometry::rectangle(
                    (origin_x + cover, bottom + cover),
                    width - 2.0 * cover,
                    height - 2.0 * cover,
                ),
                closed: true,
                ..PolylineEntity::default()
            }));

            let bar_radius = 18.0 * fit;
            let corners = [
                (origin_x + cover + bar_radius, bottom + cover + bar_radius),
                (origin_x + width - cover - bar_radius, bottom + cover + bar_radius),
                (
                    origin_x + cover + bar_radius,
                    bottom + height - cover - bar_radius,
                ),
                (
                    origin_x + width - cover - bar_radius,
                    bottom + height - cover - bar_radius,
                ),
            ];
            for center in corners {
                document.add_entity(DrawingEntity::Polyline(PolylineEntity {
                    layer: context.layer("rebar_main"),
                    points: arc_points(center, bar_radius, 0.0, 360.0, 16),
                    closed: true,
                    ..PolylineEntity::default()
                }));
            }
        }
    }

    /// Values substituted into the template's `{{…}}` texts.
    fn placeholder_values(&self, context: &RenderContext<'_>) -> HashMap<String, String> {
        let mut values = HashMap::new();
        if let Some(span) = context.payload.geometry.spans.first() {
            values.insert(
                "BASE_VIGA".to_string(),
                format!("B = {:.2} m", span.section_width_cm / 100.0),
            );
            values.insert(
                "ALTURA_VIGA".to_string(),
                format!("H = {:.2} m", span.section_height_cm / 100.0),
            );
        }
        values.insert(
            "RECUBRIMIENTO".to_string(),
            format!("r = {:.2} m", context.payload.rebar_layout.cover_cm / 100.0),
        );
        if let Some(summary) = context
            .payload
            .detailing_results
            .as_ref()
            .and_then(|results| results.stirrups_summary.as_ref())
        {
            values.insert(
                "ESTRIBO".to_string(),
                format!(
                    "Fleje {} {}°",
                    gauge_text(summary.diameter),
                    summary.hook_type.degrees()
                ),
            );
        }
        values
    }

    fn stirrup_summary_text(&self, context: &RenderContext<'_>) -> String {
        let summary = context
            .payload
            .detailing_results
            .as_ref()
            .and_then(|results| results.stirrups_summary.as_ref());

        let gauge = summary
            .map(|summary| gauge_text(summary.diameter))
            .unwrap_or_else(|| gauge_text(BarMark::M3));
        let total_count: u32 = summary
            .map(|summary| {
                summary
                    .zone_segments
                    .iter()
                    .filter_map(|segment| segment.estimated_count)
                    .sum()
            })
            .unwrap_or(0);
        let section_height_m = context
            .payload
            .geometry
            .spans
            .first()
            .map(|span| span.section_height_cm / 100.0)
            .unwrap_or(0.0);
        let stirrup_length_m = (section_height_m * 3.0).max(1.0);
        format!("{total_count} Flejes {gauge} L={stirrup_length_m:.2}m")
    }

    fn concrete_text(&self, context: &RenderContext<'_>) -> String {
        format!("f'c={}", context.payload.metadata.concrete_strength)
    }

    fn steel_text(&self, context: &RenderContext<'_>) -> String {
        format!("f'y={}", context.payload.metadata.reinforcement)
    }
}

fn section_entity_to_drawing(entity: SectionEntity, text_style: &str) -> DrawingEntity {
    match entity {
        SectionEntity::Polyline {
            layer,
            points,
            closed,
        } => DrawingEntity::Polyline(PolylineEntity {
            layer,
            points,
            closed,
            ..PolylineEntity::default()
        }),
        SectionEntity::Text {
            layer,
            content,
            insert,
            height,
            rotation,
            halign,
            valign,
        } => {
            let mut metadata = Metadata::from([(
                "align_point".to_string(),
                json!([insert.0, insert.1]),
            )]);
            if let Some(halign) = halign {
                metadata.insert("halign".to_string(), json!(halign));
            }
            if let Some(valign) = valign {
                metadata.insert("valign".to_string(), json!(valign));
            }
            DrawingEntity::Text(TextEntity {
                layer,
                metadata,
                content,
                insert,
                height,
                rotation,
                style: text_style.to_string(),
            })
        }
    }
}

/// Offset inner outline shared by both boxes.
#[allow(clippy::too_many_arguments)]
fn draw_inner_outline(
    document: &mut DrawingDocument,
    layer: &str,
    style: Option<(i32, f64)>,
    left: f64,
    bottom: f64,
    width: f64,
    height: f64,
    outer_radius: f64,
    inner_offset: f64,
) {
    if width <= 2.0 * inner_offset || height <= 2.0 * inner_offset {
        return;
    }
    let inner_width = width - 2.0 * inner_offset;
    let inner_height = height - 2.0 * inner_offset;
    let mut inner_radius = (outer_radius - inner_offset).max(0.0);
    if inner_radius == 0.0 {
        inner_radius = inner_width.min(inner_height) * 0.1;
    }
    let points = rounded_rect_points(
        left + inner_offset,
        bottom + inner_offset,
        inner_width,
        inner_height,
        inner_radius,
    );
    if points.is_empty() {
        return;
    }
    document.add_entity(DrawingEntity::Polyline(PolylineEntity {
        layer: layer.to_string(),
        points,
        closed: true,
        color: style.map(|(color, _)| color),
        lineweight: style.map(|(_, lineweight)| lineweight),
        ..PolylineEntity::default()
    }));
}
