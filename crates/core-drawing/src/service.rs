//! Drawing assembly pipeline.
//!
//! Fixed render order: beam outline + supports + axis markers, rebar
//! lanes, dimensions, title block, right info box with the section
//! schematic. The resulting document is format-independent; DXF/DWG/PDF/
//! SVG serializers consume it downstream.

use crate::beam::BeamRenderer;
use crate::context::RenderContext;
use crate::dimensions::DimensionRenderer;
use crate::document::DrawingDocument;
use crate::rebar::RebarDrawer;
use crate::schema::{BeamDrawingPayload, DrawingRenderRequest};
use crate::title_block::{RightInfoBoxRenderer, TitleBlockRenderer};
use core_templates::get_template_config;
use serde_json::json;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct BeamDrawingService {
    beam_renderer: BeamRenderer,
    rebar_drawer: RebarDrawer,
    dimension_renderer: DimensionRenderer,
    title_block_renderer: TitleBlockRenderer,
    right_info_box_renderer: RightInfoBoxRenderer,
}

impl BeamDrawingService {
    /// Inject a specific section template (tests, custom schematics).
    pub fn with_section_template(
        section_template: Option<core_templates::SectionTemplate>,
    ) -> Self {
        Self {
            right_info_box_renderer: RightInfoBoxRenderer::with_template(section_template),
            ..Self::default()
        }
    }

    pub fn render_document(
        &self,
        payload: &BeamDrawingPayload,
        request: &DrawingRenderRequest,
    ) -> DrawingDocument {
        let template = get_template_config(Some(request.template.as_str()));
        let locale = request
            .locale
            .clone()
            .unwrap_or_else(|| template.locale.clone());

        let mut document = DrawingDocument::new(payload.drawing_units.clone(), request.scale);
        document
            .metadata
            .insert("template".to_string(), json!(template.key));
        document
            .metadata
            .insert("locale".to_string(), json!(locale));
        document.metadata.insert(
            "beam".to_string(),
            serde_json::to_value(&payload.metadata).unwrap_or_default(),
        );

        let context = RenderContext::new(payload, &template, locale, request.scale);

        self.beam_renderer.draw(&mut document, &context);
        self.rebar_drawer.draw(&mut document, &context);
        self.dimension_renderer.draw(&mut document, &context);
        self.title_block_renderer.draw(&mut document, &context);
        self.right_info_box_renderer.draw(&mut document, &context);

        info!(
            entities = document.entities.len(),
            template = %template.key,
            "drawing document assembled"
        );
        document
    }
}

/// One-shot convenience over a default service.
pub fn render_document(
    payload: &BeamDrawingPayload,
    request: &DrawingRenderRequest,
) -> DrawingDocument {
    BeamDrawingService::default().render_document(payload, request)
}
