//! Render context shared by every renderer of one document.

use crate::document::Point;
use crate::geometry::CoordinateSpace;
use crate::schema::BeamDrawingPayload;
use core_templates::{LayerStyle, TemplateConfig, TextStyle};

/// Plot scale the layout constants were tuned for.
pub const REFERENCE_SCALE: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub payload: &'a BeamDrawingPayload,
    pub template: &'a TemplateConfig,
    pub space: CoordinateSpace,
    pub beam_height_mm: f64,
    pub cover_mm: f64,
    pub locale: String,
    pub origin: Point,
    /// Plot scale of this render (drawing units stay 1:1 model space).
    pub scale: f64,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        payload: &'a BeamDrawingPayload,
        template: &'a TemplateConfig,
        locale: String,
        scale: f64,
    ) -> Self {
        let space = CoordinateSpace::new(payload.drawing_units.clone());
        let max_height_cm = payload
            .geometry
            .spans
            .iter()
            .map(|span| span.section_height_cm)
            .fold(f64::NEG_INFINITY, f64::max);
        let beam_height_mm = space.from_cm(if max_height_cm.is_finite() {
            max_height_cm
        } else {
            45.0
        });
        let cover_mm = space.from_cm(template.cover_cm(payload.rebar_layout.cover_cm));
        Self {
            payload,
            template,
            space,
            beam_height_mm,
            cover_mm,
            locale,
            origin: (0.0, 0.0),
            scale,
        }
    }

    pub fn layer(&self, alias: &str) -> String {
        self.template.layer_name(alias)
    }

    pub fn layer_style(&self, alias: &str) -> Option<&LayerStyle> {
        self.template.layer_style(alias)
    }

    pub fn text_style(&self, alias: &str, fallback: Option<&str>) -> TextStyle {
        self.template.text_style(alias, fallback)
    }

    /// Paper-relative magnification of layout offsets.
    pub fn vertical_scale(&self) -> f64 {
        self.scale / REFERENCE_SCALE
    }

    /// Model-space text height for the labels family at this plot scale.
    pub fn text_height_mm(&self) -> f64 {
        self.text_style("labels", None).height * self.scale
    }

    pub fn total_length_mm(&self) -> f64 {
        self.space.from_m(self.payload.geometry.total_length_m)
    }
}
