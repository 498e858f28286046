//! Section schematic template, authored externally as a DXF file.
//!
//! The loader vectorizes LWPOLYLINE/POLYLINE (as-is), LINE (two-point
//! polyline), CIRCLE (sampled into 48 segments) and MTEXT/TEXT entities;
//! anything else is ignored. Text whose whole content is `{{IDENT}}`
//! (no whitespace inside the braces) registers a placeholder key;
//! unmatched placeholders keep their literal content at instantiation.
//!
//! The parse is memoized: first use reads the file, every later call gets
//! the shared immutable result.

use dxf::Drawing;
use dxf::entities::EntityType;
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::warn;

/// Environment override for the section template location.
pub const SECTION_TEMPLATE_ENV: &str = "DESPIECE_SECTION_TEMPLATE";

const DEFAULT_SECTION_TEMPLATE_PATH: &str = "assets/section_template.dxf";

const CIRCLE_SEGMENTS: usize = 48;

#[derive(Debug, Error)]
pub enum SectionTemplateError {
    #[error("no se pudo leer el template de sección {path}: {source}")]
    Unreadable {
        path: String,
        source: dxf::DxfError,
    },
    #[error("el template de sección no contiene entidades procesables")]
    Empty,
}

/// Text anchor of a template text, reduced to the nine CAD attachment
/// points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Attachment {
    /// Horizontal alignment code (0 left, 1 center, 2 right).
    pub fn halign(self) -> u8 {
        match self {
            Attachment::TopLeft | Attachment::MiddleLeft | Attachment::BottomLeft => 0,
            Attachment::TopCenter | Attachment::MiddleCenter | Attachment::BottomCenter => 1,
            Attachment::TopRight | Attachment::MiddleRight | Attachment::BottomRight => 2,
        }
    }

    /// Vertical alignment code (1 bottom, 2 middle, 3 top).
    pub fn valign(self) -> u8 {
        match self {
            Attachment::TopLeft | Attachment::TopCenter | Attachment::TopRight => 3,
            Attachment::MiddleLeft | Attachment::MiddleCenter | Attachment::MiddleRight => 2,
            Attachment::BottomLeft | Attachment::BottomCenter | Attachment::BottomRight => 1,
        }
    }
}

fn attachment_from_dxf(point: dxf::enums::AttachmentPoint) -> Attachment {
    use dxf::enums::AttachmentPoint as D;
    match point {
        D::TopLeft => Attachment::TopLeft,
        D::TopCenter => Attachment::TopCenter,
        D::TopRight => Attachment::TopRight,
        D::MiddleLeft => Attachment::MiddleLeft,
        D::MiddleCenter => Attachment::MiddleCenter,
        D::MiddleRight => Attachment::MiddleRight,
        D::BottomLeft => Attachment::BottomLeft,
        D::BottomCenter => Attachment::BottomCenter,
        D::BottomRight => Attachment::BottomRight,
    }
}

/// One vectorized polyline of the template, in template coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePolyline {
    pub layer: String,
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
}

/// One text of the template, possibly a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateText {
    pub layer: String,
    pub content: String,
    pub insert: (f64, f64),
    pub height: f64,
    pub rotation: f64,
    pub attachment: Option<Attachment>,
    pub placeholder: Option<String>,
}

/// Instantiated template entity in drawing coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionEntity {
    Polyline {
        layer: String,
        points: Vec<(f64, f64)>,
        closed: bool,
    },
    Text {
        layer: String,
        content: String,
        insert: (f64, f64),
        height: f64,
        rotation: f64,
        halign: Option<u8>,
        valign: Option<u8>,
    },
}

/// The parsed section template with its bounding box.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionTemplate {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub polylines: Vec<TemplatePolyline>,
    pub texts: Vec<TemplateText>,
}

impl SectionTemplate {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Placeholder keys present in the template, in document order.
    pub fn placeholder_keys(&self) -> Vec<&str> {
        self.texts
            .iter()
            .filter_map(|text| text.placeholder.as_deref())
            .collect()
    }

    /// Scale + translate every entity and substitute placeholder values.
    /// `replacements` maps placeholder keys to final text; unmatched
    /// placeholders keep their literal content.
    pub fn instantiate(
        &self,
        scale: f64,
        offset: (f64, f64),
        shape_layer: &str,
        text_layer: &str,
        replacements: &std::collections::HashMap<String, String>,
    ) -> Vec<SectionEntity> {
        let (ox, oy) = offset;
        let mut entities = Vec::with_capacity(self.polylines.len() + self.texts.len());

        for polyline in &self.polylines {
            entities.push(SectionEntity::Polyline {
                layer: shape_layer.to_string(),
                points: polyline
                    .points
                    .iter()
                    .map(|&(x, y)| (ox + scale * x, oy + scale * y))
                    .collect(),
                closed: polyline.closed,
            });
        }

        for text in &self.texts {
            let content = text
                .placeholder
                .as_ref()
                .and_then(|key| replacements.get(key))
                .cloned()
                .unwrap_or_else(|| text.content.clone());
            entities.push(SectionEntity::Text {
                layer: text_layer.to_string(),
                content,
                insert: (ox + scale * text.insert.0, oy + scale * text.insert.1),
                height: text.height * scale,
                rotation: text.rotation,
                halign: text.attachment.map(Attachment::halign),
                valign: text.attachment.map(Attachment::valign),
            });
        }

        entities
    }
}

/// Exactly `{{IDENT}}` with no whitespace inside the braces.
fn extract_placeholder(content: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"^\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}$").expect("static pattern")
    });
    pattern
        .captures(content.trim())
        .map(|captures| captures[1].to_string())
}

fn circle_points(center: (f64, f64), radius: f64) -> Vec<(f64, f64)> {
    let (cx, cy) = center;
    (0..=CIRCLE_SEGMENTS)
        .map(|index| {
            let angle = 2.0 * std::f64::consts::PI * (index as f64 / CIRCLE_SEGMENTS as f64);
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect()
}

/// Read and vectorize a section template file.
pub fn load_section_template(path: &Path) -> Result<SectionTemplate, SectionTemplateError> {
    let drawing = Drawing::load_file(path.to_string_lossy().as_ref()).map_err(|source| {
        SectionTemplateError::Unreadable {
            path: path.display().to_string(),
            source,
        }
    })?;

    let mut polylines: Vec<TemplatePolyline> = Vec::new();
    let mut texts: Vec<TemplateText> = Vec::new();
    let mut bounds = Bounds::new();

    for entity in drawing.entities() {
        let layer = entity.common.layer.clone();
        match entity.specific {
            EntityType::LwPolyline(ref lwp) => {
                let points: Vec<(f64, f64)> =
                    lwp.vertices.iter().map(|vertex| (vertex.x, vertex.y)).collect();
                bounds.extend(&points);
                polylines.push(TemplatePolyline {
                    layer,
                    points,
                    closed: lwp.get_is_closed(),
                });
            }
            EntityType::Polyline(ref polyline) => {
                let points: Vec<(f64, f64)> = polyline
                    .vertices()
                    .map(|vertex| (vertex.location.x, vertex.location.y))
                    .collect();
                bounds.extend(&points);
                polylines.push(TemplatePolyline {
                    layer,
                    points,
                    closed: polyline.get_is_closed(),
                });
            }
            EntityType::Line(ref line) => {
                let points = vec![(line.p1.x, line.p1.y), (line.p2.x, line.p2.y)];
                bounds.extend(&points);
                polylines.push(TemplatePolyline {
                    layer,
                    points,
                    closed: false,
                });
            }
            EntityType::Circle(ref circle) => {
                let points = circle_points((circle.center.x, circle.center.y), circle.radius);
                bounds.extend(&points);
                polylines.push(TemplatePolyline {
                    layer,
                    points,
                    closed: true,
                });
            }
            EntityType::MText(ref mtext) => {
                let mut content = mtext.text.clone();
                for extended in &mtext.extended_text {
                    content.push_str(extended);
                }
                let content = content.replace("\\P", "\n").trim().to_string();
                let insert = (mtext.insertion_point.x, mtext.insertion_point.y);
                bounds.extend(&[insert]);
                texts.push(TemplateText {
                    layer,
                    placeholder: extract_placeholder(&content),
                    content,
                    insert,
                    height: mtext.initial_text_height,
                    rotation: mtext.rotation_angle,
                    attachment: Some(attachment_from_dxf(mtext.attachment_point)),
                });
            }
            EntityType::Text(ref text) => {
                let content = text.value.trim().to_string();
                let insert = (text.location.x, text.location.y);
                bounds.extend(&[insert]);
                texts.push(TemplateText {
                    layer,
                    placeholder: extract_placeholder(&content),
                    content,
                    insert,
                    height: text.text_height,
                    rotation: text.rotation,
                    attachment: None,
                });
            }
            _ => {}
        }
    }

    if polylines.is_empty() && texts.is_empty() {
        return Err(SectionTemplateError::Empty);
    }

    let (min_x, min_y, max_x, max_y) = bounds.finish();
    Ok(SectionTemplate {
        min_x,
        min_y,
        max_x,
        max_y,
        polylines,
        texts,
    })
}

/// Memoized default-path section template. `None` when the file is absent
/// or empty; renderers fall back to the hand-drawn schematic.
pub fn get_section_template() -> Option<&'static SectionTemplate> {
    static TEMPLATE: OnceLock<Option<SectionTemplate>> = OnceLock::new();
    TEMPLATE
        .get_or_init(|| {
            let path = std::env::var(SECTION_TEMPLATE_ENV)
                .unwrap_or_else(|_| DEFAULT_SECTION_TEMPLATE_PATH.to_string());
            match load_section_template(Path::new(&path)) {
                Ok(template) => Some(template),
                Err(error) => {
                    warn!(%error, "section template unavailable; legacy schematic will be used");
                    None
                }
            }
        })
        .as_ref()
}

struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    fn extend(&mut self, points: &[(f64, f64)]) {
        for &(x, y) in points {
            self.min_x = self.min_x.min(x);
            self.min_y = self.min_y.min(y);
            self.max_x = self.max_x.max(x);
            self.max_y = self.max_y.max(y);
        }
    }

    fn finish(self) -> (f64, f64, f64, f64) {
        if self.min_x.is_infinite() || self.min_y.is_infinite() {
            return (0.0, 0.0, 0.0, 0.0);
        }
        (self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_grammar_is_strict() {
        assert_eq!(extract_placeholder("{{BASE_VIGA}}"), Some("BASE_VIGA".into()));
        assert_eq!(extract_placeholder("  {{ESTRIBO}}  "), Some("ESTRIBO".into()));
        assert_eq!(extract_placeholder("{{BASE VIGA}}"), None);
        assert_eq!(extract_placeholder("{{BASE_VIGA}} extra"), None);
        assert_eq!(extract_placeholder("plain text"), None);
        assert_eq!(extract_placeholder("{{}}"), None);
    }

    #[test]
    fn circle_sampling_closes_the_loop() {
        let points = circle_points((1.0, 2.0), 0.5);
        assert_eq!(points.len(), CIRCLE_SEGMENTS + 1);
        let first = points.first().unwrap();
        let last = points.last().unwrap();
        assert!((first.0 - last.0).abs() < 1e-9);
        assert!((first.1 - last.1).abs() < 1e-9);
    }

    #[test]
    fn attachment_codes_follow_cad_convention() {
        assert_eq!(Attachment::TopCenter.halign(), 1);
        assert_eq!(Attachment::TopCenter.valign(), 3);
        assert_eq!(Attachment::BottomLeft.halign(), 0);
        assert_eq!(Attachment::BottomLeft.valign(), 1);
    }

    #[test]
    fn instantiate_scales_and_substitutes() {
        let template = SectionTemplate {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 10.0,
            max_y: 20.0,
            polylines: vec![TemplatePolyline {
                layer: "0".into(),
                points: vec![(0.0, 0.0), (10.0, 0.0)],
                closed: false,
            }],
            texts: vec![
                TemplateText {
                    layer: "0".into(),
                    content: "{{BASE_VIGA}}".into(),
                    insert: (5.0, 10.0),
                    height: 2.0,
                    rotation: 0.0,
                    attachment: Some(Attachment::MiddleCenter),
                    placeholder: Some("BASE_VIGA".into()),
                },
                TemplateText {
                    layer: "0".into(),
                    content: "{{SIN_VALOR}}".into(),
                    insert: (5.0, 12.0),
                    height: 2.0,
                    rotation: 0.0,
                    attachment: None,
                    placeholder: Some("SIN_VALOR".into()),
                },
            ],
        };

        let replacements =
            std::collections::HashMap::from([("BASE_VIGA".to_string(), "B = 0.30 m".to_string())]);
        let entities = template.instantiate(2.0, (100.0, 200.0), "SHAPES", "TEXTS", &replacements);
        assert_eq!(entities.len(), 3);

        match &entities[0] {
            SectionEntity::Polyline { points, layer, .. } => {
                assert_eq!(layer, "SHAPES");
                assert_eq!(points[1], (120.0, 200.0));
            }
            other => panic!("expected polyline, got {other:?}"),
        }
        match &entities[1] {
            SectionEntity::Text {
                content,
                insert,
                height,
                halign,
                ..
            } => {
                assert_eq!(content, "B = 0.30 m");
                assert_eq!(*insert, (110.0, 220.0));
                assert_eq!(*height, 4.0);
                assert_eq!(*halign, Some(1));
            }
            other => panic!("expected text, got {other:?}"),
        }
        // Unmatched placeholders keep their literal content.
        match &entities[2] {
            SectionEntity::Text { content, .. } => assert_eq!(content, "{{SIN_VALOR}}"),
            other => panic!("expected text, got {other:?}"),
        }
    }
}
