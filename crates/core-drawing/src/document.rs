//! Drawing document: an ordered, layered list of primitive entities.
//!
//! Entity order is draw order. The document serializes with a `type` tag
//! per entity, which is the exact shape the external DXF/DWG/PDF/SVG
//! serializers consume. Metadata values are free-form JSON so renderers
//! can attach alignment codes, text heights and anchor points without
//! widening the entity structs.

use core_templates::DrawingUnits;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

pub type Point = (f64, f64);
pub type Metadata = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineEntity {
    pub layer: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub start: Point,
    pub end: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineweight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolylineEntity {
    pub layer: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub points: Vec<Point>,
    #[serde(default)]
    pub closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineweight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntity {
    pub layer: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub content: String,
    pub insert: Point,
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionEntity {
    pub layer: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub start: Point,
    pub end: Point,
    pub offset: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_override: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HatchEntity {
    pub layer: String,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub boundary: Vec<Point>,
    pub pattern: String,
    #[serde(default = "default_hatch_scale")]
    pub scale: f64,
    #[serde(default)]
    pub rotation: f64,
}

fn default_hatch_scale() -> f64 {
    1.0
}

/// One drawable primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DrawingEntity {
    Polyline(PolylineEntity),
    Line(LineEntity),
    Text(TextEntity),
    Dimension(DimensionEntity),
    Hatch(HatchEntity),
}

impl DrawingEntity {
    pub fn layer(&self) -> &str {
        match self {
            DrawingEntity::Polyline(entity) => &entity.layer,
            DrawingEntity::Line(entity) => &entity.layer,
            DrawingEntity::Text(entity) => &entity.layer,
            DrawingEntity::Dimension(entity) => &entity.layer,
            DrawingEntity::Hatch(entity) => &entity.layer,
        }
    }
}

/// Format-independent vector document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingDocument {
    pub units: DrawingUnits,
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
    pub entities: Vec<DrawingEntity>,
}

impl DrawingDocument {
    pub fn new(units: DrawingUnits, scale: f64) -> Self {
        Self {
            units,
            scale,
            metadata: Metadata::new(),
            entities: Vec::new(),
        }
    }

    pub fn add_entity(&mut self, entity: DrawingEntity) {
        self.entities.push(entity);
    }

    pub fn extend(&mut self, entities: impl IntoIterator<Item = DrawingEntity>) {
        self.entities.extend(entities);
    }
}
