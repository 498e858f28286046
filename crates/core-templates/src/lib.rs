//! Drawing templates: named layer/text-style profiles plus the external
//! section schematic.
//!
//! The manifest is a TOML file mapping template keys to layer styles, text
//! styles, unit profiles and an optional cover override. It is read once
//! and memoized (load-once, read-many; concurrent readers need no
//! locking). Unknown template keys resolve silently to the built-in
//! default; unknown manifest fields are tolerated so the file can evolve
//! without breaking older binaries.

pub mod section;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

pub use section::{
    Attachment, SectionEntity, SectionTemplate, SectionTemplateError, get_section_template,
    load_section_template,
};

/// Environment override for the manifest location.
pub const MANIFEST_ENV: &str = "DESPIECE_TEMPLATES_MANIFEST";

const DEFAULT_MANIFEST_PATH: &str = "assets/templates.toml";

/// Unit profile of a drawing document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingUnits {
    #[serde(default = "default_source_unit")]
    pub source_unit: String,
    #[serde(default = "default_target_unit")]
    pub target_unit: String,
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    #[serde(default = "default_precision")]
    pub precision: u32,
}

fn default_source_unit() -> String {
    "m".to_string()
}

fn default_target_unit() -> String {
    "mm".to_string()
}

fn default_scale_factor() -> f64 {
    1000.0
}

fn default_precision() -> u32 {
    2
}

impl Default for DrawingUnits {
    fn default() -> Self {
        Self {
            source_unit: default_source_unit(),
            target_unit: default_target_unit(),
            scale_factor: default_scale_factor(),
            precision: default_precision(),
        }
    }
}

/// Style of one CAD layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: i32,
    #[serde(default = "default_lineweight")]
    pub lineweight: f64,
    #[serde(default = "default_linetype")]
    pub linetype: String,
}

fn default_color() -> i32 {
    7
}

fn default_lineweight() -> f64 {
    0.25
}

fn default_linetype() -> String {
    "Continuous".to_string()
}

/// Style of one text family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub name: String,
    #[serde(default = "default_text_height")]
    pub height: f64,
    #[serde(default = "default_font")]
    pub font: String,
}

fn default_text_height() -> f64 {
    2.5
}

fn default_font() -> String {
    "simplex.shx".to_string()
}

/// A resolved drawing template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    pub key: String,
    pub locale: String,
    pub units: DrawingUnits,
    pub layers: HashMap<String, LayerStyle>,
    pub text_styles: HashMap<String, TextStyle>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    #[serde(default)]
    pub cover_cm_override: Option<f64>,
}

impl TemplateConfig {
    /// CAD layer name behind an alias; the alias itself when unmapped.
    pub fn layer_name(&self, alias: &str) -> String {
        self.layers
            .get(alias)
            .map(|style| style.name.clone())
            .unwrap_or_else(|| alias.to_string())
    }

    pub fn layer_style(&self, alias: &str) -> Option<&LayerStyle> {
        self.layers.get(alias)
    }

    /// Text style behind an alias, with an optional fallback alias.
    pub fn text_style(&self, alias: &str, fallback: Option<&str>) -> TextStyle {
        if let Some(style) = self.text_styles.get(alias) {
            return style.clone();
        }
        if let Some(fallback) = fallback {
            if let Some(style) = self.text_styles.get(fallback) {
                return style.clone();
            }
            return TextStyle {
                name: fallback.to_string(),
                height: default_text_height(),
                font: default_font(),
            };
        }
        TextStyle {
            name: "Standard".to_string(),
            height: default_text_height(),
            font: default_font(),
        }
    }

    /// Template cover override, else the payload cover.
    pub fn cover_cm(&self, fallback_cover_cm: f64) -> f64 {
        self.cover_cm_override.unwrap_or(fallback_cover_cm)
    }
}

/// Built-in template used when no manifest entry matches.
pub fn default_template() -> TemplateConfig {
    let layers = [
        ("beam_outline", "C-VIGA", 7, 0.50, "Continuous"),
        ("beam_hatch", "C-VIGA-HATCH", 7, 0.10, "Continuous"),
        ("supports", "C-APOYO", 8, 0.35, "Continuous"),
        ("axes", "C-EJES", 5, 0.18, "CENTER"),
        ("rebar_main", "A-REB-MAIN", 1, 0.35, "Continuous"),
        ("rebar_stirrups", "A-REB-EST", 3, 0.25, "Continuous"),
        ("dimensions", "C-COTAS", 4, 0.18, "Continuous"),
        ("text", "C-TEXT", 7, 0.18, "Continuous"),
        ("title_block", "A-CART", 7, 0.25, "Continuous"),
    ]
    .into_iter()
    .map(|(alias, name, color, lineweight, linetype)| {
        (
            alias.to_string(),
            LayerStyle {
                name: name.to_string(),
                color,
                lineweight,
                linetype: linetype.to_string(),
            },
        )
    })
    .collect();

    let text_styles = [
        ("labels", "T-LABELS", 3.0),
        ("dimensions", "T-DIMS", 2.5),
        ("title", "T-TITLE", 4.0),
    ]
    .into_iter()
    .map(|(alias, name, height)| {
        (
            alias.to_string(),
            TextStyle {
                name: name.to_string(),
                height,
                font: default_font(),
            },
        )
    })
    .collect();

    TemplateConfig {
        key: "beam/default".to_string(),
        locale: "es-CO".to_string(),
        units: DrawingUnits::default(),
        layers,
        text_styles,
        metadata: [(
            "title_block_label".to_string(),
            "DESPIECE DE VIGA".to_string(),
        )]
        .into_iter()
        .collect(),
        cover_cm_override: None,
    }
}

/// Raw manifest shape as serialized on disk.
#[derive(Debug, Default, Deserialize)]
struct RawManifest {
    #[serde(default)]
    templates: Vec<RawTemplate>,
}

#[derive(Debug, Deserialize)]
struct RawTemplate {
    key: String,
    #[serde(default)]
    locale: Option<String>,
    #[serde(default)]
    units: Option<DrawingUnits>,
    #[serde(default)]
    layers: HashMap<String, LayerStyle>,
    #[serde(default)]
    text_styles: HashMap<String, TextStyle>,
    #[serde(default)]
    metadata: HashMap<String, String>,
    #[serde(default)]
    cover_cm_override: Option<f64>,
}

/// Parse a manifest file into the template map (always containing the
/// default template). A missing file yields just the default.
pub fn load_manifest(path: &Path) -> anyhow::Result<HashMap<String, TemplateConfig>> {
    let fallback = default_template();
    let mut templates = HashMap::from([(fallback.key.clone(), fallback.clone())]);

    let raw_text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            return Ok(templates);
        }
        Err(error) => return Err(error.into()),
    };

    let raw: RawManifest = toml::from_str(&raw_text)?;
    for entry in raw.templates {
        let layers = if entry.layers.is_empty() {
            fallback.layers.clone()
        } else {
            entry.layers
        };
        let text_styles = if entry.text_styles.is_empty() {
            fallback.text_styles.clone()
        } else {
            entry.text_styles
        };
        templates.insert(
            entry.key.clone(),
            TemplateConfig {
                key: entry.key,
                locale: entry.locale.unwrap_or_else(|| fallback.locale.clone()),
                units: entry.units.unwrap_or_default(),
                layers,
                text_styles,
                metadata: entry.metadata,
                cover_cm_override: entry.cover_cm_override,
            },
        );
    }
    info!(path = %path.display(), templates = templates.len(), "template manifest loaded");
    Ok(templates)
}

fn manifest() -> &'static HashMap<String, TemplateConfig> {
    static MANIFEST: OnceLock<HashMap<String, TemplateConfig>> = OnceLock::new();
    MANIFEST.get_or_init(|| {
        let path = std::env::var(MANIFEST_ENV)
            .unwrap_or_else(|_| DEFAULT_MANIFEST_PATH.to_string());
        load_manifest(Path::new(&path)).unwrap_or_else(|error| {
            tracing::warn!(%error, "template manifest unreadable; using defaults");
            let fallback = default_template();
            HashMap::from([(fallback.key.clone(), fallback)])
        })
    })
}

/// Resolve a template key; unknown or absent keys get the default.
pub fn get_template_config(key: Option<&str>) -> TemplateConfig {
    let manifest = manifest();
    key.and_then(|key| manifest.get(key))
        .cloned()
        .unwrap_or_else(default_template)
}

/// All known templates (key-sorted for stable listings).
pub fn list_templates() -> Vec<TemplateConfig> {
    let mut templates: Vec<TemplateConfig> = manifest().values().cloned().collect();
    templates.sort_by(|a, b| a.key.cmp(&b.key));
    templates
}
