//! Beam coordinate layout: the 1-D axis walk.
//!
//! Walks the interleaved (support, span, support, …) sequence from x = 0 and
//! produces support intervals, span intervals, face coordinates, span
//! centers, axis markers and the total length. All coordinates are rounded
//! to 4 decimals at this level.
//!
//! Invariants:
//! * `supports.len() == spans.len() + 1` (checked, `InvalidGeometry`).
//! * Supports and spans tile `[0, total_length_m]` without gap or overlap.
//! * One axis marker per support, centered in its interval.

use core_model::{DetailingError, DetailingInput, SpanGeometry};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// Support face position on the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceInfo {
    pub x_m: f64,
    pub support_index: usize,
    pub width_m: f64,
    pub label: String,
}

/// Support occupation interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportInterval {
    pub index: usize,
    pub label: String,
    pub width_m: f64,
    pub start_m: f64,
    pub end_m: f64,
}

/// Clear span interval with its gross section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanInterval {
    pub index: usize,
    pub label: String,
    pub start_m: f64,
    pub end_m: f64,
    pub length_m: f64,
    pub base_cm: f64,
    pub height_cm: f64,
}

/// Midpoint of a clear span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanCenter {
    pub span_index: usize,
    pub x_m: f64,
}

/// Axis marker drawn at a support centerline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisMarker {
    pub index: usize,
    pub label: String,
    pub position_m: f64,
}

/// Output of the axis walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateLayout {
    pub faces: Vec<FaceInfo>,
    pub supports: Vec<SupportInterval>,
    pub spans: Vec<SpanInterval>,
    pub centers: Vec<SpanCenter>,
    pub axis_markers: Vec<AxisMarker>,
    pub total_length_m: f64,
}

impl CoordinateLayout {
    pub fn average_span_length_m(&self) -> f64 {
        if self.spans.is_empty() {
            return 0.0;
        }
        self.spans.iter().map(|span| span.length_m).sum::<f64>() / self.spans.len() as f64
    }

    pub fn longest_span(&self) -> Option<&SpanInterval> {
        self.spans
            .iter()
            .max_by(|a, b| a.length_m.total_cmp(&b.length_m))
    }
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Effective depth used while deriving forbidden zones:
/// `max(0.30, (avg_height_cm − 6)/100)`, or 0.45 m when there are no spans.
pub fn preprocess_depth_m(spans: &[SpanGeometry]) -> f64 {
    if spans.is_empty() {
        return 0.45;
    }
    let avg_height_cm =
        spans.iter().map(|span| span.height_cm).sum::<f64>() / spans.len() as f64;
    ((avg_height_cm - 6.0) / 100.0).max(0.30)
}

/// Tokenize a user axis-numbering string; falls back to `EJE {i+1}` when the
/// tokens do not cover every support.
pub fn axis_labels(axis_numbering: Option<&str>, expected: usize) -> Vec<String> {
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();
    let separators =
        SEPARATORS.get_or_init(|| Regex::new(r"[-,\s]+").expect("static pattern"));

    if let Some(raw) = axis_numbering {
        let tokens: Vec<&str> = separators.split(raw).filter(|t| !t.is_empty()).collect();
        if tokens.len() >= expected {
            return tokens[..expected].iter().map(|t| t.to_string()).collect();
        }
    }
    (0..expected).map(|index| format!("EJE {}", index + 1)).collect()
}

/// Lay the beam out on the axis.
pub fn build_layout(input: &DetailingInput) -> Result<CoordinateLayout, DetailingError> {
    let spans = &input.span_geometries;
    let supports = &input.axis_supports;

    if supports.len() != spans.len() + 1 {
        return Err(DetailingError::InvalidGeometry(format!(
            "expected {} supports for {} spans, got {}",
            spans.len() + 1,
            spans.len(),
            supports.len()
        )));
    }
    for (index, support) in supports.iter().enumerate() {
        if !support.support_width_cm.is_finite() || support.support_width_cm < 0.0 {
            return Err(DetailingError::InvalidGeometry(format!(
                "support {index} has invalid width {}",
                support.support_width_cm
            )));
        }
    }
    for (index, span) in spans.iter().enumerate() {
        let dims = [
            span.clear_span_between_supports_m,
            span.base_cm,
            span.height_cm,
        ];
        if dims.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(DetailingError::InvalidGeometry(format!(
                "span {index} has invalid dimensions"
            )));
        }
    }

    let labels = axis_labels(input.axis_numbering.as_deref(), supports.len());
    let mut layout = CoordinateLayout {
        faces: Vec::with_capacity(supports.len()),
        supports: Vec::with_capacity(supports.len()),
        spans: Vec::with_capacity(spans.len()),
        centers: Vec::with_capacity(spans.len()),
        axis_markers: Vec::with_capacity(supports.len()),
        total_length_m: 0.0,
    };

    let mut cursor = 0.0;
    for (index, support) in supports.iter().enumerate() {
        let width_m = round4(support.support_width_cm / 100.0);
        let label = support
            .label
            .clone()
            .unwrap_or_else(|| labels[index].clone());
        let start = round4(cursor);
        let end = round4(cursor + width_m);

        layout.faces.push(FaceInfo {
            x_m: start,
            support_index: index,
            width_m,
            label: label.clone(),
        });
        layout.supports.push(SupportInterval {
            index,
            label: label.clone(),
            width_m,
            start_m: start,
            end_m: end,
        });
        layout.axis_markers.push(AxisMarker {
            index,
            label,
            position_m: round4(start + width_m / 2.0),
        });
        cursor = end;

        if let Some(span) = spans.get(index) {
            let length = round4(span.clear_span_between_supports_m);
            let span_start = round4(cursor);
            let span_end = round4(cursor + length);
            layout.centers.push(SpanCenter {
                span_index: index,
                x_m: round4(span_start + length / 2.0),
            });
            layout.spans.push(SpanInterval {
                index,
                label: span
                    .label
                    .clone()
                    .unwrap_or_else(|| format!("Luz {}", index + 1)),
                start_m: span_start,
                end_m: span_end,
                length_m: length,
                base_cm: span.base_cm,
                height_cm: span.height_cm,
            });
            cursor = span_end;
        }
    }

    layout.total_length_m = round4(cursor);
    debug!(
        total_length_m = layout.total_length_m,
        spans = layout.spans.len(),
        supports = layout.supports.len(),
        "beam layout built"
    );
    Ok(layout)
}
