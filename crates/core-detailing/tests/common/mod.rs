#![allow(dead_code)] // Shared across the integration test binaries; each uses a subset.

use core_model::{
    AxisSupport, BarGroup, BarMark, ConcreteClass, DetailingInput, EnergyClass, HookType,
    SpanGeometry, SteelGrade,
};

pub fn span(length_m: f64) -> SpanGeometry {
    SpanGeometry {
        label: None,
        clear_span_between_supports_m: length_m,
        base_cm: 30.0,
        height_cm: 45.0,
    }
}

pub fn labeled_span(label: &str, length_m: f64) -> SpanGeometry {
    SpanGeometry {
        label: Some(label.to_string()),
        ..span(length_m)
    }
}

pub fn support(width_cm: f64) -> AxisSupport {
    AxisSupport {
        support_width_cm: width_cm,
        label: None,
    }
}

pub fn group(diameter: BarMark, quantity: u32) -> BarGroup {
    BarGroup { diameter, quantity }
}

/// Input with the commercial presets (cover 4 cm, 12 m stock, 135° hooks,
/// DES, f'c 21 MPa, grade 60) and equal 30 cm supports.
pub fn beam_input(
    spans: Vec<SpanGeometry>,
    top: Vec<BarGroup>,
    bottom: Vec<BarGroup>,
) -> DetailingInput {
    let support_count = spans.len() + 1;
    DetailingInput {
        span_geometries: spans,
        axis_supports: (0..support_count).map(|_| support(30.0)).collect(),
        top_bars_config: top,
        bottom_bars_config: bottom,
        segment_reinforcements: Vec::new(),
        stirrups_config: Vec::new(),
        axis_numbering: None,
        cover_cm: 4.0,
        max_rebar_length_m: 12.0,
        hook_type: HookType::Deg135,
        energy_dissipation_class: EnergyClass::Des,
        concrete_strength: ConcreteClass::Fc21,
        reinforcement: SteelGrade::Grade60,
        lap_splice_length_min_m: 0.75,
    }
}
