//! Placement of non-continuous bars.
//!
//! Support bars alternate between the beam ends; bottom remainder bars
//! first satisfy the one-third-into-support rule with anchored bars, the
//! rest center in the longest span. Segment-specific reinforcement covers
//! its span at 90 % length with forced 135° hooks.

use core_geometry::CoordinateLayout;
use core_model::{BarKind, BarMark, BarPosition, HookType, RebarDetail};

/// Top remainder bars over the supports: `avg_span · 0.25 + Ld` long,
/// alternating left/right end by parity.
pub fn distribute_support_bars(
    mark: BarMark,
    count: u32,
    layout: &CoordinateLayout,
    position: BarPosition,
    hook_type: HookType,
    development_length_m: f64,
) -> Vec<RebarDetail> {
    if layout.spans.is_empty() {
        return Vec::new();
    }
    let bar_length = layout.average_span_length_m() * 0.25 + development_length_m;

    (0..count)
        .map(|index| {
            let (start_m, end_m, notes) = if index % 2 == 0 {
                (0.0, bar_length, "Apoyo izquierdo")
            } else {
                (
                    layout.total_length_m - bar_length,
                    layout.total_length_m,
                    "Apoyo derecho",
                )
            };
            RebarDetail {
                id: format!(
                    "{}{}-A{:02}",
                    position.id_prefix(),
                    mark.id_fragment(),
                    index + 1
                ),
                diameter: mark,
                position,
                kind: BarKind::Support,
                length_m: bar_length,
                start_m,
                end_m,
                quantity: 1,
                splices: None,
                hook_type,
                development_length_m: Some(development_length_m),
                notes: Some(notes.to_string()),
            }
        })
        .collect()
}

/// Bottom bars that must reach into the supports: up to two anchored bars
/// covering 80 % of the first span from the beam start; any overflow joins
/// the mid-span group.
pub fn distribute_anchored_bars(
    mark: BarMark,
    count: u32,
    layout: &CoordinateLayout,
    position: BarPosition,
    hook_type: HookType,
    development_length_m: f64,
    mid_span_counter: &mut u32,
) -> Vec<RebarDetail> {
    let Some(first_span) = layout.spans.first() else {
        return Vec::new();
    };
    let bar_length = first_span.length_m * 0.8;

    let anchored = count.min(2);
    let mut bars: Vec<RebarDetail> = (0..anchored)
        .map(|index| RebarDetail {
            id: format!(
                "{}{}-S{:02}",
                position.id_prefix(),
                mark.id_fragment(),
                index + 1
            ),
            diameter: mark,
            position,
            kind: BarKind::SupportAnchored,
            length_m: bar_length,
            start_m: 0.0,
            end_m: bar_length,
            quantity: 1,
            splices: None,
            hook_type,
            development_length_m: Some(development_length_m),
            notes: Some("Entra al apoyo (≥ Ld)".to_string()),
        })
        .collect();

    if count > anchored {
        bars.extend(create_mid_span_bars(
            mark,
            count - anchored,
            layout,
            position,
            hook_type,
            development_length_m,
            mid_span_counter,
        ));
    }
    bars
}

/// Bars centered in the longest span at 60 % of its clear length.
pub fn create_mid_span_bars(
    mark: BarMark,
    count: u32,
    layout: &CoordinateLayout,
    position: BarPosition,
    hook_type: HookType,
    development_length_m: f64,
    counter: &mut u32,
) -> Vec<RebarDetail> {
    let Some(longest) = layout.longest_span() else {
        return Vec::new();
    };
    let bar_length = longest.length_m * 0.6;
    let start_m = longest.start_m + (longest.length_m - bar_length) / 2.0;

    (0..count)
        .map(|_| {
            *counter += 1;
            RebarDetail {
                id: format!(
                    "{}{}-M{:02}",
                    position.id_prefix(),
                    mark.id_fragment(),
                    *counter
                ),
                diameter: mark,
                position,
                kind: BarKind::Span,
                length_m: bar_length,
                start_m,
                end_m: start_m + bar_length,
                quantity: 1,
                splices: None,
                hook_type,
                development_length_m: Some(development_length_m),
                notes: Some("Centro de luz".to_string()),
            }
        })
        .collect()
}

/// Segment-specific reinforcement: 90 % of the span, offset 5 %, hooks
/// forced to 135°.
pub fn create_segment_bars(
    mark: BarMark,
    quantity: u32,
    span_index: usize,
    layout: &CoordinateLayout,
    position: BarPosition,
    development_length_m: f64,
) -> Vec<RebarDetail> {
    let Some(span) = layout.spans.get(span_index) else {
        return Vec::new();
    };
    let bar_length = span.length_m * 0.9;
    let start_m = span.start_m + span.length_m * 0.05;

    (0..quantity)
        .map(|index| RebarDetail {
            id: format!(
                "{}{}-E{}-{:02}",
                position.id_prefix(),
                mark.id_fragment(),
                span_index + 1,
                index + 1
            ),
            diameter: mark,
            position,
            kind: BarKind::Segment,
            length_m: bar_length,
            start_m,
            end_m: start_m + bar_length,
            quantity: 1,
            splices: None,
            hook_type: HookType::Deg135,
            development_length_m: Some(development_length_m),
            notes: Some(format!("Refuerzo segmento {}", span_index + 1)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_geometry::build_layout;
    use core_model::{
        AxisSupport, BarGroup, ConcreteClass, DetailingInput, EnergyClass, SpanGeometry,
        SteelGrade,
    };

    fn layout() -> CoordinateLayout {
        let input = DetailingInput {
            span_geometries: vec![
                SpanGeometry {
                    label: None,
                    clear_span_between_supports_m: 4.0,
                    base_cm: 30.0,
                    height_cm: 45.0,
                },
                SpanGeometry {
                    label: None,
                    clear_span_between_supports_m: 6.0,
                    base_cm: 30.0,
                    height_cm: 45.0,
                },
            ],
            axis_supports: vec![
                AxisSupport {
                    support_width_cm: 30.0,
                    label: None,
                },
                AxisSupport {
                    support_width_cm: 30.0,
                    label: None,
                },
                AxisSupport {
                    support_width_cm: 30.0,
                    label: None,
                },
            ],
            top_bars_config: vec![BarGroup {
                diameter: BarMark::M6,
                quantity: 2,
            }],
            bottom_bars_config: Vec::new(),
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
        };
        build_layout(&input).unwrap()
    }

    #[test]
    fn support_bars_alternate_ends() {
        let bars = distribute_support_bars(
            BarMark::M5,
            3,
            &layout(),
            BarPosition::Top,
            HookType::Deg135,
            0.5,
        );
        assert_eq!(bars.len(), 3);
        // avg span 5.0 → 5.0·0.25 + 0.5 = 1.75
        assert!((bars[0].length_m - 1.75).abs() < 1e-9);
        assert_eq!(bars[0].start_m, 0.0);
        assert_eq!(bars[1].end_m, layout().total_length_m);
        assert_eq!(bars[2].start_m, 0.0);
        assert_eq!(bars[0].id, "T5-A01");
    }

    #[test]
    fn anchored_overflow_moves_to_mid_span() {
        let mut counter = 0;
        let bars = distribute_anchored_bars(
            BarMark::M5,
            3,
            &layout(),
            BarPosition::Bottom,
            HookType::Deg135,
            0.5,
            &mut counter,
        );
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].kind, BarKind::SupportAnchored);
        assert_eq!(bars[1].kind, BarKind::SupportAnchored);
        assert_eq!(bars[2].kind, BarKind::Span);
        // Anchored length: first span 4.0 · 0.8.
        assert!((bars[0].length_m - 3.2).abs() < 1e-9);
        assert_eq!(counter, 1);
    }

    #[test]
    fn mid_span_bars_center_in_longest_span() {
        let layout = layout();
        let mut counter = 0;
        let bars = create_mid_span_bars(
            BarMark::M5,
            1,
            &layout,
            BarPosition::Bottom,
            HookType::Deg135,
            0.5,
            &mut counter,
        );
        let longest = layout.longest_span().unwrap();
        let bar = &bars[0];
        assert!((bar.length_m - longest.length_m * 0.6).abs() < 1e-9);
        let margin_left = bar.start_m - longest.start_m;
        let margin_right = longest.end_m - bar.end_m;
        assert!((margin_left - margin_right).abs() < 1e-9);
    }

    #[test]
    fn segment_bars_force_seismic_hooks() {
        let bars = create_segment_bars(
            BarMark::M4,
            2,
            1,
            &layout(),
            BarPosition::Bottom,
            0.4,
        );
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].hook_type, HookType::Deg135);
        assert_eq!(bars[0].id, "B4-E2-01");
        assert_eq!(bars[0].kind, BarKind::Segment);
    }
}
