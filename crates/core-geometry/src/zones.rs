//! Forbidden splice zones (NSR-10 C.21.5.3.2).
//!
//! Per internal support face: the support interval itself, plus
//! `D = max(2·d, w/2)` before and after the face, each clipped at the
//! adjacent span center so two facing zones never cross mid-span. Zones are
//! returned sorted by start.

use crate::layout::CoordinateLayout;
use core_model::{ProhibitedZone, ZoneKind};

const FACE_MATCH_TOLERANCE_M: f64 = 0.01;

/// Derive the ordered forbidden-zone list for a beam layout.
pub fn calculate_prohibited_zones(
    layout: &CoordinateLayout,
    effective_depth_m: f64,
) -> Vec<ProhibitedZone> {
    let mut zones: Vec<ProhibitedZone> = Vec::new();
    let total_supports = layout.faces.len();

    for face in &layout.faces {
        let support_start = face.x_m;
        let support_end = face.x_m + face.width_m;
        let prohibited_distance = (2.0 * effective_depth_m).max(face.width_m / 2.0);
        let is_first = face.support_index == 0;
        let is_last = face.support_index + 1 == total_supports;

        if support_end > support_start {
            zones.push(ProhibitedZone {
                start_m: support_start,
                end_m: support_end,
                kind: ZoneKind::InsideSupport,
                description: format!(
                    "No empalmar dentro del apoyo {} (ancho {:.0} cm)",
                    face.label,
                    face.width_m * 100.0
                ),
                support_index: face.support_index,
            });
        }

        if !is_last {
            let mut right_limit = layout.total_length_m;
            for span in &layout.spans {
                if (span.start_m - support_end).abs() < FACE_MATCH_TOLERANCE_M {
                    right_limit = right_limit.min(span.start_m + span.length_m / 2.0);
                    break;
                }
            }
            let zone_start = support_end;
            let zone_end = (support_end + prohibited_distance).min(right_limit);
            if zone_end > zone_start {
                zones.push(ProhibitedZone {
                    start_m: zone_start,
                    end_m: zone_end,
                    kind: ZoneKind::AfterFace,
                    description: format!(
                        "No empalmar: {:.0} cm después de {}",
                        prohibited_distance * 100.0,
                        face.label
                    ),
                    support_index: face.support_index,
                });
            }
        }

        if !is_first {
            let mut left_limit = 0.0f64;
            for span in &layout.spans {
                if (span.end_m - support_start).abs() < FACE_MATCH_TOLERANCE_M {
                    left_limit = left_limit.max(span.end_m - span.length_m / 2.0);
                    break;
                }
            }
            let zone_start = (support_start - prohibited_distance).max(left_limit);
            let zone_end = support_start;
            if zone_start < zone_end {
                zones.push(ProhibitedZone {
                    start_m: zone_start,
                    end_m: zone_end,
                    kind: ZoneKind::BeforeFace,
                    description: format!(
                        "No empalmar: {:.0} cm antes de {}",
                        prohibited_distance * 100.0,
                        face.label
                    ),
                    support_index: face.support_index,
                });
            }
        }
    }

    zones.sort_by(|a, b| a.start_m.total_cmp(&b.start_m));
    zones
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::build_layout;
    use core_model::{
        AxisSupport, BarGroup, BarMark, ConcreteClass, DetailingInput, EnergyClass, HookType,
        SpanGeometry, SteelGrade,
    };

    fn two_span_layout() -> CoordinateLayout {
        let input = DetailingInput {
            span_geometries: vec![
                SpanGeometry {
                    label: None,
                    clear_span_between_supports_m: 5.0,
                    base_cm: 30.0,
                    height_cm: 45.0,
                },
                SpanGeometry {
                    label: None,
                    clear_span_between_supports_m: 5.0,
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
    fn every_support_emits_its_interval() {
        let layout = two_span_layout();
        let zones = calculate_prohibited_zones(&layout, 0.39);
        let inside: Vec<_> = zones
            .iter()
            .filter(|z| z.kind == ZoneKind::InsideSupport)
            .collect();
        assert_eq!(inside.len(), 3);
    }

    #[test]
    fn edge_supports_have_one_flank_only() {
        let layout = two_span_layout();
        let zones = calculate_prohibited_zones(&layout, 0.39);
        assert!(
            !zones
                .iter()
                .any(|z| z.support_index == 0 && z.kind == ZoneKind::BeforeFace)
        );
        assert!(
            !zones
                .iter()
                .any(|z| z.support_index == 2 && z.kind == ZoneKind::AfterFace)
        );
        let middle: Vec<_> = zones.iter().filter(|z| z.support_index == 1).collect();
        assert_eq!(middle.len(), 3);
    }

    #[test]
    fn zones_are_sorted_and_bounded() {
        let layout = two_span_layout();
        let zones = calculate_prohibited_zones(&layout, 0.39);
        for pair in zones.windows(2) {
            assert!(pair[0].start_m <= pair[1].start_m);
        }
        for zone in &zones {
            assert!(zone.start_m >= 0.0 && zone.end_m <= layout.total_length_m);
            assert!(zone.end_m > zone.start_m);
        }
    }

    #[test]
    fn flank_length_is_max_of_two_d_and_half_width() {
        let layout = two_span_layout();
        let zones = calculate_prohibited_zones(&layout, 0.39);
        let after_first = zones
            .iter()
            .find(|z| z.support_index == 0 && z.kind == ZoneKind::AfterFace)
            .unwrap();
        // D = max(2·0.39, 0.15) = 0.78
        assert!((after_first.end_m - after_first.start_m - 0.78).abs() < 1e-9);
    }
}
