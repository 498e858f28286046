//! Transverse reinforcement plan: confined vs unconfined corridors.
//!
//! Confined corridors are the union of the non-support forbidden zones and
//! every lap interval gathered from the longitudinal bars; the complement
//! is unconfined. Spacing is `d/4` confined and `d/2` unconfined, with the
//! stirrup effective depth `d = (h − cover − 2 cm)/100` (distinct from the
//! preprocessing depth used for zone derivation).

use core_geometry::{CoordinateLayout, complement_segments, merge_segments};
use core_model::{
    DetailingInput, ProhibitedZone, RebarDetail, StirrupSegment, StirrupSpanSpec, StirrupSummary,
    StirrupZone, ZoneKind,
};
use core_tables::{DEFAULT_STIRRUP_HOOK, DEFAULT_STIRRUP_MARK};

const INNER_CLEARANCE_CM: f64 = 2.0;

/// Stirrup effective depth in meters: `h − cover − 2 cm`, floored at zero.
pub fn effective_depth_m(section_height_cm: f64, cover_cm: f64) -> f64 {
    let height_cm = section_height_cm.max(0.0);
    let cover_value_cm = cover_cm.max(0.0);
    (height_cm - cover_value_cm - INNER_CLEARANCE_CM).max(0.0) / 100.0
}

/// Zone spacing: `d/4` confined, `d/2` unconfined.
pub fn spacing_for_zone(effective_depth_m: f64, zone: StirrupZone) -> f64 {
    let factor = match zone {
        StirrupZone::Confined => 0.25,
        StirrupZone::Unconfined => 0.5,
    };
    (effective_depth_m * factor).max(0.0)
}

/// Merged lap intervals over every bar of both faces.
pub fn extract_splice_segments<'a>(
    bars: impl IntoIterator<Item = &'a RebarDetail>,
) -> Vec<(f64, f64)> {
    let mut segments = Vec::new();
    for bar in bars {
        for splice in bar.splice_records() {
            if splice.end > splice.start {
                segments.push((splice.start, splice.end));
            }
        }
    }
    merge_segments(&segments)
}

/// Confined corridors: non-support forbidden zones plus lap intervals.
pub fn derive_confined_segments(
    zones: &[ProhibitedZone],
    lap_segments: &[(f64, f64)],
) -> Vec<(f64, f64)> {
    let mut segments: Vec<(f64, f64)> = zones
        .iter()
        .filter(|zone| zone.kind != ZoneKind::InsideSupport)
        .map(|zone| (zone.start_m, zone.end_m))
        .collect();
    segments.extend_from_slice(lap_segments);
    merge_segments(&segments)
}

fn assign_segments_to_spans(
    segments: &[(f64, f64)],
    zone_type: StirrupZone,
    layout: &CoordinateLayout,
    specs: &[StirrupSpanSpec],
) -> Vec<StirrupSegment> {
    let mut assigned = Vec::new();
    for &(start, end) in segments {
        for span in &layout.spans {
            let overlap_start = start.max(span.start_m);
            let overlap_end = end.min(span.end_m);
            if overlap_end - overlap_start <= 0.0 {
                continue;
            }
            let Some(spec) = specs.iter().find(|spec| spec.span_index == span.index) else {
                continue;
            };
            let spacing = match zone_type {
                StirrupZone::Confined => spec.spacing_confined_m,
                StirrupZone::Unconfined => spec.spacing_unconfined_m,
            };
            let estimated_count = (spacing > 0.0).then(|| {
                let segment_length = overlap_end - overlap_start;
                ((segment_length / spacing).floor() as u32 + 1).max(1)
            });
            assigned.push(StirrupSegment {
                start_m: overlap_start,
                end_m: overlap_end,
                zone_type,
                spacing_m: spacing,
                estimated_count,
            });
        }
    }
    assigned
}

/// Build the stirrup plan for the whole beam. `None` when the beam has no
/// spans to classify.
pub fn build_stirrups_summary(
    input: &DetailingInput,
    layout: &CoordinateLayout,
    zones: &[ProhibitedZone],
    top_bars: &[RebarDetail],
    bottom_bars: &[RebarDetail],
) -> Option<StirrupSummary> {
    if layout.spans.is_empty() {
        return None;
    }

    let cover_cm = input.cover_cm.max(0.0);
    let span_specs: Vec<StirrupSpanSpec> = layout
        .spans
        .iter()
        .map(|span| {
            let depth = effective_depth_m(span.height_cm, cover_cm);
            StirrupSpanSpec {
                span_index: span.index,
                label: span.label.clone(),
                base_cm: span.base_cm,
                height_cm: span.height_cm,
                cover_cm,
                stirrup_width_cm: (span.base_cm - 2.0 * cover_cm).max(0.0),
                stirrup_height_cm: (span.height_cm - 2.0 * cover_cm).max(0.0),
                effective_depth_m: depth,
                spacing_confined_m: spacing_for_zone(depth, StirrupZone::Confined),
                spacing_unconfined_m: spacing_for_zone(depth, StirrupZone::Unconfined),
            }
        })
        .collect();

    let lap_segments = extract_splice_segments(top_bars.iter().chain(bottom_bars.iter()));
    let confined = derive_confined_segments(zones, &lap_segments);
    let unconfined = complement_segments(layout.total_length_m, &confined);

    let mut zone_segments =
        assign_segments_to_spans(&confined, StirrupZone::Confined, layout, &span_specs);
    zone_segments.extend(assign_segments_to_spans(
        &unconfined,
        StirrupZone::Unconfined,
        layout,
        &span_specs,
    ));

    let additional_branches_total = input
        .stirrups_config
        .iter()
        .map(|entry| entry.additional_branches)
        .sum();

    Some(StirrupSummary {
        diameter: DEFAULT_STIRRUP_MARK,
        hook_type: DEFAULT_STIRRUP_HOOK,
        additional_branches_total,
        span_specs,
        zone_segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_depth_subtracts_cover_and_clearance() {
        assert!((effective_depth_m(45.0, 4.0) - 0.39).abs() < 1e-9);
        assert_eq!(effective_depth_m(4.0, 4.0), 0.0);
    }

    #[test]
    fn spacing_ratios() {
        assert!((spacing_for_zone(0.4, StirrupZone::Confined) - 0.1).abs() < 1e-9);
        assert!((spacing_for_zone(0.4, StirrupZone::Unconfined) - 0.2).abs() < 1e-9);
    }

    #[test]
    fn confined_excludes_support_interiors() {
        let zones = vec![
            ProhibitedZone {
                start_m: 0.0,
                end_m: 0.3,
                kind: ZoneKind::InsideSupport,
                description: String::new(),
                support_index: 0,
            },
            ProhibitedZone {
                start_m: 0.3,
                end_m: 1.08,
                kind: ZoneKind::AfterFace,
                description: String::new(),
                support_index: 0,
            },
        ];
        let confined = derive_confined_segments(&zones, &[]);
        assert_eq!(confined, vec![(0.3, 1.08)]);
    }

    #[test]
    fn laps_merge_into_confined_corridors() {
        let zones = vec![ProhibitedZone {
            start_m: 0.5,
            end_m: 1.0,
            kind: ZoneKind::AfterFace,
            description: String::new(),
            support_index: 0,
        }];
        let confined = derive_confined_segments(&zones, &[(0.9, 1.5), (3.0, 3.6)]);
        assert_eq!(confined, vec![(0.5, 1.5), (3.0, 3.6)]);
    }
}
