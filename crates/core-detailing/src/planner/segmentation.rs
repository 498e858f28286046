//! Commercial-stock segmentation of continuous bars.
//!
//! A continuous bar longer than the stock length is split into lapped
//! segments. Consecutive segments overlap by exactly the lap length; the
//! lap interval is recorded on both segments (outgoing on the left,
//! incoming on the right). The walk is bounded (100 iterations per bar)
//! and never places a lap window over a forbidden zone when a feasible
//! retraction or corridor exists; when none exists it keeps the best
//! partial placement and reports a warning.
//!
//! Strategy differences:
//! * Top: plain left-to-right walk, each segment as long as stock allows.
//! * Bottom: planned positional joints are honored when they produce
//!   stock-feasible segments; otherwise the walk biases the first joint
//!   away from the first `before_face` zone using the instance's offset
//!   ratio, preferring the corridor between zones, with a 0.1 m sweep as
//!   the final safety.

use core_model::{
    EPSILON_M, ProhibitedZone, RebarDetail, SpliceKind, SpliceRecord, ZoneKind,
};
use tracing::warn;

const MAX_WALK_ITERATIONS: usize = 100;
const MAX_RETRACTIONS: usize = 20;
const SWEEP_STEP_M: f64 = 0.1;

/// Shared segmentation parameters for one bar.
#[derive(Debug, Clone, Copy)]
pub struct SplitParams {
    pub max_length_m: f64,
    pub splice_length_m: f64,
    pub hook_length_m: f64,
    pub edge_cover_m: f64,
    pub beam_length_m: f64,
}

/// Face-specific splitting behavior.
#[derive(Debug, Clone, Copy)]
pub enum SplitStrategy {
    Top,
    Bottom { offset_ratio: f64 },
}

/// Split `bar` into stock-feasible segments. Returns the bar untouched when
/// it already fits one stock length.
pub fn split_bar_by_max_length(
    mut bar: RebarDetail,
    strategy: SplitStrategy,
    params: &SplitParams,
    zones: &[ProhibitedZone],
    warnings: &mut Vec<String>,
) -> Vec<RebarDetail> {
    let total = bar.end_m - bar.start_m;
    if total <= params.max_length_m + EPSILON_M {
        if matches!(strategy, SplitStrategy::Bottom { .. }) {
            // A single-piece bar has no physical laps; the positional plan
            // only materializes when segmentation happens.
            bar.splices = None;
        }
        return vec![bar];
    }

    if params.splice_length_m >= params.max_length_m {
        warnings.push(format!(
            "Barra {}: el empalme de {:.2}m no cabe en la longitud comercial de {:.2}m",
            bar.id, params.splice_length_m, params.max_length_m
        ));
        return vec![bar];
    }

    if let SplitStrategy::Bottom { .. } = strategy {
        if let Some(segments) = segments_from_planned_joints(&bar, params) {
            return segments;
        }
    }

    walk(bar, strategy, params, zones, warnings)
}

/// Hook deduction at the beam start applies only to the first segment of a
/// bar whose origin reaches the edge cover; analogous at the beam end.
fn start_hook(bar: &RebarDetail, params: &SplitParams) -> f64 {
    if bar.start_m <= params.edge_cover_m + EPSILON_M {
        params.hook_length_m
    } else {
        0.0
    }
}

fn end_hook(bar: &RebarDetail, params: &SplitParams) -> f64 {
    if bar.end_m >= params.beam_length_m - params.edge_cover_m - EPSILON_M {
        params.hook_length_m
    } else {
        0.0
    }
}

/// Use the bar's planned joints verbatim when exactly the needed number of
/// joints exists and every resulting segment fits commercial stock.
fn segments_from_planned_joints(
    bar: &RebarDetail,
    params: &SplitParams,
) -> Option<Vec<RebarDetail>> {
    let total = bar.end_m - bar.start_m;
    let needed = (total / params.max_length_m).ceil() as usize - 1;
    let plan = bar.splices.as_ref()?;
    if needed == 0 || plan.len() < needed {
        return None;
    }

    let mut joints: Vec<SpliceRecord> = plan[..needed].to_vec();
    joints.sort_by(|a, b| a.center().total_cmp(&b.center()));

    // Boundaries: a segment runs from the previous joint's start to the
    // next joint's end (the lap is shared by both sides).
    let mut boundaries: Vec<(f64, f64)> = Vec::with_capacity(needed + 1);
    let mut cursor = bar.start_m;
    for joint in &joints {
        if joint.end <= cursor + EPSILON_M {
            return None;
        }
        boundaries.push((cursor, joint.end));
        cursor = joint.start;
    }
    boundaries.push((cursor, bar.end_m));

    for (index, &(seg_start, seg_end)) in boundaries.iter().enumerate() {
        let mut allowed = params.max_length_m;
        if index == 0 {
            allowed -= start_hook(bar, params);
        }
        if index == boundaries.len() - 1 {
            allowed -= end_hook(bar, params);
        }
        if seg_end - seg_start > allowed + EPSILON_M {
            return None;
        }
    }

    Some(materialize(bar, &boundaries, &joints))
}

fn walk(
    bar: RebarDetail,
    strategy: SplitStrategy,
    params: &SplitParams,
    zones: &[ProhibitedZone],
    warnings: &mut Vec<String>,
) -> Vec<RebarDetail> {
    let splice = params.splice_length_m;
    let mut boundaries: Vec<(f64, f64)> = Vec::new();
    let mut joints: Vec<SpliceRecord> = Vec::new();
    let mut current = bar.start_m;
    let mut infeasible_reported = false;

    for iteration in 0..MAX_WALK_ITERATIONS {
        let first = boundaries.is_empty();
        let hook_front = if first {
            start_hook(&bar, params)
        } else {
            0.0
        };

        let remaining = bar.end_m - current;
        if remaining + hook_front + end_hook(&bar, params) <= params.max_length_m + EPSILON_M {
            boundaries.push((current, bar.end_m));
            break;
        }

        let allowed = params.max_length_m - hook_front;
        let mut candidate_end = current + allowed;

        if first {
            if let SplitStrategy::Bottom { offset_ratio } = strategy {
                candidate_end = first_bottom_segment_end(
                    &bar,
                    params,
                    zones,
                    offset_ratio,
                    candidate_end,
                    warnings,
                    &mut infeasible_reported,
                );
            }
        }

        candidate_end = retract_out_of_zones(
            current,
            candidate_end,
            splice,
            zones,
            warnings,
            &bar.id,
            &mut infeasible_reported,
        );

        if candidate_end <= current + splice + EPSILON_M {
            // Retraction consumed the whole segment; fall back to the raw
            // stock cut and let the validator flag the lap.
            candidate_end = (current + allowed).min(bar.end_m);
            if !infeasible_reported {
                warnings.push(infeasible_location(&bar.id));
                infeasible_reported = true;
            }
        }

        joints.push(SpliceRecord {
            start: candidate_end - splice,
            end: candidate_end,
            length: splice,
            kind: SpliceKind::LapSpliceClassB,
            offset_group: None,
            offset_applied: None,
            adjusted: None,
            original_center: None,
        });
        boundaries.push((current, candidate_end));
        current = candidate_end - splice;

        if iteration + 1 == MAX_WALK_ITERATIONS {
            warn!(bar = %bar.id, "segmentation walk hit the iteration bound");
            boundaries.push((current, bar.end_m));
        }
    }

    materialize(&bar, &boundaries, &joints)
}

/// First-segment target for bottom bars: biased by the instance offset
/// ratio, preferring the corridor right before the first `before_face`
/// zone, then a 0.1 m sweep.
fn first_bottom_segment_end(
    bar: &RebarDetail,
    params: &SplitParams,
    zones: &[ProhibitedZone],
    offset_ratio: f64,
    allowed_end: f64,
    warnings: &mut Vec<String>,
    infeasible_reported: &mut bool,
) -> f64 {
    let splice = params.splice_length_m;
    let total = bar.end_m - bar.start_m;
    let target_length = (total * (0.4 + offset_ratio * 0.5))
        .max(splice * 1.5)
        .min(total)
        .min(allowed_end - bar.start_m);
    let mut candidate_end = bar.start_m + target_length;

    let window_clear = |end: f64| {
        let start = end - splice;
        !zones.iter().any(|zone| zone.overlaps(start, end))
    };

    if window_clear(candidate_end) {
        return candidate_end;
    }

    // Corridor between the previous zone end and the next before-face zone.
    if let Some(before_zone) = zones
        .iter()
        .find(|zone| zone.kind == ZoneKind::BeforeFace && zone.start_m > bar.start_m)
    {
        let prev_end = zones
            .iter()
            .filter(|zone| zone.end_m < before_zone.start_m)
            .map(|zone| zone.end_m)
            .fold(bar.start_m, f64::max);
        let target_end = (prev_end + splice).min(before_zone.start_m - EPSILON_M);
        if target_end <= allowed_end
            && target_end - bar.start_m >= splice * 1.5
            && window_clear(target_end)
        {
            return target_end;
        }
    }

    // Safety sweep at 0.1 m increments.
    let mut center = bar.start_m + splice;
    while center <= candidate_end {
        let window_start = center - splice / 2.0;
        let window_end = center + splice / 2.0;
        if !zones
            .iter()
            .any(|zone| zone.overlaps(window_start, window_end))
            && window_end - bar.start_m >= splice * 1.5
            && window_end <= allowed_end
        {
            return window_end;
        }
        center += SWEEP_STEP_M;
    }

    if !*infeasible_reported {
        warnings.push(infeasible_location(&bar.id));
        *infeasible_reported = true;
    }
    candidate_end
}

/// Pull a candidate segment end backwards until its trailing lap window
/// clears every forbidden zone (bounded).
fn retract_out_of_zones(
    current: f64,
    mut candidate_end: f64,
    splice: f64,
    zones: &[ProhibitedZone],
    warnings: &mut Vec<String>,
    bar_id: &str,
    infeasible_reported: &mut bool,
) -> f64 {
    for _ in 0..MAX_RETRACTIONS {
        let window_start = candidate_end - splice;
        let Some(zone) = zones
            .iter()
            .filter(|zone| zone.overlaps(window_start, candidate_end))
            .min_by(|a, b| a.start_m.total_cmp(&b.start_m))
        else {
            return candidate_end;
        };
        if zone.start_m - splice <= current + EPSILON_M {
            if !*infeasible_reported {
                warnings.push(infeasible_location(bar_id));
                *infeasible_reported = true;
            }
            return candidate_end;
        }
        candidate_end = zone.start_m;
    }
    candidate_end
}

fn infeasible_location(bar_id: &str) -> String {
    format!(
        "Barra {bar_id}: sin corredor disponible para el empalme; se mantiene la mejor ubicación parcial"
    )
}

/// Build the segment records, duplicating each joint on both of its sides.
fn materialize(
    bar: &RebarDetail,
    boundaries: &[(f64, f64)],
    joints: &[SpliceRecord],
) -> Vec<RebarDetail> {
    if boundaries.len() <= 1 {
        let mut single = bar.clone();
        if let Some(&(start, end)) = boundaries.first() {
            single.start_m = start;
            single.end_m = end;
            single.length_m = end - start;
        }
        single.splices = (!joints.is_empty()).then(|| joints.to_vec());
        return vec![single];
    }

    boundaries
        .iter()
        .enumerate()
        .map(|(index, &(start, end))| {
            let mut segment_splices: Vec<SpliceRecord> = Vec::new();
            if let Some(incoming) = index.checked_sub(1).and_then(|i| joints.get(i)) {
                segment_splices.push(incoming.clone());
            }
            if let Some(outgoing) = joints.get(index) {
                segment_splices.push(outgoing.clone());
            }
            RebarDetail {
                id: format!("{}-{:02}", bar.id, index + 1),
                diameter: bar.diameter,
                position: bar.position,
                kind: bar.kind,
                length_m: end - start,
                start_m: start,
                end_m: end,
                quantity: bar.quantity,
                splices: (!segment_splices.is_empty()).then_some(segment_splices),
                hook_type: bar.hook_type,
                development_length_m: bar.development_length_m,
                notes: bar.notes.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{BarKind, BarMark, BarPosition, HookType};

    fn continuous_bar(id: &str, end_m: f64) -> RebarDetail {
        RebarDetail {
            id: id.to_string(),
            diameter: BarMark::M6,
            position: BarPosition::Top,
            kind: BarKind::Continuous,
            length_m: end_m,
            start_m: 0.0,
            end_m,
            quantity: 1,
            splices: None,
            hook_type: HookType::Deg135,
            development_length_m: Some(0.6),
            notes: None,
        }
    }

    fn params(beam_length_m: f64, max_length_m: f64) -> SplitParams {
        SplitParams {
            max_length_m,
            splice_length_m: 1.1,
            hook_length_m: 0.191,
            edge_cover_m: 0.05,
            beam_length_m,
        }
    }

    #[test]
    fn short_bar_stays_whole() {
        let bar = continuous_bar("T6-C01", 4.6);
        let mut warnings = Vec::new();
        let segments = split_bar_by_max_length(
            bar.clone(),
            SplitStrategy::Top,
            &params(4.6, 12.0),
            &[],
            &mut warnings,
        );
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].id, "T6-C01");
        assert!(segments[0].splices.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn long_bar_splits_with_shared_joints() {
        let bar = continuous_bar("T6-C01", 20.0);
        let mut warnings = Vec::new();
        let segments = split_bar_by_max_length(
            bar,
            SplitStrategy::Top,
            &params(20.0, 12.0),
            &[],
            &mut warnings,
        );
        assert_eq!(segments.len(), 2);
        // Segments tile [0, 20] with one shared lap.
        assert_eq!(segments[0].start_m, 0.0);
        assert_eq!(segments[1].end_m, 20.0);
        let left_joint = &segments[0].splice_records()[0];
        let right_joint = &segments[1].splice_records()[0];
        assert_eq!(left_joint.start, right_joint.start);
        assert!((segments[1].start_m - left_joint.start).abs() < 1e-9);
        assert!((left_joint.length - 1.1).abs() < 1e-9);
        // First segment lost the start hook allowance from its stock cut.
        assert!(segments[0].end_m <= 12.0 - 0.191 + 1e-9);
    }

    #[test]
    fn oversized_splice_is_reported_not_split() {
        let mut bar = continuous_bar("T6-C01", 20.0);
        bar.splices = None;
        let mut warnings = Vec::new();
        let mut p = params(20.0, 12.0);
        p.splice_length_m = 12.5;
        let segments =
            split_bar_by_max_length(bar, SplitStrategy::Top, &p, &[], &mut warnings);
        assert_eq!(segments.len(), 1);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("longitud comercial"));
    }

    #[test]
    fn planned_bottom_joints_win_when_feasible() {
        let mut bar = continuous_bar("B6-C01", 15.6);
        bar.position = BarPosition::Bottom;
        bar.splices = Some(vec![
            SpliceRecord {
                start: 4.598,
                end: 5.698,
                length: 1.1,
                kind: SpliceKind::LapSpliceClassB,
                offset_group: Some(0),
                offset_applied: None,
                adjusted: None,
                original_center: None,
            },
            SpliceRecord {
                start: 9.902,
                end: 11.002,
                length: 1.1,
                kind: SpliceKind::LapSpliceClassB,
                offset_group: Some(0),
                offset_applied: None,
                adjusted: None,
                original_center: None,
            },
        ]);
        let mut warnings = Vec::new();
        let segments = split_bar_by_max_length(
            bar,
            SplitStrategy::Bottom { offset_ratio: 0.08 },
            &params(15.6, 12.0),
            &[],
            &mut warnings,
        );
        // ⌈15.6/12⌉ − 1 = 1 joint needed; only the first planned joint is used.
        assert_eq!(segments.len(), 2);
        assert!((segments[0].end_m - 5.698).abs() < 1e-9);
        assert!((segments[1].start_m - 4.598).abs() < 1e-9);
        assert!(warnings.is_empty());
    }

    #[test]
    fn walk_retracts_joint_before_zone() {
        use core_model::ZoneKind;
        let bar = continuous_bar("T6-C01", 10.6);
        let zones = vec![ProhibitedZone {
            start_m: 9.52,
            end_m: 10.3,
            kind: ZoneKind::BeforeFace,
            description: String::new(),
            support_index: 1,
        }];
        let mut warnings = Vec::new();
        let segments = split_bar_by_max_length(
            bar,
            SplitStrategy::Top,
            &params(10.6, 10.0),
            &zones,
            &mut warnings,
        );
        assert_eq!(segments.len(), 2);
        // Raw cut would land at 9.809 with its lap window inside the zone;
        // the walk retracts the joint to end at the zone start.
        assert!((segments[0].end_m - 9.52).abs() < 1e-9);
        let joint = &segments[1].splice_records()[0];
        assert!(joint.end <= 9.52 + 1e-9);
        assert!(warnings.is_empty());
    }
}
