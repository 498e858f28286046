//! Splice plans for continuous bars.
//!
//! Top bars get evenly spaced candidate centers; bottom bars get the
//! staggered positional plan (per-instance ratio subsets) with a
//! progressive-offset fallback. Every placed splice window must clear all
//! forbidden zones and keep at least 80 % of the required lap length after
//! clamping to the beam.

use core_model::{ProhibitedZone, SpliceKind, SpliceRecord};

/// Positional ratios the bottom plan may use.
const BOTTOM_POSITIONS: [f64; 7] = [0.25, 0.33, 0.40, 0.50, 0.60, 0.67, 0.75];

/// Ratio subset per stagger group (`bar_index % 3`).
const BOTTOM_PATTERNS: [[usize; 2]; 3] = [
    [1, 5], // 33 % and 67 %
    [2, 4], // 40 % and 60 %
    [0, 3], // 25 % and 50 %
];

/// True when a splice centered at `position` would touch a forbidden zone.
pub fn is_in_prohibited_zone(
    position: f64,
    zones: &[ProhibitedZone],
    splice_length: f64,
) -> bool {
    let splice_start = position - splice_length / 2.0;
    let splice_end = position + splice_length / 2.0;
    zones.iter().any(|zone| {
        zone.contains(position) || (splice_start < zone.end_m && splice_end > zone.start_m)
    })
}

fn record(start: f64, end: f64) -> SpliceRecord {
    SpliceRecord {
        start,
        end,
        length: end - start,
        kind: SpliceKind::LapSpliceClassB,
        offset_group: None,
        offset_applied: None,
        adjusted: None,
        original_center: None,
    }
}

/// Evenly spaced splice plan for top continuous bars. Centers land at
/// `k·total/n` for `n = ⌈total/Lmax⌉`; candidates inside forbidden zones
/// are dropped, and a clamped window must keep ≥ 80 % of the lap.
pub fn calculate_splices(
    total_length: f64,
    max_bar_length: f64,
    zones: &[ProhibitedZone],
    splice_length: f64,
) -> Option<Vec<SpliceRecord>> {
    if total_length <= max_bar_length {
        return None;
    }
    let num_pieces = (total_length / max_bar_length).ceil() as usize;
    if num_pieces <= 1 {
        return None;
    }

    let piece_length = total_length / num_pieces as f64;
    let mut splices = Vec::new();
    for piece in 1..num_pieces {
        let center = piece as f64 * piece_length;
        if zones.iter().any(|zone| zone.contains(center)) {
            continue;
        }
        let start = (center - splice_length / 2.0).max(0.0);
        let end = (center + splice_length / 2.0).min(total_length);
        if end - start >= splice_length * 0.8 {
            splices.push(record(start, end));
        }
    }

    (!splices.is_empty()).then_some(splices)
}

/// Staggered positional plan for bottom continuous bars. Each instance
/// tries its group's ratio pair; when no position survives the zone checks
/// the progressive-offset plan takes over.
pub fn build_bottom_splice_plan(
    total_length: f64,
    splice_length: f64,
    zones: &[ProhibitedZone],
    max_bar_length: f64,
    bar_index: usize,
) -> Option<Vec<SpliceRecord>> {
    if splice_length <= 0.0 {
        return None;
    }

    let group = bar_index % BOTTOM_PATTERNS.len();
    let mut splices = Vec::new();
    for &position_index in &BOTTOM_PATTERNS[group] {
        let center = total_length * BOTTOM_POSITIONS[position_index];
        if is_in_prohibited_zone(center, zones, splice_length) {
            continue;
        }
        let start = (center - splice_length / 2.0).max(0.0);
        let end = (center + splice_length / 2.0).min(total_length);
        if end - start >= splice_length * 0.8 {
            let mut splice = record(start, end);
            splice.offset_group = Some(group as u32);
            splices.push(splice);
        }
    }

    if !splices.is_empty() {
        return Some(splices);
    }

    let offset_factor = 0.08 + 0.04 * group as f64;
    calculate_splices_with_offset(
        total_length,
        max_bar_length,
        zones,
        splice_length,
        offset_factor,
    )
}

/// Joint plan with a progressive per-joint shift, used to de-synchronize
/// bottom joints from the even top plan when no positional ratio fits.
pub fn calculate_splices_with_offset(
    total_length: f64,
    max_bar_length: f64,
    zones: &[ProhibitedZone],
    splice_length: f64,
    offset_factor: f64,
) -> Option<Vec<SpliceRecord>> {
    if total_length <= max_bar_length || splice_length <= 0.0 {
        return None;
    }
    let num_pieces = (total_length / max_bar_length).ceil() as usize;
    if num_pieces <= 1 {
        return None;
    }

    let base_piece_length = total_length / num_pieces as f64;
    let bounded_offset = offset_factor.clamp(-0.5, 0.5);
    let offset_per_joint = base_piece_length * bounded_offset;

    let mut splices = Vec::new();
    for joint in 1..num_pieces {
        let raw_center = joint as f64 * base_piece_length + offset_per_joint * joint as f64;
        let center = raw_center.clamp(splice_length / 2.0, total_length - splice_length / 2.0);
        if is_in_prohibited_zone(center, zones, splice_length) {
            continue;
        }
        let start = (center - splice_length / 2.0).max(0.0);
        let end = (center + splice_length / 2.0).min(total_length);
        if end - start >= splice_length * 0.8 {
            let mut splice = record(start, end);
            splice.offset_applied = Some((bounded_offset * 1000.0).round() / 1000.0);
            splices.push(splice);
        }
    }

    (!splices.is_empty()).then_some(splices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::ZoneKind;

    fn zone(start_m: f64, end_m: f64) -> ProhibitedZone {
        ProhibitedZone {
            start_m,
            end_m,
            kind: ZoneKind::AfterFace,
            description: String::new(),
            support_index: 0,
        }
    }

    #[test]
    fn no_splices_when_stock_covers_the_bar() {
        assert!(calculate_splices(10.0, 12.0, &[], 1.1).is_none());
    }

    #[test]
    fn even_plan_drops_centers_inside_zones() {
        // 20 m / 12 m stock → 2 pieces, center at 10 m.
        let blocked = calculate_splices(20.0, 12.0, &[zone(9.5, 10.5)], 1.1);
        assert!(blocked.is_none());
        let free = calculate_splices(20.0, 12.0, &[zone(2.0, 3.0)], 1.1).unwrap();
        assert_eq!(free.len(), 1);
        assert!((free[0].center() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn bottom_groups_rotate_positions() {
        let group_zero = build_bottom_splice_plan(15.0, 1.1, &[], 12.0, 0).unwrap();
        let group_one = build_bottom_splice_plan(15.0, 1.1, &[], 12.0, 1).unwrap();
        assert!((group_zero[0].center() - 15.0 * 0.33).abs() < 1e-9);
        assert!((group_one[0].center() - 15.0 * 0.40).abs() < 1e-9);
        assert_eq!(group_zero[0].offset_group, Some(0));
        assert_eq!(group_one[0].offset_group, Some(1));
    }

    #[test]
    fn bottom_plan_falls_back_to_offset_method() {
        // Zones cover every positional candidate of group 0.
        let zones = vec![zone(4.0, 6.0), zone(9.0, 11.0)];
        let plan = build_bottom_splice_plan(15.0, 1.1, &zones, 12.0, 0);
        // Fallback joint: 7.5 · (1 + 0.08) = 8.1, clear of both zones.
        let plan = plan.unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].offset_applied, Some(0.08));
        assert!(!is_in_prohibited_zone(plan[0].center(), &zones, 1.1));
    }

    #[test]
    fn splice_window_keeps_eighty_percent_after_clamp() {
        for splice in calculate_splices(20.0, 12.0, &[], 1.1).into_iter().flatten() {
            assert!(splice.length >= 1.1 * 0.8);
        }
    }
}
