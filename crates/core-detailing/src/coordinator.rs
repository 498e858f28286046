//! Global splice coordination between faces.
//!
//! Bottom lap centers must stay clear of top lap centers (and of each
//! other). A conflicting bottom splice is swept through growing offsets in
//! both directions until a center passes the range, zone and spacing
//! predicates; the relocation is applied to every segment that shares the
//! joint. Relocated splices carry `adjusted: true` plus their original
//! center; splices that could not be relocated keep their position and are
//! tagged as the documented exception.

use core_model::{EPSILON_M, ProhibitedZone, RebarDetail};
use std::collections::HashMap;
use tracing::debug;

/// Offsets swept per attempt round, in meters.
const SWEEP_OFFSETS_M: [f64; 6] = [0.5, 1.0, 1.5, 2.0, 2.5, 3.0];

/// Bounded relocation attempts per conflicting splice.
const MAX_ADJUST_ATTEMPTS: usize = 20;

const COORDINATION_NOTE: &str = "Empalmes coordinados";

#[derive(Debug, Clone, Copy)]
enum Outcome {
    NoConflict,
    Moved(f64),
    Unmovable,
}

/// Joint identity key: millimeter-rounded center and length. Segments on
/// both sides of one physical lap share this key and move together.
fn joint_key(center: f64, length: f64) -> (i64, i64) {
    (
        (center * 1000.0).round() as i64,
        (length * 1000.0).round() as i64,
    )
}

fn collect_unique_splices(bars: &[RebarDetail]) -> Vec<(f64, f64)> {
    let mut seen: Vec<(i64, i64)> = Vec::new();
    let mut unique = Vec::new();
    for bar in bars {
        for splice in bar.splice_records() {
            let key = joint_key(splice.center(), splice.length);
            if !seen.contains(&key) {
                seen.push(key);
                unique.push((splice.center(), splice.length));
            }
        }
    }
    unique
}

/// Shift bottom splices away from top splices. Mutates `bottom_bars` in
/// place; emits one warning per splice that had no feasible relocation.
pub fn coordinate_splice_positions(
    top_bars: &[RebarDetail],
    bottom_bars: &mut [RebarDetail],
    zones: &[ProhibitedZone],
    total_length: f64,
    warnings: &mut Vec<String>,
) {
    let top_splices = collect_unique_splices(top_bars);
    let mut accepted: Vec<(f64, f64)> = Vec::new();
    // Joint key → shared decision across every segment copy of the lap.
    let mut outcomes: HashMap<(i64, i64), Outcome> = HashMap::new();

    for bar_index in 0..bottom_bars.len() {
        let mut bar_adjusted = false;

        for splice_index in 0..bottom_bars[bar_index].splice_records().len() {
            let (center, length) = {
                let splice = &bottom_bars[bar_index].splice_records()[splice_index];
                (splice.center(), splice.length)
            };
            let key = joint_key(center, length);

            let outcome = match outcomes.get(&key) {
                Some(existing) => *existing,
                None => {
                    let conflicting = top_splices.iter().chain(accepted.iter()).any(
                        |&(other_center, other_length)| {
                            let min_distance = 1.5 * length.max(other_length);
                            (center - other_center).abs() < min_distance
                        },
                    );
                    let outcome = if !conflicting {
                        accepted.push((center, length));
                        Outcome::NoConflict
                    } else {
                        match find_relocation(
                            center,
                            length,
                            total_length,
                            zones,
                            &top_splices,
                            &accepted,
                        ) {
                            Some(new_center) => {
                                accepted.push((new_center, length));
                                Outcome::Moved(new_center)
                            }
                            None => {
                                warnings.push(format!(
                                    "Barra {}: no fue posible coordinar el empalme en {:.2}m",
                                    bottom_bars[bar_index].id, center
                                ));
                                accepted.push((center, length));
                                Outcome::Unmovable
                            }
                        }
                    };
                    outcomes.insert(key, outcome);
                    outcome
                }
            };

            match outcome {
                Outcome::NoConflict => {}
                Outcome::Moved(new_center) => {
                    let bar = &mut bottom_bars[bar_index];
                    let splices = bar.splices.as_mut().expect("splice indices enumerated");
                    let splice = &mut splices[splice_index];
                    if (new_center - center).abs() > EPSILON_M {
                        splice.start = new_center - length / 2.0;
                        splice.end = new_center + length / 2.0;
                        splice.length = length;
                        splice.original_center = Some(center);
                    }
                    splice.adjusted = Some(true);
                    bar_adjusted = true;
                }
                Outcome::Unmovable => {
                    let bar = &mut bottom_bars[bar_index];
                    let splices = bar.splices.as_mut().expect("splice indices enumerated");
                    splices[splice_index].adjusted = Some(true);
                    bar_adjusted = true;
                }
            }
        }

        if bar_adjusted {
            let bar = &mut bottom_bars[bar_index];
            bar.notes = Some(match bar.notes.take() {
                Some(existing) if existing.contains(COORDINATION_NOTE) => existing,
                Some(existing) => format!("{existing}; {COORDINATION_NOTE}"),
                None => COORDINATION_NOTE.to_string(),
            });
        }
    }

    debug!(
        top = top_splices.len(),
        bottom = accepted.len(),
        "splice coordination finished"
    );
}

fn find_relocation(
    center: f64,
    length: f64,
    total_length: f64,
    zones: &[ProhibitedZone],
    top_splices: &[(f64, f64)],
    accepted: &[(f64, f64)],
) -> Option<f64> {
    for attempt in 0..MAX_ADJUST_ATTEMPTS {
        let offset = SWEEP_OFFSETS_M[attempt % SWEEP_OFFSETS_M.len()]
            * (attempt / SWEEP_OFFSETS_M.len() + 1) as f64;
        for sign in [1.0, -1.0] {
            let candidate = center + sign * offset;
            if candidate < length / 2.0 || candidate > total_length - length / 2.0 {
                continue;
            }
            let window_start = candidate - length / 2.0;
            let window_end = candidate + length / 2.0;
            if zones
                .iter()
                .any(|zone| zone.overlaps(window_start, window_end))
            {
                continue;
            }
            let spacing_ok = top_splices.iter().chain(accepted.iter()).all(
                |&(other_center, other_length)| {
                    (candidate - other_center).abs() >= 1.2 * length.max(other_length)
                },
            );
            if spacing_ok {
                return Some(candidate);
            }
        }
    }
    None
}
