//! Mandatory continuous bars (NSR-10 C.21.5.2.1).
//!
//! Per face: sort the distinct marks by gauge descending, keep at most the
//! two largest, and make 2 of each continuous when at least 2 are
//! available, otherwise 1. Everything else is detailed as non-continuous.

use crate::preprocess::FaceBars;
use core_model::{ContinuousBars, ContinuousSide};

fn select_side(face: &FaceBars) -> ContinuousSide {
    let mut marks: Vec<_> = face.counts.keys().copied().collect();
    marks.sort_by(|a, b| b.gauge().cmp(&a.gauge()));
    marks.truncate(2);

    let mut side = ContinuousSide {
        diameters: marks.clone(),
        ..ContinuousSide::default()
    };
    for mark in marks {
        let available = face.counts.get(&mark).copied().unwrap_or(0);
        let continuous = if available >= 2 {
            2
        } else {
            available.min(1)
        };
        side.count_per_diameter.insert(mark, continuous);
    }
    side.total_continuous = side.count_per_diameter.values().sum();
    side
}

pub fn identify_continuous_bars(top: &FaceBars, bottom: &FaceBars) -> ContinuousBars {
    ContinuousBars {
        top: select_side(top),
        bottom: select_side(bottom),
    }
}
