//! Input preprocessing: bar-group expansion and derived covers.
//!
//! Bar groups expand into per-bar mark multisets; marks without a unit
//! weight (`#2`) are silently dropped, matching the commercial catalog.
//! The edge cover is floored at `MIN_EDGE_COVER_M`.

use core_model::{BarGroup, BarMark, DetailingError, DetailingInput};
use core_tables::{MIN_EDGE_COVER_M, unit_weight};
use std::collections::BTreeMap;

/// Expanded longitudinal configuration for one face: ordered counts per
/// mark (ascending gauge) plus the total bar count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FaceBars {
    pub counts: BTreeMap<BarMark, u32>,
}

impl FaceBars {
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Preprocessed material scalars shared by every planning stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Covers {
    /// Edge cover in meters, floored at the code minimum.
    pub edge_cover_m: f64,
    /// Raw cover input in centimeters (stirrup geometry uses it).
    pub cover_cm: f64,
}

pub fn expand_bar_config(groups: &[BarGroup]) -> FaceBars {
    let mut counts = BTreeMap::new();
    for group in groups {
        if group.quantity == 0 || unit_weight(group.diameter).is_none() {
            continue;
        }
        *counts.entry(group.diameter).or_insert(0) += group.quantity;
    }
    FaceBars { counts }
}

pub fn derive_covers(input: &DetailingInput) -> Covers {
    let cover_cm = if input.cover_cm > 0.0 { input.cover_cm } else { 5.0 };
    Covers {
        edge_cover_m: (cover_cm / 100.0).max(MIN_EDGE_COVER_M),
        cover_cm,
    }
}

/// Expand both faces and reject inputs without any longitudinal steel.
pub fn expand_faces(input: &DetailingInput) -> Result<(FaceBars, FaceBars), DetailingError> {
    let top = expand_bar_config(&input.top_bars_config);
    let bottom = expand_bar_config(&input.bottom_bars_config);
    if top.is_empty() && bottom.is_empty() {
        return Err(DetailingError::NoReinforcement);
    }
    Ok((top, bottom))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expansion_merges_groups_of_same_mark() {
        let bars = expand_bar_config(&[
            BarGroup {
                diameter: BarMark::M6,
                quantity: 2,
            },
            BarGroup {
                diameter: BarMark::M6,
                quantity: 1,
            },
            BarGroup {
                diameter: BarMark::M8,
                quantity: 2,
            },
        ]);
        assert_eq!(bars.counts.get(&BarMark::M6), Some(&3));
        assert_eq!(bars.counts.get(&BarMark::M8), Some(&2));
        assert_eq!(bars.total(), 5);
    }

    #[test]
    fn mark_two_and_zero_quantities_are_dropped() {
        let bars = expand_bar_config(&[
            BarGroup {
                diameter: BarMark::M2,
                quantity: 4,
            },
            BarGroup {
                diameter: BarMark::M5,
                quantity: 0,
            },
        ]);
        assert!(bars.is_empty());
    }
}
