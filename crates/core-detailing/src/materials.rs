//! Material list with first-fit-decreasing cutting stock.
//!
//! Pieces group per diameter, sort descending and pack greedily into
//! commercial stock. A piece longer than the stock is recorded as its own
//! oversized stock at full efficiency so the packing loop always drains.

use core_model::{BarMark, CommercialCut, MaterialItem, RebarDetail};
use core_tables::unit_weight;
use std::collections::BTreeMap;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Greedy first-fit-decreasing pack of `lengths` into `max_length` stock.
fn optimize_cutting_stock(lengths: &[f64], max_length: f64) -> Vec<CommercialCut> {
    let mut remaining: Vec<f64> = lengths.to_vec();
    remaining.sort_by(|a, b| b.total_cmp(a));

    let mut cuts = Vec::new();
    while !remaining.is_empty() {
        let mut capacity = max_length;
        let mut current_cuts = Vec::new();

        let mut index = 0;
        while index < remaining.len() {
            if remaining[index] <= capacity {
                let piece = remaining.remove(index);
                capacity -= piece;
                current_cuts.push(piece);
            } else {
                index += 1;
            }
        }

        if !current_cuts.is_empty() {
            let used: f64 = current_cuts.iter().sum();
            cuts.push(CommercialCut {
                commercial_length: max_length,
                cut_lengths: current_cuts,
                num_bars: 1,
                waste_m: max_length - used,
                efficiency: if max_length > 0.0 {
                    used / max_length * 100.0
                } else {
                    0.0
                },
            });
            continue;
        }

        // The longest remaining piece exceeds the stock; record it as an
        // oversized single-piece stock so the loop terminates.
        let long_piece = remaining.remove(0);
        cuts.push(CommercialCut {
            commercial_length: long_piece.max(max_length),
            cut_lengths: vec![long_piece],
            num_bars: 1,
            waste_m: (max_length - long_piece).max(0.0),
            efficiency: if long_piece >= max_length {
                100.0
            } else {
                long_piece / max_length * 100.0
            },
        });
    }

    cuts
}

/// Aggregate all detailed bars into the per-diameter material list.
pub fn generate_material_list(bars: &[RebarDetail], max_length: f64) -> Vec<MaterialItem> {
    let mut by_diameter: BTreeMap<BarMark, Vec<&RebarDetail>> = BTreeMap::new();
    for bar in bars {
        by_diameter.entry(bar.diameter).or_default().push(bar);
    }

    by_diameter
        .into_iter()
        .map(|(diameter, group)| {
            let total_length: f64 = group
                .iter()
                .map(|bar| bar.length_m * bar.quantity as f64)
                .sum();
            let pieces: u32 = group.iter().map(|bar| bar.quantity).sum();

            let mut lengths = Vec::with_capacity(pieces as usize);
            for bar in &group {
                for _ in 0..bar.quantity {
                    lengths.push(bar.length_m);
                }
            }
            let commercial_lengths = optimize_cutting_stock(&lengths, max_length);

            let total_commercial: f64 = commercial_lengths
                .iter()
                .map(|cut| cut.num_bars as f64 * cut.commercial_length)
                .sum();
            let waste_percentage = if total_commercial > 0.0 {
                (total_commercial - total_length) / total_commercial * 100.0
            } else {
                0.0
            };

            MaterialItem {
                diameter,
                total_length_m: round2(total_length),
                pieces,
                weight_kg: round1(total_length * unit_weight(diameter).unwrap_or(0.0)),
                commercial_lengths,
                waste_percentage: round1(waste_percentage),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{BarKind, BarPosition, HookType};

    fn bar(diameter: BarMark, length_m: f64, quantity: u32) -> RebarDetail {
        RebarDetail {
            id: "X".to_string(),
            diameter,
            position: BarPosition::Top,
            kind: BarKind::Support,
            length_m,
            start_m: 0.0,
            end_m: length_m,
            quantity,
            splices: None,
            hook_type: HookType::Deg135,
            development_length_m: None,
            notes: None,
        }
    }

    #[test]
    fn ffd_packs_short_pieces_together() {
        let cuts = optimize_cutting_stock(&[7.0, 4.0, 5.0, 3.0], 12.0);
        assert_eq!(cuts.len(), 2);
        // 7 + 5 fill the first stock, 4 + 3 the second.
        assert_eq!(cuts[0].cut_lengths, vec![7.0, 5.0]);
        assert_eq!(cuts[1].cut_lengths, vec![4.0, 3.0]);
        assert!((cuts[0].waste_m - 0.0).abs() < 1e-9);
        assert!((cuts[1].waste_m - 5.0).abs() < 1e-9);
    }

    #[test]
    fn oversized_piece_gets_its_own_stock() {
        let cuts = optimize_cutting_stock(&[12.5], 12.0);
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].commercial_length, 12.5);
        assert_eq!(cuts[0].waste_m, 0.0);
        assert_eq!(cuts[0].efficiency, 100.0);
    }

    #[test]
    fn material_totals_and_weight() {
        let bars = vec![bar(BarMark::M6, 4.0, 2), bar(BarMark::M6, 3.0, 1)];
        let items = generate_material_list(&bars, 12.0);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.total_length_m, 11.0);
        assert_eq!(item.pieces, 3);
        // 11.0 m · 2.26 kg/m
        assert!((item.weight_kg - 24.9).abs() < 1e-9);
        let commercial: f64 = item
            .commercial_lengths
            .iter()
            .map(|cut| cut.num_bars as f64 * cut.commercial_length)
            .sum();
        assert!(commercial >= item.total_length_m);
    }

    #[test]
    fn diameters_report_in_gauge_order() {
        let bars = vec![bar(BarMark::M8, 4.0, 1), bar(BarMark::M4, 2.0, 1)];
        let items = generate_material_list(&bars, 12.0);
        assert_eq!(items[0].diameter, BarMark::M4);
        assert_eq!(items[1].diameter, BarMark::M8);
    }
}
