//! NSR-10 validation warnings and the optimization score.
//!
//! Warnings are ordered, human-readable and never abort the computation;
//! `validation_passed` is simply the empty-warnings predicate evaluated by
//! the façade.

use core_model::{BarKind, EnergyClass, MaterialItem, ProhibitedZone, RebarDetail};

/// Run every code check over the planned bars.
pub fn validate_nsr10(
    energy_class: EnergyClass,
    top_bars: &[RebarDetail],
    bottom_bars: &[RebarDetail],
    zones: &[ProhibitedZone],
) -> Vec<String> {
    let mut warnings = Vec::new();

    let top_continuous = top_bars
        .iter()
        .filter(|bar| bar.kind == BarKind::Continuous)
        .count();
    let bottom_continuous = bottom_bars
        .iter()
        .filter(|bar| bar.kind == BarKind::Continuous)
        .count();
    if top_continuous < 2 {
        warnings.push(
            "NSR-10 C.21.5.2.1: Mínimo 2 barras superiores continuas requeridas".to_string(),
        );
    }
    if bottom_continuous < 2 {
        warnings.push(
            "NSR-10 C.21.5.2.1: Mínimo 2 barras inferiores continuas requeridas".to_string(),
        );
    }

    for bar in top_bars.iter().chain(bottom_bars.iter()) {
        for splice in bar.splice_records() {
            if let Some(zone) = zones
                .iter()
                .find(|zone| zone.overlaps(splice.start, splice.end))
            {
                warnings.push(format!(
                    "Barra {}: Empalme en zona prohibida ({:.2}-{:.2}m)",
                    bar.id, zone.start_m, zone.end_m
                ));
                break;
            }
        }
    }

    for bar in top_bars.iter().chain(bottom_bars.iter()) {
        if let Some(development) = bar.development_length_m {
            if bar.length_m < development {
                warnings.push(format!(
                    "Barra {}: Longitud insuficiente para desarrollo (necesita {:.2}m, tiene {:.2}m)",
                    bar.id, development, bar.length_m
                ));
            }
        }
    }

    if energy_class == EnergyClass::Des {
        for bar in top_bars.iter().chain(bottom_bars.iter()) {
            if bar.kind == BarKind::Continuous && !bar.hook_type.is_seismic() {
                warnings.push(format!(
                    "Barra {}: En DES se recomiendan ganchos de 135° o 180° (actual: {}°)",
                    bar.id,
                    bar.hook_type.degrees()
                ));
            }
        }
    }

    let total_top: u32 = top_bars.iter().map(|bar| bar.quantity).sum();
    let total_bottom: u32 = bottom_bars.iter().map(|bar| bar.quantity).sum();
    if total_top == 0 {
        warnings.push("No se definieron barras superiores".to_string());
    }
    if total_bottom == 0 {
        warnings.push("No se definieron barras inferiores".to_string());
    }

    warnings
}

/// Score in `[0, 100]`: 100 minus 5 per warning, minus a waste penalty,
/// plus a bonus when both faces keep at least 2 continuous bars.
pub fn optimization_score(
    warnings: &[String],
    material_list: &[MaterialItem],
    top_bars: &[RebarDetail],
    bottom_bars: &[RebarDetail],
) -> f64 {
    let mut score = 100.0 - 5.0 * warnings.len() as f64;

    if !material_list.is_empty() {
        let avg_waste = material_list
            .iter()
            .map(|item| item.waste_percentage)
            .sum::<f64>()
            / material_list.len() as f64;
        if avg_waste > 15.0 {
            score -= 20.0;
        } else if avg_waste > 10.0 {
            score -= 10.0;
        } else if avg_waste > 5.0 {
            score -= 5.0;
        }
    }

    let continuous = |bars: &[RebarDetail]| {
        bars.iter()
            .filter(|bar| bar.kind == BarKind::Continuous)
            .count()
    };
    if continuous(top_bars) >= 2 && continuous(bottom_bars) >= 2 {
        score += 10.0;
    }

    score.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{BarMark, BarPosition, HookType};

    fn bar(id: &str, kind: BarKind, hook_type: HookType) -> RebarDetail {
        RebarDetail {
            id: id.to_string(),
            diameter: BarMark::M6,
            position: BarPosition::Top,
            kind,
            length_m: 4.0,
            start_m: 0.0,
            end_m: 4.0,
            quantity: 1,
            splices: None,
            hook_type,
            development_length_m: Some(0.6),
            notes: None,
        }
    }

    #[test]
    fn missing_continuous_bars_warn() {
        let warnings = validate_nsr10(EnergyClass::Des, &[], &[], &[]);
        assert!(warnings.iter().any(|w| w.contains("superiores continuas")));
        assert!(warnings.iter().any(|w| w.contains("inferiores continuas")));
        assert!(warnings.iter().any(|w| w == "No se definieron barras superiores"));
    }

    #[test]
    fn des_rejects_soft_hooks_on_continuous_bars() {
        let top = vec![
            bar("T6-C01", BarKind::Continuous, HookType::Deg90),
            bar("T6-C02", BarKind::Continuous, HookType::Deg135),
        ];
        let bottom = vec![
            bar("B6-C01", BarKind::Continuous, HookType::Deg135),
            bar("B6-C02", BarKind::Continuous, HookType::Deg135),
        ];
        let warnings = validate_nsr10(EnergyClass::Des, &top, &bottom, &[]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("ganchos de 135"));
        // Same beam is clean under moderate dissipation.
        assert!(validate_nsr10(EnergyClass::Dmo, &top, &bottom, &[]).is_empty());
    }

    #[test]
    fn short_bar_fails_development_check() {
        let mut short = bar("T6-A01", BarKind::Support, HookType::Deg135);
        short.length_m = 0.4;
        let top = vec![
            bar("T6-C01", BarKind::Continuous, HookType::Deg135),
            bar("T6-C02", BarKind::Continuous, HookType::Deg135),
            short,
        ];
        let bottom = vec![
            bar("B6-C01", BarKind::Continuous, HookType::Deg135),
            bar("B6-C02", BarKind::Continuous, HookType::Deg135),
        ];
        let warnings = validate_nsr10(EnergyClass::Des, &top, &bottom, &[]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Longitud insuficiente"));
    }

    #[test]
    fn score_rewards_clean_results() {
        let top = vec![
            bar("T6-C01", BarKind::Continuous, HookType::Deg135),
            bar("T6-C02", BarKind::Continuous, HookType::Deg135),
        ];
        let bottom = vec![
            bar("B6-C01", BarKind::Continuous, HookType::Deg135),
            bar("B6-C02", BarKind::Continuous, HookType::Deg135),
        ];
        assert_eq!(optimization_score(&[], &[], &top, &bottom), 100.0);
        let warnings = vec!["w".to_string(); 25];
        assert_eq!(optimization_score(&warnings, &[], &[], &[]), 0.0);
    }
}
