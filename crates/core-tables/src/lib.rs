//! NSR-10 code tables as compile-time constants.
//!
//! Every lookup is a total `match` over `BarMark`, so adding a mark without
//! updating a table is a compile error. Values are the seeded NSR-10
//! Título C data: hook allowances (C.7.1), unit weights (Anexo C),
//! simplified base development lengths (C.12.2) for fy = 420 MPa and
//! f'c = 21 MPa, and the commercial Class B lap-splice catalog per
//! concrete class.
//!
//! Lookup gaps are meaningful, not defects:
//! * `#2` has hook data but no unit weight and no development length; the
//!   planner therefore rejects it as longitudinal reinforcement.
//! * Marks above `#8` have no 135° stirrup hook allowance.

use core_model::{BarMark, ConcreteClass, EnergyClass, HookType, SteelGrade};
use serde::Serialize;

/// Minimum edge cover the finisher enforces at beam ends (m).
pub const MIN_EDGE_COVER_M: f64 = 0.05;

/// Development length assumed when a mark has no tabulated value (m).
pub const DEFAULT_DEVELOPMENT_M: f64 = 0.60;

/// Lap length assumed when a mark has no tabulated value (m).
pub const DEFAULT_SPLICE_M: f64 = 0.78;

/// Default transverse reinforcement mark.
pub const DEFAULT_STIRRUP_MARK: BarMark = BarMark::M3;

/// Default transverse reinforcement hook.
pub const DEFAULT_STIRRUP_HOOK: HookType = HookType::Deg135;

/// Hook allowance H(mark, angle) in meters. `None` where the code tabulates
/// no bend for that mark (135° seismic stirrup hooks stop at `#8`).
pub fn hook_allowance(mark: BarMark, hook: HookType) -> Option<f64> {
    use BarMark::*;
    let (deg90, deg180, deg135) = match mark {
        M2 => (0.10, 0.080, Some(0.075)),
        M3 => (0.15, 0.130, Some(0.095)),
        M4 => (0.20, 0.150, Some(0.127)),
        M5 => (0.25, 0.180, Some(0.159)),
        M6 => (0.30, 0.210, Some(0.191)),
        M7 => (0.36, 0.250, Some(0.222)),
        M8 => (0.41, 0.300, Some(0.254)),
        M9 => (0.49, 0.340, None),
        M10 => (0.54, 0.400, None),
        M11 => (0.59, 0.430, None),
        M14 => (0.80, 0.445, None),
        M18 => (1.03, 0.572, None),
    };
    match hook {
        HookType::Deg90 => Some(deg90),
        HookType::Deg180 => Some(deg180),
        HookType::Deg135 => deg135,
    }
}

/// Unit weight W(mark) in kg/m. `#2` is not stocked as longitudinal steel.
pub fn unit_weight(mark: BarMark) -> Option<f64> {
    use BarMark::*;
    match mark {
        M2 => None,
        M3 => Some(0.56),
        M4 => Some(1.00),
        M5 => Some(1.55),
        M6 => Some(2.26),
        M7 => Some(3.04),
        M8 => Some(3.97),
        M9 => Some(5.06),
        M10 => Some(6.40),
        M11 => Some(7.91),
        M14 => Some(14.60),
        M18 => Some(23.70),
    }
}

/// Base development length Ld0(mark) in meters for the reference strength
/// pair (f'c 21 MPa, fy 420 MPa).
pub fn base_development_length(mark: BarMark) -> Option<f64> {
    use BarMark::*;
    match mark {
        M2 => None,
        M3 => Some(0.30),
        M4 => Some(0.40),
        M5 => Some(0.50),
        M6 => Some(0.60),
        M7 => Some(0.70),
        M8 => Some(0.80),
        M9 => Some(0.90),
        M10 => Some(1.00),
        M11 => Some(1.10),
        M14 => Some(1.40),
        M18 => Some(1.80),
    }
}

/// Multiplicative adjustment on Ld0 for the concrete class.
pub fn fc_factor(concrete: ConcreteClass) -> f64 {
    match concrete {
        ConcreteClass::Fc21 => 1.0,
        ConcreteClass::Fc24 => 0.92,
        ConcreteClass::Fc28 => 0.85,
        ConcreteClass::Fc32 => 0.80,
    }
}

/// Multiplicative adjustment on Ld0 for the steel grade.
pub fn fy_factor(steel: SteelGrade) -> f64 {
    match steel {
        SteelGrade::Grade60 => 1.0,
        SteelGrade::Grade75 => 1.25,
    }
}

/// Class B lap multiplier per energy dissipation class.
pub fn energy_factor(energy: EnergyClass) -> f64 {
    match energy {
        EnergyClass::Des => 1.3,
        EnergyClass::Dmo | EnergyClass::Dmi => 1.0,
    }
}

/// Column of the commercial lap catalog. The 32 MPa class maps to the
/// strongest tabulated column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LapColumn {
    Fc21,
    Fc24,
    Fc28,
}

pub fn lap_column(concrete: ConcreteClass) -> LapColumn {
    match concrete {
        ConcreteClass::Fc21 => LapColumn::Fc21,
        ConcreteClass::Fc24 => LapColumn::Fc24,
        ConcreteClass::Fc28 | ConcreteClass::Fc32 => LapColumn::Fc28,
    }
}

/// Commercial Class B lap length L_lap(mark, f'c) in meters. When present
/// this value overrides the computed `Ld · f_E`.
pub fn commercial_lap_length(mark: BarMark, column: LapColumn) -> Option<f64> {
    use BarMark::*;
    let (fc21, fc24, fc28) = match mark {
        M2 => return None,
        M3 => (0.55, 0.50, 0.45),
        M4 => (0.70, 0.65, 0.60),
        M5 => (0.90, 0.85, 0.80),
        M6 => (1.10, 1.00, 0.95),
        M7 => (1.25, 1.20, 1.10),
        M8 => (1.80, 1.65, 1.55),
        M9 => (2.00, 1.85, 1.75),
        M10 => (2.25, 2.10, 1.95),
        M11 => (2.45, 2.30, 2.15),
        M14 => (3.10, 2.90, 2.70),
        M18 => (4.00, 3.75, 3.45),
    };
    Some(match column {
        LapColumn::Fc21 => fc21,
        LapColumn::Fc24 => fc24,
        LapColumn::Fc28 => fc28,
    })
}

/// Catalog options surfaced to input forms and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Presets {
    pub fc_options: Vec<&'static str>,
    pub fy_options: Vec<&'static str>,
    pub hook_options: Vec<&'static str>,
    pub max_bar_lengths: Vec<&'static str>,
    pub energy_classes: Vec<&'static str>,
    pub diameter_options: Vec<String>,
}

pub fn presets() -> Presets {
    Presets {
        fc_options: vec![
            "21 MPa (3000 psi)",
            "24 MPa (3500 psi)",
            "28 MPa (4000 psi)",
            "32 MPa (4600 psi)",
        ],
        fy_options: vec!["420 MPa (Grado 60)", "520 MPa (Grado 75)"],
        hook_options: vec!["90", "135", "180"],
        max_bar_lengths: vec!["6m", "9m", "12m"],
        energy_classes: vec!["DES", "DMO", "DMI"],
        diameter_options: BarMark::ALL
            .into_iter()
            .filter(|mark| unit_weight(*mark).is_some())
            .map(|mark| mark.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stirrup_hooks_stop_at_mark_eight() {
        assert_eq!(hook_allowance(BarMark::M8, HookType::Deg135), Some(0.254));
        assert_eq!(hook_allowance(BarMark::M9, HookType::Deg135), None);
        assert_eq!(hook_allowance(BarMark::M18, HookType::Deg90), Some(1.03));
    }

    #[test]
    fn mark_two_is_not_longitudinal() {
        assert_eq!(unit_weight(BarMark::M2), None);
        assert_eq!(base_development_length(BarMark::M2), None);
        assert!(!presets().diameter_options.contains(&"#2".to_string()));
    }

    #[test]
    fn strongest_concrete_uses_strongest_lap_column() {
        assert_eq!(lap_column(ConcreteClass::Fc32), LapColumn::Fc28);
        assert_eq!(
            commercial_lap_length(BarMark::M6, lap_column(ConcreteClass::Fc32)),
            Some(0.95)
        );
    }

    #[test]
    fn energy_factor_only_raises_des() {
        assert_eq!(energy_factor(EnergyClass::Des), 1.3);
        assert_eq!(energy_factor(EnergyClass::Dmo), 1.0);
        assert_eq!(energy_factor(EnergyClass::Dmi), 1.0);
    }

    #[test]
    fn lap_catalog_shrinks_with_stronger_concrete() {
        for mark in BarMark::ALL.into_iter().filter(|m| *m != BarMark::M2) {
            let fc21 = commercial_lap_length(mark, LapColumn::Fc21).unwrap();
            let fc24 = commercial_lap_length(mark, LapColumn::Fc24).unwrap();
            let fc28 = commercial_lap_length(mark, LapColumn::Fc28).unwrap();
            assert!(fc21 >= fc24 && fc24 >= fc28, "{mark}");
        }
    }
}
