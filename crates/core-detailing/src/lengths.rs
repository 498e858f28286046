//! Development and lap-splice length resolution (NSR-10 C.12.2).
//!
//! `Ld(mark) = Ld0 · f_fc · f_fy`. The Class B lap is `Ld · f_E`, except
//! when the commercial lap catalog tabulates the mark for the governing
//! f'c column, in which case the catalog value wins. Marks without any
//! tabulated base length fall back to the historical defaults.

use core_model::{BarMark, ConcreteClass, EnergyClass, SteelGrade};
use core_tables::{
    DEFAULT_DEVELOPMENT_M, DEFAULT_SPLICE_M, base_development_length, commercial_lap_length,
    energy_factor, fc_factor, fy_factor, lap_column,
};

/// Resolved lengths for one mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevInfo {
    pub development_m: f64,
    pub splice_m: f64,
}

/// Length resolver bound to the beam's material parameters.
#[derive(Debug, Clone, Copy)]
pub struct LengthResolver {
    fc_factor: f64,
    fy_factor: f64,
    energy_factor: f64,
    lap_column: core_tables::LapColumn,
}

impl LengthResolver {
    pub fn new(concrete: ConcreteClass, steel: SteelGrade, energy: EnergyClass) -> Self {
        Self {
            fc_factor: fc_factor(concrete),
            fy_factor: fy_factor(steel),
            energy_factor: energy_factor(energy),
            lap_column: lap_column(concrete),
        }
    }

    pub fn resolve(&self, mark: BarMark) -> DevInfo {
        let Some(base) = base_development_length(mark) else {
            return DevInfo {
                development_m: DEFAULT_DEVELOPMENT_M,
                splice_m: DEFAULT_SPLICE_M,
            };
        };
        let development_m = base * self.fc_factor * self.fy_factor;
        let splice_m = commercial_lap_length(mark, self.lap_column)
            .unwrap_or(development_m * self.energy_factor);
        DevInfo {
            development_m,
            splice_m,
        }
    }
}
