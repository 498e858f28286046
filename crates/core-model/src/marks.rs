//! Bar marks and material parameter enums.
//!
//! A bar mark is the symbolic diameter key (`#2`..`#18`) used by every code
//! table and by the detailing results. Marks serialize as their display
//! string so the at-rest JSON matches the commercial notation, and they are
//! usable as JSON map keys (count-per-diameter maps).
//!
//! Invariants:
//! * `BarMark::ALL` is sorted by ascending gauge and covers every tabulated
//!   mark exactly once.
//! * `gauge()` is the integer-decoded diameter used for ordering; sorting by
//!   gauge descending picks continuous-bar candidates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Symbolic diameter key for a reinforcement bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BarMark {
    #[serde(rename = "#2")]
    M2,
    #[serde(rename = "#3")]
    M3,
    #[serde(rename = "#4")]
    M4,
    #[serde(rename = "#5")]
    M5,
    #[serde(rename = "#6")]
    M6,
    #[serde(rename = "#7")]
    M7,
    #[serde(rename = "#8")]
    M8,
    #[serde(rename = "#9")]
    M9,
    #[serde(rename = "#10")]
    M10,
    #[serde(rename = "#11")]
    M11,
    #[serde(rename = "#14")]
    M14,
    #[serde(rename = "#18")]
    M18,
}

impl BarMark {
    pub const ALL: [BarMark; 12] = [
        BarMark::M2,
        BarMark::M3,
        BarMark::M4,
        BarMark::M5,
        BarMark::M6,
        BarMark::M7,
        BarMark::M8,
        BarMark::M9,
        BarMark::M10,
        BarMark::M11,
        BarMark::M14,
        BarMark::M18,
    ];

    /// Integer-decoded diameter (the number after `#`).
    pub fn gauge(self) -> u8 {
        match self {
            BarMark::M2 => 2,
            BarMark::M3 => 3,
            BarMark::M4 => 4,
            BarMark::M5 => 5,
            BarMark::M6 => 6,
            BarMark::M7 => 7,
            BarMark::M8 => 8,
            BarMark::M9 => 9,
            BarMark::M10 => 10,
            BarMark::M11 => 11,
            BarMark::M14 => 14,
            BarMark::M18 => 18,
        }
    }

    /// Bar-id fragment: the gauge without the `#` prefix.
    pub fn id_fragment(self) -> String {
        self.gauge().to_string()
    }
}

impl fmt::Display for BarMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.gauge())
    }
}

impl FromStr for BarMark {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        BarMark::ALL
            .into_iter()
            .find(|mark| mark.to_string() == trimmed)
            .ok_or_else(|| format!("unknown bar mark: {raw:?}"))
    }
}

/// End-anchorage hook bend angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookType {
    #[serde(rename = "90")]
    Deg90,
    #[serde(rename = "135")]
    Deg135,
    #[serde(rename = "180")]
    Deg180,
}

impl HookType {
    pub fn degrees(self) -> u16 {
        match self {
            HookType::Deg90 => 90,
            HookType::Deg135 => 135,
            HookType::Deg180 => 180,
        }
    }

    /// Seismic hooks accepted for continuous bars in high dissipation.
    pub fn is_seismic(self) -> bool {
        matches!(self, HookType::Deg135 | HookType::Deg180)
    }
}

impl fmt::Display for HookType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// Energy dissipation class (NSR-10 seismic detailing regime).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyClass {
    #[serde(rename = "DES")]
    Des,
    #[serde(rename = "DMO")]
    Dmo,
    #[serde(rename = "DMI")]
    Dmi,
}

impl fmt::Display for EnergyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EnergyClass::Des => "DES",
            EnergyClass::Dmo => "DMO",
            EnergyClass::Dmi => "DMI",
        };
        f.write_str(label)
    }
}

/// Commercial concrete strength class. Serialized labels match the
/// commercial catalog strings used across the input forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConcreteClass {
    #[serde(rename = "21 MPa (3000 psi)")]
    Fc21,
    #[serde(rename = "24 MPa (3500 psi)")]
    Fc24,
    #[serde(rename = "28 MPa (4000 psi)")]
    Fc28,
    #[serde(rename = "32 MPa (4600 psi)")]
    Fc32,
}

impl ConcreteClass {
    pub fn label(self) -> &'static str {
        match self {
            ConcreteClass::Fc21 => "21 MPa (3000 psi)",
            ConcreteClass::Fc24 => "24 MPa (3500 psi)",
            ConcreteClass::Fc28 => "28 MPa (4000 psi)",
            ConcreteClass::Fc32 => "32 MPa (4600 psi)",
        }
    }
}

impl fmt::Display for ConcreteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reinforcement steel grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SteelGrade {
    #[serde(rename = "420 MPa (Grado 60)")]
    Grade60,
    #[serde(rename = "520 MPa (Grado 75)")]
    Grade75,
}

impl SteelGrade {
    pub fn label(self) -> &'static str {
        match self {
            SteelGrade::Grade60 => "420 MPa (Grado 60)",
            SteelGrade::Grade75 => "520 MPa (Grado 75)",
        }
    }
}

impl fmt::Display for SteelGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
