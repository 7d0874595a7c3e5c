use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{THZ_TO_CM1, THZ_TO_MEV};
use crate::error::DosError;

/// Frequency axis unit of a phonon spectrum. THz is the unscaled base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FrequencyUnit {
    THz,
    Cm1,
    MeV,
}

impl FrequencyUnit {
    /// Multiplier taking a value in THz to this unit.
    pub fn factor(self) -> f64 {
        match self {
            FrequencyUnit::THz => 1.0,
            FrequencyUnit::Cm1 => THZ_TO_CM1,
            FrequencyUnit::MeV => THZ_TO_MEV,
        }
    }

    pub fn scale_thz(self, value: f64) -> f64 {
        value * self.factor()
    }

    pub fn label(self) -> &'static str {
        match self {
            FrequencyUnit::THz => "Frequency (THz)",
            FrequencyUnit::Cm1 => "Wavenumber (cm-1)",
            FrequencyUnit::MeV => "Energy (meV)",
        }
    }
}

impl FromStr for FrequencyUnit {
    type Err = DosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thz" => Ok(FrequencyUnit::THz),
            "cm-1" => Ok(FrequencyUnit::Cm1),
            "mev" => Ok(FrequencyUnit::MeV),
            _ => Err(DosError::UnsupportedUnit(s.to_string())),
        }
    }
}

impl TryFrom<String> for FrequencyUnit {
    type Error = DosError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FrequencyUnit> for String {
    fn from(unit: FrequencyUnit) -> Self {
        unit.to_string()
    }
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrequencyUnit::THz => "THz",
            FrequencyUnit::Cm1 => "cm-1",
            FrequencyUnit::MeV => "meV",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("THz".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::THz);
        assert_eq!("thz".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::THz);
        assert_eq!("CM-1".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::Cm1);
        assert_eq!("mev".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::MeV);
        assert_eq!("MeV".parse::<FrequencyUnit>().unwrap(), FrequencyUnit::MeV);
    }

    #[test]
    fn rejects_unknown_units() {
        let err = "Hz".parse::<FrequencyUnit>().expect_err("Hz is not supported");
        assert!(matches!(err, DosError::UnsupportedUnit(ref u) if u == "Hz"));
        assert!("".parse::<FrequencyUnit>().is_err());
    }

    #[test]
    fn display_round_trips_through_parse() {
        for unit in [FrequencyUnit::THz, FrequencyUnit::Cm1, FrequencyUnit::MeV] {
            assert_eq!(unit.to_string().parse::<FrequencyUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn factors() {
        assert_eq!(FrequencyUnit::THz.scale_thz(2.0), 2.0);
        assert!((FrequencyUnit::Cm1.scale_thz(1.0) - 33.356).abs() < 1e-12);
        assert!((FrequencyUnit::MeV.scale_thz(1.0) - 4.13567).abs() < 1e-12);
    }
}
