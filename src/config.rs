use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DosError, DosResult};
use crate::pipeline::DosSettings;
use crate::units::FrequencyUnit;
use crate::vacf::CorrelationMethod;

/// Analysis settings as read from a JSON file. Every field may be left out;
/// command-line flags are layered on top with [`DosConfig::merge`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DosConfig {
    #[serde(default)]
    pub units: Option<FrequencyUnit>,
    #[serde(default)]
    pub potim: Option<f64>,
    #[serde(default)]
    pub nblock: Option<usize>,
    #[serde(default)]
    pub sigma: Option<f64>,
    #[serde(default)]
    pub method: Option<CorrelationMethod>,
    #[serde(default)]
    pub progress: Option<bool>,
    #[serde(default)]
    pub allow_variable_cell: Option<bool>,
    #[serde(default)]
    pub csv: Option<PathBuf>,
    #[serde(default)]
    pub plot: Option<PathBuf>,
    #[serde(default)]
    pub summary: Option<PathBuf>,
}

impl DosConfig {
    /// An unknown `units` string is an `UnsupportedUnit` error, like the
    /// same value given on the command line.
    pub fn from_json_str(text: &str) -> DosResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| DosError::Config(e.to_string()))?;
        if let Some(unit) = value.get("units").and_then(serde_json::Value::as_str) {
            unit.parse::<FrequencyUnit>()?;
        }
        serde_json::from_value(value).map_err(|e| DosError::Config(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> DosResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| DosError::io(path, e))?;
        Self::from_json_str(&text).map_err(|e| match e {
            DosError::Config(reason) => DosError::Config(format!("{}: {reason}", path.display())),
            other => other,
        })
    }

    /// Fields set in `overrides` replace those in `self`.
    pub fn merge(self, overrides: DosConfig) -> DosConfig {
        DosConfig {
            units: overrides.units.or(self.units),
            potim: overrides.potim.or(self.potim),
            nblock: overrides.nblock.or(self.nblock),
            sigma: overrides.sigma.or(self.sigma),
            method: overrides.method.or(self.method),
            progress: overrides.progress.or(self.progress),
            allow_variable_cell: overrides.allow_variable_cell.or(self.allow_variable_cell),
            csv: overrides.csv.or(self.csv),
            plot: overrides.plot.or(self.plot),
            summary: overrides.summary.or(self.summary),
        }
    }

    /// Pipeline settings. The unit has no default and must have been given.
    pub fn to_settings(&self) -> DosResult<DosSettings> {
        let unit = self.units.ok_or_else(|| {
            DosError::Config("a frequency unit (THz, cm-1 or meV) is required for the DOS".into())
        })?;
        let mut settings = DosSettings::new(unit);
        if let Some(potim) = self.potim {
            settings = settings.with_potim(potim);
        }
        if let Some(nblock) = self.nblock {
            settings = settings.with_nblock(nblock);
        }
        if let Some(sigma) = self.sigma {
            settings = settings.with_sigma(sigma);
        }
        if let Some(method) = self.method {
            settings = settings.with_method(method);
        }
        settings = settings
            .with_progress(self.progress.unwrap_or(false))
            .with_variable_cell(self.allow_variable_cell.unwrap_or(false));
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let cfg = DosConfig::from_json_str(r#"{"units": "cm-1", "potim": 2.0, "method": "direct"}"#)
            .unwrap();
        assert_eq!(cfg.units, Some(FrequencyUnit::Cm1));
        assert_eq!(cfg.method, Some(CorrelationMethod::Direct));
        let s = cfg.to_settings().unwrap();
        assert_eq!(s.potim_fs, 2.0);
        assert_eq!(s.sigma, 2.0);
        assert_eq!(s.unit, FrequencyUnit::Cm1);
    }

    #[test]
    fn bad_unit_is_unsupported_and_unknown_keys_are_config_errors() {
        let err = DosConfig::from_json_str(r#"{"units": "Hz"}"#).expect_err("Hz");
        assert!(matches!(err, DosError::UnsupportedUnit(ref u) if u == "Hz"));
        assert!(err.to_string().contains("expected one of THz, cm-1, meV"));
        assert!(matches!(
            DosConfig::from_json_str(r#"{"potim_fs": 1.0}"#),
            Err(DosError::Config(_))
        ));
        assert!(matches!(
            DosConfig::from_json_str(r#"{"units": 3}"#),
            Err(DosError::Config(_))
        ));
    }

    #[test]
    fn unsupported_unit_in_a_file_keeps_its_variant() {
        let path = std::env::temp_dir().join(format!("heo_md_cfg_hz_{}.json", std::process::id()));
        fs::write(&path, r#"{"units": "Hz", "sigma": 1.0}"#).unwrap();
        let err = DosConfig::from_path(&path).expect_err("Hz");
        assert!(matches!(err, DosError::UnsupportedUnit(_)));
        fs::write(&path, "{not json").unwrap();
        let err = DosConfig::from_path(&path).expect_err("syntax");
        assert!(matches!(err, DosError::Config(ref m) if m.contains("heo_md_cfg_hz")));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn overrides_win() {
        let file = DosConfig {
            units: Some(FrequencyUnit::THz),
            sigma: Some(3.0),
            nblock: Some(4),
            ..DosConfig::default()
        };
        let cli = DosConfig {
            units: Some(FrequencyUnit::MeV),
            nblock: None,
            ..DosConfig::default()
        };
        let merged = file.merge(cli);
        assert_eq!(merged.units, Some(FrequencyUnit::MeV));
        assert_eq!(merged.sigma, Some(3.0));
        assert_eq!(merged.nblock, Some(4));
    }

    #[test]
    fn unit_is_never_defaulted() {
        let err = DosConfig::default().to_settings().expect_err("no unit");
        assert!(matches!(err, DosError::Config(_)));
        let bad = DosConfig {
            units: Some(FrequencyUnit::THz),
            nblock: Some(0),
            ..DosConfig::default()
        };
        assert!(matches!(bad.to_settings(), Err(DosError::InvalidParameter(_))));
    }
}
