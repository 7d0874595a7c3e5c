/*
Overlay of DOS tables from several runs of the same composition (typically
one per SQS seed). Every table is cut to a common frequency window and drawn
in its own colour. A table that cannot be read is reported and left out; the
comparison only fails when nothing could be read at all.
 */

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{DosError, DosResult};
use crate::output::{plot_comparison, read_dos_csv};
use crate::units::FrequencyUnit;

/// One labelled curve, already restricted to the comparison window.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparedSpectrum {
    pub label: String,
    pub source: PathBuf,
    pub points: Vec<(f64, f64)>,
}

/// Parse a `LABEL=PATH` argument. A bare path is labelled with its file stem.
pub fn parse_labelled_input(arg: &str) -> DosResult<(String, PathBuf)> {
    match arg.split_once('=') {
        Some((label, path)) if !label.is_empty() && !path.is_empty() => {
            Ok((label.to_string(), PathBuf::from(path)))
        }
        Some(_) => Err(DosError::InvalidParameter(format!(
            "expected LABEL=PATH, got `{arg}`"
        ))),
        None => {
            let path = PathBuf::from(arg);
            let label = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or(arg)
                .to_string();
            Ok((label, path))
        }
    }
}

pub fn load_spectra(
    inputs: &[(String, PathBuf)],
    window: (f64, f64),
    unit: FrequencyUnit,
) -> DosResult<Vec<ComparedSpectrum>> {
    let (lo, hi) = window;
    if !(lo.is_finite() && hi.is_finite() && lo < hi) {
        return Err(DosError::InvalidParameter(format!(
            "comparison window [{lo}, {hi}] is empty"
        )));
    }
    let mut loaded = Vec::with_capacity(inputs.len());
    for (label, path) in inputs {
        match read_dos_csv(path, unit) {
            Ok(spectrum) => {
                info!("loaded {label} from {} ({lo}-{hi} {unit})", path.display());
                loaded.push(ComparedSpectrum {
                    label: label.clone(),
                    source: path.clone(),
                    points: spectrum.window(lo, hi),
                });
            }
            Err(e) => warn!("skipping {label}: {e}"),
        }
    }
    if loaded.is_empty() {
        return Err(DosError::InvalidParameter(format!(
            "none of the {} DOS tables could be read",
            inputs.len()
        )));
    }
    Ok(loaded)
}

/// Read, window and overlay the given tables into one plot.
pub fn compare_spectra(
    inputs: &[(String, PathBuf)],
    window: (f64, f64),
    unit: FrequencyUnit,
    plot_path: impl AsRef<Path>,
) -> DosResult<Vec<ComparedSpectrum>> {
    let spectra = load_spectra(inputs, window, unit)?;
    let curves: Vec<(String, Vec<(f64, f64)>)> = spectra
        .iter()
        .map(|s| (s.label.clone(), s.points.clone()))
        .collect();
    plot_comparison(plot_path, &curves, window, unit)?;
    Ok(spectra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_inputs() {
        let (label, path) = parse_labelled_input("seed_42=runs/ph_dos_42.csv").unwrap();
        assert_eq!(label, "seed_42");
        assert_eq!(path, PathBuf::from("runs/ph_dos_42.csv"));

        let (label, _) = parse_labelled_input("runs/ph_dos_43.csv").unwrap();
        assert_eq!(label, "ph_dos_43");

        assert!(parse_labelled_input("=x.csv").is_err());
        assert!(parse_labelled_input("seed=").is_err());
    }

    #[test]
    fn nothing_readable_is_an_error() {
        let inputs = vec![("a".to_string(), PathBuf::from("/nonexistent/ph_dos_a.csv"))];
        let err = load_spectra(&inputs, (0.0, 10.0), FrequencyUnit::THz).expect_err("missing");
        assert!(matches!(err, DosError::InvalidParameter(_)));
    }

    #[test]
    fn empty_window_is_rejected() {
        assert!(load_spectra(&[], (10.0, 0.0), FrequencyUnit::THz).is_err());
    }
}
