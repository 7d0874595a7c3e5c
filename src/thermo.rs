/*
Per-frame thermodynamic summary.

For every retained frame we keep the instantaneous temperature and the force,
energy and stress magnitudes normalised per atom. This is the table the MD
driver is checked against before the spectrum is trusted: a drifting
temperature or an exploding force norm shows up here first.
 */

use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::error::{DosError, DosResult};
use crate::trajectory::{Frame, Trajectory};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameSummary {
    pub frame: usize,
    pub n_atoms: usize,
    pub temperature: Option<f64>,
    pub force_per_atom: Option<f64>,
    pub energy_per_atom: Option<f64>,
    pub stress_per_atom: Option<f64>,
}

impl FrameSummary {
    pub fn from_frame(index: usize, frame: &Frame) -> Self {
        let n = frame.n_atoms() as f64;
        let force_per_atom = frame.forces.as_ref().map(|forces| {
            // Frobenius norm of the N x 3 force array
            forces.iter().map(|f| f.norm_squared()).sum::<f64>().sqrt() / n
        });
        let stress_per_atom = frame
            .stress
            .as_ref()
            .map(|s| s.iter().map(|x| x * x).sum::<f64>().sqrt() / n);
        FrameSummary {
            frame: index,
            n_atoms: frame.n_atoms(),
            temperature: frame.temperature(),
            force_per_atom,
            energy_per_atom: frame.energy.map(|e| e / n),
            stress_per_atom,
        }
    }
}

/// One summary per retained frame, numbered from 0.
pub fn summarize(trajectory: &Trajectory) -> Vec<FrameSummary> {
    trajectory
        .frames()
        .iter()
        .enumerate()
        .map(|(i, f)| FrameSummary::from_frame(i, f))
        .collect()
}

/// Mean over the frames that have a temperature, if any do.
pub fn mean_temperature(summaries: &[FrameSummary]) -> Option<f64> {
    let temps: Vec<f64> = summaries.iter().filter_map(|s| s.temperature).collect();
    if temps.is_empty() {
        return None;
    }
    Some(temps.iter().sum::<f64>() / temps.len() as f64)
}

/// Relative deviation of the run's mean temperature from the one it was
/// meant to be at.
pub fn temperature_deviation(target: f64, mean: f64) -> f64 {
    ((mean - target) / target).abs()
}

/// Compare the informational target temperature with the trajectory mean.
/// Returns whether they agree within `tolerance` (relative). A mismatch is
/// only logged.
pub fn check_target_temperature(target: f64, summaries: &[FrameSummary], tolerance: f64) -> bool {
    match mean_temperature(summaries) {
        Some(mean) if target > 0.0 => {
            let deviation = temperature_deviation(target, mean);
            if deviation > tolerance {
                warn!(
                    "mean trajectory temperature {mean:.1} K is {:.0}% away from the requested {target:.1} K",
                    100.0 * deviation
                );
                false
            } else {
                info!("mean trajectory temperature {mean:.1} K (requested {target:.1} K)");
                true
            }
        }
        Some(mean) => {
            warn!("requested temperature {target} K is not positive; trajectory mean is {mean:.1} K");
            false
        }
        None => {
            info!("no temperatures in the trajectory to compare with {target:.1} K");
            true
        }
    }
}

pub fn write_summary_csv(path: impl AsRef<Path>, summaries: &[FrameSummary]) -> DosResult<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path).map_err(|e| DosError::csv(path, e))?;
    for summary in summaries {
        writer
            .serialize(summary)
            .map_err(|e| DosError::csv(path, e))?;
    }
    writer.flush().map_err(|e| DosError::io(path, e))?;
    Ok(())
}
