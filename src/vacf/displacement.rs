use itertools::Itertools;
use nalgebra::Vector3;

use crate::error::{DosError, DosResult};
use crate::pbc::periodic_boundary_conditions::minimum_image_fractional;
use crate::trajectory::Trajectory;

/// Fractional displacement of every atom between consecutive frames.
/// One entry shorter than the frame list it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct DisplacementSeries {
    steps: Vec<Vec<Vector3<f64>>>,
    n_atoms: usize,
}

impl DisplacementSeries {
    pub fn steps(&self) -> &[Vec<Vector3<f64>>] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }
}

fn displacement(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    a.iter()
        .zip(b.iter())
        .map(|(from, to)| (to - from).map(minimum_image_fractional))
        .collect()
}

/// `d = frac[t+1] - frac[t]`, folded into [-0.5, 0.5] per component.
pub fn unwrap_fractional(frames: &[Vec<Vector3<f64>>]) -> DosResult<DisplacementSeries> {
    if frames.len() < 2 {
        return Err(DosError::InvalidParameter(format!(
            "displacements need at least 2 frames, got {}",
            frames.len()
        )));
    }
    let n_atoms = frames[0].len();
    if let Some((index, frame)) = frames.iter().enumerate().find(|(_, f)| f.len() != n_atoms) {
        return Err(DosError::InconsistentFrame {
            frame: index,
            reason: format!("{} atoms, expected {}", frame.len(), n_atoms),
        });
    }
    let steps = frames
        .iter()
        .tuple_windows()
        .map(|(a, b)| displacement(a, b))
        .collect();
    Ok(DisplacementSeries { steps, n_atoms })
}

/// Displacements between consecutive retained frames of a validated
/// trajectory.
pub fn unwrap_displacements(trajectory: &Trajectory) -> DisplacementSeries {
    let steps = trajectory
        .scaled_positions()
        .tuple_windows()
        .map(|(a, b)| displacement(a, b))
        .collect();
    DisplacementSeries {
        steps,
        n_atoms: trajectory.n_atoms(),
    }
}
