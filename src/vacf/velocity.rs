use nalgebra::Vector3;

use crate::error::{DosError, DosResult};
use crate::pbc::periodic_boundary_conditions::Cell;
use crate::vacf::displacement::DisplacementSeries;

/// Cartesian velocity of every atom at every sample, in cell length units per
/// unit of the time step passed to `estimate_velocities`.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocitySeries {
    samples: Vec<Vec<Vector3<f64>>>,
    n_atoms: usize,
}

impl VelocitySeries {
    /// Build from literal samples; every sample must hold `n_atoms` vectors.
    pub fn from_samples(samples: Vec<Vec<Vector3<f64>>>) -> DosResult<Self> {
        let n_atoms = samples.first().map_or(0, |s| s.len());
        if let Some((index, sample)) = samples
            .iter()
            .enumerate()
            .find(|(_, s)| s.len() != n_atoms)
        {
            return Err(DosError::InconsistentFrame {
                frame: index,
                reason: format!("{} velocities, expected {}", sample.len(), n_atoms),
            });
        }
        Ok(VelocitySeries { samples, n_atoms })
    }

    pub fn samples(&self) -> &[Vec<Vector3<f64>>] {
        &self.samples
    }

    /// Number of time samples, T.
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    /// Time series of one cartesian component of one atom.
    pub fn component(&self, atom: usize, axis: usize) -> Vec<f64> {
        self.samples.iter().map(|s| s[atom][axis]).collect()
    }

    /// Sum of v^2 over all atoms, axes and samples.
    pub fn sum_of_squares(&self) -> f64 {
        self.samples
            .iter()
            .flat_map(|s| s.iter())
            .map(|v| v.norm_squared())
            .sum()
    }
}

/// `v = (d . cell) / potim` for every displacement.
///
/// The cell is applied to every step, so it has to be the one shared by all
/// frames. `potim` is the time between two analysed frames.
pub fn estimate_velocities(
    displacements: &DisplacementSeries,
    cell: &Cell,
    potim: f64,
) -> DosResult<VelocitySeries> {
    if !(potim.is_finite() && potim > 0.0) {
        return Err(DosError::InvalidParameter(format!(
            "time step must be positive, got {potim}"
        )));
    }
    let samples = displacements
        .steps()
        .iter()
        .map(|step| {
            step.iter()
                .map(|d| cell.to_cartesian(d) / potim)
                .collect()
        })
        .collect();
    Ok(VelocitySeries {
        samples,
        n_atoms: displacements.n_atoms(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vacf::displacement::unwrap_fractional;

    #[test]
    fn scales_by_cell_and_time_step() {
        let frames = vec![
            vec![Vector3::new(0.10, 0.20, 0.30)],
            vec![Vector3::new(0.11, 0.20, 0.28)],
        ];
        let d = unwrap_fractional(&frames).unwrap();
        let cell = Cell::cubic(10.0).unwrap();
        let v = estimate_velocities(&d, &cell, 2.0).unwrap();
        assert_eq!(v.n_samples(), 1);
        let expected = Vector3::new(0.05, 0.0, -0.1);
        assert!((v.samples()[0][0] - expected).norm() < 1e-12);
        assert!((v.sum_of_squares() - expected.norm_squared()).abs() < 1e-12);
    }

    #[test]
    fn triclinic_cell_mixes_axes() {
        let frames = vec![vec![Vector3::zeros()], vec![Vector3::new(0.0, 0.1, 0.0)]];
        let d = unwrap_fractional(&frames).unwrap();
        let cell =
            Cell::from_rows([[4.0, 0.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 4.0]]).unwrap();
        let v = estimate_velocities(&d, &cell, 1.0).unwrap();
        assert!((v.samples()[0][0] - Vector3::new(0.2, 0.4, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn rejects_bad_time_step() {
        let frames = vec![vec![Vector3::zeros()]; 2];
        let d = unwrap_fractional(&frames).unwrap();
        let cell = Cell::cubic(1.0).unwrap();
        assert!(estimate_velocities(&d, &cell, 0.0).is_err());
        assert!(estimate_velocities(&d, &cell, -1.0).is_err());
        assert!(estimate_velocities(&d, &cell, f64::NAN).is_err());
    }

    #[test]
    fn component_series() {
        let v = VelocitySeries::from_samples(vec![
            vec![Vector3::new(1.0, 2.0, 3.0), Vector3::new(4.0, 5.0, 6.0)],
            vec![Vector3::new(7.0, 8.0, 9.0), Vector3::new(10.0, 11.0, 12.0)],
        ])
        .unwrap();
        assert_eq!(v.component(1, 2), vec![6.0, 12.0]);
        assert!(VelocitySeries::from_samples(vec![vec![Vector3::zeros()], vec![]]).is_err());
    }
}
