/*
Trajectory loading.

A trajectory is the chronological list of MD snapshots written by the
driver. The first snapshot is an equilibration artifact and is dropped before
any analysis. Everything that survives is validated up front: every frame
must carry the same number of atoms and the same cell, because the velocity
estimate applies one cell matrix to every displacement.
 */

pub mod extxyz;
pub mod json;

use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use nalgebra::Vector3;

use crate::constants::{AMU_A2_PER_FS2_TO_EV, BOLTZMANN_EV_K, CELL_TOLERANCE};
use crate::elements::masses_for;
use crate::error::{DosError, DosResult};
use crate::pbc::periodic_boundary_conditions::Cell;

/// One MD snapshot. Immutable once loaded.
#[derive(Clone, Debug)]
pub struct Frame {
    pub symbols: Vec<String>,
    pub positions: Vec<Vector3<f64>>,
    /// Fractional positions, each component wrapped into [0, 1).
    pub scaled_positions: Vec<Vector3<f64>>,
    pub cell: Cell,
    pub energy: Option<f64>,
    pub forces: Option<Vec<Vector3<f64>>>,
    /// Voigt (6) or full (9) stress components, as written.
    pub stress: Option<Vec<f64>>,
    /// Temperature recorded alongside the frame, if any.
    pub temperature: Option<f64>,
    /// Velocities in A/fs.
    pub velocities: Option<Vec<Vector3<f64>>>,
    pub masses: Option<Vec<f64>>,
}

impl Frame {
    pub fn new(symbols: Vec<String>, positions: Vec<Vector3<f64>>, cell: Cell) -> Self {
        let scaled_positions = positions.iter().map(|r| cell.scaled_position(r)).collect();
        Frame {
            symbols,
            positions,
            scaled_positions,
            cell,
            energy: None,
            forces: None,
            stress: None,
            temperature: None,
            velocities: None,
            masses: None,
        }
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = Some(energy);
        self
    }

    pub fn with_forces(mut self, forces: Vec<Vector3<f64>>) -> Self {
        self.forces = Some(forces);
        self
    }

    pub fn with_stress(mut self, stress: Vec<f64>) -> Self {
        self.stress = Some(stress);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_velocities(mut self, velocities: Vec<Vector3<f64>>) -> Self {
        self.velocities = Some(velocities);
        self
    }

    pub fn with_masses(mut self, masses: Vec<f64>) -> Self {
        self.masses = Some(masses);
        self
    }

    pub fn n_atoms(&self) -> usize {
        self.positions.len()
    }

    /// Explicit masses if the file had them, else the element table.
    pub fn resolved_masses(&self) -> Option<Vec<f64>> {
        match &self.masses {
            Some(m) => Some(m.clone()),
            None => masses_for(&self.symbols),
        }
    }

    /// Kinetic energy in eV, when both velocities and masses are known.
    pub fn kinetic_energy(&self) -> Option<f64> {
        let velocities = self.velocities.as_ref()?;
        let masses = self.resolved_masses()?;
        if masses.len() != velocities.len() {
            return None;
        }
        let ke = velocities
            .iter()
            .zip(masses.iter())
            .map(|(v, m)| 0.5 * m * v.norm_squared())
            .sum::<f64>();
        Some(ke * AMU_A2_PER_FS2_TO_EV)
    }

    /// Recorded temperature, falling back to the equipartition estimate
    /// T = 2 KE / (3 N k_B).
    pub fn temperature(&self) -> Option<f64> {
        if let Some(t) = self.temperature {
            return Some(t);
        }
        let n = self.n_atoms();
        if n == 0 {
            return None;
        }
        let ke = self.kinetic_energy()?;
        Some(2.0 * ke / (3.0 * n as f64 * BOLTZMANN_EV_K))
    }

    fn check_shapes(&self, index: usize) -> DosResult<()> {
        let n = self.n_atoms();
        let mismatch = |what: &str, len: usize| DosError::InconsistentFrame {
            frame: index,
            reason: format!("{what} has {len} rows but the frame has {n} atoms"),
        };
        if self.symbols.len() != n {
            return Err(mismatch("symbols", self.symbols.len()));
        }
        if let Some(f) = &self.forces {
            if f.len() != n {
                return Err(mismatch("forces", f.len()));
            }
        }
        if let Some(v) = &self.velocities {
            if v.len() != n {
                return Err(mismatch("velocities", v.len()));
            }
        }
        if let Some(m) = &self.masses {
            if m.len() != n {
                return Err(mismatch("masses", m.len()));
            }
        }
        if let Some(s) = &self.stress {
            if s.len() != 6 && s.len() != 9 {
                return Err(DosError::InconsistentFrame {
                    frame: index,
                    reason: format!("stress has {} components, expected 6 or 9", s.len()),
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Leading frames dropped as equilibration.
    pub skip_frames: usize,
    /// Accept a cell that changes between frames. The first retained cell is
    /// still the only one used for velocities, so results from a
    /// variable-cell run are approximate.
    pub allow_variable_cell: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            skip_frames: 1,
            allow_variable_cell: false,
        }
    }
}

/// The retained frames of one MD run.
#[derive(Clone, Debug)]
pub struct Trajectory {
    frames: Vec<Frame>,
    n_atoms: usize,
    cell: Cell,
    source: PathBuf,
}

impl Trajectory {
    /// Drop the leading equilibration frames and validate the rest.
    ///
    /// Frame indices in errors count from the start of the source, skipped
    /// frames included.
    pub fn from_frames(
        source: impl AsRef<Path>,
        frames: Vec<Frame>,
        options: &LoadOptions,
    ) -> DosResult<Self> {
        let source = source.as_ref().to_path_buf();
        let total = frames.len();
        let skip = options.skip_frames;
        let frames: Vec<Frame> = frames.into_iter().skip(skip).collect();
        if frames.len() < 2 {
            return Err(DosError::read(
                &source,
                format!(
                    "{total} frame(s) found; need at least 2 after skipping the first {skip}"
                ),
            ));
        }

        let first = &frames[0];
        let n_atoms = first.n_atoms();
        if n_atoms == 0 {
            return Err(DosError::read(&source, "first retained frame has no atoms"));
        }
        let cell = first.cell.clone();

        let mut cell_warned = false;
        for (i, frame) in frames.iter().enumerate() {
            let index = i + skip;
            if frame.n_atoms() != n_atoms {
                return Err(DosError::InconsistentFrame {
                    frame: index,
                    reason: format!(
                        "atom count {} differs from {} in the first retained frame",
                        frame.n_atoms(),
                        n_atoms
                    ),
                });
            }
            frame.check_shapes(index)?;
            if !frame.cell.approx_eq(&cell, CELL_TOLERANCE) {
                let deviation = frame.cell.max_deviation(&cell);
                if !options.allow_variable_cell {
                    return Err(DosError::InconsistentFrame {
                        frame: index,
                        reason: format!(
                            "cell differs from the first retained frame by {deviation:.3e} A; \
                             variable-cell trajectories are not supported"
                        ),
                    });
                }
                if !cell_warned {
                    warn!(
                        "cell changes at frame {index} (max deviation {deviation:.3e} A); \
                         velocities will use the first retained cell only"
                    );
                    cell_warned = true;
                }
            }
        }

        debug!(
            "validated {} frames of {} atoms from {}",
            frames.len(),
            n_atoms,
            source.display()
        );
        Ok(Trajectory {
            frames,
            n_atoms,
            cell,
            source,
        })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn n_atoms(&self) -> usize {
        self.n_atoms
    }

    /// Cell of the first retained frame.
    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn scaled_positions(&self) -> impl Iterator<Item = &[Vector3<f64>]> {
        self.frames.iter().map(|f| f.scaled_positions.as_slice())
    }
}

/// Read every frame of a trajectory file, picking the reader from the
/// extension, then validate it.
pub fn load_trajectory(path: impl AsRef<Path>, options: &LoadOptions) -> DosResult<Trajectory> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let frames = match extension.as_deref() {
        Some("xyz") | Some("extxyz") => extxyz::read_frames(path)?,
        Some("json") => json::read_frames(path)?,
        other => {
            return Err(DosError::read(
                path,
                format!(
                    "unsupported trajectory format {:?} (expected .xyz, .extxyz or .json)",
                    other.unwrap_or("")
                ),
            ))
        }
    };
    info!("read {} frames from {}", frames.len(), path.display());
    Trajectory::from_frames(path, frames, options)
}
