//! JSON trajectory format.
//!
//! ```json
//! {"frames": [{"symbols": ["Mg", "O"],
//!              "positions": [[0, 0, 0], [2.1, 2.1, 2.1]],
//!              "cell": [[4.2, 0, 0], [0, 4.2, 0], [0, 0, 4.2]],
//!              "energy": -10.5}]}
//! ```
//!
//! `cell` rows are lattice vectors. `energy`, `forces`, `stress`,
//! `temperature`, `velocities` (A/fs) and `masses` are optional.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{DosError, DosResult};
use crate::pbc::periodic_boundary_conditions::Cell;
use crate::trajectory::Frame;

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonTrajectory {
    pub frames: Vec<JsonFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonFrame {
    pub symbols: Vec<String>,
    pub positions: Vec<[f64; 3]>,
    pub cell: [[f64; 3]; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forces: Option<Vec<[f64; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocities: Option<Vec<[f64; 3]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masses: Option<Vec<f64>>,
}

fn to_vectors(rows: Vec<[f64; 3]>) -> Vec<Vector3<f64>> {
    rows.into_iter().map(Vector3::from).collect()
}

impl JsonFrame {
    pub fn into_frame(self) -> DosResult<Frame> {
        let cell = Cell::from_rows(self.cell)?;
        let mut frame = Frame::new(self.symbols, to_vectors(self.positions), cell);
        frame.energy = self.energy;
        frame.forces = self.forces.map(to_vectors);
        frame.stress = self.stress;
        frame.temperature = self.temperature;
        frame.velocities = self.velocities.map(to_vectors);
        frame.masses = self.masses;
        Ok(frame)
    }
}

pub fn read_frames(path: &Path) -> DosResult<Vec<Frame>> {
    let file = File::open(path).map_err(|e| DosError::read(path, e.to_string()))?;
    let parsed: JsonTrajectory = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| DosError::read(path, format!("invalid JSON trajectory: {e}")))?;
    if parsed.frames.is_empty() {
        return Err(DosError::read(path, "no frames found"));
    }
    parsed
        .frames
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            f.into_frame()
                .map_err(|e| DosError::read(path, format!("frame {i}: {e}")))
        })
        .collect()
}
