/*

=========================================================
 Phonon density of states from MD trajectories (Rust)
 Post-processing for high-entropy oxide (HEO) SQS runs
=========================================================

🎞️ Trajectory
--------------
Each `Frame` carries:
- Cartesian and fractional positions: Vec<Vector3<f64>>
- Cell:  3x3, lattice vectors as rows
- Optional energy, forces, stress, temperature, velocities, masses

The first frame is an equilibration artifact and is dropped. Every retained
frame must share the atom count and the cell.

🌍 Minimum Image Convention
---------------------------
- Fractional displacement between consecutive frames:
    d = s(t+1) - s(t)
- Folded back into the cell:
    d > 0.5  ->  d - 1
    d < -0.5 ->  d + 1
- An atom crossing the box edge moves a little, never by a whole cell.

🏃 Velocities
-------------
    v = (d . cell) / (potim * nblock)

🔁 Velocity Autocorrelation (VACF)
----------------------------------
    VAF(k) = sum_i sum_a sum_t v_ia(t) v_ia(t + k) / sum v^2
- Full linear correlation, lags -(T-1) .. (T-1), VAF(0) = 1

🎵 Phonon DOS
-------------
    DOS(f) = | FFT( VAF - <VAF> ) |^2
- First T bins (the non-negative frequencies), Gaussian smoothed
- THz, cm-1 (x 33.356) or meV (x 4.13567)

=========================================================

📌 Outputs
----------
- [x] two-row DOS table (pandas layout)
- [x] standardized DOS plot, 0-50 THz
- [x] per-frame thermodynamic summary
- [x] multi-seed overlay, 0-10 THz

*/

pub mod compare;
pub mod config;
pub mod constants;
pub mod elements;
pub mod error;
pub mod logging;
pub mod output;
pub mod pbc;
pub mod pipeline;
pub mod spectrum;
pub mod thermo;
pub mod trajectory;
pub mod units;
pub mod vacf;

pub use error::{DosError, DosResult};
pub use pbc::periodic_boundary_conditions::Cell;
pub use pipeline::{DosSettings, PhononDos, Stage};
pub use spectrum::{phonon_dos, Spectrum};
pub use trajectory::{load_trajectory, Frame, LoadOptions, Trajectory};
pub use units::FrequencyUnit;
pub use vacf::{CorrelationMethod, Vaf};
