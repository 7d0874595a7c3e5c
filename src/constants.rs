// -- time and frequency conversions
pub const FS_TO_S: f64 = 1e-15; // one femtosecond in seconds
pub const HZ_TO_THZ: f64 = 1e-12;

// -- frequency unit factors, relative to THz
pub const THZ_TO_CM1: f64 = 33.356;
pub const THZ_TO_MEV: f64 = 4.13567;

// -- kinetic temperature
pub const BOLTZMANN_EV_K: f64 = 8.617333262e-5; // eV / K
pub const AMU_A2_PER_FS2_TO_EV: f64 = 103.642_696_6; // 1 amu * (A/fs)^2 in eV
pub const ASE_TIME_FS: f64 = 10.180_505_671_156_723; // one ASE time unit in fs

// -- analysis defaults
pub const DEFAULT_POTIM_FS: f64 = 1.0;
pub const DEFAULT_NBLOCK: usize = 1;
pub const DEFAULT_SMOOTHING_SIGMA: f64 = 2.0;
pub const MAX_SMOOTHING_SIGMA: f64 = 1.0e5; // frequency bins
pub const CELL_TOLERANCE: f64 = 1e-6; // Angstrom
pub const TEMPERATURE_TOLERANCE: f64 = 0.1; // relative, --temp vs trajectory mean

// -- plot windows, in THz
pub const SINGLE_RUN_WINDOW_THZ: (f64, f64) = (0.0, 50.0);
pub const COMPARISON_WINDOW_THZ: (f64, f64) = (0.0, 10.0);

// -- default artifact names
pub const DEFAULT_DOS_CSV: &str = "ph_dos.csv";
pub const DEFAULT_DOS_PLOT: &str = "phonon_dos.svg";
pub const DEFAULT_COMPARISON_PLOT: &str = "compare_pdos_output.svg";
