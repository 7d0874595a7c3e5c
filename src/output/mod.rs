//! Persisted artifacts of an analysis: the two-row DOS table and SVG plots.
//! A run stages them with [`StagedOutputs`] and publishes them together.

pub mod plot;
pub mod staging;
pub mod table;

pub use plot::{plot_comparison, plot_dos, COLOUR_CYCLE};
pub use staging::{partial_path, StagedOutputs};
pub use table::{read_dos_csv, write_dos_csv};
