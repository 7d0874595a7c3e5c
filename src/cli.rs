use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use heo_md::config::DosConfig;
use heo_md::units::FrequencyUnit;
use heo_md::vacf::CorrelationMethod;

#[derive(Parser, Debug)]
#[command(
    name = "heo_md",
    about = "Phonon density of states from MD trajectories via the velocity autocorrelation",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG wins if set
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a trajectory, summarise it and optionally compute its phonon DOS
    #[command(visible_alias = "a")]
    Analyze(AnalyzeArgs),

    /// Overlay DOS tables from several runs
    #[command(visible_alias = "c")]
    Compare(CompareArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// O(T^2) reference
    Direct,
    /// Zero-padded FFT
    Fft,
}

impl From<MethodArg> for CorrelationMethod {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Direct => CorrelationMethod::Direct,
            MethodArg::Fft => CorrelationMethod::Fft,
        }
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Trajectory file (.xyz/.extxyz or .json)
    #[arg(short = 'f', long = "trajectory", value_name = "FILE")]
    pub trajectory: PathBuf,

    /// Temperature the run was meant to be at, K (informational)
    #[arg(short = 't', long = "temp", value_name = "K")]
    pub temp: Option<f64>,

    /// Compute the phonon DOS
    #[arg(long)]
    pub pdos: bool,

    /// Frequency unit of the DOS: THz, cm-1 or meV (required with --pdos)
    #[arg(short = 'u', long = "units", value_name = "UNIT")]
    pub units: Option<FrequencyUnit>,

    /// Time between written frames, fs
    #[arg(long, value_name = "FS")]
    pub potim: Option<f64>,

    /// Frames per analysis block
    #[arg(long, value_name = "N")]
    pub nblock: Option<usize>,

    /// Gaussian smoothing width, in frequency bins
    #[arg(long, value_name = "BINS")]
    pub sigma: Option<f64>,

    /// Autocorrelation algorithm
    #[arg(long, value_enum, value_name = "METHOD")]
    pub method: Option<MethodArg>,

    /// DOS table output
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// DOS plot output (SVG)
    #[arg(long, value_name = "FILE")]
    pub plot: Option<PathBuf>,

    /// Per-frame thermodynamic summary output (CSV)
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// JSON file with analysis settings; flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Accept a cell that varies between frames (first cell is used)
    #[arg(long)]
    pub allow_variable_cell: bool,

    /// Errors only, no progress bar
    #[arg(short, long)]
    pub quiet: bool,
}

impl AnalyzeArgs {
    /// The flags that were given, as a config layer.
    pub fn overrides(&self) -> DosConfig {
        DosConfig {
            units: self.units,
            potim: self.potim,
            nblock: self.nblock,
            sigma: self.sigma,
            method: self.method.map(CorrelationMethod::from),
            progress: if self.quiet { Some(false) } else { None },
            allow_variable_cell: self.allow_variable_cell.then_some(true),
            csv: self.csv.clone(),
            plot: self.plot.clone(),
            summary: self.summary.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// DOS table to overlay, as LABEL=PATH (or just PATH); repeatable
    #[arg(short, long = "input", value_name = "LABEL=PATH", action = ArgAction::Append, required = true)]
    pub inputs: Vec<String>,

    /// Lower end of the frequency window (default 0 THz)
    #[arg(long, value_name = "F", allow_hyphen_values = true)]
    pub min: Option<f64>,

    /// Upper end of the frequency window (default 10 THz)
    #[arg(long, value_name = "F")]
    pub max: Option<f64>,

    /// Frequency unit the tables were written in
    #[arg(short = 'u', long = "units", value_name = "UNIT", default_value = "THz")]
    pub units: FrequencyUnit,

    /// Overlay plot output (SVG)
    #[arg(long, value_name = "FILE")]
    pub plot: Option<PathBuf>,

    /// Errors only
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
