//! ----------------------
//! heo_md: phonon DOS of high-entropy oxide MD runs
//! ----------------------
//!
//! analyze: trajectory -> thermo summary -> (optional) phonon DOS table + plot
//! compare: several DOS tables -> one overlay plot
//!

use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

use heo_md::compare::{compare_spectra, parse_labelled_input};
use heo_md::config::DosConfig;
use heo_md::constants::{
    COMPARISON_WINDOW_THZ, DEFAULT_COMPARISON_PLOT, DEFAULT_DOS_CSV, DEFAULT_DOS_PLOT,
    TEMPERATURE_TOLERANCE,
};
use heo_md::output::{plot_dos, write_dos_csv, StagedOutputs};
use heo_md::thermo::{check_target_temperature, mean_temperature, summarize, write_summary_csv};
use heo_md::{load_trajectory, DosResult, LoadOptions, PhononDos};

mod cli;

use cli::{AnalyzeArgs, Command, CompareArgs};

fn analyze(args: AnalyzeArgs) -> DosResult<()> {
    let file_config = match &args.config {
        Some(path) => DosConfig::from_path(path)?,
        None => DosConfig::default(),
    };
    let mut config = file_config.merge(args.overrides());
    if config.progress.is_none() {
        config.progress = Some(true);
    }

    let options = LoadOptions {
        allow_variable_cell: config.allow_variable_cell.unwrap_or(false),
        ..LoadOptions::default()
    };
    let trajectory = load_trajectory(&args.trajectory, &options)?;
    info!(
        "{} frames of {} atoms retained from {}",
        trajectory.len(),
        trajectory.n_atoms(),
        trajectory.source().display()
    );

    let summaries = summarize(&trajectory);
    if let Some(mean) = mean_temperature(&summaries) {
        info!("mean temperature {mean:.2} K");
    }
    if let Some(target) = args.temp {
        check_target_temperature(target, &summaries, TEMPERATURE_TOLERANCE);
    }

    // Every computation that can fail runs before anything is written.
    let spectrum = if args.pdos {
        let settings = config.to_settings()?;
        Some(PhononDos::new(settings).run(&trajectory)?)
    } else {
        None
    };

    let mut outputs = StagedOutputs::new();
    if let Some(path) = &config.summary {
        outputs.stage(path, |tmp| write_summary_csv(tmp, &summaries))?;
    }
    if let Some(spectrum) = &spectrum {
        let csv_path = config.csv.unwrap_or_else(|| PathBuf::from(DEFAULT_DOS_CSV));
        let plot_path = config.plot.unwrap_or_else(|| PathBuf::from(DEFAULT_DOS_PLOT));
        outputs.stage(&csv_path, |tmp| write_dos_csv(tmp, spectrum))?;
        outputs.stage(&plot_path, |tmp| plot_dos(tmp, spectrum))?;
    }
    for path in outputs.commit()? {
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn compare(args: CompareArgs) -> DosResult<()> {
    let inputs = args
        .inputs
        .iter()
        .map(|arg| parse_labelled_input(arg))
        .collect::<DosResult<Vec<_>>>()?;
    let window = (
        args.min.unwrap_or(args.units.scale_thz(COMPARISON_WINDOW_THZ.0)),
        args.max.unwrap_or(args.units.scale_thz(COMPARISON_WINDOW_THZ.1)),
    );
    let plot_path = args
        .plot
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COMPARISON_PLOT));
    let spectra = compare_spectra(&inputs, window, args.units, &plot_path)?;
    info!("{} of {} tables plotted", spectra.len(), inputs.len());
    Ok(())
}

fn main() -> ExitCode {
    let cli = cli::parse();
    let quiet = match &cli.command {
        Command::Analyze(args) => args.quiet,
        Command::Compare(args) => args.quiet,
    };
    heo_md::logging::init(cli.verbose, quiet);

    let result = match cli.command {
        Command::Analyze(args) => analyze(args),
        Command::Compare(args) => compare(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
