/*
The whole analysis as one linear pass:

  Loading -> Unwrapping -> VelocityEstimation -> Correlation
          -> SpectralTransform -> Done

There are no branches and no retries. The first stage to fail aborts the run
and its error is returned unchanged.
 */

use std::fmt;
use std::path::Path;

use log::{debug, info};

use crate::constants::{
    DEFAULT_NBLOCK, DEFAULT_POTIM_FS, DEFAULT_SMOOTHING_SIGMA, MAX_SMOOTHING_SIGMA,
};
use crate::error::{DosError, DosResult};
use crate::spectrum::{phonon_dos, Spectrum};
use crate::trajectory::{load_trajectory, LoadOptions, Trajectory};
use crate::units::FrequencyUnit;
use crate::vacf::{
    estimate_velocities, unwrap_displacements, velocity_autocorrelation, CorrelationMethod, Vaf,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Unwrapping,
    VelocityEstimation,
    Correlation,
    SpectralTransform,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Loading => "loading",
            Stage::Unwrapping => "unwrapping",
            Stage::VelocityEstimation => "velocity estimation",
            Stage::Correlation => "correlation",
            Stage::SpectralTransform => "spectral transform",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DosSettings {
    /// MD time step between written frames, fs.
    pub potim_fs: f64,
    /// Analysis block size; the time between two samples is `potim_fs * nblock`.
    pub nblock: usize,
    pub unit: FrequencyUnit,
    /// Gaussian smoothing width in frequency bins.
    pub sigma: f64,
    pub method: CorrelationMethod,
    pub progress: bool,
    pub allow_variable_cell: bool,
}

impl DosSettings {
    pub fn new(unit: FrequencyUnit) -> Self {
        DosSettings {
            potim_fs: DEFAULT_POTIM_FS,
            nblock: DEFAULT_NBLOCK,
            unit,
            sigma: DEFAULT_SMOOTHING_SIGMA,
            method: CorrelationMethod::default(),
            progress: false,
            allow_variable_cell: false,
        }
    }

    pub fn with_potim(mut self, potim_fs: f64) -> Self {
        self.potim_fs = potim_fs;
        self
    }

    pub fn with_nblock(mut self, nblock: usize) -> Self {
        self.nblock = nblock;
        self
    }

    pub fn with_sigma(mut self, sigma: f64) -> Self {
        self.sigma = sigma;
        self
    }

    pub fn with_method(mut self, method: CorrelationMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_variable_cell(mut self, allow: bool) -> Self {
        self.allow_variable_cell = allow;
        self
    }

    /// Time between two velocity samples, fs.
    pub fn effective_step_fs(&self) -> f64 {
        self.potim_fs * self.nblock as f64
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            allow_variable_cell: self.allow_variable_cell,
            ..LoadOptions::default()
        }
    }

    pub fn validate(&self) -> DosResult<()> {
        if !(self.potim_fs.is_finite() && self.potim_fs > 0.0) {
            return Err(DosError::InvalidParameter(format!(
                "potim must be positive, got {} fs",
                self.potim_fs
            )));
        }
        if self.nblock == 0 {
            return Err(DosError::InvalidParameter("nblock must be at least 1".into()));
        }
        if !(self.sigma.is_finite() && self.sigma >= 0.0) {
            return Err(DosError::InvalidParameter(format!(
                "smoothing sigma must be non-negative, got {}",
                self.sigma
            )));
        }
        if self.sigma > MAX_SMOOTHING_SIGMA {
            return Err(DosError::InvalidParameter(format!(
                "smoothing sigma must be at most {MAX_SMOOTHING_SIGMA} bins, got {}",
                self.sigma
            )));
        }
        Ok(())
    }
}

/// Runs the pipeline on trajectories with a fixed set of settings.
#[derive(Clone, Debug)]
pub struct PhononDos {
    settings: DosSettings,
}

impl PhononDos {
    pub fn new(settings: DosSettings) -> Self {
        PhononDos { settings }
    }

    pub fn settings(&self) -> &DosSettings {
        &self.settings
    }

    fn enter(&self, stage: Stage) {
        info!("phonon DOS: {stage}");
    }

    /// Every stage up to and including the normalised VAF.
    pub fn vaf(&self, trajectory: &Trajectory) -> DosResult<Vaf> {
        self.settings.validate()?;

        self.enter(Stage::Unwrapping);
        let displacements = unwrap_displacements(trajectory);
        debug!(
            "{} displacement steps for {} atoms",
            displacements.len(),
            displacements.n_atoms()
        );

        self.enter(Stage::VelocityEstimation);
        debug!(
            "time step {} fs x nblock {} = {} fs",
            self.settings.potim_fs,
            self.settings.nblock,
            self.settings.effective_step_fs()
        );
        let velocities = estimate_velocities(
            &displacements,
            trajectory.cell(),
            self.settings.effective_step_fs(),
        )?;

        self.enter(Stage::Correlation);
        velocity_autocorrelation(&velocities, self.settings.method, self.settings.progress)
    }

    /// Load a trajectory file with these settings' load options and run the
    /// full pipeline on it.
    pub fn run_path(&self, path: impl AsRef<Path>) -> DosResult<(Trajectory, Spectrum)> {
        self.settings.validate()?;
        self.enter(Stage::Loading);
        let trajectory = load_trajectory(path, &self.settings.load_options())?;
        let spectrum = self.run(&trajectory)?;
        Ok((trajectory, spectrum))
    }

    pub fn run(&self, trajectory: &Trajectory) -> DosResult<Spectrum> {
        let vaf = self.vaf(trajectory)?;

        self.enter(Stage::SpectralTransform);
        let spectrum = phonon_dos(
            &vaf,
            self.settings.effective_step_fs(),
            self.settings.unit,
            self.settings.sigma,
        )?;

        self.enter(Stage::Done);
        if let Some((f, _)) = spectrum.peak() {
            info!("strongest mode at {f:.3} {}", spectrum.unit());
        }
        Ok(spectrum)
    }
}
