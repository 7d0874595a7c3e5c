/*
Autocorrelation of the velocity series.

For every atom i and axis a the full linear autocorrelation of v_ia(t) is
taken (length 2T - 1, zero lag in the middle, exactly like numpy's
`correlate(x, x, "full")`) and summed. The sum is divided by sum(v^2) over
all atoms, axes and samples, which puts VAF(0) at 1 and strips the velocity
units.

The one-sided correlation r[k] = sum_t x[t] x[t + k] is computed either
directly, O(T^2), or through a zero-padded FFT, O(T log T). The full array
is then mirrored from r, so it is symmetric to the last bit either way.
 */

use std::sync::Arc;

use kdam::{tqdm, BarExt};
use log::debug;
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::error::{DosError, DosResult};
use crate::vacf::velocity::VelocitySeries;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    Direct,
    #[default]
    Fft,
}

/// Normalised velocity autocorrelation, length `2 * n_samples - 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct Vaf {
    values: Vec<f64>,
    n_samples: usize,
}

impl Vaf {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of velocity samples T the VAF was built from.
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at zero lag (the centre of the array).
    pub fn zero_lag(&self) -> f64 {
        self.values[self.n_samples - 1]
    }
}

struct Autocorrelator {
    n: usize,
    size: usize,
    plans: Option<(Arc<dyn Fft<f64>>, Arc<dyn Fft<f64>>)>,
}

impl Autocorrelator {
    fn new(n: usize, method: CorrelationMethod) -> Self {
        let size = (2 * n).next_power_of_two();
        let plans = match method {
            CorrelationMethod::Direct => None,
            CorrelationMethod::Fft => {
                let mut planner = FftPlanner::<f64>::new();
                Some((planner.plan_fft_forward(size), planner.plan_fft_inverse(size)))
            }
        };
        Autocorrelator { n, size, plans }
    }

    /// One-sided correlation r[k] for k in 0..n.
    fn one_sided(&self, series: &[f64]) -> Vec<f64> {
        match &self.plans {
            None => (0..self.n)
                .map(|k| {
                    series[..self.n - k]
                        .iter()
                        .zip(&series[k..])
                        .map(|(a, b)| a * b)
                        .sum()
                })
                .collect(),
            Some((fft, ifft)) => {
                let mut buf = vec![Complex64::new(0.0, 0.0); self.size];
                for (slot, &x) in buf.iter_mut().zip(series) {
                    slot.re = x;
                }
                fft.process(&mut buf);
                for v in buf.iter_mut() {
                    *v = Complex64::new(v.norm_sqr(), 0.0);
                }
                ifft.process(&mut buf);
                let scale = 1.0 / self.size as f64;
                buf[..self.n].iter().map(|c| c.re * scale).collect()
            }
        }
    }

    /// Accumulate the mirrored full correlation of `series` into `full`.
    fn accumulate_full(&self, series: &[f64], full: &mut [f64]) {
        let r = self.one_sided(series);
        let centre = self.n - 1;
        full[centre] += r[0];
        for (k, &value) in r.iter().enumerate().skip(1) {
            full[centre + k] += value;
            full[centre - k] += value;
        }
    }
}

/// Full linear autocorrelation of one scalar series, zero lag at index
/// `len - 1`.
pub fn autocorrelate_full(series: &[f64], method: CorrelationMethod) -> Vec<f64> {
    if series.is_empty() {
        return Vec::new();
    }
    let correlator = Autocorrelator::new(series.len(), method);
    let mut full = vec![0.0; 2 * series.len() - 1];
    correlator.accumulate_full(series, &mut full);
    full
}

/// Sum of the full autocorrelations of every atom and axis, before
/// normalisation. Shows a progress bar over atoms when `progress` is set.
pub fn raw_autocorrelation(
    velocities: &VelocitySeries,
    method: CorrelationMethod,
    progress: bool,
) -> Vec<f64> {
    let t = velocities.n_samples();
    if t == 0 {
        return Vec::new();
    }
    let correlator = Autocorrelator::new(t, method);
    let mut full = vec![0.0; 2 * t - 1];
    let mut bar = progress.then(|| tqdm!(total = velocities.n_atoms(), desc = "VACF"));
    for atom in 0..velocities.n_atoms() {
        for axis in 0..3 {
            correlator.accumulate_full(&velocities.component(atom, axis), &mut full);
        }
        if let Some(bar) = bar.as_mut() {
            if let Err(e) = bar.update(1) {
                debug!("VACF progress bar not updated: {e}");
            }
        }
    }
    if bar.is_some() {
        eprintln!();
    }
    full
}

/// Normalised VAF. A trajectory whose atoms never move has no defined
/// normalisation and is rejected with `DegenerateVelocity`.
pub fn velocity_autocorrelation(
    velocities: &VelocitySeries,
    method: CorrelationMethod,
    progress: bool,
) -> DosResult<Vaf> {
    let norm = velocities.sum_of_squares();
    if norm == 0.0 || !norm.is_finite() {
        return Err(DosError::DegenerateVelocity);
    }
    let mut values = raw_autocorrelation(velocities, method, progress);
    for v in values.iter_mut() {
        *v /= norm;
    }
    debug!(
        "VAF over {} samples x {} atoms, zero lag {:.6}",
        velocities.n_samples(),
        velocities.n_atoms(),
        values[velocities.n_samples() - 1]
    );
    Ok(Vaf {
        values,
        n_samples: velocities.n_samples(),
    })
}
