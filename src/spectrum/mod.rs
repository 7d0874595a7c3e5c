/*
Phonon density of states from the VAF.

  DOS(f) = | FFT( VAF - <VAF> ) |^2,   f = k / (n dt),  n = 2T - 1

The VAF has an odd length 2T - 1, so the first T bins of the transform are
exactly the non-negative frequencies. Everything past them mirrors the
negative half and is dropped. The truncated power spectrum is smoothed with
a Gaussian of `sigma` bins before it is returned.
 */

pub mod gaussian;

use log::debug;
use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::constants::{FS_TO_S, HZ_TO_THZ};
use crate::error::{DosError, DosResult};
use crate::units::FrequencyUnit;
use crate::vacf::Vaf;

pub use gaussian::gaussian_filter1d;

/// Sample frequencies of a length-`n` DFT with sample spacing `d`, in the
/// usual order: zero, the positive half, then the negative half.
pub fn fft_frequencies(n: usize, d: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let scale = 1.0 / (n as f64 * d);
    let positive = (n - 1) / 2 + 1;
    (0..n)
        .map(|i| {
            let k = if i < positive {
                i as f64
            } else {
                i as f64 - n as f64
            };
            k * scale
        })
        .collect()
}

/// `|FFT(x - mean(x))|^2`, same length as the input.
pub fn power_spectrum(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    let mut buf: Vec<Complex64> = signal
        .iter()
        .map(|&x| Complex64::new(x - mean, 0.0))
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(buf.len()).process(&mut buf);
    buf.iter().map(|c| c.norm_sqr()).collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    intensities: Vec<f64>,
    unit: FrequencyUnit,
}

impl Spectrum {
    pub fn new(
        frequencies: Vec<f64>,
        intensities: Vec<f64>,
        unit: FrequencyUnit,
    ) -> DosResult<Self> {
        if frequencies.len() != intensities.len() {
            return Err(DosError::InvalidParameter(format!(
                "{} frequencies but {} intensities",
                frequencies.len(),
                intensities.len()
            )));
        }
        Ok(Spectrum {
            frequencies,
            intensities,
            unit,
        })
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    pub fn unit(&self) -> FrequencyUnit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// (frequency, intensity) of the strongest bin. The first bin wins a tie.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(self.intensities.iter())
            .fold(None, |best: Option<(f64, f64)>, (&f, &d)| match best {
                Some((_, top)) if top >= d => best,
                _ => Some((f, d)),
            })
    }

    /// Points whose frequency lies in `[lo, hi]`, both ends inclusive.
    pub fn window(&self, lo: f64, hi: f64) -> Vec<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(self.intensities.iter())
            .filter(|(f, _)| **f >= lo && **f <= hi)
            .map(|(&f, &d)| (f, d))
            .collect()
    }

    /// Intensities shifted to zero mean and scaled to unit (population)
    /// variance. A flat spectrum is only shifted.
    pub fn standardized(&self) -> Vec<f64> {
        if self.intensities.is_empty() {
            return Vec::new();
        }
        let n = self.intensities.len() as f64;
        let mean = self.intensities.iter().sum::<f64>() / n;
        let var = self
            .intensities
            .iter()
            .map(|d| (d - mean) * (d - mean))
            .sum::<f64>()
            / n;
        let std = if var > 0.0 { var.sqrt() } else { 1.0 };
        self.intensities.iter().map(|d| (d - mean) / std).collect()
    }
}

/// Frequency axis and smoothed power spectrum of a VAF built from samples
/// `step_fs` femtoseconds apart.
pub fn phonon_dos(
    vaf: &Vaf,
    step_fs: f64,
    unit: FrequencyUnit,
    sigma: f64,
) -> DosResult<Spectrum> {
    if !(step_fs.is_finite() && step_fs > 0.0) {
        return Err(DosError::InvalidParameter(format!(
            "time step must be positive, got {step_fs} fs"
        )));
    }
    let t = vaf.n_samples();
    let n = vaf.len();
    let frequencies: Vec<f64> = fft_frequencies(n, step_fs * FS_TO_S)
        .into_iter()
        .take(t)
        .map(|hz| unit.scale_thz(hz * HZ_TO_THZ))
        .collect();
    let power = power_spectrum(vaf.values());
    let intensities = gaussian_filter1d(&power[..t], sigma)?;
    debug!(
        "{} DOS bins, resolution {:.4} {}",
        t,
        frequencies.get(1).copied().unwrap_or(0.0),
        unit
    );
    Spectrum::new(frequencies, intensities, unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vacf::{velocity_autocorrelation, CorrelationMethod, VelocitySeries};
    use nalgebra::Vector3;

    fn oscillating_vaf(t: usize, period: f64) -> Vaf {
        let samples = (0..t)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * i as f64 / period;
                vec![Vector3::new(phase.cos(), 0.0, 0.0)]
            })
            .collect();
        let v = VelocitySeries::from_samples(samples).unwrap();
        velocity_autocorrelation(&v, CorrelationMethod::Fft, false).unwrap()
    }

    #[test]
    fn frequencies_follow_dft_ordering() {
        let f = fft_frequencies(5, 0.5);
        let expected = [0.0, 0.4, 0.8, -0.8, -0.4];
        for (a, b) in f.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
        let f = fft_frequencies(4, 1.0);
        assert_eq!(f, vec![0.0, 0.25, -0.5, -0.25]);
    }

    #[test]
    fn power_spectrum_ignores_the_mean() {
        let p = power_spectrum(&[2.0, 2.0, 2.0, 2.0]);
        assert!(p.iter().all(|x| x.abs() < 1e-20));
        let p = power_spectrum(&[1.0, -1.0, 1.0, -1.0]);
        assert!((p[2] - 16.0).abs() < 1e-9);
        assert!(p[0].abs() < 1e-20);
    }

    #[test]
    fn spectrum_has_t_bins_starting_at_zero() {
        let vaf = oscillating_vaf(12, 4.0);
        let s = phonon_dos(&vaf, 1.0, FrequencyUnit::THz, 2.0).unwrap();
        assert_eq!(s.len(), 12);
        assert_eq!(s.intensities().len(), 12);
        assert_eq!(s.frequencies()[0], 0.0);
        assert!(s.frequencies().windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn unit_conversion_scales_the_axis_only() {
        let vaf = oscillating_vaf(10, 5.0);
        let thz = phonon_dos(&vaf, 2.0, FrequencyUnit::THz, 1.0).unwrap();
        let cm1 = phonon_dos(&vaf, 2.0, FrequencyUnit::Cm1, 1.0).unwrap();
        let mev = phonon_dos(&vaf, 2.0, FrequencyUnit::MeV, 1.0).unwrap();
        for i in 1..thz.len() {
            let f = thz.frequencies()[i];
            assert!((cm1.frequencies()[i] / (f * 33.356) - 1.0).abs() < 1e-9);
            assert!((mev.frequencies()[i] / (f * 4.13567) - 1.0).abs() < 1e-9);
        }
        assert_eq!(thz.intensities(), cm1.intensities());
        assert_eq!(cm1.unit(), FrequencyUnit::Cm1);
    }

    #[test]
    fn peak_sits_at_the_oscillation_frequency() {
        // period of 8 fs is 125 THz
        let vaf = oscillating_vaf(64, 8.0);
        let s = phonon_dos(&vaf, 1.0, FrequencyUnit::THz, 0.0).unwrap();
        let bin = s.frequencies()[1];
        let (f, _) = s.peak().unwrap();
        assert!((f - 125.0).abs() <= bin, "peak at {f} THz, bin {bin}");
    }

    #[test]
    fn rejects_bad_parameters() {
        let vaf = oscillating_vaf(6, 3.0);
        assert!(phonon_dos(&vaf, 0.0, FrequencyUnit::THz, 2.0).is_err());
        assert!(phonon_dos(&vaf, 1.0, FrequencyUnit::THz, -2.0).is_err());
    }

    #[test]
    fn window_and_standardize() {
        let s = Spectrum::new(
            vec![0.0, 5.0, 10.0, 15.0],
            vec![1.0, 2.0, 3.0, 4.0],
            FrequencyUnit::THz,
        )
        .unwrap();
        assert_eq!(s.window(5.0, 10.0), vec![(5.0, 2.0), (10.0, 3.0)]);
        let z = s.standardized();
        assert!(z.iter().sum::<f64>().abs() < 1e-12);
        let var = z.iter().map(|x| x * x).sum::<f64>() / 4.0;
        assert!((var - 1.0).abs() < 1e-12);
        assert_eq!(s.peak(), Some((15.0, 4.0)));
        assert!(Spectrum::new(vec![0.0], vec![], FrequencyUnit::THz).is_err());
    }
}
