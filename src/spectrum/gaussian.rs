use crate::constants::MAX_SMOOTHING_SIGMA;
use crate::error::{DosError, DosResult};

// kernel half-width in units of sigma
const TRUNCATE: f64 = 4.0;

fn kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as i64;
    let weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x * x) as f64 / (sigma * sigma)).exp())
        .collect();
    let total: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / total).collect()
}

// half-sample symmetric extension: d c b a | a b c d | d c b a
fn reflect(index: i64, n: i64) -> usize {
    let m = index.rem_euclid(2 * n);
    (if m < n { m } else { 2 * n - 1 - m }) as usize
}

/// One-dimensional Gaussian smoothing with reflecting boundaries.
///
/// The kernel reaches `round(4 sigma)` samples to each side and is
/// normalised to unit sum, so a constant signal is left unchanged.
/// `sigma == 0` returns the input as is; sigma above `MAX_SMOOTHING_SIGMA`
/// is rejected.
pub fn gaussian_filter1d(data: &[f64], sigma: f64) -> DosResult<Vec<f64>> {
    if !(sigma.is_finite() && sigma >= 0.0) {
        return Err(DosError::InvalidParameter(format!(
            "smoothing sigma must be finite and non-negative, got {sigma}"
        )));
    }
    if sigma > MAX_SMOOTHING_SIGMA {
        return Err(DosError::InvalidParameter(format!(
            "smoothing sigma must be at most {MAX_SMOOTHING_SIGMA} bins, got {sigma}"
        )));
    }
    if sigma == 0.0 || data.is_empty() {
        return Ok(data.to_vec());
    }
    let n = data.len() as i64;
    let taps = taps(kernel(sigma), n);
    let smoothed = (0..n)
        .map(|i| {
            taps.iter()
                .map(|&(offset, w)| w * data[reflect(i + offset, n)])
                .sum()
        })
        .collect();
    Ok(smoothed)
}

// (offset, weight) pairs. `reflect` has period 2n, so a kernel longer than
// that is folded onto 2n taps.
fn taps(weights: Vec<f64>, n: i64) -> Vec<(i64, f64)> {
    let radius = (weights.len() / 2) as i64;
    let period = 2 * n;
    if (weights.len() as i64) <= period {
        return (-radius..=radius).zip(weights).collect();
    }
    let mut folded = vec![0.0; period as usize];
    for (offset, w) in (-radius..=radius).zip(weights) {
        folded[offset.rem_euclid(period) as usize] += w;
    }
    (0..period).zip(folded).collect()
}
