use std::path::Path;

use log::info;
use plotlib::page::Page;
use plotlib::repr::Plot;
use plotlib::style::LineStyle;
use plotlib::view::ContinuousView;

use crate::constants::SINGLE_RUN_WINDOW_THZ;
use crate::error::{DosError, DosResult};
use crate::spectrum::Spectrum;
use crate::units::FrequencyUnit;

/// Line colours of an overlay, reused from the start once exhausted.
pub const COLOUR_CYCLE: [&str; 6] = [
    "#ff0000", // red
    "#008000", // green
    "#0000ff", // blue
    "#ff8c00",
    "#800080",
    "#008b8b",
];

fn y_bounds(points: &[(f64, f64)]) -> (f64, f64) {
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    let pad = if hi > lo { 0.05 * (hi - lo) } else { 1.0 };
    (lo - pad, hi + pad)
}

fn save(path: &Path, view: &ContinuousView) -> DosResult<()> {
    Page::single(view).save(path).map_err(|e| DosError::Plot {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!("plot saved to {}", path.display());
    Ok(())
}

/// Standardised DOS of a single run over 0-50 THz (converted to the
/// spectrum's unit).
pub fn plot_dos(path: impl AsRef<Path>, spectrum: &Spectrum) -> DosResult<()> {
    let path = path.as_ref();
    let unit = spectrum.unit();
    let (lo, hi) = (
        unit.scale_thz(SINGLE_RUN_WINDOW_THZ.0),
        unit.scale_thz(SINGLE_RUN_WINDOW_THZ.1),
    );
    let points: Vec<(f64, f64)> = spectrum
        .frequencies()
        .iter()
        .copied()
        .zip(spectrum.standardized())
        .filter(|(f, _)| *f >= lo && *f <= hi)
        .collect();
    if points.is_empty() {
        return Err(DosError::Plot {
            path: path.to_path_buf(),
            reason: format!("no DOS points between {lo} and {hi} {unit}"),
        });
    }
    let (y_lo, y_hi) = y_bounds(&points);
    let line = Plot::new(points).line_style(LineStyle::new().colour(COLOUR_CYCLE[0]));
    let view = ContinuousView::new()
        .add(line)
        .x_range(lo, hi)
        .y_range(y_lo, y_hi)
        .x_label(unit.label())
        .y_label("Phonon DOS (standardized)");
    save(path, &view)
}

/// Overlay of several labelled DOS curves on a shared `[lo, hi]` axis.
pub fn plot_comparison(
    path: impl AsRef<Path>,
    curves: &[(String, Vec<(f64, f64)>)],
    window: (f64, f64),
    unit: FrequencyUnit,
) -> DosResult<()> {
    let path = path.as_ref();
    let all: Vec<(f64, f64)> = curves.iter().flat_map(|(_, c)| c.iter().copied()).collect();
    if all.is_empty() {
        return Err(DosError::Plot {
            path: path.to_path_buf(),
            reason: "nothing to plot".into(),
        });
    }
    let (y_lo, y_hi) = y_bounds(&all);
    let mut view = ContinuousView::new()
        .x_range(window.0, window.1)
        .y_range(y_lo, y_hi)
        .x_label(unit.label())
        .y_label("Phonon DOS");
    for (i, (label, points)) in curves.iter().enumerate() {
        let colour = COLOUR_CYCLE[i % COLOUR_CYCLE.len()];
        let line = Plot::new(points.clone())
            .line_style(LineStyle::new().colour(colour))
            .legend(label.clone());
        view = view.add(line);
    }
    save(path, &view)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_bounds_pad_the_data_range() {
        let (lo, hi) = y_bounds(&[(0.0, -1.0), (1.0, 3.0)]);
        assert!((lo + 1.2).abs() < 1e-12);
        assert!((hi - 3.2).abs() < 1e-12);
        assert_eq!(y_bounds(&[(0.0, 2.0)]), (1.0, 3.0));
    }

    #[test]
    fn empty_window_is_an_error() {
        let s = Spectrum::new(vec![100.0, 200.0], vec![1.0, 2.0], FrequencyUnit::THz).unwrap();
        let err = plot_dos(std::env::temp_dir().join("never_written.svg"), &s)
            .expect_err("all points above 50 THz");
        assert!(matches!(err, DosError::Plot { .. }));
    }
}
