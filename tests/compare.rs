mod common;

use std::fs;
use std::path::PathBuf;

use heo_md::compare::{compare_spectra, load_spectra};
use heo_md::output::write_dos_csv;
use heo_md::{DosError, FrequencyUnit, Spectrum};

use common::{temp_path, write_text};

fn seed_table(label: &str, scale: f64) -> PathBuf {
    let path = temp_path(&format!("ph_dos_{label}.csv"));
    let frequencies: Vec<f64> = (0..30).map(|i| i as f64 * 0.5).collect();
    let intensities: Vec<f64> = frequencies
        .iter()
        .map(|f| scale * (-(f - 6.0) * (f - 6.0) / 2.0).exp())
        .collect();
    let spectrum = Spectrum::new(frequencies, intensities, FrequencyUnit::THz).unwrap();
    write_dos_csv(&path, &spectrum).unwrap();
    path
}

#[test]
fn overlays_readable_tables_and_skips_the_rest() {
    let a = seed_table("42", 1.0);
    let b = seed_table("43", 2.0);
    let missing = temp_path("ph_dos_44.csv");
    let inputs = vec![
        ("seed_42".to_string(), a.clone()),
        ("seed_43".to_string(), b.clone()),
        ("seed_44".to_string(), missing),
    ];

    let plot_path = temp_path("compare_pdos_output.svg");
    let spectra = compare_spectra(&inputs, (0.0, 10.0), FrequencyUnit::THz, &plot_path).unwrap();
    assert_eq!(spectra.len(), 2);
    assert_eq!(spectra[0].label, "seed_42");
    // 0, 0.5, ..., 10.0
    assert_eq!(spectra[0].points.len(), 21);
    assert!(spectra[1]
        .points
        .iter()
        .all(|&(f, _)| (0.0..=10.0).contains(&f)));

    let svg = fs::read_to_string(&plot_path).unwrap();
    assert!(svg.contains("<svg"));

    for p in [a, b, plot_path] {
        let _ = fs::remove_file(p);
    }
}

#[test]
fn pandas_table_with_float_labels_is_read() {
    let path = temp_path("pandas.csv");
    write_text(&path, ",0,1,2\n0,0.0,5.0,12.0\n1,0.1,0.9,0.4\n");
    let spectra = load_spectra(&[("pd".into(), path.clone())], (0.0, 10.0), FrequencyUnit::THz)
        .unwrap();
    assert_eq!(spectra[0].points, vec![(0.0, 0.1), (5.0, 0.9)]);
    let _ = fs::remove_file(path);
}

#[test]
fn nothing_to_compare() {
    let garbled = temp_path("garbled.csv");
    write_text(&garbled, "not,a\ntable\n");
    let inputs = vec![("bad".to_string(), garbled.clone())];
    let err = load_spectra(&inputs, (0.0, 10.0), FrequencyUnit::THz).expect_err("unreadable");
    assert!(matches!(err, DosError::InvalidParameter(_)));
    let _ = fs::remove_file(garbled);
}
