#![allow(dead_code)]

use std::f64::consts::PI;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

pub fn temp_path(label: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let label_path = Path::new(label);
    let stem = label_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(label);
    let ext = label_path.extension().and_then(|s| s.to_str());
    let filename = if let Some(ext) = ext {
        format!("heo_md_test_{stem}_{}_{}.{}", std::process::id(), nanos, ext)
    } else {
        format!("heo_md_test_{label}_{}_{}", std::process::id(), nanos)
    };
    path.push(filename);
    path
}

pub fn write_text(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write temp file");
}

/// x position (A) of an atom oscillating about the middle of a cubic cell.
pub fn oscillator_x(t: usize, side: f64, period_fs: f64, amplitude: f64) -> f64 {
    side / 2.0 + amplitude * (2.0 * PI * t as f64 / period_fs).sin()
}

/// Extended XYZ text of one oxygen atom oscillating along x in a cubic cell,
/// one frame per fs.
pub fn oscillator_extxyz(n_frames: usize, side: f64, period_fs: f64, amplitude: f64) -> String {
    let mut text = String::new();
    for t in 0..n_frames {
        let x = oscillator_x(t, side, period_fs, amplitude);
        let h = side / 2.0;
        writeln!(text, "1").unwrap();
        writeln!(
            text,
            "Lattice=\"{side} 0 0 0 {side} 0 0 0 {side}\" Properties=species:S:1:pos:R:3 \
             energy=-4.5 temperature=300 pbc=\"T T T\""
        )
        .unwrap();
        writeln!(text, "O {x:.12} {h:.12} {h:.12}").unwrap();
    }
    text
}

/// A two-atom MgO frame whose cell side and atom count can be varied.
pub fn mgo_frame(side: f64, with_extra_atom: bool, shift: f64) -> String {
    let h = side / 2.0;
    let n = if with_extra_atom { 3 } else { 2 };
    let mut text = format!(
        "{n}\nLattice=\"{side} 0 0 0 {side} 0 0 0 {side}\" Properties=species:S:1:pos:R:3\n"
    );
    writeln!(text, "Mg {shift:.6} 0.0 0.0").unwrap();
    writeln!(text, "O {h:.6} {h:.6} {h:.6}").unwrap();
    if with_extra_atom {
        writeln!(text, "O 0.0 {h:.6} 0.0").unwrap();
    }
    text
}
