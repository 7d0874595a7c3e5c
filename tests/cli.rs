mod common;

use std::fs;
use std::process::Command;

use common::{oscillator_extxyz, temp_path, write_text};

fn heo_md() -> Command {
    Command::new(env!("CARGO_BIN_EXE_heo_md"))
}

#[test]
fn analyze_writes_table_plot_and_summary() {
    let traj = temp_path("cli_osc.xyz");
    write_text(&traj, &oscillator_extxyz(9, 10.0, 5.0, 0.2));
    let csv = temp_path("cli_ph_dos.csv");
    let plot = temp_path("cli_phonon_dos.svg");
    let summary = temp_path("cli_summary.csv");

    let status = heo_md()
        .args(["analyze", "--pdos", "-u", "THz", "--potim", "20", "-q", "-f"])
        .arg(&traj)
        .arg("--csv")
        .arg(&csv)
        .arg("--plot")
        .arg(&plot)
        .arg("--summary")
        .arg(&summary)
        .status()
        .expect("failed to run heo_md");
    assert!(status.success());
    assert!(fs::read_to_string(&csv).unwrap().starts_with(",0,1,"));
    assert!(fs::read_to_string(&plot).unwrap().contains("<svg"));
    assert!(summary.exists());

    for path in [traj, csv, plot, summary] {
        let _ = fs::remove_file(path);
    }
}

#[test]
fn failed_plot_leaves_no_outputs() {
    let traj = temp_path("cli_osc_fail.xyz");
    write_text(&traj, &oscillator_extxyz(9, 10.0, 5.0, 0.2));
    let csv = temp_path("cli_ph_dos_fail.csv");
    let summary = temp_path("cli_summary_fail.csv");
    let plot = temp_path("cli_missing_dir").join("p.svg");

    let status = heo_md()
        .args(["analyze", "--pdos", "-u", "THz", "--potim", "20", "-q", "-f"])
        .arg(&traj)
        .arg("--csv")
        .arg(&csv)
        .arg("--plot")
        .arg(&plot)
        .arg("--summary")
        .arg(&summary)
        .status()
        .expect("failed to run heo_md");
    assert!(!status.success());
    assert!(!csv.exists(), "DOS table written despite the failed plot");
    assert!(!summary.exists(), "summary written despite the failed plot");

    let _ = fs::remove_file(traj);
}

#[test]
fn failed_dos_leaves_no_summary() {
    // frozen atom: the DOS stage fails after the summary is computed
    let traj = temp_path("cli_frozen.xyz");
    write_text(&traj, &oscillator_extxyz(6, 10.0, 5.0, 0.0));
    let csv = temp_path("cli_ph_dos_frozen.csv");
    let plot = temp_path("cli_phonon_dos_frozen.svg");
    let summary = temp_path("cli_summary_frozen.csv");

    let status = heo_md()
        .args(["analyze", "--pdos", "-u", "meV", "--potim", "20", "-q", "-f"])
        .arg(&traj)
        .arg("--csv")
        .arg(&csv)
        .arg("--plot")
        .arg(&plot)
        .arg("--summary")
        .arg(&summary)
        .status()
        .expect("failed to run heo_md");
    assert!(!status.success());
    for path in [&csv, &plot, &summary] {
        assert!(!path.exists(), "{} was written", path.display());
    }

    let _ = fs::remove_file(traj);
}
