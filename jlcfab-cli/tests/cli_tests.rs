//! CLI integration tests

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Build command for the jlcfab-cli binary (finds it in target/debug when run via cargo test).
fn jlcfab_cli() -> Command {
    cargo_bin_cmd!("jlcfab-cli")
}

/// Path to jlcfab library test fixtures (relative to workspace).
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("jlcfab")
        .join("tests")
        .join("fixtures")
}

#[test]
fn test_cli_help() {
    let mut cmd = jlcfab_cli();

    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("KiCad"));
}

#[test]
fn test_cli_version() {
    let mut cmd = jlcfab_cli();

    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_generate_writes_both_files() {
    let dir = TempDir::new().unwrap();
    let mut cmd = jlcfab_cli();

    cmd.arg("generate")
        .arg(fixtures_dir().join("sensor_board.kicad_pcb"))
        .arg("--rotations")
        .arg(fixtures_dir().join("rotations.cf"))
        .arg("--output-dir")
        .arg(dir.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sensor_board-bom.csv"))
        .stdout(predicate::str::contains("R3"));

    let bom = std::fs::read_to_string(dir.path().join("sensor_board-bom.csv")).unwrap();
    assert!(bom.starts_with("Comment,Designator,Footprint,LCSC\n"));
    let cpl = std::fs::read_to_string(dir.path().join("sensor_board-cpl.csv")).unwrap();
    assert!(cpl.contains("\"Q1\",\"120.65\",\"-80.01\",\"Top\",\"270\""));
}

#[test]
fn test_cli_generate_defaults_to_current_dir() {
    let dir = TempDir::new().unwrap();
    let mut cmd = jlcfab_cli();

    cmd.current_dir(dir.path())
        .arg("generate")
        .arg(fixtures_dir().join("legacy_board.kicad_pcb"));

    cmd.assert().success();
    assert!(dir.path().join("legacy_board-bom.csv").exists());
    assert!(dir.path().join("legacy_board-cpl.csv").exists());
}

#[test]
fn test_cli_generate_json_output() {
    let dir = TempDir::new().unwrap();
    let mut cmd = jlcfab_cli();

    cmd.arg("generate")
        .arg(fixtures_dir().join("sensor_board.kicad_pcb"))
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"placed\": 5"))
        .stdout(predicate::str::contains("\"skipped\""));
}

#[test]
fn test_cli_generate_custom_part_field() {
    let dir = TempDir::new().unwrap();
    let mut cmd = jlcfab_cli();

    cmd.arg("generate")
        .arg(fixtures_dir().join("sensor_board.kicad_pcb"))
        .arg("--output-dir")
        .arg(dir.path())
        .arg("--part-field")
        .arg("MPN")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"placed\": 0"));
}

#[test]
fn test_cli_generate_malformed_board() {
    let dir = TempDir::new().unwrap();
    let mut cmd = jlcfab_cli();

    cmd.arg("generate")
        .arg(fixtures_dir().join("missing_layer.kicad_pcb"))
        .arg("--output-dir")
        .arg(dir.path());

    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Error").and(predicate::str::contains("missing layer")));
    assert!(!dir.path().join("missing_layer-bom.csv").exists());
}

#[test]
fn test_cli_generate_nonexistent_file() {
    let mut cmd = jlcfab_cli();

    cmd.arg("generate").arg("does_not_exist.kicad_pcb");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn test_cli_rotation_command() {
    let mut cmd = jlcfab_cli();

    cmd.arg("rotation")
        .arg("Package_TO_SOT_SMD:SOT-23")
        .arg("--rotations")
        .arg(fixtures_dir().join("rotations.cf"));

    cmd.assert()
        .success()
        .stdout(predicate::str::diff("180\n"));
}

#[test]
fn test_cli_rotation_unmatched_is_zero() {
    let mut cmd = jlcfab_cli();

    cmd.arg("rotation")
        .arg("Resistor_SMD:R_0603_1608Metric")
        .arg("--rotations")
        .arg(fixtures_dir().join("rotations.cf"));

    cmd.assert()
        .success()
        .stdout(predicate::str::diff("0\n"));
}
