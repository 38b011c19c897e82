//! Integration tests for vtdgraph-cli.
//!
//! Tests cover the binary invocation of every subcommand, using small JSON
//! inputs written to a temp directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Helper to get the path to the `vtdgraph` binary built by cargo.
fn vtdgraph_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vtdgraph"))
}

fn run(args: &[&str]) -> Output {
    vtdgraph_bin()
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run vtdgraph")
}

fn square(x: f64, y: f64) -> serde_json::Value {
    serde_json::json!([[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]])
}

/// Writes a 2x2 grid of precincts (ids 0, 1 on top) plus one district file.
fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let precincts = serde_json::json!([
        { "name": "NW", "land": 10, "water": 1, "demographics": { "total": 5, "white": 5 }, "vertices": square(0.0, 1.0) },
        { "name": "NE", "land": 10, "water": 1, "vertices": square(1.0, 1.0) },
        { "name": "SW", "land": 10, "water": 1, "vertices": square(0.0, 0.0) },
        { "name": "SE", "land": 10, "water": 1, "vertices": square(1.0, 0.0) },
    ]);
    let districts = serde_json::json!([
        { "id": 1, "vertices": [[0.0, 0.0], [2.0, 0.0], [2.0, 1.0], [0.0, 1.0], [0.0, 0.0]] },
        { "id": 2, "vertices": [[0.0, 1.0], [2.0, 1.0], [2.0, 2.0], [0.0, 2.0], [0.0, 1.0]] },
    ]);
    let precinct_path = dir.join("precincts.json");
    let district_path = dir.join("districts.json");
    std::fs::write(&precinct_path, precincts.to_string()).unwrap();
    std::fs::write(&district_path, districts.to_string()).unwrap();
    (precinct_path, district_path)
}

// ---------------------------------------------------------------------------
// `vtdgraph states`
// ---------------------------------------------------------------------------

#[test]
fn cli_states_lists_table() {
    let output = run(&["states"]);
    assert!(output.status.success(), "vtdgraph states failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Iowa"));
    assert!(stdout.contains("new_york"));
    assert!(stdout.contains("District of Columbia"));
}

// ---------------------------------------------------------------------------
// compile -> verify -> inspect
// ---------------------------------------------------------------------------

#[test]
fn cli_compile_then_verify_and_inspect() {
    let dir = TempDir::new().unwrap();
    let (precincts, districts) = write_inputs(dir.path());
    let out = dir.path().join("out");

    let output = run(&[
        "compile",
        "--precincts",
        precincts.to_str().unwrap(),
        "--districts",
        districts.to_str().unwrap(),
        "--state",
        "Iowa",
        "--out",
        out.to_str().unwrap(),
        "--outputs",
        "binary,district-mapping",
    ]);
    assert!(
        output.status.success(),
        "compile failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4 precincts, 4 edges"), "got: {stdout}");

    let idx = out.join("iowa").join("iowa.idx");
    assert!(idx.exists());
    assert!(!out.join("iowa").join("iowa.json").exists());

    let mapping: serde_json::Value =
        serde_json::from_slice(&std::fs::read(out.join("iowa/iowa.districts.json")).unwrap())
            .unwrap();
    assert_eq!(mapping["map"], serde_json::json!([[0, 2], [1, 2], [2, 1], [3, 1]]));

    let output = run(&["verify", idx.to_str().unwrap()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("OK:"));

    let output = run(&["inspect", idx.to_str().unwrap(), "--node", "0"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BEEFCAFE"), "got: {stdout}");
    assert!(stdout.contains("Neighbors:    [1, 2]"), "got: {stdout}");
    assert!(stdout.contains("total 5"), "got: {stdout}");
}

#[test]
fn cli_verify_rejects_corrupted_file() {
    let dir = TempDir::new().unwrap();
    let (precincts, _) = write_inputs(dir.path());
    let out = dir.path().join("out");

    let output = run(&[
        "compile",
        "--precincts",
        precincts.to_str().unwrap(),
        "--state",
        "RI",
        "--out",
        out.to_str().unwrap(),
        "--outputs",
        "binary",
    ]);
    assert!(output.status.success());

    let idx = out.join("rhode_island").join("rhode_island.idx");
    let mut bytes = std::fs::read(&idx).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    std::fs::write(&idx, &bytes).unwrap();

    let output = run(&["verify", idx.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("checksum mismatch"));
}

#[test]
fn cli_compile_rejects_unknown_output_kind() {
    let dir = TempDir::new().unwrap();
    let (precincts, _) = write_inputs(dir.path());
    let output = run(&[
        "compile",
        "--precincts",
        precincts.to_str().unwrap(),
        "--state",
        "Iowa",
        "--outputs",
        "binary,svg",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown output kind"));
}

#[test]
fn cli_apportion_warning_goes_to_the_log() {
    let dir = TempDir::new().unwrap();
    let (precincts, _) = write_inputs(dir.path());
    let sources = dir.path().join("sources.json");
    let regions = serde_json::json!([
        { "demographics": { "total": 40, "white": 40 }, "vertices": [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0], [0.0, 0.0]] },
        { "demographics": { "total": 7, "white": 7 }, "vertices": square(10.0, 10.0) },
    ]);
    std::fs::write(&sources, regions.to_string()).unwrap();
    let out = dir.path().join("out");

    let output = run(&[
        "compile",
        "--precincts",
        precincts.to_str().unwrap(),
        "--sources",
        sources.to_str().unwrap(),
        "--state",
        "Iowa",
        "--out",
        out.to_str().unwrap(),
        "--outputs",
        "binary",
    ]);
    assert!(
        output.status.success(),
        "compile failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stdout.contains("Warning"), "got: {stdout}");
    assert!(
        stderr.contains("apportionment left regions unmatched"),
        "got: {stderr}"
    );

    let idx = out.join("iowa").join("iowa.idx");
    let output = run(&["inspect", idx.to_str().unwrap(), "--node", "3"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("total 10"));
}
