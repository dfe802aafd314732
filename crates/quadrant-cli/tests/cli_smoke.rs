// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! End-to-end checks for the `quadrant` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn quadrant() -> Command {
    Command::cargo_bin("quadrant").expect("binary built")
}

#[test]
fn cell_of_floors_negative_coordinates() {
    quadrant()
        .args(["cell-of", "-0.5", "12", "--cell-size", "10"])
        .assert()
        .success()
        .stdout("-1 1\n");
}

#[test]
fn cell_of_rejects_zero_cell_size() {
    quadrant()
        .args(["cell-of", "1", "1", "--cell-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid grid layout"));
}

#[test]
fn run_emits_one_json_row_per_tick() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = quadrant()
        .args(["run", "--json", "--ticks", "3", "--objects", "12", "--config-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
    assert_eq!(json["ticks"].as_array().map(Vec::len), Some(3));
    assert_eq!(json["objects"], serde_json::json!(12));
    // Every object registers on the first tick.
    assert_eq!(json["ticks"][0]["migrations"], serde_json::json!(12));
}

#[test]
fn run_is_reproducible_for_a_seed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let run = || {
        quadrant()
            .args(["run", "--json", "--ticks", "5", "--seed", "7", "--config-dir"])
            .arg(dir.path())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn save_persists_prefs_for_the_next_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    quadrant()
        .args(["run", "--ticks", "2", "--objects", "4", "--save", "--config-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("migrations"));
    let saved = std::fs::read_to_string(dir.path().join("sim.json")).expect("sim.json");
    assert!(saved.contains("\"objects\": 4"), "unexpected prefs: {saved}");

    let out = quadrant()
        .args(["run", "--json", "--config-dir"])
        .arg(dir.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&out).expect("valid json");
    assert_eq!(json["objects"], serde_json::json!(4));
    assert_eq!(json["ticks"].as_array().map(Vec::len), Some(2));
}

#[test]
fn zero_cell_size_override_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    quadrant()
        .args(["run", "--cell-size", "0", "--config-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --cell-size"));
}

#[test]
fn out_of_range_saved_prefs_are_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("sim.json"), r#"{"extent": -1.0}"#).expect("write prefs");
    quadrant()
        .args(["run", "--config-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value under `sim`"));
}
