// ABOUTME: Integration tests for the runline-replay binary
// ABOUTME: Writes course and fix files to a temp dir and checks the JSON line output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run the replay binary and capture output
fn run_replay(args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_runline-replay"))
        .args(args)
        .env("RUST_LOG", "warn")
        .env("LOG_FORMAT", "compact")
        .output()
        .unwrap();

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

fn write_json(dir: &Path, name: &str, value: &Value) -> String {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path.to_string_lossy().into_owned()
}

/// Straight course north along the meridian, with five fixes ~11 m apart
fn write_corridor_run(dir: &TempDir, offset_longitude: f64) -> (String, String) {
    let course = json!({
        "courseId": "corridor",
        "nodes": [
            { "location": { "longitude": 0.0, "latitude": 0.0 }, "bearingChangeDegrees": 0.0 },
            { "location": { "longitude": 0.0, "latitude": 0.0005 }, "bearingChangeDegrees": 0.0 }
        ]
    });
    let fixes: Vec<Value> = (0..5)
        .map(|i| {
            json!({
                "coordinate": { "longitude": offset_longitude, "latitude": f64::from(i) * 0.0001 },
                "timestamp": format!("2025-06-01T07:00:{:02}Z", i * 5),
            })
        })
        .collect();

    (
        write_json(dir.path(), "course.json", &course),
        write_json(dir.path(), "fixes.json", &Value::Array(fixes)),
    )
}

fn events(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_replay_help_shows_options() {
    let (exit_code, stdout, _stderr) = run_replay(&["--help"]);

    assert_eq!(exit_code, 0, "Help should exit with 0");
    assert!(stdout.contains("--course"), "Should show --course option");
    assert!(stdout.contains("--fixes"), "Should show --fixes option");
    assert!(
        stdout.contains("--tolerance"),
        "Should show --tolerance option"
    );
}

#[test]
fn test_replay_on_course_run() {
    let dir = tempfile::tempdir().unwrap();
    let (course, fixes) = write_corridor_run(&dir, 0.0);

    let (exit_code, stdout, stderr) = run_replay(&["--course", &course, "--fixes", &fixes]);
    assert_eq!(exit_code, 0, "Replay failed: {stderr}");

    let events = events(&stdout);
    assert_eq!(events[0]["event"], "stateChanged");
    assert_eq!(events[0]["state"], "tracking");

    let validations: Vec<_> = events
        .iter()
        .filter(|event| event["event"] == "validation")
        .collect();
    assert_eq!(validations.len(), 4);
    assert!(validations
        .iter()
        .all(|event| event["result"]["isOnCourse"] == true));

    let finished = events.last().unwrap();
    assert_eq!(finished["event"], "finished");
    assert_eq!(finished["backOnCourse"], true);
    assert_eq!(finished["run"]["path"].as_array().unwrap().len(), 5);
    let distance = finished["run"]["stats"]["distanceMeters"].as_f64().unwrap();
    assert!((distance - 44.48).abs() < 0.1, "distance was {distance}");
}

#[test]
fn test_replay_tolerance_override_flags_deviation() {
    let dir = tempfile::tempdir().unwrap();
    // ~22 m east of the course line
    let (course, fixes) = write_corridor_run(&dir, 0.0002);

    let (exit_code, stdout, stderr) = run_replay(&[
        "--course",
        &course,
        "--fixes",
        &fixes,
        "--tolerance",
        "10",
    ]);
    assert_eq!(exit_code, 0, "Replay failed: {stderr}");

    let events = events(&stdout);
    assert!(events
        .iter()
        .filter(|event| event["event"] == "validation")
        .all(|event| event["result"]["isOnCourse"] == false));
    assert_eq!(events.last().unwrap()["backOnCourse"], false);
}

#[test]
fn test_replay_marks_unmeasurable_distances() {
    let dir = tempfile::tempdir().unwrap();
    let (_, fixes) = write_corridor_run(&dir, 0.0);
    let empty_course = write_json(
        dir.path(),
        "empty-course.json",
        &json!({ "courseId": "empty", "nodes": [] }),
    );

    let (exit_code, stdout, stderr) =
        run_replay(&["--course", &empty_course, "--fixes", &fixes]);
    assert_eq!(exit_code, 0, "Replay failed: {stderr}");

    let events = events(&stdout);
    let validation = events
        .iter()
        .find(|event| event["event"] == "validation")
        .unwrap();
    assert_eq!(validation["available"], false);
    assert!(validation["result"]["distanceFromCourseMeters"].is_null());

    let navigation = events
        .iter()
        .find(|event| event["event"] == "navigation")
        .unwrap();
    assert_eq!(navigation["available"], false);
    assert!(navigation["state"]["distanceToNextNodeMeters"].is_null());
}

#[test]
fn test_replay_on_course_events_are_available() {
    let dir = tempfile::tempdir().unwrap();
    let (course, fixes) = write_corridor_run(&dir, 0.0);

    let (_, stdout, _) = run_replay(&["--course", &course, "--fixes", &fixes]);
    assert!(events(&stdout)
        .iter()
        .filter(|event| event["event"] == "validation")
        .all(|event| event["available"] == true));
}

#[test]
fn test_replay_rejects_empty_fix_file() {
    let dir = tempfile::tempdir().unwrap();
    let (course, _) = write_corridor_run(&dir, 0.0);
    let empty = write_json(dir.path(), "empty.json", &json!([]));

    let (exit_code, stdout, stderr) = run_replay(&["--course", &course, "--fixes", &empty]);

    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("contains no fixes"), "stderr: {stderr}");
}

#[test]
fn test_replay_reports_missing_course_file() {
    let dir = tempfile::tempdir().unwrap();
    let (_, fixes) = write_corridor_run(&dir, 0.0);
    let missing = dir.path().join("missing.json");

    let (exit_code, _stdout, stderr) = run_replay(&[
        "--course",
        missing.to_str().unwrap(),
        "--fixes",
        &fixes,
    ]);

    assert_ne!(exit_code, 0);
    assert!(stderr.contains("Failed to read"), "stderr: {stderr}");
}
