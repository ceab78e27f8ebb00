//! Corruption recovery tests for the rehab binary.
//!
//! These tests verify the system can handle:
//! - Corrupted progress files
//! - Corrupted history lines
//! - Missing data directories

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::io::Write as IoWrite;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn cli(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("rehab"));
    cmd.env("XDG_CONFIG_HOME", temp_dir.path().join("config"))
        .arg("--data-dir")
        .arg(temp_dir.path().join("data"));
    cmd
}

#[test]
fn test_corrupted_progress_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();

    fs::write(data_dir.join("progress.json"), "{ invalid json }}}}")
        .expect("Failed to write corrupted progress");

    cli(&temp_dir)
        .args(["log", "plank", "--left", "20", "--right", "20", "--date", "2025-06-10"])
        .assert()
        .success();

    // The corrupted file was replaced with a valid record
    let contents = fs::read_to_string(data_dir.join("progress.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(value["date"], "2025-06-10");
    assert_eq!(value["completed_exercises"][0], "plank");
}

#[test]
fn test_empty_progress_file() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    fs::create_dir_all(&data_dir).unwrap();
    fs::write(data_dir.join("progress.json"), "").unwrap();

    cli(&temp_dir)
        .args(["today", "--date", "2025-06-10"])
        .assert()
        .success();
}

#[test]
fn test_corrupted_history_lines_skipped() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&temp_dir)
        .args(["log", "clamshells", "--left", "20", "--right", "30", "--date", "2025-06-09"])
        .assert()
        .success();

    // Archive the day, then damage the history file
    cli(&temp_dir).arg("history").assert().success();

    let history_path = data_dir.join("history.jsonl");
    let mut file = fs::OpenOptions::new()
        .append(true)
        .open(&history_path)
        .unwrap();
    writeln!(file, "{{ partial write").unwrap();
    file.write_all(&[0xff, 0xfe, 0x00, b'\n']).unwrap();
    drop(file);

    cli(&temp_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("2025-06-09"))
        .stdout(predicate::str::contains("Clamshells L20 R30"));
}

#[test]
fn test_missing_data_dir_created_on_log() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");
    assert!(!data_dir.exists());

    cli(&temp_dir)
        .args(["log", "cat_cow", "--date", "2025-06-10"])
        .assert()
        .success();

    assert!(data_dir.join("progress.json").exists());
}

#[test]
fn test_read_only_commands_leave_data_dir_alone() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("data");

    cli(&temp_dir).arg("plan").assert().success();
    cli(&temp_dir).arg("blocks").assert().success();
    cli(&temp_dir)
        .args(["today", "--date", "2025-06-10"])
        .assert()
        .success();

    assert!(!data_dir.exists());
}
