//! Tests for the CLI's output and exit code policy.
//!
//! 0: verdict (or no QR code), 1: startup failure, 2: invalid input,
//! 3: decode or extraction failure.

mod helpers;

use std::process::{Command, Output};

use helpers::{blank_png, copy_fixtures, fixture_dir, write_artifact};
use phish_scan::ErrorCategory;
use serde_json::Value;
use strum::IntoEnumIterator;

fn phish_scan(args: &[&str], model_dir: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_phish_scan"))
        .args(args)
        .arg("--model-dir")
        .arg(model_dir)
        .env_remove("PHISH_SCAN_EXTRACTOR_CMD")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run phish_scan")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_categories_match_cli_codes() {
    for category in ErrorCategory::iter() {
        let expected = match category {
            ErrorCategory::InvalidInput => 2,
            ErrorCategory::ProcessingFailure => 3,
        };
        assert_eq!(category.exit_code(), expected);
    }
}

#[test]
fn test_url_verdict_exits_zero() {
    let output = phish_scan(&["url", "https://www.google.com"], &fixture_dir());
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    assert_eq!(json["prediction"], "Legit");
    assert!(json["confidence"].is_f64());
}

#[test]
fn test_empty_url_exits_two() {
    let output = phish_scan(&["url", "  "], &fixture_dir());
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_json(&output)["status"], 400);
}

#[test]
fn test_no_qr_code_exits_zero() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let image = dir.path().join("blank.png");
    std::fs::write(&image, blank_png()).expect("write image");

    let output = phish_scan(&["qr", image.to_str().expect("utf-8 path")], &fixture_dir());
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["error"], "No QR code detected");
}

#[test]
fn test_corrupt_image_exits_three() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let image = dir.path().join("broken.png");
    std::fs::write(&image, b"not a png").expect("write image");

    let output = phish_scan(&["qr", image.to_str().expect("utf-8 path")], &fixture_dir());
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stdout_json(&output)["status"], 500);
}

#[test]
fn test_wrong_extension_exits_two() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let file = dir.path().join("notes.txt");
    std::fs::write(&file, b"hello").expect("write file");

    let output = phish_scan(&["qr", file.to_str().expect("utf-8 path")], &fixture_dir());
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_broken_artifacts_exit_one() {
    let dir = copy_fixtures();
    write_artifact(dir.path(), "scaler.json", "[]");
    let output = phish_scan(&["url", "https://www.google.com"], dir.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_features_do_not_need_artifacts() {
    let output = phish_scan(
        &["features", "http://192.168.1.1/x"],
        std::path::Path::new("/nonexistent"),
    );
    assert_eq!(output.status.code(), Some(0));
    let json = stdout_json(&output);
    assert_eq!(json["has_ip"], 1.0);
    let names: Vec<&str> = json
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names.len(), 10);
}

#[test]
fn test_doc_without_extractor_is_startup_failure() {
    let dir = tempfile::TempDir::new().expect("temp dir");
    let file = dir.path().join("letter.pdf");
    std::fs::write(&file, b"%PDF-1.4").expect("write file");

    let output = phish_scan(&["doc", file.to_str().expect("utf-8 path")], &fixture_dir());
    assert_eq!(output.status.code(), Some(1));
}
