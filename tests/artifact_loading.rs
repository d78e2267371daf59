//! Startup must fail when any scoring artifact is missing or inconsistent.

mod helpers;

use helpers::{copy_fixtures, write_artifact};
use phish_scan::initialization::init_scan_context;
use phish_scan::{ArtifactError, InitializationError};

fn load_error(dir: &std::path::Path) -> ArtifactError {
    match init_scan_context(dir) {
        Err(InitializationError::ArtifactError(e)) => e,
        Err(other) => panic!("Expected an artifact error, got {other}"),
        Ok(_) => panic!("Loading should fail"),
    }
}

#[test]
fn test_fixtures_load() {
    let dir = copy_fixtures();
    assert!(init_scan_context(dir.path()).is_ok());
}

#[test]
fn test_missing_model_dir() {
    let err = load_error(std::path::Path::new("/nonexistent/phish_scan/models"));
    assert!(matches!(err, ArtifactError::Io { .. }));
}

#[test]
fn test_each_missing_artifact_is_fatal() {
    for file in [
        "qr_model.json",
        "scaler.json",
        "link_model.json",
        "link_vectorizer.json",
        "email_model.json",
        "email_vectorizer.json",
        "doc_model.json",
        "doc_vectorizer.json",
    ] {
        let dir = copy_fixtures();
        std::fs::remove_file(dir.path().join(file)).expect("Fixture should exist");
        match load_error(dir.path()) {
            ArtifactError::Io { path, .. } => assert!(path.ends_with(file), "{file}"),
            other => panic!("{file}: expected Io error, got {other}"),
        }
    }
}

#[test]
fn test_malformed_json() {
    let dir = copy_fixtures();
    write_artifact(dir.path(), "link_model.json", "{ not json");
    assert!(matches!(load_error(dir.path()), ArtifactError::Parse { .. }));
}

#[test]
fn test_scaler_width_mismatch() {
    let dir = copy_fixtures();
    write_artifact(
        dir.path(),
        "scaler.json",
        r#"{"mean": [0.0, 0.0, 0.0], "scale": [1.0, 1.0, 1.0]}"#,
    );
    let err = load_error(dir.path());
    assert!(err.to_string().contains("fitted on 3 features"), "{err}");
}

#[test]
fn test_model_wider_than_vectorizer() {
    let dir = copy_fixtures();
    write_artifact(
        dir.path(),
        "doc_model.json",
        r#"{"kind": "logistic_regression", "classes": [0, 1], "coef": [1.0, 2.0], "intercept": 0.0}"#,
    );
    let err = load_error(dir.path());
    assert!(
        err.to_string()
            .contains("model expects 2 features but vectorizer produces 6"),
        "{err}"
    );
}

#[test]
fn test_single_class_model() {
    let dir = copy_fixtures();
    write_artifact(
        dir.path(),
        "qr_model.json",
        r#"{"kind": "logistic_regression", "classes": [1], "coef": [0,0,0,0,0,0,0,0,0,0], "intercept": 0.0}"#,
    );
    let err = load_error(dir.path());
    assert!(err.to_string().contains("expected 2 classes"), "{err}");
}

#[test]
fn test_tree_with_unequal_arrays() {
    let dir = copy_fixtures();
    write_artifact(
        dir.path(),
        "doc_model.json",
        r#"{
            "kind": "random_forest",
            "classes": [0, 1],
            "n_features": 6,
            "trees": [{
                "children_left": [1, -1, -1],
                "children_right": [2, -1],
                "feature": [0, -2, -2],
                "threshold": [0.0, -2.0, -2.0],
                "value": [[1.0, 1.0], [1.0, 0.0], [0.0, 1.0]]
            }]
        }"#,
    );
    let err = load_error(dir.path());
    assert!(err.to_string().contains("node arrays differ in length"), "{err}");
}
