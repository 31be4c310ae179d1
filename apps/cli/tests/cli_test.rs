//! Integration tests for the `foresight` binary, run against the mock backend.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// A sandbox with its own HOME and working directory, so no real
/// configuration leaks in.
fn sandbox() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("series.csv"), "date,value\n2024-01-01,1\n2024-01-02,2\n").unwrap();
    temp_dir
}

fn foresight(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("foresight").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .env_remove("FORESIGHT_BASE_URL")
        .env_remove("FORESIGHT_BACKEND")
        .env_remove("FORESIGHT_TIMEOUT_SECS")
        .env_remove("FORESIGHT_MODEL");
    cmd
}

#[test]
fn test_schema_single_family() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["schema", "arima"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ARIMA"))
        .stdout(predicate::str::contains("p (AR order)"))
        .stdout(predicate::str::contains("q (MA order)"))
        .stdout(predicate::str::contains("epochs").not());
}

#[test]
fn test_schema_json_lists_common_fields_first() {
    let temp_dir = sandbox();
    let output = foresight(&temp_dir).args(["schema", "lstm", "--json"]).output().unwrap();
    assert!(output.status.success());

    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> =
        listing[0]["fields"].as_array().unwrap().iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["sequenceLength", "denseUnits", "epochs", "lstmUnits"]);
    assert_eq!(listing[0]["modelType"], "lstm");
}

#[test]
fn test_schema_unknown_family() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["schema", "svm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("svm"));
}

#[test]
fn test_preview_prints_columns() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["--backend", "mock", "preview", "series.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("series.csv"))
        .stdout(predicate::str::contains("date, value"));
}

#[test]
fn test_preview_json() {
    let temp_dir = sandbox();
    let output = foresight(&temp_dir).args(["--backend", "mock", "preview", "series.csv", "--json"]).output().unwrap();
    assert!(output.status.success());

    let preview: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(preview["identifier"], "series.csv");
    assert_eq!(preview["targetColumn"], "date");
    assert_eq!(preview["preview"]["head"].as_array().unwrap().len(), 5);
}

#[test]
fn test_preview_missing_file() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["--backend", "mock", "preview", "absent.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_train_cnn_shows_history() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["--backend", "mock", "train", "series.csv", "--target", "value", "-p", "epochs=3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Results: CNN"))
        .stdout(predicate::str::contains("0.2500"))
        .stdout(predicate::str::contains("Validation Loss"))
        .stdout(predicate::str::contains("epochs=3"))
        .stdout(predicate::str::contains("completed successfully").not());
}

#[test]
fn test_train_arima_json() {
    let temp_dir = sandbox();
    let output = foresight(&temp_dir)
        .args(["--backend", "mock", "train", "series.csv", "--model", "arima", "--param", "p=2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let view: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(view["family"], "arima");
    assert!(view["aic"].is_number());
    assert!(view.get("history").is_none());
    assert!(view.get("mape").is_none());
}

#[test]
fn test_train_xgboost_text_output() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["--backend", "mock", "train", "series.csv", "--model", "xgboost"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MAPE").not())
        .stdout(predicate::str::contains("AIC").not())
        .stdout(predicate::str::contains("1.84 seconds"))
        .stdout(predicate::str::contains("Model training completed successfully."));
}

#[test]
fn test_train_saves_images() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args([
            "--backend",
            "mock",
            "train",
            "series.csv",
            "--model",
            "xgboost",
            "--save-plot",
            "plot.png",
            "--save-importance",
            "importance.png",
        ])
        .assert()
        .success();

    for name in ["plot.png", "importance.png"] {
        let bytes = fs::read(temp_dir.path().join(name)).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}

#[test]
fn test_train_rejects_inactive_parameter() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["--backend", "mock", "train", "series.csv", "--param", "p=1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not apply to CNN"));
}

#[test]
fn test_train_rejects_unparseable_value() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["--backend", "mock", "train", "series.csv", "--param", "epochs=abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("epochs"));
}

#[test]
fn test_train_rejects_unknown_target() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["--backend", "mock", "train", "series.csv", "--target", "price"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown column: price"));
}

#[test]
fn test_train_continues_when_preview_fails() {
    let temp_dir = sandbox();
    let mut server = mockito::Server::new();
    let upload = server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"filename": "series.csv", "columns": ["date", "value"]}"#)
        .create();
    let preview = server.mock("GET", "/api/preview/series.csv").with_status(500).create();
    let train = server
        .mock("POST", "/api/train")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"mse": 0.5, "rmse": 0.7071, "plot": "AAAA"}"#)
        .create();

    foresight(&temp_dir)
        .args(["--backend", "http", "--base-url", &server.url(), "train", "series.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No preview available."))
        .stdout(predicate::str::contains("Results: CNN"))
        .stdout(predicate::str::contains("0.5000"))
        .stderr(predicate::str::contains("Failed to get data preview"));

    upload.assert();
    preview.assert();
    train.assert();
}

#[test]
fn test_preview_command_fails_when_preview_fails() {
    let temp_dir = sandbox();
    let mut server = mockito::Server::new();
    server
        .mock("POST", "/api/upload")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"filename": "series.csv", "columns": ["date", "value"]}"#)
        .create();
    server.mock("GET", "/api/preview/series.csv").with_status(500).create();

    foresight(&temp_dir)
        .args(["--backend", "http", "--base-url", &server.url(), "preview", "series.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to get data preview"));
}

#[test]
fn test_local_config_selects_backend_and_model() {
    let temp_dir = sandbox();
    fs::write(temp_dir.path().join(".foresightrc"), "backend = \"mock\"\ndefault_model = \"prophet\"\n").unwrap();

    foresight(&temp_dir)
        .args(["train", "series.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Results: Prophet"))
        .stdout(predicate::str::contains("MAPE"));
}

#[test]
fn test_unreachable_server_reports_upload_failure() {
    let temp_dir = sandbox();
    foresight(&temp_dir)
        .args(["--base-url", "http://127.0.0.1:9", "--timeout-secs", "5", "preview", "series.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("network error"));
}
