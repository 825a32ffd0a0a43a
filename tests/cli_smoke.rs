use assert_cmd::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;

const TRACE: &str = "tests/fixtures/checkout.trace";

struct Harness {
    _dir: tempfile::TempDir,
    config: PathBuf,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("absent.yaml");
        Self { _dir: dir, config }
    }

    fn command(&self) -> Command {
        let bin = assert_cmd::cargo::cargo_bin!("traceview");
        let mut cmd = Command::new(bin);
        cmd.env_remove("TRACEVIEW_WIDTH")
            .env_remove("TRACEVIEW_OUTPUT")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    fn json(&self, args: &[&str]) -> Value {
        assert!(Path::new(TRACE).exists(), "fixture missing");
        let assert = self
            .command()
            .args(["--output", "json"])
            .args(args)
            .assert()
            .success();
        let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
        serde_json::from_str(&stdout).expect("valid json")
    }
}

#[test]
fn actions_lists_calls_with_console_counts() {
    let value = Harness::new().json(&["actions", TRACE]);

    assert_eq!(value["browser_name"].as_str(), Some("chromium"));
    assert_eq!(
        value["wall_time"].as_str(),
        Some("2023-11-14T22:13:20+00:00")
    );
    let actions = value["actions"].as_array().unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0]["call_id"].as_str(), Some("call@1"));
    assert_eq!(actions[0]["warnings"].as_u64(), Some(1));
    assert_eq!(actions[1]["label"].as_str(), Some("page.click text=Checkout"));
    assert_eq!(actions[1]["errors"].as_u64(), Some(1));
}

#[test]
fn inspect_resolves_bodies_and_placeholders() {
    let harness = Harness::new();

    let checkout = harness.json(&["inspect", TRACE, "call@2", "--bodies"]);
    assert_eq!(checkout["stats"]["errors"].as_u64(), Some(1));
    assert_eq!(
        checkout["events"][0]["text"].as_str(),
        Some("cart is undefined")
    );
    assert_eq!(checkout["resources"][0]["status"].as_i64(), Some(500));
    assert_eq!(
        checkout["resources"][0]["body"].as_str(),
        Some(r#"{"error":"checkout failed"}"#)
    );

    let navigation = harness.json(&["inspect", TRACE, "0", "--bodies"]);
    assert_eq!(navigation["call_id"].as_str(), Some("call@1"));
    assert_eq!(
        navigation["resources"][0]["body"].as_str(),
        Some("Response body is not available")
    );
}

#[test]
fn timeline_and_hit_share_geometry() {
    let harness = Harness::new();

    let timeline = harness.json(&["timeline", TRACE, "--width", "640"]);
    assert_eq!(timeline["ticks"].as_array().unwrap().len(), 10);
    assert_eq!(timeline["bars"].as_array().unwrap().len(), 4);

    let on_action = harness.json(&["hit", TRACE, "--x", "320", "--y", "5", "--width", "640"]);
    assert_eq!(on_action["bar"]["call_id"].as_str(), Some("call@2"));
    assert_eq!(on_action["time"].as_f64(), Some(5000.0));

    let on_event = harness.json(&["hit", TRACE, "--x", "320", "--y", "27", "--width", "640"]);
    assert_eq!(on_event["bar"]["kind"].as_str(), Some("event"));
    assert_eq!(on_event["bar"]["label"].as_str(), Some("pageError"));

    let empty = harness.json(&["hit", TRACE, "--x", "200", "--y", "5", "--width", "640"]);
    assert!(empty["bar"].is_null());
}

#[test]
fn frame_picks_latest_capture() {
    let value = Harness::new().json(&["frame", TRACE, "--at", "5000"]);
    assert_eq!(value["sha1"].as_str(), Some("page@1-1000.jpeg"));
    assert_eq!(value["captured"].as_bool(), Some(false));
}

#[test]
fn human_output_is_default() {
    let assert = Harness::new()
        .command()
        .args(["actions", TRACE])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 output");
    assert!(stdout.contains("Trace: chromium"));
    assert!(stdout.contains("page.goto https://shop.test/"));
}

#[test]
fn config_show_reports_defaults() {
    let value = Harness::new().json(&["config", "show"]);
    assert_eq!(value["default_width"].as_f64(), Some(1000.0));
    assert_eq!(value["timeline"]["min_tick_gap_px"].as_f64(), Some(64.0));
}

#[test]
fn malformed_trace_fails() {
    let dir = tempfile::tempdir().unwrap();
    let trace = dir.path().join("broken.trace");
    std::fs::write(&trace, "{\"type\":\"action\"\nnot json\n").unwrap();

    Harness::new()
        .command()
        .arg("actions")
        .arg(&trace)
        .assert()
        .failure();
}

#[test]
fn oversized_width_is_rejected() {
    Harness::new()
        .command()
        .args(["timeline", TRACE, "--width", "1e20"])
        .assert()
        .failure();
}
