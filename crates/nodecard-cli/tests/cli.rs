use assert_cmd::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn repo_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("expected crates/<name> layout")
        .to_path_buf()
}

fn fixture(parts: &[&str]) -> PathBuf {
    let mut path = repo_root().join("fixtures");
    for part in parts {
        path = path.join(part);
    }
    assert!(path.exists(), "fixture missing: {}", path.display());
    path
}

fn run_ok(args: &[&str]) -> String {
    let exe = assert_cmd::cargo_bin!("nodecard-cli");
    let output = Command::new(exe)
        .current_dir(repo_root())
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8(output).expect("utf-8 stdout")
}

#[test]
fn cli_lays_out_a_card_input() {
    let card = fixture(&["cards", "bare.json"]);
    let stdout = run_ok(&["layout", card.to_string_lossy().as_ref()]);
    let layout: serde_json::Value = serde_json::from_str(&stdout).expect("layout json");
    assert_eq!(layout["cardId"], "svc");
    assert_eq!(layout["primitives"].as_array().map(Vec::len), Some(5));
    assert_eq!(layout["titleBox"]["width"], 96);
}

#[test]
fn cli_layout_is_byte_stable() {
    let card = fixture(&["cards", "full.json"]);
    let a = run_ok(&["layout", card.to_string_lossy().as_ref()]);
    let b = run_ok(&["layout", card.to_string_lossy().as_ref()]);
    assert_eq!(a, b);
}

#[test]
fn cli_parses_an_entity_with_context_flags() {
    let entity = fixture(&["entities", "component.json"]);
    let config = fixture(&["config", "control-plane.json"]);
    let stdout = run_ok(&[
        "parse",
        "--entity",
        "--accent",
        "primary",
        "--details",
        "closed",
        "--config",
        config.to_string_lossy().as_ref(),
        entity.to_string_lossy().as_ref(),
    ]);
    let input: serde_json::Value = serde_json::from_str(&stdout).expect("card input json");
    assert_eq!(input["id"], "component:default/orders");
    assert_eq!(input["accent"], "primary");
    assert_eq!(input["details"]["state"], "closed");
    assert_eq!(input["deploymentLinks"][0]["label"], "dp-dev");
    assert_eq!(input["internalLinks"][3]["key"], "source");
    assert_eq!(input["internalLinks"][3]["openInNewContext"], true);
}

#[test]
fn cli_renders_svg_to_file() {
    let entity = fixture(&["entities", "component.json"]);
    let tmp = tempfile::tempdir().expect("tempdir");
    let out = tmp.path().join("card.svg");

    let exe = assert_cmd::cargo_bin!("nodecard-cli");
    Command::new(exe)
        .current_dir(repo_root())
        .args([
            "render",
            "--entity",
            "--control-plane-url",
            "https://cp.example.com",
            "--id",
            "orders card",
            "--out",
            out.to_string_lossy().as_ref(),
            entity.to_string_lossy().as_ref(),
        ])
        .assert()
        .success();

    let svg = fs::read_to_string(&out).expect("read svg");
    assert!(svg.starts_with(r#"<svg id="orders-card""#));
    assert!(svg.contains(r#"viewBox="0 0 350 92""#));
    assert!(svg.contains(">Deployments</text>"));
}

#[test]
fn cli_reads_stdin_and_honours_fixed_measurer() {
    let exe = assert_cmd::cargo_bin!("nodecard-cli");
    let output = assert_cmd::Command::new(exe)
        .args(["layout", "--text-measurer", "120x18", "-"])
        .write_stdin(r#"{"id":"svc","title":"Test Service"}"#)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let layout: serde_json::Value = serde_json::from_slice(&output).expect("layout json");
    assert_eq!(layout["titleBox"]["width"], 120);
    assert_eq!(layout["titleBox"]["height"], 18);
}

#[test]
fn cli_prints_effective_config() {
    let stdout = run_ok(&["config", "--control-plane-url", "https://cp.example.com"]);
    let config: serde_json::Value = serde_json::from_str(&stdout).expect("config json");
    assert_eq!(config["geometry"]["cardWidth"], 350.0);
    assert_eq!(config["catalog"]["controlPlaneUrl"], "https://cp.example.com");
}

#[test]
fn cli_rejects_bad_usage_and_bad_input() {
    let exe = assert_cmd::cargo_bin!("nodecard-cli");
    Command::new(exe)
        .args(["layout", "--accent", "loud"])
        .assert()
        .code(2);

    let exe = assert_cmd::cargo_bin!("nodecard-cli");
    assert_cmd::Command::new(exe)
        .args(["layout", "-"])
        .write_stdin("{not json")
        .assert()
        .code(1);
}
