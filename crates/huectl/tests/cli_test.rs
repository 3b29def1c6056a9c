//! Integration tests for the `huectl` binary.
//!
//! These exercise argument parsing, help output, shell completions, and
//! the cache-backed read path — all without a live bridge. Commands that
//! need bridge state run against a seeded data directory whose cache is
//! fresh, so no network call is ever attempted.
#![allow(clippy::unwrap_used)]

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `huectl` binary with env isolation.
fn huectl_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("huectl");
    cmd.env("HOME", "/tmp/huectl-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/huectl-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/huectl-test-nonexistent")
        .env_remove("HUE_BRIDGE")
        .env_remove("HUE_DATA_DIR")
        .env_remove("HUE_VERIFY_TLS")
        .env_remove("HUE_CA_CERT")
        .env_remove("HUE_TIMEOUT")
        .env_remove("HUE_DEBUG_FILES")
        .env_remove("HUE_OUTPUT");
    cmd
}

/// Seed a data directory with a paired connection record and a fresh
/// cache. The URLs point at a closed port; a fresh cache means nothing
/// should ever connect to them.
fn seed_data_dir(dir: &Path) {
    let config = json!({
        "api_username": "test-user",
        "api_key": "TESTKEY",
        "bridge_api_url": "http://127.0.0.1:1/api",
        "bridge_clip_url": "https://127.0.0.1:1/clip/v2",
    });
    std::fs::write(dir.join("api_config.json"), config.to_string()).unwrap();

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let cache = json!({
        "last_updated": now,
        "device": { "id": "bridge-1", "metadata": { "name": "Hue Bridge" } },
        "lights": [
            { "id": "l1", "metadata": { "name": "Desk Lamp" } },
            { "id": "l2", "metadata": { "name": "Shelf" } }
        ],
        "rooms": [
            { "id": "r1", "metadata": { "name": "Office" },
              "services": [{ "rid": "l1", "rtype": "light" }] }
        ],
        "scenes": [
            { "id": "s1", "metadata": { "name": "Relax" } }
        ]
    });
    std::fs::write(dir.join("cache.json"), cache.to_string()).unwrap();
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let output = huectl_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn help_lists_commands() {
    huectl_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("light")
            .and(predicate::str::contains("room"))
            .and(predicate::str::contains("refresh-cache"))
            .and(predicate::str::contains("pair")),
    );
}

#[test]
fn version_flag() {
    huectl_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("huectl"));
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let output = huectl_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn completions_bash() {
    huectl_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn completions_zsh() {
    huectl_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Cache-backed reads ──────────────────────────────────────────────

#[test]
fn ls_renders_seeded_cache_without_network() {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());

    huectl_cmd()
        .env("HUE_DATA_DIR", dir.path())
        .args(["--color", "never", "ls"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Hue Bridge")
                .and(predicate::str::contains("Desk Lamp"))
                .and(predicate::str::contains("Office"))
                .and(predicate::str::contains("Relax")),
        );
}

#[test]
fn light_list_plain_emits_one_name_per_line() {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());

    huectl_cmd()
        .env("HUE_DATA_DIR", dir.path())
        .args(["-o", "plain", "light", "list"])
        .assert()
        .success()
        .stdout(predicate::str::diff("Desk Lamp\nShelf\n"));
}

#[test]
fn light_list_json_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());

    let output = huectl_cmd()
        .env("HUE_DATA_DIR", dir.path())
        .args(["-o", "json", "light", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
    assert_eq!(value[0]["metadata"]["name"], "Desk Lamp");
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn invalid_color_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());

    let output = huectl_cmd()
        .env("HUE_DATA_DIR", dir.path())
        .args(["light", "set", "Desk Lamp", "--color", "notahex"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("color"));
}

#[test]
fn out_of_range_brightness_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());

    let output = huectl_cmd()
        .env("HUE_DATA_DIR", dir.path())
        .args(["light", "set", "Desk Lamp", "--brightness", "150"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("brightness"));
}

#[test]
fn unknown_light_exits_not_found() {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());

    let output = huectl_cmd()
        .env("HUE_DATA_DIR", dir.path())
        .args(["light", "off", "Attic"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("not found"));
}

#[test]
fn rename_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    seed_data_dir(dir.path());

    let output = huectl_cmd()
        .env("HUE_DATA_DIR", dir.path())
        .args(["rename", "l1", "New Name"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(5));
    assert!(combined_output(&output).contains("not supported"));
}

#[test]
fn corrupt_connection_record_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("api_config.json"), "{ nope").unwrap();

    let output = huectl_cmd()
        .env("HUE_DATA_DIR", dir.path())
        .arg("ls")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("corrupt"));
}
