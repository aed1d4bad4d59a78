//! Integration tests for the `wledly` CLI binary.
//!
//! These tests cover argument parsing, help output, shell completions,
//! registry commands, and dispatch exit codes. Every test gets its own
//! config file and data directory.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wledly` binary with env isolation.
///
/// Clears all `WLEDLY_*` env vars and points config and data at `home`
/// so tests never touch the user's real configuration.
fn wledly_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wledly");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("xdg-config"))
        .env("XDG_DATA_HOME", home.join("xdg-data"))
        .env("WLEDLY_CONFIG", home.join("config.toml"))
        .env("WLEDLY_DATA_DIR", home.join("data"))
        .env_remove("WLEDLY_INSTALLATION")
        .env_remove("WLEDLY_SETTINGS")
        .env_remove("WLEDLY_OUTPUT")
        .env_remove("WLEDLY_TIMEOUT_MS")
        .env_remove("WLEDLY_DEFAULT_INSTALLATION")
        .env_remove("RUST_LOG")
        .write_stdin("");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// An address nothing is listening on.
fn dead_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

fn list_json(home: &Path) -> Vec<Value> {
    let output = wledly_cmd(home)
        .args(["controllers", "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add(home: &Path, address: &str, name: &str) -> String {
    let output = wledly_cmd(home)
        .args(["controllers", "add", address, "--name", name, "-o", "plain"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = wledly_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    wledly_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("WLED")
            .and(predicate::str::contains("controllers"))
            .and(predicate::str::contains("power"))
            .and(predicate::str::contains("scan")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    wledly_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wledly"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    wledly_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_power_state() {
    let home = TempDir::new().unwrap();
    wledly_cmd(home.path())
        .args(["power", "dim", "--all"])
        .assert()
        .code(2);
}

// ── Registry ────────────────────────────────────────────────────────

#[test]
fn test_empty_registry_lists_nothing() {
    let home = TempDir::new().unwrap();
    assert!(list_json(home.path()).is_empty());
}

#[test]
fn test_add_list_remove() {
    let home = TempDir::new().unwrap();
    let address = dead_address();

    let id = add(home.path(), &address, "Porch");
    assert!(!id.is_empty());

    let listed = list_json(home.path());
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], id.as_str());
    assert_eq!(listed[0]["displayName"], "Porch");
    assert_eq!(listed[0]["address"], address.as_str());

    // Same address again is not a second entry.
    let again = add(home.path(), &address, "Other");
    assert_eq!(again, id);
    assert_eq!(list_json(home.path()).len(), 1);

    wledly_cmd(home.path())
        .args(["controllers", "remove", "porch", "-y"])
        .assert()
        .success();
    assert!(list_json(home.path()).is_empty());
}

#[test]
fn test_settings_file_location() {
    let home = TempDir::new().unwrap();
    add(home.path(), &dead_address(), "Desk");
    assert!(
        home.path()
            .join("data")
            .join("installations")
            .join("default.json")
            .exists()
    );

    // A different installation has its own list.
    let output = wledly_cmd(home.path())
        .args(["-i", "garage", "controllers", "list", "-o", "json"])
        .output()
        .unwrap();
    let other: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert!(other.is_empty());
}

#[test]
fn test_remove_requires_confirmation_when_not_interactive() {
    let home = TempDir::new().unwrap();
    add(home.path(), &dead_address(), "Shelf");

    wledly_cmd(home.path())
        .args(["controllers", "remove", "shelf"])
        .assert()
        .code(2);
    assert_eq!(list_json(home.path()).len(), 1);
}

#[test]
fn test_remove_unknown_controller() {
    let home = TempDir::new().unwrap();
    wledly_cmd(home.path())
        .args(["controllers", "remove", "nowhere", "-y"])
        .assert()
        .code(4);
}

#[test]
fn test_bad_installation_name() {
    let home = TempDir::new().unwrap();
    wledly_cmd(home.path())
        .args(["-i", "../etc", "controllers", "list"])
        .assert()
        .code(2);
}

// ── Dispatch ────────────────────────────────────────────────────────

#[test]
fn test_power_without_targets() {
    let home = TempDir::new().unwrap();
    let output = wledly_cmd(home.path())
        .args(["power", "toggle", "--all"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("No controllers"));
}

#[test]
fn test_preset_out_of_range() {
    let home = TempDir::new().unwrap();
    add(home.path(), &dead_address(), "Desk");

    for preset in ["0", "251"] {
        wledly_cmd(home.path())
            .args(["preset", preset, "--all"])
            .assert()
            .code(2);
    }
}

#[test]
fn test_power_on_unreachable_controller_fails() {
    let home = TempDir::new().unwrap();
    add(home.path(), &dead_address(), "Desk");

    let output = wledly_cmd(home.path())
        .args(["power", "on", "desk", "-o", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9), "{}", combined_output(&output));

    let results: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["status"], "failed");
}

#[test]
fn test_preset_map_with_explicit_target() {
    let home = TempDir::new().unwrap();
    let porch = add(home.path(), &dead_address(), "Porch");
    add(home.path(), &dead_address(), "Desk");

    // Only the named target is contacted, even though both are mapped.
    let output = wledly_cmd(home.path())
        .args(["preset", "--map", "porch=3", "--map", "desk=4", "porch", "-o", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9), "{}", combined_output(&output));

    let results: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], porch.as_str());
    assert_eq!(results[0]["status"], "failed");
}

#[test]
fn test_preset_map_without_targets_uses_mapped_controllers() {
    let home = TempDir::new().unwrap();
    add(home.path(), &dead_address(), "Porch");
    add(home.path(), &dead_address(), "Desk");

    let output = wledly_cmd(home.path())
        .args(["preset", "-m", "porch=3", "-o", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(9), "{}", combined_output(&output));

    let results: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Porch");
}

#[test]
fn test_preset_requires_a_number() {
    let home = TempDir::new().unwrap();
    add(home.path(), &dead_address(), "Porch");
    wledly_cmd(home.path())
        .args(["preset", "porch"])
        .assert()
        .code(2);
}

#[test]
fn test_stale_id_only_is_no_targets() {
    let home = TempDir::new().unwrap();
    wledly_cmd(home.path())
        .args(["power", "off", "550e8400-e29b-41d4-a716-446655440000"])
        .assert()
        .code(4);
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_and_show() {
    let home = TempDir::new().unwrap();

    wledly_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .success();
    assert!(home.path().join("config.toml").exists());

    wledly_cmd(home.path())
        .args(["config", "init"])
        .assert()
        .code(1);

    wledly_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("request_timeout_ms = 1500"));
}

#[test]
fn test_config_path_reports_settings_file() {
    let home = TempDir::new().unwrap();
    let output = wledly_cmd(home.path())
        .args(["-i", "studio", "config", "path", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let paths: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(paths["installation"], "studio");
    assert!(
        paths["settings"]
            .as_str()
            .unwrap()
            .ends_with("studio.json")
    );
}
