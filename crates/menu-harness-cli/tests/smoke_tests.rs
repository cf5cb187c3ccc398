//! Smoke tests for the menu-harness CLI
//!
//! These tests drive the binary end to end over snapshot and suite files.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command for the menu-harness binary
fn menu_harness() -> Command {
    let mut cmd = Command::cargo_bin("menu-harness").expect("menu-harness binary should exist");
    cmd.env_remove("RUST_LOG")
        .env_remove("MENU_HARNESS_TIMEOUT_MS")
        .env_remove("MENU_HARNESS_ITEM_WAIT_MS")
        .env_remove("MENU_HARNESS_SETTLE_MS");
    cmd
}

const SOUND_SNAPSHOT: &str = r"
bus_name: com.canonical.indicator.sound
menu_path: /com/canonical/indicator/sound/desktop
action_groups:
  - path: /com/canonical/indicator/sound
    actions:
      root: {}
      silent-mode: { state: { bool: false } }
      volume: { state: { double: 0.5 } }
items:
  - attributes:
      action: { string: indicator.root }
    submenu:
      - section:
          - attributes:
              action: { string: indicator.silent-mode }
              label: { string: Silent Mode }
      - section:
          - attributes:
              action: { string: indicator.volume }
              x-canonical-type: { string: com.canonical.unity.slider }
              min-value: { double: 0.0 }
              max-value: { double: 1.0 }
";

fn sound_suite(silent: bool) -> String {
    format!(
        r"
parameters:
  bus_name: com.canonical.indicator.sound
  actions:
    - name: indicator
      path: /com/canonical/indicator/sound
  menu_object_path: /com/canonical/indicator/sound/desktop
options:
  timeout_ms: 200
  item_wait_ms: 1
items:
  - action: indicator.root
    link: submenu
    items:
      - link: section
        items:
          - type: checkbox
            action: indicator.silent-mode
            label: Silent Mode
            toggled: {silent}
      - link: section
        items:
          - action: indicator.volume
            attributes:
              - name: x-canonical-type
                value: {{ string: com.canonical.unity.slider }}
              - name: min-value
                value: {{ double: 0.0 }}
"
    )
}

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    menu_harness()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    menu_harness()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("dump"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_shows_help() {
    menu_harness().assert().failure();
}

#[test]
fn test_check_subcommand_help() {
    menu_harness()
        .args(["check", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--expect"))
        .stdout(predicate::str::contains("--timeout-ms"));
}

// ============================================================================
// Check Command Tests
// ============================================================================

#[test]
fn test_check_passes() {
    let fx = Fixture::new();
    let menu = fx.file("menu.yaml", SOUND_SNAPSHOT);
    let suite = fx.file("suite.yaml", &sound_suite(false));
    menu_harness()
        .args(["check", "--color", "never", "--menu"])
        .arg(&menu)
        .arg("--expect")
        .arg(&suite)
        .assert()
        .success()
        .stdout(predicate::str::contains("PASSED"))
        .stdout(predicate::str::contains("5 expectation(s) matched"));
}

#[test]
fn test_check_mismatch_exits_one() {
    let fx = Fixture::new();
    let menu = fx.file("menu.yaml", SOUND_SNAPSHOT);
    let suite = fx.file("suite.yaml", &sound_suite(true));
    menu_harness()
        .args(["check", "--color", "never", "-m"])
        .arg(&menu)
        .arg("-e")
        .arg(&suite)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Failed expectations:"))
        .stdout(predicate::str::contains(
            " 0 0 0 Expected toggled = true, but found false",
        ))
        .stderr(predicate::str::contains("Menu did not match"));
}

#[test]
fn test_check_json_report() {
    let fx = Fixture::new();
    let menu = fx.file("menu.yaml", SOUND_SNAPSHOT);
    let suite = fx.file("suite.yaml", &sound_suite(true));
    let output = menu_harness()
        .args(["check", "--format", "json", "-m"])
        .arg(&menu)
        .arg("-e")
        .arg(&suite)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["success"], false);
    assert_eq!(report["failures"][0]["location"], serde_json::json!([0, 0, 0]));
}

#[test]
fn test_check_missing_file_exits_two() {
    let fx = Fixture::new();
    let suite = fx.file("suite.yaml", &sound_suite(false));
    menu_harness()
        .args(["check", "-m", "/nonexistent/menu.yaml", "-e"])
        .arg(&suite)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_check_wrong_bus_warns() {
    let fx = Fixture::new();
    let menu = fx.file("menu.yaml", SOUND_SNAPSHOT);
    let suite = fx.file(
        "suite.yaml",
        &sound_suite(false).replace(
            "bus_name: com.canonical.indicator.sound",
            "bus_name: org.example.Other",
        ),
    );
    menu_harness()
        .args(["check", "--color", "never", "--timeout-ms", "20", "-m"])
        .arg(&menu)
        .arg("-e")
        .arg(&suite)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("WARN suite expects bus 'org.example.Other'"))
        .stdout(predicate::str::contains("Row count mismatch, expected 1 but found 0"));
}

// ============================================================================
// Dump and Config Tests
// ============================================================================

#[test]
fn test_dump_prints_locations() {
    let fx = Fixture::new();
    let menu = fx.file("menu.yaml", SOUND_SNAPSHOT);
    menu_harness()
        .args(["dump", "--menu"])
        .arg(&menu)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[0 0 0] action='indicator.silent-mode' label='Silent Mode'",
        ))
        .stdout(predicate::str::contains("Total: 5 items, depth 3"));
}

#[test]
fn test_dump_with_attributes() {
    let fx = Fixture::new();
    let menu = fx.file("menu.yaml", SOUND_SNAPSHOT);
    menu_harness()
        .args(["dump", "--attributes", "--menu"])
        .arg(&menu)
        .assert()
        .success()
        .stdout(predicate::str::contains("max-value=1.0"));
}

#[test]
fn test_config_defaults() {
    menu_harness()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_ms: 10000"))
        .stdout(predicate::str::contains("settle_ms: 100"));
}

#[test]
fn test_config_env_override() {
    menu_harness()
        .arg("config")
        .env("MENU_HARNESS_TIMEOUT_MS", "750")
        .assert()
        .success()
        .stdout(predicate::str::contains("timeout_ms: 750"));
}

#[test]
fn test_config_rejects_unknown_keys() {
    let fx = Fixture::new();
    let options = fx.file("options.yaml", "timeout: 5\n");
    menu_harness()
        .args(["config", "--file"])
        .arg(&options)
        .assert()
        .code(2);
}
