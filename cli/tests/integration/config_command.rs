//! Integration tests for `siteprep config`.
//!
//! All filesystem-touching tests set `SITEPREP_CONFIG` to a temp path so they
//! never read or write `~/.siteprep/config.yaml`.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn siteprep() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("siteprep"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

#[test]
fn test_config_path_honours_env_override() {
    let (_dir, path) = temp_config_path();
    siteprep()
        .args(["config", "path"])
        .env("SITEPREP_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_show_without_file_uses_defaults() {
    let (_dir, path) = temp_config_path();
    siteprep()
        .args(["config", "show"])
        .env("SITEPREP_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults.port"))
        .stdout(predicate::str::contains("22"))
        .stdout(predicate::str::contains("accept-new"));
}

#[test]
fn test_config_set_persists_value() {
    let (_dir, path) = temp_config_path();
    siteprep()
        .args(["config", "set", "defaults.port", "2222"])
        .env("SITEPREP_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set defaults.port = 2222"));

    let saved = std::fs::read_to_string(&path).expect("config written");
    assert!(saved.contains("2222"), "saved config: {saved}");

    siteprep()
        .args(["config", "show", "--json"])
        .env("SITEPREP_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("2222"));
}

#[cfg(unix)]
#[test]
fn test_config_set_writes_owner_only_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_config_path();
    siteprep()
        .args(["config", "set", "ssh.host_keys", "strict"])
        .env("SITEPREP_CONFIG", &path)
        .assert()
        .success();

    let mode = std::fs::metadata(&path)
        .expect("metadata")
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    siteprep()
        .args(["config", "set", "defaults.agent", "x"])
        .env("SITEPREP_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: defaults.agent"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_value_fails_with_json_error() {
    let (_dir, path) = temp_config_path();
    let output = siteprep()
        .args(["--json", "config", "set", "ssh.host_keys", "yolo"])
        .env("SITEPREP_CONFIG", &path)
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "CONFIG");
}
