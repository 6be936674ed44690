//! Integration tests for the `adax` CLI binary.
//!
//! Everything runs against the built-in dummy rooms or an unreachable
//! address, so no Adax account is needed.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `adax` binary with env isolation.
///
/// Clears all `ADAX_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn adax_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("adax");
    cmd.env("HOME", "/tmp/adax-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/adax-cli-test-nonexistent")
        .env("XDG_DATA_HOME", "/tmp/adax-cli-test-nonexistent")
        .env_remove("ADAX_CONFIG")
        .env_remove("ADAX_OUTPUT")
        .env_remove("ADAX_DUMMY_MODE")
        .env_remove("ADAX_CLIENT_ID")
        .env_remove("ADAX_SECRET")
        .env_remove("ADAX_SECRET_ENV")
        .env_remove("ADAX_MAX_POLL_INTERVAL")
        .env_remove("ADAX_REMOVE_STALE_ACCESSORIES")
        .env_remove("ADAX_API_URL")
        .env_remove("ADAX_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, body).unwrap();
    path
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = adax_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    adax_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("Adax")
            .and(predicate::str::contains("rooms"))
            .and(predicate::str::contains("energy"))
            .and(predicate::str::contains("run")),
    );
}

#[test]
fn test_version_flag() {
    adax_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("adax"));
}

#[test]
fn test_completions_bash() {
    adax_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Dummy rooms ─────────────────────────────────────────────────────

#[test]
fn test_dummy_rooms_json() {
    adax_cmd()
        .args(["--dummy", "rooms", "-o", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Stue")
                .and(predicate::str::contains("Soveværelse"))
                .and(predicate::str::contains("\"target_celsius\": 22.0")),
        );
}

#[test]
fn test_dummy_rooms_plain_lists_ids() {
    adax_cmd()
        .args(["--dummy", "ls", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1\n2\n"));
}

#[test]
fn test_dummy_mode_from_env() {
    adax_cmd()
        .env("ADAX_DUMMY_MODE", "true")
        .args(["rooms", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1"));
}

#[test]
fn test_room_name_override_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        r#"
dummy_mode = true

[room_names]
1 = "Living room"
"#,
    );

    adax_cmd()
        .arg("--config")
        .arg(&path)
        .args(["rooms", "-o", "json-compact"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Living room")
                .and(predicate::str::contains("Stue").not()),
        );
}

#[test]
fn test_dummy_energy_log() {
    adax_cmd()
        .args(["--dummy", "energy", "1", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("energy_wh").and(predicate::str::contains("150")));
}

#[test]
fn test_energy_unknown_room_is_not_found() {
    let output = adax_cmd()
        .args(["--dummy", "energy", "99"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

// ── Setpoints ───────────────────────────────────────────────────────

#[test]
fn test_set_rounds_to_half_degree() {
    adax_cmd()
        .args(["--dummy", "set", "1", "22.3", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff("22.5\n"));
}

#[test]
fn test_set_clamps_to_range() {
    adax_cmd()
        .args(["--dummy", "set", "2", "-4", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5.0\n"));
}

#[test]
fn test_set_unknown_room_is_not_found() {
    let output = adax_cmd()
        .args(["--dummy", "set", "99", "20"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    let text = combined_output(&output);
    assert!(text.contains("adax rooms"), "Expected hint in output:\n{text}");
}

#[test]
fn test_set_rejects_non_numeric_target() {
    let output = adax_cmd()
        .args(["--dummy", "set", "1", "warm"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Run ─────────────────────────────────────────────────────────────

#[test]
fn test_run_once_prints_states() {
    adax_cmd()
        .args(["--dummy", "--color", "never", "run", "--once", "--no-cache"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stue: 21.5 °C, target 22.0 °C, heat"))
        .stderr(predicate::str::contains("+ Stue"));
}

#[test]
fn test_run_once_restores_cached_accessories() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("accessories.json");

    adax_cmd()
        .args(["--dummy", "--color", "never", "run", "--once", "--accessory-cache"])
        .arg(&cache)
        .assert()
        .success()
        .stderr(predicate::str::contains("+ Stue"));

    let saved = std::fs::read_to_string(&cache).unwrap();
    assert!(saved.contains("Soveværelse"));

    // Second start restores instead of registering again.
    adax_cmd()
        .args(["--dummy", "--color", "never", "run", "--once", "--accessory-cache"])
        .arg(&cache)
        .assert()
        .success()
        .stderr(predicate::str::contains("+ Stue").not());
}

#[test]
fn test_run_cache_flags_conflict() {
    let output = adax_cmd()
        .args(["--dummy", "run", "--no-cache", "--accessory-cache", "/tmp/x.json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Cloud errors ────────────────────────────────────────────────────

#[test]
fn test_unreachable_cloud_is_connection_error() {
    let output = adax_cmd()
        .env("ADAX_API_URL", "http://127.0.0.1:9/client-api/")
        .env("ADAX_TIMEOUT", "5")
        .args(["rooms"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_follows_flag() {
    adax_cmd()
        .args(["config", "path", "--config", "/tmp/adax-somewhere/config.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/adax-somewhere/config.toml"));
}

#[test]
fn test_config_show_masks_secret() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "secret = \"hunter2\"\nmax_poll_interval = 90\n");

    adax_cmd()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("max_poll_interval = 90")
                .and(predicate::str::contains("********"))
                .and(predicate::str::contains("hunter2").not())
                .and(predicate::str::contains("# secret source: config file")),
        );
}

#[test]
fn test_config_show_applies_flag_overrides() {
    adax_cmd()
        .args(["--dummy", "--poll-interval", "2m", "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("dummy_mode = true")
                .and(predicate::str::contains("max_poll_interval = 120")),
        );
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(&dir, "max_poll_interval = \"often\"\n");

    let output = adax_cmd()
        .arg("--config")
        .arg(&path)
        .args(["--dummy", "rooms"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_set_secret_requires_client_id() {
    let output = adax_cmd()
        .env("ADAX_TEST_SECRET", "s3cret")
        .args(["config", "set-secret", "--from-env", "ADAX_TEST_SECRET"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("client_id"), "Expected field name in output:\n{text}");
}
