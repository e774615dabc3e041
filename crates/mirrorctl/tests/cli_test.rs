//! Integration tests for the `mirrorctl` binary.
//!
//! Argument parsing, help output, and shell completions run without a
//! mirror; command tests point `--url` at a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `mirrorctl` binary with env isolation.
///
/// Clears every `MIRROR*` variable and points config and data
/// directories at `home` so tests never touch the user's real setup.
fn mirrorctl_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mirrorctl");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("MIRROR_API_URL")
        .env_remove("MIRRORCTL_PROFILE")
        .env_remove("MIRRORCTL_API_KEY")
        .env_remove("MIRRORCTL_OUTPUT")
        .env_remove("MIRRORCTL_TIMEOUT")
        .env_remove("MIRRORCTL_YES")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true }))
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = mirrorctl_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("MagicMirror")
            .and(predicate::str::contains("modules"))
            .and(predicate::str::contains("dashboard"))
            .and(predicate::str::contains("brightness")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mirrorctl"));
}

#[test]
fn test_system_subcommands_exist() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home).args(["system", "--help"]).assert().success().stdout(
        predicate::str::contains("refresh")
            .and(predicate::str::contains("restart"))
            .and(predicate::str::contains("reboot"))
            .and(predicate::str::contains("shutdown"))
            .and(predicate::str::contains("info")),
    );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_output_format() {
    let home = TempDir::new().unwrap();
    let output = mirrorctl_cmd(&home)
        .args(["--output", "invalid", "modules", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_unknown_profile_is_usage_error() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["--profile", "nowhere", "ping"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("nowhere"));
}

#[test]
fn test_unreachable_mirror_exits_with_connection_code() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["--url", "http://127.0.0.1:9", "--timeout", "2", "ping"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Could not connect"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    // `config show` falls back to the default config when no file exists.
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home).args(["config", "show"]).assert().success();
}

#[test]
fn test_config_path() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["config", "use", "attic"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("attic"));
}

// ── Against a mock mirror ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_ping() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/test"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["--url", &server.uri(), "ping"])
        .assert()
        .success()
        .stderr(predicate::str::contains("answering"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_modules_list_hides_blacklisted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/module"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "identifier": "module_0_clock", "name": "clock", "hidden": false },
                { "identifier": "module_1_MMM-Remote-Control", "name": "MMM-Remote-Control", "hidden": false },
                { "identifier": "module_2_newsfeed", "name": "newsfeed", "hidden": true }
            ]
        })))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let output = mirrorctl_cmd(&home)
        .args(["--url", &server.uri(), "--output", "plain", "modules", "list"])
        .output()
        .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "module_0_clock\nmodule_2_newsfeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_modules_hide_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/module"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "identifier": "module_0_clock", "name": "clock", "hidden": false }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/module/clock/hide"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["--url", &server.uri(), "--output", "json", "modules", "hide", "clock"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""isVisibleOnMirror": false"#));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_brightness_out_of_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/brightness/150"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "success": false, "message": "Invalid value" })),
        )
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["--url", &server.uri(), "brightness", "150"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("400"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reboot_requires_yes_without_terminal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reboot"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["--url", &server.uri(), "system", "reboot"])
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reboot_with_yes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/reboot"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["--url", &server.uri(), "--yes", "system", "reboot"])
        .assert()
        .success();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_notify_sends_payload_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/notification/SHOW_ALERT/hello"))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    mirrorctl_cmd(&home)
        .args(["--url", &server.uri(), "notify", "SHOW_ALERT", "hello"])
        .assert()
        .success();
}
