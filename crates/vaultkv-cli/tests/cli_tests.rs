//! Integration tests for the `vaultkv` CLI binary.
//!
//! These tests exercise the CLI as a subprocess, verifying exit codes and
//! stdout/stderr output. They do NOT require a running vault server; every
//! test points at a dead port and asserts on the failure surface, or stays
//! on code paths that never reach the network.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// A port nothing listens on.
const DEAD_ADDR: &str = "http://127.0.0.1:47999";

/// Helper: locate the `vaultkv` binary built by `cargo test`.
fn vaultkv_bin() -> String {
    let path = env!("CARGO_BIN_EXE_vaultkv");
    assert!(
        Path::new(path).exists(),
        "vaultkv binary not found at {path}"
    );
    path.to_owned()
}

/// Helper: a command sandboxed in `dir` with all vault variables cleared.
fn base_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(vaultkv_bin());
    cmd.current_dir(dir);
    cmd.env_remove("VAULT_ADDR");
    cmd.env_remove("VAULT_TOKEN");
    cmd.env_remove("VAULT_MOUNT");
    cmd
}

/// Helper: run and return (`exit_code`, stdout, stderr).
fn run(cmd: &mut Command) -> (i32, String, String) {
    let output = cmd.output().expect("failed to execute vaultkv");
    let code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (code, stdout, stderr)
}

// ── Version & help ───────────────────────────────────────────────────

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run(base_cmd(dir.path()).arg("--version"));
    assert_eq!(code, 0, "vaultkv --version should exit 0");
    assert!(
        stdout.contains("vaultkv"),
        "version output should contain 'vaultkv': {stdout}"
    );
}

#[test]
fn test_help_lists_commands_and_env_vars() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run(base_cmd(dir.path()).arg("--help"));
    assert_eq!(code, 0, "vaultkv --help should exit 0");
    for expected in ["write", "read", "delete", "list", "status", "doctor"] {
        assert!(
            stdout.contains(expected),
            "help should list '{expected}': {stdout}"
        );
    }
    assert!(
        stdout.contains("VAULT_ADDR") && stdout.contains("VAULT_TOKEN"),
        "help should document environment variables: {stdout}"
    );
}

#[test]
fn test_subcommand_help() {
    let dir = TempDir::new().unwrap();
    for sub in ["write", "read", "delete", "list", "status", "doctor"] {
        let (code, stdout, _) = run(base_cmd(dir.path()).args([sub, "--help"]));
        assert_eq!(code, 0, "{sub} --help should exit 0");
        assert!(!stdout.is_empty(), "{sub} --help should produce output");
    }
}

// ── Argument validation ──────────────────────────────────────────────

#[test]
fn test_write_requires_a_message() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run(base_cmd(dir.path()).arg("write"));
    assert_ne!(code, 0, "write without a message should fail");
    assert!(
        stderr.contains("MESSAGE") || stderr.contains("required"),
        "should point at the missing argument: {stderr}"
    );
}

// ── Missing token ────────────────────────────────────────────────────

#[test]
fn test_write_without_token_fails_fast() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run(base_cmd(dir.path())
        .env("VAULT_ADDR", DEAD_ADDR)
        .args(["write", "hello"]));
    assert_ne!(code, 0, "write without a token should fail");
    assert!(
        stderr.contains("VAULT_TOKEN must be set"),
        "should explain how to supply a token: {stderr}"
    );
}

#[test]
fn test_read_without_token_fails_fast() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run(base_cmd(dir.path())
        .env("VAULT_ADDR", DEAD_ADDR)
        .arg("read"));
    assert_ne!(code, 0);
    assert!(stderr.contains("VAULT_TOKEN must be set"), "{stderr}");
}

// ── Unreachable server ───────────────────────────────────────────────

#[test]
fn test_read_against_dead_server_reports_error() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run(base_cmd(dir.path())
        .env("VAULT_ADDR", DEAD_ADDR)
        .env("VAULT_TOKEN", "root")
        .args(["read", "--path", "my-secret"]));
    assert_ne!(code, 0, "read against a dead server should fail");
    assert!(
        stderr.contains("Error"),
        "should print an error line: {stderr}"
    );
}

#[test]
fn test_status_against_dead_server_reports_error() {
    let dir = TempDir::new().unwrap();
    let (code, _, stderr) = run(base_cmd(dir.path())
        .env("VAULT_ADDR", DEAD_ADDR)
        .arg("status"));
    assert_ne!(code, 0);
    assert!(stderr.contains("Error"), "{stderr}");
}

// ── Doctor ───────────────────────────────────────────────────────────

#[test]
fn test_doctor_reports_unreachable_and_missing_token() {
    let dir = TempDir::new().unwrap();
    let (code, stdout, _) = run(base_cmd(dir.path())
        .env("VAULT_ADDR", DEAD_ADDR)
        .arg("doctor"));
    // Doctor is a report, not a probe that fails the process.
    assert_eq!(code, 0, "doctor should exit 0: {stdout}");
    assert!(stdout.contains("Vault Doctor"), "{stdout}");
    assert!(stdout.contains("unreachable"), "{stdout}");
    assert!(stdout.contains("not set (VAULT_TOKEN)"), "{stdout}");
}

// ── .env loading ─────────────────────────────────────────────────────

#[test]
fn test_dotenv_supplies_address() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        format!("VAULT_ADDR={DEAD_ADDR}\n"),
    )
    .unwrap();

    let (code, stdout, _) = run(base_cmd(dir.path()).arg("doctor"));
    assert_eq!(code, 0);
    assert!(
        stdout.contains("127.0.0.1:47999"),
        "doctor should use the .env address: {stdout}"
    );
    assert!(stdout.contains("unreachable"), "{stdout}");
}

#[test]
fn test_environment_wins_over_dotenv() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "VAULT_ADDR=http://127.0.0.1:47999\n",
    )
    .unwrap();

    let (code, stdout, _) = run(base_cmd(dir.path())
        .env("VAULT_ADDR", "http://127.0.0.1:48111")
        .arg("doctor"));
    assert_eq!(code, 0);
    assert!(
        stdout.contains("127.0.0.1:48111"),
        "the process environment should shadow .env: {stdout}"
    );
}

#[test]
fn test_dotenv_comments_and_quotes() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "# local dev vault\nexport VAULT_ADDR=\"http://127.0.0.1:47999\"\n",
    )
    .unwrap();

    let (code, stdout, _) = run(base_cmd(dir.path()).arg("doctor"));
    assert_eq!(code, 0);
    assert!(stdout.contains("127.0.0.1:47999"), "{stdout}");
}
