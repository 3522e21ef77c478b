//! Integration tests for the command-line interface.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command isolated from the user's real settings and environment.
fn tmplsync(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("tmplsync"));
    cmd.arg("--settings")
        .arg(temp.path().join("settings.yml"))
        .arg("--project")
        .arg(temp.path())
        .env_remove("TMPLSYNC_TOKEN")
        .env("CI", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("tmplsync"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fetch-ids"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("tmplsync"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_rejects_unknown_kind() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    tmplsync(&temp)
        .args(["fetch-ids", "--kind", "widget"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("widget"));
    Ok(())
}

#[test]
fn cli_rejects_firm_and_partner_together() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    tmplsync(&temp)
        .args(["--firm", "1", "--partner", "2", "fetch-ids", "--kind", "shared-part"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn cli_default_firm_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    tmplsync(&temp)
        .args(["config", "set-firm", "111"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default firm set to 111"));

    tmplsync(&temp)
        .args(["config", "get-firm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("111"));

    tmplsync(&temp)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("firm: 111"))
        .stdout(predicate::str::contains("partner: -"));
    Ok(())
}

#[test]
fn cli_get_partner_without_default_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    tmplsync(&temp)
        .args(["config", "get-partner"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No default partner"));
    Ok(())
}

#[test]
fn cli_remote_command_needs_environment() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    tmplsync(&temp)
        .args(["update", "--kind", "reconciliation", "--handle", "recon_y"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No environment selected"));
    Ok(())
}

#[test]
fn cli_update_without_local_id_fails_offline() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let dir = temp.path().join("reconciliation_texts").join("recon_y");
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("config.json"), "{}")?;
    std::fs::write(dir.join("main.liquid"), "body")?;

    tmplsync(&temp)
        .args(["--firm", "111", "update", "--kind", "reconciliation", "--handle", "recon_y"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("fetch-ids"));
    Ok(())
}

#[test]
fn cli_bulk_import_declines_without_yes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    tmplsync(&temp)
        .args(["--firm", "111", "import", "--kind", "shared-part", "--all"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("--yes"));
    Ok(())
}
