mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use tempfile::tempdir;

use flowcast_domain::{ForecastReport, RiskLevel};

use common::{household, seed_user};

const BIN_NAME: &str = "flowcast";

fn flowcast(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("FLOWCAST_HOME", home).env("NO_COLOR", "1");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = tempdir().expect("tempdir");
    flowcast(home.path())
        .arg("help")
        .assert()
        .success()
        .stdout(contains("Available commands").and(contains("forecast")));
}

#[test]
fn help_for_one_command_shows_usage() {
    let home = tempdir().expect("tempdir");
    flowcast(home.path())
        .args(["help", "loans"])
        .assert()
        .success()
        .stdout(contains("flowcast loans [--user U]"));
}

#[test]
fn version_prints_build_metadata() {
    let home = tempdir().expect("tempdir");
    flowcast(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(contains("Flowcast").and(contains("Commit")));
}

#[test]
fn unknown_command_suggests_closest_match() {
    let home = tempdir().expect("tempdir");
    flowcast(home.path())
        .arg("forcast")
        .assert()
        .failure()
        .stdout(contains("Suggestion: `forecast`?"))
        .stderr(contains("unknown command `forcast`"));
}

#[test]
fn forecast_prints_timeline_and_risk() {
    let home = tempdir().expect("tempdir");
    seed_user(home.path(), "alice", &household());

    flowcast(home.path())
        .args(["forecast", "--user", "alice", "--as-of", "2025-03-10"])
        .assert()
        .success()
        .stdout(
            contains("Forecast for alice: 2025-03-10 to 2025-09-10")
                .and(contains("Risk:"))
                .and(contains("Safe"))
                .and(contains("Visa bill"))
                .and(contains("Car loan"))
                .and(contains("56,000 USD")),
        );
}

#[test]
fn forecast_json_is_a_report() {
    let home = tempdir().expect("tempdir");
    seed_user(home.path(), "alice", &household());

    let output = flowcast(home.path())
        .args(["forecast", "--user", "alice", "--as-of", "2025-03-10", "--horizon", "2", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let report: ForecastReport = serde_json::from_slice(&output.stdout).expect("report json");
    assert_eq!(report.start_balance, 56_000);
    assert_eq!(report.window.end, common::date(2025, 5, 10));
    assert_eq!(report.risk.level, RiskLevel::Safe);
    assert_eq!(report.events.len(), report.balances.len());
}

#[test]
fn missing_user_fails_cleanly() {
    let home = tempdir().expect("tempdir");
    flowcast(home.path())
        .args(["forecast", "--user", "nobody"])
        .assert()
        .failure()
        .stderr(contains("User not found: nobody"));
}

#[test]
fn forecast_without_user_needs_default() {
    let home = tempdir().expect("tempdir");
    seed_user(home.path(), "alice", &household());

    flowcast(home.path())
        .args(["forecast", "--as-of", "2025-03-10"])
        .assert()
        .failure()
        .stderr(contains("no user given"));

    flowcast(home.path())
        .args(["config", "set", "default_user", "alice"])
        .assert()
        .success();

    flowcast(home.path())
        .args(["forecast", "--as-of", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("Forecast for alice"));
}

#[test]
fn bills_and_loans_commands() {
    let home = tempdir().expect("tempdir");
    seed_user(home.path(), "alice", &household());

    flowcast(home.path())
        .args(["bills", "--user", "alice", "--as-of", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("Visa").and(contains("2025-04-10")).and(contains("12,000")));

    flowcast(home.path())
        .args(["loans", "--user", "alice", "--as-of", "2025-03-10"])
        .assert()
        .success()
        .stdout(contains("Car loan").and(contains("2025-11-27")).and(contains("180,000")));
}

#[test]
fn every_projection_command_reports_skipped_records() {
    let home = tempdir().expect("tempdir");
    seed_user(home.path(), "alice", &household());

    let path = home.path().join("users").join("alice.json");
    let mut stored: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
    stored["transactions"]
        .as_array_mut()
        .expect("transactions array")
        .push(serde_json::json!({"date": "2025-03-01", "amount": "lots"}));
    fs::write(&path, stored.to_string()).expect("write");

    for command in ["forecast", "loans", "bills"] {
        flowcast(home.path())
            .args([command, "--user", "alice", "--as-of", "2025-03-10"])
            .assert()
            .success()
            .stdout(contains("1 malformed record(s) were skipped"));
    }
}

#[test]
fn config_set_persists_and_backs_up() {
    let home = tempdir().expect("tempdir");

    flowcast(home.path())
        .args(["config", "set", "currency", "eur"])
        .assert()
        .success()
        .stdout(contains("currency = EUR"));
    flowcast(home.path())
        .args(["config", "set", "horizon_months", "3"])
        .assert()
        .success();

    flowcast(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("EUR").and(contains("horizon_months")));
    flowcast(home.path())
        .args(["config", "backups"])
        .assert()
        .success()
        .stdout(contains("config_"));
}

#[test]
fn config_rejects_bad_values() {
    let home = tempdir().expect("tempdir");
    flowcast(home.path())
        .args(["config", "set", "horizon_months", "soon"])
        .assert()
        .failure()
        .stderr(contains("horizon_months"));
    assert!(!home.path().join("config.json").exists());
}
