//! Command-line tests. None of them reach a real provider.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

/// Command isolated from any `.env`, `config/` directory or key in the environment.
fn slipcheck(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("slipcheck").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("API_SPORTS_KEY")
        .env_remove("SLIPCHECK__PROVIDER__API_KEY")
        .env_remove("SLIPCHECK__PROVIDER__BASE_URL")
        .env("RUST_LOG", "off");
    cmd
}

fn slip_file(contents: serde_json::Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_markets_lists_canonical_names() {
    let dir = TempDir::new().unwrap();
    slipcheck(&dir)
        .args(["markets", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"MATCH_WINNER\""))
        .stdout(predicate::str::contains("\"CORNERS_OVER_UNDER\""))
        .stdout(predicate::str::contains("UNMAPPED").not());
}

#[test]
fn test_normalize_alias() {
    let dir = TempDir::new().unwrap();
    let output = slipcheck(&dir)
        .args(["normalize", "--market", "Goals Over/Under", "--pick", "o", "--line", "2.5", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let selection: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(selection["market"], "OVER_UNDER");
    assert_eq!(selection["pick"], "OVER");
}

#[test]
fn test_normalize_rejects_unknown_pick() {
    let dir = TempDir::new().unwrap();
    slipcheck(&dir)
        .args(["normalize", "--market", "1X2", "--pick", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HOME, DRAW or AWAY"));
}

#[test]
fn test_normalize_requires_team() {
    let dir = TempDir::new().unwrap();
    slipcheck(&dir)
        .args(["normalize", "--market", "Clean Sheet", "--pick", "yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("team"));
}

#[test]
fn test_settle_without_key_fails() {
    let dir = TempDir::new().unwrap();
    let slip = slip_file(serde_json::json!({
        "selections": [{"fixture_id": 1, "market": "MATCH_WINNER", "pick": "HOME"}]
    }));

    slipcheck(&dir)
        .args(["settle", "--input"])
        .arg(slip.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing API key"));
}

#[test]
fn test_settle_empty_slip_fails() {
    let dir = TempDir::new().unwrap();
    let slip = slip_file(serde_json::json!({ "selections": [] }));

    slipcheck(&dir)
        .args(["settle", "--api-key", "test-key", "--input"])
        .arg(slip.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no selections"));
}

#[test]
fn test_unreachable_provider_settles_pending() {
    let dir = TempDir::new().unwrap();
    let slip = slip_file(serde_json::json!({
        "base_url": "http://127.0.0.1:9",
        "selections": [
            {"fixture_id": 1, "market": "MATCH_WINNER", "pick": "HOME"},
            {"fixture_id": 2, "market": "OVER_UNDER", "pick": "OVER", "line": 2.5}
        ]
    }));

    let output = slipcheck(&dir)
        .args(["settle", "--api-key", "test-key", "--json", "--input"])
        .arg(slip.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "pending");
    assert_eq!(report["results"].as_array().unwrap().len(), 2);
    assert!(report["results"][0]["reason"]
        .as_str()
        .unwrap()
        .contains("Could not fetch fixture 1"));
}

#[test]
fn test_settle_table_reports_bad_row() {
    let dir = TempDir::new().unwrap();
    let slip = slip_file(serde_json::json!({
        "rows": [
            {"fixture_id": 1, "market": "1X2", "pick": "1"},
            {"fixture_id": 1, "market": "Total Goals", "pick": "over"}
        ]
    }));

    slipcheck(&dir)
        .args(["settle-table", "--api-key", "test-key", "--input"])
        .arg(slip.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Selection #1"));
}
