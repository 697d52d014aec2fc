//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn synapse() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("synapse").unwrap()
}

fn records(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn simulate_prints_one_record_per_round() {
    let output = synapse()
        .args(["simulate", "--exercise", "dual-n-back", "--rounds", "3", "--seed", "7"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records = records(&output.stdout);
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record["exercise"], "dual-n-back");
        assert_eq!(record["totalTrials"], 18);
        assert_eq!(record["decisions"], 36);
        let accuracy = record["accuracy"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&accuracy));
    }
}

#[test]
fn simulate_is_reproducible_with_a_seed() {
    let run = || {
        synapse()
            .args(["simulate", "--exercise", "task-switch", "--seed", "42", "--miss-rate", "0.1"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn perfect_participant_climbs_to_the_top() {
    let output = synapse()
        .args([
            "simulate",
            "--exercise",
            "stroop-focus",
            "--rounds",
            "5",
            "--accuracy",
            "1",
            "--response-ms",
            "500",
            "--seed",
            "3",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let levels: Vec<u64> = records(&output.stdout)
        .iter()
        .map(|r| r["level"].as_u64().unwrap())
        .collect();
    assert_eq!(levels, vec![1, 2, 3, 4, 4]);
}

#[test]
fn text_format_is_readable() {
    synapse()
        .args([
            "simulate",
            "--exercise",
            "task-switch",
            "--rounds",
            "1",
            "--format",
            "text",
            "--seed",
            "1",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[task-switch] level 1"))
        .stdout(predicate::str::contains("task switches"));
}

#[test]
fn rejects_out_of_range_accuracy() {
    synapse()
        .args(["simulate", "--exercise", "stroop-focus", "--accuracy", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("accuracy must be within"));
}

#[test]
fn config_overrides_level_tables() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"dualNBack": {{"totalTrials": 6, "trialMs": 1000}}}}"#
    )
    .unwrap();
    let output = synapse()
        .arg("--config")
        .arg(file.path())
        .args(["simulate", "--exercise", "dual-n-back", "--rounds", "1", "--seed", "5"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records = records(&output.stdout);
    assert_eq!(records[0]["totalTrials"], 6);
}

#[test]
fn invalid_config_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"stroop": {{"levels": [{{"colours": 9, "prompts": 10, "limitMs": 3000}}]}}}}"#
    )
    .unwrap();
    synapse()
        .arg("--config")
        .arg(file.path())
        .args(["simulate", "--exercise", "stroop-focus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("palette"));
}

#[test]
fn missing_config_file_is_reported() {
    synapse()
        .args(["--config", "does-not-exist.json", "simulate", "--exercise", "task-switch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

#[test]
fn play_quits_on_q() {
    synapse()
        .args(["play", "--exercise", "task-switch"])
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Task Switch Circuit ==="))
        .stdout(predicate::str::contains("Trial 1/12"));
}
