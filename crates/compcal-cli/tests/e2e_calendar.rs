//! E2E CLI tests covering:
//! - `compcal events` JSON contract and filters
//! - `compcal agenda` window and ordering
//! - `compcal view` navigation windows
//! - `compcal show` detail and not-found handling
//! - fail-open behavior for missing or malformed component files
//! - config file and output-format precedence
//!
//! Each test runs the binary as a subprocess with an isolated config home.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

const NOW: &str = "2024-01-03T00:00:00Z";

const COMPONENTS: &str = r#"[
  {"id": "42", "name": "Login Form", "status": "In Development",
   "priority": "High", "lastModified": "2024-01-01T00:00:00Z"},
  {"id": "7", "name": "Navbar", "status": "Completed",
   "lastModified": "2023-12-28T00:00:00Z"}
]"#;

/// Build a Command targeting the compcal binary with no ambient config.
fn compcal_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("compcal"));
    cmd.current_dir(dir);
    cmd.env("COMPCAL_LOG", "error");
    cmd.env("XDG_CONFIG_HOME", dir.join("config-home"));
    cmd.env("HOME", dir);
    cmd.env_remove("FORMAT");
    cmd
}

fn write_components(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("components.json");
    std::fs::write(&path, body).expect("write components");
    path
}

/// Run a subcommand in JSON mode with a fixed clock and no meetings.
fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = compcal_cmd(dir)
        .args(["--now", NOW, "--no-meetings", "--format", "json"])
        .args(args)
        .output()
        .expect("compcal should not crash");
    assert!(
        output.status.success(),
        "compcal {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON output")
}

fn ids(value: &Value) -> Vec<String> {
    value["events"]
        .as_array()
        .expect("events array")
        .iter()
        .map(|e| e["id"].as_str().expect("id").to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// events
// ---------------------------------------------------------------------------

#[test]
fn events_lists_synthesized_calendar() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);
    let json = run_json(dir.path(), &["events", "--file", file.to_str().expect("utf8")]);

    assert_eq!(json["count"], 5);
    assert_eq!(
        ids(&json),
        vec!["42-deadline", "42-review", "42-development", "7-deadline", "7-review"]
    );

    let deadline = &json["events"][0];
    assert_eq!(deadline["title"], "Login Form Deadline");
    assert_eq!(deadline["start"], "2024-01-15T00:00:00Z");
    assert_eq!(deadline["allDay"], true);
    assert_eq!(deadline["kind"], "deadline");
    assert_eq!(deadline["description"], "Deadline for Login Form (priority: High)");
    assert_eq!(deadline["style"]["background"], "#ef4444");
    assert_eq!(deadline["style"]["border"], "#3b82f6");

    let development = &json["events"][2];
    assert_eq!(development["start"], "2024-01-01T00:00:00Z");
    assert_eq!(development["end"], "2024-01-15T00:00:00Z");
    assert_eq!(development["allDay"], false);
}

#[test]
fn events_filters_combine() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);
    let file = file.to_str().expect("utf8");

    let reviews = run_json(dir.path(), &["events", "--file", file, "--kind", "review"]);
    assert_eq!(ids(&reviews), vec!["42-review", "7-review"]);

    let navbar = run_json(
        dir.path(),
        &["events", "--file", file, "--search", "NAVBAR", "--status", "Completed"],
    );
    assert_eq!(ids(&navbar), vec!["7-deadline", "7-review"]);
    assert_eq!(navbar["filter"]["status"], "Completed");

    let none = run_json(dir.path(), &["events", "--file", file, "--status", "completed"]);
    assert_eq!(none["count"], 0);
}

#[test]
fn events_text_mode_is_tab_separated() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);

    compcal_cmd(dir.path())
        .args(["--now", NOW, "--no-meetings", "--format", "text"])
        .args(["events", "--file", file.to_str().expect("utf8"), "--kind", "development"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("42-development\tdevelopment\t"))
        .stdout(predicate::str::contains("Login Form Development"));
}

#[test]
fn unknown_kind_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);

    compcal_cmd(dir.path())
        .args(["events", "--file", file.to_str().expect("utf8"), "--kind", "party"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3002"));
}

// ---------------------------------------------------------------------------
// agenda / view
// ---------------------------------------------------------------------------

#[test]
fn agenda_covers_next_seven_days_in_start_order() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);
    let json = run_json(dir.path(), &["agenda", "--file", file.to_str().expect("utf8")]);

    // Development started before now and both deadlines fall after the window.
    assert_eq!(ids(&json), vec!["7-review", "42-review"]);
    assert_eq!(json["from"], "2024-01-03T00:00:00Z");
    assert_eq!(json["to"], "2024-01-10T00:00:00Z");
}

#[test]
fn view_month_and_step() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);
    let file = file.to_str().expect("utf8");

    let january = run_json(dir.path(), &["view", "--file", file, "--date", "2024-01-20"]);
    assert_eq!(january["title"], "January 2024");
    assert_eq!(january["granularity"], "month");
    assert_eq!(january["count"], 5);

    let december = run_json(dir.path(), &["view", "--file", file, "--step", "-1"]);
    assert_eq!(december["title"], "December 2023");
    assert_eq!(december["count"], 0);

    let day = run_json(
        dir.path(),
        &["view", "--file", file, "-g", "day", "--date", "2024-01-04"],
    );
    assert_eq!(day["title"], "Thursday, 2024-01-04");
    assert_eq!(ids(&day), vec!["42-development", "7-review"]);
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_returns_event_and_component() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);
    let json = run_json(
        dir.path(),
        &["show", "--file", file.to_str().expect("utf8"), "42-review"],
    );

    assert_eq!(json["id"], "42-review");
    assert_eq!(json["entityId"], "42");
    assert_eq!(json["start"], "2024-01-08T00:00:00Z");
    assert_eq!(json["component"]["name"], "Login Form");
    assert_eq!(json["component"]["priority"], "High");
}

#[test]
fn show_unknown_event_fails() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);

    compcal_cmd(dir.path())
        .args(["--now", NOW, "--no-meetings"])
        .args(["show", "--file", file.to_str().expect("utf8"), "99-deadline"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E3001"));
}

// ---------------------------------------------------------------------------
// fail-open source handling
// ---------------------------------------------------------------------------

#[test]
fn missing_file_shows_empty_calendar_with_notice() {
    let dir = TempDir::new().expect("tempdir");

    let output = compcal_cmd(dir.path())
        .args(["--now", NOW, "--format", "json", "events", "--file", "nope.json"])
        .output()
        .expect("compcal should not crash");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("E2001"));
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(json["count"], 0);
}

#[test]
fn malformed_file_shows_empty_calendar_with_notice() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), "{ not json");

    compcal_cmd(dir.path())
        .args(["--now", NOW, "--format", "text", "agenda", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("E2002"));
}

#[test]
fn non_array_snapshot_shows_empty_calendar_with_notice() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), "null");

    compcal_cmd(dir.path())
        .args(["--now", NOW, "--format", "json", "events", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 0"))
        .stderr(predicate::str::contains("E2002"))
        .stderr(predicate::str::contains("must be a JSON array"));
}

// ---------------------------------------------------------------------------
// config and meetings
// ---------------------------------------------------------------------------

#[test]
fn config_file_sets_output_format() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);
    let config = dir.path().join("compcal.toml");
    std::fs::write(&config, "[output]\nformat = \"json\"\n\n[meetings]\nenabled = false\n")
        .expect("write config");

    let output = compcal_cmd(dir.path())
        .args(["--now", NOW, "--config"])
        .arg(&config)
        .args(["events", "--file"])
        .arg(&file)
        .output()
        .expect("compcal should not crash");
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).expect("config selects JSON");
    assert_eq!(json["count"], 5);
}

#[test]
fn malformed_config_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_components(dir.path(), COMPONENTS);
    let config = dir.path().join("compcal.toml");
    std::fs::write(&config, "[meetings\nenabled = ").expect("write config");

    compcal_cmd(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["events", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("E1002"));
}

#[test]
fn seeded_meetings_are_reproducible() {
    let dir = TempDir::new().expect("tempdir");
    let body: Vec<Value> = (0..20)
        .map(|i| {
            serde_json::json!({
                "id": format!("c{i}"),
                "name": format!("Card {i}"),
                "status": "In Review",
                "lastModified": "2024-01-01T00:00:00Z",
            })
        })
        .collect();
    let file = write_components(dir.path(), &Value::Array(body).to_string());

    let run = || {
        compcal_cmd(dir.path())
            .args(["--now", NOW, "--seed", "42", "--format", "json", "events", "--file"])
            .arg(&file)
            .output()
            .expect("compcal should not crash")
            .stdout
    };
    let first: Value = serde_json::from_slice(&run()).expect("valid JSON");
    let second: Value = serde_json::from_slice(&run()).expect("valid JSON");
    assert_eq!(first, second);

    for event in first["events"].as_array().expect("events") {
        if event["kind"] == "meeting" {
            assert_eq!(event["allDay"], false);
            assert!(event["id"].as_str().expect("id").ends_with("-meeting"));
        }
    }
}
