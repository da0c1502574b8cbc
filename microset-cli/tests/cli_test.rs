//! End-to-end tests for the one-shot command surface. Each test gets
//! its own storage root via the MICROSET_DIR override.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn microset(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("microset").expect("binary builds");
    cmd.env("MICROSET_DIR", dir);
    cmd
}

fn stdout_json(dir: &Path, args: &[&str]) -> Value {
    let output = microset(dir).args(args).output().expect("command runs");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("JSON output")
}

#[test]
fn stats_start_at_zero() {
    let dir = TempDir::new().unwrap();
    let stats = stdout_json(dir.path(), &["stats"]);
    assert_eq!(stats["exercises"], 0);
    assert_eq!(stats["reps"], 0);
    assert_eq!(stats["routines"], 0);
    assert_eq!(stats["routine_minutes"], 0);
    assert!(stats["categories"].as_object().unwrap().is_empty());
}

#[test]
fn suggest_prints_line_and_respects_cooldown() {
    let dir = TempDir::new().unwrap();

    let output = microset(dir.path())
        .args(["suggest", "--task", "writing tests"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let line = String::from_utf8(output.stdout).unwrap();
    assert!(!line.trim().is_empty());

    let pending_path = dir.path().join("pending.json");
    assert!(pending_path.exists());
    let pending: Value =
        serde_json::from_str(&std::fs::read_to_string(&pending_path).unwrap()).unwrap();
    assert_eq!(pending["task_description"], "writing tests");
    let first_suggested_at = pending["suggested_at"].clone();

    // Second call inside the cooldown window: silent, nothing rewritten.
    microset(dir.path())
        .args(["suggest", "--task", "another task"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let pending_after: Value =
        serde_json::from_str(&std::fs::read_to_string(&pending_path).unwrap()).unwrap();
    assert_eq!(pending_after["suggested_at"], first_suggested_at);
    assert_eq!(pending_after["task_description"], "writing tests");
}

#[test]
fn suggest_is_silent_when_disabled() {
    let dir = TempDir::new().unwrap();
    microset(dir.path())
        .args(["config-set", "enabled", "false"])
        .assert()
        .success();
    microset(dir.path())
        .args(["suggest"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(!dir.path().join("pending.json").exists());
}

#[test]
fn log_complete_consumes_pending_into_stats() {
    let dir = TempDir::new().unwrap();
    microset(dir.path()).args(["suggest"]).assert().success();

    let pending_path = dir.path().join("pending.json");
    let pending: Value =
        serde_json::from_str(&std::fs::read_to_string(&pending_path).unwrap()).unwrap();
    let count = pending["exercise"]["count"].as_u64().unwrap();
    let category = pending["exercise"]["category"].as_str().unwrap().to_string();

    microset(dir.path()).args(["log-complete"]).assert().success();
    assert!(!pending_path.exists());

    let stats = stdout_json(dir.path(), &["stats"]);
    assert_eq!(stats["exercises"], 1);
    assert_eq!(stats["reps"], count);
    assert_eq!(stats["categories"][&category]["reps"], count);

    // Completion history is append-only; the journal mirrors it.
    assert!(dir.path().join("log.md").exists());
}

#[test]
fn log_skip_discards_pending_without_recording() {
    let dir = TempDir::new().unwrap();
    microset(dir.path()).args(["suggest"]).assert().success();
    assert!(dir.path().join("pending.json").exists());

    microset(dir.path()).args(["log-skip"]).assert().success();
    assert!(!dir.path().join("pending.json").exists());

    let stats = stdout_json(dir.path(), &["stats"]);
    assert_eq!(stats["exercises"], 0);

    // Skipping again with nothing pending is fine.
    microset(dir.path()).args(["log-skip"]).assert().success();
}

#[test]
fn config_set_supports_dot_nesting() {
    let dir = TempDir::new().unwrap();
    microset(dir.path())
        .args(["config-set", "quiet_hours.enabled", "true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set quiet_hours.enabled = true"));

    let config = stdout_json(dir.path(), &["config-get"]);
    assert_eq!(config["quiet_hours"]["enabled"], true);
    // Sibling keys untouched.
    assert_eq!(config["quiet_hours"]["start"], "22:00");
    assert_eq!(config["quiet_hours"]["end"], "08:00");
}

#[test]
fn config_set_rejects_invalid_values_without_mutating() {
    let dir = TempDir::new().unwrap();
    microset(dir.path())
        .args(["config-set", "cooldown_minutes", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cooldown_minutes"));

    let config = stdout_json(dir.path(), &["config-get"]);
    assert_eq!(config["cooldown_minutes"], 30);
}

#[test]
fn config_add_and_remove_list_values() {
    let dir = TempDir::new().unwrap();
    microset(dir.path())
        .args(["config-add", "equipment", "dumbbells"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"));
    microset(dir.path())
        .args(["config-add", "equipment", "dumbbells"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already in equipment"));

    let config = stdout_json(dir.path(), &["config-get"]);
    let equipment = config["equipment"].as_array().unwrap();
    assert!(equipment.iter().any(|e| e == "dumbbells"));

    microset(dir.path())
        .args(["config-remove", "equipment", "dumbbells"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed"));

    // Not a list: user-facing error.
    microset(dir.path())
        .args(["config-add", "theme", "neon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not hold a list"));
}

#[test]
fn add_exercise_validates_json() {
    let dir = TempDir::new().unwrap();
    microset(dir.path())
        .args(["add-exercise", "{ nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid JSON"));

    microset(dir.path())
        .args(["add-exercise", r#"{"name": "wall sits", "count": 30}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing required field"));

    microset(dir.path())
        .args([
            "add-exercise",
            r#"{"name": "wall sits", "count": 30, "unit": "seconds",
                "category": "legs", "intensity": "moderate"}"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added custom exercise: wall sits"));

    let config = stdout_json(dir.path(), &["config-get"]);
    assert_eq!(config["custom_exercises"][0]["name"], "wall sits");
    assert_eq!(config["custom_exercises"][0]["custom"], true);
}

#[test]
fn morning_defaults_to_status_and_tracks_transitions() {
    let dir = TempDir::new().unwrap();

    let status = stdout_json(dir.path(), &["morning"]);
    assert_eq!(status["status"], "pending");
    assert!(status["completed_at"].is_null());
    assert!(status["day_of_week"].is_string());

    let done = stdout_json(
        dir.path(),
        &["morning", "--complete", "--routine", "Morning Wake-up"],
    );
    assert_eq!(done["success"], true);
    assert_eq!(done["status"], "completed");
    assert_eq!(done["routine"], "Morning Wake-up");

    let status = stdout_json(dir.path(), &["morning", "--status"]);
    assert_eq!(status["status"], "completed");
    assert_eq!(status["routine_used"], "Morning Wake-up");
    assert!(!status["completed_at"].is_null());

    let skipped = stdout_json(dir.path(), &["morning", "--skip"]);
    assert_eq!(skipped["status"], "skipped");
}

#[test]
fn queue_lifecycle_over_the_cli() {
    let dir = TempDir::new().unwrap();

    let missing = stdout_json(dir.path(), &["queue", "no-such-routine"]);
    assert_eq!(missing["success"], false);
    assert!(missing["error"]
        .as_str()
        .unwrap()
        .contains("Routine not found"));

    let queued = stdout_json(
        dir.path(),
        &[
            "queue",
            "quick-burn",
            "--trigger-type",
            "big_task",
            "--description",
            "shipped feature",
        ],
    );
    assert_eq!(queued["success"], true);
    assert_eq!(queued["queued"], true);
    assert_eq!(queued["routine_name"], "Quick Burn");
    assert_eq!(queued["trigger"], "big_task");
    assert_eq!(queued["trigger_description"], "shipped feature");

    let state = stdout_json(dir.path(), &["day"]);
    assert_eq!(state["workout_queue"]["queued"], true);
    assert!(state["workout_queue"]["triggered_at"].is_null());

    let triggered = stdout_json(dir.path(), &["queue", "--trigger"]);
    assert_eq!(triggered["success"], true);
    assert_eq!(triggered["triggered"], true);

    let state = stdout_json(dir.path(), &["day"]);
    assert!(!state["workout_queue"]["triggered_at"].is_null());

    let cancelled = stdout_json(dir.path(), &["queue", "--cancel"]);
    assert_eq!(cancelled["cancelled"], true);
    let state = stdout_json(dir.path(), &["day"]);
    assert_eq!(state["workout_queue"]["queued"], false);

    // Triggering with an empty queue reports failure JSON, exit 0.
    let empty = stdout_json(dir.path(), &["queue", "--trigger"]);
    assert_eq!(empty["success"], false);
}

#[test]
fn day_emits_full_state() {
    let dir = TempDir::new().unwrap();
    let state = stdout_json(dir.path(), &["day"]);
    assert!(state["date"].is_string());
    assert_eq!(state["morning"]["status"], "pending");
    assert_eq!(state["workout_queue"]["queued"], false);
    assert!(state["deep_work_start"].is_null());
}

#[test]
fn queue_show_emits_queue_state() {
    let dir = TempDir::new().unwrap();
    let queue = stdout_json(dir.path(), &["queue"]);
    assert_eq!(queue["queued"], false);
    assert!(queue["routine_id"].is_null());
}
