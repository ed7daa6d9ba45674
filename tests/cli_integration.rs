//! Integration tests for the `tk` CLI.
//!
//! Each test creates a temp data directory, runs `tk` as a subprocess,
//! and verifies stdout and/or the persisted JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `tk` binary.
fn tk_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tk");
    path
}

/// Run `tk -d <dir>` with the given args, returning (stdout, stderr, success).
fn run_tk(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(tk_bin())
        .arg("-d")
        .arg(dir)
        .args(args)
        .env_remove("TICK_DATA_DIR")
        .env_remove("TICK_LOG")
        .env_remove("COLORFGBG")
        .output()
        .expect("failed to run tk");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `tk` expecting success, return stdout.
fn run_tk_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tk(dir, args);
    if !success {
        panic!(
            "tk {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `tk` expecting failure, return stderr.
fn run_tk_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_tk(dir, args);
    if success {
        panic!("tk {:?} should have failed:\nstdout: {}", args, stdout);
    }
    stderr
}

fn stored_todos(dir: &Path) -> serde_json::Value {
    let text = fs::read_to_string(dir.join("todos.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

fn stored_texts(dir: &Path) -> Vec<String> {
    stored_todos(dir)
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect()
}

/// Seed todos.json directly, the way a previous session would leave it.
fn seed(dir: &Path, json: &str) {
    fs::write(dir.join("todos.json"), json).unwrap();
}

const SEEDED: &str = r#"[
  {"id": 1, "text": "Buy milk", "completed": false, "priority": "high",
   "dueDate": "2020-01-01T00:00:00Z", "createdAt": "2019-12-01T10:00:00Z"},
  {"id": 2, "text": "Walk dog", "completed": true, "priority": "low",
   "createdAt": "2019-12-01T11:00:00Z"},
  {"id": 3, "text": "Buy bread", "completed": false, "priority": "medium",
   "dueDate": null, "createdAt": "2019-12-01T12:00:00Z"}
]"#;

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[test]
fn test_add_prepends_and_persists() {
    let tmp = tempfile::TempDir::new().unwrap();

    assert_eq!(run_tk_ok(tmp.path(), &["add", "first"]).trim(), "1");
    assert_eq!(run_tk_ok(tmp.path(), &["add", "  second  "]).trim(), "2");

    assert_eq!(stored_texts(tmp.path()), vec!["second", "first"]);
    let todos = stored_todos(tmp.path());
    assert_eq!(todos[0]["priority"], "medium");
    assert_eq!(todos[0]["completed"], false);
    assert!(todos[0]["createdAt"].is_string());
}

#[test]
fn test_add_with_priority_and_due() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tk_ok(
        tmp.path(),
        &["add", "Pay rent", "--priority", "high", "--due", "2030-01-31", "--json"],
    );
    let task: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(task["text"], "Pay rent");
    assert_eq!(task["priority"], "high");
    assert_eq!(task["due_date"], "2030-01-31T00:00:00+00:00");
    assert_eq!(task["overdue"], false);

    assert_eq!(stored_todos(tmp.path())[0]["dueDate"], "2030-01-31T00:00:00+00:00");
}

#[test]
fn test_add_blank_text_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_tk_err(tmp.path(), &["add", "   "]);
    assert!(err.contains("empty"));
    assert!(!tmp.path().join("todos.json").exists());
}

#[test]
fn test_add_rejects_bad_priority() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_tk_err(tmp.path(), &["add", "x", "--priority", "urgent"]);
    assert!(err.contains("urgent"));
}

#[test]
fn test_ids_continue_after_existing_max() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);
    assert_eq!(run_tk_ok(tmp.path(), &["add", "next"]).trim(), "4");
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[test]
fn test_list_text_output() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    let out = run_tk_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("[ ] high"));
    assert!(lines[0].contains("Buy milk  due 2020-01-01 (overdue)"));
    assert!(lines[1].contains("[x] low"));
    assert!(lines[2].contains("Buy bread"));
}

#[test]
fn test_list_filter_and_search() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    let out = run_tk_ok(tmp.path(), &["list", "--filter", "active"]);
    assert!(out.contains("Buy milk"));
    assert!(out.contains("Buy bread"));
    assert!(!out.contains("Walk dog"));

    let out = run_tk_ok(tmp.path(), &["list", "--filter", "completed"]);
    assert_eq!(out.lines().count(), 1);
    assert!(out.contains("Walk dog"));

    let out = run_tk_ok(tmp.path(), &["list", "--search", "BUY"]);
    assert_eq!(out.lines().count(), 2);

    let out = run_tk_ok(tmp.path(), &["list", "-f", "completed", "-s", "buy"]);
    assert_eq!(out.trim(), "no tasks");
}

#[test]
fn test_list_json_includes_stats() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    let out = run_tk_ok(tmp.path(), &["list", "--filter", "active", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["filter"], "active");
    assert_eq!(parsed["tasks"].as_array().unwrap().len(), 2);
    // Stats always cover the full list
    assert_eq!(parsed["stats"]["total"], 3);
    assert_eq!(parsed["stats"]["completed"], 1);
    assert_eq!(parsed["stats"]["overdue"], 1);
}

#[test]
fn test_list_rejects_unknown_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    let err = run_tk_err(tmp.path(), &["list", "--filter", "someday"]);
    assert!(err.contains("someday"));
}

#[test]
fn test_list_does_not_write() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tk_ok(tmp.path(), &["list"]);
    assert!(!tmp.path().join("todos.json").exists());
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

#[test]
fn test_toggle_round_trip() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    let out = run_tk_ok(tmp.path(), &["toggle", "1"]);
    assert!(out.contains("[x]"));
    assert_eq!(stored_todos(tmp.path())[0]["completed"], true);

    run_tk_ok(tmp.path(), &["toggle", "#1"]);
    assert_eq!(stored_todos(tmp.path())[0]["completed"], false);
}

#[test]
fn test_unknown_id_fails() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);
    let err = run_tk_err(tmp.path(), &["toggle", "99"]);
    assert!(err.contains("task not found: 99"));
    let err = run_tk_err(tmp.path(), &["rm", "abc"]);
    assert!(err.contains("invalid task id"));
}

#[test]
fn test_priority_and_due() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    run_tk_ok(tmp.path(), &["priority", "3", "h"]);
    assert_eq!(stored_todos(tmp.path())[2]["priority"], "high");

    run_tk_ok(tmp.path(), &["due", "3", "2031-03-04"]);
    assert_eq!(stored_todos(tmp.path())[2]["dueDate"], "2031-03-04T00:00:00+00:00");

    run_tk_ok(tmp.path(), &["due", "3", "--clear"]);
    assert!(stored_todos(tmp.path())[2]["dueDate"].is_null());

    let err = run_tk_err(tmp.path(), &["due", "3", "tomorrow"]);
    assert!(err.contains("invalid due date"));
}

#[test]
fn test_due_accepts_local_date_and_time() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    let out = run_tk_ok(tmp.path(), &["due", "3", "2031-03-04T09:15"]);
    assert!(out.contains("Buy bread  due 2031-03-0"));
    let due = stored_todos(tmp.path())[2]["dueDate"].clone();
    assert!(due.as_str().unwrap().starts_with("2031-03-0"));
}

#[test]
fn test_datetime_picker_due_dates_load() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(
        tmp.path(),
        r#"[
  {"id": 1, "text": "Dentist", "completed": false, "priority": "high",
   "dueDate": "2031-05-03T14:30", "createdAt": "2025-05-01T09:00:00.000Z"},
  {"id": 2, "text": "Walk dog", "completed": false, "priority": "medium",
   "dueDate": null, "createdAt": "2025-05-01T09:05:00.000Z"}
]"#,
    );

    let out = run_tk_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("Dentist  due 2031-05-0"));
    assert!(lines[1].contains("Walk dog"));
    assert!(!tmp.path().join("todos.corrupt.json").exists());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn test_rm_removes_task() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    assert_eq!(run_tk_ok(tmp.path(), &["rm", "2"]).trim(), "2");
    assert_eq!(stored_texts(tmp.path()), vec!["Buy milk", "Buy bread"]);
}

#[test]
fn test_clear_removes_completed_only() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);
    run_tk_ok(tmp.path(), &["toggle", "3"]);

    let out = run_tk_ok(tmp.path(), &["clear"]);
    assert_eq!(out.trim(), "cleared 2 completed tasks");
    assert_eq!(stored_texts(tmp.path()), vec!["Buy milk"]);

    let out = run_tk_ok(tmp.path(), &["clear", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["deleted"].as_array().unwrap().len(), 0);
}

// ---------------------------------------------------------------------------
// Reorder
// ---------------------------------------------------------------------------

#[test]
fn test_mv_takes_target_position() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    let out = run_tk_ok(tmp.path(), &["mv", "3", "1"]);
    assert!(out.contains("[ ] medium Buy bread"));
    assert_eq!(
        stored_texts(tmp.path()),
        vec!["Buy bread", "Buy milk", "Walk dog"]
    );

    let out = run_tk_ok(tmp.path(), &["mv", "3", "2", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["id"], 3);
    assert_eq!(parsed["text"], "Buy bread");
    assert_eq!(
        stored_texts(tmp.path()),
        vec!["Buy milk", "Walk dog", "Buy bread"]
    );
}

#[test]
fn test_up_and_down() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    let out = run_tk_ok(tmp.path(), &["up", "2"]);
    assert!(out.contains("[x] low    Walk dog"));
    assert_eq!(
        stored_texts(tmp.path()),
        vec!["Walk dog", "Buy milk", "Buy bread"]
    );

    // Already at the top: nothing changes, still succeeds
    run_tk_ok(tmp.path(), &["up", "2"]);
    let out = run_tk_ok(tmp.path(), &["down", "1", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["id"], 1);
    assert_eq!(
        stored_texts(tmp.path()),
        vec!["Walk dog", "Buy bread", "Buy milk"]
    );
}

// ---------------------------------------------------------------------------
// Stats and theme
// ---------------------------------------------------------------------------

#[test]
fn test_stats() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), SEEDED);

    let out = run_tk_ok(tmp.path(), &["stats"]);
    assert_eq!(
        out.trim(),
        "3 tasks, 1 completed, 2 active, 1 overdue (33% done)"
    );

    let out = run_tk_ok(tmp.path(), &["stats", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["total"], 3);
    assert_eq!(parsed["active"], 2);
}

#[test]
fn test_stats_empty_list() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_tk_ok(tmp.path(), &["stats"]);
    assert_eq!(
        out.trim(),
        "0 tasks, 0 completed, 0 active, 0 overdue (0% done)"
    );
}

#[test]
fn test_theme_persists() {
    let tmp = tempfile::TempDir::new().unwrap();

    // No stored preference and no COLORFGBG: light
    assert_eq!(run_tk_ok(tmp.path(), &["theme"]).trim(), "light");

    assert_eq!(run_tk_ok(tmp.path(), &["theme", "dark"]).trim(), "dark");
    let stored = fs::read_to_string(tmp.path().join("darkMode.json")).unwrap();
    assert_eq!(stored.trim(), "true");

    assert_eq!(run_tk_ok(tmp.path(), &["theme", "toggle"]).trim(), "light");
    let out = run_tk_ok(tmp.path(), &["theme", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["dark_mode"], false);
}

// ---------------------------------------------------------------------------
// Persistence edge cases
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_todos_are_backed_up() {
    let tmp = tempfile::TempDir::new().unwrap();
    seed(tmp.path(), "{ not json");

    let out = run_tk_ok(tmp.path(), &["list"]);
    assert_eq!(out.trim(), "no tasks");
    let backup = fs::read_to_string(tmp.path().join("todos.corrupt.json")).unwrap();
    assert!(backup.contains("{ not json"));

    run_tk_ok(tmp.path(), &["add", "fresh start"]);
    assert_eq!(stored_texts(tmp.path()), vec!["fresh start"]);
}

#[test]
fn test_data_dir_from_env() {
    let tmp = tempfile::TempDir::new().unwrap();
    let output = Command::new(tk_bin())
        .args(["add", "via env"])
        .env("TICK_DATA_DIR", tmp.path())
        .env_remove("TICK_LOG")
        .output()
        .expect("failed to run tk");
    assert!(output.status.success());
    assert_eq!(stored_texts(tmp.path()), vec!["via env"]);
}

#[test]
fn test_invalid_config_is_reported() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[timing\n").unwrap();
    let err = run_tk_err(tmp.path(), &["list"]);
    assert!(err.contains("config.toml"));
}

#[test]
fn test_log_file_written() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_tk_ok(tmp.path(), &["add", "logged"]);
    assert!(tmp.path().join("tick.log").exists());
}
