use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use taskpilot::{JsonStore, TaskStore};
use tempfile::TempDir;

/// Runs the binary against a store in `dir`, isolated from the user's config.
fn taskpilot(dir: &Path, args: &[&str]) -> Output {
    let config = dir.join("config.yml");
    if !config.exists() {
        fs::write(&config, "plan_template: sprint\n").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_taskpilot"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("TASKPILOT_DB", dir.join("db.json"))
        .env_remove("RUST_LOG")
        .output()
        .expect("run taskpilot")
}

#[test]
fn test_failure_is_reported_once() {
    let dir = TempDir::new().unwrap();
    let output = taskpilot(dir.path(), &["update", "999", "completed"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("999").count(), 1, "stderr was: {}", stderr);
    assert_eq!(stderr.trim(), "Error: task not found: 999");
}

#[test]
fn test_clear_day_from_command_line() {
    let dir = TempDir::new().unwrap();
    assert!(taskpilot(dir.path(), &["plan", "Run a marathon"]).status.success());

    let set = taskpilot(dir.path(), &["schedule", "1", "--day", "2030-01-01", "--minutes", "30"]);
    assert!(set.status.success());
    let both = taskpilot(dir.path(), &["schedule", "1", "--day", "2030-01-01", "--clear-day"]);
    assert!(!both.status.success());

    let cleared = taskpilot(dir.path(), &["schedule", "1", "--clear-day"]);
    assert!(cleared.status.success(), "{}", String::from_utf8_lossy(&cleared.stderr));

    let store = JsonStore::open(dir.path().join("db.json")).unwrap();
    let task = store.task(1).unwrap();
    assert_eq!(task.recommended_day, None);
    assert_eq!(task.duration_minutes, Some(30));
}
